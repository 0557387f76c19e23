//! # Content — Named Textures, Sprites and Fonts
//!
//! [`Content`] is the asset registry a game draws from. It is built once at
//! startup through a [`ContentBuilder`] and is read-only afterwards. There is
//! no global instance: pass `&Content` to whatever needs it.
//!
//! ```text
//! ContentBuilder ──load_texture("sheet", "assets/sheet.png")──► TextureSource
//!       │
//!       ├─ load_sprite_sheet("sheet", "assets/sheet.xml")
//!       │     <SubTexture name="playerShip1_blue.png" x=".." y=".." .../>
//!       │     → sprites["playerShip1_blue"]
//!       │
//!       ├─ load_sprite_font("digits", "font.xml", "font.png")
//!       │     <common lineHeight=".."/> <char id=".." x=".." .../>
//!       │     → fonts["digits"]
//!       ▼
//!    finish() → Content (immutable)
//! ```
//!
//! ## Manifest Formats
//!
//! **Sprite sheets** use the TexturePacker "Starling/Sparrow" XML layout.
//! Every `SubTexture` element becomes a [`Sprite`] whose source rect is the
//! element's region and whose draw rect is `(0, 0, width, height)`. A
//! trailing `.png` is dropped from the name.
//!
//! **Fonts** use BMFont's XML export. `common/@lineHeight` sets the line
//! height, and each `char` contributes a glyph with UVs normalized by the
//! atlas texture's size.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::ContentError;
use crate::math::{Rect, Vec2};
use crate::render2d::{Sprite, SpriteFont, Texture, TextureSource};

/// Read-only registry of loaded assets.
#[derive(Debug, Default)]
pub struct Content {
    textures: HashMap<String, Texture>,
    sprites: HashMap<String, Sprite>,
    fonts: HashMap<String, SpriteFont>,
}

impl Content {
    /// Start loading assets through `source`.
    pub fn builder<S: TextureSource>(source: &mut S) -> ContentBuilder<'_, S> {
        ContentBuilder {
            source,
            content: Content::default(),
        }
    }

    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    pub fn font(&self, name: &str) -> Option<&SpriteFont> {
        self.fonts.get(name)
    }

    pub fn sprite_names(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

/// Loads assets into a [`Content`]. See the module docs.
pub struct ContentBuilder<'a, S: TextureSource> {
    source: &'a mut S,
    content: Content,
}

impl<S: TextureSource> ContentBuilder<'_, S> {
    /// Decode an image file and register it as `name`.
    pub fn load_texture(&mut self, name: &str, path: &str) -> Result<Texture, ContentError> {
        let texture = self.source.load_texture(path)?;
        log::info!(
            "texture '{name}' loaded from {path} ({}x{})",
            texture.width(),
            texture.height()
        );
        self.content.textures.insert(name.to_owned(), texture.clone());
        Ok(texture)
    }

    /// Upload raw RGBA8 pixels and register them as `name`.
    pub fn add_rgba_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Texture, ContentError> {
        let texture = self.source.create_texture(name, width, height, rgba)?;
        self.content.textures.insert(name.to_owned(), texture.clone());
        Ok(texture)
    }

    /// Register an already created texture.
    pub fn add_texture(&mut self, name: &str, texture: Texture) {
        self.content.textures.insert(name.to_owned(), texture);
    }

    pub fn add_sprite(&mut self, name: &str, sprite: Sprite) {
        self.content.sprites.insert(name.to_owned(), sprite);
    }

    /// Read a sprite sheet manifest for the texture registered as
    /// `texture_name`. Returns how many sprites it added.
    pub fn load_sprite_sheet(
        &mut self,
        texture_name: &str,
        xml_path: impl AsRef<Path>,
    ) -> Result<usize, ContentError> {
        let xml = read_manifest(xml_path.as_ref())?;
        self.add_sprite_sheet(texture_name, &xml)
    }

    /// Like [`load_sprite_sheet`](Self::load_sprite_sheet), from XML text.
    pub fn add_sprite_sheet(&mut self, texture_name: &str, xml: &str) -> Result<usize, ContentError> {
        let texture = self
            .content
            .textures
            .get(texture_name)
            .cloned()
            .ok_or_else(|| ContentError::UnknownTexture(texture_name.to_owned()))?;

        let sprites = parse_sprite_sheet(xml, &texture)?;
        let count = sprites.len();
        log::info!("sprite sheet '{texture_name}': {count} sprites");
        self.content.sprites.extend(sprites);
        Ok(count)
    }

    /// Load a BMFont: the atlas image (linear filtering) and its XML
    /// descriptor.
    pub fn load_sprite_font(
        &mut self,
        name: &str,
        xml_path: impl AsRef<Path>,
        texture_path: &str,
    ) -> Result<&SpriteFont, ContentError> {
        let texture = self.source.load_font_texture(texture_path)?;
        let xml = read_manifest(xml_path.as_ref())?;
        self.add_font(name, &xml, texture)
    }

    /// Parse BMFont XML against an already loaded atlas.
    pub fn add_font(
        &mut self,
        name: &str,
        xml: &str,
        texture: Texture,
    ) -> Result<&SpriteFont, ContentError> {
        let font = parse_bmfont(xml, texture)?;
        log::info!("font '{name}': {} glyphs", font.len());
        self.register_atlas(name, font.texture());
        Ok(self.content.fonts.entry(name.to_owned()).insert_entry(font).into_mut())
    }

    /// Register a font assembled in code. Its atlas is registered under the
    /// same name unless that texture name is already taken.
    pub fn insert_font(&mut self, name: &str, font: SpriteFont) {
        self.register_atlas(name, font.texture());
        self.content.fonts.insert(name.to_owned(), font);
    }

    /// Make a font's atlas reachable as a texture named after the font,
    /// without replacing a different texture of that name.
    fn register_atlas(&mut self, name: &str, atlas: &Texture) {
        match self.content.textures.get(name) {
            Some(existing) if existing != atlas => log::warn!(
                "font '{name}': texture name already used by '{}', atlas '{}' not registered",
                existing.key(),
                atlas.key()
            ),
            Some(_) => {}
            None => {
                self.content.textures.insert(name.to_owned(), atlas.clone());
            }
        }
    }

    pub fn finish(self) -> Content {
        self.content
    }
}

fn read_manifest(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn attr<'a>(
    node: &roxmltree::Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ContentError> {
    node.attribute(attribute)
        .ok_or(ContentError::MissingAttribute { element, attribute })
}

fn number<T: FromStr>(
    node: &roxmltree::Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<T, ContentError> {
    let raw = attr(node, element, attribute)?;
    raw.trim().parse().map_err(|_| ContentError::InvalidNumber {
        attribute,
        value: raw.to_owned(),
    })
}

/// Parse a TexturePacker XML atlas into named sprites over `texture`.
pub fn parse_sprite_sheet(xml: &str, texture: &Texture) -> Result<Vec<(String, Sprite)>, ContentError> {
    const ELEMENT: &str = "SubTexture";
    let doc = roxmltree::Document::parse(xml)?;

    doc.descendants()
        .filter(|node| node.has_tag_name(ELEMENT))
        .map(|node| {
            let name = attr(&node, ELEMENT, "name")?;
            let name = name.strip_suffix(".png").unwrap_or(name);
            let x: f32 = number(&node, ELEMENT, "x")?;
            let y: f32 = number(&node, ELEMENT, "y")?;
            let width: f32 = number(&node, ELEMENT, "width")?;
            let height: f32 = number(&node, ELEMENT, "height")?;

            let sprite = Sprite::new(
                texture.clone(),
                Rect::from_size(width, height),
                Rect::new(x, y, width, height),
            );
            Ok((name.to_owned(), sprite))
        })
        .collect()
}

/// Parse BMFont XML into a [`SpriteFont`] over the atlas `texture`.
pub fn parse_bmfont(xml: &str, texture: Texture) -> Result<SpriteFont, ContentError> {
    let doc = roxmltree::Document::parse(xml)?;

    let common = doc
        .descendants()
        .find(|node| node.has_tag_name("common"))
        .ok_or(ContentError::MissingElement("common"))?;
    let line_height: f32 = number(&common, "common", "lineHeight")?;

    let mut font = SpriteFont::new(texture, line_height);
    for node in doc.descendants().filter(|node| node.has_tag_name("char")) {
        let id: u32 = number(&node, "char", "id")?;
        let Some(ch) = char::from_u32(id) else {
            log::warn!("BMFont char id {id} is not a valid code point, skipping");
            continue;
        };

        let region = Rect::new(
            number(&node, "char", "x")?,
            number(&node, "char", "y")?,
            number(&node, "char", "width")?,
            number(&node, "char", "height")?,
        );
        let advance: f32 = number(&node, "char", "xadvance")?;
        let offset = Vec2::new(
            number(&node, "char", "xoffset")?,
            number(&node, "char", "yoffset")?,
        );
        font.insert_glyph(ch, region, advance, offset);
    }

    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::render2d::backend::recording::RecordingBackend;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TextureAtlas imagePath="sheet.png">
    <SubTexture name="laserBlue01.png" x="10" y="20" width="9" height="54"/>
    <SubTexture name="meteorBrown_big1.png" x="128" y="0" width="101" height="84"/>
</TextureAtlas>"#;

    const FONT: &str = r#"<?xml version="1.0"?>
<font>
  <info face="Snow" size="32"/>
  <common lineHeight="36" base="29" scaleW="256" scaleH="128" pages="1"/>
  <chars count="2">
    <char id="65" x="0" y="0" width="16" height="20" xoffset="1" yoffset="4" xadvance="18" page="0"/>
    <char id="66" x="64" y="32" width="14" height="20" xoffset="-1" yoffset="4" xadvance="15" page="0"/>
  </chars>
</font>"#;

    #[test]
    fn sprite_sheet_strips_png_and_keeps_regions() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        builder.load_texture("sheet", "assets/sheet.png").unwrap();
        assert_eq!(builder.add_sprite_sheet("sheet", SHEET).unwrap(), 2);
        let content = builder.finish();

        let laser = content.sprite("laserBlue01").unwrap();
        assert_eq!(laser.draw_rect, Rect::new(0.0, 0.0, 9.0, 54.0));
        assert_eq!(laser.source_rect, Rect::new(10.0, 20.0, 9.0, 54.0));
        assert_eq!(laser.texture.key(), "assets/sheet.png");
        assert!(content.sprite("laserBlue01.png").is_none());
        assert_eq!(content.sprite_count(), 2);
    }

    #[test]
    fn sprite_sheet_needs_known_texture() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        let err = builder.add_sprite_sheet("nope", SHEET).unwrap_err();
        assert!(matches!(err, ContentError::UnknownTexture(name) if name == "nope"));
    }

    #[test]
    fn sprite_sheet_errors_name_the_attribute() {
        let texture = Texture::new(crate::render2d::TextureHandle::new(0), "t", 8, 8);
        let missing = r#"<a><SubTexture name="x" x="1" y="2" width="3"/></a>"#;
        assert!(matches!(
            parse_sprite_sheet(missing, &texture),
            Err(ContentError::MissingAttribute { element: "SubTexture", attribute: "height" })
        ));

        let bad = r#"<a><SubTexture name="x" x="one" y="2" width="3" height="4"/></a>"#;
        assert!(matches!(
            parse_sprite_sheet(bad, &texture),
            Err(ContentError::InvalidNumber { attribute: "x", .. })
        ));

        assert!(matches!(
            parse_sprite_sheet("<a><b></a>", &texture),
            Err(ContentError::Xml(_))
        ));
    }

    #[test]
    fn bmfont_glyphs_and_line_height() {
        let texture = Texture::new(crate::render2d::TextureHandle::new(2), "font.png", 256, 128);
        let font = parse_bmfont(FONT, texture).unwrap();
        assert_eq!(font.line_height(), 36.0);
        assert_eq!(font.len(), 2);

        let b = font.char('B').unwrap();
        assert_eq!(b.advance, 15.0);
        assert_eq!(b.offset, Vec2::new(-1.0, 4.0));
        assert_eq!(b.size, Vec2::new(14.0, 20.0));
        assert_eq!(b.texture_coords.top_left, Vec2::new(0.25, 0.25));
        assert_eq!(b.texture_coords.bottom_right, Vec2::new(78.0 / 256.0, 52.0 / 128.0));
    }

    #[test]
    fn bmfont_requires_common() {
        let texture = Texture::new(crate::render2d::TextureHandle::new(0), "f", 8, 8);
        let err = parse_bmfont("<font><chars/></font>", texture).unwrap_err();
        assert!(matches!(err, ContentError::MissingElement("common")));
    }

    #[test]
    fn fonts_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("vanta-content-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let xml_path = dir.join("font.xml");
        std::fs::write(&xml_path, FONT).unwrap();

        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        let glyphs = builder
            .load_sprite_font("snow", &xml_path, "font.png")
            .unwrap()
            .len();
        assert_eq!(glyphs, 2);
        let content = builder.finish();
        assert!(content.font("snow").is_some());
        assert_eq!(content.texture("snow").unwrap().key(), "font.png");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_files_are_reported() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        builder.load_texture("sheet", "sheet.png").unwrap();

        let err = builder
            .load_sprite_sheet("sheet", "/definitely/not/here.xml")
            .unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));

        let err = builder.load_texture("bg", "bg.bmp").unwrap_err();
        assert!(matches!(err, ContentError::Render(RenderError::TextureLoad { .. })));
    }

    #[test]
    fn rgba_textures_are_registered() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        let t = builder.add_rgba_texture("dot", 1, 1, &[255; 4]).unwrap();
        assert!(builder.add_rgba_texture("bad", 2, 2, &[0; 3]).is_err());
        let content = builder.finish();
        assert_eq!(content.texture("dot"), Some(&t));
        assert_eq!(content.texture_count(), 1);
    }

    #[test]
    fn hand_built_fonts_register_their_atlas() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        let atlas = builder.add_rgba_texture("atlas", 4, 4, &[255; 64]).unwrap();
        let mut font = SpriteFont::new(atlas.clone(), 5.0);
        font.insert_glyph('1', Rect::new(0.0, 0.0, 3.0, 4.0), 4.0, Vec2::ZERO);
        builder.insert_font("digits", font);
        let content = builder.finish();

        assert_eq!(content.font("digits").unwrap().len(), 1);
        assert_eq!(content.texture("digits"), Some(&atlas));
        assert_eq!(content.font_count(), 1);
    }

    #[test]
    fn font_atlas_never_replaces_another_texture() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        let ui = builder.add_rgba_texture("ui", 1, 1, &[255; 4]).unwrap();
        let atlas = builder.add_rgba_texture("ui-font", 4, 4, &[255; 64]).unwrap();
        builder.insert_font("ui", SpriteFont::new(atlas.clone(), 5.0));
        builder.add_font("ui-font", FONT, atlas.clone()).unwrap();
        let content = builder.finish();

        assert_eq!(content.texture("ui"), Some(&ui));
        assert_eq!(content.font("ui").unwrap().texture(), &atlas);
        assert_eq!(content.texture("ui-font"), Some(&atlas));
        assert_eq!(content.texture_count(), 2);
    }
}
