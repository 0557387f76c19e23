//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. Everything in the 2D renderer works in *pixel
//! space*: the origin is the top-left corner of the window, +x points right
//! and +y points down.
//!
//! ## Collision
//!
//! Two coarse, discrete overlap tests are provided:
//!
//! - [`Rect::intersects`]: axis-aligned bounding-box overlap.
//! - [`CircleCollider::intersects`]: center distance against summed radii.
//!
//! Neither is swept. An entity moving faster than its own size per frame can
//! tunnel through a thin collider between two updates.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// An axis-aligned rectangle in pixel space.
///
/// `x`/`y` is the top-left corner. `Rect` is `Copy`, so an entity that wants
/// its own movable rectangle derived from a shared [`Sprite`](crate::render2d::Sprite)
/// template just copies it out; the template is never touched.
///
/// Width and height are expected to be non-negative. Nothing clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// A zero-sized rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of the given size with its top-left corner at the origin.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Return a copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Corners in draw order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.right(), self.y),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.x, self.bottom()),
        ]
    }

    /// AABB overlap test. Rectangles that merely share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// A bounding circle derived from an entity's current [`Rect`].
///
/// Call [`update`](CircleCollider::update) once per tick, before any
/// collision queries for that tick. A collider that has never been updated
/// is a zero-radius circle at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CircleCollider {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl CircleCollider {
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    /// Build a collider already fitted to `rect`.
    pub fn from_rect(rect: &Rect) -> Self {
        let mut collider = Self::default();
        collider.update(rect);
        collider
    }

    /// Refit to `rect`: the radius is half the smaller side, the center is the
    /// rectangle's center.
    pub fn update(&mut self, rect: &Rect) {
        self.radius = rect.width.min(rect.height) * 0.5;
        let center = rect.center();
        self.x = center.x;
        self.y = center.y;
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// True iff the centers are closer than the sum of the radii.
    pub fn intersects(&self, other: &CircleCollider) -> bool {
        self.center().distance(other.center()) < self.radius + other.radius
    }
}

/// Rotate `point` around `origin` by `angle` radians.
///
/// With +y pointing down, a positive angle turns clockwise on screen.
pub fn rotate_about(point: Vec2, origin: Vec2, angle: f32) -> Vec2 {
    origin + Vec2::from_angle(angle).rotate(point - origin)
}
