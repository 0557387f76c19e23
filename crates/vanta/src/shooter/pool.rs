//! Slot pool with an index free list.
//!
//! Released slots keep their memory and go on a stack of free indices, so
//! [`Pool::insert`] and [`Pool::release`] are O(1) and the slot vector only
//! grows to the peak number of live items.

/// Fixed slots, each live or free.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    live: Vec<bool>,
    free: Vec<usize>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` in the most recently released slot, or in a new slot
    /// when none is free. Returns the slot index.
    pub fn insert(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = value;
                self.live[index] = true;
                index
            }
            None => {
                self.slots.push(value);
                self.live.push(true);
                self.slots.len() - 1
            }
        }
    }

    /// Free slot `index`. Releasing a slot that is already free does nothing.
    pub fn release(&mut self, index: usize) {
        if self.is_live(index) {
            self.live[index] = false;
            self.free.push(index);
        }
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.live.get(index).copied().unwrap_or(false)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.is_live(index).then(|| &self.slots[index])
    }

    /// Live items.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots
            .iter()
            .zip(&self.live)
            .filter_map(|(item, &live)| live.then_some(item))
    }

    /// Run `keep` on every live item and release the ones it returns
    /// `false` for.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for index in 0..self.slots.len() {
            if self.live[index] && !keep(&mut self.slots[index]) {
                self.live[index] = false;
                self.free.push(index);
            }
        }
    }

    /// Release the first live item matching `hit`. Returns whether one was
    /// found.
    pub fn release_first(&mut self, mut hit: impl FnMut(&T) -> bool) -> bool {
        let found = (0..self.slots.len()).find(|&i| self.live[i] && hit(&self.slots[i]));
        if let Some(index) = found {
            self.release(index);
        }
        found.is_some()
    }
}
