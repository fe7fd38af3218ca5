use super::target::TargetWorld;

/// Key of a target inside a [`TargetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetKey(pub u32);

/// Simple target storage using a flat Vec.
/// Designed for small-to-medium target counts (hundreds, not millions).
pub struct TargetStore<T> {
    targets: Vec<(TargetKey, T)>,
    next_key: u32,
}

impl<T> TargetStore<T> {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a store with a specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            targets: Vec::with_capacity(capacity),
            next_key: 0,
        }
    }

    /// Add a target and return its key.
    pub fn spawn(&mut self, target: T) -> TargetKey {
        let key = TargetKey(self.next_key);
        self.next_key += 1;
        self.targets.push((key, target));
        key
    }

    /// Remove a target. Tweens still pointing at it will kill themselves on
    /// their next update.
    pub fn despawn(&mut self, key: TargetKey) -> Option<T> {
        let idx = self.targets.iter().position(|(k, _)| *k == key)?;
        Some(self.targets.swap_remove(idx).1)
    }

    pub fn get(&self, key: TargetKey) -> Option<&T> {
        self.targets.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, key: TargetKey) -> Option<&mut T> {
        self.targets.iter_mut().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    /// Iterate over all targets.
    pub fn iter(&self) -> impl Iterator<Item = (TargetKey, &T)> {
        self.targets.iter().map(|(k, t)| (*k, t))
    }

    /// Number of targets in the store.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<T> Default for TargetStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> TargetWorld for TargetStore<T> {
    type Key = TargetKey;
    type Target = T;

    fn target(&self, key: TargetKey) -> Option<&T> {
        self.get(key)
    }

    fn target_mut(&mut self, key: TargetKey) -> Option<&mut T> {
        self.get_mut(key)
    }
}
