//! Target binding: how tweens find the objects they animate and how a single
//! property of such an object is read and written.
//!
//! Targets are owned by the caller. A tween only holds a key; the world is
//! passed into every update, and a key that no longer resolves marks the
//! target as dead.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use super::events::CompletionQueue;

/// Keyed storage of animation targets.
pub trait TargetWorld {
    type Key: Copy + Eq + Hash + fmt::Debug;
    type Target: 'static;

    fn target(&self, key: Self::Key) -> Option<&Self::Target>;
    fn target_mut(&mut self, key: Self::Key) -> Option<&mut Self::Target>;

    /// Liveness check run before every tween update.
    fn is_alive(&self, key: Self::Key) -> bool {
        self.target(key).is_some()
    }
}

impl<K, T, S> TargetWorld for HashMap<K, T, S>
where
    K: Copy + Eq + Hash + fmt::Debug,
    T: 'static,
    S: BuildHasher,
{
    type Key = K;
    type Target = T;

    fn target(&self, key: K) -> Option<&T> {
        self.get(&key)
    }

    fn target_mut(&mut self, key: K) -> Option<&mut T> {
        self.get_mut(&key)
    }
}

impl<K, T> TargetWorld for BTreeMap<K, T>
where
    K: Copy + Ord + Hash + fmt::Debug,
    T: 'static,
{
    type Key = K;
    type Target = T;

    fn target(&self, key: K) -> Option<&T> {
        self.get(&key)
    }

    fn target_mut(&mut self, key: K) -> Option<&mut T> {
        self.get_mut(&key)
    }
}

/// Typed accessor pair for one named property of `T`, resolved once at
/// construction.
pub struct Property<T, V> {
    name: Cow<'static, str>,
    get: Box<dyn Fn(&T) -> V>,
    set: Box<dyn Fn(&mut T, V)>,
}

impl<T, V> Property<T, V> {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        get: impl Fn(&T) -> V + 'static,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            get: Box::new(get),
            set: Box::new(set),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn get(&self, target: &T) -> V {
        (self.get)(target)
    }

    #[inline]
    pub fn set(&self, target: &mut T, value: V) {
        (self.set)(target, value)
    }
}

impl<T: 'static> Property<T, f32> {
    /// Bind an integer property. Interpolated floats are floored on write.
    pub fn rounded(
        name: impl Into<Cow<'static, str>>,
        get: fn(&T) -> i32,
        set: fn(&mut T, i32),
    ) -> Self {
        Self::new(name, move |t| get(t) as f32, move |t, v: f32| set(t, v.floor() as i32))
    }
}

impl<T, V> fmt::Debug for Property<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&self.name).finish()
    }
}

/// Everything an update pass needs from the driver loop.
pub struct TickContext<'a, W: TargetWorld> {
    pub world: &'a mut W,
    pub completions: &'a mut CompletionQueue,
}

impl<'a, W: TargetWorld> TickContext<'a, W> {
    pub fn new(world: &'a mut W, completions: &'a mut CompletionQueue) -> Self {
        Self { world, completions }
    }
}
