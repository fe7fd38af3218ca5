// systems/manager.rs
//
// Registry of top-level tweens and sequences.
//
// Usage:
//   let mut tweens = TweenManager::new();
//   let id = tweens.add(Tween::new(key, 0.5, TweenConfig::new())?.with_plugin(plugin));
//   tweens.tick(dt, &mut world);  // Advances everything, then runs completions
//
// Components are ticked in insertion order. Completion callbacks are deferred
// until every component has been updated and finished ones removed.

use std::collections::BTreeMap;

use crate::api::config::ManagerConfig;
use crate::api::types::TweenId;
use crate::components::{Animation, Component, Sequence, Tween};
use crate::core::events::{CompletionQueue, TweenEvent};
use crate::core::target::{TargetWorld, TickContext};
use crate::extensions::overwrite::overwrite;

/// Selects components for group operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenFilter<'a, K> {
    All,
    Id(TweenId),
    /// Components whose string id equals this.
    Group(&'a str),
    IntGroup(i32),
    /// Components animating this target, nested sequence children included.
    Target(K),
}

/// Owns and drives top-level components.
pub struct TweenManager<W: TargetWorld> {
    components: BTreeMap<TweenId, Component<W>>,
    next_id: u32,
    completions: CompletionQueue,
    config: ManagerConfig,
}

impl<W: TargetWorld> Default for TweenManager<W> {
    fn default() -> Self {
        Self::with_config(ManagerConfig::default())
    }
}

impl<W: TargetWorld> TweenManager<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            components: BTreeMap::new(),
            next_id: 0,
            completions: CompletionQueue::new(),
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn time_scale(&self) -> f32 {
        self.config.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.config.time_scale = time_scale;
    }

    /// Register a tween. With the overwrite policy enabled, older tweens lose
    /// the properties this one animates.
    pub fn add_tween(&mut self, tween: Tween<W>) -> TweenId {
        overwrite(&self.config.overwrite, &tween, self.components.values_mut());
        self.insert(Component::Tween(tween))
    }

    pub fn add_sequence(&mut self, sequence: Sequence<W>) -> TweenId {
        self.insert(Component::Sequence(sequence))
    }

    pub fn add(&mut self, component: impl Into<Component<W>>) -> TweenId {
        match component.into() {
            Component::Tween(tween) => self.add_tween(tween),
            Component::Sequence(sequence) => self.add_sequence(sequence),
        }
    }

    fn insert(&mut self, component: Component<W>) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.components.insert(id, component);
        id
    }

    /// Take a component out without killing it, e.g. to put it in a sequence.
    pub fn detach(&mut self, id: TweenId) -> Option<Component<W>> {
        self.components.remove(&id)
    }

    pub fn get(&self, id: TweenId) -> Option<&Component<W>> {
        self.components.get(&id)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Component<W>> {
        self.components.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TweenId> + '_ {
        self.components.keys().copied()
    }

    /// Advance every component by `dt` seconds (scaled by the global and the
    /// component's own time scale), drop finished ones and dispatch completion
    /// callbacks. Returns the number of components that completed this tick.
    pub fn tick(&mut self, dt: f32, world: &mut W) -> usize {
        let dt = dt * self.config.time_scale;
        let mut completed = 0;
        let mut finished = Vec::new();
        let mut ctx = TickContext::new(world, &mut self.completions);

        for (&id, component) in self.components.iter_mut() {
            let was_complete = component.state().is_complete();
            let scaled = dt * component.state().time_scale();
            let done = component.update(scaled, false, false, &mut ctx);

            let state = component.state();
            if !was_complete && state.is_complete() {
                completed += 1;
            }
            if state.is_destroyed() || (done && state.auto_kill()) {
                component.kill();
                finished.push(id);
            }
        }

        for id in finished {
            self.components.remove(&id);
            log::debug!("removed finished component {:?}", id);
        }
        self.completions.dispatch();
        completed
    }

    /// Completion events dispatched by the latest tick, oldest first. Events
    /// not drained are dropped by the next tick.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = TweenEvent> + '_ {
        self.completions.drain_dispatched()
    }

    // -- Group operations --

    fn matches(id: TweenId, component: &Component<W>, filter: TweenFilter<'_, W::Key>) -> bool {
        match filter {
            TweenFilter::All => true,
            TweenFilter::Id(wanted) => id == wanted,
            TweenFilter::Group(group) => component.state().id() == Some(group),
            TweenFilter::IntGroup(group) => component.state().int_id() == Some(group),
            TweenFilter::Target(key) => component.is_linked_to(key),
        }
    }

    fn for_each(
        &mut self,
        filter: TweenFilter<'_, W::Key>,
        mut f: impl FnMut(&mut Component<W>),
    ) -> usize {
        let mut count = 0;
        for (&id, component) in self.components.iter_mut() {
            if Self::matches(id, component, filter) {
                f(component);
                count += 1;
            }
        }
        count
    }

    /// Same as `for_each`, for operations that touch targets. Completions
    /// raised by the operation are dispatched before returning and components
    /// it destroyed are removed.
    fn for_each_in_world(
        &mut self,
        filter: TweenFilter<'_, W::Key>,
        world: &mut W,
        mut f: impl FnMut(&mut Component<W>, &mut TickContext<'_, W>),
    ) -> usize {
        let mut count = 0;
        let mut ctx = TickContext::new(world, &mut self.completions);
        for (&id, component) in self.components.iter_mut() {
            if Self::matches(id, component, filter) {
                f(component, &mut ctx);
                count += 1;
            }
        }
        self.components.retain(|_, c| !c.state().is_destroyed());
        self.completions.dispatch();
        count
    }

    pub fn play(&mut self, filter: TweenFilter<'_, W::Key>) -> usize {
        self.for_each(filter, |c| c.play())
    }

    pub fn pause(&mut self, filter: TweenFilter<'_, W::Key>) -> usize {
        self.for_each(filter, |c| c.pause())
    }

    pub fn reverse(&mut self, filter: TweenFilter<'_, W::Key>) -> usize {
        self.for_each(filter, |c| c.reverse())
    }

    pub fn play_forward(&mut self, filter: TweenFilter<'_, W::Key>) -> usize {
        self.for_each(filter, |c| c.play_forward())
    }

    pub fn play_backwards(&mut self, filter: TweenFilter<'_, W::Key>) -> usize {
        self.for_each(filter, |c| c.play_backwards())
    }

    /// Kill and remove matching components.
    pub fn kill(&mut self, filter: TweenFilter<'_, W::Key>) -> usize {
        let count = self.for_each(filter, |c| c.kill());
        self.components.retain(|_, c| !c.state().is_destroyed());
        count
    }

    pub fn complete(&mut self, filter: TweenFilter<'_, W::Key>, world: &mut W) -> usize {
        self.for_each_in_world(filter, world, |c, ctx| c.complete(ctx))
    }

    pub fn rewind(&mut self, filter: TweenFilter<'_, W::Key>, world: &mut W) -> usize {
        self.for_each_in_world(filter, world, |c, ctx| c.rewind(ctx))
    }

    pub fn restart(&mut self, filter: TweenFilter<'_, W::Key>, world: &mut W) -> usize {
        self.for_each_in_world(filter, world, |c, ctx| c.restart(ctx))
    }

    pub fn go_to(&mut self, filter: TweenFilter<'_, W::Key>, time: f32, world: &mut W) -> usize {
        self.for_each_in_world(filter, world, |c, ctx| {
            c.go_to(time, false, ctx);
        })
    }

    // -- Introspection --

    /// True if a running component animates `key`.
    pub fn is_tweening(&self, key: W::Key) -> bool {
        self.components.values().any(|c| c.is_tweening(key))
    }

    /// True if any component animates `key`, running or not.
    pub fn is_linked_to(&self, key: W::Key) -> bool {
        self.components.values().any(|c| c.is_linked_to(key))
    }

    /// Ids of the top-level components linked to `key`.
    pub fn tweens_of(&self, key: W::Key) -> Vec<TweenId> {
        self.components
            .iter()
            .filter(|(_, c)| c.is_linked_to(key))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Every distinct target currently animated.
    pub fn targets(&self) -> Vec<W::Key> {
        let mut out = Vec::new();
        for component in self.components.values() {
            component.fill_targets(&mut out);
        }
        out
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Kill everything and forget pending completions.
    pub fn clear(&mut self) {
        for component in self.components.values_mut() {
            component.kill();
        }
        self.components.clear();
        self.completions.clear();
    }
}

impl<W: TargetWorld> std::fmt::Debug for TweenManager<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenManager")
            .field("components", &self.components)
            .field("completions", &self.completions)
            .field("config", &self.config)
            .finish()
    }
}
