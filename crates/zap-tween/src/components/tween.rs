//! A tween: one target, one or more property plugins, one shared timeline.

use std::fmt;
use std::rc::Rc;

use glam::Vec3;

use crate::api::config::TweenConfig;
use crate::api::types::{CallbackKind, LoopType};
use crate::core::error::{Result, TweenError};
use crate::core::events::TweenEvent;
use crate::core::state::ComponentState;
use crate::core::target::{TargetWorld, TickContext};
use crate::extensions::easing::Easing;
use crate::plugins::{LoopInfo, Plugin, TweenSettings};
use super::animation::Animation;

pub struct Tween<W: TargetWorld> {
    state: ComponentState,
    target: W::Key,
    plugins: Vec<Box<dyn Plugin<W::Target>>>,
    settings: TweenSettings,
    delay: f32,
    /// Delay time consumed so far.
    elapsed_delay: f32,
    /// Delay still to honour; zero once the delay has been served or skipped.
    delay_count: f32,
    duration_resolved: bool,
}

impl<W: TargetWorld> Tween<W> {
    /// `duration` is in seconds, or in units per second when the config is
    /// speed-based.
    pub fn new(target: W::Key, duration: f32, config: TweenConfig) -> Result<Self> {
        if config.speed_based {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(TweenError::InvalidSpeed(duration));
            }
        } else if !(duration.is_finite() && duration >= 0.0) {
            return Err(TweenError::InvalidDuration(duration));
        }
        if !(config.delay.is_finite() && config.delay >= 0.0) {
            return Err(TweenError::InvalidDuration(config.delay));
        }

        let settings = TweenSettings {
            duration,
            easing: config.easing,
            ease_shape: config.ease_shape,
            is_from: config.is_from,
            speed_based: config.speed_based,
        };
        Ok(Self {
            state: ComponentState::new(duration, &config.playback),
            target,
            plugins: Vec::new(),
            settings,
            delay: config.delay,
            elapsed_delay: 0.0,
            delay_count: config.delay,
            duration_resolved: !config.speed_based,
        })
    }

    pub fn with_plugin(mut self, plugin: impl Plugin<W::Target> + 'static) -> Self {
        self.add_plugin(Box::new(plugin));
        self
    }

    pub fn add_plugin(&mut self, mut plugin: Box<dyn Plugin<W::Target>>) {
        plugin.attach(&self.settings);
        self.plugins.push(plugin);
        self.state.empty = false;
    }

    pub fn with_callback(mut self, kind: CallbackKind, callback: impl Fn(&TweenEvent) + 'static) -> Self {
        self.state.set_callback(kind, Rc::new(callback));
        self
    }

    pub fn target(&self) -> W::Key {
        self.target
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn elapsed_delay(&self) -> f32 {
        self.elapsed_delay
    }

    pub fn is_from(&self) -> bool {
        self.settings.is_from
    }

    pub fn is_speed_based(&self) -> bool {
        self.settings.speed_based
    }

    /// False for speed-based tweens whose duration is still the speed value.
    pub fn is_duration_resolved(&self) -> bool {
        self.duration_resolved
    }

    pub fn easing(&self) -> Easing {
        self.settings.easing
    }

    /// Change the ease of every plugin that doesn't carry its own.
    pub fn set_easing(&mut self, easing: Easing) {
        self.settings.easing = easing;
        for plugin in &mut self.plugins {
            if !plugin.core().has_custom_ease() {
                plugin.set_easing(easing);
            }
        }
    }

    /// Compute the duration of a speed-based tween from the target's current
    /// state without starting it. Returns the (possibly unchanged) duration.
    pub fn resolve_speed_based_duration(&mut self, world: &W) -> f32 {
        if self.duration_resolved {
            return self.state.duration;
        }
        let Some(target) = world.target(self.target) else {
            return self.state.duration;
        };
        let mut duration = 0.0_f32;
        for plugin in &mut self.plugins {
            let d = plugin.preview_duration(target, &self.settings);
            plugin.core_mut().set_duration(d);
            duration = duration.max(d);
        }
        self.state.set_duration(duration);
        self.duration_resolved = true;
        duration
    }

    /// Point at fraction `t` of the first path plugin's path. Initialises the
    /// plugins if needed but fires no callback.
    pub fn point_on_path(&mut self, t: f32, world: &W) -> Option<Vec3> {
        let index = self.plugins.iter().position(|p| p.is_path())?;
        self.prepare(world);
        self.plugins[index].path_point(t)
    }

    /// Play from the start of the delay-free part.
    pub fn play_skipping_delay(&mut self) {
        self.skip_delay();
        self.state.play();
    }

    pub fn rewind_skipping_delay(&mut self, ctx: &mut TickContext<'_, W>) {
        self.rewind_impl(false, true, false, ctx);
    }

    pub fn restart_skipping_delay(&mut self, ctx: &mut TickContext<'_, W>) {
        self.rewind_impl(true, true, false, ctx);
    }

    /// Drop every plugin animating one of `properties`. Kills the tween if
    /// none are left. Returns how many plugins were removed.
    pub(crate) fn remove_plugins_for(&mut self, properties: &[&str]) -> usize {
        let before = self.plugins.len();
        self.plugins.retain(|p| !properties.contains(&p.property()));
        let removed = before - self.plugins.len();
        if self.plugins.is_empty() && removed > 0 {
            self.kill();
        }
        removed
    }

    pub(crate) fn property_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.property()).collect()
    }

    fn skip_delay(&mut self) {
        if self.delay_count > 0.0 {
            self.delay_count = 0.0;
            self.elapsed_delay = self.delay;
        }
    }

    fn loop_info(&self) -> LoopInfo {
        LoopInfo {
            loop_type: self.state.loop_type,
            incremental_loops: self.state.incremental_loops(),
        }
    }

    /// Capture plugin values once and settle speed-based durations.
    fn prepare(&mut self, world: &W) {
        if self.state.startup_done {
            return;
        }
        let Some(target) = world.target(self.target) else {
            return;
        };
        self.state.startup_done = true;
        for plugin in &mut self.plugins {
            plugin.startup(target, &self.settings);
        }
        if self.settings.speed_based {
            let duration = self
                .plugins
                .iter()
                .map(|p| p.core().duration())
                .fold(0.0, f32::max);
            self.state.set_duration(duration);
            self.duration_resolved = true;
        }
    }

    fn start(&mut self, world: &W) {
        self.prepare(world);
        self.state.fire_start();
    }

    /// Start on the first update; later updates retry a startup that found no
    /// target.
    fn ensure_started(&mut self, world: &W) {
        if self.state.has_started {
            self.prepare(world);
        } else {
            self.start(world);
        }
    }

    fn rewind_impl(&mut self, play: bool, skip_delay: bool, silent: bool, ctx: &mut TickContext<'_, W>) {
        if self.state.destroyed || !self.state.enabled {
            return;
        }
        self.state.ignore_callbacks = silent;
        if !self.state.has_started {
            self.start(ctx.world);
        }
        self.state.reset_playhead();
        if skip_delay {
            self.delay_count = 0.0;
            self.elapsed_delay = self.delay;
        } else {
            self.delay_count = self.delay;
            self.elapsed_delay = 0.0;
        }
        if let Some(target) = ctx.world.target_mut(self.target) {
            for plugin in &mut self.plugins {
                if plugin.core().is_ease_reversed() {
                    plugin.reverse_ease();
                }
                plugin.rewind(target);
            }
        }
        if self.state.full_elapsed != self.state.prev_full_elapsed {
            self.state.fire(CallbackKind::Update);
            self.state.fire(CallbackKind::Rewound);
        }
        self.state.prev_full_elapsed = self.state.full_elapsed;
        if play {
            self.state.play();
        } else {
            self.state.pause();
        }
        self.state.ignore_callbacks = false;
    }
}

impl<W: TargetWorld> Animation<W> for Tween<W> {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn update(&mut self, delta: f32, force: bool, startup: bool, ctx: &mut TickContext<'_, W>) -> bool {
        if self.state.destroyed || self.state.empty {
            return true;
        }
        if !ctx.world.is_alive(self.target) {
            log::debug!("target {:?} is gone, killing its tween", self.target);
            self.kill();
            return true;
        }
        if let Some(result) = self.state.gate(force) {
            return result;
        }

        self.state.ignore_callbacks = startup;
        if startup {
            self.skip_delay();
        }

        if self.delay_count == 0.0 {
            self.ensure_started(ctx.world);
            self.state.advance(delta);
        } else {
            if self.state.time_scale != 0.0 {
                self.elapsed_delay += delta / self.state.time_scale;
            }
            if self.elapsed_delay < self.delay_count {
                self.state.ignore_callbacks = false;
                return false;
            }
            let overflow = if self.state.reversed {
                0.0
            } else {
                (self.elapsed_delay - self.delay_count) * self.state.time_scale
            };
            self.resolve_speed_based_duration(ctx.world);
            self.state.full_elapsed = overflow.min(self.state.full_duration);
            self.state.elapsed = self.state.full_elapsed;
            self.elapsed_delay = self.delay;
            self.delay_count = 0.0;
            self.ensure_started(ctx.world);
        }

        let settled = self.state.settle();

        let looping_back = self.state.looping_back;
        let yoyo_inverse = self.state.loop_type == LoopType::YoyoInverse;
        let plug_elapsed = if looping_back {
            self.state.duration - self.state.elapsed
        } else {
            self.state.elapsed
        };
        let loops = self.loop_info();
        if let Some(target) = ctx.world.target_mut(self.target) {
            for plugin in &mut self.plugins {
                let reversed = plugin.core().is_ease_reversed();
                if (!looping_back && reversed) || (looping_back && yoyo_inverse && !reversed) {
                    plugin.reverse_ease();
                }
                plugin.update(plug_elapsed, target, loops);
            }
        }

        self.state.finish_update(settled, ctx.completions);
        settled.complete
    }

    fn go_to_with(&mut self, time: f32, play: bool, force: bool, silent: bool, ctx: &mut TickContext<'_, W>) -> bool {
        if !self.state.enabled || self.state.destroyed {
            return false;
        }
        self.resolve_speed_based_duration(ctx.world);
        let time = time.clamp(0.0, self.state.full_duration);
        if !force && time == self.state.full_elapsed {
            return self.state.complete;
        }
        self.state.full_elapsed = time;
        self.skip_delay();
        self.update(0.0, true, silent, ctx);
        if !self.state.complete && play {
            self.state.play();
        }
        self.state.complete
    }

    fn rewind_with(&mut self, play: bool, silent: bool, ctx: &mut TickContext<'_, W>) {
        self.rewind_impl(play, false, silent, ctx);
    }

    fn complete(&mut self, ctx: &mut TickContext<'_, W>) {
        if !self.state.enabled || self.state.destroyed || self.state.loops < 0 {
            return;
        }
        self.skip_delay();
        self.state.full_elapsed = self.state.full_duration;
        self.update(0.0, true, false, ctx);
        if self.state.auto_kill {
            self.kill();
        }
    }

    fn kill(&mut self) {
        if self.state.kill() {
            self.plugins.clear();
        }
    }

    fn set_incremental(&mut self, diff: i32) {
        for plugin in &mut self.plugins {
            plugin.set_incremental(diff);
        }
    }

    fn is_tweening(&self, key: W::Key) -> bool {
        !self.state.destroyed && self.state.enabled && !self.state.paused && self.target == key
    }

    fn is_linked_to(&self, key: W::Key) -> bool {
        !self.state.destroyed && self.target == key
    }

    fn fill_targets(&self, out: &mut Vec<W::Key>) {
        if !self.state.destroyed && !out.contains(&self.target) {
            out.push(self.target);
        }
    }

    fn fill_plugins<'a>(&'a self, out: &mut Vec<&'a dyn Plugin<W::Target>>) {
        for plugin in &self.plugins {
            out.push(plugin.as_ref());
        }
    }
}

impl<W: TargetWorld> fmt::Debug for Tween<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target)
            .field("plugins", &self.property_names())
            .field("delay", &self.delay)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::core::events::CompletionQueue;
    use crate::core::target::Property;
    use crate::plugins::ValuePlugin;

    #[derive(Debug, Default)]
    struct Box2 {
        x: f32,
        y: f32,
    }

    type World = HashMap<u32, Box2>;

    fn x() -> Property<Box2, f32> {
        Property::new("x", |b: &Box2| b.x, |b, v| b.x = v)
    }

    fn y() -> Property<Box2, f32> {
        Property::new("y", |b: &Box2| b.y, |b, v| b.y = v)
    }

    fn world() -> World {
        let mut w = HashMap::new();
        w.insert(1, Box2::default());
        w
    }

    fn tween_x(to: f32, duration: f32, config: TweenConfig) -> Tween<World> {
        Tween::new(1, duration, config)
            .unwrap()
            .with_plugin(ValuePlugin::new(x(), to).unwrap())
    }

    fn step(tween: &mut Tween<World>, w: &mut World, q: &mut CompletionQueue, dt: f32) -> bool {
        let mut ctx = TickContext::new(w, q);
        tween.update(dt, false, false, &mut ctx)
    }

    fn recorder() -> (Rc<RefCell<Vec<CallbackKind>>>, impl Fn(&TweenEvent) + Clone) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |e: &TweenEvent| sink.borrow_mut().push(e.kind))
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(matches!(
            Tween::<World>::new(1, -1.0, TweenConfig::new()),
            Err(TweenError::InvalidDuration(_))
        ));
        assert!(matches!(
            Tween::<World>::new(1, 0.0, TweenConfig::new().speed_based()),
            Err(TweenError::InvalidSpeed(_))
        ));
        assert!(Tween::<World>::new(1, 0.0, TweenConfig::new()).is_ok());
    }

    #[test]
    fn linear_progress_and_completion() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(10.0, 2.0, TweenConfig::new());

        assert!(!step(&mut tween, &mut w, &mut q, 0.5));
        assert!((w[&1].x - 2.5).abs() < 1e-4);
        assert!(step(&mut tween, &mut w, &mut q, 2.0));
        assert_eq!(w[&1].x, 10.0);
        assert!(tween.state().is_complete());
        // Already complete and moving forward.
        assert!(step(&mut tween, &mut w, &mut q, 0.1));
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn dead_target_kills_tween() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new());
        step(&mut tween, &mut w, &mut q, 0.2);
        w.remove(&1);
        assert!(step(&mut tween, &mut w, &mut q, 0.2));
        assert!(tween.state().is_destroyed());
        assert_eq!(tween.plugin_count(), 0);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn delay_holds_then_overflows() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let (log, cb) = recorder();
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new().with_delay(0.5))
            .with_callback(CallbackKind::Start, cb);

        step(&mut tween, &mut w, &mut q, 0.4);
        assert_eq!(w[&1].x, 0.0);
        assert!(log.borrow().is_empty());

        step(&mut tween, &mut w, &mut q, 0.2);
        assert!((tween.state().full_elapsed() - 0.1).abs() < 1e-5);
        assert!((w[&1].x - 1.0).abs() < 1e-3);
        assert_eq!(*log.borrow(), vec![CallbackKind::Start]);
    }

    #[test]
    fn go_to_is_idempotent() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let (log, cb) = recorder();
        let mut tween = tween_x(10.0, 2.0, TweenConfig::new()).with_callback(CallbackKind::Update, cb);
        let mut ctx = TickContext::new(&mut w, &mut q);

        tween.go_to(1.0, false, &mut ctx);
        let first = ctx.world[&1].x;
        let updates = log.borrow().len();
        tween.go_to(1.0, false, &mut ctx);
        assert_eq!(ctx.world[&1].x, first);
        assert_eq!(log.borrow().len(), updates);
        assert!((first - 5.0).abs() < 1e-4);
    }

    #[test]
    fn go_to_matches_incremental_updates() {
        let config = || TweenConfig::new().with_loops(3, LoopType::Yoyo).with_easing(Easing::QuadIn);
        let mut stepped_world = world();
        let mut q = CompletionQueue::new();
        let mut stepped = tween_x(10.0, 1.0, config());
        for _ in 0..13 {
            step(&mut stepped, &mut stepped_world, &mut q, 0.1);
        }

        let mut jumped_world = world();
        let mut jumped = tween_x(10.0, 1.0, config());
        let mut ctx = TickContext::new(&mut jumped_world, &mut q);
        jumped.restart(&mut ctx);
        jumped.go_to(stepped.state().full_elapsed(), false, &mut ctx);

        assert_eq!(jumped.state().completed_loops(), stepped.state().completed_loops());
        assert!((jumped_world[&1].x - stepped_world[&1].x).abs() < 1e-3);
    }

    #[test]
    fn yoyo_plays_back_with_the_same_ease() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let config = TweenConfig::new().with_loops(2, LoopType::Yoyo).with_easing(Easing::QuadIn);
        let mut tween = tween_x(10.0, 1.0, config);

        step(&mut tween, &mut w, &mut q, 1.25);
        assert!(tween.state().is_looping_back());
        // QuadIn at 0.75 of the way back: 10 * 0.75^2.
        assert!((w[&1].x - 5.625).abs() < 1e-3);
    }

    #[test]
    fn yoyo_inverse_mirrors_the_ease_on_the_way_back() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let config = TweenConfig::new()
            .with_loops(2, LoopType::YoyoInverse)
            .with_easing(Easing::QuadIn);
        let mut tween = tween_x(10.0, 1.0, config);

        step(&mut tween, &mut w, &mut q, 1.25);
        // QuadOut at 0.75: 10 * (1 - 0.25^2).
        assert!((w[&1].x - 9.375).abs() < 1e-3);
        step(&mut tween, &mut w, &mut q, 0.0);
        let mut ctx = TickContext::new(&mut w, &mut q);
        tween.go_to(0.5, true, &mut ctx);
        assert!((ctx.world[&1].x - 2.5).abs() < 1e-3);
    }

    #[test]
    fn incremental_loops_accumulate_without_overshoot() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let config = TweenConfig::new().with_loops(3, LoopType::Incremental);
        let mut tween = tween_x(10.0, 1.0, config);

        step(&mut tween, &mut w, &mut q, 1.5);
        assert!((w[&1].x - 15.0).abs() < 1e-3);
        step(&mut tween, &mut w, &mut q, 0.5);
        assert!((w[&1].x - 20.0).abs() < 1e-3);
        assert!(step(&mut tween, &mut w, &mut q, 5.0));
        assert!((w[&1].x - 30.0).abs() < 1e-3);
    }

    #[test]
    fn switching_away_from_incremental_restores_baseline() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let config = TweenConfig::new().with_loops(-1, LoopType::Incremental);
        let mut tween = tween_x(10.0, 1.0, config);

        step(&mut tween, &mut w, &mut q, 2.5);
        assert!((w[&1].x - 25.0).abs() < 1e-3);
        tween.state_mut().set_loop_type(LoopType::Restart);
        step(&mut tween, &mut w, &mut q, 0.25);
        assert!((w[&1].x - 7.5).abs() < 1e-3);
    }

    #[test]
    fn rewind_restores_start_and_pauses() {
        let mut w = world();
        w.get_mut(&1).unwrap().x = 4.0;
        let mut q = CompletionQueue::new();
        let (log, cb) = recorder();
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new())
            .with_callback(CallbackKind::Rewound, cb.clone())
            .with_callback(CallbackKind::Pause, cb);

        step(&mut tween, &mut w, &mut q, 0.5);
        let mut ctx = TickContext::new(&mut w, &mut q);
        tween.rewind(&mut ctx);
        assert_eq!(ctx.world[&1].x, 4.0);
        assert!(tween.state().is_paused());
        assert_eq!(*log.borrow(), vec![CallbackKind::Rewound, CallbackKind::Pause]);
    }

    #[test]
    fn from_tween_animates_back_to_current() {
        let mut w = world();
        w.get_mut(&1).unwrap().x = 3.0;
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(13.0, 1.0, TweenConfig::new().from());

        step(&mut tween, &mut w, &mut q, 0.0);
        assert_eq!(w[&1].x, 13.0);
        step(&mut tween, &mut w, &mut q, 1.0);
        assert_eq!(w[&1].x, 3.0);
    }

    #[test]
    fn speed_based_duration_follows_distance() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(20.0, 10.0, TweenConfig::new().speed_based());
        assert!(!tween.is_duration_resolved());
        assert_eq!(tween.resolve_speed_based_duration(&w), 2.0);
        assert_eq!(tween.state().full_duration(), 2.0);

        step(&mut tween, &mut w, &mut q, 1.0);
        assert!((w[&1].x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn speed_based_delay_overflow_stays_inside_the_real_duration() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(20.0, 10.0, TweenConfig::new().speed_based().with_delay(1.0));

        assert!(step(&mut tween, &mut w, &mut q, 6.0));
        assert_eq!(tween.state().full_duration(), 2.0);
        assert_eq!(tween.state().full_elapsed(), 2.0);
        assert_eq!(tween.state().completed_loops(), 1);
        assert_eq!(w[&1].x, 20.0);
    }

    #[test]
    fn speed_based_go_to_uses_the_real_duration() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        // 20 units at 1 unit/s: 20 seconds, longer than the speed value.
        let mut tween = tween_x(20.0, 1.0, TweenConfig::new().speed_based());
        let mut ctx = TickContext::new(&mut w, &mut q);
        assert!(!tween.go_to(5.0, false, &mut ctx));
        assert_eq!(tween.state().full_elapsed(), 5.0);
        assert!((ctx.world[&1].x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn startup_waits_for_a_missing_target() {
        let mut w = World::new();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(20.0, 1.0, TweenConfig::new());
        {
            let mut ctx = TickContext::new(&mut w, &mut q);
            tween.rewind(&mut ctx);
        }
        tween.play();

        w.insert(1, Box2 { x: 10.0, y: 0.0 });
        step(&mut tween, &mut w, &mut q, 0.5);
        assert!((w[&1].x - 15.0).abs() < 1e-4);
    }

    #[test]
    fn complete_jumps_to_the_end_and_kills() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new().with_loops(2, LoopType::Yoyo).with_delay(3.0));
        let mut ctx = TickContext::new(&mut w, &mut q);
        tween.complete(&mut ctx);
        assert_eq!(ctx.world[&1].x, 0.0);
        assert!(tween.state().is_destroyed());
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn infinite_tweens_ignore_complete() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new().with_loops(-1, LoopType::Restart));
        let mut ctx = TickContext::new(&mut w, &mut q);
        tween.complete(&mut ctx);
        assert!(!tween.state().is_complete());
        assert!(!tween.state().is_destroyed());
    }

    #[test]
    fn removing_last_plugin_kills() {
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new())
            .with_plugin(ValuePlugin::new(y(), 1.0).unwrap());
        assert_eq!(tween.remove_plugins_for(&["x"]), 1);
        assert!(!tween.state().is_destroyed());
        assert_eq!(tween.remove_plugins_for(&["y"]), 1);
        assert!(tween.state().is_destroyed());
    }

    #[test]
    fn reversed_tween_runs_back_to_start() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut tween = tween_x(10.0, 1.0, TweenConfig::new());
        step(&mut tween, &mut w, &mut q, 0.6);
        tween.reverse();
        step(&mut tween, &mut w, &mut q, 0.4);
        assert!((w[&1].x - 2.0).abs() < 1e-3);
        step(&mut tween, &mut w, &mut q, 1.0);
        assert_eq!(w[&1].x, 0.0);
        // Reversed at zero: nothing left to do.
        assert!(!step(&mut tween, &mut w, &mut q, 1.0));
        assert!(!tween.state().is_complete());
    }
}
