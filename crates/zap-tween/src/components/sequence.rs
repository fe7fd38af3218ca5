//! Sequences: time-offset tweens, nested sequences and spacer intervals on
//! one timeline.
//!
//! A sequence owns its children and drives them by jumping each one to its
//! local time (`sequence time - start time`) on every update. Children keep
//! their own state machines; the sequence never advances them by delta.

use std::fmt;
use std::rc::Rc;

use crate::api::config::SequenceConfig;
use crate::api::types::{CallbackKind, LoopType};
use crate::core::events::TweenEvent;
use crate::core::state::ComponentState;
use crate::core::target::{TargetWorld, TickContext};
use crate::plugins::Plugin;
use super::animation::{Animation, Component};

/// One slot on a sequence timeline.
pub struct SequenceItem<W: TargetWorld> {
    start_time: f32,
    length: f32,
    member: Option<Component<W>>,
}

impl<W: TargetWorld> SequenceItem<W> {
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    /// Length on the timeline: the member's full duration, or the interval.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// The child component; `None` for intervals.
    pub fn member(&self) -> Option<&Component<W>> {
        self.member.as_ref()
    }

    pub fn member_mut(&mut self) -> Option<&mut Component<W>> {
        self.member.as_mut()
    }
}

impl<W: TargetWorld> fmt::Debug for SequenceItem<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceItem")
            .field("start_time", &self.start_time)
            .field("length", &self.length)
            .field("member", &self.member)
            .finish()
    }
}

pub struct Sequence<W: TargetWorld> {
    state: ComponentState,
    items: Vec<SequenceItem<W>>,
}

impl<W: TargetWorld> Sequence<W> {
    /// New sequences start paused.
    pub fn new(config: SequenceConfig) -> Self {
        let mut state = ComponentState::new(0.0, &config.playback);
        state.paused = true;
        Self { state, items: Vec::new() }
    }

    pub fn with_callback(mut self, kind: CallbackKind, callback: impl Fn(&TweenEvent) + 'static) -> Self {
        self.state.set_callback(kind, Rc::new(callback));
        self
    }

    pub fn items(&self) -> &[SequenceItem<W>] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [SequenceItem<W>] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `member` after everything already in the sequence. Returns the new
    /// sequence duration.
    pub fn append(&mut self, member: impl Into<Component<W>>) -> f32 {
        let member = member.into();
        let length = self.member_length(&member);
        self.push_back(Some(member), length)
    }

    /// Add an empty gap of `duration` seconds at the end.
    pub fn append_interval(&mut self, duration: f32) -> f32 {
        self.push_back(None, duration.max(0.0))
    }

    /// Add `member` at time zero, shifting everything else later by its length.
    pub fn prepend(&mut self, member: impl Into<Component<W>>) -> f32 {
        let member = member.into();
        let length = self.member_length(&member);
        self.push_front(Some(member), length)
    }

    pub fn prepend_interval(&mut self, duration: f32) -> f32 {
        self.push_front(None, duration.max(0.0))
    }

    /// Place `member` at `time`, overlapping whatever already runs there.
    pub fn insert(&mut self, time: f32, member: impl Into<Component<W>>) -> f32 {
        let member = member.into();
        let length = self.member_length(&member);
        let time = time.max(0.0);
        let index = self
            .items
            .iter()
            .position(|item| item.start_time >= time)
            .unwrap_or(self.items.len());
        self.items.insert(index, SequenceItem { start_time: time, length, member: Some(member) });
        let duration = self.state.duration.max(time + length);
        self.set_duration(duration)
    }

    /// Unresolved speed-based tweens are laid out with their speed for now and
    /// moved to their real length when the sequence starts.
    fn member_length(&self, member: &Component<W>) -> f32 {
        if let Component::Tween(tween) = member {
            if !tween.is_duration_resolved() && self.state.startup_done {
                log::warn!(
                    "speed-based tween on {:?} added to a started sequence before its duration \
                     was resolved; its speed is used as duration",
                    tween.target()
                );
            }
        }
        member.timeline_length()
    }

    fn push_back(&mut self, member: Option<Component<W>>, length: f32) -> f32 {
        let start_time = self.state.duration;
        self.items.push(SequenceItem { start_time, length, member });
        self.set_duration(start_time + length)
    }

    fn push_front(&mut self, member: Option<Component<W>>, length: f32) -> f32 {
        for item in &mut self.items {
            item.start_time += length;
        }
        self.items.insert(0, SequenceItem { start_time: 0.0, length, member });
        let duration = self.state.duration + length;
        self.set_duration(duration)
    }

    fn set_duration(&mut self, duration: f32) -> f32 {
        self.state.set_duration(duration);
        self.state.empty = false;
        duration
    }

    /// Give item `index` its final `length`. Items that started at or after its
    /// old end move with it, and the duration is recomputed.
    fn relayout(&mut self, index: usize, length: f32) {
        let item = &self.items[index];
        let shift = length - item.length;
        if shift == 0.0 {
            return;
        }
        let old_end = item.start_time + item.length;
        for (i, other) in self.items.iter_mut().enumerate() {
            if i != index && other.start_time >= old_end {
                other.start_time += shift;
            }
        }
        self.items[index].length = length;
        let duration = self
            .items
            .iter()
            .map(|item| item.start_time + item.length)
            .fold(0.0, f32::max);
        self.set_duration(duration);
    }

    fn members_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Component<W>> + '_ {
        self.items.iter_mut().filter_map(|item| item.member.as_mut())
    }

    fn members(&self) -> impl Iterator<Item = &Component<W>> + '_ {
        self.items.iter().filter_map(|item| item.member.as_ref())
    }

    fn start(&mut self, ctx: &mut TickContext<'_, W>) {
        self.prepare(ctx);
        self.state.fire_start();
    }

    /// Run the startup iteration once.
    pub(crate) fn prepare(&mut self, ctx: &mut TickContext<'_, W>) {
        if !self.state.startup_done {
            self.state.startup_done = true;
            self.startup_iteration(ctx);
        }
    }

    /// Run every child to its end in order, then rewind them in reverse
    /// order, with all callbacks suppressed. Children capture their start
    /// values from what earlier children leave behind, and speed-based
    /// children get their real place on the timeline.
    fn startup_iteration(&mut self, ctx: &mut TickContext<'_, W>) {
        for index in 0..self.items.len() {
            let Some(member) = self.items[index].member.as_mut() else {
                continue;
            };
            match member {
                Component::Tween(tween) => {
                    tween.resolve_speed_based_duration(ctx.world);
                }
                Component::Sequence(sequence) => sequence.prepare(ctx),
            }
            let length = member.timeline_length();
            member.update(length, true, true, ctx);
            self.relayout(index, length);
        }
        for member in self.members_mut().rev() {
            member.rewind_with(false, true, ctx);
        }
    }

    fn apply_incremental(&mut self) {
        if self.state.loop_type == LoopType::Incremental {
            let current = self.state.incremental_loops();
            let diff = current - self.state.prev_completed_loops;
            if diff != 0 {
                self.set_incremental(diff);
                self.state.prev_completed_loops = current;
            }
        } else {
            self.unwind_incremental();
        }
    }

    fn unwind_incremental(&mut self) {
        let prev = self.state.prev_completed_loops;
        if prev != 0 {
            self.set_incremental(-prev);
            self.state.prev_completed_loops = 0;
        }
    }

    /// Move every child to its local time. Items not yet reached are visited
    /// first, last to first, so a child being left behind settles before the
    /// one being entered.
    fn drive_items(&mut self, time: f32, force: bool, silent: bool, ctx: &mut TickContext<'_, W>) {
        for item in self.items.iter_mut().rev() {
            if item.start_time > time {
                if let Some(member) = item.member.as_mut() {
                    member.go_to_with(time - item.start_time, false, force, silent, ctx);
                }
            }
        }
        for item in self.items.iter_mut() {
            if item.start_time <= time {
                if let Some(member) = item.member.as_mut() {
                    member.go_to_with(time - item.start_time, false, force, silent, ctx);
                }
            }
        }
    }
}

impl<W: TargetWorld> Animation<W> for Sequence<W> {
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
        if let Some(result) = self.state.gate(force) {
            return result;
        }

        self.state.ignore_callbacks = startup;
        if !self.state.has_started {
            self.start(ctx);
        }
        self.state.advance(delta);
        let settled = self.state.settle();
        self.apply_incremental();

        let time = if self.state.looping_back {
            self.state.duration - self.state.elapsed
        } else {
            self.state.elapsed
        };
        self.drive_items(time, force, startup, ctx);

        self.state.finish_update(settled, ctx.completions);
        settled.complete
    }

    fn go_to_with(&mut self, time: f32, play: bool, force: bool, silent: bool, ctx: &mut TickContext<'_, W>) -> bool {
        if !self.state.enabled || self.state.destroyed {
            return false;
        }
        self.prepare(ctx);
        let time = time.clamp(0.0, self.state.full_duration);
        if !force && time == self.state.full_elapsed {
            return self.state.complete;
        }
        self.state.full_elapsed = time;
        self.update(0.0, true, silent, ctx);
        if !self.state.complete && play {
            self.state.play();
        }
        self.state.complete
    }

    fn rewind_with(&mut self, play: bool, silent: bool, ctx: &mut TickContext<'_, W>) {
        if self.state.destroyed || !self.state.enabled || self.state.empty {
            return;
        }
        self.state.ignore_callbacks = silent;
        if !self.state.has_started {
            self.start(ctx);
        }
        self.state.reset_playhead();
        self.unwind_incremental();
        for member in self.members_mut().rev() {
            member.rewind_with(false, silent, ctx);
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

    fn complete(&mut self, ctx: &mut TickContext<'_, W>) {
        if !self.state.enabled || self.state.destroyed || self.state.empty || self.state.loops < 0 {
            return;
        }
        self.state.full_elapsed = self.state.full_duration;
        self.update(0.0, true, false, ctx);
        if self.state.auto_kill {
            self.kill();
        }
    }

    fn kill(&mut self) {
        if self.state.kill() {
            self.items.clear();
        }
    }

    fn set_incremental(&mut self, diff: i32) {
        for member in self.members_mut() {
            member.set_incremental(diff);
        }
    }

    /// Running sequences report every target their children animate.
    fn is_tweening(&self, key: W::Key) -> bool {
        self.state.enabled && !self.state.destroyed && !self.state.paused && self.is_linked_to(key)
    }

    fn is_linked_to(&self, key: W::Key) -> bool {
        self.members().any(|m| m.is_linked_to(key))
    }

    fn fill_targets(&self, out: &mut Vec<W::Key>) {
        for member in self.members() {
            member.fill_targets(out);
        }
    }

    fn fill_plugins<'a>(&'a self, out: &mut Vec<&'a dyn Plugin<W::Target>>) {
        for member in self.members() {
            member.fill_plugins(out);
        }
    }
}

impl<W: TargetWorld> fmt::Debug for Sequence<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("items", &self.items)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::api::config::TweenConfig;
    use crate::components::tween::Tween;
    use crate::core::events::CompletionQueue;
    use crate::core::target::Property;
    use crate::plugins::ValuePlugin;

    #[derive(Debug, Default)]
    struct Dot {
        x: f32,
        y: f32,
    }

    type World = HashMap<u32, Dot>;

    fn world() -> World {
        let mut w = HashMap::new();
        w.insert(1, Dot::default());
        w.insert(2, Dot::default());
        w
    }

    fn x() -> Property<Dot, f32> {
        Property::new("x", |d: &Dot| d.x, |d, v| d.x = v)
    }

    fn y() -> Property<Dot, f32> {
        Property::new("y", |d: &Dot| d.y, |d, v| d.y = v)
    }

    fn to_x(key: u32, to: f32, duration: f32) -> Tween<World> {
        Tween::new(key, duration, TweenConfig::new())
            .unwrap()
            .with_plugin(ValuePlugin::new(x(), to).unwrap())
    }

    fn step(seq: &mut Sequence<World>, w: &mut World, q: &mut CompletionQueue, dt: f32) -> bool {
        let mut ctx = TickContext::new(w, q);
        seq.update(dt, false, false, &mut ctx)
    }

    fn child(seq: &Sequence<World>, index: usize) -> &ComponentState {
        seq.items()[index].member().unwrap().state()
    }

    #[test]
    fn timeline_layout_and_child_mapping() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq = Sequence::new(SequenceConfig::new());
        seq.append(to_x(1, 10.0, 2.0));
        seq.append_interval(1.0);
        assert_eq!(seq.append(to_x(2, 10.0, 3.0)), 6.0);
        assert_eq!(seq.items()[2].start_time(), 3.0);

        // Created paused.
        assert!(!step(&mut seq, &mut w, &mut q, 1.0));
        assert_eq!(seq.state().full_elapsed(), 0.0);

        seq.play();
        step(&mut seq, &mut w, &mut q, 2.5);
        assert!(child(&seq, 0).is_complete());
        assert_eq!(child(&seq, 0).full_elapsed(), 2.0);
        assert_eq!(w[&1].x, 10.0);
        assert_eq!(child(&seq, 2).full_elapsed(), 0.0);
        assert!(!child(&seq, 2).has_started());
        assert_eq!(w[&2].x, 0.0);

        step(&mut seq, &mut w, &mut q, 2.0);
        assert!((child(&seq, 2).full_elapsed() - 1.5).abs() < 1e-5);
        assert!((w[&2].x - 5.0).abs() < 1e-3);
        assert!(step(&mut seq, &mut w, &mut q, 10.0));
        assert_eq!(w[&2].x, 10.0);
    }

    #[test]
    fn startup_iteration_chains_shared_properties() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let first = to_x(1, 10.0, 1.0)
            .with_callback(CallbackKind::Start, move |_| sink.borrow_mut().push("first"));
        let sink = log.clone();
        let second = to_x(1, 20.0, 1.0)
            .with_callback(CallbackKind::Start, move |_| sink.borrow_mut().push("second"));

        let mut seq = Sequence::new(SequenceConfig::new());
        seq.append(first);
        seq.append(second);
        seq.play();

        step(&mut seq, &mut w, &mut q, 0.0);
        assert_eq!(w[&1].x, 0.0);
        assert!(log.borrow().is_empty());

        step(&mut seq, &mut w, &mut q, 0.5);
        assert!((w[&1].x - 5.0).abs() < 1e-3);
        assert_eq!(*log.borrow(), vec!["first"]);

        // The second tween starts from where the first one ends.
        step(&mut seq, &mut w, &mut q, 1.0);
        assert!((w[&1].x - 15.0).abs() < 1e-3);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn backwards_across_a_boundary_settles_the_later_child_first() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq = Sequence::new(SequenceConfig::new());
        seq.append(to_x(1, 10.0, 1.0));
        seq.append(to_x(1, 20.0, 1.0));
        seq.play();

        step(&mut seq, &mut w, &mut q, 1.5);
        assert!((w[&1].x - 15.0).abs() < 1e-3);
        seq.reverse();
        step(&mut seq, &mut w, &mut q, 1.0);
        assert!((w[&1].x - 5.0).abs() < 1e-3);
    }

    #[test]
    fn yoyo_sequence_mirrors_child_time() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq = Sequence::new(SequenceConfig::new().with_loops(2, LoopType::Yoyo));
        seq.append(to_x(1, 10.0, 1.0));
        assert_eq!(seq.state().full_duration(), 2.0);
        seq.play();

        step(&mut seq, &mut w, &mut q, 1.25);
        assert!(seq.state().is_looping_back());
        assert!((w[&1].x - 7.5).abs() < 1e-3);
        assert!(step(&mut seq, &mut w, &mut q, 1.0));
        assert_eq!(w[&1].x, 0.0);
    }

    #[test]
    fn incremental_sequence_shifts_children() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq = Sequence::new(SequenceConfig::new().with_loops(3, LoopType::Incremental));
        seq.append(to_x(1, 10.0, 1.0));
        seq.play();

        step(&mut seq, &mut w, &mut q, 1.5);
        assert!((w[&1].x - 15.0).abs() < 1e-3);
        assert!(step(&mut seq, &mut w, &mut q, 5.0));
        assert!((w[&1].x - 30.0).abs() < 1e-3);

        let mut ctx = TickContext::new(&mut w, &mut q);
        seq.rewind(&mut ctx);
        assert_eq!(ctx.world[&1].x, 0.0);
    }

    #[test]
    fn prepend_and_insert_reshape_the_timeline() {
        let mut seq: Sequence<World> = Sequence::new(SequenceConfig::new());
        seq.append(to_x(1, 1.0, 2.0));
        assert_eq!(seq.prepend_interval(1.0), 3.0);
        assert_eq!(seq.items()[1].start_time(), 1.0);
        assert_eq!(seq.prepend(to_x(2, 1.0, 0.5)), 3.5);
        assert_eq!(seq.items()[2].start_time(), 1.5);

        assert_eq!(seq.insert(1.5, to_x(2, 1.0, 4.0)), 5.5);
        assert_eq!(seq.items()[2].length(), 4.0);
        assert_eq!(seq.items()[3].start_time(), 1.5);
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn nested_sequences_drive_their_own_children() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut inner = Sequence::new(SequenceConfig::new());
        inner.append(to_x(1, 10.0, 1.0));
        inner.append(
            Tween::new(2, 1.0, TweenConfig::new())
                .unwrap()
                .with_plugin(ValuePlugin::new(y(), 4.0).unwrap()),
        );

        let mut outer = Sequence::new(SequenceConfig::new());
        outer.append_interval(0.5);
        assert_eq!(outer.append(inner), 2.5);
        outer.play();

        step(&mut outer, &mut w, &mut q, 2.0);
        assert_eq!(w[&1].x, 10.0);
        assert!((w[&2].y - 2.0).abs() < 1e-3);

        let mut targets = outer.targets();
        targets.sort();
        assert_eq!(targets, vec![1, 2]);
        assert_eq!(outer.plugins().len(), 2);
        assert!(outer.is_linked_to(2));
        assert!(outer.is_tweening(2));
        assert!(!outer.is_linked_to(3));
    }

    fn speed_x(key: u32, to: f32, speed: f32) -> Tween<World> {
        Tween::new(key, speed, TweenConfig::new().speed_based())
            .unwrap()
            .with_plugin(ValuePlugin::new(x(), to).unwrap())
    }

    fn to_y(key: u32, to: f32, duration: f32) -> Tween<World> {
        Tween::new(key, duration, TweenConfig::new())
            .unwrap()
            .with_plugin(ValuePlugin::new(y(), to).unwrap())
    }

    #[test]
    fn speed_based_children_move_later_items_on_start() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq = Sequence::new(SequenceConfig::new());
        seq.append(speed_x(1, 20.0, 10.0));
        seq.append(to_y(2, 5.0, 1.0));
        seq.play();

        step(&mut seq, &mut w, &mut q, 2.5);
        assert_eq!(seq.state().duration(), 3.0);
        assert_eq!(seq.items()[0].length(), 2.0);
        assert_eq!(seq.items()[1].start_time(), 2.0);
        assert_eq!(w[&1].x, 20.0);
        assert!((w[&2].y - 2.5).abs() < 1e-3);
    }

    #[test]
    fn nested_speed_based_children_resize_the_outer_timeline() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut inner = Sequence::new(SequenceConfig::new());
        inner.append(speed_x(1, 20.0, 10.0));

        let mut outer = Sequence::new(SequenceConfig::new());
        outer.append(inner);
        outer.append(to_y(2, 5.0, 1.0));
        outer.play();

        step(&mut outer, &mut w, &mut q, 2.5);
        assert_eq!(outer.state().duration(), 3.0);
        assert_eq!(outer.items()[1].start_time(), 2.0);
        assert!((w[&2].y - 2.5).abs() < 1e-3);
        assert!(step(&mut outer, &mut w, &mut q, 1.0));
        assert_eq!(w[&2].y, 5.0);
    }

    #[test]
    fn go_to_and_complete() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq = Sequence::new(SequenceConfig::new());
        seq.append(to_x(1, 10.0, 1.0));
        seq.append(to_x(2, 10.0, 1.0));

        let mut ctx = TickContext::new(&mut w, &mut q);
        assert!(!seq.go_to(1.5, false, &mut ctx));
        assert_eq!(ctx.world[&1].x, 10.0);
        assert!((ctx.world[&2].x - 5.0).abs() < 1e-3);
        assert!(seq.state().is_paused());

        seq.complete(&mut ctx);
        assert_eq!(ctx.world[&2].x, 10.0);
        assert!(seq.state().is_destroyed());
        assert!(seq.is_empty());
        assert!(seq.update(1.0, false, false, &mut ctx));
    }

    #[test]
    fn empty_sequence_reports_complete() {
        let mut w = world();
        let mut q = CompletionQueue::new();
        let mut seq: Sequence<World> = Sequence::new(SequenceConfig::new());
        seq.play();
        assert!(step(&mut seq, &mut w, &mut q, 0.1));
    }
}
