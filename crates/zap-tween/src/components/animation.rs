//! The interface shared by tweens and sequences, and the enum that lets a
//! sequence or the manager hold either.

use std::fmt;

use crate::core::state::ComponentState;
use crate::core::target::{TargetWorld, TickContext};
use crate::plugins::Plugin;
use super::sequence::Sequence;
use super::tween::Tween;

/// A playable component: a [`Tween`] or a [`Sequence`].
///
/// The time-driven methods take a [`TickContext`] so the component can reach
/// its targets and defer completion callbacks.
pub trait Animation<W: TargetWorld> {
    fn state(&self) -> &ComponentState;
    fn state_mut(&mut self) -> &mut ComponentState;

    /// Advance by `delta` (already time-scaled). `force` bypasses the
    /// paused/complete short-circuits; `startup` marks a silent pass run by a
    /// parent sequence. Returns true when the component is complete.
    fn update(&mut self, delta: f32, force: bool, startup: bool, ctx: &mut TickContext<'_, W>) -> bool;

    /// Jump to `time` on the full timeline. `silent` suppresses callbacks.
    fn go_to_with(&mut self, time: f32, play: bool, force: bool, silent: bool, ctx: &mut TickContext<'_, W>) -> bool;

    fn rewind_with(&mut self, play: bool, silent: bool, ctx: &mut TickContext<'_, W>);

    /// Jump to the end of the last loop. No effect on infinite loops.
    fn complete(&mut self, ctx: &mut TickContext<'_, W>);

    fn kill(&mut self);

    /// Shift incremental baselines by `diff` loops.
    fn set_incremental(&mut self, diff: i32);

    /// True if `key` is animated by a running, enabled part of this component.
    fn is_tweening(&self, key: W::Key) -> bool;

    /// True if `key` is animated by any part of this component.
    fn is_linked_to(&self, key: W::Key) -> bool;

    fn fill_targets(&self, out: &mut Vec<W::Key>);

    fn fill_plugins<'a>(&'a self, out: &mut Vec<&'a dyn Plugin<W::Target>>);

    // -- Provided --

    fn go_to(&mut self, time: f32, force: bool, ctx: &mut TickContext<'_, W>) -> bool {
        self.go_to_with(time, false, force, false, ctx)
    }

    fn go_to_and_play(&mut self, time: f32, force: bool, ctx: &mut TickContext<'_, W>) -> bool {
        self.go_to_with(time, true, force, false, ctx)
    }

    /// Back to the start, paused.
    fn rewind(&mut self, ctx: &mut TickContext<'_, W>) {
        self.rewind_with(false, false, ctx);
    }

    /// Back to the start, playing.
    fn restart(&mut self, ctx: &mut TickContext<'_, W>) {
        self.rewind_with(true, false, ctx);
    }

    fn play(&mut self) {
        self.state_mut().play();
    }

    fn pause(&mut self) {
        self.state_mut().pause();
    }

    fn reverse(&mut self) {
        self.state_mut().reverse();
    }

    fn play_forward(&mut self) {
        self.state_mut().play_forward();
    }

    fn play_backwards(&mut self) {
        self.state_mut().play_backwards();
    }

    fn duration(&self) -> f32 {
        self.state().duration()
    }

    fn full_duration(&self) -> f32 {
        self.state().full_duration()
    }

    fn position(&self) -> f32 {
        self.state().position()
    }

    fn is_complete(&self) -> bool {
        self.state().is_complete()
    }

    /// Every distinct target animated by this component.
    fn targets(&self) -> Vec<W::Key> {
        let mut out = Vec::new();
        self.fill_targets(&mut out);
        out
    }

    /// Every plugin of this component, nested ones included.
    fn plugins(&self) -> Vec<&dyn Plugin<W::Target>> {
        let mut out = Vec::new();
        self.fill_plugins(&mut out);
        out
    }
}

macro_rules! delegate {
    ($self:ident, $c:ident => $body:expr) => {
        match $self {
            Component::Tween($c) => $body,
            Component::Sequence($c) => $body,
        }
    };
}

/// Either kind of component, as held by sequences and the manager.
pub enum Component<W: TargetWorld> {
    Tween(Tween<W>),
    Sequence(Sequence<W>),
}

impl<W: TargetWorld> Component<W> {
    pub fn as_tween(&self) -> Option<&Tween<W>> {
        match self {
            Component::Tween(t) => Some(t),
            Component::Sequence(_) => None,
        }
    }

    pub fn as_tween_mut(&mut self) -> Option<&mut Tween<W>> {
        match self {
            Component::Tween(t) => Some(t),
            Component::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence<W>> {
        match self {
            Component::Sequence(s) => Some(s),
            Component::Tween(_) => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence<W>> {
        match self {
            Component::Sequence(s) => Some(s),
            Component::Tween(_) => None,
        }
    }

    /// Length this component occupies on a parent timeline.
    pub(crate) fn timeline_length(&self) -> f32 {
        let state = self.state();
        if state.full_duration().is_finite() {
            state.full_duration()
        } else {
            state.duration()
        }
    }
}

impl<W: TargetWorld> fmt::Debug for Component<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        delegate!(self, c => fmt::Debug::fmt(c, f))
    }
}

impl<W: TargetWorld> From<Tween<W>> for Component<W> {
    fn from(tween: Tween<W>) -> Self {
        Component::Tween(tween)
    }
}

impl<W: TargetWorld> From<Sequence<W>> for Component<W> {
    fn from(sequence: Sequence<W>) -> Self {
        Component::Sequence(sequence)
    }
}

impl<W: TargetWorld> Animation<W> for Component<W> {
    fn state(&self) -> &ComponentState {
        delegate!(self, c => c.state())
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        delegate!(self, c => c.state_mut())
    }

    fn update(&mut self, delta: f32, force: bool, startup: bool, ctx: &mut TickContext<'_, W>) -> bool {
        delegate!(self, c => c.update(delta, force, startup, ctx))
    }

    fn go_to_with(&mut self, time: f32, play: bool, force: bool, silent: bool, ctx: &mut TickContext<'_, W>) -> bool {
        delegate!(self, c => c.go_to_with(time, play, force, silent, ctx))
    }

    fn rewind_with(&mut self, play: bool, silent: bool, ctx: &mut TickContext<'_, W>) {
        delegate!(self, c => c.rewind_with(play, silent, ctx))
    }

    fn complete(&mut self, ctx: &mut TickContext<'_, W>) {
        delegate!(self, c => c.complete(ctx))
    }

    fn kill(&mut self) {
        delegate!(self, c => c.kill())
    }

    fn set_incremental(&mut self, diff: i32) {
        delegate!(self, c => c.set_incremental(diff))
    }

    fn is_tweening(&self, key: W::Key) -> bool {
        delegate!(self, c => c.is_tweening(key))
    }

    fn is_linked_to(&self, key: W::Key) -> bool {
        delegate!(self, c => c.is_linked_to(key))
    }

    fn fill_targets(&self, out: &mut Vec<W::Key>) {
        delegate!(self, c => c.fill_targets(out))
    }

    fn fill_plugins<'a>(&'a self, out: &mut Vec<&'a dyn Plugin<W::Target>>) {
        delegate!(self, c => c.fill_plugins(out))
    }
}
