//! Playback state shared by tweens and sequences.
//!
//! Owns the elapsed/loop bookkeeping, callback gating and the transport
//! controls (play, pause, reverse, kill). The payload-specific parts of an
//! update live in the components; everything that must behave identically
//! for both lives here.

use crate::api::config::PlaybackConfig;
use crate::api::types::{CallbackKind, LoopType};
use super::events::{Callback, Callbacks, CompletionQueue, TweenEvent};

/// Outcome of re-deriving loop state after time moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Settled {
    /// One loop iteration ended during this update.
    pub step_complete: bool,
    /// The component became complete during this update.
    pub complete: bool,
}

#[derive(Debug)]
pub struct ComponentState {
    pub(crate) id: Option<String>,
    pub(crate) int_id: Option<i32>,
    pub(crate) auto_kill: bool,
    pub(crate) enabled: bool,
    pub(crate) time_scale: f32,
    pub(crate) loops: i32,
    pub(crate) loop_type: LoopType,
    pub(crate) paused: bool,

    pub(crate) duration: f32,
    pub(crate) full_duration: f32,
    pub(crate) elapsed: f32,
    pub(crate) full_elapsed: f32,
    pub(crate) completed_loops: i32,
    pub(crate) prev_full_elapsed: f32,
    /// Loop count already folded into incremental baselines.
    pub(crate) prev_completed_loops: i32,

    pub(crate) reversed: bool,
    pub(crate) looping_back: bool,
    pub(crate) has_started: bool,
    /// Payload initialised (plugins captured, sequence startup pass run).
    pub(crate) startup_done: bool,
    pub(crate) complete: bool,
    pub(crate) destroyed: bool,
    pub(crate) empty: bool,
    pub(crate) ignore_callbacks: bool,

    pub(crate) callbacks: Callbacks,
}

impl ComponentState {
    pub(crate) fn new(duration: f32, config: &PlaybackConfig) -> Self {
        let mut state = Self {
            id: config.id.clone(),
            int_id: config.int_id,
            auto_kill: config.auto_kill,
            enabled: config.enabled,
            time_scale: config.time_scale,
            loops: config.loops,
            loop_type: config.loop_type,
            paused: config.paused,
            duration,
            full_duration: 0.0,
            elapsed: 0.0,
            full_elapsed: 0.0,
            completed_loops: 0,
            prev_full_elapsed: 0.0,
            prev_completed_loops: 0,
            reversed: false,
            looping_back: false,
            has_started: false,
            startup_done: false,
            complete: false,
            destroyed: false,
            empty: true,
            ignore_callbacks: false,
            callbacks: Callbacks::new(),
        };
        state.refresh_full_duration();
        state
    }

    // -- Accessors --

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn int_id(&self) -> Option<i32> {
        self.int_id
    }

    /// Duration of a single loop.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Duration of all loops; infinite when loops are.
    pub fn full_duration(&self) -> f32 {
        self.full_duration
    }

    /// Time within the current loop.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn full_elapsed(&self) -> f32 {
        self.full_elapsed
    }

    /// Playhead: total time for infinite loops, loop time otherwise.
    pub fn position(&self) -> f32 {
        if self.loops < 1 {
            self.full_elapsed
        } else {
            self.elapsed
        }
    }

    pub fn loops(&self) -> i32 {
        self.loops
    }

    pub fn loop_type(&self) -> LoopType {
        self.loop_type
    }

    pub fn completed_loops(&self) -> i32 {
        self.completed_loops
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn auto_kill(&self) -> bool {
        self.auto_kill
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_looping_back(&self) -> bool {
        self.looping_back
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    // -- Setters --

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn set_int_id(&mut self, int_id: Option<i32>) {
        self.int_id = int_id;
    }

    pub fn set_loops(&mut self, loops: i32) {
        self.loops = loops;
        self.refresh_full_duration();
    }

    /// Can change mid-flight; incremental baselines are unwound on the next update.
    pub fn set_loop_type(&mut self, loop_type: LoopType) {
        self.loop_type = loop_type;
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    pub fn set_auto_kill(&mut self, auto_kill: bool) {
        self.auto_kill = auto_kill;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_callback(&mut self, kind: CallbackKind, callback: Callback) {
        self.callbacks.set(kind, callback);
    }

    pub fn clear_callback(&mut self, kind: CallbackKind) {
        self.callbacks.clear(kind);
    }

    // -- Transport --

    pub fn play(&mut self) {
        if !self.enabled || !self.paused {
            return;
        }
        self.paused = false;
        self.fire(CallbackKind::Play);
    }

    pub fn pause(&mut self) {
        if !self.enabled || self.paused {
            return;
        }
        self.paused = true;
        self.fire(CallbackKind::Pause);
    }

    /// Flip the direction of time. Does not touch the paused flag.
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    pub fn play_forward(&mut self) {
        self.reversed = false;
        self.play();
    }

    pub fn play_backwards(&mut self) {
        self.reversed = true;
        self.play();
    }

    /// Returns false if the component was already destroyed.
    pub(crate) fn kill(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.empty = true;
        true
    }

    // -- Loop arithmetic --

    pub(crate) fn refresh_full_duration(&mut self) {
        self.full_duration = if self.loops < 0 {
            f32::INFINITY
        } else {
            self.duration * self.loops as f32
        };
    }

    /// Replace the single-loop duration. The playhead is pulled back inside the
    /// new full duration.
    pub(crate) fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
        self.refresh_full_duration();
        self.full_elapsed = self.full_elapsed.min(self.full_duration);
    }

    /// Derive completed loops and yoyo direction from `full_elapsed`.
    pub(crate) fn refresh_loops(&mut self) {
        self.completed_loops = if self.duration <= 0.0 {
            self.loops.max(0)
        } else {
            (self.full_elapsed / self.duration).floor() as i32
        };

        let odd = self.completed_loops % 2 != 0;
        self.looping_back = self.loop_type.is_yoyo()
            && if self.loops >= 0 {
                (self.completed_loops < self.loops && odd)
                    || (self.completed_loops >= self.loops && !odd)
            } else {
                odd
            };
    }

    /// Derive `elapsed` from `full_elapsed` and the completed loop count.
    pub(crate) fn refresh_elapsed(&mut self) {
        self.elapsed = if self.duration <= 0.0
            || (self.loops >= 0 && self.completed_loops >= self.loops)
        {
            self.duration
        } else if self.full_elapsed < self.duration {
            self.full_elapsed
        } else {
            self.full_elapsed % self.duration
        };
    }

    /// Move the playhead by `delta` in the current direction.
    pub(crate) fn advance(&mut self, delta: f32) {
        if self.reversed {
            self.full_elapsed -= delta;
            self.elapsed -= delta;
        } else {
            self.full_elapsed += delta;
            self.elapsed += delta;
        }
        self.full_elapsed = self.full_elapsed.clamp(0.0, self.full_duration);
    }

    pub(crate) fn settle(&mut self) -> Settled {
        let was_complete = self.complete;
        let step_complete = !self.reversed && !was_complete && self.elapsed >= self.duration;
        self.refresh_loops();
        self.refresh_elapsed();
        self.complete = !self.reversed && self.loops >= 0 && self.completed_loops >= self.loops;
        Settled {
            step_complete,
            complete: !was_complete && self.complete,
        }
    }

    /// Loops whose change should be folded into incremental baselines. The
    /// final loop of a finite run is excluded so the last value lands on the
    /// accumulated end instead of one change beyond it.
    pub(crate) fn incremental_loops(&self) -> i32 {
        if self.loops >= 0 && self.completed_loops >= self.loops {
            (self.loops - 1).max(0)
        } else {
            self.completed_loops
        }
    }

    /// Short-circuits shared by every update. `None` means "keep going".
    pub(crate) fn gate(&self, force: bool) -> Option<bool> {
        if force {
            return None;
        }
        if !self.enabled {
            return Some(false);
        }
        if self.complete && !self.reversed {
            return Some(true);
        }
        if self.full_elapsed == 0.0 && self.reversed {
            return Some(false);
        }
        if self.paused {
            return Some(false);
        }
        None
    }

    /// Reset the playhead to zero without touching the payload.
    pub(crate) fn reset_playhead(&mut self) {
        self.complete = false;
        self.looping_back = false;
        self.completed_loops = 0;
        self.full_elapsed = 0.0;
        self.elapsed = 0.0;
    }

    // -- Callbacks --

    pub(crate) fn event(&self, kind: CallbackKind) -> TweenEvent {
        TweenEvent {
            kind,
            id: self.id.clone(),
            int_id: self.int_id,
            elapsed: self.elapsed,
            full_elapsed: self.full_elapsed,
            completed_loops: self.completed_loops,
        }
    }

    pub(crate) fn fire(&self, kind: CallbackKind) {
        if self.ignore_callbacks {
            return;
        }
        if let Some(cb) = self.callbacks.get(kind) {
            cb(&self.event(kind));
        }
    }

    pub(crate) fn fire_start(&mut self) {
        if self.ignore_callbacks {
            return;
        }
        self.has_started = true;
        self.fire(CallbackKind::Start);
    }

    /// Step-complete fires now; the completion itself is deferred to the queue.
    pub(crate) fn fire_complete(&mut self, queue: &mut CompletionQueue) {
        self.complete = true;
        self.fire(CallbackKind::StepComplete);
        if self.ignore_callbacks {
            return;
        }
        let callback = self.callbacks.get(CallbackKind::Complete).cloned();
        queue.push(self.event(CallbackKind::Complete), callback);
    }

    /// Fire update/rewound on change, then complete or step-complete, and close
    /// the update.
    pub(crate) fn finish_update(&mut self, settled: Settled, queue: &mut CompletionQueue) {
        if self.full_elapsed != self.prev_full_elapsed {
            self.fire(CallbackKind::Update);
            if self.full_elapsed == 0.0 {
                self.fire(CallbackKind::Rewound);
            }
        }
        if settled.complete {
            self.fire_complete(queue);
        } else if settled.step_complete {
            self.fire(CallbackKind::StepComplete);
        }
        self.ignore_callbacks = false;
        self.prev_full_elapsed = self.full_elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state(duration: f32, loops: i32, loop_type: LoopType) -> ComponentState {
        let config = PlaybackConfig {
            loops,
            loop_type,
            ..PlaybackConfig::default()
        };
        let mut s = ComponentState::new(duration, &config);
        s.empty = false;
        s
    }

    fn seek(s: &mut ComponentState, full_elapsed: f32) -> Settled {
        s.full_elapsed = full_elapsed;
        s.settle()
    }

    #[test]
    fn full_duration_follows_loops() {
        let mut s = state(2.0, 3, LoopType::Restart);
        assert_eq!(s.full_duration(), 6.0);
        s.set_loops(-1);
        assert!(s.full_duration().is_infinite());
    }

    #[test]
    fn restart_loops_at_integer_multiples() {
        let loops = 4;
        for k in 0..=loops {
            let mut s = state(0.5, loops, LoopType::Restart);
            seek(&mut s, k as f32 * 0.5);
            assert_eq!(s.completed_loops(), k.min(loops));
            assert!(!s.is_looping_back());
            if k == 0 {
                assert_eq!(s.elapsed(), 0.0);
            } else if k == loops {
                assert_eq!(s.elapsed(), 0.5);
                assert!(s.is_complete());
            } else {
                assert_eq!(s.elapsed(), 0.0);
                assert!(!s.is_complete());
            }
        }
    }

    #[test]
    fn elapsed_is_remainder_inside_loops() {
        let mut s = state(1.0, 3, LoopType::Restart);
        seek(&mut s, 1.25);
        assert_eq!(s.completed_loops(), 1);
        assert!((s.elapsed() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn yoyo_two_loops() {
        let mut s = state(1.0, 2, LoopType::Yoyo);
        seek(&mut s, 0.5);
        assert!(!s.is_looping_back());
        seek(&mut s, 1.5);
        assert!(s.is_looping_back());
        assert!(!s.is_complete());
        let settled = seek(&mut s, 2.0);
        assert!(s.is_complete());
        assert!(settled.complete);
    }

    #[test]
    fn yoyo_parity_at_the_loop_cap() {
        // Even loop count: the final loop ran backwards, so the settled
        // state at the cap still reads as looping back.
        let mut even = state(1.0, 2, LoopType::YoyoInverse);
        seek(&mut even, 2.0);
        assert_eq!(even.completed_loops(), 2);
        assert!(even.is_looping_back());
        assert_eq!(even.elapsed(), 1.0);

        // Odd loop count: the final loop ran forwards.
        let mut odd = state(1.0, 3, LoopType::Yoyo);
        seek(&mut odd, 3.0);
        assert_eq!(odd.completed_loops(), 3);
        assert!(!odd.is_looping_back());
    }

    #[test]
    fn infinite_yoyo_alternates() {
        let mut s = state(1.0, -1, LoopType::Yoyo);
        for (t, back) in [(0.5, false), (1.5, true), (2.5, false), (7.5, true)] {
            seek(&mut s, t);
            assert_eq!(s.is_looping_back(), back, "at {}", t);
            assert!(!s.is_complete());
        }
    }

    #[test]
    fn restart_and_incremental_never_loop_back() {
        for loop_type in [LoopType::Restart, LoopType::Incremental] {
            let mut s = state(1.0, 4, loop_type);
            seek(&mut s, 1.5);
            assert!(!s.is_looping_back());
        }
    }

    #[test]
    fn zero_duration_completes_instantly() {
        let mut s = state(0.0, 1, LoopType::Restart);
        let settled = seek(&mut s, 0.0);
        assert!(settled.complete);
        assert_eq!(s.completed_loops(), 1);
        assert_eq!(s.elapsed(), 0.0);
    }

    #[test]
    fn step_complete_is_edge_triggered() {
        let mut s = state(1.0, 2, LoopType::Restart);
        s.advance(1.0);
        let settled = s.settle();
        assert!(settled.step_complete);
        assert!(!settled.complete);
        s.advance(1.0);
        let settled = s.settle();
        assert!(settled.complete);
        s.advance(1.0);
        let settled = s.settle();
        assert!(!settled.complete);
        assert!(!settled.step_complete);
    }

    #[test]
    fn advance_clamps_both_ends() {
        let mut s = state(1.0, 1, LoopType::Restart);
        s.advance(5.0);
        assert_eq!(s.full_elapsed(), 1.0);
        s.reverse();
        s.advance(5.0);
        assert_eq!(s.full_elapsed(), 0.0);
    }

    #[test]
    fn incremental_loops_stop_before_the_cap() {
        let mut s = state(1.0, 3, LoopType::Incremental);
        seek(&mut s, 2.0);
        assert_eq!(s.incremental_loops(), 2);
        seek(&mut s, 3.0);
        assert_eq!(s.incremental_loops(), 2);
    }

    #[test]
    fn gate_respects_force() {
        let mut s = state(1.0, 1, LoopType::Restart);
        s.paused = true;
        assert_eq!(s.gate(false), Some(false));
        assert_eq!(s.gate(true), None);
        s.paused = false;
        s.complete = true;
        assert_eq!(s.gate(false), Some(true));
    }

    #[test]
    fn play_and_pause_fire_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = state(1.0, 1, LoopType::Restart);
        for kind in [CallbackKind::Play, CallbackKind::Pause] {
            let sink = log.clone();
            s.set_callback(kind, Rc::new(move |e: &TweenEvent| sink.borrow_mut().push(e.kind)));
        }
        s.play();
        s.pause();
        s.pause();
        s.play();
        s.play();
        assert_eq!(*log.borrow(), vec![CallbackKind::Pause, CallbackKind::Play]);
    }

    #[test]
    fn ignored_callbacks_do_not_mark_started() {
        let mut s = state(1.0, 1, LoopType::Restart);
        s.ignore_callbacks = true;
        s.fire_start();
        assert!(!s.has_started());

        let mut queue = CompletionQueue::new();
        s.fire_complete(&mut queue);
        assert_eq!(queue.pending(), 0);

        s.ignore_callbacks = false;
        s.fire_start();
        assert!(s.has_started());
    }
}
