//! Callback slots and the deferred completion queue.
//!
//! Every callback except `Complete` runs synchronously inside the update that
//! triggered it. Completions are pushed onto a [`CompletionQueue`] owned by the
//! driver loop and dispatched once every component of the tick has settled.

use std::fmt;
use std::rc::Rc;

use crate::api::types::CallbackKind;

/// User callback. Parameters are captured by the closure.
pub type Callback = Rc<dyn Fn(&TweenEvent)>;

/// Snapshot of a component at the moment a callback fired.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenEvent {
    pub kind: CallbackKind,
    pub id: Option<String>,
    pub int_id: Option<i32>,
    pub elapsed: f32,
    pub full_elapsed: f32,
    pub completed_loops: i32,
}

/// One optional callback per [`CallbackKind`].
#[derive(Clone, Default)]
pub struct Callbacks {
    slots: [Option<Callback>; CallbackKind::COUNT],
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: CallbackKind, callback: Callback) {
        self.slots[kind.index()] = Some(callback);
    }

    pub fn clear(&mut self, kind: CallbackKind) {
        self.slots[kind.index()] = None;
    }

    pub fn get(&self, kind: CallbackKind) -> Option<&Callback> {
        self.slots[kind.index()].as_ref()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: usize = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Callbacks").field("set", &set).finish()
    }
}

struct PendingCompletion {
    event: TweenEvent,
    callback: Option<Callback>,
}

/// Completions collected during a tick, dispatched after it.
#[derive(Default)]
pub struct CompletionQueue {
    pending: Vec<PendingCompletion>,
    dispatched: Vec<TweenEvent>,
}

impl CompletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: TweenEvent, callback: Option<Callback>) {
        self.pending.push(PendingCompletion { event, callback });
    }

    /// Number of completions waiting for dispatch.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Invoke every queued completion callback exactly once, in queue order.
    /// Events of the previous dispatch are discarded. Returns how many
    /// completions were dispatched.
    pub fn dispatch(&mut self) -> usize {
        self.dispatched.clear();
        let batch = std::mem::take(&mut self.pending);
        let count = batch.len();
        for PendingCompletion { event, callback } in batch {
            if let Some(cb) = callback {
                cb(&event);
            }
            self.dispatched.push(event);
        }
        count
    }

    /// Drain events of the completions handled by the latest dispatch.
    pub fn drain_dispatched(&mut self) -> impl Iterator<Item = TweenEvent> + '_ {
        self.dispatched.drain(..)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.dispatched.clear();
    }
}

impl fmt::Debug for CompletionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionQueue")
            .field("pending", &self.pending.len())
            .field("dispatched", &self.dispatched.len())
            .finish()
    }
}
