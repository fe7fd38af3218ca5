use serde::{Deserialize, Serialize};

/// Handle to a top-level tween or sequence owned by a [`TweenManager`](crate::TweenManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// How a component behaves when it runs more than one loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopType {
    /// Every loop starts again from the beginning.
    #[default]
    Restart,
    /// Odd loops play backwards with a mirrored ease.
    Yoyo,
    /// Odd loops play backwards with the ease inverted.
    YoyoInverse,
    /// Every loop starts where the previous one ended.
    Incremental,
}

impl LoopType {
    /// Whether alternate loops run in reverse.
    pub fn is_yoyo(self) -> bool {
        matches!(self, LoopType::Yoyo | LoopType::YoyoInverse)
    }
}

/// Callback slots carried by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackKind {
    Start,
    Update,
    Pause,
    Play,
    Rewound,
    StepComplete,
    Complete,
}

impl CallbackKind {
    pub const COUNT: usize = 7;

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            CallbackKind::Start => 0,
            CallbackKind::Update => 1,
            CallbackKind::Pause => 2,
            CallbackKind::Play => 3,
            CallbackKind::Rewound => 4,
            CallbackKind::StepComplete => 5,
            CallbackKind::Complete => 6,
        }
    }
}
