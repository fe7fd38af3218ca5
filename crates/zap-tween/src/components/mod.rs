// components/mod.rs
//
// The playable units: tweens (one target, many properties) and sequences
// (timelines of tweens and nested sequences).

pub mod animation;
pub mod sequence;
pub mod tween;

pub use animation::{Animation, Component};
pub use sequence::{Sequence, SequenceItem};
pub use tween::Tween;
