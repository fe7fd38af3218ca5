// extensions/mod.rs
//
// Math and policy modules used by the plugins and the manager.
// Easing and path evaluation are pure; the overwrite policy is opt-in.

pub mod easing;
#[cfg(feature = "paths")]
pub mod path;
pub mod overwrite;

pub use easing::{EaseShape, Easing, lerp};
#[cfg(feature = "paths")]
pub use path::Path;
pub use overwrite::OverwriteConfig;
