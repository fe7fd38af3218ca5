pub mod api;
pub mod core;
pub mod components;
pub mod plugins;
pub mod systems;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{ManagerConfig, PlaybackConfig, SequenceConfig, TweenConfig};
pub use api::types::{CallbackKind, LoopType, TweenId};
pub use components::{Animation, Component, Sequence, SequenceItem, Tween};
pub use core::error::{Result, TweenError};
pub use core::events::{Callback, CompletionQueue, TweenEvent};
pub use core::state::ComponentState;
pub use core::store::{TargetKey, TargetStore};
pub use core::target::{Property, TargetWorld, TickContext};
pub use plugins::{LoopInfo, Plugin, PluginCore, RotationPlugin, TweenSettings, Tweenable, ValuePlugin};
#[cfg(feature = "paths")]
pub use plugins::PathPlugin;
pub use systems::manager::{TweenFilter, TweenManager};

// Extensions
pub use extensions::{EaseShape, Easing, OverwriteConfig, lerp};
#[cfg(feature = "paths")]
pub use extensions::Path;
