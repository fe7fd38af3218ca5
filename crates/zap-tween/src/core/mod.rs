pub mod error;
pub mod events;
pub mod state;
pub mod store;
pub mod target;
