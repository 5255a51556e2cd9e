mod debounce;
mod engine;
mod types;

pub use engine::InputEngine;
pub use types::GestureEvent;
