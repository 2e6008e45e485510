//! Domain events, synchronous execution, and explicit change listeners.
//!
//! There is no global bus: hosts that want to react to domain changes register
//! listeners on the component that owns the state and receive events in order.

pub mod event;
pub mod handler;
pub mod listener;

pub use event::Event;
pub use handler::execute;
pub use listener::{Listener, ListenerId, Listeners};
