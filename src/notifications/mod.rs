//! Notifications module
//!
//! Event bus plus event definitions for real-time delivery to UI
//! clients. The WebSocket endpoint that streams these lives in
//! `interfaces::ws`.

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
