//! # Smart Parking Service
//!
//! Parking slot reservation and billing system.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities: slots, bookings, pricing
//! - **application**: Services driving the booking lifecycle, payments
//!   and the no-show sweep
//! - **infrastructure**: Storage behind an async trait
//! - **interfaces**: REST API with Swagger documentation, WebSocket
//!   notifications for UI clients
//! - **notifications**: Event bus broadcasting domain events
//! - **shared**: Shutdown coordination, retry, clock

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{InMemoryStorage, Storage};

// Re-export API router
pub use interfaces::http::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
