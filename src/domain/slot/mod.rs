//! Slot aggregate

pub mod model;

pub use model::{PlaceType, Slot};
