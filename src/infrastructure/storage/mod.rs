//! Storage traits and implementations

#[cfg(test)]
mod flaky;
mod memory;
mod traits;

#[cfg(test)]
pub(crate) use flaky::FlakyStorage;
pub use memory::InMemoryStorage;
pub use traits::Storage;
