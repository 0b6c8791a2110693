//! Common utilities and abstractions for services

/// Single-subscriber callback slots
pub mod callback;
/// Reactive property system for fine-grained state updates
pub mod property;
/// Shared type aliases
pub mod types;

pub use callback::CallbackSlot;
pub use property::Property;
