// Port Layer - Interfaces for external dependencies

pub mod string_comparator;
pub mod time_provider;

// Re-exports
pub use string_comparator::{OrdinalComparator, StringComparator};
pub use time_provider::{SystemTimeProvider, TimeError, TimeProvider};
