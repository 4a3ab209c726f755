// Domain Layer - C translation unit model

pub mod c_file;
pub mod error;
pub mod module_name;

// Re-exports
pub use c_file::{CArg, CFile, CFunction, CItem};
pub use error::DomainError;
pub use module_name::ModuleName;
