// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid module name: {0:?} (expected a C identifier)")]
    InvalidModuleName(String),

    #[error("Function defined more than once: {name} (lines {first_line} and {second_line})")]
    DuplicateFunction {
        name: String,
        first_line: usize,
        second_line: usize,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
