// Application Layer - Use Cases

pub mod boilercode;
pub mod parser;
pub mod std_lib_utils;

// Re-exports
pub use boilercode::{BoilercodeGenerator, GeneratedModule};
pub use parser::parse_c_source;
pub use std_lib_utils::StdLibUtils;
