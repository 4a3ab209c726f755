// Modular Core - Utility Provider, C Source Model & Boilerplate Generation
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::std_lib_utils::{are_strings_equal, get_current_time, get_std_lib_utils};
pub use application::StdLibUtils;
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
