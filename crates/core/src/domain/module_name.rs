// Module Name - names every generated symbol

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Validated C identifier naming a module (e.g. `std_lib_utils`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let name = s.into();
        if !is_c_identifier(&name) {
            return Err(DomainError::InvalidModuleName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `StdLibUtilsOps`
    pub fn ops_struct(&self) -> String {
        let pascal: String = self
            .0
            .split('_')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let mut chars = segment.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect();
        format!("{}Ops", pascal)
    }

    /// `std_lib_utils_ops`
    pub fn ops_instance(&self) -> String {
        format!("{}_ops", self.0)
    }

    /// `get_std_lib_utils_ops`
    pub fn ops_accessor(&self) -> String {
        format!("get_{}_ops", self.0)
    }

    pub fn header_file(&self) -> String {
        format!("{}.h", self.0)
    }

    pub fn source_file(&self) -> String {
        format!("{}.c", self.0)
    }

    /// `STD_LIB_UTILS_H`
    pub fn include_guard(&self) -> String {
        format!("{}_H", self.0.to_ascii_uppercase())
    }
}

impl std::fmt::Display for ModuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ModuleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
