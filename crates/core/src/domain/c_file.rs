// C Source Model
//
// Ordered view of a translation unit: what the parser produces and what the
// boilerplate generator consumes.

use serde::{Deserialize, Serialize};

/// A single function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CArg {
    /// None for unnamed parameters and `...`
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    /// Parameter as written, whitespace-normalized (e.g. `char *str_a`)
    pub declaration: String,
}

impl std::fmt::Display for CArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.declaration)
    }
}

/// A function declaration or definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CFunction {
    pub name: String,
    /// Return type without storage specifiers (`static`, `extern`, `inline`)
    pub return_type: String,
    pub args: Vec<CArg>,
    pub is_static: bool,
    /// 1-based line of the first token
    pub line: usize,
    /// Original source text (prototype including `;`, or full definition)
    pub source: String,
}

impl CFunction {
    /// Parameter list as it appears between the parentheses
    pub fn args_list(&self) -> String {
        if self.args.is_empty() {
            return "void".to_string();
        }
        self.args
            .iter()
            .map(|arg| arg.declaration.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `unsigned long get_current_time(void)`
    pub fn signature(&self) -> String {
        format!("{}{}({})", self.return_prefix(), self.name, self.args_list())
    }

    /// Function-pointer struct member: `unsigned long (*get_current_time)(void)`
    pub fn pointer_member(&self) -> String {
        format!(
            "{}(*{})({})",
            self.return_prefix(),
            self.name,
            self.args_list()
        )
    }

    fn return_prefix(&self) -> String {
        if self.return_type.ends_with('*') {
            self.return_type.clone()
        } else {
            format!("{} ", self.return_type)
        }
    }
}

/// Top-level item of a translation unit, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CItem {
    /// `#include` line
    Include(String),
    /// Any other preprocessor line (`#define`, `#pragma`, ...)
    Directive(String),
    Declaration(CFunction),
    Definition(CFunction),
    /// Globals, typedefs, struct definitions - kept verbatim
    Other(String),
}

/// Parsed C source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CFile {
    pub items: Vec<CItem>,
}

impl CFile {
    pub fn new(items: Vec<CItem>) -> Self {
        Self { items }
    }

    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            CItem::Include(line) => Some(line.as_str()),
            _ => None,
        })
    }

    pub fn declarations(&self) -> impl Iterator<Item = &CFunction> {
        self.items.iter().filter_map(|item| match item {
            CItem::Declaration(func) => Some(func),
            _ => None,
        })
    }

    pub fn definitions(&self) -> impl Iterator<Item = &CFunction> {
        self.items.iter().filter_map(|item| match item {
            CItem::Definition(func) => Some(func),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
