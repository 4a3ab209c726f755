//! Boilercode Generator - rewrites a C module behind an operations table
//!
//! Every public function definition becomes private (`static`) and is
//! reachable only through a struct of function pointers returned by
//! `get_<module>_ops()`. Callers that go through the table can have the
//! implementations swapped out in tests.

use crate::application::StdLibUtils;
use crate::domain::{CFile, CFunction, CItem, DomainError, ModuleName};
use crate::error::Result;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Entry point, never exported through the table
const MAIN_FUNCTION: &str = "main";

/// Header and source produced for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedModule {
    pub header_file_name: String,
    pub header: String,
    pub source_file_name: String,
    pub source: String,
    /// Names of the functions placed in the operations table, in order
    pub exported: Vec<String>,
}

pub struct BoilercodeGenerator<'a> {
    utils: &'a StdLibUtils,
}

impl<'a> BoilercodeGenerator<'a> {
    /// # Example
    /// ```text
    /// let generator = BoilercodeGenerator::new(get_std_lib_utils());
    /// let module = generator.generate(&file, &ModuleName::new("std_lib_utils")?)?;
    /// ```
    pub fn new(utils: &'a StdLibUtils) -> Self {
        Self { utils }
    }

    pub fn generate(&self, file: &CFile, module: &ModuleName) -> Result<GeneratedModule> {
        let exported = self.exported_functions(file)?;
        if exported.is_empty() {
            return Err(DomainError::ValidationError(format!(
                "module {} defines no public functions to export",
                module
            ))
            .into());
        }

        let banner = self.banner(module);
        let header = self.render_header(file, module, &exported, &banner);
        let source = self.render_source(file, module, &exported, &banner);

        info!(
            module = %module,
            exported = exported.len(),
            "Boilercode generated"
        );

        Ok(GeneratedModule {
            header_file_name: module.header_file(),
            header,
            source_file_name: module.source_file(),
            source,
            exported: exported.iter().map(|f| f.name.clone()).collect(),
        })
    }

    /// Non-static definitions except `main`, rejecting duplicate definitions.
    /// A `static` prototype gives the later definition internal linkage too.
    fn exported_functions<'f>(&self, file: &'f CFile) -> Result<Vec<&'f CFunction>> {
        let static_prototypes: Vec<&CFunction> =
            file.declarations().filter(|decl| decl.is_static).collect();
        let mut seen: Vec<&CFunction> = Vec::new();
        let mut exported = Vec::new();

        for func in file.definitions() {
            if let Some(first) = seen
                .iter()
                .find(|earlier| self.utils.are_strings_equal(&earlier.name, &func.name))
            {
                return Err(DomainError::DuplicateFunction {
                    name: func.name.clone(),
                    first_line: first.line,
                    second_line: func.line,
                }
                .into());
            }
            seen.push(func);

            let declared_static = static_prototypes.iter().any(|decl| {
                decl.line < func.line && self.utils.are_strings_equal(&decl.name, &func.name)
            });
            if func.is_static
                || declared_static
                || self.utils.are_strings_equal(&func.name, MAIN_FUNCTION)
            {
                debug!(function = %func.name, "Skipping non-exportable function");
                continue;
            }
            exported.push(func);
        }

        Ok(exported)
    }

    fn exported_index(&self, name: &str, exported: &[&CFunction]) -> Option<usize> {
        exported
            .iter()
            .position(|f| self.utils.are_strings_equal(&f.name, name))
    }

    /// Whether `text` uses `name` as a whole identifier
    fn mentions(&self, text: &str, name: &str) -> bool {
        text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| self.utils.are_strings_equal(word, name))
    }

    fn banner(&self, module: &ModuleName) -> String {
        let generated_at = self
            .utils
            .get_current_time()
            .ok()
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown time".to_string());

        format!(
            "/*\n * Generated by modular-c-gen v{} for module `{}` at {}.\n */\n",
            crate::VERSION,
            module,
            generated_at
        )
    }

    fn render_header(
        &self,
        file: &CFile,
        module: &ModuleName,
        exported: &[&CFunction],
        banner: &str,
    ) -> String {
        let guard = module.include_guard();
        let mut out = String::new();

        out.push_str(banner);
        out.push_str(&format!("#ifndef {}\n#define {}\n\n", guard, guard));

        let system_includes: Vec<&str> = file
            .includes()
            .filter(|line| include_target(line).is_some_and(|t| t.starts_with('<')))
            .collect();
        for line in &system_includes {
            out.push_str(line);
            out.push('\n');
        }
        if !system_includes.is_empty() {
            out.push('\n');
        }

        out.push_str(&format!("struct {} {{\n", module.ops_struct()));
        for func in exported {
            out.push_str(&format!("  {};\n", func.pointer_member()));
        }
        out.push_str("};\n\n");

        out.push_str(&format!(
            "struct {} *{}(void);\n\n",
            module.ops_struct(),
            module.ops_accessor()
        ));
        out.push_str(&format!("#endif /* {} */\n", guard));
        out
    }

    fn render_source(
        &self,
        file: &CFile,
        module: &ModuleName,
        exported: &[&CFunction],
        banner: &str,
    ) -> String {
        let mut out = String::new();
        out.push_str(banner);

        // Includes, own header last if the input did not have it
        let own_header = module.header_file();
        let mut has_own_header = false;
        for line in file.includes() {
            if let Some(target) = include_target(line) {
                let file_name = target
                    .trim_matches(|c| c == '"' || c == '<' || c == '>')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default();
                if self.utils.are_strings_equal(file_name, &own_header) {
                    has_own_header = true;
                }
            }
            out.push_str(line);
            out.push('\n');
        }
        if !has_own_header {
            out.push_str(&format!("#include \"{}\"\n", own_header));
        }
        out.push('\n');

        // An exported prototype goes where the input first declared the
        // function, or before the first item that refers to it, so globals
        // such as dispatch tables still see a declaration.
        out.push_str(&section("PRIVATE DECLARATIONS & DEFINITIONS"));
        let mut declared = vec![false; exported.len()];
        for item in &file.items {
            match item {
                CItem::Directive(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                CItem::Other(text) => {
                    for (idx, func) in exported.iter().enumerate() {
                        if !declared[idx] && self.mentions(text, &func.name) {
                            out.push_str(&static_prototype(func));
                            declared[idx] = true;
                        }
                    }
                    out.push_str(text);
                    out.push('\n');
                }
                CItem::Declaration(func) => match self.exported_index(&func.name, exported) {
                    Some(idx) if !declared[idx] => {
                        out.push_str(&static_prototype(exported[idx]));
                        declared[idx] = true;
                    }
                    Some(_) => {}
                    None => {
                        out.push_str(&func.source);
                        out.push('\n');
                    }
                },
                _ => {}
            }
        }
        for (func, _) in exported.iter().zip(&declared).filter(|(_, done)| !**done) {
            out.push_str(&static_prototype(func));
        }
        out.push('\n');

        out.push_str(&section("MODULARITY BOILERCODE"));
        out.push_str(&format!(
            "static struct {} {} = {{\n",
            module.ops_struct(),
            module.ops_instance()
        ));
        for func in exported {
            out.push_str(&format!("    .{} = {},\n", func.name, func.name));
        }
        out.push_str("};\n\n");
        out.push_str(&format!(
            "struct {} *{}(void) {{\n  return &{};\n}}\n\n",
            module.ops_struct(),
            module.ops_accessor(),
            module.ops_instance()
        ));

        out.push_str(&section("INIT BOILERCODE"));
        out.push('\n');

        out.push_str(&section("API"));
        let bodies: Vec<&str> = file.definitions().map(|f| f.source.as_str()).collect();
        out.push_str(&bodies.join("\n\n"));
        out.push('\n');

        out
    }
}

fn static_prototype(func: &CFunction) -> String {
    format!("static {};\n", func.signature())
}

fn section(title: &str) -> String {
    format!(
        "/{}\n *    {}\n {}/\n",
        "*".repeat(79),
        title,
        "*".repeat(78)
    )
}

/// `"foo.h"` or `<foo.h>` from an `#include` line
fn include_target(line: &str) -> Option<&str> {
    let rest = line
        .trim_start_matches('#')
        .trim_start()
        .strip_prefix("include")?
        .trim();
    let close = match rest.chars().next()? {
        '"' => rest[1..].find('"')? + 1,
        '<' => rest.find('>')?,
        _ => return None,
    };
    Some(&rest[..=close])
}
