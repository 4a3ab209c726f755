// Command implementations

use crate::config::GenerateConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use modular_core::application::{parse_c_source, BoilercodeGenerator, GeneratedModule};
use modular_core::domain::{CFile, CItem};
use modular_core::StdLibUtils;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use tracing::{debug, info};

#[derive(Tabled)]
struct FunctionRow {
    kind: &'static str,
    name: String,
    signature: String,
    line: usize,
    #[tabled(rename = "static")]
    is_static: bool,
}

fn read_source(path: &Path) -> Result<CFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "Input read");
    parse_c_source(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse, generate, and write (or print) the module.
/// Returns the paths written; empty on a dry run.
pub fn generate(config: &GenerateConfig, utils: &StdLibUtils) -> Result<Vec<PathBuf>> {
    let file = read_source(&config.input)?;
    let module = BoilercodeGenerator::new(utils)
        .generate(&file, &config.module)
        .with_context(|| format!("Failed to generate module {}", config.module))?;

    if config.dry_run {
        print_module(&module);
        return Ok(Vec::new());
    }

    let written = write_module(&config.output_dir, &module)?;

    println!("{}", "✓ Boilercode generated".green().bold());
    println!();
    println!("  {} {}", "Module:".bold(), config.module);
    println!("  {} {}", "Exported:".bold(), module.exported.join(", "));
    for path in &written {
        println!("  {} {}", "✓".green(), path.display());
    }

    Ok(written)
}

pub fn write_module(output_dir: &Path, module: &GeneratedModule) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut written = Vec::new();
    for (name, contents) in [
        (&module.header_file_name, &module.header),
        (&module.source_file_name, &module.source),
    ] {
        let path = output_dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "File written");
        written.push(path);
    }

    Ok(written)
}

fn print_module(module: &GeneratedModule) {
    println!("{}", format!("// ---- {} ----", module.header_file_name).cyan());
    print!("{}", module.header);
    println!();
    println!("{}", format!("// ---- {} ----", module.source_file_name).cyan());
    print!("{}", module.source);
}

/// Print parsed functions as a table, or the whole model as JSON
pub fn inspect(input: &Path, json: bool) -> Result<()> {
    let file = read_source(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
        return Ok(());
    }

    let rows = function_rows(&file);
    if rows.is_empty() {
        println!("{}", "No functions found".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Functions in {}:", input.display()).cyan().bold()
    );
    println!("{}", Table::new(rows));
    Ok(())
}

fn function_rows(file: &CFile) -> Vec<FunctionRow> {
    file.items
        .iter()
        .filter_map(|item| match item {
            CItem::Declaration(f) => Some(("declaration", f)),
            CItem::Definition(f) => Some(("definition", f)),
            _ => None,
        })
        .map(|(kind, f)| FunctionRow {
            kind,
            name: f.name.clone(),
            signature: f.signature(),
            line: f.line,
            is_static: f.is_static,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modular_core::domain::ModuleName;
    use modular_core::port::time_provider::mocks::FixedTimeProvider;
    use modular_core::port::OrdinalComparator;
    use std::sync::Arc;

    const SOURCE: &str = "#include <time.h>\n\
                          static int seed(void) { return 7; }\n\
                          unsigned long stamp(void) { return (unsigned long)time(NULL) + seed(); }\n";

    fn fixed_utils() -> StdLibUtils {
        StdLibUtils::new(
            Arc::new(FixedTimeProvider::new(1_700_000_000)),
            Arc::new(OrdinalComparator),
        )
    }

    #[test]
    fn test_generate_writes_header_and_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stamp.c");
        std::fs::write(&input, SOURCE).unwrap();
        let output_dir = dir.path().join("build").join("nested");

        let config = GenerateConfig {
            input,
            output_dir: output_dir.clone(),
            module: ModuleName::new("stamp").unwrap(),
            dry_run: false,
        };
        let written = generate(&config, &fixed_utils()).unwrap();

        assert_eq!(
            written,
            vec![output_dir.join("stamp.h"), output_dir.join("stamp.c")]
        );
        let header = std::fs::read_to_string(output_dir.join("stamp.h")).unwrap();
        assert!(header.contains("unsigned long (*stamp)(void);"));
        let source = std::fs::read_to_string(output_dir.join("stamp.c")).unwrap();
        assert!(source.contains("static unsigned long stamp(void);"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stamp.c");
        std::fs::write(&input, SOURCE).unwrap();
        let output_dir = dir.path().join("build");

        let config = GenerateConfig {
            input,
            output_dir: output_dir.clone(),
            module: ModuleName::new("stamp").unwrap(),
            dry_run: true,
        };

        assert!(generate(&config, &fixed_utils()).unwrap().is_empty());
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.c");
        std::fs::write(&input, "int f(void) {").unwrap();

        let config = GenerateConfig {
            input,
            output_dir: dir.path().join("build"),
            module: ModuleName::new("broken").unwrap(),
            dry_run: false,
        };
        let err = generate(&config, &fixed_utils()).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.c"));
        assert!(format!("{:#}", err).contains("never closed"));
    }

    #[test]
    fn test_function_rows() {
        let file = parse_c_source(SOURCE).unwrap();
        let rows = function_rows(&file);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "seed");
        assert!(rows[0].is_static);
        assert_eq!(rows[1].signature, "unsigned long stamp(void)");
        assert_eq!(rows[1].kind, "definition");
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_inspect_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stamp.c");
        std::fs::write(&input, SOURCE).unwrap();

        assert!(inspect(&input, true).is_ok());
        assert!(inspect(&input, false).is_ok());
    }
}
