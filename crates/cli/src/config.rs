// Configuration - CLI flags resolved into validated settings

use anyhow::{bail, Context, Result};
use modular_core::domain::ModuleName;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// Everything `generate` needs, checked up front
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub module: ModuleName,
    pub dry_run: bool,
}

impl GenerateConfig {
    /// Module name defaults to the input file stem
    pub fn resolve(
        input: PathBuf,
        output_dir: PathBuf,
        module: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        validate_input(&input)?;

        let module = match module {
            Some(name) => ModuleName::new(name)?,
            None => {
                let stem = input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .with_context(|| format!("Cannot derive module name from {}", input.display()))?;
                ModuleName::new(stem).with_context(|| {
                    format!(
                        "Input file stem is not a valid module name: {} (use --module)",
                        input.display()
                    )
                })?
            }
        };

        if output_dir.exists() && !output_dir.is_dir() {
            bail!("Output path is not a directory: {}", output_dir.display());
        }

        Ok(Self {
            input,
            output_dir,
            module,
            dry_run,
        })
    }
}

/// The input must exist and be a regular file
pub fn validate_input(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Input file not found: {}", path.display()))?;
    if !metadata.is_file() {
        bail!("Input is not a regular file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_defaults_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("std_lib_utils.c");
        std::fs::write(&input, "int x;").unwrap();

        let config =
            GenerateConfig::resolve(input, dir.path().join("out"), None, false).unwrap();
        assert_eq!(config.module.as_str(), "std_lib_utils");
        assert!(!config.dry_run);
    }

    #[test]
    fn test_explicit_module_overrides_stem() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("std-lib-utils.c");
        std::fs::write(&input, "int x;").unwrap();

        let config = GenerateConfig::resolve(
            input,
            dir.path().join("out"),
            Some("utils".to_string()),
            true,
        )
        .unwrap();
        assert_eq!(config.module.as_str(), "utils");
    }

    #[test]
    fn test_invalid_stem_asks_for_module_flag() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("std-lib-utils.c");
        std::fs::write(&input, "int x;").unwrap();

        let err = GenerateConfig::resolve(input, dir.path().join("out"), None, false).unwrap_err();
        assert!(err.to_string().contains("--module"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_input(&dir.path().join("missing.c")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_directory_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_input(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_output_path_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("m.c");
        std::fs::write(&input, "int x;").unwrap();

        let err = GenerateConfig::resolve(input.clone(), input, None, false).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
