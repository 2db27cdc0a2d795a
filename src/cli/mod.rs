//! Command-line interface module
//!
//! This module contains the implementations for the CLI subcommands.

pub mod dot;
pub mod process;

use crate::description::MethodsFile;
use crate::error::{Error, Result};
use crate::method::Method;
use std::path::Path;

/// Load methods from a JSON description, optionally keeping only `only`
pub fn load_methods(input_path: &Path, only: Option<&str>) -> Result<Vec<Method>> {
    let file = MethodsFile::from_file(input_path)?;
    let descriptions: Vec<_> = match only {
        Some(name) => {
            let selected: Vec<_> = file.methods.into_iter().filter(|m| m.name == name).collect();
            if selected.is_empty() {
                return Err(Error::UnknownMethod {
                    name: name.to_string(),
                });
            }
            selected
        }
        None => file.methods,
    };
    descriptions
        .into_iter()
        .map(|description| description.into_method())
        .collect()
}

/// Write `content` to `output_path`, or stdout when absent
pub fn write_output(output_path: Option<&Path>, content: &str) -> Result<()> {
    match output_path {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| Error::Io(format!("Failed to write {}: {}", path.display(), e))),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
