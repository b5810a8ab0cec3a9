//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_CORPUS_FILE;
use crate::{ComplianceError, ComplianceResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    corpus_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::InvalidInput` if `corpus_path` is not an existing file.
    pub fn new(corpus_path: PathBuf) -> ComplianceResult<Self> {
        if !corpus_path.is_file() {
            return Err(ComplianceError::InvalidInput(format!(
                "corpus file does not exist: {}",
                corpus_path.display()
            )));
        }

        Ok(Self { corpus_path })
    }

    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }
}

/// Resolve the corpus file without reading environment variables.
///
/// If `override_path` is provided it must be an existing file. Otherwise this looks for
/// `data/fire_safety_regulatory_data.json` relative to the current working directory and
/// then walks up from `CARGO_MANIFEST_DIR`.
///
/// # Errors
///
/// Returns `ComplianceError::InvalidInput` if no corpus file can be located.
pub fn resolve_corpus_path(override_path: Option<PathBuf>) -> ComplianceResult<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
        return Err(ComplianceError::InvalidInput(format!(
            "REGUBIZ_CORPUS_PATH override is not a file: {}",
            path.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_CORPUS_FILE);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_CORPUS_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(ComplianceError::InvalidInput(format!(
        "could not locate {DEFAULT_CORPUS_FILE}"
    )))
}
