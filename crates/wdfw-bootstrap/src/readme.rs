use std::path::Path;

use regex::Regex;

use crate::artifact::{Artifact, URL_GROUP};
use crate::error::FetchError;

pub const DEFAULT_README: &str = "README.md";

/// Read the whole README. A missing file is fatal.
pub fn load(path: &Path) -> Result<String, FetchError> {
    std::fs::read_to_string(path).map_err(|source| FetchError::MissingReadme {
        path: path.to_path_buf(),
        source,
    })
}

/// URL captured by the first link matching `artifact`'s pattern.
pub fn extract_url(text: &str, artifact: &Artifact) -> Result<String, FetchError> {
    let re = Regex::new(&artifact.pattern()).map_err(|source| FetchError::InvalidPattern {
        artifact: artifact.name.clone(),
        source,
    })?;

    re.captures(text)
        .and_then(|caps| caps.name(URL_GROUP))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FetchError::PatternNotFound {
            artifact: artifact.name.clone(),
            label: artifact.label.clone(),
        })
}
