use std::path::Path;

use serde::Deserialize;

use crate::error::FetchError;

/// Name of the capture group holding the URL in a link pattern.
pub const URL_GROUP: &str = "url";

/// A downloadable archive referenced from the README.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    /// Short selector, e.g. `gnu`.
    pub name: String,
    /// Markdown link text preceding the URL.
    pub label: String,
    /// Local file the archive is saved as.
    #[serde(rename = "file")]
    pub file_name: String,
    /// Custom regular expression; must capture the URL in a group named `url`.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Artifact {
    pub fn new(name: &str, label: &str, file_name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            file_name: file_name.to_string(),
            pattern: None,
        }
    }

    /// `[<label>](<url>)` where the URL is made of word characters, `.`,
    /// `/`, `:` and `_`.
    pub fn pattern(&self) -> String {
        match &self.pattern {
            Some(custom) => custom.clone(),
            None => format!(
                r"\[{}\]\((?P<{URL_GROUP}>[\w./:_]+)\)",
                regex::escape(&self.label)
            ),
        }
    }

    /// GNU toolchain, LLVM toolchain and the Eclipse bundle, in download order.
    pub fn builtin() -> Vec<Artifact> {
        vec![
            Artifact::new(
                "gnu",
                "GNU-Debian download link",
                "riscv-gnu-toolchain-debian.tar.gz",
            ),
            Artifact::new(
                "llvm",
                "LLVM-Debian download link",
                "riscv-llvm-toolchain-debian.tar.gz",
            ),
            Artifact::new(
                "eclipse",
                "WD Offical Eclipse Tested and supported",
                "eclipse_mcu_2019_12.tar.gz",
            ),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    artifacts: Vec<Artifact>,
}

/// Load an artifact list from YAML:
///
/// ```yaml
/// artifacts:
///   - name: gnu
///     label: GNU-Debian download link
///     file: riscv-gnu-toolchain-debian.tar.gz
/// ```
pub fn load_manifest(path: &Path) -> Result<Vec<Artifact>, FetchError> {
    let bytes = std::fs::read(path).map_err(|source| FetchError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&bytes).map_err(|source| FetchError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_manifest(bytes: &[u8]) -> Result<Vec<Artifact>, serde_yaml::Error> {
    Ok(serde_yaml::from_slice::<Manifest>(bytes)?.artifacts)
}

/// Keep only the artifacts named in `only`, preserving download order.
/// An empty selection keeps everything.
pub fn select(artifacts: Vec<Artifact>, only: &[String]) -> Result<Vec<Artifact>, FetchError> {
    if let Some(unknown) = only
        .iter()
        .find(|name| !artifacts.iter().any(|a| &a.name == *name))
    {
        return Err(FetchError::UnknownArtifact(unknown.clone()));
    }
    if only.is_empty() {
        return Ok(artifacts);
    }
    Ok(artifacts
        .into_iter()
        .filter(|a| only.contains(&a.name))
        .collect())
}
