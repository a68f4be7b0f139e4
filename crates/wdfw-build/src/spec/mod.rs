//! Descriptors for the external RISC-V tools: archiver, assembler and C
//! compiler. Each one produces a [`ToolConfig`] that the caller merges into
//! its [`BuildEnv`].

pub mod ar;
pub mod asm;
pub mod cc;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::detect::Detect;
use crate::env::{BuildEnv, EnvValue};
use crate::error::BuildError;

pub use ar::Archiver;
pub use asm::Assembler;
pub use cc::CCompiler;

/// Value of the `TOOLCHAIN` variable set by every tool.
pub const TOOLCHAIN: &str = "RISCV";
/// Root of the GNU binutils installation.
pub const BINUTILS_ROOT_VAR: &str = "RISCV_BINUTILS_TC_PATH";
/// Root of the LLVM installation.
pub const LLVM_ROOT_VAR: &str = "RISCV_LLVM_TC_PATH";

/// Builder action attached to a source suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Assemble,
    AssemblePreprocessed,
    Compile,
}

/// Variables and suffix rules contributed by one tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolConfig {
    pub vars: BTreeMap<String, EnvValue>,
    pub suffixes: BTreeMap<String, Action>,
}

impl ToolConfig {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<EnvValue>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.vars.get(key)
    }

    pub fn claim(&mut self, suffix: impl Into<String>, action: Action) {
        self.suffixes.insert(suffix.into(), action);
    }
}

pub trait ToolSpec {
    fn name(&self) -> &'static str;

    /// Variables needed to invoke the tool, given the environment built so far.
    fn generate(&self, env: &BuildEnv, detector: &dyn Detect) -> ToolConfig;

    /// Whether the tool can be found on the host.
    fn exists(&self, env: &BuildEnv, detector: &dyn Detect) -> bool;
}

/// All tools, in the order they are applied.
pub fn all() -> Vec<&'static dyn ToolSpec> {
    vec![&Archiver as &dyn ToolSpec, &Assembler, &CCompiler]
}

pub fn find(name: &str) -> Result<&'static dyn ToolSpec, BuildError> {
    all()
        .into_iter()
        .find(|tool| tool.name() == name)
        .ok_or_else(|| BuildError::UnknownTool(name.to_string()))
}

/// `$<root>/bin/$<bin>` joined with the host path separator.
pub(crate) fn tool_path(root_var: &str, bin_var: &str) -> String {
    Path::new(&format!("${root_var}"))
        .join("bin")
        .join(format!("${bin_var}"))
        .display()
        .to_string()
}

/// Whether `.x` and `.X` name different source kinds on this host.
pub fn case_sensitive_suffixes() -> bool {
    !cfg!(windows)
}
