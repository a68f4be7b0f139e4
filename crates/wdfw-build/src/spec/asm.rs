use super::{case_sensitive_suffixes, tool_path, Action, ToolConfig, ToolSpec, LLVM_ROOT_VAR, TOOLCHAIN};
use crate::detect::Detect;
use crate::env::{BuildEnv, EnvValue};

const AS_SUFFIXES: &[&str] = &[".s", ".asm", ".ASM", ".fps"];
const ASPP_SUFFIXES: &[&str] = &[".spp", ".SPP", ".sx"];

/// Assembler, driven through clang.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler;

impl Assembler {
    /// Suffixes assembled as-is and suffixes run through the preprocessor.
    ///
    /// `.S` is preprocessed where suffixes are case sensitive; elsewhere it
    /// cannot be told apart from `.s`.
    pub fn suffixes() -> (Vec<&'static str>, Vec<&'static str>) {
        let mut plain = AS_SUFFIXES.to_vec();
        let mut preprocessed = ASPP_SUFFIXES.to_vec();
        if case_sensitive_suffixes() {
            preprocessed.push(".S");
        } else {
            plain.push(".S");
        }
        (plain, preprocessed)
    }
}

impl ToolSpec for Assembler {
    fn name(&self) -> &'static str {
        "as"
    }

    fn generate(&self, _env: &BuildEnv, _detector: &dyn Detect) -> ToolConfig {
        let mut config = ToolConfig::default();

        let (plain, preprocessed) = Self::suffixes();
        for suffix in plain {
            config.claim(suffix, Action::Assemble);
        }
        for suffix in preprocessed {
            config.claim(suffix, Action::AssemblePreprocessed);
        }

        config.set("AS_BIN", "clang");

        config.set("AS", tool_path(LLVM_ROOT_VAR, "AS_BIN"));
        config.set("ASFLAGS", EnvValue::List(Vec::new()));
        config.set("ASCOM", "$AS $ASFLAGS -o $TARGET $_CCCOMCOM $SOURCES");
        config.set("ASPPFLAGS", "$ASFLAGS");
        config.set(
            "ASPPCOM",
            "$CC $ASPPFLAGS $CPPFLAGS $_CPPDEFFLAGS $_CPPINCFLAGS -c -o $TARGET $SOURCES",
        );
        config.set("TOOLCHAIN", TOOLCHAIN);
        config
    }

    fn exists(&self, _env: &BuildEnv, detector: &dyn Detect) -> bool {
        detector.detect(&["as"]).is_some()
    }
}
