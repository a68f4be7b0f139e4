use super::{tool_path, ToolConfig, ToolSpec, BINUTILS_ROOT_VAR, TOOLCHAIN};
use crate::detect::Detect;
use crate::env::{BuildEnv, EnvValue};

/// GNU archiver, plus `ranlib` when the host has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Archiver;

impl ToolSpec for Archiver {
    fn name(&self) -> &'static str {
        "ar"
    }

    fn generate(&self, _env: &BuildEnv, detector: &dyn Detect) -> ToolConfig {
        let mut config = ToolConfig::default();

        config.set("AR_BIN", "riscv32-unknown-elf-ar");
        config.set("RANLIB_BIN", "riscv32-unknown-elf-ranlib");

        config.set("AR", tool_path(BINUTILS_ROOT_VAR, "AR_BIN"));
        config.set("ARFLAGS", EnvValue::list(["rc"]));
        config.set("ARCOM", "$AR $ARFLAGS $TARGET $SOURCES");
        config.set("LIBPREFIX", "lib_");

        if detector.detect(&["ranlib"]).is_some() {
            config.set("RANLIB", tool_path(BINUTILS_ROOT_VAR, "RANLIB_BIN"));
            config.set("RANLIBFLAGS", EnvValue::List(Vec::new()));
            config.set("RANLIBCOM", "$RANLIB $RANLIBFLAGS $TARGET");
        } else {
            log::debug!("ranlib not found, archives will not be indexed");
        }

        config.set("TOOLCHAIN", TOOLCHAIN);
        config
    }

    fn exists(&self, _env: &BuildEnv, detector: &dyn Detect) -> bool {
        detector.detect(&["ar"]).is_some()
    }
}
