use super::{case_sensitive_suffixes, tool_path, Action, ToolConfig, ToolSpec, LLVM_ROOT_VAR, TOOLCHAIN};
use crate::detect::Detect;
use crate::env::{BuildEnv, EnvValue};

const C_SUFFIXES: &[&str] = &[
    ".c", ".C", ".cxx", ".cpp", ".c++", ".cc", ".h", ".H", ".hxx", ".hpp", ".hh", ".m", ".mm",
    ".S", ".spp", ".SPP", ".sx",
];

/// Fallback program probed by [`CCompiler::exists`] when `CC` is unset.
const DEFAULT_COMPILER: &str = "cc";

/// C compiler (clang) together with the GNU binutils helpers the firmware
/// build uses for size reports and image conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct CCompiler;

impl CCompiler {
    pub fn suffixes() -> Vec<&'static str> {
        let mut suffixes = C_SUFFIXES.to_vec();
        if !case_sensitive_suffixes() {
            suffixes.push(".C");
        }
        suffixes
    }

    /// Variables shared with other C-family tools; only filled in when the
    /// environment does not already carry them.
    fn add_common_variables(env: &BuildEnv, config: &mut ToolConfig) {
        if !env.contains("_CCCOMCOM") {
            let mut cccomcom = String::from("$CPPFLAGS $_CPPDEFFLAGS $_CPPINCFLAGS");
            if env.get("PLATFORM").and_then(EnvValue::as_str) == Some("darwin") {
                cccomcom.push_str(" $_FRAMEWORKPATH");
            }
            config.set("_CCCOMCOM", cccomcom);
            config.set("FRAMEWORKS", EnvValue::List(Vec::new()));
            config.set("FRAMEWORKPATH", EnvValue::List(Vec::new()));
        }

        if !env.contains("CCFLAGS") {
            config.set("CCFLAGS", EnvValue::List(Vec::new()));
        }

        if !env.contains("SHCCFLAGS") {
            config.set("SHCCFLAGS", EnvValue::list(["$CCFLAGS"]));
        }
    }
}

impl ToolSpec for CCompiler {
    fn name(&self) -> &'static str {
        "cc"
    }

    fn generate(&self, env: &BuildEnv, _detector: &dyn Detect) -> ToolConfig {
        let mut config = ToolConfig::default();

        for suffix in Self::suffixes() {
            config.claim(suffix, Action::Compile);
        }

        Self::add_common_variables(env, &mut config);

        config.set("CC_BIN", "clang");
        // Empty prefix selects the GNU flavour of the helper tools.
        config.set("STR_TOOL_PREFIX", "");
        config.set("SIZE_BIN", "riscv32-unknown-elf-size");
        config.set("OBJDUMP_BIN", "riscv32-unknown-elf-objdump");
        config.set("OBJDUMP_ATTR", "");
        config.set("OBJCOPY_BIN", "riscv32-unknown-elf-objcopy");
        config.set("READELF_BIN", "riscv32-unknown-elf-readelf");
        config.set("LLVM_OBJDUMP_BIN", "llvm-objdump");

        config.set("CC", tool_path(LLVM_ROOT_VAR, "CC_BIN"));
        config.set("CFLAGS", EnvValue::List(Vec::new()));
        config.set(
            "CCCOM",
            "$CC -o $TARGET -c $CFLAGS $CCFLAGS $_CCCOMCOM $SOURCES $CCPATHS",
        );
        config.set("SHCC", "$CC");
        config.set("SHCFLAGS", EnvValue::list(["$CFLAGS"]));
        config.set(
            "SHCCCOM",
            "$SHCC -o $TARGET -c $SHCFLAGS $SHCCFLAGS $_CCCOMCOM $SOURCES",
        );

        config.set(
            "LINKCOM",
            "$LINK -o $TARGET $LINKFLAGS $LINKCOM_START_GROUP $SOURCES $__RPATH $_LIBDIRFLAGS $_LIBFLAGS $LINKCOM_END_GROUP",
        );

        config.set("CPPDEFPREFIX", "-D");
        config.set("CPPDEFSUFFIX", "");
        config.set("INCPREFIX", "-I");
        config.set("INCSUFFIX", "");
        config.set("SHOBJSUFFIX", ".os");
        config.set("STATIC_AND_SHARED_OBJECTS_ARE_THE_SAME", 0i64);
        config.set("CFILESUFFIX", ".c");
        config.set("TOOLCHAIN", TOOLCHAIN);
        config
    }

    fn exists(&self, env: &BuildEnv, detector: &dyn Detect) -> bool {
        let program = match env.get("CC") {
            Some(cc) => env.subst(&cc.to_string()).unwrap_or_else(|err| {
                log::warn!("cannot expand CC: {err}");
                cc.to_string()
            }),
            None => DEFAULT_COMPILER.to_string(),
        };
        // `CC` may carry arguments, only the program itself is probed.
        // A `CC` that expands to nothing names no program at all.
        match program.split_whitespace().next() {
            Some(program) => detector.detect(&[program]).is_some(),
            None => false,
        }
    }
}
