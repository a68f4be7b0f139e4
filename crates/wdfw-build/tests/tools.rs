use std::collections::HashSet;

use wdfw_build::spec::{self, Archiver, Assembler, CCompiler};
use wdfw_build::{Action, BuildEnv, Detect, EnvValue, ToolSpec};

/// Detector answering from a fixed set of program names.
struct Stub(HashSet<String>);

impl Stub {
    fn with(programs: &[&str]) -> Self {
        Self(programs.iter().map(|p| p.to_string()).collect())
    }

    fn empty() -> Self {
        Self(HashSet::new())
    }
}

impl Detect for Stub {
    fn detect(&self, programs: &[&str]) -> Option<String> {
        programs
            .iter()
            .find(|p| self.0.contains(**p))
            .map(|p| p.to_string())
    }
}

fn s(v: &str) -> EnvValue {
    EnvValue::str(v)
}

fn empty_list() -> EnvValue {
    EnvValue::List(Vec::new())
}

#[test]
fn archiver_sets_documented_keys() {
    let config = Archiver.generate(&BuildEnv::new(), &Stub::with(&["ranlib"]));

    assert_eq!(config.get("AR_BIN"), Some(&s("riscv32-unknown-elf-ar")));
    assert_eq!(config.get("RANLIB_BIN"), Some(&s("riscv32-unknown-elf-ranlib")));
    assert_eq!(config.get("ARFLAGS"), Some(&EnvValue::list(["rc"])));
    assert_eq!(config.get("ARCOM"), Some(&s("$AR $ARFLAGS $TARGET $SOURCES")));
    assert_eq!(config.get("LIBPREFIX"), Some(&s("lib_")));
    assert_eq!(config.get("RANLIBFLAGS"), Some(&empty_list()));
    assert_eq!(config.get("RANLIBCOM"), Some(&s("$RANLIB $RANLIBFLAGS $TARGET")));
    assert_eq!(config.get("TOOLCHAIN"), Some(&s("RISCV")));
    assert!(config.suffixes.is_empty());

    #[cfg(unix)]
    {
        assert_eq!(config.get("AR"), Some(&s("$RISCV_BINUTILS_TC_PATH/bin/$AR_BIN")));
        assert_eq!(
            config.get("RANLIB"),
            Some(&s("$RISCV_BINUTILS_TC_PATH/bin/$RANLIB_BIN"))
        );
    }
}

#[test]
fn archiver_skips_ranlib_when_not_detected() {
    let config = Archiver.generate(&BuildEnv::new(), &Stub::empty());
    assert!(config.get("AR").is_some());
    for key in ["RANLIB", "RANLIBFLAGS", "RANLIBCOM"] {
        assert!(config.get(key).is_none(), "{key} should be unset");
    }
}

#[test]
fn assembler_sets_documented_keys() {
    let config = Assembler.generate(&BuildEnv::new(), &Stub::empty());

    assert_eq!(config.get("AS_BIN"), Some(&s("clang")));
    assert_eq!(config.get("ASFLAGS"), Some(&empty_list()));
    assert_eq!(
        config.get("ASCOM"),
        Some(&s("$AS $ASFLAGS -o $TARGET $_CCCOMCOM $SOURCES"))
    );
    assert_eq!(config.get("ASPPFLAGS"), Some(&s("$ASFLAGS")));
    assert_eq!(
        config.get("ASPPCOM"),
        Some(&s(
            "$CC $ASPPFLAGS $CPPFLAGS $_CPPDEFFLAGS $_CPPINCFLAGS -c -o $TARGET $SOURCES"
        ))
    );
    assert_eq!(config.get("TOOLCHAIN"), Some(&s("RISCV")));

    for suffix in [".s", ".asm", ".ASM", ".fps"] {
        assert_eq!(config.suffixes.get(suffix), Some(&Action::Assemble), "{suffix}");
    }
    for suffix in [".spp", ".SPP", ".sx"] {
        assert_eq!(
            config.suffixes.get(suffix),
            Some(&Action::AssemblePreprocessed),
            "{suffix}"
        );
    }
}

#[cfg(unix)]
#[test]
fn assembler_preprocesses_capital_s_on_case_sensitive_hosts() {
    let config = Assembler.generate(&BuildEnv::new(), &Stub::empty());
    assert_eq!(config.get("AS"), Some(&s("$RISCV_LLVM_TC_PATH/bin/$AS_BIN")));
    assert_eq!(config.suffixes.get(".S"), Some(&Action::AssemblePreprocessed));
}

#[test]
fn compiler_sets_documented_keys() {
    let config = CCompiler.generate(&BuildEnv::new(), &Stub::empty());

    let expected = [
        ("_CCCOMCOM", s("$CPPFLAGS $_CPPDEFFLAGS $_CPPINCFLAGS")),
        ("FRAMEWORKS", empty_list()),
        ("FRAMEWORKPATH", empty_list()),
        ("CCFLAGS", empty_list()),
        ("SHCCFLAGS", EnvValue::list(["$CCFLAGS"])),
        ("CC_BIN", s("clang")),
        ("STR_TOOL_PREFIX", s("")),
        ("SIZE_BIN", s("riscv32-unknown-elf-size")),
        ("OBJDUMP_BIN", s("riscv32-unknown-elf-objdump")),
        ("OBJDUMP_ATTR", s("")),
        ("OBJCOPY_BIN", s("riscv32-unknown-elf-objcopy")),
        ("READELF_BIN", s("riscv32-unknown-elf-readelf")),
        ("LLVM_OBJDUMP_BIN", s("llvm-objdump")),
        ("CFLAGS", empty_list()),
        (
            "CCCOM",
            s("$CC -o $TARGET -c $CFLAGS $CCFLAGS $_CCCOMCOM $SOURCES $CCPATHS"),
        ),
        ("SHCC", s("$CC")),
        ("SHCFLAGS", EnvValue::list(["$CFLAGS"])),
        (
            "SHCCCOM",
            s("$SHCC -o $TARGET -c $SHCFLAGS $SHCCFLAGS $_CCCOMCOM $SOURCES"),
        ),
        (
            "LINKCOM",
            s("$LINK -o $TARGET $LINKFLAGS $LINKCOM_START_GROUP $SOURCES $__RPATH $_LIBDIRFLAGS $_LIBFLAGS $LINKCOM_END_GROUP"),
        ),
        ("CPPDEFPREFIX", s("-D")),
        ("CPPDEFSUFFIX", s("")),
        ("INCPREFIX", s("-I")),
        ("INCSUFFIX", s("")),
        ("SHOBJSUFFIX", s(".os")),
        ("STATIC_AND_SHARED_OBJECTS_ARE_THE_SAME", EnvValue::Int(0)),
        ("CFILESUFFIX", s(".c")),
        ("TOOLCHAIN", s("RISCV")),
    ];
    for (key, value) in expected {
        assert_eq!(config.get(key), Some(&value), "{key}");
    }

    for suffix in [".c", ".cpp", ".h", ".mm", ".S", ".sx"] {
        assert_eq!(config.suffixes.get(suffix), Some(&Action::Compile), "{suffix}");
    }
}

#[test]
fn compiler_keeps_existing_common_variables() {
    let mut env = BuildEnv::new();
    env.set("_CCCOMCOM", "$CUSTOM");
    env.set("CCFLAGS", EnvValue::list(["-Wall"]));
    env.set("SHCCFLAGS", EnvValue::list(["-fPIC"]));

    let config = CCompiler.generate(&env, &Stub::empty());
    for key in ["_CCCOMCOM", "FRAMEWORKS", "FRAMEWORKPATH", "CCFLAGS", "SHCCFLAGS"] {
        assert!(config.get(key).is_none(), "{key} should not be overwritten");
    }

    env.merge(config);
    assert_eq!(env.get("CCFLAGS"), Some(&EnvValue::list(["-Wall"])));
}

#[test]
fn compiler_adds_framework_path_on_darwin() {
    let mut env = BuildEnv::new();
    env.set("PLATFORM", "darwin");
    let config = CCompiler.generate(&env, &Stub::empty());
    assert_eq!(
        config.get("_CCCOMCOM"),
        Some(&s("$CPPFLAGS $_CPPDEFFLAGS $_CPPINCFLAGS $_FRAMEWORKPATH"))
    );
}

#[test]
fn exists_follows_detector() {
    let env = BuildEnv::new();
    let all = Stub::with(&["ar", "as", "cc"]);
    let none = Stub::empty();

    for tool in spec::all() {
        assert!(tool.exists(&env, &all), "{}", tool.name());
        assert!(!tool.exists(&env, &none), "{}", tool.name());
    }
}

#[test]
fn compiler_exists_probes_expanded_cc() {
    let mut env = BuildEnv::new();
    env.set("RISCV_LLVM_TC_PATH", "/opt/llvm");
    env.apply(&CCompiler, &Stub::empty());

    let expected = std::path::Path::new("/opt/llvm")
        .join("bin")
        .join("clang")
        .display()
        .to_string();

    assert!(CCompiler.exists(&env, &Stub::with(&[expected.as_str()])));
    assert!(!CCompiler.exists(&env, &Stub::with(&["cc"])));
}

#[cfg(unix)]
#[test]
fn merged_environment_renders_command_lines() {
    let mut env = BuildEnv::new();
    env.set("RISCV_BINUTILS_TC_PATH", "/opt/gnu");
    env.set("RISCV_LLVM_TC_PATH", "/opt/llvm");
    env.set("TARGET", "out/demo.a");
    env.set("SOURCES", EnvValue::list(["a.o", "b.o"]));

    let detector = Stub::with(&["ranlib"]);
    for tool in spec::all() {
        env.apply(tool, &detector);
    }

    assert_eq!(
        env.subst("$ARCOM").unwrap(),
        "/opt/gnu/bin/riscv32-unknown-elf-ar rc out/demo.a a.o b.o"
    );
    assert_eq!(
        env.subst("$RANLIBCOM").unwrap(),
        "/opt/gnu/bin/riscv32-unknown-elf-ranlib out/demo.a"
    );
    assert_eq!(env.subst("$SHCC").unwrap(), "/opt/llvm/bin/clang");
    // cc is applied last and claims `.S` for the compiler.
    assert_eq!(env.action_for(".S"), Some(Action::Compile));
    assert_eq!(env.action_for(".asm"), Some(Action::Assemble));
}

#[test]
fn compiler_with_empty_cc_is_missing() {
    let detector = Stub::with(&["cc"]);

    for cc in ["", "   ", "$UNDEFINED"] {
        let mut env = BuildEnv::new();
        env.set("CC", cc);
        assert!(!CCompiler.exists(&env, &detector), "CC={cc:?}");
    }

    assert!(CCompiler.exists(&BuildEnv::new(), &detector));
}
