//! Firmware demo descriptors: what each demo defines, which extra flags it
//! needs and which boards it builds for.

mod comrv_dataoverlay;
mod internal_timers;
mod trap_baremetal;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::env::BuildEnv;
use crate::error::BuildError;

pub use comrv_dataoverlay::comrv_dataoverlay;
pub use internal_timers::internal_timers;
pub use trap_baremetal::trap_baremetal;

/// Target boards / cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    Eh1,
    Eh2,
    El2,
    Hifive1,
}

impl Board {
    pub const ALL: [Board; 4] = [Board::Eh1, Board::Eh2, Board::El2, Board::Hifive1];

    pub fn as_str(self) -> &'static str {
        match self {
            Board::Eh1 => "eh1",
            Board::Eh2 => "eh2",
            Board::El2 => "el2",
            Board::Hifive1 => "hifive1",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Board {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eh1" => Ok(Self::Eh1),
            "eh2" => Ok(Self::Eh2),
            "el2" => Ok(Self::El2),
            "hifive1" => Ok(Self::Hifive1),
            _ => Err(BuildError::UnknownBoard(s.to_string())),
        }
    }
}

/// Memory reserved for the overlay engine, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComrvLayout {
    /// RAM reserved for executing overlay functions and holding overlay data.
    pub cache_size: u32,
    pub cache_alignment: u32,
    pub overlay_storage_size: u32,
}

impl ComrvLayout {
    /// Linker symbol definitions describing this layout.
    pub fn linker_defsyms(&self) -> Vec<String> {
        vec![
            format!("-Wl,--defsym=__comrv_cache_size={}", self.cache_size),
            format!(
                "-Wl,--defsym=__comrv_cache_alignment_size={}",
                self.cache_alignment
            ),
            format!(
                "-Wl,--defsym=__comrv_overlay_storage_size={}",
                self.overlay_storage_size
            ),
        ]
    }
}

/// Build parameters of one firmware demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoSpec {
    pub name: String,
    pub rtos_core: String,
    pub toolchain: String,
    pub toolchain_path: String,
    /// Linker grouping file placing the overlay groups.
    pub grouping_file: Option<PathBuf>,
    pub link_file_prefix: String,
    pub comrv: Option<ComrvLayout>,
    pub public_defs: Vec<String>,
    /// Build scripts of the modules the demo is made of.
    pub sconscripts: Vec<String>,
    pub c_flags: Vec<String>,
    pub linker_flags: Vec<String>,
    pub targets: Vec<Board>,
}

impl DemoSpec {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rtos_core: String::new(),
            toolchain: String::new(),
            toolchain_path: String::new(),
            grouping_file: None,
            link_file_prefix: String::new(),
            comrv: None,
            public_defs: Vec::new(),
            sconscripts: Vec::new(),
            c_flags: Vec::new(),
            linker_flags: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn supports(&self, board: Board) -> bool {
        self.targets.contains(&board)
    }

    /// Preprocessor defines rendered with the environment's
    /// `CPPDEFPREFIX`/`CPPDEFSUFFIX` (`-D` and nothing when unset).
    pub fn cpp_defines(&self, env: &BuildEnv) -> Vec<String> {
        let affix = |key: &str, default: &str| {
            env.get(key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| default.to_string())
        };
        let prefix = affix("CPPDEFPREFIX", "-D");
        let suffix = affix("CPPDEFSUFFIX", "");
        self.public_defs
            .iter()
            .map(|def| format!("{prefix}{def}{suffix}"))
            .collect()
    }
}

/// Every demo, sorted by name.
pub fn all() -> Vec<DemoSpec> {
    vec![comrv_dataoverlay(), internal_timers(), trap_baremetal()]
}

pub fn find(name: &str) -> Result<DemoSpec, BuildError> {
    all()
        .into_iter()
        .find(|demo| demo.name == name)
        .ok_or_else(|| BuildError::UnknownDemo(name.to_string()))
}
