use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Host program discovery.
pub trait Detect {
    /// Returns the first of `programs` that can be found on the host.
    fn detect(&self, programs: &[&str]) -> Option<String>;
}

impl<T: Detect + ?Sized> Detect for &T {
    fn detect(&self, programs: &[&str]) -> Option<String> {
        (*self).detect(programs)
    }
}

/// Looks programs up in a list of directories, `PATH` by default.
#[derive(Debug, Clone)]
pub struct PathDetector {
    dirs: Vec<PathBuf>,
}

impl PathDetector {
    pub fn from_env() -> Self {
        Self::from_path_var(std::env::var_os("PATH").unwrap_or_default())
    }

    pub fn from_path_var(path: impl Into<OsString>) -> Self {
        Self {
            dirs: std::env::split_paths(&path.into()).collect(),
        }
    }

    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    fn find(&self, program: &str) -> Option<PathBuf> {
        // Absolute or relative paths are checked as given.
        let as_path = Path::new(program);
        if as_path.components().count() > 1 {
            return is_executable(as_path).then(|| as_path.to_path_buf());
        }

        self.dirs
            .iter()
            .flat_map(|dir| candidates(dir, program))
            .find(|p| is_executable(p))
    }
}

impl Default for PathDetector {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Detect for PathDetector {
    fn detect(&self, programs: &[&str]) -> Option<String> {
        programs.iter().find_map(|program| {
            let found = self.find(program)?;
            log::trace!("detected {program} at {}", found.display());
            Some(program.to_string())
        })
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program), dir.join(program).with_extension("exe")]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
