// sh! command execution

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{bail, Context, Result};
use derive_builder::Builder;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMode {
    Inherit,
    Pipe,
    Null,
}

impl StreamMode {
    fn stdio(&self) -> Stdio {
        match self {
            StreamMode::Inherit => Stdio::inherit(),
            StreamMode::Pipe => Stdio::piped(),
            StreamMode::Null => Stdio::null(),
        }
    }
}

#[derive(Clone, Debug, Builder)]
#[builder(default)]
pub struct ShOptions {
    pub stdout: StreamMode,
    pub stderr: StreamMode,
    #[builder(setter(into, strip_option))]
    pub cwd: Option<PathBuf>,
    /// Extra environment for the child, e.g. toolchain roots.
    pub envs: Vec<(String, String)>,
    /// Do not echo the command before running it.
    pub quiet: bool,
}

impl Default for ShOptions {
    fn default() -> Self {
        Self {
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
            cwd: None,
            envs: Vec::new(),
            quiet: false,
        }
    }
}

impl ShOptions {
    fn apply(&self, cmd: &mut Command) {
        cmd.stdout(self.stdout.stdio());
        cmd.stderr(self.stderr.stdio());
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)));
    }
}

pub struct ShOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

#[macro_export]
macro_rules! sh {
    // Single command with explicit options
    (options($opts:expr), $cmd:expr $(,)?) => {{ $crate::sh::sh($cmd, &$opts) }};

    // Single command with default options
    ($cmd:expr $(,)?) => {{ $crate::sh::sh($cmd, &$crate::sh::ShOptions::default()) }};
}

/// Run `cmd` through `sh -c`; a non-zero exit is an error.
pub fn sh<S: AsRef<str>>(cmd: S, opts: &ShOptions) -> Result<ShOutput> {
    let cmd = cmd.as_ref();
    if opts.quiet {
        log::debug!("[sh] {}", cmd);
    } else {
        log::info!("[sh] {}", cmd);
    }

    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    opts.apply(&mut command);

    let output = command
        .output()
        .with_context(|| format!("failed to spawn: {cmd}"))?;

    if !output.status.success() {
        bail!(
            "Command failed: {}\nExit code: {:?}\n",
            cmd,
            output.status.code().unwrap_or(-1),
        );
    }

    Ok(ShOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
