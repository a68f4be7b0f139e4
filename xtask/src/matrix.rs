use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use build::demo::{self, Board, DemoSpec};
use build::BuildEnv;
use clap::Args;

use crate::sh::{ShOptionsBuilder, StreamMode};

/// Toolchain used when neither the demo nor the config names one.
const DEFAULT_TOOLCHAIN: &str = "llvm";

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Path to YAML config (defaults to `<workspace>/matrix.yaml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Which command to run. This can be either:
    /// - a name from `commands:` (recommended), or
    /// - an inline command template string.
    ///
    /// Per-entry `command:` overrides this.
    #[arg(long)]
    pub command: Option<String>,

    /// Only run these demos (repeatable).
    ///
    /// Example: `xtask matrix -d comrv_dataoverlay -t eh1 --command build`
    #[arg(short = 'd', long = "demo")]
    pub demos: Vec<String>,

    /// Only build for these boards (repeatable).
    #[arg(short = 't', long = "target")]
    pub targets: Vec<Board>,

    /// List the steps without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Print commands as they run
    #[arg(long)]
    pub verbose: bool,
}

#[derive(serde::Deserialize, Default)]
struct MatrixConfig {
    #[serde(default)]
    pre: Vec<String>,
    #[serde(default)]
    commands: BTreeMap<String, String>,
    toolchain: Option<String>,
    /// Per-demo overrides; demos without an entry use their own targets.
    #[serde(default)]
    entries: Vec<MatrixEntry>,
}

#[derive(serde::Deserialize)]
struct MatrixEntry {
    demo: String,
    /// Per-entry overrides for named commands from the top-level `commands:` map.
    #[serde(default)]
    commands: BTreeMap<String, String>,
    command: Option<String>,
    toolchain: Option<String>,
    /// Subset of the demo's own boards.
    #[serde(default)]
    targets: Vec<String>,
    /// Skip this demo entirely.
    #[serde(default)]
    disabled: bool,
}

fn load_config(path: &Path) -> Result<MatrixConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

#[derive(Debug, PartialEq, Eq)]
struct Step {
    name: String,
    cmd: String,
}

struct Placeholders<'a> {
    workspace: &'a Path,
    demo: &'a str,
    target: &'a str,
    toolchain: &'a str,
    defines: &'a str,
}

fn render_template(template: &str, p: &Placeholders<'_>) -> String {
    template
        .replace("{workspace}", &p.workspace.to_string_lossy())
        .replace("{demo}", p.demo)
        .replace("{target}", p.target)
        .replace("{toolchain}", p.toolchain)
        .replace("{defines}", p.defines)
}

fn entry_targets(demo: &DemoSpec, entry: Option<&MatrixEntry>) -> Result<Vec<Board>> {
    let Some(entry) = entry.filter(|e| !e.targets.is_empty()) else {
        return Ok(demo.targets.clone());
    };
    entry
        .targets
        .iter()
        .map(|t| -> Result<Board> {
            let board: Board = t.parse()?;
            if !demo.supports(board) {
                bail!("demo `{}` does not build for {board}", demo.name);
            }
            Ok(board)
        })
        .collect()
}

fn plan(
    cfg: &MatrixConfig,
    args: &MatrixArgs,
    workspace: &Path,
    demos: Vec<DemoSpec>,
) -> Result<Vec<Step>> {
    for name in &args.demos {
        if !demos.iter().any(|d| &d.name == name) {
            bail!("unknown demo: {name}");
        }
    }

    let mut steps: Vec<Step> = Vec::new();

    for (i, cmd) in cfg.pre.iter().enumerate() {
        steps.push(Step {
            name: format!("pre:{}", i + 1),
            cmd: cmd.clone(),
        });
    }

    let env = BuildEnv::new();

    for demo in &demos {
        if !args.demos.is_empty() && !args.demos.contains(&demo.name) {
            continue;
        }
        let entry = cfg.entries.iter().find(|e| e.demo == demo.name);
        if entry.is_some_and(|e| e.disabled) {
            log::info!("skipping disabled demo {}", demo.name);
            continue;
        }

        let cmd_name = entry
            .and_then(|e| e.command.as_ref())
            .or(args.command.as_ref())
            .ok_or_else(|| {
                anyhow!("no command selected (pass --command <name> or set `command:` per entry)")
            })?;
        // Command can be either:
        // - a key into `commands:`, optionally overridden by entry.commands, or
        // - an inline command template string.
        let template: &str = entry
            .and_then(|e| e.commands.get(cmd_name))
            .or_else(|| cfg.commands.get(cmd_name))
            .map(|s| s.as_str())
            .unwrap_or(cmd_name);

        let toolchain = entry
            .and_then(|e| e.toolchain.as_deref())
            .or((!demo.toolchain.is_empty()).then_some(demo.toolchain.as_str()))
            .or(cfg.toolchain.as_deref())
            .unwrap_or(DEFAULT_TOOLCHAIN);
        let defines = demo.cpp_defines(&env).join(" ");

        for board in entry_targets(demo, entry)? {
            if !args.targets.is_empty() && !args.targets.contains(&board) {
                continue;
            }
            let cmd = render_template(
                template,
                &Placeholders {
                    workspace,
                    demo: &demo.name,
                    target: board.as_str(),
                    toolchain,
                    defines: &defines,
                },
            );
            steps.push(Step {
                name: format!("{} [{board}] ({cmd_name})", demo.name),
                cmd,
            });
        }
    }

    Ok(steps)
}

pub fn run(args: MatrixArgs) -> Result<()> {
    let workspace = crate::findup::workspace_root()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| workspace.join("matrix.yaml"));
    let cfg = load_config(&config_path)?;

    let steps = plan(&cfg, &args, &workspace, demo::all())?;

    let opts = ShOptionsBuilder::default()
        .stdout(StreamMode::Inherit)
        .stderr(StreamMode::Inherit)
        .cwd(workspace.clone())
        .quiet(!args.verbose)
        .build()?;

    for (i, step) in steps.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, steps.len(), step.name);
        if args.verbose || args.dry_run {
            println!("{}", step.cmd);
        }
        if args.dry_run {
            continue;
        }
        crate::sh!(options(opts), &step.cmd)?;
    }

    println!("[matrix] done");
    Ok(())
}
