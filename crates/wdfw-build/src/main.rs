use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wdfw_build::{demo, spec, BuildEnv, PathDetector, ToolSpec};

#[derive(Parser)]
#[command(name = "cargo", bin_name = "cargo")]
enum CargoCli {
    Wdfw(WdfwCli),
}

/// Inspect WD-Firmware toolchain and demo descriptors
#[derive(Args)]
#[command(version, about)]
struct WdfwCli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the build environment produced by the toolchain tools
    Tools(ToolsArgs),
    /// Expand a command template against the build environment
    Expand(ExpandArgs),
    /// Report which tools are available on this host
    Exists(EnvArgs),
    /// Inspect demo descriptors
    Demos {
        #[command(subcommand)]
        action: DemoAction,
    },
}

#[derive(Args)]
struct EnvArgs {
    /// Tools to apply, in order (repeatable; default: ar, as, cc)
    #[arg(long = "tool")]
    tools: Vec<String>,

    /// Seed variable, e.g. RISCV_LLVM_TC_PATH=/opt/llvm (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,
}

impl EnvArgs {
    fn selected_tools(&self) -> Result<Vec<&'static dyn ToolSpec>> {
        if self.tools.is_empty() {
            return Ok(spec::all());
        }
        self.tools
            .iter()
            .map(|name| spec::find(name).map_err(Into::into))
            .collect()
    }

    fn seed(&self) -> Result<BuildEnv> {
        let mut env = BuildEnv::new();
        for assignment in &self.assignments {
            env.assign(assignment)?;
        }
        Ok(env)
    }

    fn build(&self, detector: &PathDetector) -> Result<BuildEnv> {
        let mut env = self.seed()?;
        for tool in self.selected_tools()? {
            env.apply(tool, detector);
        }
        Ok(env)
    }
}

#[derive(Args)]
struct ToolsArgs {
    #[command(flatten)]
    env: EnvArgs,

    /// Print JSON instead of KEY = VALUE lines
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExpandArgs {
    /// Template, e.g. '$CCCOM'
    template: String,

    #[command(flatten)]
    env: EnvArgs,
}

#[derive(Subcommand)]
enum DemoAction {
    /// List demo names and their boards
    List,
    /// Show one demo descriptor
    Show {
        name: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let CargoCli::Wdfw(cli) = CargoCli::parse();
    let detector = PathDetector::from_env();

    match cli.command {
        Command::Tools(args) => {
            let env = args.env.build(&detector)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&env)?);
            } else {
                for (key, value) in env.iter() {
                    println!("{key} = {value}");
                }
                for (suffix, action) in env.suffixes() {
                    println!("{suffix} -> {action:?}");
                }
            }
        }
        Command::Expand(args) => {
            let env = args.env.build(&detector)?;
            let expanded = env
                .subst(&args.template)
                .with_context(|| format!("expanding `{}`", args.template))?;
            println!("{expanded}");
        }
        Command::Exists(args) => {
            let env = args.seed()?;
            let mut missing = Vec::new();
            for tool in args.selected_tools()? {
                let found = tool.exists(&env, &detector);
                tracing::info!(tool = tool.name(), found, "detect");
                println!("{:<4}{}", tool.name(), if found { "found" } else { "missing" });
                if !found {
                    missing.push(tool.name());
                }
            }
            if !missing.is_empty() {
                bail!("missing tools: {}", missing.join(", "));
            }
        }
        Command::Demos { action } => match action {
            DemoAction::List => {
                for demo in demo::all() {
                    let boards: Vec<_> = demo.targets.iter().map(|b| b.as_str()).collect();
                    println!("{:<20}{}", demo.name, boards.join(","));
                }
            }
            DemoAction::Show { name, json } => {
                let demo = demo::find(&name)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&demo)?);
                } else {
                    print_demo(&demo);
                }
            }
        },
    }

    Ok(())
}

fn print_demo(demo: &demo::DemoSpec) {
    println!("name:          {}", demo.name);
    if let Some(grouping) = &demo.grouping_file {
        println!("grouping file: {}", grouping.display());
    }
    if let Some(layout) = &demo.comrv {
        println!(
            "comrv cache:   {} bytes (align {}), storage {} bytes",
            layout.cache_size, layout.cache_alignment, layout.overlay_storage_size
        );
    }
    let lists = [
        ("defines", &demo.public_defs),
        ("sconscripts", &demo.sconscripts),
        ("c flags", &demo.c_flags),
        ("linker flags", &demo.linker_flags),
    ];
    for (label, items) in lists {
        println!("{:<15}{}", format!("{label}:"), items.join(" "));
    }
    let boards: Vec<_> = demo.targets.iter().map(|b| b.as_str()).collect();
    println!("{:<15}{}", "targets:", boards.join(" "));
}
