use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use wdfw_bootstrap::artifact::{self, Artifact};
use wdfw_bootstrap::readme::{self, DEFAULT_README};
use wdfw_bootstrap::{
    Bootstrap, BootstrapOptionsBuilder, CommandDownloader, Download, Outcome, Policy, PrintOnly,
    DEFAULT_DOWNLOAD_COMMAND,
};

/// Download the toolchains and Eclipse bundle linked from the README
#[derive(Parser)]
#[command(name = "wdfw-bootstrap", version, about)]
struct Cli {
    /// README holding the download links
    #[arg(long, env = "WDFW_README", default_value = DEFAULT_README)]
    readme: PathBuf,

    /// Directory the archives are written to
    #[arg(long, env = "WDFW_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Download command; `{output}` and `{url}` are substituted
    #[arg(long, env = "WDFW_DOWNLOADER", default_value = DEFAULT_DOWNLOAD_COMMAND)]
    downloader: String,

    /// YAML file replacing the built-in artifact list
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Only fetch these artifacts (repeatable: gnu, llvm, eclipse)
    #[arg(long)]
    only: Vec<String>,

    /// Attempt every artifact even after a failure
    #[arg(long)]
    keep_going: bool,

    /// Print the download commands without running them
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Running bootstrap");

    let artifacts = match &cli.manifest {
        Some(path) => artifact::load_manifest(path)?,
        None => Artifact::builtin(),
    };
    let artifacts = artifact::select(artifacts, &cli.only)?;

    let text = readme::load(&cli.readme)?;

    if !cli.dry_run {
        std::fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    }

    let options = BootstrapOptionsBuilder::default()
        .out_dir(cli.out_dir.clone())
        .policy(if cli.keep_going {
            Policy::KeepGoing
        } else {
            Policy::FailFast
        })
        .build()?;

    let command = CommandDownloader::new(cli.downloader);
    let downloader: Box<dyn Download> = if cli.dry_run {
        Box::new(PrintOnly(command))
    } else {
        Box::new(command)
    };

    let report = Bootstrap::new(artifacts, options, downloader.as_ref()).run(&text);

    for (artifact, outcome) in &report.entries {
        let status = match outcome {
            Outcome::Completed(path) => format!("ok      {}", path.display()),
            Outcome::Failed(err) => format!("failed  {err}"),
            Outcome::Skipped => "skipped".to_string(),
        };
        println!("{:<8}{status}", artifact.name);
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{failed} of {} artifacts failed", report.entries.len());
    }
    Ok(())
}
