use std::path::PathBuf;

use derive_builder::Builder;

use crate::artifact::Artifact;
use crate::error::FetchError;
use crate::fetch::Download;
use crate::readme;

/// What happens to the remaining artifacts after one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Stop at the first failure; later artifacts are neither extracted
    /// nor downloaded.
    #[default]
    FailFast,
    /// Attempt every artifact regardless of earlier failures.
    KeepGoing,
}

#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct BootstrapOptions {
    #[builder(setter(into))]
    pub out_dir: PathBuf,
    pub policy: Policy,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            policy: Policy::FailFast,
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Completed(PathBuf),
    Failed(FetchError),
    /// Not attempted because an earlier artifact failed.
    Skipped,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Per-artifact results, in download order.
#[derive(Debug, Default)]
pub struct Report {
    pub entries: Vec<(Artifact, Outcome)>,
}

impl Report {
    pub fn success(&self) -> bool {
        self.entries.iter().all(|(_, o)| matches!(o, Outcome::Completed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Artifact, &FetchError)> {
        self.entries.iter().filter_map(|(a, o)| match o {
            Outcome::Failed(err) => Some((a, err)),
            _ => None,
        })
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(a, _)| a.name == name)
            .map(|(_, o)| o)
    }
}

pub struct Bootstrap<D> {
    artifacts: Vec<Artifact>,
    options: BootstrapOptions,
    downloader: D,
}

impl<D: Download> Bootstrap<D> {
    pub fn new(artifacts: Vec<Artifact>, options: BootstrapOptions, downloader: D) -> Self {
        Self {
            artifacts,
            options,
            downloader,
        }
    }

    /// Extract and download every artifact from README `text`.
    pub fn run(&self, text: &str) -> Report {
        let mut report = Report::default();
        let mut failed = false;

        for artifact in &self.artifacts {
            if failed && self.options.policy == Policy::FailFast {
                log::debug!("skipping {}", artifact.name);
                report.entries.push((artifact.clone(), Outcome::Skipped));
                continue;
            }

            let outcome = match self.fetch(text, artifact) {
                Ok(dest) => {
                    log::info!("Download {} completed", artifact.file_name);
                    Outcome::Completed(dest)
                }
                Err(err) => {
                    log::error!("{}: {err}", artifact.name);
                    failed = true;
                    Outcome::Failed(err)
                }
            };
            report.entries.push((artifact.clone(), outcome));
        }

        report
    }

    fn fetch(&self, text: &str, artifact: &Artifact) -> Result<PathBuf, FetchError> {
        let url = readme::extract_url(text, artifact)?;
        let dest = self.options.out_dir.join(&artifact.file_name);
        self.downloader.download(&url, &dest)?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    const README: &str = "\
[GNU-Debian download link](https://box/gnu.gz)
[LLVM-Debian download link](https://box/llvm.gz)
[WD Offical Eclipse Tested and supported](https://box/eclipse.gz)
";

    /// Records every request and fails for URLs listed in `fail`.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, PathBuf)>>,
        fail: Vec<&'static str>,
    }

    impl Download for Recorder {
        fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), dest.to_path_buf()));
            if self.fail.iter().any(|f| *f == url) {
                return Err(FetchError::CommandFailed {
                    command: format!("fetch {url}"),
                    code: Some(8),
                });
            }
            Ok(())
        }
    }

    fn options(policy: Policy) -> BootstrapOptions {
        BootstrapOptionsBuilder::default()
            .out_dir("downloads")
            .policy(policy)
            .build()
            .unwrap()
    }

    #[test]
    fn downloads_all_artifacts_in_order() {
        let recorder = Recorder::default();
        let report = Bootstrap::new(Artifact::builtin(), options(Policy::FailFast), &recorder)
            .run(README);

        assert!(report.success());
        let calls = recorder.calls.borrow();
        assert_eq!(
            *calls,
            [
                (
                    "https://box/gnu.gz".to_string(),
                    Path::new("downloads").join("riscv-gnu-toolchain-debian.tar.gz")
                ),
                (
                    "https://box/llvm.gz".to_string(),
                    Path::new("downloads").join("riscv-llvm-toolchain-debian.tar.gz")
                ),
                (
                    "https://box/eclipse.gz".to_string(),
                    Path::new("downloads").join("eclipse_mcu_2019_12.tar.gz")
                ),
            ]
        );
    }

    #[test]
    fn missing_first_link_stops_everything() {
        let text = README.replace("GNU-Debian", "GNU-Ubuntu");
        let recorder = Recorder::default();
        let report = Bootstrap::new(Artifact::builtin(), options(Policy::FailFast), &recorder)
            .run(&text);

        assert!(!report.success());
        assert!(matches!(
            report.outcome("gnu"),
            Some(Outcome::Failed(FetchError::PatternNotFound { .. }))
        ));
        assert!(matches!(report.outcome("llvm"), Some(Outcome::Skipped)));
        assert!(matches!(report.outcome("eclipse"), Some(Outcome::Skipped)));
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn failed_download_skips_the_rest() {
        let recorder = Recorder {
            fail: vec!["https://box/llvm.gz"],
            ..Default::default()
        };
        let report = Bootstrap::new(Artifact::builtin(), options(Policy::FailFast), &recorder)
            .run(README);

        assert!(matches!(report.outcome("gnu"), Some(Outcome::Completed(_))));
        assert!(matches!(
            report.outcome("llvm"),
            Some(Outcome::Failed(FetchError::CommandFailed { code: Some(8), .. }))
        ));
        assert!(matches!(report.outcome("eclipse"), Some(Outcome::Skipped)));
        assert_eq!(recorder.calls.borrow().len(), 2);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn keep_going_attempts_every_artifact() {
        let recorder = Recorder {
            fail: vec!["https://box/gnu.gz"],
            ..Default::default()
        };
        let text = README.replace("LLVM-Debian", "LLVM-Fedora");
        let report = Bootstrap::new(Artifact::builtin(), options(Policy::KeepGoing), &recorder)
            .run(&text);

        let failed: Vec<_> = report.failures().map(|(a, _)| a.name.as_str()).collect();
        assert_eq!(failed, ["gnu", "llvm"]);
        assert!(matches!(report.outcome("eclipse"), Some(Outcome::Completed(_))));
        assert_eq!(recorder.calls.borrow().len(), 2);
    }

    #[test]
    fn builder_defaults() {
        let opts = BootstrapOptionsBuilder::default().build().unwrap();
        assert_eq!(opts.out_dir, PathBuf::from("."));
        assert_eq!(opts.policy, Policy::FailFast);
    }
}
