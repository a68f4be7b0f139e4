use std::path::Path;
use std::process::Command;

use crate::error::FetchError;

/// `{output}` and `{url}` are replaced per artifact.
pub const DEFAULT_DOWNLOAD_COMMAND: &str = "wget -O {output} {url}";

/// Something that can store `url` at `dest`.
pub trait Download {
    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

impl<T: Download + ?Sized> Download for &T {
    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        (*self).download(url, dest)
    }
}

/// Runs an external download program; a non-zero exit status is a failure.
#[derive(Debug, Clone)]
pub struct CommandDownloader {
    template: String,
}

impl CommandDownloader {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Program and arguments for one download. Placeholders are substituted
    /// inside whitespace-separated words, so paths with spaces stay one
    /// argument.
    pub fn render(&self, url: &str, dest: &Path) -> Result<Vec<String>, FetchError> {
        let output = dest.display().to_string();
        let argv: Vec<String> = self
            .template
            .split_whitespace()
            .map(|word| substitute(word, url, &output))
            .collect();
        if argv.is_empty() {
            return Err(FetchError::EmptyCommand);
        }
        Ok(argv)
    }
}

/// Replaces `{url}` and `{output}` in one left-to-right pass, so substituted
/// text is never scanned for placeholders again.
fn substitute(word: &str, url: &str, output: &str) -> String {
    let mut rendered = String::with_capacity(word.len());
    let mut rest = word;
    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{url}") {
            rendered.push_str(url);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{output}") {
            rendered.push_str(output);
            rest = after;
        } else {
            rendered.push('{');
            rest = &tail[1..];
        }
    }
    rendered.push_str(rest);
    rendered
}

impl Default for CommandDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_COMMAND)
    }
}

impl Download for CommandDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let argv = self.render(url, dest)?;
        let command = argv.join(" ");
        log::info!("{command}");

        let (program, args) = argv.split_first().ok_or(FetchError::EmptyCommand)?;
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| FetchError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(FetchError::CommandFailed {
                command,
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// Prints the command that would run instead of running it.
#[derive(Debug, Clone)]
pub struct PrintOnly(pub CommandDownloader);

impl Download for PrintOnly {
    fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        println!("{}", self.0.render(url, dest)?.join(" "));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_template() {
        let argv = CommandDownloader::default()
            .render("https://host/a.gz", Path::new("a.gz"))
            .unwrap();
        assert_eq!(argv, ["wget", "-O", "a.gz", "https://host/a.gz"]);
    }

    #[test]
    fn placeholders_inside_words() {
        let argv = CommandDownloader::new("curl -L --output={output} {url}")
            .render("http://x/y", Path::new("my dir/y.gz"))
            .unwrap();
        assert_eq!(argv, ["curl", "-L", "--output=my dir/y.gz", "http://x/y"]);
    }

    #[test]
    fn placeholders_in_destination_are_kept() {
        let argv = CommandDownloader::new("wget -O {output} {url}")
            .render("http://x/y", Path::new("out/{url}/{output}/y.gz"))
            .unwrap();
        assert_eq!(argv, ["wget", "-O", "out/{url}/{output}/y.gz", "http://x/y"]);
    }

    #[test]
    fn unknown_braces_pass_through() {
        let argv = CommandDownloader::new("dl --name={name}{url}")
            .render("http://x", Path::new("x"))
            .unwrap();
        assert_eq!(argv, ["dl", "--name={name}http://x"]);
    }

    #[test]
    fn empty_template_is_rejected() {
        let err = CommandDownloader::new("   ")
            .download("http://x", Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptyCommand));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_status_is_a_failure() {
        let err = CommandDownloader::new("false {url}")
            .download("http://x/y", Path::new("y"))
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::CommandFailed { ref command, code: Some(1) } if command == "false http://x/y"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn command_writes_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.tar.gz");
        CommandDownloader::new("touch {output}")
            .download("http://unused", &dest)
            .unwrap();
        assert!(dest.is_file());
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let err = CommandDownloader::new("wdfw-no-such-downloader {url}")
            .download("http://x", Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, FetchError::Spawn { .. }));
    }
}
