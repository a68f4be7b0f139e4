//! Fetches the toolchain and IDE archives whose download links are published
//! in the project README.
//!
//! Each [`Artifact`] names a markdown link label; the link target is pulled
//! out of the README and handed to a [`Download`] implementation. Every
//! artifact ends with its own [`Outcome`], collected in a [`Report`].

pub mod artifact;
pub mod error;
pub mod fetch;
pub mod readme;
pub mod runner;

pub use artifact::Artifact;
pub use error::FetchError;
pub use fetch::{CommandDownloader, Download, PrintOnly, DEFAULT_DOWNLOAD_COMMAND};
pub use runner::{Bootstrap, BootstrapOptions, BootstrapOptionsBuilder, Outcome, Policy, Report};
