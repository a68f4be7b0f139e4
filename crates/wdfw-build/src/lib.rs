//! Build descriptors for WD-Firmware: the RISC-V toolchain tools and the
//! firmware demos that are built with them.

pub mod demo;
pub mod detect;
pub mod env;
pub mod error;
pub mod spec;

pub use demo::{Board, ComrvLayout, DemoSpec};
pub use detect::{Detect, PathDetector};
pub use env::{BuildEnv, EnvValue};
pub use error::BuildError;
pub use spec::{Action, ToolConfig, ToolSpec};
