use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("unknown board: {0} (expected one of eh1, eh2, el2, hifive1)")]
    UnknownBoard(String),

    #[error("unknown demo: {0}")]
    UnknownDemo(String),

    #[error("unknown tool: {0} (expected one of ar, as, cc)")]
    UnknownTool(String),

    /// `KEY=VALUE` assignment without `=` or with an empty key.
    #[error("invalid assignment `{0}` (expected KEY=VALUE)")]
    InvalidAssignment(String),

    #[error("variable expansion exceeded depth {depth} while expanding `{template}`")]
    ExpansionTooDeep { template: String, depth: usize },
}
