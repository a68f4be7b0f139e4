use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::detect::Detect;
use crate::error::BuildError;
use crate::spec::{Action, ToolConfig, ToolSpec};

/// Nested `$VAR` references deeper than this are treated as a cycle.
pub const MAX_SUBST_DEPTH: usize = 32;

/// A construction variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Str(String),
    /// Command-line list; expands to its items separated by spaces.
    List(Vec<String>),
    Int(i64),
}

impl EnvValue {
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(" ")),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for EnvValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// The merged build environment handed to the build orchestrator.
///
/// Tools never write into it directly; each one returns a [`ToolConfig`]
/// and the caller merges it with [`BuildEnv::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnv {
    vars: BTreeMap<String, EnvValue>,
    suffixes: BTreeMap<String, Action>,
}

impl BuildEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.vars.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<EnvValue>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Parse and apply a `KEY=VALUE` assignment as a string variable.
    pub fn assign(&mut self, assignment: &str) -> Result<(), BuildError> {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.set(key.trim(), value);
                Ok(())
            }
            _ => Err(BuildError::InvalidAssignment(assignment.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn suffixes(&self) -> impl Iterator<Item = (&str, Action)> {
        self.suffixes.iter().map(|(s, a)| (s.as_str(), *a))
    }

    pub fn action_for(&self, suffix: &str) -> Option<Action> {
        self.suffixes.get(suffix).copied()
    }

    /// Overwrite every variable and suffix rule carried by `config`.
    pub fn merge(&mut self, config: ToolConfig) {
        let ToolConfig { vars, suffixes } = config;
        self.vars.extend(vars);
        self.suffixes.extend(suffixes);
    }

    /// Generate `tool` against the current environment and merge the result.
    pub fn apply(&mut self, tool: &dyn ToolSpec, detector: &dyn Detect) {
        let _span = tracing::debug_span!("apply", tool = tool.name()).entered();
        let config = tool.generate(self, detector);
        tracing::debug!(vars = config.vars.len(), suffixes = config.suffixes.len(), "merged");
        self.merge(config);
    }

    /// Expand `$NAME` / `${NAME}` references recursively.
    ///
    /// Undefined variables expand to nothing, `$$` yields a literal `$`, and
    /// runs of whitespace in the result are collapsed to one space.
    pub fn subst(&self, template: &str) -> Result<String, BuildError> {
        let expanded = self.expand(template, template, 0)?;
        Ok(expanded.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn expand(&self, root: &str, s: &str, depth: usize) -> Result<String, BuildError> {
        if depth > MAX_SUBST_DEPTH {
            return Err(BuildError::ExpansionTooDeep {
                template: root.to_string(),
                depth: MAX_SUBST_DEPTH,
            });
        }

        let mut out = String::with_capacity(s.len());
        let mut chars = s.char_indices().peekable();
        while let Some((_, c)) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }

            let name = match chars.peek().copied() {
                Some((_, '$')) => {
                    chars.next();
                    out.push('$');
                    continue;
                }
                Some((_, '{')) => {
                    chars.next();
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        out.push_str("${");
                        out.push_str(&name);
                        continue;
                    }
                    name
                }
                Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {
                    let mut name = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if c == '_' || c.is_ascii_alphanumeric() {
                            name.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    name
                }
                _ => {
                    out.push('$');
                    continue;
                }
            };

            if let Some(value) = self.vars.get(&name) {
                out.push_str(&self.expand(root, &value.to_string(), depth + 1)?);
            }
        }
        Ok(out)
    }
}
