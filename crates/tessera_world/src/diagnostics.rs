//! # Line Diagnostics
//!
//! Zone and chunk files use a lenient, line-oriented grammar: `#` comments,
//! blank lines, one directive per line followed by whitespace-separated
//! arguments. A line that cannot be applied is skipped and parsing continues.
//!
//! Skipped lines are reported as [`Diagnostic`] values. Nothing here fails a
//! whole parse; callers that do not care simply drop the list.

use thiserror::Error;

/// Why a single line was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Directive keyword not recognized.
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    /// Too few arguments for the directive.
    #[error("`{directive}` expects at least {expected} arguments, found {found}")]
    MissingArguments {
        /// Directive keyword.
        directive: &'static str,
        /// Minimum argument count.
        expected: usize,
        /// Arguments present.
        found: usize,
    },

    /// An argument failed to parse as a number.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    /// Coordinates outside the grid.
    #[error("position ({0}, {1}) out of bounds")]
    OutOfBounds(i64, i64),

    /// Cell type id not declared (yet).
    #[error("unknown cell type `{0}`")]
    UnknownCellType(String),

    /// A bounded list is full.
    #[error("{0} capacity reached")]
    CapacityExceeded(&'static str),

    /// Size directive with a non-positive or oversized value.
    #[error("invalid size")]
    InvalidSize,
}

/// Outcome of applying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The directive was applied to the model.
    Applied,
    /// The line was not applied.
    Skipped(SkipReason),
}

impl From<SkipReason> for LineOutcome {
    fn from(reason: SkipReason) -> Self {
        Self::Skipped(reason)
    }
}

/// A skipped line, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    /// Why the line was skipped.
    pub reason: SkipReason,
}

/// Runs `apply` on every directive line of `text`.
///
/// Comments and blank lines never reach `apply`. Returns the diagnostics for
/// every line `apply` skipped.
pub fn for_each_directive<F>(text: &str, mut apply: F) -> Vec<Diagnostic>
where
    F: FnMut(&str, &[&str]) -> LineOutcome,
{
    let mut diagnostics = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();

        if let LineOutcome::Skipped(reason) = apply(directive, &args) {
            tracing::debug!("line {}: skipped: {}", index + 1, reason);
            diagnostics.push(Diagnostic { line: index + 1, reason });
        }
    }

    diagnostics
}

/// Fails with [`SkipReason::MissingArguments`] when `args` is too short.
pub(crate) fn require(directive: &'static str, args: &[&str], expected: usize) -> Result<(), SkipReason> {
    if args.len() < expected {
        Err(SkipReason::MissingArguments { directive, expected, found: args.len() })
    } else {
        Ok(())
    }
}

/// Parses one numeric argument.
pub(crate) fn number<T: std::str::FromStr>(token: &str) -> Result<T, SkipReason> {
    token.parse().map_err(|_| SkipReason::InvalidNumber(token.to_owned()))
}

/// Extracts the value of an optional `drop:<id>` token.
pub(crate) fn drop_tag(token: Option<&&str>) -> Option<String> {
    token
        .and_then(|t| t.strip_prefix("drop:"))
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}
