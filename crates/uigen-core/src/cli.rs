//! Report formats and process exit codes of the `uigen` binary.
//!
//! # Examples
//!
//! ```
//! use uigen_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "text".parse()?;
//! assert!(!format.is_machine_readable());
//!
//! let code = ExitCode::on_failure(true, ExitCode::TOOL_FAILED);
//! assert_eq!(code.as_i32(), 3);
//! # Ok::<(), uigen_core::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

/// How a command prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Pretty JSON
    Json,
    /// `key: value` lines without color
    Text,
    /// Colored `key: value` lines
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Every format, in the order `--help` lists them.
    pub const ALL: [Self; 3] = [Self::Json, Self::Text, Self::Pretty];

    /// Name accepted by `--format`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }

    /// Returns `true` for formats meant for other programs.
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::ALL.iter().map(Self::as_str).collect();
                crate::Error::InvalidArgument(format!(
                    "invalid output format '{s}' (expected one of: {})",
                    expected.join(", ")
                ))
            })
    }
}

/// Process exit status of a command.
///
/// Codes above 1 tell scripts why a run that produced output still did not
/// go cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Everything worked.
    pub const SUCCESS: Self = Self(0);

    /// The command could not run.
    pub const ERROR: Self = Self(1);

    /// A global option had an invalid value.
    pub const INVALID_INPUT: Self = Self(2);

    /// At least one tool call answered with an error.
    pub const TOOL_FAILED: Self = Self(3);

    /// The preview document was written but the build reported problems.
    pub const PREVIEW_DIAGNOSTICS: Self = Self(4);

    /// `code` if `failed`, otherwise `SUCCESS`.
    #[must_use]
    pub const fn on_failure(failed: bool, code: Self) -> Self {
        if failed { code } else { Self::SUCCESS }
    }

    /// Numeric value handed to the OS.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns `true` for `SUCCESS`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == Self::SUCCESS.0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
