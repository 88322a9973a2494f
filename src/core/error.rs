//! Error handling for release validation
//!
//! This module provides the error taxonomy used throughout the validator and the
//! user-facing rendering of fatal errors. The error system follows two rules:
//! 1. **Strongly-typed errors** ([`ReleaseError`]) at the points where a failure is
//!    detected, carrying the values needed to diagnose it
//! 2. **Context chains** (`anyhow`) inside checks, so each recorded failure says what
//!    was being validated when it went wrong
//!
//! # Error Categories
//!
//! - **Parsing**: [`ReleaseError::ParseError`], [`ReleaseError::JsonError`]
//! - **Document traversal**: [`ReleaseError::InvalidPath`], [`ReleaseError::UnexpectedType`]
//! - **External tools**: [`ReleaseError::ToolFailure`], [`ReleaseError::ToolSpawn`],
//!   [`ReleaseError::ToolTimeout`], [`ReleaseError::ToolNotFound`]
//! - **Expectations**: [`ReleaseError::Assertion`], [`ReleaseError::MissingArtifact`]
//! - **Environment**: [`ReleaseError::FileSystem`], [`ReleaseError::ManifestError`],
//!   [`ReleaseError::Config`]
//!
//! A path that resolves to nothing is not an error at the traversal layer; see
//! [`crate::document::resolve`]. Checks that need a value turn the empty result into
//! an [`ReleaseError::Assertion`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_validator::core::{ReleaseError, user_friendly_error};
//!
//! let err = ReleaseError::ToolNotFound {
//!     tool: "helm".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for release validation.
///
/// Each variant names one failure mode and carries the data a release engineer needs
/// to locate it: the file or tool involved, the path that was being resolved, or the
/// expected and actual values of a failed comparison.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// A structured-text (YAML) document could not be parsed
    #[error("failed to parse {source_desc} ({len} bytes): {source}")]
    ParseError {
        /// Where the bytes came from (file path, or tool and arguments)
        source_desc: String,
        /// Length of the input in bytes
        len: usize,
        /// Underlying parser error, which carries the location
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON output from an invoked binary could not be parsed
    #[error("failed to parse JSON from {source_desc}: {source}")]
    JsonError {
        /// Where the JSON came from
        source_desc: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// A path segment could not be interpreted against the current document shape
    #[error("invalid path segment '{segment}' in {path}")]
    InvalidPath {
        /// The offending segment
        segment: String,
        /// The full path, dot-joined
        path: String,
    },

    /// Traversal reached a value that is not a string, mapping, or list
    #[error("expected map or string, got {found} for '{segment}' in {path}")]
    UnexpectedType {
        /// The segment whose value had the wrong type
        segment: String,
        /// The full path, dot-joined
        path: String,
        /// Name of the type actually found
        found: String,
    },

    /// An external tool exited with a non-zero status
    #[error("{tool} {args} failed (exit code {code}): {stderr}")]
    ToolFailure {
        /// Program that was run
        tool: String,
        /// Space-joined arguments
        args: String,
        /// Exit code, or "signal" if terminated by a signal
        code: String,
        /// Captured standard error
        stderr: String,
    },

    /// An external tool could not be started
    #[error("failed to execute {tool}: {source}")]
    ToolSpawn {
        /// Program that was run
        tool: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external tool is not installed or not on PATH
    #[error("{tool} is not installed or not found in PATH")]
    ToolNotFound {
        /// Program that was looked up
        tool: String,
    },

    /// An external tool did not finish within its deadline
    #[error("{tool} timed out after {secs} seconds")]
    ToolTimeout {
        /// Program that was run
        tool: String,
        /// Deadline that elapsed
        secs: u64,
    },

    /// An expected-vs-actual comparison did not hold
    #[error("{what} incorrect: got {actual} expected {expected}")]
    Assertion {
        /// What was compared (e.g. "archive tag", "hub")
        what: String,
        /// Value required by the manifest
        expected: String,
        /// Value actually found
        actual: String,
    },

    /// A file that must be part of the release is absent
    #[error("{what} not found: {path}")]
    MissingArtifact {
        /// Human description of the artifact
        what: String,
        /// Path that was checked
        path: String,
    },

    /// A filesystem operation failed
    #[error("failed {operation} {path}: {source}")]
    FileSystem {
        /// What was being attempted (e.g. "reading", "listing")
        operation: String,
        /// Path involved
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The release manifest could not be loaded
    #[error("invalid release manifest {file}: {reason}")]
    ManifestError {
        /// Manifest path
        file: String,
        /// Why it could not be used
        reason: String,
    },

    /// Validator configuration is unusable
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl ReleaseError {
    /// Shorthand for an [`Assertion`](ReleaseError::Assertion) failure.
    pub fn assertion(
        what: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Assertion {
            what: what.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Shorthand for a [`FileSystem`](ReleaseError::FileSystem) failure.
    pub fn fs(operation: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileSystem {
            operation: operation.to_string(),
            path: path.display().to_string(),
            source,
        }
    }
}

/// Error wrapper carrying user-facing suggestions for CLI display.
///
/// The message is the full error chain; `details` and `suggestion` are optional and
/// rendered in color by [`display`](ErrorContext::display).
#[derive(Debug)]
pub struct ErrorContext {
    /// Rendered error message, including its cause chain
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Render an error and its causes as a single string.
///
/// The first line is the outermost context; each cause follows on its own indented
/// line, the same layout used for recorded check failures.
pub fn format_error_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`ReleaseError`] anywhere in the chain and I/O errors; everything else
/// is rendered with its cause chain and no suggestion.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format_error_chain(&error);

    if let Some(release_error) = error.chain().find_map(|e| e.downcast_ref::<ReleaseError>()) {
        return create_error_context(release_error, message);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(message)
                    .with_suggestion("Check ownership and permissions of the release directory")
                    .with_details("The validator only reads the release tree, but needs read access to all of it");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(message)
                    .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    ErrorContext::new(message)
}

fn create_error_context(error: &ReleaseError, message: String) -> ErrorContext {
    match error {
        ReleaseError::ToolNotFound { tool } => ErrorContext::new(message)
            .with_suggestion(format!("Install {tool} and make sure it is on PATH, or point the validator config at it"))
            .with_details("Release checks shell out to the archive tool, the container runtime and the chart tool"),

        ReleaseError::ToolTimeout { .. } => ErrorContext::new(message)
            .with_suggestion("Raise --timeout or command_timeout_secs, or run the command manually to see where it hangs"),

        ReleaseError::ManifestError { .. } => ErrorContext::new(message)
            .with_suggestion("Check that --release points at a finished build output containing manifest.yaml")
            .with_details("The manifest is the ground truth every check compares against; nothing can run without it"),

        ReleaseError::ParseError { .. } => ErrorContext::new(message)
            .with_suggestion("Check the YAML syntax of the reported file"),

        ReleaseError::Config { .. } => ErrorContext::new(message)
            .with_suggestion("Check the validator configuration file passed with --config"),

        _ => ErrorContext::new(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_assertion_message_carries_both_values() {
        let err = ReleaseError::assertion("hub", "docker.io/istio", "gcr.io/istio");
        assert_eq!(err.to_string(), "hub incorrect: got gcr.io/istio expected docker.io/istio");
    }

    #[test]
    fn test_unexpected_type_message() {
        let err = ReleaseError::UnexpectedType {
            segment: "b".to_string(),
            path: "a.b".to_string(),
            found: "number".to_string(),
        };
        assert!(err.to_string().contains("'b'"));
        assert!(err.to_string().contains("number"));
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn test_format_error_chain_lists_causes() {
        let err: anyhow::Error = Err::<(), _>(ReleaseError::ToolNotFound {
            tool: "helm".to_string(),
        })
        .context("inspecting chart cni")
        .unwrap_err();

        let rendered = format_error_chain(&err);
        assert!(rendered.starts_with("inspecting chart cni"));
        assert!(rendered.contains("Caused by:"));
        assert!(rendered.contains("helm is not installed"));
    }

    #[test]
    fn test_user_friendly_error_finds_release_error_in_chain() {
        let err: anyhow::Error = Err::<(), _>(ReleaseError::ToolNotFound {
            tool: "docker".to_string(),
        })
        .context("loading image")
        .unwrap_err();

        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(ctx.suggestion.unwrap().contains("docker"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("boom").with_details("why").with_suggestion("fix it");
        let text = ctx.to_string();
        assert!(text.contains("boom"));
        assert!(text.contains("Details: why"));
        assert!(text.contains("Suggestion: fix it"));
    }
}
