//! Error types for directive resolution.

use miette::Diagnostic;
use thiserror::Error;
use varia_syntax::{DefinitionError, SourceSpan, SyntaxError};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while parsing or resolving narrative text.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    /// Malformed source text.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    /// A directive breaks a branch-count contract.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Definition(#[from] DefinitionError),

    /// The guard evaluator failed.
    #[error("cannot evaluate guard `{guard}` at {span}: {message}")]
    #[diagnostic(code(varia::evaluation))]
    Evaluation {
        /// Exact guard source text.
        guard: String,
        /// Where the guard appears.
        span: SourceSpan,
        /// Reason reported by the evaluator.
        message: String,
    },

    /// Saved sequence state could not be read or written.
    #[error("invalid sequence state: {0}")]
    #[diagnostic(code(varia::state))]
    State(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use varia_syntax::Position;

    #[test]
    fn syntax_error_is_transparent() {
        let err: EngineError = SyntaxError::too_deep(Position::default(), 3).into();
        assert!(matches!(err, EngineError::Syntax(_)));
        assert!(err.to_string().starts_with("directives nested deeper than 3"));
    }

    #[test]
    fn evaluation_error_names_guard() {
        let err = EngineError::Evaluation {
            guard: "gold > 3".into(),
            span: SourceSpan::default(),
            message: "unknown variable: gold".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot evaluate guard `gold > 3` at 0:0-0:0: unknown variable: gold"
        );
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("varia::evaluation")
        );
    }
}
