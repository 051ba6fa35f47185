//! Error types for parsing and classifying directives.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::DirectiveId;
use crate::span::{Position, SourceSpan};

/// Result type for parsing.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Malformed source text. Aborts the whole parse; there is no partial output.
///
/// `position` is the furthest point the grammar reached before failing, and
/// `expected` lists what could still have been accepted there.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message} at {position}{}", ExpectedList(.expected))]
#[diagnostic(code(varia::syntax))]
pub struct SyntaxError {
    /// Human-readable description.
    pub message: String,
    /// Where parsing gave up.
    pub position: Position,
    /// Inputs that would have been accepted at `position`.
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Nesting deeper than the configured maximum.
    pub fn too_deep(position: Position, max_depth: usize) -> Self {
        Self {
            message: format!("directives nested deeper than {max_depth} levels"),
            position,
            expected: Vec::new(),
        }
    }
}

struct ExpectedList<'a>(&'a [String]);

impl fmt::Display for ExpectedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, ", expected {}", self.0.join(" or "))
    }
}

/// The specific contract a directive breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionErrorKind {
    /// A conditional must have one or two branches.
    ConditionalArity(usize),
    /// A list directive needs at least one branch.
    EmptyList,
    /// Branches of a conditional cannot carry guards of their own.
    GuardedConditionalBranch,
}

impl fmt::Display for DefinitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionErrorKind::ConditionalArity(n) => {
                write!(f, "conditional has {n} branches, expected 1 or 2")
            }
            DefinitionErrorKind::EmptyList => f.write_str("list directive has no branches"),
            DefinitionErrorKind::GuardedConditionalBranch => {
                f.write_str("conditional branches cannot have their own guards")
            }
        }
    }
}

/// A syntactically valid directive that breaks a branch-count contract.
///
/// Raised on the first resolution of the offending directive, not at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("invalid directive {identity} at {span}: {kind}")]
#[diagnostic(code(varia::definition))]
pub struct DefinitionError {
    /// What is wrong.
    pub kind: DefinitionErrorKind,
    /// Identity of the offending directive.
    pub identity: DirectiveId,
    /// Where it appears.
    pub span: SourceSpan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_lists_expected() {
        let err = SyntaxError {
            message: "unexpected end of input".into(),
            position: Position {
                offset: 14,
                line: 1,
                column: 15,
            },
            expected: vec!["'}'".into(), "'|'".into()],
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input at 1:15, expected '}' or '|'"
        );
    }

    #[test]
    fn too_deep_has_no_expectations() {
        let err = SyntaxError::too_deep(Position::default(), 4);
        assert!(err.expected.is_empty());
        assert!(err.to_string().contains("deeper than 4"));
    }

    #[test]
    fn definition_error_display() {
        let err = DefinitionError {
            kind: DefinitionErrorKind::ConditionalArity(3),
            identity: DirectiveId::new("doc@0"),
            span: SourceSpan::default(),
        };
        assert_eq!(
            err.to_string(),
            "invalid directive doc@0 at 0:0-0:0: conditional has 3 branches, expected 1 or 2"
        );
    }
}
