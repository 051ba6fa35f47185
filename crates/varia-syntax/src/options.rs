//! Parse configuration.

use crate::ast::DirectiveId;
use crate::span::SourceSpan;

/// Default bound on directive nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Derives a directive's identity from the document identity and its span.
///
/// Must be deterministic: the same inputs always give the same key.
pub type IdentityNaming = fn(&str, &SourceSpan) -> DirectiveId;

/// `"<document>@<byte offset>"`.
pub fn default_identity(document_id: &str, span: &SourceSpan) -> DirectiveId {
    DirectiveId::new(format!("{document_id}@{}", span.start.offset))
}

/// `"<document>@<line>:<column>"`. Survives edits that change byte widths on
/// earlier lines without adding or removing lines.
pub fn line_column_identity(document_id: &str, span: &SourceSpan) -> DirectiveId {
    DirectiveId::new(format!(
        "{document_id}@{}:{}",
        span.start.line, span.start.column
    ))
}

/// Options for a single parse call.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Identity of the document being parsed.
    pub document_id: String,
    /// Deepest allowed nesting of directives.
    pub max_depth: usize,
    /// How directive identities are derived.
    pub naming: IdentityNaming,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            document_id: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            naming: default_identity,
        }
    }
}

impl ParseOptions {
    /// Options for the given document, with defaults otherwise.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self::default().with_document_id(document_id)
    }

    /// Set the document identity.
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = document_id.into();
        self
    }

    /// Set the nesting bound (at least 1).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Set the identity-naming function.
    pub fn with_naming(mut self, naming: IdentityNaming) -> Self {
        self.naming = naming;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn span_at(offset: usize, line: usize, column: usize) -> SourceSpan {
        let start = Position {
            offset,
            line,
            column,
        };
        SourceSpan { start, end: start }
    }

    #[test]
    fn default_options() {
        let opts = ParseOptions::default();
        assert_eq!(opts.max_depth, 64);
        assert!(opts.document_id.is_empty());
    }

    #[test]
    fn builder_methods() {
        let opts = ParseOptions::new("intro").with_max_depth(8);
        assert_eq!(opts.document_id, "intro");
        assert_eq!(opts.max_depth, 8);
    }

    #[test]
    fn max_depth_clamped() {
        assert_eq!(ParseOptions::default().with_max_depth(0).max_depth, 1);
    }

    #[test]
    fn default_identity_uses_offset() {
        let id = default_identity("intro", &span_at(12, 2, 3));
        assert_eq!(id.as_str(), "intro@12");
    }

    #[test]
    fn line_column_identity_uses_position() {
        let opts = ParseOptions::new("intro").with_naming(line_column_identity);
        let id = (opts.naming)(&opts.document_id, &span_at(12, 2, 3));
        assert_eq!(id.as_str(), "intro@2:3");
    }
}
