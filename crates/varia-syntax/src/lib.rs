//! Grammar, parser, and classifier for narrative text with embedded directives.
//!
//! Narrative text may contain `{...}` directives: conditionals (`{flag: yes|no}`)
//! and lists that pick a different branch on each visit (`{~a|b|c}`). This crate
//! turns raw text into a [`Document`] tree; resolution lives in `varia-engine`.

pub mod ast;
pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod span;

pub use ast::{
    Branch, Directive, DirectiveId, DirectiveKind, Document, EmbedForm, Guard, Header,
    ParsedNode, SequenceKind,
};
pub use classify::{classify, validate};
pub use diagnostics::Diagnostic;
pub use error::{DefinitionError, DefinitionErrorKind, SyntaxError, SyntaxResult};
pub use options::{IdentityNaming, ParseOptions, default_identity, line_column_identity};
pub use parser::parse;
pub use span::{Position, SourceSpan};
