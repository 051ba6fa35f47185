//! Terminal reports for syntax and definition problems.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::error::{DefinitionError, DefinitionErrorKind, SyntaxError};

/// A located problem in a narrative source, ready to show an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable code, `varia::syntax` or `varia::definition` for crate errors.
    pub code: &'static str,
    /// Headline.
    pub message: String,
    /// Byte range the report points at.
    pub span: Range<usize>,
    /// Text beside the highlighted span. Falls back to the headline.
    pub label: Option<String>,
    /// Lines printed under the source excerpt.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// A bare diagnostic.
    pub fn new(code: &'static str, span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            label: None,
            notes: Vec::new(),
        }
    }

    /// Set the text beside the highlighted span.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Append a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Render this diagnostic as a framed excerpt of `source`.
    pub fn render(&self, source: &str, filename: &str) -> String {
        let clamp = |offset: usize| offset.min(source.len());
        let span = clamp(self.span.start)..clamp(self.span.end);

        let label = Label::new((filename, span.clone()))
            .with_message(self.label.as_deref().unwrap_or(&self.message))
            .with_color(Color::Red);
        let report = self.notes.iter().fold(
            Report::build(ReportKind::Error, (filename, span))
                .with_config(Config::default().with_index_type(IndexType::Byte))
                .with_code(self.code)
                .with_message(&self.message)
                .with_label(label),
            |report, note| report.with_note(note),
        );

        let mut out = Vec::new();
        match report
            .finish()
            .write((filename, Source::from(source)), &mut out)
        {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => format!("{self}\n"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(err: &SyntaxError) -> Self {
        let at = err.position.offset;
        let diag = Diagnostic::new("varia::syntax", at..at + 1, err.message.clone())
            .with_label("parsing stopped here");
        if err.expected.is_empty() {
            diag
        } else {
            diag.with_note(format!("expected {}", err.expected.join(" or ")))
        }
    }
}

impl From<&DefinitionError> for Diagnostic {
    fn from(err: &DefinitionError) -> Self {
        Diagnostic::new("varia::definition", err.span.range(), err.kind.to_string())
            .with_label(format!("directive {}", err.identity))
            .with_note(fix_hint(&err.kind))
    }
}

fn fix_hint(kind: &DefinitionErrorKind) -> &'static str {
    match kind {
        DefinitionErrorKind::ConditionalArity(_) => {
            "a conditional takes a branch for true and, optionally, one for false"
        }
        DefinitionErrorKind::EmptyList => "give the list at least one branch",
        DefinitionErrorKind::GuardedConditionalBranch => {
            "only the header of a conditional carries a guard"
        }
    }
}

/// Render each diagnostic in turn.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.render(source, filename))
        .collect()
}
