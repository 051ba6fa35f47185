//! Parse tree for narrative text with embedded directives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::SourceSpan;

/// Stable key identifying one directive across parses of the same source.
///
/// Derived from the directive's source span and the document identity, so that
/// parsing unchanged text twice yields the same keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectiveId(String);

impl DirectiveId {
    /// Wrap an arbitrary key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One fragment of parsed text, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode {
    /// Literal text, emitted unchanged.
    Text(String),
    /// An embedded `{...}` directive.
    Directive(Directive),
}

/// The four list disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Advance through the branches, then repeat the last one.
    Stopping,
    /// Advance through the branches and wrap around.
    Cycle,
    /// Visit the branches in random order, reshuffling after each pass.
    Shuffle,
    /// Show each branch once, then nothing.
    OnceOnly,
}

impl SequenceKind {
    /// The long-form marker for this kind, as written in source.
    pub fn marker(self) -> &'static str {
        match self {
            SequenceKind::Stopping => "stopping:",
            SequenceKind::Cycle => "cycle:",
            SequenceKind::Shuffle => "shuffle:",
            SequenceKind::OnceOnly => "once:",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequenceKind::Stopping => "stopping",
            SequenceKind::Cycle => "cycle",
            SequenceKind::Shuffle => "shuffle",
            SequenceKind::OnceOnly => "once",
        };
        f.write_str(name)
    }
}

/// What a directive does when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Show one of two fragments depending on a guard.
    Conditional,
    /// Choose among branches according to a sequence discipline.
    List(SequenceKind),
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::Conditional => f.write_str("conditional"),
            DirectiveKind::List(kind) => write!(f, "{kind}"),
        }
    }
}

/// Which of the two embed syntaxes produced a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedForm {
    /// `{a|b|c}` on a single line. Branch content is used verbatim.
    Inline,
    /// `{` newline, then one `- branch` per entry. Branch content is trimmed.
    MultiLine,
}

/// What followed the opening brace, before the branches.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// Nothing: a default (stopping) list.
    None,
    /// An explicit sequence-type marker.
    Sequence(SequenceKind),
    /// A guard expression, making the directive conditional.
    Condition(Guard),
}

/// An opaque guard expression, captured verbatim from the text before a `:`.
#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    /// The exact source text of the expression.
    pub source: String,
    /// Where the expression appears.
    pub span: SourceSpan,
}

/// One candidate fragment of a directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Per-branch guard (multi-line entries only).
    pub guard: Option<Guard>,
    /// Nested content, parsed recursively.
    pub content: Vec<ParsedNode>,
    /// Where the branch appears.
    pub span: SourceSpan,
}

/// A `{...}` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Conditional or one of the list kinds.
    pub kind: DirectiveKind,
    /// The header as written.
    pub header: Header,
    /// Inline or multi-line syntax.
    pub form: EmbedForm,
    /// Branches, in authoring order.
    pub branches: Vec<Branch>,
    /// Where the whole directive appears, braces included.
    pub span: SourceSpan,
    /// Stable identity for sequence state.
    pub identity: DirectiveId,
}

impl Directive {
    /// The directive-level guard of a conditional.
    pub fn guard(&self) -> Option<&Guard> {
        match &self.header {
            Header::Condition(guard) => Some(guard),
            _ => None,
        }
    }

    /// Directives nested directly inside this directive's branches.
    pub fn children(&self) -> impl Iterator<Item = &Directive> {
        self.branches
            .iter()
            .flat_map(|b| b.content.iter())
            .filter_map(|node| match node {
                ParsedNode::Directive(d) => Some(d),
                ParsedNode::Text(_) => None,
            })
    }
}

/// A parsed source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identity of the document, used as the prefix of directive identities.
    pub id: String,
    /// Top-level fragments in document order.
    pub nodes: Vec<ParsedNode>,
}

impl Document {
    /// Every directive in the document, outer before inner, in document order.
    pub fn directives(&self) -> Vec<&Directive> {
        fn walk<'d>(nodes: &'d [ParsedNode], out: &mut Vec<&'d Directive>) {
            for node in nodes {
                if let ParsedNode::Directive(d) = node {
                    out.push(d);
                    for branch in &d.branches {
                        walk(&branch.content, out);
                    }
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Whether the document contains no directives at all.
    pub fn is_plain(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| matches!(node, ParsedNode::Text(_)))
    }
}

/// Render a parse tree as a compact, single-line S-expression.
///
/// Text is shown with `{:?}` quoting; each directive as `(kind branch...)`,
/// with guards written as `[guard]` in front of the branch or the kind.
pub fn outline(nodes: &[ParsedNode]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

fn write_nodes(nodes: &[ParsedNode], out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match node {
            ParsedNode::Text(text) => out.push_str(&format!("{text:?}")),
            ParsedNode::Directive(d) => write_directive(d, out),
        }
    }
}

fn write_directive(d: &Directive, out: &mut String) {
    out.push('(');
    out.push_str(&d.kind.to_string());
    if let Some(guard) = d.guard() {
        out.push_str(&format!(" [{}]", guard.source));
    }
    for branch in &d.branches {
        out.push_str(" (");
        if let Some(guard) = &branch.guard {
            out.push_str(&format!("[{}]", guard.source));
            if !branch.content.is_empty() {
                out.push(' ');
            }
        }
        write_nodes(&branch.content, out);
        out.push(')');
    }
    out.push(')');
}
