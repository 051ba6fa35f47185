//! Character-level grammar for narrative text with embedded directives.
//!
//! ```text
//! Source         = (Text | Embed)*
//! Embed          = MultiLineEmbed | InlineEmbed
//! InlineEmbed    = '{' (Condition | Type)? Argument ('|' Argument)* '}'
//! MultiLineEmbed = '{' (Condition | Type)? Newline ('-' Ws Condition? Content Ws)+ '}'
//! Type           = 'stopping:' | 'shuffle:' | '~' | 'cycle:' | '&' | 'once:' | '!'
//! Condition      = [^\n|{}:]+ ':' Ws    (not one of the spelled-out Type words)
//! ```
//!
//! Text excludes braces at the top level; inline arguments also exclude `|` and
//! line breaks; multi-line content also excludes `-`.

use chumsky::error::RichPattern;
use chumsky::prelude::*;

use crate::ast::{
    Branch, Directive, DirectiveId, Document, EmbedForm, Guard, Header, ParsedNode, SequenceKind,
};
use crate::classify::classify;
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer;
use crate::options::ParseOptions;
use crate::span::{LineIndex, SourceSpan};

type Span = SimpleSpan;
type Extra<'a> = extra::Err<Rich<'a, char>>;

fn to_source_span(s: Span) -> SourceSpan {
    SourceSpan::from_offsets(s.into_range())
}

fn text_node(s: &str) -> ParsedNode {
    ParsedNode::Text(s.to_string())
}

fn is_marker_word(text: &str) -> bool {
    matches!(text, "stopping" | "shuffle" | "cycle" | "once")
}

fn directive_node(header: Header, form: EmbedForm, branches: Vec<Branch>, span: Span) -> ParsedNode {
    ParsedNode::Directive(Directive {
        kind: classify(&header),
        header,
        form,
        branches,
        span: to_source_span(span),
        identity: DirectiveId::default(),
    })
}

/// Build the full source parser.
///
/// Identities and line/column positions are left empty here and filled in by
/// [`finish`] once the tree is built.
fn source_parser<'a>() -> impl Parser<'a, &'a str, Vec<ParsedNode>, Extra<'a>> {
    // -- Helpers --

    let hspace = one_of(" \t").repeated();
    let space = one_of(" \t\r\n").repeated();
    let newline = just('\r')
        .or_not()
        .then(just('\n'))
        .ignored()
        .labelled("newline");

    let sequence_type = choice((
        just("stopping:").to(SequenceKind::Stopping),
        just("shuffle:").to(SequenceKind::Shuffle),
        just("cycle:").to(SequenceKind::Cycle),
        just("once:").to(SequenceKind::OnceOnly),
        just('~').to(SequenceKind::Shuffle),
        just('&').to(SequenceKind::Cycle),
        just('!').to(SequenceKind::OnceOnly),
    ))
    .then_ignore(hspace.clone())
    .labelled("sequence type");

    let condition = none_of("\r\n|{}:")
        .repeated()
        .at_least(1)
        .to_slice()
        .map_with(|src: &str, e| Guard {
            source: src.to_string(),
            span: to_source_span(e.span()),
        })
        .then_ignore(just(':'))
        .then_ignore(hspace.clone())
        .labelled("condition");

    // A condition wins over a one-character marker (`{!seen: ...}` is guarded),
    // but the spelled-out markers are never guards.
    let header_condition = condition
        .clone()
        .filter(|guard: &Guard| !is_marker_word(&guard.source));
    let header = choice((
        header_condition.map(Header::Condition),
        sequence_type.map(Header::Sequence),
    ))
    .or_not()
    .map(|h| h.unwrap_or(Header::None));

    let embed = recursive(|embed| {
        // -- Inline: {header? a|b|c} --

        let inline_text = none_of("{}|\r\n")
            .repeated()
            .at_least(1)
            .to_slice()
            .map(text_node)
            .labelled("text");

        let inline_argument = choice((inline_text, embed.clone()))
            .repeated()
            .collect::<Vec<_>>()
            .map_with(|content, e| Branch {
                guard: None,
                content,
                span: to_source_span(e.span()),
            });

        let inline_embed = just('{')
            .ignore_then(header.clone())
            .then(
                inline_argument
                    .separated_by(just('|'))
                    .at_least(1)
                    .collect::<Vec<_>>(),
            )
            .then_ignore(just('}'))
            .map_with(|(header, branches), e| {
                directive_node(header, EmbedForm::Inline, branches, e.span())
            });

        // -- Multi-line: {header?\n - a\n - b\n} --

        let multi_text = none_of("{}-")
            .repeated()
            .at_least(1)
            .to_slice()
            .map(text_node)
            .labelled("text");

        let multi_branch = just('-')
            .ignore_then(space.clone())
            .ignore_then(condition.or_not())
            .then(
                choice((multi_text, embed))
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map_with(|(guard, content), e| Branch {
                guard,
                content,
                span: to_source_span(e.span()),
            })
            .then_ignore(space.clone())
            .labelled("branch");

        let multi_embed = just('{')
            .ignore_then(header)
            .then_ignore(hspace)
            .then_ignore(newline)
            .then_ignore(space)
            .then(multi_branch.repeated().at_least(1).collect::<Vec<_>>())
            .then_ignore(just('}'))
            .map_with(|(header, branches), e| {
                directive_node(header, EmbedForm::MultiLine, branches, e.span())
            });

        choice((multi_embed, inline_embed)).labelled("directive")
    });

    // -- Source --

    let top_text = none_of("{}")
        .repeated()
        .at_least(1)
        .to_slice()
        .map(text_node)
        .labelled("text");

    choice((top_text, embed))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Fill in line/column positions and identities, depth first.
fn finish(nodes: &mut [ParsedNode], index: &LineIndex<'_>, options: &ParseOptions) {
    for node in nodes {
        let ParsedNode::Directive(directive) = node else {
            continue;
        };
        directive.span = index.locate(directive.span);
        directive.identity = (options.naming)(&options.document_id, &directive.span);
        if let Header::Condition(guard) = &mut directive.header {
            guard.span = index.locate(guard.span);
        }
        for branch in &mut directive.branches {
            branch.span = index.locate(branch.span);
            if let Some(guard) = &mut branch.guard {
                guard.span = index.locate(guard.span);
            }
            finish(&mut branch.content, index, options);
        }
    }
}

/// Author-facing name of an expected input. `none_of` runs report
/// "something else", which says nothing useful and is dropped.
fn describe_expected(pattern: &RichPattern<'_, char>) -> Option<String> {
    match pattern {
        RichPattern::Token(c) => Some(format!("{:?}", **c)),
        RichPattern::Label(label) => Some(label.to_string()),
        RichPattern::Identifier(word) => Some(format!("'{word}'")),
        RichPattern::Any => Some("any character".to_string()),
        RichPattern::EndOfInput => Some("end of input".to_string()),
        RichPattern::SomethingElse => None,
    }
}

fn to_syntax_error(source: &str, err: &Rich<'_, char>, index: &LineIndex<'_>) -> SyntaxError {
    let message = match err.found() {
        Some(c) => format!("unexpected {c:?}"),
        None => match lexer::unclosed_brace(source) {
            Some(open) => format!(
                "unterminated directive opened at {}",
                index.position(open)
            ),
            None => "unexpected end of input".to_string(),
        },
    };

    let mut expected: Vec<String> = err.expected().filter_map(describe_expected).collect();
    expected.sort();
    expected.dedup();

    SyntaxError {
        message,
        position: index.position(err.span().start),
        expected,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse narrative text into a document.
///
/// Fails with the furthest error the grammar reached. Nesting deeper than
/// `options.max_depth` is rejected before the grammar runs.
pub fn parse(source: &str, options: &ParseOptions) -> SyntaxResult<Document> {
    let index = LineIndex::new(source);

    let nesting = lexer::nesting(source);
    if nesting.max_depth > options.max_depth {
        return Err(SyntaxError::too_deep(
            index.position(nesting.deepest_at),
            options.max_depth,
        ));
    }

    let (output, errors) = source_parser().parse(source).into_output_errors();

    if errors.is_empty() {
        if let Some(mut nodes) = output {
            finish(&mut nodes, &index, options);
            return Ok(Document {
                id: options.document_id.clone(),
                nodes,
            });
        }
    }

    let furthest = errors.iter().max_by_key(|e| e.span().start);
    Err(match furthest {
        Some(err) => to_syntax_error(source, err, &index),
        None => SyntaxError {
            message: "unparseable input".to_string(),
            position: index.position(0),
            expected: Vec::new(),
        },
    })
}
