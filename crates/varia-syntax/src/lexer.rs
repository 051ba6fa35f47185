//! Structural tokenizer used to bound directive nesting before parsing.

use logos::Logos;

/// Structural token of narrative text.
///
/// Only the characters that shape directives are distinguished; everything else
/// is folded into `Text`. The grammar itself runs on characters, so this token
/// stream is used for the cheap structural checks that must happen before the
/// recursive parser is allowed to run.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Opening brace `{`.
    #[token("{")]
    LBrace,
    /// Closing brace `}`.
    #[token("}")]
    RBrace,
    /// Argument separator `|`.
    #[token("|")]
    Pipe,
    /// Multi-line branch marker `-`.
    #[token("-")]
    Dash,
    /// Line break.
    #[regex(r"\r?\n")]
    Newline,
    /// A run of any other characters.
    #[regex(r"[^{}|\-\r\n]+")]
    Text,
}

/// Lex source into `(Token, Span)` pairs.
///
/// Every character belongs to some token, so lexing cannot fail; a lone `\r`
/// is the only input without a dedicated rule and is reported as `Text`.
pub fn lex(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| (result.unwrap_or(Token::Text), span))
        .collect()
}

/// The deepest point of brace nesting in a source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nesting {
    /// Greatest number of simultaneously open braces.
    pub max_depth: usize,
    /// Byte offset of the first brace that reached `max_depth`.
    pub deepest_at: usize,
}

/// Measure brace nesting. Unbalanced closing braces are ignored here; the
/// grammar reports them.
pub fn nesting(source: &str) -> Nesting {
    let mut depth = 0usize;
    let mut deepest = Nesting::default();
    for (token, span) in lex(source) {
        match token {
            Token::LBrace => {
                depth += 1;
                if depth > deepest.max_depth {
                    deepest = Nesting {
                        max_depth: depth,
                        deepest_at: span.start,
                    };
                }
            }
            Token::RBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Byte offset of the innermost `{` still open at end of input, if any.
pub fn unclosed_brace(source: &str) -> Option<usize> {
    let mut open = Vec::new();
    for (token, span) in lex(source) {
        match token {
            Token::LBrace => open.push(span.start),
            Token::RBrace => {
                open.pop();
            }
            _ => {}
        }
    }
    open.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_inline_directive() {
        let tokens: Vec<_> = lex("Hi {a|b}!").into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text,
                Token::LBrace,
                Token::Text,
                Token::Pipe,
                Token::Text,
                Token::RBrace,
                Token::Text,
            ]
        );
    }

    #[test]
    fn lex_multi_line_directive() {
        let tokens: Vec<_> = lex("{\n- a\n}").into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::LBrace,
                Token::Newline,
                Token::Dash,
                Token::Text,
                Token::Newline,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn lex_preserves_spans() {
        let tokens = lex("ab{c}");
        assert_eq!(tokens[0].1, 0..2);
        assert_eq!(tokens[1].1, 2..3);
        assert_eq!(tokens[3].1, 4..5);
    }

    #[test]
    fn crlf_is_one_newline() {
        let tokens = lex("a\r\nb");
        assert_eq!(tokens[1], (Token::Newline, 1..3));
    }

    #[test]
    fn nesting_of_plain_text() {
        assert_eq!(nesting("no braces here"), Nesting::default());
    }

    #[test]
    fn nesting_reports_deepest_brace() {
        let n = nesting("{a {b {c}} {d}}");
        assert_eq!(n.max_depth, 3);
        assert_eq!(n.deepest_at, 6);
    }

    #[test]
    fn stray_closing_brace_does_not_underflow() {
        let n = nesting("}} {x}");
        assert_eq!(n.max_depth, 1);
        assert_eq!(n.deepest_at, 3);
    }

    #[test]
    fn unclosed_brace_found() {
        assert_eq!(unclosed_brace("a {b {c} d"), Some(2));
        assert_eq!(unclosed_brace("{a|{b"), Some(3));
    }

    #[test]
    fn balanced_source_has_no_unclosed_brace() {
        assert_eq!(unclosed_brace("{a|{b}} c"), None);
    }
}
