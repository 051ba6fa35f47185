//! Guard evaluation.
//!
//! Guards are opaque to the grammar: the text before a `:` is handed verbatim to
//! a [`GuardEvaluator`] supplied by the host. [`ComparisonEvaluator`] covers
//! simple flag and comparison guards for hosts without an expression language.

use std::cmp::Ordering;

use crate::value::{Value, Variables};

/// Evaluates guard expressions against a variable context.
pub trait GuardEvaluator {
    /// Evaluate `guard` (the exact source text) to a boolean.
    ///
    /// An `Err` carries a human-readable reason and aborts resolution.
    fn evaluate(&self, guard: &str, variables: &Variables) -> Result<bool, String>;
}

impl<F> GuardEvaluator for F
where
    F: Fn(&str, &Variables) -> Result<bool, String>,
{
    fn evaluate(&self, guard: &str, variables: &Variables) -> Result<bool, String> {
        self(guard, variables)
    }
}

/// Minimal guard language: names, literals, comparisons, `!`, `&&` and `||`.
///
/// ```text
/// seen_ghost            truthiness of a variable
/// !seen_ghost           negation
/// gold >= 10            == != < <= > >=
/// name == "Ada"         quoted text literals, numbers, true/false
/// a && b || c           && binds tighter than ||; no parentheses
/// ```
///
/// Referencing an unknown variable is an error rather than false.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEvaluator;

impl GuardEvaluator for ComparisonEvaluator {
    fn evaluate(&self, guard: &str, variables: &Variables) -> Result<bool, String> {
        let guard = guard.trim();
        if guard.is_empty() {
            return Err("empty guard".to_string());
        }
        for alternative in split_outside_quotes(guard, "||") {
            let mut all = true;
            for term in split_outside_quotes(alternative, "&&") {
                if !term_value(term.trim(), variables)? {
                    all = false;
                    break;
                }
            }
            if all {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

const OPERATORS: [&str; 6] = [">=", "<=", "==", "!=", ">", "<"];

fn term_value(term: &str, variables: &Variables) -> Result<bool, String> {
    if term.is_empty() {
        return Err("missing operand".to_string());
    }

    if let Some((at, op)) = find_operator(term) {
        let lhs = operand(term[..at].trim(), variables)?;
        let rhs = operand(term[at + op.len()..].trim(), variables)?;
        return compare(&lhs, op, &rhs);
    }

    match term.strip_prefix('!') {
        Some(rest) => term_value(rest.trim(), variables).map(|b| !b),
        None => Ok(operand(term, variables)?.is_truthy()),
    }
}

fn operand(text: &str, variables: &Variables) -> Result<Value, String> {
    if text.is_empty() {
        return Err("missing operand".to_string());
    }
    if let Some(quoted) = unquote(text) {
        return Ok(Value::Text(quoted.to_string()));
    }
    match text {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    if let Some(value) = variables.get(text) {
        return Ok(value.clone());
    }
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("unknown variable: {text}"))
}

fn compare(lhs: &Value, op: &str, rhs: &Value) -> Result<bool, String> {
    let ordering = match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match (lhs.as_number(), rhs.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };

    match (op, ordering) {
        ("==", ord) => Ok(ord == Some(Ordering::Equal)),
        ("!=", ord) => Ok(ord != Some(Ordering::Equal)),
        (_, Some(_)) if matches!(lhs, Value::Bool(_)) => {
            Err(format!("cannot order booleans with {op}"))
        }
        (">=", Some(ord)) => Ok(ord != Ordering::Less),
        ("<=", Some(ord)) => Ok(ord != Ordering::Greater),
        (">", Some(ord)) => Ok(ord == Ordering::Greater),
        ("<", Some(ord)) => Ok(ord == Ordering::Less),
        _ => Err(format!("cannot compare {lhs} {op} {rhs}")),
    }
}

fn unquote(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        text.strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
    })
}

/// Byte offsets of characters that are not inside a quoted literal.
fn unquoted_offsets(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut quote: Option<char> = None;
    text.char_indices().filter_map(move |(i, c)| match quote {
        Some(q) if c == q => {
            quote = None;
            None
        }
        Some(_) => None,
        None if c == '"' || c == '\'' => {
            quote = Some(c);
            None
        }
        None => Some(i),
    })
}

fn find_operator(term: &str) -> Option<(usize, &'static str)> {
    unquoted_offsets(term).find_map(|i| {
        OPERATORS
            .iter()
            .find(|op| term[i..].starts_with(**op))
            .map(|op| (i, *op))
    })
}

fn split_outside_quotes<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for i in unquoted_offsets(text) {
        if i >= start && text[i..].starts_with(separator) {
            parts.push(&text[start..i]);
            start = i + separator.len();
        }
    }
    parts.push(&text[start..]);
    parts
}
