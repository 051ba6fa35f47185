//! Directive classification and branch-count contracts.

use crate::ast::{Directive, DirectiveKind, Header, SequenceKind};
use crate::error::{DefinitionError, DefinitionErrorKind};

/// Decide what a directive does from its header.
///
/// A condition without a type marker makes a conditional; a type marker gives
/// that list kind; neither gives a stopping list.
pub fn classify(header: &Header) -> DirectiveKind {
    match header {
        Header::Condition(_) => DirectiveKind::Conditional,
        Header::Sequence(kind) => DirectiveKind::List(*kind),
        Header::None => DirectiveKind::List(SequenceKind::Stopping),
    }
}

/// Check the branch-count contract of a directive.
///
/// Conditionals take one or two unguarded branches; lists take at least one.
pub fn validate(directive: &Directive) -> Result<(), DefinitionError> {
    let branches = directive.branches.len();
    let violation = match directive.kind {
        DirectiveKind::Conditional if !(1..=2).contains(&branches) => {
            Some(DefinitionErrorKind::ConditionalArity(branches))
        }
        DirectiveKind::Conditional if directive.branches.iter().any(|b| b.guard.is_some()) => {
            Some(DefinitionErrorKind::GuardedConditionalBranch)
        }
        DirectiveKind::List(_) if branches == 0 => Some(DefinitionErrorKind::EmptyList),
        _ => None,
    };

    match violation {
        Some(kind) => Err(DefinitionError {
            kind,
            identity: directive.identity.clone(),
            span: directive.span,
        }),
        None => Ok(()),
    }
}
