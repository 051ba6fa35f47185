//! Resolution of a parse tree into display text.

use rand::Rng;
use tracing::{debug, trace};
use varia_syntax::{Directive, DirectiveKind, EmbedForm, Guard, ParsedNode, SequenceKind, validate};

use crate::error::{EngineError, EngineResult};
use crate::evaluator::GuardEvaluator;
use crate::select::select;
use crate::store::SequenceStore;
use crate::value::Variables;

/// Walks a parse tree, choosing branches and concatenating text.
///
/// Borrows everything it needs for one resolution; sequence state is updated
/// in `store` as directives are visited.
pub struct Resolver<'r, E: ?Sized, R> {
    /// Sequence state, shared across resolutions of one session.
    pub store: &'r mut SequenceStore,
    /// Evaluates guards.
    pub evaluator: &'r E,
    /// Random source for shuffles.
    pub rng: &'r mut R,
    /// Variables visible to guards.
    pub variables: &'r Variables,
}

impl<E, R> Resolver<'_, E, R>
where
    E: GuardEvaluator + ?Sized,
    R: Rng,
{
    /// Resolve a sequence of nodes and concatenate the results.
    pub fn resolve(&mut self, nodes: &[ParsedNode]) -> EngineResult<String> {
        let mut out = String::new();
        for node in nodes {
            match node {
                ParsedNode::Text(text) => out.push_str(text),
                ParsedNode::Directive(directive) => {
                    out.push_str(&self.resolve_directive(directive)?);
                }
            }
        }
        Ok(out)
    }

    /// Resolve a single directive.
    pub fn resolve_directive(&mut self, directive: &Directive) -> EngineResult<String> {
        validate(directive)?;
        let chosen = match directive.kind {
            DirectiveKind::Conditional => self.choose_conditional(directive)?,
            DirectiveKind::List(kind) => self.choose_listed(directive, kind)?,
        };
        let Some(index) = chosen else {
            return Ok(String::new());
        };

        let text = self.resolve(&directive.branches[index].content)?;
        Ok(match directive.form {
            EmbedForm::MultiLine => text.trim().to_string(),
            EmbedForm::Inline => text,
        })
    }

    fn choose_conditional(&self, directive: &Directive) -> EngineResult<Option<usize>> {
        let passed = match directive.guard() {
            Some(guard) => self.check(guard)?,
            None => true,
        };
        Ok(match (passed, directive.branches.len()) {
            (true, _) => Some(0),
            (false, 2) => Some(1),
            (false, _) => None,
        })
    }

    fn choose_listed(
        &mut self,
        directive: &Directive,
        kind: SequenceKind,
    ) -> EngineResult<Option<usize>> {
        let mut eligible = Vec::with_capacity(directive.branches.len());
        for (index, branch) in directive.branches.iter().enumerate() {
            let passed = match &branch.guard {
                Some(guard) => self.check(guard)?,
                None => true,
            };
            if passed {
                eligible.push(index);
            }
        }

        if eligible.is_empty() {
            debug!(identity = %directive.identity, %kind, "no eligible branches");
            return Ok(None);
        }

        let state = self.store.state_mut(&directive.identity);
        let chosen = select(kind, state, &eligible, &mut *self.rng);
        debug!(
            identity = %directive.identity,
            %kind,
            chosen = ?chosen,
            counter = state.counter,
            "selected branch"
        );
        Ok(chosen)
    }

    fn check(&self, guard: &Guard) -> EngineResult<bool> {
        let passed = self
            .evaluator
            .evaluate(&guard.source, self.variables)
            .map_err(|message| EngineError::Evaluation {
                guard: guard.source.clone(),
                span: guard.span,
                message,
            })?;
        trace!(guard = %guard.source, passed, "evaluated guard");
        Ok(passed)
    }
}
