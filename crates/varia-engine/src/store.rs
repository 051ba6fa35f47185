//! Persisted per-directive selection state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use varia_syntax::{Directive, DirectiveId, DirectiveKind, SequenceKind};

use crate::error::EngineResult;

/// Selection state of one list directive.
///
/// Serializes as `{counter, order?, cursor?}`; the shuffle fields are omitted
/// for the other kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    /// Rounds in which a branch was emitted.
    pub counter: u32,
    /// Shuffle only: the current permutation of branch indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
    /// Shuffle only: next position in `order`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

/// Where a list directive is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Never emitted a branch.
    Unvisited,
    /// Emitting branches.
    Active,
    /// A once-only list that has shown every branch. Terminal.
    Exhausted,
}

/// Sequence state for every directive seen in one narrative session.
///
/// Entries are created on first use and never removed automatically. The store
/// does no locking: hosts resolving from several threads must serialize access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceStore {
    states: BTreeMap<DirectiveId, SequenceState>,
}

impl SequenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a directive, if it has been visited.
    pub fn get(&self, id: &DirectiveId) -> Option<&SequenceState> {
        self.states.get(id)
    }

    /// State of a directive, created empty on first access.
    pub fn state_mut(&mut self, id: &DirectiveId) -> &mut SequenceState {
        self.states.entry(id.clone()).or_default()
    }

    /// Replace the state of a directive.
    pub fn insert(&mut self, id: DirectiveId, state: SequenceState) {
        self.states.insert(id, state);
    }

    /// Forget a directive. Returns its last state.
    pub fn remove(&mut self, id: &DirectiveId) -> Option<SequenceState> {
        self.states.remove(id)
    }

    /// Forget every directive whose identity starts with `"<document_id>@"`,
    /// the prefix produced by the built-in naming functions. Returns how many
    /// entries were removed.
    pub fn forget_document(&mut self, document_id: &str) -> usize {
        let prefix = format!("{document_id}@");
        let before = self.states.len();
        self.states
            .retain(|id, _| !id.as_str().starts_with(prefix.as_str()));
        before - self.states.len()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of directives with state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no directive has state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All entries, ordered by identity.
    pub fn iter(&self) -> impl Iterator<Item = (&DirectiveId, &SequenceState)> {
        self.states.iter()
    }

    /// Lifecycle of a directive.
    ///
    /// Conditionals keep no state and always report `Unvisited`.
    pub fn lifecycle(&self, directive: &Directive) -> Lifecycle {
        let Some(state) = self.states.get(&directive.identity) else {
            return Lifecycle::Unvisited;
        };
        match directive.kind {
            DirectiveKind::Conditional => Lifecycle::Unvisited,
            DirectiveKind::List(SequenceKind::OnceOnly)
                if state.counter as usize >= directive.branches.len() =>
            {
                Lifecycle::Exhausted
            }
            DirectiveKind::List(_) if state.counter == 0 => Lifecycle::Unvisited,
            DirectiveKind::List(_) => Lifecycle::Active,
        }
    }

    /// Serialize to JSON for a save file.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore from JSON produced by [`SequenceStore::to_json`].
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
