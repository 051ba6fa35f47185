//! Branch selection for list directives.
//!
//! Each discipline works on the *eligible set*: indices of the branches whose
//! guards passed this round, in authoring order. An empty eligible set selects
//! nothing and leaves the state untouched.

use rand::Rng;
use rand::seq::SliceRandom;
use varia_syntax::SequenceKind;

use crate::store::SequenceState;

/// Pick a branch index from `eligible` and advance `state`.
///
/// Returns `None` when nothing is eligible or a once-only list is exhausted.
pub fn select<R: Rng>(
    kind: SequenceKind,
    state: &mut SequenceState,
    eligible: &[usize],
    rng: &mut R,
) -> Option<usize> {
    if eligible.is_empty() {
        return None;
    }
    let counter = state.counter as usize;
    let chosen = match kind {
        SequenceKind::Stopping => eligible[counter.min(eligible.len() - 1)],
        SequenceKind::Cycle => eligible[counter % eligible.len()],
        SequenceKind::OnceOnly => *eligible.get(counter)?,
        SequenceKind::Shuffle => next_shuffled(state, eligible, rng),
    };
    state.counter = state.counter.saturating_add(1);
    Some(chosen)
}

/// Advance a shuffle.
///
/// The next entry of the stored permutation that is currently eligible is
/// swapped to the cursor and emitted. Emitting the last entry draws the next
/// permutation straight away, so the stored `order` and `cursor` alone decide
/// what comes next. Stale or ineligible entries are skipped; if none of the
/// remaining entries is eligible, a fresh permutation is drawn on the spot.
fn next_shuffled<R: Rng>(state: &mut SequenceState, eligible: &[usize], rng: &mut R) -> usize {
    let mut order = state.order.take().unwrap_or_default();
    let mut cursor = state.cursor.unwrap_or(0).min(order.len());

    let pos = match (cursor..order.len()).find(|&p| eligible.contains(&order[p])) {
        Some(pos) => pos,
        None => {
            let last = cursor.checked_sub(1).map(|p| order[p]);
            order = permutation(eligible, last, rng);
            cursor = 0;
            0
        }
    };
    order.swap(cursor, pos);
    let chosen = order[cursor];
    cursor += 1;

    if cursor == order.len() {
        order = permutation(eligible, Some(chosen), rng);
        cursor = 0;
    }
    state.order = Some(order);
    state.cursor = Some(cursor);
    chosen
}

/// A random ordering of `eligible` that does not start with `avoid`, unless it
/// is the only choice.
fn permutation<R: Rng>(eligible: &[usize], avoid: Option<usize>, rng: &mut R) -> Vec<usize> {
    let mut fresh = eligible.to_vec();
    fresh.shuffle(rng);
    if fresh.len() > 1 && avoid == Some(fresh[0]) {
        let swap_with = rng.random_range(1..fresh.len());
        fresh.swap(0, swap_with);
    }
    fresh
}
