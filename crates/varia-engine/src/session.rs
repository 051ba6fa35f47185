//! Narrative session: one sequence store, one evaluator, one random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use varia_syntax::{DirectiveId, Document, parse};

use crate::compose::Resolver;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::evaluator::GuardEvaluator;
use crate::localize::{LocalizeStage, Localizer};
use crate::store::{SequenceState, SequenceStore};
use crate::value::Variables;

/// A narrative session.
///
/// Owns the sequence state for every directive it resolves, so visiting the
/// same text again continues each directive's sequence. Sessions are not
/// synchronized; share one across threads only behind a lock.
pub struct Session<E, R = StdRng> {
    config: EngineConfig,
    evaluator: E,
    rng: R,
    store: SequenceStore,
    localizer: Option<Box<dyn Localizer>>,
}

impl<E: GuardEvaluator> Session<E, StdRng> {
    /// Create a session whose shuffles are seeded from `config.seed`.
    pub fn new(config: EngineConfig, evaluator: E) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, evaluator, rng)
    }
}

impl<E: GuardEvaluator, R: Rng> Session<E, R> {
    /// Create a session with a caller-supplied random source.
    pub fn with_rng(config: EngineConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            store: SequenceStore::new(),
            localizer: None,
        }
    }

    /// Install a localizer, applied at `config.localize`.
    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Some(Box::new(localizer));
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the sequence store.
    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    /// Get a mutable reference to the sequence store.
    pub fn store_mut(&mut self) -> &mut SequenceStore {
        &mut self.store
    }

    /// Parse a document, localizing the source first if configured.
    pub fn parse(&self, document_id: &str, source: &str) -> EngineResult<Document> {
        let options = self.config.parse_options(document_id);
        let document = match self.localizer_at(LocalizeStage::BeforeParse) {
            Some(localizer) => parse(&localizer.localize(source), &options)?,
            None => parse(source, &options)?,
        };
        Ok(document)
    }

    /// Resolve a parsed document against `variables`.
    ///
    /// On error the sequence store is left as it was before the call.
    pub fn resolve(&mut self, document: &Document, variables: &Variables) -> EngineResult<String> {
        let undo: Vec<(DirectiveId, Option<SequenceState>)> = document
            .directives()
            .into_iter()
            .map(|d| (d.identity.clone(), self.store.get(&d.identity).cloned()))
            .collect();
        let mut resolver = Resolver {
            store: &mut self.store,
            evaluator: &self.evaluator,
            rng: &mut self.rng,
            variables,
        };
        let text = match resolver.resolve(&document.nodes) {
            Ok(text) => text,
            Err(err) => {
                debug!(document = %document.id, error = %err, "resolution failed, state rolled back");
                for (id, previous) in undo {
                    match previous {
                        Some(state) => self.store.insert(id, state),
                        None => {
                            self.store.remove(&id);
                        }
                    }
                }
                return Err(err);
            }
        };

        Ok(match self.localizer_at(LocalizeStage::AfterCompose) {
            Some(localizer) => localizer.localize(&text),
            None => text,
        })
    }

    /// Parse and resolve in one step.
    pub fn render(
        &mut self,
        document_id: &str,
        source: &str,
        variables: &Variables,
    ) -> EngineResult<String> {
        let document = self.parse(document_id, source)?;
        self.resolve(&document, variables)
    }

    /// Serialize the sequence store for a save file.
    pub fn save_state(&self) -> EngineResult<String> {
        self.store.to_json()
    }

    /// Replace the sequence store with one from a save file.
    pub fn restore_state(&mut self, json: &str) -> EngineResult<()> {
        self.store = SequenceStore::from_json(json)?;
        Ok(())
    }

    fn localizer_at(&self, stage: LocalizeStage) -> Option<&dyn Localizer> {
        self.localizer
            .as_deref()
            .filter(|_| self.config.localize == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::evaluator::ComparisonEvaluator;
    use crate::value::Value;

    fn session() -> Session<ComparisonEvaluator> {
        Session::new(EngineConfig::default(), ComparisonEvaluator)
    }

    #[test]
    fn render_advances_sequences() {
        let mut s = session();
        let vars = Variables::new();
        let out: Vec<String> = (0..3)
            .map(|_| s.render("hall", "{&tick|tock}", &vars).unwrap())
            .collect();
        assert_eq!(out, ["tick", "tock", "tick"]);
        assert_eq!(s.store().len(), 1);
    }

    #[test]
    fn failed_resolution_rolls_back_state() {
        let mut s = session();
        let doc = s.parse("hall", "{a|b} {ghost: boo}").unwrap();
        assert!(matches!(
            s.resolve(&doc, &Variables::new()),
            Err(EngineError::Evaluation { .. })
        ));
        assert!(s.store().is_empty());

        let vars = Variables::from([("ghost".to_string(), Value::Bool(false))]);
        assert_eq!(s.resolve(&doc, &vars).unwrap(), "a ");
    }

    #[test]
    fn rollback_keeps_unrelated_and_earlier_state() {
        let mut s = session();
        let vars = Variables::from([("ghost".to_string(), Value::Bool(false))]);
        s.render("cellar", "{&drip|drop}", &vars).unwrap();
        let doc = s.parse("hall", "{&a|b} {ghost: boo}").unwrap();
        s.resolve(&doc, &vars).unwrap();
        let before = s.store().clone();

        assert!(s.resolve(&doc, &Variables::new()).is_err());
        assert_eq!(s.store(), &before);
        assert_eq!(s.store().len(), 2);
        assert_eq!(s.resolve(&doc, &vars).unwrap(), "b ");
    }

    #[test]
    fn save_and_restore_resume_exactly() {
        let vars = Variables::new();
        let source = "{~a|b|c|d}";
        for visits in [1, 4, 8] {
            let mut s = session();
            for _ in 0..visits {
                s.render("hall", source, &vars).unwrap();
            }
            let saved = s.save_state().unwrap();

            let mut replay = Session::new(EngineConfig::default().with_seed(7), ComparisonEvaluator);
            replay.restore_state(&saved).unwrap();
            let remaining = 4 - visits % 4;
            let expected: Vec<String> = (0..remaining)
                .map(|_| s.render("hall", source, &vars).unwrap())
                .collect();
            let resumed: Vec<String> = (0..remaining)
                .map(|_| replay.render("hall", source, &vars).unwrap())
                .collect();
            assert_eq!(expected, resumed, "after {visits} visits");
        }
    }

    #[test]
    fn restore_rejects_bad_json() {
        let mut s = session();
        assert!(matches!(
            s.restore_state("not json"),
            Err(EngineError::State(_))
        ));
    }

    #[test]
    fn localizer_before_parse_can_supply_directives() {
        let mut s = session().with_localizer(|text: &str| text.replace("@greeting", "{&Hi|Yo}"));
        let vars = Variables::new();
        assert_eq!(s.render("d", "@greeting!", &vars).unwrap(), "Hi!");
        assert_eq!(s.render("d", "@greeting!", &vars).unwrap(), "Yo!");
    }

    #[test]
    fn localizer_after_compose_sees_resolved_text() {
        let config = EngineConfig::default().with_localize(LocalizeStage::AfterCompose);
        let mut s = Session::new(config, ComparisonEvaluator)
            .with_localizer(|text: &str| format!("<{text}>"));
        assert_eq!(
            s.render("d", "{a|b}", &Variables::new()).unwrap(),
            "<a>"
        );
    }

    #[test]
    fn syntax_errors_surface() {
        let mut s = session();
        assert!(matches!(
            s.render("d", "{a|b", &Variables::new()),
            Err(EngineError::Syntax(_))
        ));
    }
}
