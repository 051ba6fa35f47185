//! Configuration for a narrative session.

use varia_syntax::options::DEFAULT_MAX_DEPTH;
use varia_syntax::{IdentityNaming, ParseOptions, default_identity};

use crate::localize::LocalizeStage;

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible shuffles.
    pub seed: u64,
    /// Deepest allowed directive nesting.
    pub max_depth: usize,
    /// How directive identities are derived.
    pub naming: IdentityNaming,
    /// When an installed localizer runs.
    pub localize: LocalizeStage,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_depth: DEFAULT_MAX_DEPTH,
            naming: default_identity,
            localize: LocalizeStage::default(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the nesting bound (at least 1).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Set the identity-naming function.
    pub fn with_naming(mut self, naming: IdentityNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Set when the localizer runs.
    pub fn with_localize(mut self, stage: LocalizeStage) -> Self {
        self.localize = stage;
        self
    }

    /// Parse options for one document under this configuration.
    pub fn parse_options(&self, document_id: &str) -> ParseOptions {
        ParseOptions::new(document_id)
            .with_max_depth(self.max_depth)
            .with_naming(self.naming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varia_syntax::line_column_identity;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.max_depth, 64);
        assert_eq!(cfg.localize, LocalizeStage::BeforeParse);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_seed(7)
            .with_max_depth(0)
            .with_localize(LocalizeStage::AfterCompose);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.max_depth, 1);
        assert_eq!(cfg.localize, LocalizeStage::AfterCompose);
    }

    #[test]
    fn parse_options_carry_naming() {
        let cfg = EngineConfig::default()
            .with_max_depth(8)
            .with_naming(line_column_identity);
        let opts = cfg.parse_options("hall");
        assert_eq!(opts.document_id, "hall");
        assert_eq!(opts.max_depth, 8);

        let doc = varia_syntax::parse("x\n {a|b}", &opts).unwrap();
        assert_eq!(doc.directives()[0].identity.as_str(), "hall@2:2");
    }
}
