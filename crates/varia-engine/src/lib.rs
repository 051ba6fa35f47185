//! Selection engine and compositor for narrative text directives.
//!
//! A [`Session`] parses text with `varia-syntax`, then resolves each directive:
//! conditionals by evaluating their guard, lists by consulting per-directive
//! [`SequenceState`] kept in a [`SequenceStore`]. Guard evaluation and
//! randomness are supplied by the host.
//!
//! ```
//! use varia_engine::{ComparisonEvaluator, EngineConfig, Session, Variables};
//!
//! let mut session = Session::new(EngineConfig::default(), ComparisonEvaluator);
//! let vars = Variables::new();
//! assert_eq!(session.render("door", "{!Creak.|Silence.}", &vars).unwrap(), "Creak.");
//! assert_eq!(session.render("door", "{!Creak.|Silence.}", &vars).unwrap(), "Silence.");
//! assert_eq!(session.render("door", "{!Creak.|Silence.}", &vars).unwrap(), "");
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod localize;
pub mod select;
pub mod session;
pub mod store;
pub mod value;

pub use compose::Resolver;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use evaluator::{ComparisonEvaluator, GuardEvaluator};
pub use localize::{LocalizeStage, Localizer};
pub use select::select;
pub use session::Session;
pub use store::{Lifecycle, SequenceState, SequenceStore};
pub use value::{Value, Variables};
