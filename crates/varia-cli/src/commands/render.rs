use std::fs;
use std::path::Path;

use colored::Colorize;
use tracing::debug;
use varia_engine::{ComparisonEvaluator, EngineConfig, Session, Variables};

pub fn run(
    file: &Path,
    times: usize,
    seed: u64,
    vars: Option<&str>,
    state: Option<&Path>,
) -> Result<(), String> {
    let (source, doc) = super::parse_file(file)?;

    let variables: Variables = match vars {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("invalid --vars: {e}"))?,
        None => Variables::new(),
    };

    let config = EngineConfig::default().with_seed(seed);
    let mut session = Session::new(config, ComparisonEvaluator);

    if let Some(path) = state.filter(|p| p.exists()) {
        let saved = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        session
            .restore_state(&saved)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        debug!(entries = session.store().len(), "restored sequence state");
    }

    for visit in 1..=times {
        let text = session.resolve(&doc, &variables).map_err(|e| {
            super::report_engine_error(&source, file, &e);
            e.to_string()
        })?;
        if times > 1 {
            println!("{} {text}", format!("[{visit}]").dimmed());
        } else {
            println!("{text}");
        }
    }

    if let Some(path) = state {
        let json = session
            .store()
            .to_json_pretty()
            .map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        debug!(path = %path.display(), "saved sequence state");
    }

    Ok(())
}
