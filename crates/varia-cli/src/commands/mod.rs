pub mod check;
pub mod render;
pub mod tree;

use std::fs;
use std::path::Path;

use varia_engine::EngineError;
use varia_syntax::diagnostics::render_diagnostics;
use varia_syntax::{Diagnostic, Document, ParseOptions, parse};

/// Read a source file.
fn read_source(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Document identity for a file: its stem, so state keys survive moving the file.
fn document_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "doc".to_string())
}

/// Read and parse a file, printing diagnostics on failure.
fn parse_file(path: &Path) -> Result<(String, Document), String> {
    let source = read_source(path)?;
    match parse(&source, &ParseOptions::new(document_id(path))) {
        Ok(doc) => Ok((source, doc)),
        Err(err) => {
            print_diagnostics(&source, path, &[Diagnostic::from(&err)]);
            Err(format!("syntax error at {}", err.position))
        }
    }
}

/// Print diagnostics to stderr using ariadne.
fn print_diagnostics(source: &str, path: &Path, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let filename = path.display().to_string();
    eprint!("{}", render_diagnostics(source, &filename, diagnostics));

    let errors = diagnostics.len();
    eprintln!("  {} error{}", errors, if errors == 1 { "" } else { "s" });
}

/// Print an engine error, with source context where it has a location.
fn report_engine_error(source: &str, path: &Path, err: &EngineError) {
    let diagnostic = match err {
        EngineError::Syntax(e) => Diagnostic::from(e),
        EngineError::Definition(e) => Diagnostic::from(e),
        EngineError::Evaluation {
            guard,
            span,
            message,
        } => Diagnostic::new(
            "varia::evaluation",
            span.range(),
            format!("cannot evaluate guard `{guard}`"),
        )
        .with_label(message.clone()),
        EngineError::State(_) => return,
    };
    print_diagnostics(source, path, &[diagnostic]);
}
