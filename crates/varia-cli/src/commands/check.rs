use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use varia_syntax::{Diagnostic, EmbedForm, validate};

pub fn run(file: &Path) -> Result<(), String> {
    let (source, doc) = super::parse_file(file)?;
    let directives = doc.directives();

    let problems: Vec<Diagnostic> = directives
        .iter()
        .filter_map(|d| validate(d).err())
        .map(|e| Diagnostic::from(&e))
        .collect();
    if !problems.is_empty() {
        super::print_diagnostics(&source, file, &problems);
        return Err(format!("{} invalid directive(s)", problems.len()));
    }

    if directives.is_empty() {
        println!("  {} contains no directives.", file.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Identity", "Kind", "Form", "At", "Branches", "Guards"]);

    for d in &directives {
        let form = match d.form {
            EmbedForm::Inline => "inline",
            EmbedForm::MultiLine => "multi-line",
        };
        let guards: Vec<&str> = d
            .guard()
            .into_iter()
            .chain(d.branches.iter().filter_map(|b| b.guard.as_ref()))
            .map(|g| g.source.as_str())
            .collect();
        let guards = if guards.is_empty() {
            "—".to_string()
        } else {
            guards.join(", ")
        };

        table.add_row(vec![
            d.identity.to_string(),
            d.kind.to_string(),
            form.to_string(),
            d.span.start.to_string(),
            d.branches.len().to_string(),
            guards,
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} {} directives in {}",
        "All checks passed:".green().bold(),
        directives.len(),
        file.display().to_string().dimmed()
    );

    Ok(())
}
