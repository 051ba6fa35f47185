use std::path::Path;

use varia_syntax::ast::outline;

pub fn run(file: &Path) -> Result<(), String> {
    let (_, doc) = super::parse_file(file)?;
    println!("{}", outline(&doc.nodes));
    Ok(())
}
