pub mod disasm;
pub mod phases;
pub mod symbols;

pub use phases::types::{Chunk, Error, ErrorKind, Image};

use log::debug;

pub fn assemble(source: &str) -> Result<Image, Error> {
    let lines = phases::tokenize(source);
    let program = phases::parse(lines)?;
    debug!(
        "first pass: {} commands, {} symbols",
        program.commands.len(),
        program.symbols.len()
    );
    for symbol in program.symbols.iter() {
        debug!("  {} = {}", symbol.label, symbol.address);
    }

    let image = phases::encode(&program)?;
    debug!("second pass: {} words", image.len());

    Ok(image)
}
