use super::assemble;
use crate::assembler::disasm;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

pub fn disassemble_path(path: &Path) -> Result<Vec<String>> {
    let input =
        File::open(path).with_context(|| format!("cannot open input file '{}'", path.display()))?;
    let words = assemble::read_words(BufReader::new(input))
        .with_context(|| format!("while reading '{}'", path.display()))?;
    Ok(disasm::disassemble(&words))
}

pub fn write_lines(mut out: impl Write, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
