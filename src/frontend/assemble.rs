use crate::isa::hw::Word;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("cannot open input file '{}'", path.display()))
}

/// One decimal integer per line, in program order.
pub fn write_words(
    mut out: impl Write,
    words: impl IntoIterator<Item = Word>,
) -> std::io::Result<()> {
    for word in words {
        writeln!(out, "{}", word)?;
    }
    out.flush()
}

/// The inverse of `write_words`. Blank lines are skipped.
pub fn read_words(input: impl BufRead) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        words.push(
            line.parse::<Word>()
                .with_context(|| format!("line {}: malformed word '{}'", line_no + 1, line))?,
        );
    }
    Ok(words)
}
