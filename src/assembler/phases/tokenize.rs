use super::types::{Loc, Located};

const COMMENT_CHAR: char = '#';

// A comment runs to the end of the line, and also ends any token it is glued to.
fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHAR) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// The whitespace-separated words of `text`, each with the byte offset it starts at.
///
/// Nothing is malformed at this stage: anything which is not whitespace is word text, and it is
/// up to the parser to decide whether it is a label, a mnemonic or an operand string.
fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        while chars.peek().map_or(false, |&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let (start, _) = chars.next()?;
        let mut end = text.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() {
                end = idx;
                break;
            }
            chars.next();
        }
        Some((start, &text[start..end]))
    })
}

fn tokenize_line(line_no: usize, line: &str) -> Vec<Located<&str>> {
    words(strip_comment(line))
        .map(|(start, word)| Located::with_loc(Loc::new(line_no, start + 1), word))
        .collect()
}

/// Splits `source` into lines of whitespace-separated tokens with comments
/// removed. Blank lines are kept (as empty lines) so that the line numbers
/// carried by each token stay meaningful.
pub fn tokenize(source: &str) -> Vec<Vec<Located<&str>>> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| tokenize_line(idx + 1, line))
        .collect()
}
