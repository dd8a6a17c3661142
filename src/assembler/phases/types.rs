use super::{encode, parse};
use crate::assembler::symbols::SymbolTable;
use crate::isa::{hw::Word, inst::Mnemonic};
use derive_more::Constructor;
use std::fmt::Display;
use std::iter::FromIterator;
use strum_macros::Display;

/*
    Phases:

        1.  Tokenization: Each source line is stripped of its comment and split at whitespace into
            located raw tokens. Lines are kept separate, since a newline is what ends a statement.

        2.  Parsing (the first pass): Each token line is parsed into at most one `Command`, of the
            shape `[label] mnemonic [operands]`. Labels are bound to the address cursor as they
            are met, so once this phase is done the `SymbolTable` is complete. The operand string
            is kept verbatim, we don't look inside it yet (except for the size of a `.space`, which
            moves the cursor).

        3.  Encoding (the second pass): Each `Command` is classified by the format of its mnemonic,
            its operands are split at commas and resolved against the `SymbolTable`, and the result
            is packed into words. Concatenating these gives the final program `Image`, in which
            a `.space` stays a single run of zeros until it is written out.

    The first error encountered in any phase aborts the whole translation.
*/

pub type LabelName = String;

#[derive(Debug, PartialEq, Clone, Eq, Constructor)]
pub struct Loc {
    line: usize,
    col: usize,
}

impl Loc {
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Located<T: Sized> {
    loc: Loc,
    val: T,
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(line: {}, col: {})", self.line, self.col)
    }
}

impl<T> Located<T> {
    pub fn with_loc(loc: Loc, val: T) -> Self {
        Located { loc, val }
    }

    pub fn loc(&self) -> &Loc {
        &self.loc
    }

    pub fn value(self) -> T {
        self.val
    }

    pub fn as_value(&self) -> &T {
        &self.val
    }

    pub fn map<S, F>(self, f: F) -> Located<S>
    where
        F: FnOnce(T) -> S,
    {
        Located::with_loc(self.loc, f(self.val))
    }

    pub fn transfer<S>(&self, s: S) -> Located<S> {
        Located::with_loc(self.loc.clone(), s)
    }
}

/// One statement of the program, as produced by the first pass.
///
/// A `Command` without a mnemonic comes from a line holding nothing but a
/// label; it still occupies an address, and is rejected by the encoder.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Command {
    pub mnemonic: Option<Mnemonic>,
    pub operands: Option<String>,
    /// Number of zero words a `.space` on this line emits, as sized by the first pass.
    pub reserve: usize,
    pub loc: Loc,
}

impl Command {
    pub fn line(&self) -> usize {
        self.loc.line()
    }

    /// The comma-separated pieces of the operand string. Empty pieces are
    /// skipped, so `1,,2` has two operands.
    pub fn operands(&self) -> Vec<&str> {
        self.operands
            .as_deref()
            .map(|raw| raw.split(',').filter(|op| !op.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// The result of the first pass.
#[derive(Debug)]
pub struct Program {
    pub commands: Vec<Command>,
    pub symbols: SymbolTable,
}

/// What one `Command` assembles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    Word(Word),
    Zeros(usize),
}

impl Chunk {
    pub fn width(&self) -> usize {
        match self {
            Chunk::Word(_) => 1,
            Chunk::Zeros(count) => *count,
        }
    }

    fn words(self) -> impl Iterator<Item = Word> {
        let (word, count) = match self {
            Chunk::Word(word) => (word, 1),
            Chunk::Zeros(count) => (0, count),
        };
        std::iter::repeat(word).take(count)
    }
}

/// The assembled program. Reserved blocks are only expanded while iterating.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Image {
    chunks: Vec<Chunk>,
}

impl Image {
    pub fn len(&self) -> u64 {
        self.chunks.iter().map(|chunk| chunk.width() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn words(&self) -> impl Iterator<Item = Word> + '_ {
        self.chunks.iter().flat_map(|&chunk| chunk.words())
    }

    pub fn to_vec(&self) -> Vec<Word> {
        self.words().collect()
    }
}

impl FromIterator<Chunk> for Image {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        Image {
            chunks: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[strum(serialize = "syntax error")]
    Syntax,
    #[strum(serialize = "duplicate symbol")]
    DuplicateSymbol,
    #[strum(serialize = "unknown symbol")]
    UnknownSymbol,
    #[strum(serialize = "offset out of bound")]
    OffsetOverflow,
    #[strum(serialize = "unknown opcode")]
    UnknownOpcode,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Parse(Located<parse::Error>),
    Encode(Located<encode::Error>),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(err) => err.as_value().kind(),
            Error::Encode(err) => err.as_value().kind(),
        }
    }

    pub fn loc(&self) -> &Loc {
        match self {
            Error::Parse(err) => err.loc(),
            Error::Encode(err) => err.loc(),
        }
    }

    pub fn line(&self) -> usize {
        self.loc().line()
    }
}

impl From<Located<parse::Error>> for Error {
    fn from(err: Located<parse::Error>) -> Self {
        Error::Parse(err)
    }
}

impl From<Located<encode::Error>> for Error {
    fn from(err: Located<encode::Error>) -> Self {
        Error::Encode(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self {
            Error::Parse(_) => "Parser",
            Error::Encode(_) => "Encoder",
        };
        write!(
            f,
            "Assembly Error (in {}): @{}: {}: ",
            phase,
            self.loc(),
            self.kind()
        )?;
        match self {
            Error::Parse(err) => write!(f, "{}", err.as_value()),
            Error::Encode(err) => write!(f, "{}", err.as_value()),
        }
    }
}

impl std::error::Error for Error {}
