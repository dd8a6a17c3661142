use super::types::{Chunk, Command, ErrorKind, Image, Located, Program};
use crate::assembler::symbols::SymbolTable;
use crate::isa::{
    hw::{self, Addr, Word},
    inst::{Fields, Mnemonic},
};
use log::trace;
use std::convert::TryFrom;
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MissingMnemonic,
    OperandCount(Mnemonic, usize, usize),
    MalformedRegister(String),
    UnknownSymbol(String),
    OffsetOverflow(String, Option<Addr>),
    UnknownOpcode(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingMnemonic
            | Error::OperandCount(..)
            | Error::MalformedRegister(_) => ErrorKind::Syntax,
            Error::UnknownSymbol(_) => ErrorKind::UnknownSymbol,
            Error::OffsetOverflow(..) => ErrorKind::OffsetOverflow,
            Error::UnknownOpcode(_) => ErrorKind::UnknownOpcode,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingMnemonic => write!(f, "Expected a mnemonic after the label"),
            Error::OperandCount(mnemonic, expected, found) => write!(
                f,
                "'{}' takes {} operand(s), found {}",
                mnemonic, expected, found
            ),
            Error::MalformedRegister(raw) => {
                write!(f, "Malformed register '{}': expected a base-10 integer", raw)
            }
            Error::UnknownSymbol(name) => {
                write!(f, "'{}' is neither a label nor a number", name)
            }
            Error::OffsetOverflow(raw, None) => write!(f, "'{}' does not fit a word", raw),
            Error::OffsetOverflow(raw, Some(value)) => write!(
                f,
                "'{}' is {}, outside [{}, {}]",
                raw,
                value,
                hw::OFFSET_MIN,
                hw::OFFSET_MAX
            ),
            Error::UnknownOpcode(name) => write!(f, "'{}' has no instruction encoding", name),
        }
    }
}

/// Looks `token` up as a label first, and only then tries it as a literal.
fn resolve(token: &str, symbols: &SymbolTable) -> Result<Addr, Error> {
    if let Some(address) = symbols.lookup(token) {
        return Ok(address);
    }

    match hw::parse_literal(token) {
        None => Err(Error::UnknownSymbol(token.to_owned())),
        Some(Err(_)) => Err(Error::OffsetOverflow(token.to_owned(), None)),
        Some(Ok(value)) => Ok(value),
    }
}

fn resolve_offset(token: &str, symbols: &SymbolTable) -> Result<Word, Error> {
    let value = resolve(token, symbols)?;
    if !hw::OFFSET_RANGE.contains(&value) {
        return Err(Error::OffsetOverflow(token.to_owned(), Some(value)));
    }

    Ok(value as Word)
}

// Register numbers are deliberately not checked against the register count of the machine.
fn parse_register(token: &str) -> Result<Word, Error> {
    hw::parse_literal(token)
        .and_then(Result::ok)
        .and_then(|value| Word::try_from(value).ok())
        .ok_or_else(|| Error::MalformedRegister(token.to_owned()))
}

impl Command {
    pub fn encode(&self, symbols: &SymbolTable) -> Result<Chunk, Error> {
        let mnemonic = self.mnemonic.ok_or(Error::MissingMnemonic)?;

        let operands = self.operands();
        if operands.len() != mnemonic.arity() {
            return Err(Error::OperandCount(mnemonic, mnemonic.arity(), operands.len()));
        }

        match (mnemonic, operands.as_slice()) {
            (Mnemonic::Space, _) => Ok(Chunk::Zeros(self.reserve)),
            (Mnemonic::Fill, [value]) => Command::encode_fill(value, symbols).map(Chunk::Word),
            (_, operands) => Command::encode_inst(mnemonic, operands, symbols).map(Chunk::Word),
        }
    }

    fn encode_inst(
        mnemonic: Mnemonic,
        operands: &[&str],
        symbols: &SymbolTable,
    ) -> Result<Word, Error> {
        let mut fields = Fields::default();
        for (&field, operand) in mnemonic.fields().iter().zip(operands) {
            let value = if field.is_register() {
                parse_register(operand)?
            } else {
                resolve_offset(operand, symbols)?
            };
            fields.set(field, value);
        }

        fields
            .pack(mnemonic)
            .ok_or_else(|| Error::UnknownOpcode(mnemonic.to_string()))
    }

    // Unlike an offset, a `.fill` value only has to fit the word.
    fn encode_fill(value: &str, symbols: &SymbolTable) -> Result<Word, Error> {
        let resolved = resolve(value, symbols)?;
        Word::try_from(resolved)
            .map_err(|_| Error::OffsetOverflow(value.to_owned(), Some(resolved)))
    }
}

/// The second pass. The `SymbolTable` of `program` must be complete.
pub fn encode(program: &Program) -> Result<Image, Located<Error>> {
    program
        .commands
        .iter()
        .map(|cmd| {
            cmd.encode(&program.symbols)
                .map(|chunk| {
                    trace!("line {}: {:?}", cmd.line(), chunk);
                    chunk
                })
                .map_err(|err| Located::with_loc(cmd.loc.clone(), err))
        })
        .collect()
}
