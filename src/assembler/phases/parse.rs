use super::types::{Command, ErrorKind, LabelName, Located, Program};
use crate::assembler::symbols::{self, SymbolTable};
use crate::isa::{
    hw::{self, Addr, Word},
    inst::Mnemonic,
};
use log::trace;
use std::convert::TryFrom;
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedToken(String, &'static str),
    MalformedSize(String),
    SizeOverflow(String),
    AddressOverflow(String),
    DuplicateSymbol(LabelName),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedToken(..) | Error::MalformedSize(_) => ErrorKind::Syntax,
            Error::SizeOverflow(_) | Error::AddressOverflow(_) => ErrorKind::OffsetOverflow,
            Error::DuplicateSymbol(_) => ErrorKind::DuplicateSymbol,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnexpectedToken(tk, msg) => write!(f, "Unexpected token '{}': {}", tk, msg),
            Error::MalformedSize(raw) => write!(
                f,
                "Malformed reservation size '{}': expected a base-10 integer",
                raw
            ),
            Error::SizeOverflow(raw) => write!(
                f,
                "Reservation size '{}' out of bound [{}, {}]",
                raw,
                Word::MIN,
                Word::MAX
            ),
            Error::AddressOverflow(tk) => write!(f, "Address of '{}' out of bound", tk),
            Error::DuplicateSymbol(label) => write!(f, "'{}' is already defined", label),
        }
    }
}

impl From<symbols::Error> for Error {
    fn from(err: symbols::Error) -> Self {
        match err {
            symbols::Error::DuplicateLabel(label) => Error::DuplicateSymbol(label),
        }
    }
}

/// The address the next `Command` will be assembled at: one word per command
/// seen so far, plus the extra words reserved by every `.space` before it.
#[derive(Debug, Default)]
struct Cursor {
    commands: usize,
    expansion: Addr,
}

impl Cursor {
    fn address(&self) -> Option<Addr> {
        Addr::try_from(self.commands)
            .ok()?
            .checked_add(self.expansion)
    }

    // Leaves the cursor untouched on overflow.
    fn reserve(&mut self, size: Word) -> Option<()> {
        let moved = Cursor {
            commands: self.commands,
            expansion: self.expansion.checked_add(Addr::from(size) - 1)?,
        };
        moved.address()?;
        *self = moved;
        Some(())
    }
}

struct Parser {
    cursor: Cursor,
    symbols: SymbolTable,
    commands: Vec<Command>,
}

impl Parser {
    fn new() -> Self {
        Parser {
            cursor: Cursor::default(),
            symbols: SymbolTable::new(),
            commands: Vec::new(),
        }
    }

    fn parse_line<'a>(
        &mut self,
        tokens: impl IntoIterator<Item = Located<&'a str>>,
    ) -> Result<(), Located<Error>> {
        let mut tokens = tokens.into_iter();

        let first = match tokens.next() {
            Some(first) => first,
            None => return Ok(()),
        };
        let loc = first.loc().clone();

        let mnemonic = match Mnemonic::lookup(first.as_value()) {
            Some(mnemonic) => Some(mnemonic),
            None => self.parse_label(first, &mut tokens)?,
        };

        let operands = tokens.next();
        let mut reserve = 0;
        if let (Some(Mnemonic::Space), Some(size)) = (mnemonic, &operands) {
            reserve = self.parse_space(size)?;
        }

        if let Some(extra) = tokens.next() {
            return Err(extra.map(|tk| {
                Error::UnexpectedToken(tk.to_owned(), "too many tokens, expected end of line")
            }));
        }

        self.push(Command {
            mnemonic,
            operands: operands.map(|ops| ops.value().to_owned()),
            reserve,
            loc,
        });
        Ok(())
    }

    // Binds `label` to the current address, and then expects the mnemonic of the line to follow.
    fn parse_label<'a>(
        &mut self,
        label: Located<&'a str>,
        tokens: &mut impl Iterator<Item = Located<&'a str>>,
    ) -> Result<Option<Mnemonic>, Located<Error>> {
        let address = self.cursor.address().ok_or_else(|| {
            label.transfer(Error::AddressOverflow((*label.as_value()).to_owned()))
        })?;
        self.symbols
            .define(label.as_value(), address)
            .map_err(|err| label.transfer(Error::from(err)))?;
        trace!("label '{}' = {}", label.as_value(), address);

        match tokens.next() {
            None => Ok(None),
            Some(tk) => match Mnemonic::lookup(tk.as_value()) {
                Some(mnemonic) => Ok(Some(mnemonic)),
                None => Err(tk.map(|tk| {
                    Error::UnexpectedToken(tk.to_owned(), "expected a mnemonic after a label")
                })),
            },
        }
    }

    // Moves the cursor past the reserved block, and returns how many zero words it emits.
    fn parse_space(&mut self, size: &Located<&str>) -> Result<usize, Located<Error>> {
        let raw = || (*size.as_value()).to_owned();
        let value = match hw::parse_literal(size.as_value()) {
            None => return Err(size.transfer(Error::MalformedSize(raw()))),
            Some(value) => value
                .ok()
                .and_then(|value| Word::try_from(value).ok())
                .ok_or_else(|| size.transfer(Error::SizeOverflow(raw())))?,
        };

        self.cursor
            .reserve(value)
            .ok_or_else(|| size.transfer(Error::AddressOverflow(raw())))?;
        Ok(usize::try_from(value).unwrap_or(0))
    }

    fn push(&mut self, command: Command) {
        self.cursor.commands += 1;
        self.commands.push(command);
    }

    fn finish(self) -> Program {
        Program {
            commands: self.commands,
            symbols: self.symbols,
        }
    }
}

/// The first pass: builds the `Command` list and the complete `SymbolTable`.
pub fn parse<'a>(lines: Vec<Vec<Located<&'a str>>>) -> Result<Program, Located<Error>> {
    let mut parser = Parser::new();
    for line in lines {
        parser.parse_line(line)?;
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::super::tokenize::tokenize;
    use super::super::types::Loc;
    use super::*;

    fn at(line: usize, col: usize) -> Loc {
        Loc::new(line, col)
    }

    fn parse_src(source: &str) -> Result<Program, Located<Error>> {
        parse(tokenize(source))
    }

    #[test]
    fn commands_keep_their_operand_string() {
        let program = parse_src("add 1,2,3\n\nhalt\n").unwrap();
        assert_eq!(
            program.commands,
            vec![
                Command {
                    mnemonic: Some(Mnemonic::Add),
                    operands: Some(String::from("1,2,3")),
                    reserve: 0,
                    loc: at(1, 1),
                },
                Command {
                    mnemonic: Some(Mnemonic::Halt),
                    operands: None,
                    reserve: 0,
                    loc: at(3, 1),
                },
            ]
        );
        assert!(program.symbols.is_empty());
    }

    #[test]
    fn labels_take_the_address_of_their_line() {
        let program = parse_src(
            "start add 1,2,3\n\
             # a comment line takes no address\n\
             \n\
             loop  beq 1,2,done\n\
             done  halt\n",
        )
        .unwrap();
        assert_eq!(program.commands.len(), 3);
        assert_eq!(program.symbols.lookup("start"), Some(0));
        assert_eq!(program.symbols.lookup("loop"), Some(1));
        assert_eq!(program.symbols.lookup("done"), Some(2));
    }

    #[test]
    fn space_moves_later_labels() {
        let program = parse_src(
            "      lw 1,0,x\n\
             buf   .space 3\n\
             x     .fill 7\n\
             y     .space 2\n\
             z     halt\n",
        )
        .unwrap();
        assert_eq!(program.symbols.lookup("buf"), Some(1));
        assert_eq!(program.symbols.lookup("x"), Some(4));
        assert_eq!(program.symbols.lookup("y"), Some(5));
        assert_eq!(program.symbols.lookup("z"), Some(7));
    }

    #[test]
    fn space_with_zero_or_negative_size_uses_literal_arithmetic() {
        let program = parse_src(".space 0\na halt\n.space -2\nb halt\n").unwrap();
        assert_eq!(program.symbols.lookup("a"), Some(0));
        assert_eq!(program.symbols.lookup("b"), Some(-1));
    }

    #[test]
    fn space_carries_its_word_count() {
        let program = parse_src(".space 3\n.space 0\n.space -7\n").unwrap();
        let reserved: Vec<_> = program.commands.iter().map(|cmd| cmd.reserve).collect();
        assert_eq!(reserved, vec![3, 0, 0]);
    }

    #[test]
    fn space_size_must_fit_a_word() {
        assert_eq!(
            parse_src(".space -9223372036854775808\n").unwrap_err(),
            Located::with_loc(
                at(1, 8),
                Error::SizeOverflow(String::from("-9223372036854775808"))
            )
        );
        for source in &[
            ".space 9223372036854775807\n",
            ".space 9223372036854775807\n.space 9223372036854775807\nx halt\n",
            ".space 2147483648\n",
            ".space 99999999999999999999\n",
        ] {
            let err = parse_src(source).unwrap_err();
            assert_eq!(err.loc().line(), 1);
            assert_eq!(err.as_value().kind(), ErrorKind::OffsetOverflow);
        }

        let program = parse_src(".space 2147483647\n.space -2147483648\nx halt\n").unwrap();
        assert_eq!(program.commands[0].reserve, 2_147_483_647);
        assert_eq!(program.symbols.lookup("x"), Some(-1));
    }

    #[test]
    fn cursor_overflow() {
        let mut cursor = Cursor {
            commands: 1,
            expansion: Addr::MAX - 1,
        };
        assert_eq!(cursor.address(), Some(Addr::MAX));
        assert_eq!(cursor.reserve(Word::MAX), None);
        assert_eq!(cursor.address(), Some(Addr::MAX));
        assert_eq!(cursor.reserve(1), Some(()));

        cursor.commands += 1;
        assert_eq!(cursor.address(), None);
    }

    #[test]
    fn malformed_space_size() {
        assert_eq!(
            parse_src("halt\n  .space lots\n").unwrap_err(),
            Located::with_loc(at(2, 10), Error::MalformedSize(String::from("lots")))
        );
    }

    #[test]
    fn duplicate_label() {
        let err = parse_src("a halt\nb halt\na halt\n").unwrap_err();
        assert_eq!(
            err,
            Located::with_loc(at(3, 1), Error::DuplicateSymbol(String::from("a")))
        );
        assert_eq!(err.as_value().kind(), ErrorKind::DuplicateSymbol);
    }

    #[test]
    fn two_labels_in_a_row() {
        assert_eq!(
            parse_src("one two add 1,2,3\n").unwrap_err(),
            Located::with_loc(
                at(1, 5),
                Error::UnexpectedToken(String::from("two"), "expected a mnemonic after a label")
            )
        );
    }

    #[test]
    fn too_many_tokens() {
        assert_eq!(
            parse_src("add 1,2,3 4\n").unwrap_err(),
            Located::with_loc(
                at(1, 11),
                Error::UnexpectedToken(String::from("4"), "too many tokens, expected end of line")
            )
        );
        assert!(parse_src("lbl add 1, 2\n").is_err());
    }

    #[test]
    fn label_alone_is_left_for_the_encoder() {
        let program = parse_src("lonely\nhalt\n").unwrap();
        assert_eq!(program.commands[0].mnemonic, None);
        assert_eq!(program.symbols.lookup("lonely"), Some(0));
    }

    #[test]
    fn mnemonic_in_operand_position_is_an_operand() {
        let program = parse_src("j halt\n").unwrap();
        assert_eq!(program.commands[0].operands.as_deref(), Some("halt"));
    }

    #[test]
    fn empty_source() {
        let program = parse_src("# nothing here\n\n   \n").unwrap();
        assert!(program.commands.is_empty());
        assert!(program.symbols.is_empty());
    }
}
