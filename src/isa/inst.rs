use super::hw::{self, Word};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

static TABLE: Lazy<HashMap<&'static str, Mnemonic>> = Lazy::new(|| {
    Mnemonic::iter()
        .map(|mnemonic| (mnemonic.name(), mnemonic))
        .collect()
});

/// Every name the assembler accepts in mnemonic position. The discriminant of
/// a real instruction is its opcode; the two directives come last and have
/// no opcode.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, FromPrimitive,
)]
pub enum Mnemonic {
    #[strum(serialize = "add")]
    Add,
    #[strum(serialize = "sub")]
    Sub,
    #[strum(serialize = "slt")]
    Slt,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "nand")]
    Nand,
    #[strum(serialize = "addi")]
    Addi,
    #[strum(serialize = "slti")]
    Slti,
    #[strum(serialize = "ori")]
    Ori,
    #[strum(serialize = "lui")]
    Lui,
    #[strum(serialize = "lw")]
    Lw,
    #[strum(serialize = "sw")]
    Sw,
    #[strum(serialize = "beq")]
    Beq,
    #[strum(serialize = "jalr")]
    Jalr,
    #[strum(serialize = "j")]
    J,
    #[strum(serialize = "halt")]
    Halt,

    #[strum(serialize = ".fill")]
    Fill,
    #[strum(serialize = ".space")]
    Space,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    #[strum(serialize = "register")]
    Register,
    #[strum(serialize = "immediate")]
    Immediate,
    #[strum(serialize = "jump")]
    Jump,
    #[strum(serialize = "directive")]
    Directive,
}

/// A slot of an instruction word which can be filled by a source operand.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    #[strum(serialize = "rs")]
    Rs,
    #[strum(serialize = "rt")]
    Rt,
    #[strum(serialize = "rd")]
    Rd,
    #[strum(serialize = "offset")]
    Offset,
}

impl Field {
    pub fn is_register(self) -> bool {
        !matches!(self, Field::Offset)
    }
}

impl Mnemonic {
    /// Exact, case-sensitive lookup.
    pub fn lookup(name: &str) -> Option<Mnemonic> {
        TABLE.get(name).copied()
    }

    pub fn from_opcode(opcode: Word) -> Option<Mnemonic> {
        Mnemonic::from_i32(opcode).filter(|mnemonic| mnemonic.opcode().is_some())
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn format(self) -> Format {
        match self {
            Mnemonic::Add | Mnemonic::Sub | Mnemonic::Slt | Mnemonic::Or | Mnemonic::Nand => {
                Format::Register
            }
            Mnemonic::Addi
            | Mnemonic::Slti
            | Mnemonic::Ori
            | Mnemonic::Lui
            | Mnemonic::Lw
            | Mnemonic::Sw
            | Mnemonic::Beq
            | Mnemonic::Jalr => Format::Immediate,
            Mnemonic::J | Mnemonic::Halt => Format::Jump,
            Mnemonic::Fill | Mnemonic::Space => Format::Directive,
        }
    }

    pub fn opcode(self) -> Option<Word> {
        match self.format() {
            Format::Directive => None,
            _ => Some(self as Word),
        }
    }

    /// The word fields named by the operands of an instruction, in the order
    /// they are written in source. Directives have no fields.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Mnemonic::Lui => &[Field::Rt, Field::Offset],
            Mnemonic::Jalr => &[Field::Rt, Field::Rs],
            Mnemonic::J => &[Field::Offset],
            Mnemonic::Halt => &[],
            _ => match self.format() {
                Format::Register => &[Field::Rd, Field::Rs, Field::Rt],
                Format::Immediate => &[Field::Rt, Field::Rs, Field::Offset],
                Format::Jump | Format::Directive => &[],
            },
        }
    }

    pub fn arity(self) -> usize {
        match self.format() {
            Format::Directive => 1,
            _ => self.fields().len(),
        }
    }
}

/// The decoded contents of an instruction word. Fields which the format does
/// not use are ignored when packing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub rs: Word,
    pub rt: Word,
    pub rd: Word,
    pub offset: Word,
}

impl Fields {
    pub fn get(&self, field: Field) -> Word {
        match field {
            Field::Rs => self.rs,
            Field::Rt => self.rt,
            Field::Rd => self.rd,
            Field::Offset => self.offset,
        }
    }

    pub fn set(&mut self, field: Field, value: Word) {
        match field {
            Field::Rs => self.rs = value,
            Field::Rt => self.rt = value,
            Field::Rd => self.rd = value,
            Field::Offset => self.offset = value,
        }
    }

    /// Returns `None` for a directive, which has no instruction encoding.
    pub fn pack(&self, mnemonic: Mnemonic) -> Option<Word> {
        let opcode = mnemonic.opcode()?;
        let word = match mnemonic.format() {
            Format::Register => hw::pack(opcode, self.rs, self.rt, self.rd, 0),
            Format::Immediate => hw::pack(opcode, self.rs, self.rt, 0, self.offset),
            Format::Jump => hw::pack(opcode, 0, 0, 0, self.offset),
            Format::Directive => return None,
        };
        Some(word)
    }
}
