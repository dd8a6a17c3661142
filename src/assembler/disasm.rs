use crate::isa::{
    hw::{self, Word},
    inst::{Fields, Mnemonic},
};
use itertools::Itertools;
use std::fmt::Display;
use std::num::Wrapping;

/// A machine word read back as source text.
///
/// Any word which is not exactly what the assembler would emit for some
/// instruction is shown as data, so `.fill` words survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Inst(Mnemonic, Fields),
    Data(Word),
}

impl Display for Decoded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decoded::Inst(mnemonic, fields) => {
                write!(f, "{}", mnemonic)?;
                if !mnemonic.fields().is_empty() {
                    let operands = mnemonic
                        .fields()
                        .iter()
                        .map(|&field| fields.get(field))
                        .join(",");
                    write!(f, " {}", operands)?;
                }
                Ok(())
            }
            Decoded::Data(word) => write!(f, "{} {}", Mnemonic::Fill, word),
        }
    }
}

// Reads the word as register fields with no offset, which is how register format words look.
fn register_view(word: Word) -> (Word, Fields) {
    let field = |shift: u32| (word >> shift) & hw::FIELD_MASK;
    let fields = Fields {
        rs: field(hw::RS_SHIFT),
        rt: field(hw::RT_SHIFT),
        rd: field(hw::RD_SHIFT),
        offset: 0,
    };
    (word >> hw::OPCODE_SHIFT, fields)
}

// Reads the low bits as a signed offset. Since the fields were added rather than OR-ed, a negative
// offset has borrowed from the fields above it, so we give that back before reading them.
fn offset_view(word: Word) -> (Word, Fields) {
    let offset = hw::low_offset(word);
    let high = (Wrapping(word) - Wrapping(offset)).0 >> hw::RT_SHIFT;
    let field = |shift: u32| (high >> (shift - hw::RT_SHIFT)) & hw::FIELD_MASK;
    let fields = Fields {
        rs: field(hw::RS_SHIFT),
        rt: field(hw::RT_SHIFT),
        rd: 0,
        offset,
    };
    (high >> (hw::OPCODE_SHIFT - hw::RT_SHIFT), fields)
}

fn canonical(mnemonic: Mnemonic, fields: &Fields) -> Fields {
    let mut canon = Fields::default();
    for &field in mnemonic.fields() {
        canon.set(field, fields.get(field));
    }
    canon
}

pub fn decode(word: Word) -> Decoded {
    [register_view(word), offset_view(word)]
        .iter()
        .filter_map(|(opcode, fields)| {
            let mnemonic = Mnemonic::from_opcode(*opcode)?;
            let fields = canonical(mnemonic, fields);
            if fields.pack(mnemonic) == Some(word) {
                Some(Decoded::Inst(mnemonic, fields))
            } else {
                None
            }
        })
        .next()
        .unwrap_or(Decoded::Data(word))
}

pub fn disassemble(words: &[Word]) -> Vec<String> {
    words.iter().map(|&word| decode(word).to_string()).collect()
}
