use static_assertions::const_assert;
use std::num::{ParseIntError, Wrapping};
use std::ops::RangeInclusive;

pub type Word = i32;

// Addresses are kept wider than a `Word`: a `.space` with a negative size can
// legally drive the cursor below zero, and a huge one past `Word::MAX`.
pub type Addr = i64;

pub const WORD_WIDTH: u32 = 32;
pub const FIELD_WIDTH: u32 = 4;
pub const OFFSET_WIDTH: u32 = 16;

pub const OPCODE_SHIFT: u32 = 24;
pub const RS_SHIFT: u32 = 20;
pub const RT_SHIFT: u32 = 16;
pub const RD_SHIFT: u32 = 12;

pub const FIELD_MASK: Word = (1 << FIELD_WIDTH) - 1;

pub const OFFSET_MIN: Addr = -(1 << (OFFSET_WIDTH - 1));
pub const OFFSET_MAX: Addr = (1 << (OFFSET_WIDTH - 1)) - 1;
pub const OFFSET_RANGE: RangeInclusive<Addr> = OFFSET_MIN..=OFFSET_MAX;

const_assert!(OPCODE_SHIFT + FIELD_WIDTH <= WORD_WIDTH);
const_assert!(RS_SHIFT + FIELD_WIDTH <= OPCODE_SHIFT);
const_assert!(RT_SHIFT + FIELD_WIDTH <= RS_SHIFT);
const_assert!(RD_SHIFT + FIELD_WIDTH <= RT_SHIFT);
const_assert!(OFFSET_WIDTH <= RT_SHIFT);

/// Packs the fields of an instruction word.
///
/// The fields are *added*, not OR-ed: a negative `offset` borrows from the
/// register and opcode fields above it, so the result is the plain signed
/// sum `opcode·2^24 + rs·2^20 + rt·2^16 + rd·2^12 + offset`. Register values
/// are not range checked, so the sum wraps rather than overflows.
pub fn pack(opcode: Word, rs: Word, rt: Word, rd: Word, offset: Word) -> Word {
    let field = |v: Word, shift: u32| Wrapping(v) * Wrapping(1 << shift);

    (field(opcode, OPCODE_SHIFT)
        + field(rs, RS_SHIFT)
        + field(rt, RT_SHIFT)
        + field(rd, RD_SHIFT)
        + Wrapping(offset))
    .0
}

/// The low `OFFSET_WIDTH` bits of `word`, sign extended.
pub fn low_offset(word: Word) -> Word {
    Word::from(word as i16)
}

/// Returns `None` if `raw` is not of the form `-?[0-9]+`, and `Some(Err(_))`
/// if it is but does not fit in an `Addr`.
///
/// Note that Rust's own integer parsing also accepts a leading `+`, which we
/// must reject here.
pub fn parse_literal(raw: &str) -> Option<Result<Addr, ParseIntError>> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(raw.parse::<Addr>())
}
