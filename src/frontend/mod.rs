pub mod assemble;
pub mod disassemble;
