
pub mod isa;

pub mod assembler;

pub mod frontend;

pub mod cli;
