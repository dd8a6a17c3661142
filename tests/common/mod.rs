#![allow(dead_code)]

use miniasm::assembler::{self, ErrorKind};
use std::path::PathBuf;

pub fn assemble_ok(source: &str) -> Vec<i32> {
    match assembler::assemble(source) {
        Ok(image) => image.to_vec(),
        Err(err) => panic!("unexpected failure: {}", err),
    }
}

pub fn assemble_err(source: &str) -> (ErrorKind, usize) {
    match assembler::assemble(source) {
        Ok(image) => panic!("unexpected success: {:?}", image),
        Err(err) => (err.kind(), err.line()),
    }
}

/// A path in the system temporary directory which is unique to this test process.
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("miniasm-{}-{}", std::process::id(), name))
}
