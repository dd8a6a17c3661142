mod common;

use common::{assemble_err, assemble_ok};
use miniasm::assembler::{
    self,
    phases::{encode, parse},
    Chunk, Error, ErrorKind,
};

#[test]
fn sample_program() {
    let words = assemble_ok(
        "        lw   1,0,five     # load 5\n\
         \x20       lw   2,0,neg1\n\
         start   add  1,1,2        # count down\n\
         \x20       beq  0,1,done\n\
         \x20       j    start\n\
         done    halt\n\
         five    .fill 5\n\
         neg1    .fill -1\n",
    );
    assert_eq!(
        words,
        vec![
            151_060_486,
            151_126_023,
            1_183_744,
            185_597_957,
            218_103_810,
            234_881_024,
            5,
            -1,
        ]
    );
}

#[test]
fn output_length_counts_reserved_words() {
    let words = assemble_ok("halt\n.space 4\n.fill 1\n.space 1\n.space 0\nhalt\n");
    assert_eq!(words.len(), 1 + 4 + 1 + 1 + 0 + 1);
}

#[test]
fn add_encoding() {
    assert_eq!(assemble_ok("add 1,2,3"), vec![2_297_856]);
}

#[test]
fn offset_boundaries() {
    assert_eq!(assemble_ok("j 32767"), vec![(13 << 24) + 32767]);
    assert_eq!(assemble_ok("j -32768"), vec![(13 << 24) - 32768]);
    assert_eq!(assemble_err("halt\nj 32768\n"), (ErrorKind::OffsetOverflow, 2));
    assert_eq!(assemble_err("addi 1,1,-32769"), (ErrorKind::OffsetOverflow, 1));
}

#[test]
fn fill_is_unrestricted() {
    assert_eq!(assemble_ok(".fill 42"), vec![42]);
    assert_eq!(assemble_ok(".fill 1000000"), vec![1_000_000]);
}

#[test]
fn space_then_fill() {
    let words = assemble_ok("      lw 1,0,buf\nbuf   .space 3\n      .fill 7\n");
    assert_eq!(&words[1..], &[0, 0, 0, 7]);
    // `buf` is the index of the first reserved word
    assert_eq!(words[0], (9 << 24) + (1 << 16) + 1);
}

#[test]
fn extreme_space_sizes_fail_cleanly() {
    assert_eq!(
        assemble_err(".space -9223372036854775808\n"),
        (ErrorKind::OffsetOverflow, 1)
    );
    assert_eq!(
        assemble_err(".space 9223372036854775807\n.space 9223372036854775807\nx halt\n"),
        (ErrorKind::OffsetOverflow, 1)
    );
    assert_eq!(
        assemble_err("halt\n.space 9223372036854775807\n"),
        (ErrorKind::OffsetOverflow, 2)
    );
}

#[test]
fn large_space_stays_one_run() {
    assert_eq!(assemble_err("x .space 4000000000\n"), (ErrorKind::OffsetOverflow, 1));

    let image = assembler::assemble(".space 2147483647\n.space 2147483647\n.fill 9\n").unwrap();
    assert_eq!(image.len(), 2 * 2_147_483_647 + 1);
    assert_eq!(image.chunks().last(), Some(&Chunk::Word(9)));
}

#[test]
fn label_after_space_sees_its_full_width() {
    let words = assemble_ok(".space 10\nhere .fill here\n");
    assert_eq!(words.len(), 11);
    assert_eq!(words[10], 10);
}

#[test]
fn forward_references() {
    assert_eq!(
        assemble_ok("j end\n.fill end\nend halt\n"),
        vec![(13 << 24) + 2, 2, 14 << 24]
    );
}

#[test]
fn duplicate_symbol_names_the_second_definition() {
    assert_eq!(
        assemble_err("a halt\nb halt\n\na .fill 1\n"),
        (ErrorKind::DuplicateSymbol, 4)
    );

    match assembler::assemble("x halt\nx halt\n") {
        Err(Error::Parse(err)) => assert_eq!(
            err.value(),
            parse::Error::DuplicateSymbol(String::from("x"))
        ),
        res => panic!("unexpected result: {:?}", res),
    }
}

#[test]
fn unknown_symbol_names_the_token() {
    let err = assembler::assemble("halt\nbeq 1,2,nowhere\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownSymbol);
    assert_eq!(err.line(), 2);
    assert!(err.to_string().contains("'nowhere'"));
    match err {
        Error::Encode(err) => assert_eq!(
            err.value(),
            encode::Error::UnknownSymbol(String::from("nowhere"))
        ),
        err => panic!("unexpected error: {:?}", err),
    }
}

#[test]
fn syntax_errors() {
    assert_eq!(assemble_err("halt\none two halt\n"), (ErrorKind::Syntax, 2));
    assert_eq!(assemble_err("add 1,2,3 extra\n"), (ErrorKind::Syntax, 1));
    assert_eq!(assemble_err("halt\n\nlabel_only\n"), (ErrorKind::Syntax, 3));
}

#[test]
fn first_pass_errors_come_first() {
    // The stray label on line 1 is only noticed by the encoder, after the
    // whole first pass has run.
    assert_eq!(
        assemble_err("lonely\nj x\nx halt\nx halt\n"),
        (ErrorKind::DuplicateSymbol, 4)
    );
}

#[test]
fn first_error_wins() {
    assert_eq!(
        assemble_err("j nowhere\nj 99999\n"),
        (ErrorKind::UnknownSymbol, 1)
    );
}

#[test]
fn empty_programs() {
    assert!(assemble_ok("").is_empty());
    assert!(assemble_ok("# just a comment\n\n   \t\n#another\n").is_empty());
}
