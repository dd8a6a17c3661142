use crate::assembler;
use crate::frontend::{assemble, disassemble};
use ansi_term::Colour::Red;
use anyhow::{Context, Result};
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[cfg(windows)]
pub fn terminal_init() {
    // Without ANSI support the diagnostics are still readable, just not colored.
    let _ = ansi_term::enable_ansi_support();
}

#[cfg(not(windows))]
pub fn terminal_init() {}

#[derive(StructOpt, Debug)]
struct LogOpts {
    /// Log more (-v: info, -vv: debug, -vvv: trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

impl LogOpts {
    fn init(&self) {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        env_logger::Builder::new().filter_level(level).init();
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "miniasm")]
pub struct SubcommandAsm {
    #[structopt(name = "in.as", parse(from_os_str))]
    in_src: PathBuf,

    #[structopt(name = "out.mc", parse(from_os_str))]
    out_words: PathBuf,

    #[structopt(flatten)]
    log_opts: LogOpts,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "minidis")]
pub struct SubcommandDisasm {
    #[structopt(name = "in.mc", parse(from_os_str))]
    in_words: PathBuf,

    #[structopt(name = "out.as", parse(from_os_str))]
    out_src: Option<PathBuf>,

    #[structopt(flatten)]
    log_opts: LogOpts,
}

fn exit_with(res: Result<()>) -> ! {
    match res {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{} {:#}", Red.bold().paint("error:"), err);
            std::process::exit(1)
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("cannot open output file '{}'", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn asm(cmd: SubcommandAsm) -> ! {
    cmd.log_opts.init();
    exit_with(try_asm(&cmd))
}

fn try_asm(cmd: &SubcommandAsm) -> Result<()> {
    let source = assemble::read_source(&cmd.in_src)?;

    // Created (and truncated) before anything is translated: a failed run leaves it empty.
    let out = create(&cmd.out_words)?;

    let image = assembler::assemble(&source)?;
    info!(
        "{}: {} words -> '{}'",
        cmd.in_src.display(),
        image.len(),
        cmd.out_words.display()
    );

    assemble::write_words(out, image.words())
        .with_context(|| format!("cannot write output file '{}'", cmd.out_words.display()))
}

pub fn disasm(cmd: SubcommandDisasm) -> ! {
    cmd.log_opts.init();
    exit_with(try_disasm(&cmd))
}

fn try_disasm(cmd: &SubcommandDisasm) -> Result<()> {
    let lines = disassemble::disassemble_path(&cmd.in_words)?;
    info!("{}: {} words", cmd.in_words.display(), lines.len());

    match &cmd.out_src {
        Some(path) => disassemble::write_lines(create(path)?, &lines)
            .with_context(|| format!("cannot write output file '{}'", path.display())),
        None => {
            let stdout = io::stdout();
            Ok(disassemble::write_lines(stdout.lock(), &lines)?)
        }
    }
}
