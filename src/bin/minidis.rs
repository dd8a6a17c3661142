use miniasm::cli::command;
use structopt::StructOpt;

fn main() {
    command::terminal_init();
    command::disasm(command::SubcommandDisasm::from_args());
}
