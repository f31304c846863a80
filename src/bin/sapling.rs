use clap::Parser;
use sapling::cli::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = cli.run();
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
