mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod semantic;
mod source;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;
use utils::init_logging;

fn main() {
    let cli = Cli::parse();

    // Keep stdout and stderr clean in JSON mode
    let config = if cli.json {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);

    init_logging(cli.debug);

    if let Err(err) = app::run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(app::exit_code(&err));
    }
}
