use clap::Parser;
use log::debug;

use tabula_engine::cli::parsers::{CliMode, CliParser};
use tabula_engine::cli::{run_client, run_demo};
use tabula_engine::config::EngineConfig;

fn main() {
    let cli = CliParser::parse();

    let config = match EngineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("err: {}", message);
            std::process::exit(1);
        }
    };

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();
    debug!("loaded configuration: {:?}", config);

    match cli.mode {
        Some(CliMode::Client) => run_client(config),
        Some(CliMode::Demo) => run_demo(config),
        None => println!("Pick a mode: 'client' or 'demo'."),
    }
}
