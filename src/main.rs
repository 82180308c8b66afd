// src/main.rs

use rept::config::{PACKAGE, RunConfig};
use rept::{cli, logging, run};

fn main() {
    let args = cli::parse();
    let config = match RunConfig::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{PACKAGE}: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_main(&config) {
        eprintln!("{}: {err}", config.name);
        std::process::exit(1);
    }
}

fn run_main(config: &RunConfig) -> anyhow::Result<()> {
    logging::init_logging()?;
    run(config)?;
    Ok(())
}
