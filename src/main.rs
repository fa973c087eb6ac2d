use clap::Parser;
use wrok::cli::commands::Cli;
use wrok::cli::handlers::{self, Context};
use wrok::io::{config_io, logging, paths};

fn main() {
    let cli = Cli::parse();
    let data_dir = paths::data_dir();

    let config = match config_io::load_config(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let log_guard = logging::init_logging(&data_dir, &config.log.level);
    tracing::debug!(data_dir = %data_dir.display(), "starting");

    let ctx = Context { data_dir, config };
    let result = handlers::dispatch(cli, &ctx);
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    // flush the log writer before exit() skips destructors
    drop(log_guard);

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
