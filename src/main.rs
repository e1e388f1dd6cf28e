use anyhow::{Context, Result};
use clap::Parser;
use diaglog::cli::Cli;
use diaglog::config::Config;
use diaglog::logger::LoggerRegistry;

fn main() {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    let level = if cli.debug {
        tracing::Level::DEBUG // DEBUG level or higher when --debug
    } else {
        tracing::Level::WARN // WARN level or higher in normal operation
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Initialization failures are reported on stdout and end the run.
    // The exit status is left untouched.
    if let Err(err) = run(&cli) {
        println!("{:#}", err);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Parse config file
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to parse config file {}", cli.config.display()))?;

    // Discover logger categories for the selected config shape
    let categories = config
        .categories(cli.shape)
        .context("Failed to discover logger categories")?;

    // Initialize logger registry
    let registry =
        LoggerRegistry::bootstrap(&categories).context("Failed to initialize loggers")?;

    let log = registry
        .logger("diagnostic")
        .context("Failed to acquire diagnostic logger")?;

    log.info("Start.")?;

    // Application logic runs here once there is any.

    log.info("Finish.")?;
    Ok(())
}
