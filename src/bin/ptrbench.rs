use clap::Parser;
use ptrbench::config::{BenchConfig, Cli};
use ptrbench::timer::install_panic_hook;
use ptrbench::{BenchError, run};
use tracing::error;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "ptrbench=debug" } else { "ptrbench=info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    install_panic_hook();

    match run(&BenchConfig::from(&cli)) {
        // nothing was benchmarked; report the cause and stop
        Err(BenchError::Load(err)) => {
            error!("{err}");
            eprintln!("{err:#?}");
            Ok(())
        }
        other => other.map_err(Into::into),
    }
}
