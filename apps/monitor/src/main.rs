use std::io::{self, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use uppe_monitor::{MonitorError, MonitorSettings, MonitoringScheduler, load_endpoints};

/// Uppe - periodic HTTP endpoint availability monitor
#[derive(Parser, Debug)]
#[command(name = "uppe-monitor", version, about, long_about = None)]
struct Cli {
    /// YAML file listing the endpoints to probe
    config_file_path: PathBuf,

    /// Number of monitoring cycles to run (greater than 0)
    #[arg(value_parser = parse_check_cycles)]
    check_cycles: NonZeroU32,
}

fn parse_check_cycles(value: &str) -> Result<NonZeroU32, String> {
    value.trim().parse::<NonZeroU32>().map_err(|_| {
        format!(
            "{value} is not a valid number for <check_cycles>. Please ensure <check_cycles> is \
             greater than 0"
        )
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let shutdown = async {
        // Without a signal handler the monitor simply runs to completion
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    execute(&cli, shutdown, io::stdout(), io::stderr()).await
}

/// Run the monitor for validated arguments until it finishes or `shutdown` resolves
///
/// Report lines and the stop message go to `out`, failures to `err`.
async fn execute<W: Write, E: Write>(
    cli: &Cli,
    shutdown: impl Future<Output = ()>,
    mut out: W,
    mut err: E,
) -> ExitCode {
    if !cli.config_file_path.is_file() {
        let _ = writeln!(
            err,
            "Error: File {} does not exist or is not accessible.",
            cli.config_file_path.display()
        );
        return ExitCode::FAILURE;
    }

    // Dropping the monitor future on shutdown cancels any in-flight probe or pause
    let finished = tokio::select! {
        biased;
        () = shutdown => None,
        result = monitor(cli, &mut out) => Some(result),
    };

    match finished {
        Some(Ok(())) => ExitCode::SUCCESS,
        Some(Err(e)) => {
            let _ = writeln!(err, "Error: {e}");
            ExitCode::FAILURE
        }
        None => {
            let _ = writeln!(out, "\nMonitoring stopped by user.");
            ExitCode::SUCCESS
        }
    }
}

async fn monitor<W: Write>(cli: &Cli, out: W) -> Result<(), MonitorError> {
    let endpoints = load_endpoints(&cli.config_file_path)?;
    tracing::info!(
        path = %cli.config_file_path.display(),
        endpoints = endpoints.len(),
        "Loaded endpoint configuration"
    );

    let settings = MonitorSettings::from_env();
    tracing::debug!("{settings}");

    let mut scheduler = MonitoringScheduler::new(&settings, out)?;
    scheduler.run(&endpoints, cli.check_cycles).await
}
