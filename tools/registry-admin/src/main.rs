//! registry-admin: Governance Registry admin CLI

use std::process::ExitCode;

use clap::Parser;
use registry_admin::{execute, AdminConfig, Cli};
use registry_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    let _guard = match init_telemetry(telemetry) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: telemetry disabled: {e}");
            None
        }
    };

    let config = AdminConfig::from_env().with_data_dir(cli.data_dir);

    match execute(cli.command, &config).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
