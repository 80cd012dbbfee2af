//! # Keystone Chaincode Runtime
//!
//! Local host for the public-key contract.
//!
//! ## Startup Sequence
//!
//! 1. Load telemetry and authorization configuration from the environment
//! 2. Initialize logging and metrics
//! 3. Build the contract (fatal on a policy misconfiguration)
//! 4. Bootstrap the admin if `DEV_ADMIN_PUBLIC_KEY` is set
//! 5. Serve stdin lines until EOF or Ctrl+C

use anyhow::{Context, Result};
use chaincode_runtime::ChaincodeRuntime;
use kc_04_authorization::AuthConfig;
use kc_telemetry::{init_telemetry, TelemetryConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())?;

    let runtime = ChaincodeRuntime::start(AuthConfig::from_env()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Reading invocations from stdin. Press Ctrl+C to stop.");
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let mut output = runtime.handle_line_json(&line).await?;
        output.push('\n');
        stdout.write_all(output.as_bytes()).await?;
        stdout.flush().await?;
    }

    let stats = runtime.stats();
    info!(
        invocations = stats.invocations,
        successes = stats.successes,
        failures = stats.failures,
        avg_duration_us = stats.avg_duration_us,
        "Runtime stopped"
    );
    Ok(())
}
