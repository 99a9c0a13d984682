use std::process::ExitCode;

use b2_upload::action::Runner;
use b2_upload::client::B2Client;
use b2_upload::config::Config;
use b2_upload::upload::upload_file;
use b2_upload::B2Error;
use tracing_subscriber::EnvFilter;

async fn run(runner: &Runner, config: &Config) -> Result<(), B2Error> {
    let client = B2Client::new();
    let uploaded = upload_file(&client, config).await?;
    runner.publish(&uploaded)
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries workflow commands, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("b2_upload=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::from_env();
    let config = Config::from_inputs(&runner);
    tracing::debug!(?config, "starting upload");

    match run(&runner, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "upload failed");
            runner.set_failed(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
