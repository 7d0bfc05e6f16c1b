// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::process::ExitCode;

use clap::Parser;
use docdb_iam_client::application::Application;
use docdb_iam_client::configuration::AppOptions;
use docdb_iam_client::tls;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        // stdout is reserved for the program output
        .with_writer(std::io::stderr)
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();

    // get configuration options from arguments and environment variables
    let options = AppOptions::parse();

    tracing::debug!("[main] {:?}", &options);

    tls::install_default_provider();

    let application = match Application::build(options) {
        Ok(application) => application,
        Err(err) => {
            tracing::error!("[main] {}", err);
            return ExitCode::FAILURE;
        }
    };

    match application.run().await {
        Ok(user) => {
            tracing::debug!("[main] finished, {:?}", user);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("[main] {}", err);
            ExitCode::FAILURE
        }
    }
}
