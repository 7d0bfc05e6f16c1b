// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;
use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};

use crate::constants;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppOptions {
    /// Used as the MONGODB-AWS username
    #[arg(long, env("AWS_ACCESS_KEY_ID"), hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub access_key_id: String,
    /// Used as the MONGODB-AWS password
    #[arg(long, env("AWS_SECRET_ACCESS_KEY"), hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub secret_access_key: String,
    #[arg(long, env("AWS_SESSION_TOKEN"), hide_env_values = true)]
    pub session_token: Option<String>,
    #[arg(long, env("AWS_DEFAULT_REGION"))]
    pub region: Option<String>,
    /// host:port of the DocumentDB instance or cluster endpoint
    #[arg(long, env("DOCDB_URL"), value_parser = NonEmptyStringValueParser::new())]
    pub docdb_url: String,
    #[arg(long, default_value = constants::DEFAULT_CA_BUNDLE, env("DOCDB_CA_BUNDLE"))]
    pub ca_bundle: PathBuf,
    #[arg(long, default_value = constants::DEFAULT_DATABASE, env("DOCDB_DATABASE"))]
    pub database: String,
    #[arg(long, default_value = constants::DEFAULT_COLLECTION, env("DOCDB_COLLECTION"))]
    pub collection: String,
    /// Seconds to wait for a suitable server
    #[arg(long = "server-selection-timeout", default_value = constants::DEFAULT_SERVER_SELECTION_TIMEOUT_SECS, env("DOCDB_SERVER_SELECTION_TIMEOUT"))]
    pub server_selection_timeout_secs: u64,
    #[arg(long, default_value = "false", env("SKIP_IDENTITY"), action = ArgAction::SetTrue)]
    pub skip_identity: bool,
    /// Handshake with the bundle-only trust store before the driver connects
    #[arg(long, default_value = "false", env("DOCDB_TLS_PREFLIGHT"), action = ArgAction::SetTrue)]
    pub tls_preflight: bool,
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for AppOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppOptions")
            .field("access_key_id", &"[REDACTED]")
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("region", &self.region)
            .field("docdb_url", &self.docdb_url)
            .field("ca_bundle", &self.ca_bundle)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .field("skip_identity", &self.skip_identity)
            .field("tls_preflight", &self.tls_preflight)
            .finish()
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        AppOptions {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
            region: None,
            docdb_url: format!("localhost:{}", constants::DEFAULT_PORT),
            ca_bundle: PathBuf::from(constants::DEFAULT_CA_BUNDLE),
            database: constants::DEFAULT_DATABASE.to_string(),
            collection: constants::DEFAULT_COLLECTION.to_string(),
            server_selection_timeout_secs: 30,
            skip_identity: false,
            tls_preflight: false,
        }
    }
}
