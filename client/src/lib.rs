// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # DocumentDB IAM Client
//!
//! Prints the caller's AWS identity, then reads one document from an Amazon
//! DocumentDB cluster using IAM (`MONGODB-AWS`) authentication over TLS.
//!
//! ## Flow
//!
//! ```text
//! env/flags -> AppOptions -> CA bundle -> STS GetCallerIdentity
//!                                      -> DocumentDB (direct, TLS) -> find_one
//! ```
//!
//! Every step returns [`errors::AppError`]. The binary logs the error and exits
//! with a non-zero status; nothing is retried.
//!
//! ## Modules
//!
//! - [`application`]: orchestration of the identity and connection steps
//! - [`configuration`]: CLI argument and environment parsing with clap
//! - [`constants`]: defaults and fixed protocol values
//! - [`docdb`]: driver options, connection, and the single read
//! - [`errors`]: application error taxonomy
//! - [`identity`]: STS client loading and caller identity
//! - [`models`]: IAM credential and the decoded user record
//! - [`tls`]: CA bundle trust store, rustls client config and handshake probe
//!
//! ## Usage
//!
//! ```bash
//! export AWS_ACCESS_KEY_ID=<access_id>
//! export AWS_SECRET_ACCESS_KEY=<secret_key>
//! export AWS_DEFAULT_REGION=us-west-2
//! export DOCDB_URL=<cluster-endpoint>:27017
//! docdb-iam-client
//! ```

pub mod application;
pub mod configuration;
pub mod constants;
pub mod docdb;
pub mod errors;
pub mod identity;
pub mod models;
pub mod tls;
