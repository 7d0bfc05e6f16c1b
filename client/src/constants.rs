// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

/// https://docs.aws.amazon.com/documentdb/latest/developerguide/connect_programmatically.html
/// the combined CA bundle for all regions
pub const DEFAULT_CA_BUNDLE: &str = "global-bundle.pem";
pub const DEFAULT_DATABASE: &str = "test";
pub const DEFAULT_COLLECTION: &str = "users";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: &str = "30";
pub const DEFAULT_PORT: u16 = 27017;

pub const MONGODB_SCHEME: &str = "mongodb://";
/// authentication source required by the MONGODB-AWS mechanism
pub const AWS_AUTH_SOURCE: &str = "$external";
pub const AWS_SESSION_TOKEN_PROPERTY: &str = "AWS_SESSION_TOKEN";
pub const APP_NAME: &str = "docdb-iam-client";

pub const TLS_PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(10);
