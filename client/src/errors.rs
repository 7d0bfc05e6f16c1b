// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_credential_types::provider::error::CredentialsError;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("unable to resolve AWS credentials: {0}")]
    CredentialsError(String),
    #[error("caller identity request failed: {0}")]
    IdentityError(String),
    #[error("unable to read CA bundle {path}: {message}")]
    CaBundleError { path: String, message: String },
    #[error("TLS error: {0}")]
    TlsError(String),
    #[error("connection error: {0}")]
    ConnectError(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("no document found in {0}")]
    NoDocument(String),
    #[error("unable to decode document: {0}")]
    DecodeError(String),
}

impl From<CredentialsError> for AppError {
    fn from(source: CredentialsError) -> Self {
        tracing::debug!("{:?}", source);
        AppError::CredentialsError(
            aws_sdk_sts::error::DisplayErrorContext(&source).to_string(),
        )
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(source: mongodb::bson::de::Error) -> Self {
        AppError::DecodeError(source.to_string())
    }
}
