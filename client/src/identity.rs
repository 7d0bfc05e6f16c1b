// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_sts::error::DisplayErrorContext;

use crate::errors::AppError;

/// The principal behind the ARN returned by `GetCallerIdentity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    AssumedRole { role: String, session: String },
    User(String),
    Root,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub arn: String,
    pub account: Option<String>,
    pub user_id: Option<String>,
}

impl CallerIdentity {
    /// Classifies the ARN, `arn:partition:service:region:account:resource`.
    pub fn principal(&self) -> Principal {
        let fields: Vec<&str> = self.arn.splitn(6, ':').collect();
        let resource = match fields.as_slice() {
            ["arn", _, _, _, _, resource] => *resource,
            _ => return Principal::Other(self.arn.clone()),
        };

        let parts: Vec<&str> = resource.split('/').collect();
        match parts.as_slice() {
            ["assumed-role", role, session] => Principal::AssumedRole {
                role: role.to_string(),
                session: session.to_string(),
            },
            ["user", .., name] => Principal::User(name.to_string()),
            ["root"] => Principal::Root,
            _ => Principal::Other(resource.to_string()),
        }
    }
}

/// Loads the SDK configuration through the default provider chain.
pub async fn load_sts_client(region: Option<&str>) -> Result<aws_sdk_sts::Client, AppError> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let config = loader.load().await;

    sts_client_from(&config).await
}

/// Resolves credentials up front, so a missing credential is reported before any
/// call. The client signs with the resolved credentials and does not consult the
/// provider chain again.
pub async fn sts_client_from(config: &SdkConfig) -> Result<aws_sdk_sts::Client, AppError> {
    let provider = config
        .credentials_provider()
        .ok_or_else(|| AppError::CredentialsError("no credentials provider found".to_string()))?;
    let credentials = provider.provide_credentials().await?;

    tracing::debug!(
        "[identity] resolved credentials, expires_at: {:?}",
        credentials.expiry()
    );

    let sts_config = aws_sdk_sts::config::Builder::from(config)
        .credentials_provider(credentials)
        .build();

    Ok(aws_sdk_sts::Client::from_conf(sts_config))
}

pub async fn caller_identity(client: &aws_sdk_sts::Client) -> Result<CallerIdentity, AppError> {
    let output = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|err| AppError::IdentityError(DisplayErrorContext(&err).to_string()))?;

    let arn = output
        .arn()
        .filter(|arn| !arn.is_empty())
        .ok_or_else(|| AppError::IdentityError("response is missing the ARN".to_string()))?;

    Ok(CallerIdentity {
        arn: arn.to_string(),
        account: output.account().map(|s| s.to_string()),
        user_id: output.user_id().map(|s| s.to_string()),
    })
}
