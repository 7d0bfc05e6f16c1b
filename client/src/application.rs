// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

use crate::configuration::AppOptions;
use crate::docdb::DocDbConnector;
use crate::errors::AppError;
use crate::identity::{self, CallerIdentity};
use crate::models::{IamCredential, User};
use crate::tls::{self, TrustBundle};

pub struct Application {
    options: AppOptions,
    credential: IamCredential,
    bundle: TrustBundle,
}

impl Application {
    /// Loads the CA bundle. Fails before any network activity if it is unusable.
    ///
    /// The key material moves out of `options` into the zeroizing credential.
    pub fn build(mut options: AppOptions) -> Result<Self, AppError> {
        let bundle = TrustBundle::load(&options.ca_bundle)?;
        let credential = IamCredential::take_from(&mut options);
        Ok(Self {
            options,
            credential,
            bundle,
        })
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn credential(&self) -> &IamCredential {
        &self.credential
    }

    pub fn bundle(&self) -> &TrustBundle {
        &self.bundle
    }

    pub async fn run(self) -> Result<User, AppError> {
        if self.options.skip_identity {
            tracing::warn!("[identity] skipping caller identity");
        } else {
            let identity = print_caller_identity(self.options.region.as_deref()).await?;
            tracing::info!(
                "[identity] account: {:?}, user_id: {:?}, principal: {:?}",
                identity.account,
                identity.user_id,
                identity.principal()
            );
        }

        connect_with_iam_identity(&self.options, &self.credential, &self.bundle).await
    }
}

#[tracing::instrument]
pub async fn print_caller_identity(region: Option<&str>) -> Result<CallerIdentity, AppError> {
    let client = identity::load_sts_client(region).await?;
    let identity = identity::caller_identity(&client).await?;

    println!("== AWS caller identity");
    println!("ARN:  {}", identity.arn);

    Ok(identity)
}

#[tracing::instrument(skip(credential, bundle))]
pub async fn connect_with_iam_identity(
    options: &AppOptions,
    credential: &IamCredential,
    bundle: &TrustBundle,
) -> Result<User, AppError> {
    println!("== Connect {}", options.docdb_url);

    let connector = DocDbConnector::build(
        &options.docdb_url,
        credential,
        bundle,
        Duration::from_secs(options.server_selection_timeout_secs),
    )
    .await?;

    if options.tls_preflight {
        let (host, port) = connector.endpoint()?;
        tls::probe(bundle.client_config()?, &host, port).await?;
    }

    println!("Preparing...");
    let connection = connector.connect(&options.database).await?;
    println!("Connected.");

    let result = connection
        .find_first::<User>(&options.database, &options.collection)
        .await;
    connection.close().await;
    let user = result?;

    println!("Result:  {}", user);

    Ok(user)
}
