// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! DocumentDB connection using MONGODB-AWS authentication over TLS.

use std::time::Duration;

use mongodb::bson::{Document, doc, from_document};
use mongodb::options::{ClientOptions, ServerAddress, Tls, TlsOptions};
use mongodb::Client;
use serde::de::DeserializeOwned;

use crate::constants;
use crate::errors::AppError;
use crate::models::IamCredential;
use crate::tls::TrustBundle;

/// Prefixes `mongodb://` unless the address already carries the scheme.
pub fn connection_uri(docdb_url: &str) -> String {
    if docdb_url.starts_with(constants::MONGODB_SCHEME) {
        docdb_url.to_string()
    } else {
        format!("{}{}", constants::MONGODB_SCHEME, docdb_url)
    }
}

pub struct DocDbConnector {
    options: ClientOptions,
}

impl DocDbConnector {
    /// Builds direct, TLS-only client options. Nothing is sent over the network.
    pub async fn build(
        docdb_url: &str,
        credential: &IamCredential,
        bundle: &TrustBundle,
        server_selection_timeout: Duration,
    ) -> Result<Self, AppError> {
        let uri = connection_uri(docdb_url);
        let mut options = ClientOptions::parse(uri.as_str())
            .await
            .map_err(|err| AppError::ConfigError(format!("invalid DOCDB_URL {docdb_url}: {err}")))?;

        options.app_name = Some(constants::APP_NAME.to_string());
        options.direct_connection = Some(true);
        options.retry_writes = Some(false);
        options.server_selection_timeout = Some(server_selection_timeout);
        options.credential = Some(credential.to_mongo_credential());
        options.tls = Some(Tls::Enabled(
            TlsOptions::builder()
                .ca_file_path(bundle.path().to_path_buf())
                .build(),
        ));

        Ok(Self { options })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The first configured host and its port.
    pub fn endpoint(&self) -> Result<(String, u16), AppError> {
        let address = self
            .options
            .hosts
            .first()
            .ok_or_else(|| AppError::ConfigError("no host in DOCDB_URL".to_string()))?;

        let (host, port) = match address {
            ServerAddress::Tcp { host, port } => (host.clone(), *port),
            other => (other.to_string(), None),
        };

        Ok((host, port.unwrap_or(constants::DEFAULT_PORT)))
    }

    /// Creates the client and checks that the server accepts the credential.
    #[tracing::instrument(skip(self))]
    pub async fn connect(&self, database: &str) -> Result<Connection, AppError> {
        let client = Client::with_options(self.options.clone())
            .map_err(|err| AppError::ConnectError(err.to_string()))?;

        if let Err(err) = client.database(database).run_command(doc! { "ping": 1 }).await {
            client.shutdown().await;
            return Err(AppError::ConnectError(err.to_string()));
        }

        tracing::debug!("[docdb] ping succeeded");

        Ok(Connection { client })
    }
}

/// An open connection. Release it with [`Connection::close`].
pub struct Connection {
    client: Client,
}

impl Connection {
    /// Reads the first document of `database.collection` with an empty filter.
    #[tracing::instrument(skip(self))]
    pub async fn find_first<T: DeserializeOwned>(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<T, AppError> {
        let document = self
            .client
            .database(database)
            .collection::<Document>(collection)
            .find_one(doc! {})
            .await
            .map_err(|err| AppError::QueryError(err.to_string()))?
            .ok_or_else(|| AppError::NoDocument(format!("{database}.{collection}")))?;

        tracing::debug!("[docdb] read document with {} fields", document.len());

        Ok(from_document(document)?)
    }

    pub async fn close(self) {
        self.client.shutdown().await;
        tracing::debug!("[docdb] connection closed");
    }
}
