// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Handshake tests for the bundle-only trust store.
//!
//! Each test starts a local rustls server presenting one of the fixture
//! certificates and probes it with a client configuration built from a bundle.
//! The last test points the database driver at the same server.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use docdb_iam_client::docdb::DocDbConnector;
use docdb_iam_client::errors::AppError;
use docdb_iam_client::models::IamCredential;
use docdb_iam_client::tls::{self, TrustBundle};
use rustls::ServerConfig;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Starts a TLS server on an ephemeral port and returns the port.
async fn spawn_server(cert: &str, key: &str) -> u16 {
    let certs = CertificateDer::pem_file_iter(fixture(cert))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key = PrivateKeyDer::from_pem_file(fixture(key)).unwrap();

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut stream) = acceptor.accept(stream).await {
                    let _ = stream.shutdown().await;
                }
            });
        }
    });

    port
}

#[tokio::test]
async fn test_probe_succeeds_for_server_signed_by_bundle_ca() {
    let port = spawn_server("server.pem", "server.key").await;
    let bundle = TrustBundle::load(fixture("bundle.pem")).unwrap();

    let result = tls::probe(bundle.client_config().unwrap(), "localhost", port).await;
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_probe_fails_for_server_outside_bundle() {
    let port = spawn_server("rogue-server.pem", "rogue-server.key").await;
    let bundle = TrustBundle::load(fixture("bundle.pem")).unwrap();

    let result = tls::probe(bundle.client_config().unwrap(), "localhost", port).await;
    assert!(
        matches!(result, Err(AppError::TlsError(_))),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_bundle_does_not_fall_back_to_other_roots() {
    // the trusted server is rejected once its CA is not in the bundle
    let port = spawn_server("server.pem", "server.key").await;
    let bundle = TrustBundle::load(fixture("rogue-ca.pem")).unwrap();

    let result = tls::probe(bundle.client_config().unwrap(), "localhost", port).await;
    assert!(
        matches!(result, Err(AppError::TlsError(_))),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_probe_reports_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let bundle = TrustBundle::load(fixture("bundle.pem")).unwrap();
    let result = tls::probe(bundle.client_config().unwrap(), "127.0.0.1", port).await;
    assert!(
        matches!(result, Err(AppError::ConnectError(_))),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_driver_rejects_server_outside_bundle() {
    tls::install_default_provider();
    let port = spawn_server("rogue-server.pem", "rogue-server.key").await;
    let bundle = TrustBundle::load(fixture("bundle.pem")).unwrap();
    let credential = IamCredential::new("AKIDEXAMPLE", "secret", None);

    let connector = DocDbConnector::build(
        &format!("127.0.0.1:{port}"),
        &credential,
        &bundle,
        Duration::from_secs(2),
    )
    .await
    .unwrap();

    match connector.connect("test").await {
        Err(AppError::ConnectError(message)) => assert!(
            message.to_lowercase().contains("certificate"),
            "unexpected message: {message}"
        ),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("connected to a server outside the bundle"),
    }
}
