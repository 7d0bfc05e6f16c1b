// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Trust store for the DocumentDB TLS connection.
//!
//! The trust store holds exactly the certificates found in the CA bundle, and
//! the system roots are never consulted. Amazon publishes the bundle at
//! <https://truststore.pki.rds.amazonaws.com/global/global-bundle.pem>.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use sha2::{Digest, Sha256};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::constants;
use crate::errors::AppError;

/// Installs aws-lc-rs as the process-wide rustls provider.
///
/// Several crates in the dependency graph enable rustls, so the default
/// provider cannot be inferred from crate features.
pub fn install_default_provider() {
    // an Err only means a provider is already installed
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

pub struct TrustBundle {
    path: PathBuf,
    roots: RootCertStore,
    fingerprints: Vec<String>,
}

impl TrustBundle {
    /// Reads a PEM bundle and adds every certificate in it to a new trust store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|err| AppError::CaBundleError {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        Self::from_pem(path, &pem)
    }

    fn from_pem(path: &Path, pem: &[u8]) -> Result<Self, AppError> {
        let mut roots = RootCertStore::empty();
        let mut fingerprints = Vec::new();

        for cert in CertificateDer::pem_slice_iter(pem) {
            let cert = cert.map_err(|err| {
                AppError::TlsError(format!("invalid PEM in {}: {err:?}", path.display()))
            })?;
            let fingerprint = data_encoding::HEXLOWER.encode(&Sha256::digest(cert.as_ref()));
            roots.add(cert).map_err(|err| {
                AppError::TlsError(format!(
                    "certificate {fingerprint} in {} is not a valid trust anchor: {err}",
                    path.display()
                ))
            })?;
            fingerprints.push(fingerprint);
        }

        if roots.is_empty() {
            return Err(AppError::CaBundleError {
                path: path.display().to_string(),
                message: "no certificates found".to_string(),
            });
        }

        tracing::info!(
            "[tls] loaded {} trusted certificates from {}",
            roots.len(),
            path.display()
        );
        for fingerprint in &fingerprints {
            tracing::debug!("[tls] trusting sha256:{}", fingerprint);
        }

        Ok(Self {
            path: path.to_path_buf(),
            roots,
            fingerprints,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// SHA-256 of each certificate's DER encoding, lowercase hex, in file order.
    pub fn fingerprints(&self) -> &[String] {
        &self.fingerprints
    }

    /// A client configuration that trusts only this bundle.
    pub fn client_config(&self) -> Result<Arc<ClientConfig>, AppError> {
        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|err| AppError::TlsError(err.to_string()))?
            .with_root_certificates(self.roots.clone())
            .with_no_client_auth();

        Ok(Arc::new(config))
    }
}

/// Performs a bare TLS handshake with `host:port`, failing when the server
/// certificate does not chain to the bundle.
#[tracing::instrument(skip(config))]
pub async fn probe(config: Arc<ClientConfig>, host: &str, port: u16) -> Result<(), AppError> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|err| AppError::TlsError(format!("invalid server name {host}: {err}")))?;

    let handshake = async {
        let tcp = TcpStream::connect((host, port))
            .await
            .map_err(|err| AppError::ConnectError(format!("{host}:{port}: {err}")))?;
        TlsConnector::from(config)
            .connect(server_name, tcp)
            .await
            .map_err(|err| AppError::TlsError(format!("handshake with {host}:{port} failed: {err}")))
    };

    let stream = tokio::time::timeout(constants::TLS_PREFLIGHT_TIMEOUT, handshake)
        .await
        .map_err(|_| {
            AppError::ConnectError(format!(
                "{host}:{port}: no TLS handshake within {:?}",
                constants::TLS_PREFLIGHT_TIMEOUT
            ))
        })??;

    let (_, session) = stream.get_ref();
    tracing::info!(
        "[tls] handshake with {}:{} succeeded, {:?}",
        host,
        port,
        session.protocol_version()
    );

    Ok(())
}
