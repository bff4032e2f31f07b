use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;

use crate::constants::{CERT_FILE_PREFIX, CERT_FILE_SUFFIX};
use crate::extract::CertificatePayload;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("certificate content is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Standard alphabet; padding optional, trailing bits tolerated.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes base64 the way upload clients produce it: line-wrapped or
/// space-separated, with or without padding, standard or URL-safe alphabet.
pub fn decode_container(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    LENIENT_BASE64.decode(cleaned)
}

/// `dir/cert-<password>.pfx`. The password is used as-is.
pub fn certificate_path(dir: &Path, password: &str) -> PathBuf {
    dir.join(format!("{CERT_FILE_PREFIX}{password}{CERT_FILE_SUFFIX}"))
}

/// Decodes the container and writes it, replacing any existing file.
pub fn save_certificate(payload: &CertificatePayload, dir: &Path) -> Result<PathBuf, PersistError> {
    let bytes = decode_container(&payload.file)?;
    let path = certificate_path(dir, &payload.password);
    std::fs::write(&path, &bytes).map_err(|source| PersistError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Certificate written");
    Ok(path)
}
