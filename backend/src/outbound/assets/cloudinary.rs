//! Reqwest-backed Cloudinary upload adapter.
//!
//! Uploads are signed: the form parameters other than `file`, `api_key` and
//! `signature` are sorted by name, joined as `k=v&k=v`, suffixed with the API
//! secret and hashed with SHA-1. Images larger than 800x800 are scaled down
//! by the host on ingest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use url::Url;
use zeroize::Zeroizing;

use crate::domain::ImageUpload;
use crate::domain::ports::{AssetStore, AssetStoreError};

/// Folder used when none is configured.
pub const DEFAULT_UPLOAD_FOLDER: &str = "ilustrativas";
const API_BASE: &str = "https://api.cloudinary.com/v1_1/";
const ALLOWED_FORMATS: &str = "jpg,jpeg,png,webp";
const TRANSFORMATION: &str = "c_limit,h_800,w_800";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Account and upload settings.
pub struct CloudinaryConfig {
    /// Account cloud name; forms part of the upload URL.
    pub cloud_name: String,
    /// Public API key.
    pub api_key: String,
    /// API secret used for signing. Wiped from memory on drop.
    pub api_secret: Zeroizing<String>,
    /// Destination folder for uploaded images.
    pub folder: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CloudinaryConfig {
    /// Settings with the default folder and timeout.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: Zeroizing<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret,
            folder: DEFAULT_UPLOAD_FOLDER.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the destination folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }
}

/// Errors raised while building a [`CloudinaryAssetStore`].
#[derive(Debug, thiserror::Error)]
pub enum CloudinaryConfigError {
    /// The cloud name does not form a valid upload URL.
    #[error("invalid cloud name {cloud_name:?}")]
    CloudName {
        /// Rejected cloud name.
        cloud_name: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Cloudinary implementation of [`AssetStore`].
pub struct CloudinaryAssetStore {
    client: Client,
    endpoint: Url,
    api_key: String,
    api_secret: Zeroizing<String>,
    folder: String,
    clock: Arc<dyn Clock>,
}

impl CloudinaryAssetStore {
    /// Build an adapter for `config`, timestamping signatures with `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`CloudinaryConfigError`] when the cloud name is unusable or
    /// the HTTP client cannot be built.
    pub fn new(
        config: CloudinaryConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CloudinaryConfigError> {
        let endpoint = upload_endpoint(&config.cloud_name)?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            api_secret: config.api_secret,
            folder: config.folder,
            clock,
        })
    }

    fn signed_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("allowed_formats", ALLOWED_FORMATS.to_owned()),
            ("folder", self.folder.clone()),
            ("timestamp", self.clock.utc().timestamp().to_string()),
            ("transformation", TRANSFORMATION.to_owned()),
        ];
        let signature = sign(&mut params, &self.api_secret);
        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        params
    }
}

fn upload_endpoint(cloud_name: &str) -> Result<Url, CloudinaryConfigError> {
    let invalid = || CloudinaryConfigError::CloudName {
        cloud_name: cloud_name.to_owned(),
    };
    let name = cloud_name.trim();
    if name.is_empty() || name.contains('/') {
        return Err(invalid());
    }
    Url::parse(API_BASE)
        .and_then(|base| base.join(&format!("{name}/image/upload")))
        .map_err(|_| invalid())
}

/// Sort `params` by name and return the hex SHA-1 of the query string plus
/// `secret`.
fn sign(params: &mut [(&'static str, String)], secret: &str) -> String {
    params.sort_by_key(|(name, _)| *name);
    let joined = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
struct ErrorBodyDto {
    message: String,
}

fn parse_secure_url(body: &[u8]) -> Result<Url, AssetStoreError> {
    let decoded: UploadResponseDto = serde_json::from_slice(body).map_err(|err| {
        AssetStoreError::invalid_response(format!("invalid upload payload: {err}"))
    })?;
    let raw = decoded
        .secure_url
        .ok_or_else(|| AssetStoreError::invalid_response("upload payload has no secure_url"))?;
    let url = Url::parse(&raw)
        .map_err(|err| AssetStoreError::invalid_response(format!("invalid secure_url: {err}")))?;
    if url.scheme() != "https" {
        return Err(AssetStoreError::invalid_response("secure_url is not https"));
    }
    Ok(url)
}

fn map_transport_error(error: &reqwest::Error) -> AssetStoreError {
    AssetStoreError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AssetStoreError {
    let detail = serde_json::from_slice::<ErrorResponseDto>(body)
        .map(|dto| dto.error.message)
        .unwrap_or_default();
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        AssetStoreError::unavailable(message)
    } else {
        AssetStoreError::rejected(message)
    }
}

fn file_part(asset: &ImageUpload) -> Result<Part, AssetStoreError> {
    let part = Part::bytes(asset.bytes.clone()).file_name(asset.file_name.clone());
    match asset.content_type.as_deref() {
        Some(content_type) => part.mime_str(content_type).map_err(|err| {
            AssetStoreError::rejected(format!("invalid content type {content_type}: {err}"))
        }),
        None => Ok(part),
    }
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn upload(&self, asset: &ImageUpload) -> Result<Url, AssetStoreError> {
        let form = self
            .signed_params()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("file", file_part(asset)?);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(&err))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_secure_url(body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn store() -> CloudinaryAssetStore {
        let clock = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp");
        CloudinaryAssetStore::new(
            CloudinaryConfig::new("demo", "123456", Zeroizing::new("s3cr3t".to_owned()))
                .with_folder("repuestos"),
            Arc::new(FixedClock(clock)),
        )
        .expect("store builds")
    }

    #[rstest]
    fn signature_covers_sorted_params_and_secret() {
        let mut params = vec![
            ("timestamp", "1700000000".to_owned()),
            ("folder", "repuestos".to_owned()),
        ];

        let signature = sign(&mut params, "s3cr3t");

        let mut hasher = Sha1::new();
        hasher.update(b"folder=repuestos&timestamp=1700000000s3cr3t");
        assert_eq!(signature, hex::encode(hasher.finalize()));
        assert_eq!(params.first().map(|(name, _)| *name), Some("folder"));
    }

    #[rstest]
    fn signed_params_carry_upload_policy() {
        let params = store().signed_params();
        let value = |key: &str| {
            params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.as_str())
        };

        assert_eq!(value("allowed_formats"), Some(ALLOWED_FORMATS));
        assert_eq!(value("transformation"), Some("c_limit,h_800,w_800"));
        assert_eq!(value("folder"), Some("repuestos"));
        assert_eq!(value("timestamp"), Some("1700000000"));
        assert_eq!(value("api_key"), Some("123456"));
        assert_eq!(value("signature").map(str::len), Some(40));
    }

    #[rstest]
    fn endpoint_embeds_the_cloud_name() {
        assert_eq!(
            store().endpoint.as_str(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    fn unusable_cloud_names_are_rejected(#[case] cloud_name: &str) {
        assert!(matches!(
            upload_endpoint(cloud_name),
            Err(CloudinaryConfigError::CloudName { .. })
        ));
    }

    #[rstest]
    fn parses_secure_url() {
        let url = parse_secure_url(
            br#"{"public_id":"repuestos/a","secure_url":"https://res.cloudinary.com/demo/a.png"}"#,
        )
        .expect("valid payload");

        assert_eq!(url.as_str(), "https://res.cloudinary.com/demo/a.png");
    }

    #[rstest]
    #[case(br#"not json"#.as_slice())]
    #[case(br#"{"url":"http://res.cloudinary.com/demo/a.png"}"#.as_slice())]
    #[case(br#"{"secure_url":"http://res.cloudinary.com/demo/a.png"}"#.as_slice())]
    fn malformed_payloads_are_invalid_responses(#[case] body: &[u8]) {
        assert!(matches!(
            parse_secure_url(body),
            Err(AssetStoreError::InvalidResponse { .. })
        ));
    }

    #[rstest]
    #[case(StatusCode::BAD_GATEWAY, true)]
    #[case(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case(StatusCode::UNAUTHORIZED, false)]
    #[case(StatusCode::BAD_REQUEST, false)]
    fn statuses_split_unavailable_from_rejected(
        #[case] status: StatusCode,
        #[case] unavailable: bool,
    ) {
        let err = map_status_error(status, br#"{"error":{"message":"Invalid Signature"}}"#);

        assert_eq!(matches!(err, AssetStoreError::Unavailable { .. }), unavailable);
        assert!(err.to_string().contains("Invalid Signature"));
    }
}
