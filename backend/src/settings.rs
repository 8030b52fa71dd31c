//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `INVENTORY_*` environment variables, CLI flags, or a
//! config file. A handful of unprefixed variables (`DATABASE_URL`, `PORT`,
//! `CLOUDINARY_*`) are honoured as fallbacks so existing deployments keep
//! working. [`InventorySettings::resolve`] validates everything once at
//! startup and produces [`ResolvedSettings`].

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::ports::IngestMode;
use crate::domain::{ColumnProfile, HeaderMatching, RowMapper};
use crate::inbound::http::state::{DEFAULT_MAX_UPLOAD_BYTES, UploadLimits};
use crate::outbound::assets::{CloudinaryConfig, DEFAULT_UPLOAD_FOLDER};

/// Port used when neither `INVENTORY_PORT` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;
/// Origin allowed when none are configured.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
/// Pool size used when none is configured.
pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Raw configuration values.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct InventorySettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// Comma-separated list of browser origins allowed by CORS.
    pub allowed_origins: Option<String>,
    /// Cloudinary cloud name.
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary API key.
    pub cloudinary_api_key: Option<String>,
    /// Cloudinary API secret.
    pub cloudinary_api_secret: Option<String>,
    /// Cloudinary folder for illustrative images.
    pub cloudinary_folder: Option<String>,
    /// Zero-based row holding the column headers.
    pub header_row_offset: Option<usize>,
    /// `exact` or `case_insensitive`.
    pub header_matching: Option<String>,
    /// `stock_ledger` or `legacy_catalogue`.
    pub column_profile: Option<String>,
    /// `append` or `replace`.
    pub default_ingest_mode: Option<String>,
    /// Largest accepted multipart body, in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl std::fmt::Debug for InventorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventorySettings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_key", &self.cloudinary_api_key)
            .field(
                "cloudinary_api_secret",
                &self.cloudinary_api_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("cloudinary_folder", &self.cloudinary_folder)
            .field("header_row_offset", &self.header_row_offset)
            .field("header_matching", &self.header_matching)
            .field("column_profile", &self.column_profile)
            .field("default_ingest_mode", &self.default_ingest_mode)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("pool_max_size", &self.pool_max_size)
            .finish()
    }
}

/// Errors raised while validating settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required value is absent.
    #[error("missing required setting {name}")]
    Missing {
        /// Setting name.
        name: &'static str,
    },
    /// A value could not be parsed.
    #[error("invalid value {value:?} for {name}; expected {expected}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted form.
        expected: &'static str,
    },
}

/// Row mapping options for the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestionSettings {
    /// Zero-based header row.
    pub header_row_offset: usize,
    /// Header comparison mode.
    pub header_matching: HeaderMatching,
    /// Alias table.
    pub column_profile: ColumnProfile,
}

impl IngestionSettings {
    /// Row mapper configured with these options.
    #[must_use]
    pub fn row_mapper(&self) -> RowMapper {
        RowMapper::new(self.column_profile.aliases(), self.header_matching)
    }
}

/// Validated configuration ready for wiring.
pub struct ResolvedSettings {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Image host settings.
    pub cloudinary: CloudinaryConfig,
    /// Row mapping options.
    pub ingestion: IngestionSettings,
    /// Upload limits and default mode for the HTTP layer.
    pub upload_limits: UploadLimits,
    /// Maximum pooled database connections.
    pub pool_max_size: u32,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn parse_keyword<T: std::str::FromStr>(
    name: &'static str,
    value: Option<&str>,
    expected: &'static str,
) -> Result<Option<T>, SettingsError> {
    value
        .map(|raw| {
            raw.trim().parse().map_err(|_| SettingsError::Invalid {
                name,
                value: raw.to_owned(),
                expected,
            })
        })
        .transpose()
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or(DEFAULT_ALLOWED_ORIGIN)
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect();
    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_owned()]
    } else {
        origins
    }
}

impl InventorySettings {
    /// Database URL, falling back to `DATABASE_URL`.
    pub fn database_url<E: Env>(&self, env: &E) -> Option<String> {
        non_blank(self.database_url.clone()).or_else(|| non_blank(env.string("DATABASE_URL")))
    }

    /// Row mapping options.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] for unknown matching or profile
    /// keywords.
    pub fn ingestion(&self) -> Result<IngestionSettings, SettingsError> {
        let header_matching: Option<HeaderMatching> = parse_keyword(
            "header_matching",
            self.header_matching.as_deref(),
            "exact or case_insensitive",
        )?;
        let column_profile: Option<ColumnProfile> = parse_keyword(
            "column_profile",
            self.column_profile.as_deref(),
            "stock_ledger or legacy_catalogue",
        )?;
        Ok(IngestionSettings {
            header_row_offset: self.header_row_offset.unwrap_or_default(),
            header_matching: header_matching.unwrap_or_default(),
            column_profile: column_profile.unwrap_or_default(),
        })
    }

    /// Default ingest mode.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] for anything but `append` or
    /// `replace`.
    pub fn default_ingest_mode(&self) -> Result<IngestMode, SettingsError> {
        parse_keyword(
            "default_ingest_mode",
            self.default_ingest_mode.as_deref(),
            "append or replace",
        )
        .map(Option::unwrap_or_default)
    }

    /// Validate every value and apply fallbacks and defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] naming the first missing or malformed
    /// setting.
    pub fn resolve<E: Env>(&self, env: &E) -> Result<ResolvedSettings, SettingsError> {
        let database_url = self
            .database_url(env)
            .ok_or(SettingsError::Missing { name: "database_url" })?;

        let port = match self.port {
            Some(port) => port,
            None => parse_keyword("PORT", env.string("PORT").as_deref(), "a TCP port")?
                .unwrap_or(DEFAULT_PORT),
        };

        let cloudinary = self.cloudinary(env)?;
        let ingestion = self.ingestion()?;
        let default_ingest_mode = self.default_ingest_mode()?;

        let max_upload_bytes = self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(SettingsError::Invalid {
                name: "max_upload_bytes",
                value: max_upload_bytes.to_string(),
                expected: "a positive byte count",
            });
        }
        let pool_max_size = self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
        if pool_max_size == 0 {
            return Err(SettingsError::Invalid {
                name: "pool_max_size",
                value: pool_max_size.to_string(),
                expected: "at least one connection",
            });
        }

        Ok(ResolvedSettings {
            database_url,
            port,
            allowed_origins: parse_origins(self.allowed_origins.as_deref()),
            cloudinary,
            ingestion,
            upload_limits: UploadLimits {
                max_upload_bytes,
                default_ingest_mode,
            },
            pool_max_size,
        })
    }

    fn cloudinary<E: Env>(&self, env: &E) -> Result<CloudinaryConfig, SettingsError> {
        let pick = |own: &Option<String>, fallback: &'static str, name: &'static str| {
            non_blank(own.clone())
                .or_else(|| non_blank(env.string(fallback)))
                .ok_or(SettingsError::Missing { name })
        };
        let cloud_name = pick(
            &self.cloudinary_cloud_name,
            "CLOUDINARY_CLOUD_NAME",
            "cloudinary_cloud_name",
        )?;
        let api_key = pick(
            &self.cloudinary_api_key,
            "CLOUDINARY_API_KEY",
            "cloudinary_api_key",
        )?;
        let api_secret = Zeroizing::new(pick(
            &self.cloudinary_api_secret,
            "CLOUDINARY_API_SECRET",
            "cloudinary_api_secret",
        )?);
        let folder = non_blank(self.cloudinary_folder.clone())
            .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_owned());

        Ok(CloudinaryConfig::new(cloud_name, api_key, api_secret).with_folder(folder))
    }
}
