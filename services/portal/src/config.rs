use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use admissions_core::config::Config;
use admissions_domain::phone::{DEFAULT_COUNTRY_CODE, PhonePlan};
use arkesel::{ArkeselOptions, DEFAULT_BASE_URL};

use crate::domain::types::OtpAuthority;

/// Portal service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on. Env var: `PORTAL_PORT`.
    #[serde(default = "default_port")]
    pub portal_port: u16,
    pub arkesel_api_key: String,
    #[serde(default = "default_sender_id")]
    pub arkesel_sender_id: String,
    #[serde(default = "default_arkesel_base_url")]
    pub arkesel_base_url: String,
    #[serde(default = "default_arkesel_timeout_secs")]
    pub arkesel_timeout_secs: u64,
    /// `local` or `provider`.
    #[serde(default)]
    pub otp_authority: OtpAuthority,
    /// Root directory for uploaded documents.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_country_code")]
    pub country_calling_code: String,
    /// Request body cap; per-type file limits are enforced separately.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Config for PortalConfig {}

fn default_port() -> u16 {
    3000
}

fn default_sender_id() -> String {
    "VisionTech".to_owned()
}

fn default_arkesel_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_arkesel_timeout_secs() -> u64 {
    10
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_owned()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl PortalConfig {
    pub fn arkesel_options(&self) -> ArkeselOptions {
        ArkeselOptions {
            api_key: self.arkesel_api_key.clone(),
            sender_id: self.arkesel_sender_id.clone(),
            base_url: self.arkesel_base_url.clone(),
            timeout: Duration::from_secs(self.arkesel_timeout_secs),
        }
    }

    pub fn phone_plan(&self) -> PhonePlan {
        PhonePlan::new(self.country_calling_code.trim_start_matches('+'))
    }
}
