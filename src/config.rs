// src/config.rs

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_ROSTER_PATH: &str = "linkedinData.csv";
const DEFAULT_TARGET_SCHOOL: &str = "University of Maryland";

/// Runtime configuration, collected once at startup from the environment
/// (a `.env` file is honored when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Session credentials for the profile API.
    pub linkedin_username: String,
    pub linkedin_password: String,
    /// API key for the web-search service.
    pub serpapi_key: String,
    /// CSV roster to enrich in place.
    pub roster_path: PathBuf,
    /// School filter used for both lookup and eligibility.
    pub target_school: String,
}

impl Config {
    /// Read configuration from the environment. Missing credentials are
    /// fatal; the roster path and school filter have defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let linkedin_username =
            env::var("LINKEDIN_USERNAME").context("LINKEDIN_USERNAME is not set")?;
        let linkedin_password =
            env::var("LINKEDIN_PASSWORD").context("LINKEDIN_PASSWORD is not set")?;
        let serpapi_key = env::var("SERPAPI_KEY").context("SERPAPI_KEY is not set")?;

        let roster_path = env::var("ROSTER_PATH")
            .unwrap_or_else(|_| DEFAULT_ROSTER_PATH.to_string())
            .into();
        let target_school =
            env::var("TARGET_SCHOOL").unwrap_or_else(|_| DEFAULT_TARGET_SCHOOL.to_string());

        Ok(Self {
            linkedin_username,
            linkedin_password,
            serpapi_key,
            roster_path,
            target_school,
        })
    }
}
