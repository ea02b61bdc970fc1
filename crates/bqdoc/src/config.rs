//! Environment-based configuration: project resolution and credential checks.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{BqdocError, Result};

/// Environment variable naming the Google Cloud project.
pub const PROJECT_ENV: &str = "PROJECT_ID";

/// Project used when neither a parameter nor the environment names one.
pub const DEFAULT_PROJECT: &str = "ateams";

/// Environment variable pointing at a service-account credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable carrying the OAuth bearer token used for API calls.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Well-known gcloud application-default-credentials file, relative to `$HOME`.
const ADC_RELATIVE_PATH: &str = ".config/gcloud/application_default_credentials.json";

/// Resolves the project ID from an explicit parameter, then the
/// environment, then [`DEFAULT_PROJECT`].
pub fn resolve_project(explicit: Option<&str>) -> String {
    resolve_project_from(explicit, env::var(PROJECT_ENV).ok().as_deref())
}

fn resolve_project_from(explicit: Option<&str>, from_env: Option<&str>) -> String {
    explicit
        .filter(|p| !p.trim().is_empty())
        .or(from_env.filter(|p| !p.trim().is_empty()))
        .unwrap_or(DEFAULT_PROJECT)
        .to_string()
}

/// Returns the OAuth bearer token for BigQuery API calls.
///
/// Token acquisition is delegated to the environment; this only reads
/// what `gcloud auth print-access-token` or similar has exported.
pub fn access_token() -> Result<String> {
    env::var(ACCESS_TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| {
            BqdocError::Credentials(format!("{ACCESS_TOKEN_ENV} environment variable not set"))
        })
}

/// Checks that some form of Google Cloud credentials is available before
/// any API call is made.
///
/// Accepts, in order: an OAuth token in the environment, a credentials
/// file named by [`CREDENTIALS_ENV`] (set-but-missing is an error), or
/// the well-known application-default-credentials file under `$HOME`.
/// Returns a human-readable description of what was found.
pub fn check_credentials() -> Result<String> {
    verify_credentials(
        env::var(ACCESS_TOKEN_ENV).ok(),
        env::var(CREDENTIALS_ENV).ok(),
        adc_path(),
    )
}

fn verify_credentials(
    token: Option<String>,
    credentials_file: Option<String>,
    adc_file: Option<PathBuf>,
) -> Result<String> {
    if token.as_deref().is_some_and(|t| !t.trim().is_empty()) {
        return Ok(format!("Using OAuth access token from {ACCESS_TOKEN_ENV}"));
    }

    if let Some(path) = credentials_file.filter(|p| !p.trim().is_empty()) {
        return if Path::new(&path).exists() {
            Ok(format!("Using credentials file at {path}"))
        } else {
            Err(BqdocError::Credentials(format!(
                "Credentials file not found at: {path}"
            )))
        };
    }

    if let Some(path) = adc_file {
        if path.exists() {
            return Ok(format!(
                "Using application default credentials at {}",
                path.display()
            ));
        }
    }

    Err(BqdocError::Credentials(format!(
        "{CREDENTIALS_ENV} environment variable not set and no application default credentials found"
    )))
}

fn adc_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(ADC_RELATIVE_PATH))
}
