use std::time::Duration;

use graft_core::{MatcherMode, RuleDraft};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest url: {0}")]
    InvalidUrl(String),
    #[error("manifest not found: http status {0}")]
    HttpStatus(u16),
    #[error("manifest is not valid JSON: {0}")]
    Parse(String),
    #[error("script not found: {url} (http status {status})")]
    ScriptStatus { url: String, status: u16 },
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Hosted manifest describing one importable rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    matcher_mode: Option<String>,
    #[serde(default)]
    matches: Option<String>,
    #[serde(default)]
    js: Option<String>,
    #[serde(default)]
    delay_seconds: Option<f64>,
    #[serde(default)]
    injection_condition: Option<String>,
}

/// Fetch settings for manifest and script downloads.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Fetches hosted rule manifests and script text for the editor collaborator.
#[derive(Debug, Clone)]
pub struct ManifestImporter {
    settings: ImportSettings,
}

impl ManifestImporter {
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ManifestError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ManifestError::Network(err.to_string()))
    }

    /// Fetch a manifest and resolve it into an editable rule draft.
    ///
    /// `matches` defaults to `*`; the mode is regex only when the manifest
    /// says exactly `"regex"`; a relative `js` path resolves against the
    /// manifest URL base and the fetched script text becomes the draft's
    /// content.
    pub async fn fetch_rule_draft(&self, manifest_url: &str) -> Result<RuleDraft, ManifestError> {
        let manifest_url = manifest_url.trim();
        if manifest_url.is_empty() {
            return Err(ManifestError::InvalidUrl("empty url".to_string()));
        }

        let client = self.build_client()?;
        let response = client
            .get(manifest_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::HttpStatus(status.as_u16()));
        }

        let manifest: RuleManifest = response
            .json()
            .await
            .map_err(|err| ManifestError::Parse(err.to_string()))?;

        let script_content = match manifest.js.as_deref().filter(|js| !js.is_empty()) {
            Some(js) => {
                let script_url = resolve_script_url(manifest_url, js);
                self.fetch_script_text(&script_url).await?
            }
            None => String::new(),
        };

        Ok(RuleDraft {
            name: manifest
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unnamed".to_string()),
            matcher_mode: match manifest.matcher_mode.as_deref() {
                Some("regex") => MatcherMode::Regex,
                _ => MatcherMode::Wildcard,
            },
            matcher: manifest.matches.unwrap_or_else(|| "*".to_string()),
            script_content,
            delay_seconds: manifest.delay_seconds,
            injection_condition: manifest.injection_condition,
        })
    }

    /// Fetch script text from a URL, as used by the editor's
    /// load-script-from-URL affordance.
    pub async fn fetch_script_text(&self, url: &str) -> Result<String, ManifestError> {
        let client = self.build_client()?;
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::ScriptStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(map_reqwest_error)
    }
}

/// A `js` entry is either absolute or relative to the manifest's directory.
fn resolve_script_url(manifest_url: &str, js: &str) -> String {
    if js.starts_with("http") {
        return js.to_string();
    }
    match manifest_url.rfind('/') {
        Some(idx) => format!("{}/{js}", &manifest_url[..idx]),
        None => js.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ManifestError {
    if err.is_timeout() {
        return ManifestError::Timeout(err.to_string());
    }
    ManifestError::Network(err.to_string())
}
