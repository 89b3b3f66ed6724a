use dioxus::prelude::*;
use serde::Deserialize;

const DEFAULT_REPOS_API_URL: &str = "https://api.github.com/users/pennyw1ze/repos";
const DEFAULT_CV_PATH: &str = "file/CV.pdf";
const DEFAULT_CV_FILENAME: &str = "Leonardo_Rufini_CV.pdf";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub repos_api_url: String,
    pub cv_path: String,
    pub cv_filename: String,
    pub documents: Vec<DocumentLink>,
}

/// Extra downloadable file listed next to the CV button.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DocumentLink {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            repos_api_url: DEFAULT_REPOS_API_URL.to_string(),
            cv_path: DEFAULT_CV_PATH.to_string(),
            cv_filename: DEFAULT_CV_FILENAME.to_string(),
            documents: Vec::new(),
        }
    }
}

pub fn use_runtime_config() -> Resource<RuntimeConfig> {
    use_resource(|| async move {
        match fetch_runtime_config().await {
            Ok(config) => config,
            Err(message) => {
                tracing::warn!("{message}; using built-in config");
                RuntimeConfig::default()
            }
        }
    })
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    match fetch_config_from("/config.json").await {
        Ok(config) => Ok(config),
        Err(_) => fetch_config_from("/assets/config.json").await,
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_config_from(path: &str) -> Result<RuntimeConfig, String> {
    let response = gloo_net::http::Request::get(path)
        .send()
        .await
        .map_err(|err| format!("config fetch failed: {err}"))?;
    if !response.ok() {
        return Err(format!("config fetch failed: status {}", response.status()));
    }
    response
        .json::<RuntimeConfig>()
        .await
        .map_err(|err| format!("config decode failed: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    let defaults = RuntimeConfig::default();
    let repos_api_url =
        std::env::var("PORTFOLIO_REPOS_API_URL").unwrap_or(defaults.repos_api_url);
    let cv_path = std::env::var("PORTFOLIO_CV_PATH").unwrap_or(defaults.cv_path);
    let cv_filename = std::env::var("PORTFOLIO_CV_FILENAME").unwrap_or(defaults.cv_filename);
    Ok(RuntimeConfig {
        repos_api_url,
        cv_path,
        cv_filename,
        documents: defaults.documents,
    })
}
