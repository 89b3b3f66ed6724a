use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use crate::config::RuntimeConfig;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0} unavailable")]
    Unavailable(&'static str),
    #[error("anchor creation failed")]
    Anchor,
}

/// Name the browser saves the file under.
pub fn download_name(path: &str, filename: Option<&str>) -> String {
    match filename.filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => path
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(path)
            .to_string(),
    }
}

pub fn download_cv(config: &RuntimeConfig) -> Result<(), DownloadError> {
    download_file(&config.cv_path, Some(&config.cv_filename))
}

pub fn download_file(path: &str, filename: Option<&str>) -> Result<(), DownloadError> {
    let name = download_name(path, filename);
    tracing::debug!("downloads: {path} as {name}");
    trigger_download(path, &name)
}

#[cfg(target_arch = "wasm32")]
fn trigger_download(href: &str, name: &str) -> Result<(), DownloadError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(DownloadError::Unavailable("document"))?;
    let anchor = document
        .create_element("a")
        .map_err(|_| DownloadError::Anchor)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| DownloadError::Anchor)?;
    anchor.set_href(href);
    anchor.set_download(name);
    anchor.click();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn trigger_download(_href: &str, _name: &str) -> Result<(), DownloadError> {
    Err(DownloadError::Unavailable("browser"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_name_wins() {
        assert_eq!(
            download_name("file/CV.pdf", Some("Leonardo_Rufini_CV.pdf")),
            "Leonardo_Rufini_CV.pdf"
        );
    }

    #[test]
    fn falls_back_to_last_segment() {
        assert_eq!(download_name("file/thesis/final.pdf", None), "final.pdf");
        assert_eq!(download_name("notes.txt", Some("")), "notes.txt");
    }

    #[test]
    fn trailing_slash_keeps_whole_path() {
        assert_eq!(download_name("file/", None), "file/");
    }

    #[test]
    fn native_build_reports_missing_browser() {
        let err = download_cv(&RuntimeConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "browser unavailable");
    }
}
