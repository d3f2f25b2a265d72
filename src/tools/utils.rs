use crate::error::{FleroviumError, Result};
use url::Url;

/// Schemes passed through untouched
const KNOWN_SCHEMES: &[&str] = &["http", "https", "file", "data", "about", "chrome", "chrome-extension"];

/// Turn user input into an absolute URL.
///
/// Relative paths are joined onto `current`, bare hosts get a scheme and a
/// single word is treated as a `.com` domain.
pub fn resolve_url(raw: &str, current: Option<&str>) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FleroviumError::InvalidArgument("URL is empty".to_string()));
    }

    if let Some((scheme, _)) = trimmed.split_once(':') {
        if KNOWN_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            return Ok(trimmed.to_string());
        }
    }

    if trimmed.starts_with('/') || trimmed.starts_with("./") || trimmed.starts_with("../") {
        let base = current.ok_or_else(|| {
            FleroviumError::InvalidArgument(format!("Relative URL {} needs a current page", trimmed))
        })?;
        let joined = Url::parse(base)
            .and_then(|base| base.join(trimmed))
            .map_err(|e| FleroviumError::InvalidArgument(format!("Cannot resolve {} against {}: {}", trimmed, base, e)))?;
        return Ok(joined.to_string());
    }

    let candidate = if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        format!("http://{}", trimmed)
    } else if trimmed.contains('.') {
        format!("https://{}", trimmed)
    } else {
        format!("https://www.{}.com", trimmed)
    };

    Url::parse(&candidate).map_err(|e| FleroviumError::InvalidArgument(format!("Invalid URL {}: {}", trimmed, e)))?;
    Ok(candidate)
}
