//! Schema document retrieval.
//!
//! Redirects are followed manually so the target path can be normalized
//! first: schema documents are served behind signed redirects whose paths
//! already carry percent-encoded segments, and letting a client re-escape
//! the `%` corrupts the signature. Automatic redirect policies do exactly
//! that, so the client here is built with redirects disabled.

use reqwest::header::LOCATION;
use reqwest::{redirect::Policy, Client, Url};
use tracing::debug;

use crate::error::{Result, WshError};

const MAX_REDIRECTS: usize = 5;

/// Fetch the schema document from `url`, following up to [`MAX_REDIRECTS`]
/// redirect hops.
pub async fn fetch_schema(url: &str) -> Result<Vec<u8>> {
    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .map_err(|e| fetch_err(url, &e))?;

    let mut target = Url::parse(url).map_err(|e| fetch_err(url, &e))?;

    for _ in 0..=MAX_REDIRECTS {
        debug!(%target, "fetching schema");
        let resp = client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| fetch_err(url, &e))?;

        if resp.status().is_redirection() {
            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| WshError::Fetch {
                    url: url.to_string(),
                    reason: format!("redirect ({}) without Location header", resp.status()),
                })?;
            target = normalize_redirect(&target, location)?;
            continue;
        }

        if !resp.status().is_success() {
            return Err(WshError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP status {}", resp.status()),
            });
        }

        let body = resp.bytes().await.map_err(|e| fetch_err(url, &e))?;
        return Ok(body.to_vec());
    }

    Err(WshError::Fetch {
        url: url.to_string(),
        reason: format!("more than {MAX_REDIRECTS} redirects"),
    })
}

/// Resolve a redirect target against the current URL and undo any
/// double-escaping the hop introduced into the path.
fn normalize_redirect(base: &Url, location: &str) -> Result<Url> {
    let mut next = base.join(location).map_err(|e| fetch_err(base.as_str(), &e))?;
    if let Some(path) = undo_double_escape(next.path()) {
        next.set_path(&path);
    }
    Ok(next)
}

/// Collapse `%25XX` back to `%XX` where `XX` is a hex pair, i.e. where an
/// already-encoded path segment was escaped a second time.
fn undo_double_escape(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut changed = false;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i..].starts_with(b"%25")
            && bytes.len() >= i + 5
            && bytes[i + 3].is_ascii_hexdigit()
            && bytes[i + 4].is_ascii_hexdigit()
        {
            out.push('%');
            changed = true;
            i += 3;
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }

    changed.then_some(out)
}

fn fetch_err(url: &str, e: &dyn std::fmt::Display) -> WshError {
    WshError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_double_escape_collapses_escaped_percent() {
        assert_eq!(
            undo_double_escape("/schema/a%252Fb.yaml").as_deref(),
            Some("/schema/a%2Fb.yaml")
        );
    }

    #[test]
    fn test_undo_double_escape_leaves_plain_paths_alone() {
        assert_eq!(undo_double_escape("/schema/charger.yaml"), None);
        // %25 not followed by a hex pair is a literal percent sign
        assert_eq!(undo_double_escape("/a%25zz"), None);
    }

    #[test]
    fn test_normalize_redirect_resolves_relative_location() {
        let base = Url::parse("https://schema.example.com/v1/charger.yaml").unwrap();
        let next = normalize_redirect(&base, "/v2/charger%252Fprops.yaml").unwrap();
        assert_eq!(next.path(), "/v2/charger%2Fprops.yaml");
        assert_eq!(next.host_str(), Some("schema.example.com"));
    }

    #[test]
    fn test_normalize_redirect_absolute_location() {
        let base = Url::parse("https://schema.example.com/v1/charger.yaml").unwrap();
        let next = normalize_redirect(&base, "https://cdn.example.com/charger.yaml").unwrap();
        assert_eq!(next.host_str(), Some("cdn.example.com"));
    }
}
