//! Logo source loading.
//!
//! A logo source is resolved as a `data:` URI, an `http(s)` URL, or a
//! filesystem path, in that order. Loading is the only asynchronous step of
//! a render and it is strictly best-effort: the caller decides what a
//! failure means (the render entry points treat it as "no logo").

use base64::Engine;
use image::DynamicImage;
use url::Url;

use crate::error::{RenderError, RenderResult};

/// Resolves and decodes logo sources.
#[derive(Debug, Default)]
pub struct LogoLoader {
    http: reqwest::Client,
}

impl LogoLoader {
    /// Loader with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and decode a logo image.
    ///
    /// `cors_enabled` marks HTTP fetches as anonymous cross-origin requests
    /// (an `Origin` header, no credentials).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Logo`] when the source cannot be read or the
    /// bytes do not decode as an image.
    pub async fn load(&self, source: &str, cors_enabled: bool) -> RenderResult<DynamicImage> {
        let bytes = self.fetch(source, cors_enabled).await?;
        image::load_from_memory(&bytes)
            .map_err(|e| RenderError::Logo(format!("failed to decode image: {e}")))
    }

    async fn fetch(&self, source: &str, cors_enabled: bool) -> RenderResult<Vec<u8>> {
        if source.starts_with("data:") {
            return decode_data_uri(source);
        }

        if let Ok(parsed) = Url::parse(source) {
            if matches!(parsed.scheme(), "http" | "https") {
                return self.fetch_remote(parsed, cors_enabled).await;
            }
        }

        tokio::fs::read(source)
            .await
            .map_err(|e| RenderError::Logo(format!("failed to read {source:?}: {e}")))
    }

    async fn fetch_remote(&self, address: Url, cors_enabled: bool) -> RenderResult<Vec<u8>> {
        let mut request = self.http.get(address.clone());
        if cors_enabled {
            request = request.header(reqwest::header::ORIGIN, "null");
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RenderError::Logo(format!("failed to fetch {address}: {e}")))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| RenderError::Logo(format!("failed to read body of {address}: {e}")))?;

        Ok(body.to_vec())
    }
}

/// Decode a `data:` URI payload, base64 or percent-encoded.
///
/// Accepts forms like `data:image/png;base64,iVBORw0KGgo...`.
fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let Some(body) = uri.strip_prefix("data:") else {
        return Err(RenderError::Logo("not a data URI".to_string()));
    };

    let comma = body
        .find(',')
        .ok_or_else(|| RenderError::Logo("invalid data URI: missing comma".to_string()))?;
    let (metadata, payload) = (&body[..comma], &body[comma + 1..]);

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RenderError::Logo(format!("failed to decode base64 payload: {e}")))
    } else {
        percent_decode(payload)
    }
}

/// Percent-decode a non-base64 data-URI payload.
fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if hex.len() == 2 {
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    out.push(byte);
                    continue;
                }
            }
            return Err(RenderError::Logo("invalid percent encoding".to_string()));
        }
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 red pixel.
    const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_decodes_base64_data_uri() {
        let uri = format!("data:image/png;base64,{RED_PIXEL_PNG}");
        let bytes = decode_data_uri(&uri).unwrap();
        assert!(bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));

        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image.to_rgba8().dimensions(), (1, 1));
    }

    #[test]
    fn test_rejects_malformed_data_uris() {
        assert!(decode_data_uri("not a data uri").is_err());
        assert!(decode_data_uri("data:image/png").is_err()); // missing comma
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(percent_decode("abc").unwrap(), b"abc");
        assert_eq!(percent_decode("a%20b").unwrap(), b"a b");
        assert!(percent_decode("a%2").is_err());
        assert!(percent_decode("a%zz").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_reports_logo_error() {
        let loader = LogoLoader::new();
        let err = loader
            .load("/nonexistent/qrpaint-logo.png", false)
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Logo(_)));
    }

    #[tokio::test]
    async fn test_data_uri_loads_without_io() {
        let loader = LogoLoader::new();
        let uri = format!("data:image/png;base64,{RED_PIXEL_PNG}");
        let image = loader.load(&uri, false).await.unwrap();
        assert_eq!(image.to_rgba8().dimensions(), (1, 1));
    }
}
