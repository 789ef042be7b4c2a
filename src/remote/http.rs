use std::future::Future;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::*;

pub(super) const API_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Base64 input chunk size in raw bytes. A multiple of 3, so every chunk
/// boundary is alignment-safe and the encoded pieces concatenate into one
/// valid payload.
const ENCODE_CHUNK_BYTES: usize = 0x8000 - 2;

/// Retry a read-path request on transient transport failures. Mutations
/// never go through here: a planned mutation is sent exactly once.
pub(super) async fn with_retries<T, F, Fut>(label: &str, mut f: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    const ATTEMPTS: usize = 3;
    let mut last = None;
    for i in 0..ATTEMPTS {
        match f().await {
            Ok(v) => return Ok(v),
            Err(err @ ApiError::Transport(_)) => {
                log::debug!("{label}: attempt {} failed: {err}", i + 1);
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    tokio::time::sleep(Duration::from_millis(200 * (1 << i))).await;
                }
            }
            Err(err) => return Err(err),
        }
    }
    Err(last.unwrap_or_else(|| ApiError::Transport(format!("{label}: unknown error"))))
}

/// Transcode a binary payload to the remote's text-safe encoding, feeding
/// the encoder bounded chunks. Purely an encoding concern; the upload
/// itself stays a single request.
pub(super) fn encode_payload(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(ENCODE_CHUNK_BYTES) {
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

/// Parse a success body, reporting undecodable responses with the status
/// they arrived under.
pub(super) async fn decode_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    label: &str,
) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    let text = resp.text().await.map_err(ApiError::from_reqwest)?;
    serde_json::from_str(&text).map_err(|err| ApiError::Remote {
        status,
        message: format!("unexpected {label} response body: {err}"),
    })
}

impl ContentClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    /// Start a request with the API media type and, when a credential is
    /// present, bearer authorization. The credential is read fresh here on
    /// every request.
    pub(super) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, API_MEDIA_TYPE);
        if let Some(token) = self.credential.token() {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        req
    }

    /// Map a non-success response into the error taxonomy, extracting the
    /// remote's human-readable message when it sends one.
    pub(super) async fn ensure_ok(
        &self,
        resp: reqwest::Response,
        label: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = remote_message(resp)
            .await
            .unwrap_or_else(|| format!("{label} failed"));
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if status == reqwest::StatusCode::CONFLICT {
            return Err(ApiError::Conflict(message));
        }
        Err(ApiError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    pub(super) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: String,
        label: &'static str,
    ) -> Result<T, ApiError> {
        let resp = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        let resp = self.ensure_ok(resp, label).await?;
        decode_json(resp, label).await
    }
}

async fn remote_message(resp: reqwest::Response) -> Option<String> {
    let text = resp.text().await.ok()?;
    match serde_json::from_str::<ErrorView>(&text) {
        Ok(v) => Some(v.message),
        Err(_) if text.trim().is_empty() => None,
        Err(_) => Some(text.chars().take(200).collect()),
    }
}
