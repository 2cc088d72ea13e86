use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};
use tracker_core::{ListQuery, ResultPage, Row, RowId, RowPatch};
use tracker_logging::tracker_debug;
use url::Url;

use crate::decode::{decode_page, decode_updated_row, error_message};
use crate::{ApiError, FailureKind};

const XSRF_HEADER: &str = "x-xsrf-token";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    /// Path of the collection under `base_url`, e.g. `/api/v1/jobs`.
    pub collection: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub xsrf_token: Option<String>,
    pub cookie: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            collection: "/api/v1/jobs".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            xsrf_token: None,
            cookie: None,
        }
    }
}

/// The remote collection the list is synchronized with.
#[async_trait::async_trait]
pub trait JobsApi: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<ResultPage, ApiError>;

    /// Returns the server's copy of the row when the response carries one.
    async fn update(&self, id: &RowId, patch: &RowPatch) -> Result<Option<Row>, ApiError>;

    async fn delete(&self, id: &RowId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobsApi {
    settings: ApiSettings,
    collection_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobsApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let collection_url = Url::parse(&format!(
            "{}/{}",
            settings.base_url.trim_end_matches('/'),
            settings.collection.trim_start_matches('/')
        ))
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if collection_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{collection_url} cannot hold row paths"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(default_headers(&settings)?)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            collection_url,
            client,
        })
    }

    /// `<collection>?<non-default query parameters>`
    pub fn list_url(&self, query: &ListQuery) -> Url {
        let mut url = self.collection_url.clone();
        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    /// `<collection>/<id>` with the id percent-encoded as one segment.
    pub fn row_url(&self, id: &RowId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Bytes, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let body = self.read_body(response).await?;
        if !status.is_success() {
            let code = status.as_u16();
            let message = error_message(&body).unwrap_or_else(|| status.to_string());
            let kind = match code {
                401 | 403 => FailureKind::Unauthorized(code),
                _ => FailureKind::HttpStatus(code),
            };
            return Err(ApiError::new(kind, message));
        }
        Ok(body)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Bytes, ApiError> {
        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

#[async_trait::async_trait]
impl JobsApi for ReqwestJobsApi {
    async fn list(&self, query: &ListQuery) -> Result<ResultPage, ApiError> {
        let url = self.list_url(query);
        tracker_debug!("GET {}", url);
        let body = self.send(self.client.get(url)).await?;
        decode_page(&body)
    }

    async fn update(&self, id: &RowId, patch: &RowPatch) -> Result<Option<Row>, ApiError> {
        let url = self.row_url(id);
        tracker_debug!("PUT {} fields={}", url, patch.len());
        let payload = serde_json::to_vec(patch)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let body = self.send(self.client.put(url).body(payload)).await?;
        Ok(decode_updated_row(&body))
    }

    async fn delete(&self, id: &RowId) -> Result<(), ApiError> {
        let url = self.row_url(id);
        tracker_debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

fn default_headers(settings: &ApiSettings) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(cookie) = settings.cookie.as_deref() {
        headers.insert(COOKIE, header_value(cookie)?);
    }
    if let Some(token) = settings.xsrf_token.as_deref() {
        headers.insert(HeaderName::from_static(XSRF_HEADER), header_value(token)?);
    }
    Ok(headers)
}

fn header_value(raw: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(raw.trim())
        .map_err(|err| ApiError::new(FailureKind::InvalidHeader, err.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn too_large(max_bytes: u64, actual: u64) -> ApiError {
    ApiError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
