//! Authenticated JSON transport shared by every resource call.
//!
//! One pipeline: attach the bearer token, send, map the status onto the
//! [`ApiError`] taxonomy, and on `401` refresh the token and re-issue the
//! request exactly once.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::RwLock;

use crate::application::ports::{ResourceApi, TokenRefresher};
use crate::domain::{ApiError, Credentials, FieldErrors};

/// Retries allowed after a `401`. The ceiling is absolute: an invalid
/// refresh token must not cause a refresh loop.
const MAX_AUTH_RETRIES: u8 = 1;

const APPLICATION_JSON: &str = "application/json";

/// Decoded success response.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    /// `None` when the body was empty.
    pub body: Option<T>,
}

/// Request body with its media type.
struct Body {
    content_type: &'static str,
    bytes: Vec<u8>,
}

/// One logical request; `attempt` counts re-issues after a refresh.
struct PreparedRequest<'a> {
    method: Method,
    url: &'a str,
    body: Option<Body>,
    attempt: u8,
}

/// Control-plane API client.
pub struct ApiClient<R> {
    http: reqwest::Client,
    credentials: Arc<RwLock<Credentials>>,
    refresher: R,
}

impl<R: TokenRefresher> ApiClient<R> {
    /// Create a client sharing `credentials` with the login/logout commands.
    pub fn new(http: reqwest::Client, credentials: Arc<RwLock<Credentials>>, refresher: R) -> Self {
        Self {
            http,
            credentials,
            refresher,
        }
    }

    /// `{base_url}/v2/{endpoint}`.
    pub async fn url(&self, endpoint: &str) -> String {
        let creds = self.credentials.read().await;
        format!(
            "{}/v2/{}",
            creds.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Send one logical request with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] variant matching the final response status,
    /// [`ApiError::Transport`] when the host cannot be reached, or
    /// [`ApiError::Decode`] when a body does not have the expected shape.
    pub async fn send<P, T>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&P>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = payload
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::Decode(format!("cannot encode request payload: {e}")))?
            .map(|bytes| Body {
                content_type: APPLICATION_JSON,
                bytes,
            });
        self.dispatch(PreparedRequest {
            method,
            url,
            body,
            attempt: 0,
        })
        .await
    }

    /// `PUT url` with an opaque body; the response is decoded as JSON.
    ///
    /// The body is kept so the request can be re-issued after a refresh.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        url: &str,
        content_type: &'static str,
        bytes: Vec<u8>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.dispatch(PreparedRequest {
            method: Method::PUT,
            url,
            body: Some(Body {
                content_type,
                bytes,
            }),
            attempt: 0,
        })
        .await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        mut request: PreparedRequest<'_>,
    ) -> Result<ApiResponse<T>, ApiError> {
        loop {
            let (status, bytes) = self.send_once(&request).await?;
            match status.as_u16() {
                200 | 201 | 204 => {
                    return Ok(ApiResponse {
                        status,
                        body: decode_body(&bytes)?,
                    });
                }
                400 => return Err(ApiError::Validation(FieldErrors::from_body(&bytes)?)),
                401 if request.attempt < MAX_AUTH_RETRIES => {
                    self.refresh().await?;
                    request.attempt += 1;
                }
                401 => return Err(ApiError::Auth("unauthorized".to_string())),
                code @ (500 | 502) => return Err(ApiError::server(code)),
                code => return Err(ApiError::UnknownResponse(code)),
            }
        }
    }

    /// `GET url`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<ApiResponse<T>, ApiError> {
        self.send::<(), T>(Method::GET, url, None).await
    }

    /// `POST url` with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post<P, T>(&self, url: &str, payload: &P) -> Result<ApiResponse<T>, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, url, Some(payload)).await
    }

    /// `DELETE url`, discarding any body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, url: &str) -> Result<StatusCode, ApiError> {
        self.send::<(), IgnoredAny>(Method::DELETE, url, None)
            .await
            .map(|resp| resp.status)
    }

    async fn send_once(
        &self,
        request: &PreparedRequest<'_>,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let bearer = self.credentials.read().await.bearer();
        let authorization = HeaderValue::from_str(&bearer)
            .map_err(|_| ApiError::Auth("stored access token is not a valid header".to_string()))?;

        let mut builder = self
            .http
            .request(request.method.clone(), request.url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(body.content_type))
                .body(body.bytes.clone());
        }

        let transport_err = |e: reqwest::Error| ApiError::Transport {
            url: request.url.to_string(),
            message: e.to_string(),
        };
        let response = builder.send().await.map_err(transport_err)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_err)?;

        tracing::debug!(
            method = %request.method,
            url = request.url,
            status = status.as_u16(),
            attempt = request.attempt,
            bytes = bytes.len(),
            "api response"
        );
        Ok((status, bytes.to_vec()))
    }

    async fn refresh(&self) -> Result<(), ApiError> {
        let mut creds = self.credentials.write().await;
        tracing::info!("access token rejected; refreshing");
        self.refresher.refresh(&mut creds).await
    }
}

impl<R: TokenRefresher> ResourceApi for ApiClient<R> {
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ApiError> {
        ApiClient::get(self, url).await.map(|resp| resp.body)
    }

    async fn post<P, T>(&self, url: &str, payload: &P) -> Result<Option<T>, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        ApiClient::post(self, url, payload).await.map(|resp| resp.body)
    }

    async fn upload<T: DeserializeOwned>(
        &self,
        url: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<Option<T>, ApiError> {
        ApiClient::upload(self, url, content_type, body)
            .await
            .map(|resp| resp.body)
    }

    async fn delete(&self, url: &str) -> Result<(), ApiError> {
        ApiClient::delete(self, url).await.map(|_| ())
    }

    async fn resource_url(&self, endpoint: &str) -> String {
        self.url(endpoint).await
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}
