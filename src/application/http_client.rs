// The one place requests to the backend are built and sent.
//
// Purpose
// - Turn a path, a query and a body into an ApiRequest with the right headers.
// - Normalise every response into JSON, or into one ApiError shape.
//
// Responsibilities
// - Resolve paths against the configured base URL and flatten query objects.
// - Attach the bearer token when one is stored.
// - On 401, warm the session up with one `GET /me` and retry the request once.
//
// Boundaries
// - No timeouts, no backoff, no caching. Errors are surfaced to the caller as is.
//
// Testing guidance
// - Drive it with the InMemoryBackend transport; its request log shows exactly
//   what went over the wire.

use crate::application::config::ClientConfig;
use crate::application::errors::{ApiError, ErrorBody};
use crate::application::query::Query;
use crate::core::ports::{
    ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody, TokenStore,
};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::{debug, warn};

const SESSION_WARM_UP_PATH: &str = "/me";

#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn build_url(&self, path: &str, query: &Query) -> Result<Url, ApiError> {
        let mut url = self
            .config
            .api_base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Url {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Sends a request and returns the decoded body: JSON when the response
    /// carries JSON, a string for other text, `null` when empty.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: RequestBody,
    ) -> Result<Json, ApiError> {
        let url = self.build_url(path, query)?;
        let response = self.execute(method, &url, body).await?;
        let response = into_success(path, response)?;
        decode_body(path, &response)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<T, ApiError> {
        let value = self
            .request(Method::Get, path, query, RequestBody::Empty)
            .await?;
        from_json(path, value)
    }

    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let value = self
            .request(method, path, &Query::new(), RequestBody::Json(body))
            .await?;
        from_json(path, value)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<T, ApiError> {
        let value = self
            .request(Method::Post, path, &Query::new(), RequestBody::Multipart(parts))
            .await?;
        from_json(path, value)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::Delete, path, &Query::new(), RequestBody::Empty)
            .await?;
        Ok(())
    }

    /// Raw response bytes, for receipt images and payslip files.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(path, &Query::new())?;
        let response = self.execute(Method::Get, &url, RequestBody::Empty).await?;
        Ok(into_success(path, response)?.body)
    }

    async fn execute(
        &self,
        method: Method,
        url: &Url,
        body: RequestBody,
    ) -> Result<ApiResponse, ApiError> {
        let retry_body = self.config.refresh_on_unauthorized.then(|| body.clone());
        let response = self.dispatch(method, url, body).await?;

        let Some(retry_body) = retry_body else {
            return Ok(response);
        };
        if response.status != StatusCode::UNAUTHORIZED.as_u16() {
            return Ok(response);
        }

        warn!(method = method.as_str(), %url, "unauthorized, refreshing session and retrying once");
        self.warm_up_session().await;
        self.dispatch(method, url, retry_body).await
    }

    // The warm-up goes straight to the transport so it can never re-enter the retry path.
    async fn warm_up_session(&self) {
        let url = match self.build_url(SESSION_WARM_UP_PATH, &Query::new()) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, "could not build session warm-up url");
                return;
            }
        };
        match self.dispatch(Method::Get, &url, RequestBody::Empty).await {
            Ok(response) => debug!(status = response.status, "session warm-up finished"),
            Err(error) => debug!(%error, "session warm-up failed"),
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &Url,
        body: RequestBody,
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if matches!(body, RequestBody::Json(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self.tokens.get() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        debug!(method = method.as_str(), %url, "sending request");
        let response = self
            .transport
            .send(ApiRequest {
                method,
                url: url.to_string(),
                headers,
                body,
            })
            .await?;
        debug!(method = method.as_str(), %url, status = response.status, "received response");
        Ok(response)
    }
}

fn into_success(path: &str, response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    let body = ErrorBody::from_bytes(&response.body);
    let message = body.message().unwrap_or_else(|| {
        StatusCode::from_u16(response.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("request failed")
            .to_string()
    });
    debug!(path, status = response.status, %message, "request failed");
    Err(ApiError::Http {
        status: response.status,
        message,
        body,
    })
}

fn decode_body(path: &str, response: &ApiResponse) -> Result<Json, ApiError> {
    if response.body.is_empty() {
        return Ok(Json::Null);
    }
    if response.is_json() {
        return serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        });
    }
    Ok(serde_json::from_slice(&response.body)
        .unwrap_or_else(|_| Json::String(String::from_utf8_lossy(&response.body).into_owned())))
}

fn from_json<T: DeserializeOwned>(path: &str, value: Json) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
