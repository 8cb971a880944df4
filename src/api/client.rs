use crate::api::error::ApiError;
use crate::api::types::{ApiMessage, Crop, CropPayload};
use crate::config::ApiConfig;
use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Operations the client performs against the crop collection.
///
/// Every method maps to exactly one HTTP request. Futures are boxed so the
/// sync layer can hold any implementation behind `Arc<dyn CropApi>` and spawn
/// the calls on the runtime.
pub trait CropApi: Send + Sync {
  /// `GET {base}`
  fn list(&self) -> BoxFuture<'_, Result<Vec<Crop>, ApiError>>;

  /// `POST {base}`
  fn create(&self, payload: CropPayload) -> BoxFuture<'_, Result<ApiMessage, ApiError>>;

  /// `PUT {base}/{original_name}`
  fn update(
    &self,
    original_name: String,
    payload: CropPayload,
  ) -> BoxFuture<'_, Result<ApiMessage, ApiError>>;

  /// `DELETE {base}/{name}`
  fn delete(&self, name: String) -> BoxFuture<'_, Result<ApiMessage, ApiError>>;
}

/// HTTP client for the crop collection endpoint
#[derive(Clone)]
pub struct CropClient {
  http: reqwest::Client,
  base: Url,
}

impl CropClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base = Url::parse(&config.url)
      .map_err(|e| eyre!("Invalid API url {}: {}", config.url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("API url {} cannot carry path segments", config.url));
    }

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base })
  }

  pub fn base_url(&self) -> &Url {
    &self.base
  }

  /// URL of a single crop. The name is pushed as one percent-encoded segment,
  /// so spaces and slashes in names stay inside it.
  fn item_url(&self, name: &str) -> Result<Url, ApiError> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|_| ApiError::Connectivity(format!("invalid base url {}", self.base)))?
      .pop_if_empty()
      .push(name);
    Ok(url)
  }

  async fn fetch_all(&self) -> Result<Vec<Crop>, ApiError> {
    debug!(url = %self.base, "GET crops");
    let response = self
      .http
      .get(self.base.clone())
      .send()
      .await
      .map_err(ApiError::connectivity)?;

    let status = response.status();
    if !status.is_success() {
      let body = response.bytes().await.unwrap_or_default();
      return Err(rejection(status, &body));
    }

    response.json::<Vec<Crop>>().await.map_err(ApiError::connectivity)
  }

  async fn send(&self, request: RequestBuilder) -> Result<ApiMessage, ApiError> {
    let response = request.send().await.map_err(ApiError::connectivity)?;
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::connectivity)?;
    interpret(status, &body)
  }
}

impl CropApi for CropClient {
  fn list(&self) -> BoxFuture<'_, Result<Vec<Crop>, ApiError>> {
    self.fetch_all().boxed()
  }

  fn create(&self, payload: CropPayload) -> BoxFuture<'_, Result<ApiMessage, ApiError>> {
    async move {
      debug!(url = %self.base, name = %payload.name, "POST crop");
      self
        .send(self.http.post(self.base.clone()).json(&payload))
        .await
    }
    .boxed()
  }

  fn update(
    &self,
    original_name: String,
    payload: CropPayload,
  ) -> BoxFuture<'_, Result<ApiMessage, ApiError>> {
    async move {
      let url = self.item_url(&original_name)?;
      debug!(%url, name = %payload.name, "PUT crop");
      self.send(self.http.put(url).json(&payload)).await
    }
    .boxed()
  }

  fn delete(&self, name: String) -> BoxFuture<'_, Result<ApiMessage, ApiError>> {
    async move {
      let url = self.item_url(&name)?;
      debug!(%url, "DELETE crop");
      self.send(self.http.delete(url)).await
    }
    .boxed()
  }
}

/// Decide the outcome of a mutation from its status and raw body.
///
/// Only the status decides success. The body is read for the optional
/// `mensaje`/`error` fields and ignored when it is not valid JSON.
pub(crate) fn interpret(status: StatusCode, body: &[u8]) -> Result<ApiMessage, ApiError> {
  if status.is_success() {
    Ok(serde_json::from_slice(body).unwrap_or_default())
  } else {
    Err(rejection(status, body))
  }
}

fn rejection(status: StatusCode, body: &[u8]) -> ApiError {
  let message = serde_json::from_slice::<ApiMessage>(body)
    .ok()
    .and_then(|m| m.error);
  ApiError::Rejected {
    status: status.as_u16(),
    message,
  }
}
