//! In-memory `CropApi` that records every request, for tests.

use crate::api::client::CropApi;
use crate::api::error::ApiError;
use crate::api::types::{ApiMessage, Crop, CropPayload};
use futures::future::{BoxFuture, FutureExt};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  List,
  Create(CropPayload),
  Update(String, CropPayload),
  Delete(String),
}

struct State {
  crops: Vec<Crop>,
  list_error: Option<ApiError>,
  mutation_result: Result<ApiMessage, ApiError>,
  calls: Vec<Call>,
}

#[derive(Clone)]
pub struct FakeApi {
  state: Arc<Mutex<State>>,
}

impl FakeApi {
  pub fn new(crops: Vec<Crop>) -> Self {
    Self {
      state: Arc::new(Mutex::new(State {
        crops,
        list_error: None,
        mutation_result: Ok(ApiMessage::default()),
        calls: Vec::new(),
      })),
    }
  }

  pub fn fail_list(&self, err: ApiError) {
    self.state.lock().unwrap().list_error = Some(err);
  }

  pub fn respond_to_mutations(&self, result: Result<ApiMessage, ApiError>) {
    self.state.lock().unwrap().mutation_result = result;
  }

  pub fn calls(&self) -> Vec<Call> {
    self.state.lock().unwrap().calls.clone()
  }

  pub fn list_calls(&self) -> usize {
    self
      .calls()
      .iter()
      .filter(|c| matches!(c, Call::List))
      .count()
  }

  fn record(&self, call: Call) -> Result<ApiMessage, ApiError> {
    let mut state = self.state.lock().unwrap();
    state.calls.push(call);
    state.mutation_result.clone()
  }
}

impl CropApi for FakeApi {
  fn list(&self) -> BoxFuture<'_, Result<Vec<Crop>, ApiError>> {
    let result = {
      let mut state = self.state.lock().unwrap();
      state.calls.push(Call::List);
      match &state.list_error {
        Some(err) => Err(err.clone()),
        None => Ok(state.crops.clone()),
      }
    };
    async move { result }.boxed()
  }

  fn create(&self, payload: CropPayload) -> BoxFuture<'_, Result<ApiMessage, ApiError>> {
    let result = self.record(Call::Create(payload));
    async move { result }.boxed()
  }

  fn update(
    &self,
    original_name: String,
    payload: CropPayload,
  ) -> BoxFuture<'_, Result<ApiMessage, ApiError>> {
    let result = self.record(Call::Update(original_name, payload));
    async move { result }.boxed()
  }

  fn delete(&self, name: String) -> BoxFuture<'_, Result<ApiMessage, ApiError>> {
    let result = self.record(Call::Delete(name));
    async move { result }.boxed()
  }
}

/// A crop with the given name and prices, other fields filled in
pub fn crop(name: &str, purchase: f64, sale: f64) -> Crop {
  Crop {
    name: name.to_string(),
    zone: "Huerta".to_string(),
    planted_on: "2026-03-01".to_string(),
    harvest_on: "2026-07-01".to_string(),
    purchase_price: purchase,
    sale_price: sale,
    alert_days: 7,
    notes: String::new(),
    days_remaining: "30 días".to_string(),
  }
}
