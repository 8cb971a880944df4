//! Wire types for the crop collection endpoint.
//!
//! Field names on the wire are Spanish (`nombre`, `fecha_cosecha`, ...); the
//! Rust side uses English names and maps them with serde renames.

use serde::{Deserialize, Deserializer, Serialize};

/// Substring the server puts in the status when the harvest date is today
const DUE_TODAY_MARKER: &str = "COSECHA HOY";
/// Substring the server puts in the status when the harvest date has passed
const PAST_MARKER: &str = "Cosechado hace";

/// A crop as returned by `GET /api/v1/cultivos`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Crop {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "zona", default, deserialize_with = "null_as_default")]
  pub zone: String,
  #[serde(rename = "fecha_siembra", default, deserialize_with = "null_as_default")]
  pub planted_on: String,
  #[serde(rename = "fecha_cosecha", default, deserialize_with = "null_as_default")]
  pub harvest_on: String,
  #[serde(rename = "precio_compra", default, deserialize_with = "null_as_default")]
  pub purchase_price: f64,
  #[serde(rename = "precio_venta", default, deserialize_with = "null_as_default")]
  pub sale_price: f64,
  #[serde(rename = "dias_alerta", default, deserialize_with = "clamped_days")]
  pub alert_days: u32,
  #[serde(rename = "notas", default, deserialize_with = "null_as_default")]
  pub notes: String,
  /// Server-computed countdown text, display only
  #[serde(rename = "dias_restantes", default, deserialize_with = "null_as_default")]
  pub days_remaining: String,
}

impl Crop {
  /// Potential margin: sale price minus purchase price
  pub fn margin(&self) -> f64 {
    self.sale_price - self.purchase_price
  }

  pub fn harvest_status(&self) -> HarvestStatus {
    HarvestStatus::classify(&self.days_remaining)
  }
}

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Alert threshold as the server stored it. Negative or oversized numbers
/// are clamped into range so one odd record doesn't fail the whole list.
fn clamped_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  let days = Option::<i64>::deserialize(deserializer)?.unwrap_or_default();
  Ok(days.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Display state derived from the server's `dias_restantes` text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestStatus {
  Upcoming,
  DueToday,
  Past,
}

impl HarvestStatus {
  /// Classify a status string. "Due today" wins over "past" when both
  /// markers are present.
  pub fn classify(status: &str) -> Self {
    if status.contains(DUE_TODAY_MARKER) {
      HarvestStatus::DueToday
    } else if status.contains(PAST_MARKER) {
      HarvestStatus::Past
    } else {
      HarvestStatus::Upcoming
    }
  }

  /// Whether the crop should appear in the pending-harvest reminder
  pub fn is_pending(self) -> bool {
    matches!(self, HarvestStatus::DueToday | HarvestStatus::Past)
  }
}

/// Request body for `POST` and `PUT`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropPayload {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "zona")]
  pub zone: String,
  #[serde(rename = "fecha_siembra")]
  pub planted_on: String,
  #[serde(rename = "fecha_cosecha")]
  pub harvest_on: String,
  #[serde(rename = "precio_compra")]
  pub purchase_price: f64,
  #[serde(rename = "precio_venta")]
  pub sale_price: f64,
  #[serde(rename = "dias_alerta")]
  pub alert_days: u32,
  #[serde(rename = "notas")]
  pub notes: String,
}

impl From<&Crop> for CropPayload {
  fn from(crop: &Crop) -> Self {
    Self {
      name: crop.name.clone(),
      zone: crop.zone.clone(),
      planted_on: crop.planted_on.clone(),
      harvest_on: crop.harvest_on.clone(),
      purchase_price: crop.purchase_price,
      sale_price: crop.sale_price,
      alert_days: crop.alert_days,
      notes: crop.notes.clone(),
    }
  }
}

/// Response envelope for mutations. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
  #[serde(rename = "mensaje", default)]
  pub message: Option<String>,
  #[serde(default)]
  pub error: Option<String>,
}
