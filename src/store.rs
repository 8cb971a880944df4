use crate::api::Crop;
use chrono::{DateTime, Local};

/// Totals over every crop in the store
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
  pub purchase: f64,
  pub sale: f64,
}

impl Totals {
  pub fn margin(&self) -> f64 {
    self.sale - self.purchase
  }
}

/// The most recently fetched crop list.
///
/// Only ever replaced as a whole, after a completed load.
#[derive(Debug, Default)]
pub struct DataStore {
  crops: Vec<Crop>,
  loaded_at: Option<DateTime<Local>>,
}

impl DataStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn replace(&mut self, crops: Vec<Crop>) {
    self.crops = crops;
    self.loaded_at = Some(Local::now());
  }

  /// Crops in server order
  pub fn crops(&self) -> &[Crop] {
    &self.crops
  }

  pub fn is_loaded(&self) -> bool {
    self.loaded_at.is_some()
  }

  pub fn loaded_at(&self) -> Option<DateTime<Local>> {
    self.loaded_at
  }

  pub fn find(&self, name: &str) -> Option<&Crop> {
    self.crops.iter().find(|c| c.name == name)
  }

  pub fn totals(&self) -> Totals {
    self.crops.iter().fold(Totals::default(), |acc, c| Totals {
      purchase: acc.purchase + c.purchase_price,
      sale: acc.sale + c.sale_price,
    })
  }

  /// Names of crops the server reports as due today or already past
  pub fn pending_harvests(&self) -> Vec<&str> {
    self
      .crops
      .iter()
      .filter(|c| c.harvest_status().is_pending())
      .map(|c| c.name.as_str())
      .collect()
  }
}
