//! Client side of the crop collection REST API.

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::{CropApi, CropClient};
pub use error::ApiError;
pub use types::{ApiMessage, Crop, CropPayload, HarvestStatus};
