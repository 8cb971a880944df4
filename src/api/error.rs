use std::fmt;

/// Failure of a single request against the crop API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
  /// No usable response: connection refused, DNS, timeout, or an unreadable body
  Connectivity(String),
  /// The server answered with a non-2xx status
  Rejected {
    status: u16,
    /// The `error` field of the response body, when there was one
    message: Option<String>,
  },
}

impl ApiError {
  pub fn connectivity(err: impl fmt::Display) -> Self {
    ApiError::Connectivity(err.to_string())
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Connectivity(detail) => write!(f, "cannot reach server: {}", detail),
      ApiError::Rejected {
        status,
        message: Some(message),
      } => write!(f, "HTTP {}: {}", status, message),
      ApiError::Rejected {
        status,
        message: None,
      } => write!(f, "HTTP {}", status),
    }
  }
}

impl std::error::Error for ApiError {}
