//! Sync layer between the crop view and the remote API.
//!
//! Every operation spawns one request on the runtime and reports back over a
//! channel; the view drains finished requests with `poll()` on each tick.
//!
//! ```ignore
//! let mut sync = SyncLayer::new(Arc::new(client));
//! sync.load_all();
//!
//! // In event loop tick
//! for outcome in sync.poll() {
//!     match outcome {
//!         SyncOutcome::Loaded(Ok(crops)) => store.replace(crops),
//!         SyncOutcome::Loaded(Err(e)) => show_load_error(e),
//!         SyncOutcome::Mutated { kind, result } => notify(feedback(kind, &result)),
//!     }
//! }
//! ```
//!
//! A successful create, update or delete always triggers a fresh `load_all()`
//! from inside `poll()`; the cache is never patched incrementally.

use crate::api::{ApiError, ApiMessage, Crop, CropApi, CropPayload};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const CONNECTIVITY_MESSAGE: &str = "Error de conexión con la API.";

/// Which mutation a finished request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  Create,
  Update,
  Delete,
}

impl MutationKind {
  fn default_success(self) -> &'static str {
    match self {
      MutationKind::Create => "Cultivo añadido.",
      MutationKind::Update => "Cultivo actualizado.",
      MutationKind::Delete => "Cultivo eliminado.",
    }
  }

  fn default_failure(self) -> &'static str {
    match self {
      MutationKind::Create | MutationKind::Update => "Algo salió mal en el servidor.",
      MutationKind::Delete => "No se pudo eliminar el cultivo.",
    }
  }
}

/// A finished request
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
  Loaded(Result<Vec<Crop>, ApiError>),
  Mutated {
    kind: MutationKind,
    result: Result<ApiMessage, ApiError>,
  },
}

/// User-facing text for a finished mutation, and whether it is an error
pub fn feedback(kind: MutationKind, result: &Result<ApiMessage, ApiError>) -> (String, bool) {
  match result {
    Ok(msg) => (
      msg
        .message
        .clone()
        .unwrap_or_else(|| kind.default_success().to_string()),
      false,
    ),
    Err(ApiError::Rejected { status, message }) => (
      format!(
        "Error {}: {}",
        status,
        message.as_deref().unwrap_or(kind.default_failure())
      ),
      true,
    ),
    Err(ApiError::Connectivity(_)) => (CONNECTIVITY_MESSAGE.to_string(), true),
  }
}

/// Issues requests and collects their outcomes
pub struct SyncLayer {
  api: Arc<dyn CropApi>,
  tx: mpsc::UnboundedSender<SyncOutcome>,
  rx: mpsc::UnboundedReceiver<SyncOutcome>,
  pending_loads: usize,
}

impl SyncLayer {
  pub fn new(api: Arc<dyn CropApi>) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      api,
      tx,
      rx,
      pending_loads: 0,
    }
  }

  /// Whether a full reload is in flight
  pub fn is_loading(&self) -> bool {
    self.pending_loads > 0
  }

  /// Fetch the whole collection
  pub fn load_all(&mut self) {
    self.pending_loads += 1;
    let api = self.api.clone();
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = api.list().await;
      // Ignore send errors - the view may be gone
      let _ = tx.send(SyncOutcome::Loaded(result));
    });
  }

  pub fn create(&self, payload: CropPayload) {
    info!(name = %payload.name, "Creating crop");
    let api = self.api.clone();
    self.spawn_mutation(MutationKind::Create, async move {
      api.create(payload).await
    });
  }

  /// Update the crop stored under `original_name`. The payload may carry a
  /// different name.
  pub fn update(&self, original_name: String, payload: CropPayload) {
    info!(original = %original_name, name = %payload.name, "Updating crop");
    let api = self.api.clone();
    self.spawn_mutation(MutationKind::Update, async move {
      api.update(original_name, payload).await
    });
  }

  /// Delete a crop. Confirmation happens before this is called.
  pub fn delete(&self, name: String) {
    info!(%name, "Deleting crop");
    let api = self.api.clone();
    self.spawn_mutation(MutationKind::Delete, async move {
      api.delete(name).await
    });
  }

  fn spawn_mutation<F>(&self, kind: MutationKind, request: F)
  where
    F: std::future::Future<Output = Result<ApiMessage, ApiError>> + Send + 'static,
  {
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = request.await;
      let _ = tx.send(SyncOutcome::Mutated { kind, result });
    });
  }

  /// Drain finished requests without blocking.
  ///
  /// Successful mutations schedule a reload before being returned.
  pub fn poll(&mut self) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::new();

    while let Ok(outcome) = self.rx.try_recv() {
      match &outcome {
        SyncOutcome::Loaded(Ok(crops)) => {
          self.pending_loads = self.pending_loads.saturating_sub(1);
          debug!(count = crops.len(), "Crops loaded");
        }
        SyncOutcome::Loaded(Err(e)) => {
          self.pending_loads = self.pending_loads.saturating_sub(1);
          warn!(error = %e, "Failed to load crops");
        }
        SyncOutcome::Mutated {
          kind,
          result: Ok(_),
        } => {
          debug!(?kind, "Mutation succeeded, reloading");
          self.load_all();
        }
        SyncOutcome::Mutated {
          kind,
          result: Err(e),
        } => {
          warn!(?kind, error = %e, "Mutation failed");
        }
      }
      outcomes.push(outcome);
    }

    outcomes
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::fake::{crop, Call, FakeApi};
  use std::time::Duration;

  /// Poll until at least `count` outcomes arrived or give up
  async fn collect(sync: &mut SyncLayer, count: usize) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..100 {
      outcomes.extend(sync.poll());
      if outcomes.len() >= count {
        break;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    outcomes
  }

  fn setup(crops: Vec<Crop>) -> (FakeApi, SyncLayer) {
    let api = FakeApi::new(crops);
    let sync = SyncLayer::new(Arc::new(api.clone()));
    (api, sync)
  }

  #[tokio::test]
  async fn test_load_all_delivers_crops() {
    let (_api, mut sync) = setup(vec![crop("Tomate", 1.0, 2.0)]);

    sync.load_all();
    assert!(sync.is_loading());

    let outcomes = collect(&mut sync, 1).await;
    assert_eq!(
      outcomes,
      vec![SyncOutcome::Loaded(Ok(vec![crop("Tomate", 1.0, 2.0)]))]
    );
    assert!(!sync.is_loading());
  }

  #[tokio::test]
  async fn test_load_failure_is_reported_once() {
    let (api, mut sync) = setup(Vec::new());
    api.fail_list(ApiError::Connectivity("refused".to_string()));

    sync.load_all();
    let outcomes = collect(&mut sync, 1).await;

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
      outcomes[0],
      SyncOutcome::Loaded(Err(ApiError::Connectivity(_)))
    ));
    // No retry
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(sync.poll().is_empty());
    assert_eq!(api.list_calls(), 1);
  }

  #[tokio::test]
  async fn test_successful_create_triggers_reload() {
    let (api, mut sync) = setup(vec![crop("Ajo", 0.5, 1.0)]);
    let payload = CropPayload::from(&crop("Ajo", 0.5, 1.0));

    sync.create(payload.clone());
    let outcomes = collect(&mut sync, 2).await;

    assert!(matches!(
      outcomes[0],
      SyncOutcome::Mutated {
        kind: MutationKind::Create,
        result: Ok(_)
      }
    ));
    assert!(matches!(outcomes[1], SyncOutcome::Loaded(Ok(_))));
    assert_eq!(api.calls(), vec![Call::Create(payload), Call::List]);
  }

  #[tokio::test]
  async fn test_successful_update_and_delete_trigger_reload() {
    let (api, mut sync) = setup(Vec::new());
    let payload = CropPayload::from(&crop("Cebolla", 1.0, 1.0));

    sync.update("Cebollas".to_string(), payload.clone());
    collect(&mut sync, 2).await;
    sync.delete("Cebolla".to_string());
    collect(&mut sync, 2).await;

    assert_eq!(
      api.calls(),
      vec![
        Call::Update("Cebollas".to_string(), payload),
        Call::List,
        Call::Delete("Cebolla".to_string()),
        Call::List,
      ]
    );
  }

  #[tokio::test]
  async fn test_failed_mutation_does_not_reload() {
    let (api, mut sync) = setup(Vec::new());
    api.respond_to_mutations(Err(ApiError::Rejected {
      status: 404,
      message: Some("no encontrado".to_string()),
    }));

    sync.delete("Nada".to_string());
    let outcomes = collect(&mut sync, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(sync.poll().is_empty());

    assert_eq!(outcomes.len(), 1);
    assert_eq!(api.list_calls(), 0);
  }

  #[test]
  fn test_feedback_uses_server_message() {
    let ok = Ok(ApiMessage {
      message: Some("Cultivo 'Ajo' añadido correctamente.".to_string()),
      error: None,
    });
    assert_eq!(
      feedback(MutationKind::Create, &ok),
      ("Cultivo 'Ajo' añadido correctamente.".to_string(), false)
    );
  }

  #[test]
  fn test_feedback_defaults() {
    let ok = Ok(ApiMessage::default());
    assert_eq!(feedback(MutationKind::Update, &ok).0, "Cultivo actualizado.");
    assert_eq!(feedback(MutationKind::Delete, &ok).0, "Cultivo eliminado.");

    let rejected = Err(ApiError::Rejected {
      status: 500,
      message: None,
    });
    assert_eq!(
      feedback(MutationKind::Create, &rejected),
      ("Error 500: Algo salió mal en el servidor.".to_string(), true)
    );
    assert_eq!(
      feedback(MutationKind::Delete, &rejected).0,
      "Error 500: No se pudo eliminar el cultivo."
    );
  }

  #[test]
  fn test_feedback_rejection_with_message_and_connectivity() {
    let rejected = Err(ApiError::Rejected {
      status: 400,
      message: Some("Formato de fecha inválido.".to_string()),
    });
    assert_eq!(
      feedback(MutationKind::Create, &rejected).0,
      "Error 400: Formato de fecha inválido."
    );

    let down = Err(ApiError::Connectivity("refused".to_string()));
    assert_eq!(
      feedback(MutationKind::Update, &down),
      ("Error de conexión con la API.".to_string(), true)
    );
  }
}
