// Project store: the in-memory workspace shared by all handlers.
// Lives as long as the process; nothing is persisted.

pub mod handlers;
pub mod state;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::errors::AppError;
use state::WorkspaceState;

/// Owns the current `WorkspaceState` snapshot.
///
/// Transitions are applied under the write lock and replace the snapshot
/// wholesale. The lock is never held across an await on the network.
#[derive(Debug, Default)]
pub struct Workspace {
    state: RwLock<WorkspaceState>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> WorkspaceState {
        self.state.read().await.clone()
    }

    /// Applies a fallible transition. On error the snapshot is left as it was.
    pub async fn apply<T, F>(&self, transition: F) -> Result<T, AppError>
    where
        F: FnOnce(&WorkspaceState) -> Result<(WorkspaceState, T), AppError>,
    {
        let mut guard = self.state.write().await;
        let (next, output) = transition(&*guard)?;
        *guard = next;
        Ok(output)
    }

    /// Applies a transition that cannot fail.
    pub async fn update<F>(&self, transition: F)
    where
        F: FnOnce(&WorkspaceState) -> WorkspaceState,
    {
        let mut guard = self.state.write().await;
        let next = transition(&*guard);
        *guard = next;
    }

    /// Applies a transition without awaiting, for use from `Drop`.
    ///
    /// Takes the lock immediately when it is free; otherwise the transition
    /// runs on a spawned task as soon as the lock is released.
    pub fn update_detached<F>(self: &Arc<Self>, transition: F)
    where
        F: FnOnce(&WorkspaceState) -> WorkspaceState + Send + 'static,
    {
        match self.state.try_write() {
            Ok(mut guard) => {
                let next = transition(&*guard);
                *guard = next;
            }
            Err(_) => {
                let workspace = Arc::clone(self);
                tokio::spawn(async move { workspace.update(transition).await });
            }
        }
    }
}
