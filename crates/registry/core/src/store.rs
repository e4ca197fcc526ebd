use crate::state::{Computation, ComputationId};

pub mod default;

/// The registry's single source of truth.
///
/// All reads and writes of a computation go through
/// [`Store::with_computation`], which runs the given closure under the
/// store's lock — the registry serializes every state transition, so
/// concurrent clients racing for the same role slot see exactly one winner.
#[async_trait::async_trait]
pub trait Store: Send + Sync + 'static {
    type Error: ToString + Send + Sync;

    /// Inserts a freshly created computation.
    async fn create(&self, computation: Computation) -> Result<(), Self::Error>;

    /// Runs `f` against the computation with the given id, returning `None`
    /// when the id is unknown.
    async fn with_computation<F, T>(
        &self,
        id: ComputationId,
        f: F,
    ) -> Result<Option<T>, Self::Error>
    where
        F: FnOnce(&mut Computation) -> T + Send,
        T: Send;
}
