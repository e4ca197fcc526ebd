#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::checked_conversions,
    clippy::panic,
    clippy::panic_in_result_fn,
    trivial_casts,
    trivial_numeric_casts,
    rust_2018_idioms,
    unused_lifetimes,
    unused_import_braces,
    unused_qualifications
)]

use crate::{
    launcher::{mock::MockEnclave, EnclaveLauncher},
    store::{default::SharedStore, Store},
};

pub mod error;
pub mod grpc;
pub mod handler;
pub mod launcher;
pub mod orchestrator;
pub mod server;
pub mod state;
pub mod store;
pub mod types;
pub mod upload;

pub use error::Error;

/// The registry's capability set: an enclave launcher and a transactional
/// store. Request handlers are generic over this trait so that deployments
/// can swap either piece (e.g. a real enclave host for [`MockEnclave`]).
#[async_trait::async_trait]
pub trait Registry: Send + Sync + 'static {
    type Launcher: EnclaveLauncher + Clone;
    type Store: Store + Clone;

    async fn launcher(&self) -> Self::Launcher;
    async fn store(&self) -> Self::Store;
}

#[derive(Clone, Debug)]
pub struct DefaultRegistry<L = MockEnclave, S = SharedStore> {
    pub launcher: L,
    pub store: S,
}

impl<L, S> DefaultRegistry<L, S> {
    pub fn new(launcher: L, store: S) -> Self {
        Self { launcher, store }
    }
}

#[async_trait::async_trait]
impl<L, S> Registry for DefaultRegistry<L, S>
where
    L: EnclaveLauncher + Clone,
    S: Store + Clone,
{
    type Launcher = L;
    type Store = S;

    async fn launcher(&self) -> Self::Launcher {
        self.launcher.clone()
    }

    async fn store(&self) -> Self::Store {
        self.store.clone()
    }
}
