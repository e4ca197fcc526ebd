#[cfg(feature = "client")]
pub use cinnabar_client as client;
#[cfg(feature = "crypto")]
pub use cinnabar_crypto as crypto;
#[cfg(feature = "proto")]
pub use cinnabar_proto::registry as proto;
#[cfg(feature = "registry")]
pub use cinnabar_registry_core as registry;
