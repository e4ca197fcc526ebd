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

pub mod bundle;
pub mod cipher;
pub mod error;
pub mod passphrase;
pub mod quote;
pub mod seal;

pub use bundle::CodeBundle;
pub use cipher::SymmetricKey;
pub use error::Error;
pub use quote::Measurement;
