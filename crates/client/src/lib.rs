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

pub mod attestation;
pub mod client;
pub mod crypto;
pub mod error;
pub mod participant;
pub mod upload;

pub use attestation::VerifiedIdentity;
pub use client::{GrpcRegistryClient, LocalRegistryClient, RegistryClient};
pub use crypto::CryptoContext;
pub use error::Error;
pub use participant::{Participant, PollOpts};
