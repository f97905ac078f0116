//! `marketdesk-client`
//!
//! **Responsibility:** order composer client for the purchasing backend.
//!
//! This crate provides:
//! - Catalog/order seams (`CatalogSource`, `OrderSink`) and their HTTP backend
//! - An observable state container (`ComposerStore`)
//! - The `OrderComposer` workflow: load catalog, select, submit, dismiss
//!
//! Rendering is left to the embedding UI; it reads snapshots and calls the
//! composer's operations.

pub mod composer;
pub mod config;
pub mod error;
pub mod http;
pub mod source;
pub mod store;
pub mod types;

pub use composer::OrderComposer;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpBackend;
pub use source::{CatalogSource, OrderAccepted, OrderSink};
pub use store::{ComposerStore, Subscription};
pub use types::{CatalogList, ComposerSnapshot, ComposerState, LoadingState};
