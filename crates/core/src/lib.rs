//! `marketdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;

pub use aggregate::Aggregate;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
