//! Purchasing domain module (order composition and submission lifecycle).
//!
//! This crate contains the business rules for composing a purchase order,
//! implemented purely as deterministic domain logic (no IO, no HTTP). The
//! caller performs the actual submission and reports its result back as a
//! command.

pub mod draft;
pub mod order;
pub mod workflow;

pub use draft::{OrderDraft, SelectionSet};
pub use order::{PurchaseOrderRequest, SubmissionOutcome, SubmissionState};
pub use workflow::{OrderWorkflow, OrderWorkflowCommand, OrderWorkflowEvent};
