use serde::{Deserialize, Serialize};

use marketdesk_catalog::{ArticleCode, SellerId};
use marketdesk_core::{DomainError, DomainResult};

use crate::draft::OrderDraft;

/// Body of the purchase-order POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderRequest {
    #[serde(rename = "vendedor")]
    pub seller_id: SellerId,
    #[serde(rename = "articulos")]
    pub article_codes: Vec<ArticleCode>,
}

impl PurchaseOrderRequest {
    /// Build the payload from the draft as it is right now.
    pub fn from_draft(draft: &OrderDraft) -> DomainResult<Self> {
        let seller_id = draft
            .seller_id()
            .cloned()
            .ok_or_else(|| DomainError::validation("a seller must be selected"))?;

        if draft.article_codes().is_empty() {
            return Err(DomainError::validation("at least one article must be selected"));
        }

        Ok(Self {
            seller_id,
            article_codes: draft.article_codes().as_slice().to_vec(),
        })
    }
}

/// Result shown in the notification after a submission settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SubmissionOutcome {
    Success { message: String },
    Failure { message: String },
}

impl SubmissionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    /// Prefer the server-supplied error; fall back when it is absent or empty.
    pub fn failure(server_error: Option<&str>, fallback: &str) -> Self {
        let message = server_error
            .filter(|msg| !msg.is_empty())
            .unwrap_or(fallback)
            .to_string();
        Self::Failure { message }
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Success { message } | SubmissionOutcome::Failure { message } => {
                message
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }
}

/// Submission lifecycle: `Idle -> Submitting -> (Succeeded | Failed) -> Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Submitting => "Submitting",
            SubmissionState::Succeeded(_) => "Succeeded",
            SubmissionState::Failed(_) => "Failed",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// The outcome awaiting dismissal, if any.
    pub fn outcome(&self) -> Option<SubmissionOutcome> {
        match self {
            SubmissionState::Succeeded(message) => {
                Some(SubmissionOutcome::success(message.clone()))
            }
            SubmissionState::Failed(message) => Some(SubmissionOutcome::Failure {
                message: message.clone(),
            }),
            SubmissionState::Idle | SubmissionState::Submitting => None,
        }
    }
}

impl From<SubmissionOutcome> for SubmissionState {
    fn from(outcome: SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Success { message } => SubmissionState::Succeeded(message),
            SubmissionOutcome::Failure { message } => SubmissionState::Failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Hubo un error al enviar la orden.";

    #[test]
    fn request_serializes_to_backend_shape() {
        let mut draft = OrderDraft::new();
        draft.set_seller(SellerId::new("S1"));
        draft.toggle_article(&ArticleCode::new("A1"));
        draft.toggle_article(&ArticleCode::new("A2"));

        let request = PurchaseOrderRequest::from_draft(&draft).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "vendedor": "S1", "articulos": ["A1", "A2"] })
        );
    }

    #[test]
    fn request_requires_seller() {
        let mut draft = OrderDraft::new();
        draft.toggle_article(&ArticleCode::new("A1"));
        let err = PurchaseOrderRequest::from_draft(&draft).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn request_requires_articles() {
        let mut draft = OrderDraft::new();
        draft.set_seller(SellerId::new("S1"));
        assert!(PurchaseOrderRequest::from_draft(&draft).is_err());
    }

    #[test]
    fn failure_prefers_server_message() {
        let outcome = SubmissionOutcome::failure(Some("Seller inactive"), FALLBACK);
        assert_eq!(outcome.message(), "Seller inactive");
        assert!(!outcome.is_success());
    }

    #[test]
    fn failure_falls_back_when_message_missing_or_empty() {
        assert_eq!(SubmissionOutcome::failure(None, FALLBACK).message(), FALLBACK);
        assert_eq!(SubmissionOutcome::failure(Some(""), FALLBACK).message(), FALLBACK);
    }

    #[test]
    fn settled_states_expose_their_outcome() {
        let state = SubmissionState::from(SubmissionOutcome::success("Order #42 created"));
        assert_eq!(state, SubmissionState::Succeeded("Order #42 created".to_string()));
        assert_eq!(state.outcome(), Some(SubmissionOutcome::success("Order #42 created")));
        assert_eq!(SubmissionState::Submitting.outcome(), None);
    }
}
