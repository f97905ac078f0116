//! Order composition workflow (selection + submission state machine).
//!
//! The workflow is an aggregate: the caller sends commands, gets back events,
//! and the events are applied to evolve state. Network calls live outside;
//! their results come back in as `CompleteSubmission`.

use marketdesk_catalog::{ArticleCode, SellerId};
use marketdesk_core::{Aggregate, DomainError};

use crate::draft::OrderDraft;
use crate::order::{PurchaseOrderRequest, SubmissionOutcome, SubmissionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderWorkflowCommand {
    ToggleArticle { code: ArticleCode },
    SelectSeller { seller_id: SellerId },
    /// Drop selected codes that are not in `candidates` (after a catalog reload).
    RetainArticles { candidates: Vec<ArticleCode> },
    BeginSubmission,
    CompleteSubmission { outcome: SubmissionOutcome },
    DismissNotification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderWorkflowEvent {
    ArticleSelected { code: ArticleCode },
    ArticleDeselected { code: ArticleCode },
    SellerSelected { seller_id: SellerId },
    ArticlesPruned { removed: Vec<ArticleCode> },
    SubmissionStarted { request: PurchaseOrderRequest },
    SubmissionSucceeded { message: String },
    SubmissionFailed { message: String },
    /// `draft_reset` is true when the dismissed outcome was a success.
    NotificationDismissed { draft_reset: bool },
}

impl OrderWorkflowEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderWorkflowEvent::ArticleSelected { .. } => "purchasing.draft.article_selected",
            OrderWorkflowEvent::ArticleDeselected { .. } => "purchasing.draft.article_deselected",
            OrderWorkflowEvent::SellerSelected { .. } => "purchasing.draft.seller_selected",
            OrderWorkflowEvent::ArticlesPruned { .. } => "purchasing.draft.articles_pruned",
            OrderWorkflowEvent::SubmissionStarted { .. } => "purchasing.submission.started",
            OrderWorkflowEvent::SubmissionSucceeded { .. } => "purchasing.submission.succeeded",
            OrderWorkflowEvent::SubmissionFailed { .. } => "purchasing.submission.failed",
            OrderWorkflowEvent::NotificationDismissed { .. } => {
                "purchasing.submission.notification_dismissed"
            }
        }
    }
}

/// Aggregate root: the operator's order composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderWorkflow {
    draft: OrderDraft,
    state: SubmissionState,
    version: u64,
}

impl OrderWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.draft.is_submit_enabled()
    }

    /// Whether `BeginSubmission` would be accepted right now.
    pub fn can_submit(&self) -> bool {
        self.state == SubmissionState::Idle && self.draft.is_submit_enabled()
    }

    /// Outcome currently displayed, if any.
    pub fn notification(&self) -> Option<SubmissionOutcome> {
        self.state.outcome()
    }
}

impl Aggregate for OrderWorkflow {
    type Command = OrderWorkflowCommand;
    type Event = OrderWorkflowEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderWorkflowEvent::ArticleSelected { code } => {
                self.draft.select_article(code.clone());
            }
            OrderWorkflowEvent::ArticleDeselected { code } => {
                self.draft.deselect_article(code);
            }
            OrderWorkflowEvent::SellerSelected { seller_id } => {
                self.draft.set_seller(seller_id.clone());
            }
            OrderWorkflowEvent::ArticlesPruned { removed } => {
                self.draft.retain_articles(|code| !removed.contains(code));
            }
            OrderWorkflowEvent::SubmissionStarted { .. } => {
                self.state = SubmissionState::Submitting;
            }
            OrderWorkflowEvent::SubmissionSucceeded { message } => {
                self.state = SubmissionState::Succeeded(message.clone());
            }
            OrderWorkflowEvent::SubmissionFailed { message } => {
                self.state = SubmissionState::Failed(message.clone());
            }
            OrderWorkflowEvent::NotificationDismissed { draft_reset } => {
                if *draft_reset {
                    self.draft.reset();
                }
                self.state = SubmissionState::Idle;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderWorkflowCommand::ToggleArticle { code } => Ok(vec![self.handle_toggle(code)]),
            OrderWorkflowCommand::SelectSeller { seller_id } => {
                Ok(vec![OrderWorkflowEvent::SellerSelected {
                    seller_id: seller_id.clone(),
                }])
            }
            OrderWorkflowCommand::RetainArticles { candidates } => {
                Ok(self.handle_retain(candidates))
            }
            OrderWorkflowCommand::BeginSubmission => self.handle_begin(),
            OrderWorkflowCommand::CompleteSubmission { outcome } => self.handle_complete(outcome),
            OrderWorkflowCommand::DismissNotification => self.handle_dismiss(),
        }
    }
}

impl OrderWorkflow {
    fn handle_toggle(&self, code: &ArticleCode) -> OrderWorkflowEvent {
        if self.draft.is_selected(code) {
            OrderWorkflowEvent::ArticleDeselected { code: code.clone() }
        } else {
            OrderWorkflowEvent::ArticleSelected { code: code.clone() }
        }
    }

    fn handle_retain(&self, candidates: &[ArticleCode]) -> Vec<OrderWorkflowEvent> {
        let removed: Vec<ArticleCode> = self
            .draft
            .article_codes()
            .iter()
            .filter(|code| !candidates.contains(code))
            .cloned()
            .collect();

        if removed.is_empty() {
            Vec::new()
        } else {
            vec![OrderWorkflowEvent::ArticlesPruned { removed }]
        }
    }

    fn handle_begin(&self) -> Result<Vec<OrderWorkflowEvent>, DomainError> {
        if self.state != SubmissionState::Idle {
            return Err(DomainError::conflict(format!(
                "cannot submit while {}",
                self.state.as_str()
            )));
        }

        let request = PurchaseOrderRequest::from_draft(&self.draft)?;
        Ok(vec![OrderWorkflowEvent::SubmissionStarted { request }])
    }

    fn handle_complete(
        &self,
        outcome: &SubmissionOutcome,
    ) -> Result<Vec<OrderWorkflowEvent>, DomainError> {
        if !self.state.is_submitting() {
            return Err(DomainError::invariant(
                "submission result arrived without a submission in flight",
            ));
        }

        let event = match outcome {
            SubmissionOutcome::Success { message } => OrderWorkflowEvent::SubmissionSucceeded {
                message: message.clone(),
            },
            SubmissionOutcome::Failure { message } => OrderWorkflowEvent::SubmissionFailed {
                message: message.clone(),
            },
        };
        Ok(vec![event])
    }

    fn handle_dismiss(&self) -> Result<Vec<OrderWorkflowEvent>, DomainError> {
        let draft_reset = match &self.state {
            SubmissionState::Succeeded(_) => true,
            SubmissionState::Failed(_) => false,
            SubmissionState::Idle | SubmissionState::Submitting => {
                return Err(DomainError::conflict("no notification to dismiss"));
            }
        };
        Ok(vec![OrderWorkflowEvent::NotificationDismissed { draft_reset }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ArticleCode {
        ArticleCode::new(s)
    }

    fn ready_workflow() -> OrderWorkflow {
        let mut wf = OrderWorkflow::new();
        wf.execute(&OrderWorkflowCommand::SelectSeller {
            seller_id: SellerId::new("S1"),
        })
        .unwrap();
        for c in ["A1", "A2"] {
            wf.execute(&OrderWorkflowCommand::ToggleArticle { code: code(c) })
                .unwrap();
        }
        wf
    }

    #[test]
    fn toggle_emits_select_then_deselect() {
        let mut wf = OrderWorkflow::new();
        let first = wf
            .execute(&OrderWorkflowCommand::ToggleArticle { code: code("A1") })
            .unwrap();
        assert_eq!(first, vec![OrderWorkflowEvent::ArticleSelected { code: code("A1") }]);

        let second = wf
            .execute(&OrderWorkflowCommand::ToggleArticle { code: code("A1") })
            .unwrap();
        assert_eq!(second, vec![OrderWorkflowEvent::ArticleDeselected { code: code("A1") }]);
        assert!(wf.draft().article_codes().is_empty());
        assert_eq!(wf.version(), 2);
    }

    #[test]
    fn begin_submission_snapshots_current_selection() {
        let mut wf = ready_workflow();
        let events = wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap();

        match &events[0] {
            OrderWorkflowEvent::SubmissionStarted { request } => {
                assert_eq!(request.seller_id, SellerId::new("S1"));
                assert_eq!(request.article_codes, vec![code("A1"), code("A2")]);
            }
            other => panic!("Expected SubmissionStarted, got {other:?}"),
        }
        assert_eq!(wf.state(), &SubmissionState::Submitting);
    }

    #[test]
    fn begin_submission_rejected_when_disabled() {
        let mut wf = OrderWorkflow::new();
        wf.execute(&OrderWorkflowCommand::SelectSeller {
            seller_id: SellerId::new("S1"),
        })
        .unwrap();

        let err = wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(wf.state(), &SubmissionState::Idle);
    }

    #[test]
    fn reentrant_submission_is_rejected() {
        let mut wf = ready_workflow();
        wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap();
        let version = wf.version();

        let err = wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(wf.version(), version);
        assert!(!wf.can_submit());
    }

    #[test]
    fn cannot_submit_while_notification_open() {
        let mut wf = ready_workflow();
        wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap();
        wf.execute(&OrderWorkflowCommand::CompleteSubmission {
            outcome: SubmissionOutcome::failure(Some("Seller inactive"), "fallback"),
        })
        .unwrap();

        assert!(wf.is_submit_enabled());
        assert!(!wf.can_submit());
        assert!(wf.execute(&OrderWorkflowCommand::BeginSubmission).is_err());
    }

    #[test]
    fn success_then_dismiss_resets_draft() {
        let mut wf = ready_workflow();
        wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap();
        wf.execute(&OrderWorkflowCommand::CompleteSubmission {
            outcome: SubmissionOutcome::success("Order #42 created"),
        })
        .unwrap();
        assert_eq!(
            wf.notification(),
            Some(SubmissionOutcome::success("Order #42 created"))
        );

        let events = wf.execute(&OrderWorkflowCommand::DismissNotification).unwrap();
        assert_eq!(
            events,
            vec![OrderWorkflowEvent::NotificationDismissed { draft_reset: true }]
        );
        assert_eq!(wf.state(), &SubmissionState::Idle);
        assert_eq!(wf.draft().seller_id(), None);
        assert!(wf.draft().article_codes().is_empty());
    }

    #[test]
    fn failure_then_dismiss_keeps_draft() {
        let mut wf = ready_workflow();
        let draft_before = wf.draft().clone();
        wf.execute(&OrderWorkflowCommand::BeginSubmission).unwrap();
        wf.execute(&OrderWorkflowCommand::CompleteSubmission {
            outcome: SubmissionOutcome::failure(Some("Seller inactive"), "fallback"),
        })
        .unwrap();
        assert_eq!(wf.notification().unwrap().message(), "Seller inactive");

        wf.execute(&OrderWorkflowCommand::DismissNotification).unwrap();
        assert_eq!(wf.draft(), &draft_before);
        assert!(wf.can_submit());
    }

    #[test]
    fn completion_without_submission_is_rejected() {
        let mut wf = ready_workflow();
        let err = wf
            .execute(&OrderWorkflowCommand::CompleteSubmission {
                outcome: SubmissionOutcome::success("late"),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn dismiss_without_notification_is_rejected() {
        let mut wf = ready_workflow();
        assert!(wf.execute(&OrderWorkflowCommand::DismissNotification).is_err());
        assert!(wf.draft().is_submit_enabled());
    }

    #[test]
    fn retain_prunes_codes_missing_from_candidates() {
        let mut wf = ready_workflow();
        let events = wf
            .execute(&OrderWorkflowCommand::RetainArticles {
                candidates: vec![code("A2"), code("A9")],
            })
            .unwrap();
        assert_eq!(
            events,
            vec![OrderWorkflowEvent::ArticlesPruned { removed: vec![code("A1")] }]
        );
        assert_eq!(wf.draft().article_codes().as_slice(), &[code("A2")]);
    }

    #[test]
    fn retain_with_nothing_to_prune_emits_nothing() {
        let mut wf = ready_workflow();
        let version = wf.version();
        let events = wf
            .execute(&OrderWorkflowCommand::RetainArticles {
                candidates: vec![code("A1"), code("A2")],
            })
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(wf.version(), version);
    }

    #[test]
    fn event_types_are_namespaced() {
        let event = OrderWorkflowEvent::SubmissionStarted {
            request: PurchaseOrderRequest {
                seller_id: SellerId::new("S1"),
                article_codes: vec![code("A1")],
            },
        };
        assert_eq!(event.event_type(), "purchasing.submission.started");
    }
}
