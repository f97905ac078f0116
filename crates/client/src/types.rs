//! Composer state and the snapshots handed to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketdesk_catalog::{Article, Seller, eligible_articles};
use marketdesk_purchasing::{OrderDraft, OrderWorkflow, SubmissionOutcome, SubmissionState};

/// Which catalog list a loading flag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogList {
    Articles,
    Sellers,
}

impl CatalogList {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogList::Articles => "articles",
            CatalogList::Sellers => "sellers",
        }
    }
}

/// Per-list loading flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingState {
    pub articles: bool,
    pub sellers: bool,
}

impl LoadingState {
    pub fn get(&self, list: CatalogList) -> bool {
        match list {
            CatalogList::Articles => self.articles,
            CatalogList::Sellers => self.sellers,
        }
    }

    pub fn set(&mut self, list: CatalogList, loading: bool) {
        match list {
            CatalogList::Articles => self.articles = loading,
            CatalogList::Sellers => self.sellers = loading,
        }
    }

    pub fn any(&self) -> bool {
        self.articles || self.sellers
    }
}

/// Mutable working state owned by the store.
#[derive(Debug, Clone, Default)]
pub struct ComposerState {
    /// Eligible, deduplicated articles. The only selectable list.
    pub candidates: Vec<Article>,
    pub sellers: Vec<Seller>,
    pub loading: LoadingState,
    pub workflow: OrderWorkflow,
    pub articles_fetched_at: Option<DateTime<Utc>>,
    pub sellers_fetched_at: Option<DateTime<Utc>>,
}

impl ComposerState {
    /// Replace the article list with the candidates derived from `raw`.
    pub fn set_articles(&mut self, raw: &[Article]) {
        self.candidates = eligible_articles(raw);
        self.articles_fetched_at = Some(Utc::now());
    }

    pub fn set_sellers(&mut self, sellers: Vec<Seller>) {
        self.sellers = sellers;
        self.sellers_fetched_at = Some(Utc::now());
    }

    pub fn find_candidate(&self, article: &Article) -> Option<&Article> {
        self.candidates.iter().find(|a| a.code == article.code)
    }

    pub fn snapshot(&self, revision: u64) -> ComposerSnapshot {
        ComposerSnapshot {
            revision,
            candidates: self.candidates.clone(),
            sellers: self.sellers.clone(),
            loading: self.loading,
            draft: self.workflow.draft().clone(),
            submission: self.workflow.state().clone(),
            submit_enabled: self.workflow.is_submit_enabled(),
            articles_fetched_at: self.articles_fetched_at,
            sellers_fetched_at: self.sellers_fetched_at,
        }
    }
}

/// Read-only view of the composer after a committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerSnapshot {
    /// Increases by one per committed mutation.
    pub revision: u64,
    pub candidates: Vec<Article>,
    pub sellers: Vec<Seller>,
    pub loading: LoadingState,
    pub draft: OrderDraft,
    pub submission: SubmissionState,
    /// Seller chosen and at least one article selected.
    pub submit_enabled: bool,
    pub articles_fetched_at: Option<DateTime<Utc>>,
    pub sellers_fetched_at: Option<DateTime<Utc>>,
}

impl ComposerSnapshot {
    pub fn is_submitting(&self) -> bool {
        self.submission.is_submitting()
    }

    /// Whether the submit action should be clickable.
    pub fn submit_action_enabled(&self) -> bool {
        self.submit_enabled && self.submission == SubmissionState::Idle
    }

    pub fn notification(&self) -> Option<SubmissionOutcome> {
        self.submission.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_flags_are_independent() {
        let mut loading = LoadingState::default();
        loading.set(CatalogList::Articles, true);
        assert!(loading.get(CatalogList::Articles));
        assert!(!loading.get(CatalogList::Sellers));
        assert!(loading.any());

        loading.set(CatalogList::Articles, false);
        assert!(!loading.any());
    }

    #[test]
    fn set_articles_keeps_only_candidates() {
        let mut state = ComposerState::default();
        state.set_articles(&[
            Article::new("A1", "Widget", 10.0, 1),
            Article::new("A1", "Widget Dup", 10.0, 1),
            Article::new("B2", "Bolt!", 1.0, 1),
        ]);

        assert_eq!(state.candidates.len(), 1);
        assert!(state.articles_fetched_at.is_some());
        assert!(state.find_candidate(&Article::new("A1", "anything", 0.0, 9)).is_some());
        assert!(state.find_candidate(&Article::new("B2", "Bolt!", 1.0, 1)).is_none());
    }
}
