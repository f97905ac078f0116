//! Order composer: loads the catalog, tracks selections, submits orders.
//!
//! All state lives in a [`ComposerStore`]; the composer translates operator
//! actions into workflow commands and performs the network calls in between.
//! Background loads and submissions only hold a weak reference, so dropping
//! every composer handle makes late responses a no-op.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use marketdesk_catalog::{Article, Seller};
use marketdesk_core::{Aggregate, DomainError};
use marketdesk_purchasing::{
    OrderWorkflowCommand, OrderWorkflowEvent, PurchaseOrderRequest, SubmissionOutcome,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::HttpBackend;
use crate::source::{CatalogSource, OrderSink};
use crate::store::{ComposerStore, Subscription};
use crate::types::{CatalogList, ComposerSnapshot, ComposerState, LoadingState};

struct Inner {
    catalog: Arc<dyn CatalogSource>,
    sink: Arc<dyn OrderSink>,
    store: ComposerStore,
    catalog_requested: AtomicBool,
    /// Bumped by every catalog load; only the newest load may commit.
    catalog_generation: AtomicU64,
    fallback_error_message: String,
    submit_label: String,
}

impl Inner {
    fn dispatch(
        &self,
        command: OrderWorkflowCommand,
    ) -> Result<Vec<OrderWorkflowEvent>, DomainError> {
        let result = self
            .store
            .try_update(|state| state.workflow.execute(&command));

        match &result {
            Ok(events) => {
                for event in events {
                    tracing::debug!(event_type = event.event_type(), "workflow event applied");
                }
            }
            Err(err) => tracing::debug!(error = %err, ?command, "workflow command rejected"),
        }
        result
    }

    fn is_current_load(&self, generation: u64) -> bool {
        self.catalog_generation.load(Ordering::SeqCst) == generation
    }
}

/// Cheap-to-clone handle; all clones share one state.
#[derive(Clone)]
pub struct OrderComposer {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for OrderComposer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderComposer")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl OrderComposer {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        sink: Arc<dyn OrderSink>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                catalog,
                sink,
                store: ComposerStore::new(),
                catalog_requested: AtomicBool::new(false),
                catalog_generation: AtomicU64::new(0),
                fallback_error_message: config.fallback_error_message.clone(),
                submit_label: config.submit_label.clone(),
            }),
        }
    }

    /// Composer backed by the HTTP API described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let backend = Arc::new(HttpBackend::new(config)?);
        Ok(Self::new(backend.clone(), backend, config))
    }

    // ---- catalog ----

    /// Start the initial catalog load in the background.
    ///
    /// Returns `None` if the catalog was already requested.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if !self.claim_catalog_load() {
            return None;
        }
        Some(tokio::spawn(load_catalog_lists(Arc::downgrade(&self.inner))))
    }

    /// Fetch articles and sellers once; later calls are no-ops.
    pub async fn load_catalog(&self) {
        if !self.claim_catalog_load() {
            tracing::debug!("catalog already requested; skipping load");
            return;
        }
        load_catalog_lists(Arc::downgrade(&self.inner)).await;
    }

    /// Fetch both lists again, dropping selections that are no longer candidates.
    ///
    /// Supersedes any load still in flight; its late response is discarded.
    pub async fn reload_catalog(&self) {
        self.inner.catalog_requested.store(true, Ordering::SeqCst);
        load_catalog_lists(Arc::downgrade(&self.inner)).await;
    }

    fn claim_catalog_load(&self) -> bool {
        !self.inner.catalog_requested.swap(true, Ordering::SeqCst)
    }

    pub fn candidates(&self) -> Vec<Article> {
        self.inner.store.read(|s| s.candidates.clone())
    }

    pub fn sellers(&self) -> Vec<Seller> {
        self.inner.store.read(|s| s.sellers.clone())
    }

    pub fn loading(&self) -> LoadingState {
        self.inner.store.read(|s| s.loading)
    }

    // ---- selection ----

    /// Flip the article's selection. Returns whether it is selected afterwards.
    ///
    /// Articles that are not current candidates are ignored.
    pub fn toggle_article(&self, article: &Article) -> bool {
        let result = self.inner.store.try_update(|state| {
            let code = state
                .find_candidate(article)
                .map(|a| a.code.clone())
                .ok_or_else(|| {
                    DomainError::not_found(format!("article {} is not a candidate", article.code))
                })?;
            state
                .workflow
                .execute(&OrderWorkflowCommand::ToggleArticle { code: code.clone() })?;
            Ok::<_, DomainError>(state.workflow.draft().is_selected(&code))
        });

        match result {
            Ok(selected) => {
                tracing::debug!(code = %article.code, selected, "article toggled");
                selected
            }
            Err(err) => {
                tracing::debug!(error = %err, "toggle ignored");
                false
            }
        }
    }

    pub fn set_seller(&self, seller: &Seller) {
        let _ = self.dispatch(OrderWorkflowCommand::SelectSeller {
            seller_id: seller.id.clone(),
        });
    }

    /// Seller chosen and at least one article selected.
    pub fn is_submit_enabled(&self) -> bool {
        self.inner.store.read(|s| s.workflow.is_submit_enabled())
    }

    // ---- submission ----

    pub fn is_submitting(&self) -> bool {
        self.inner.store.read(|s| s.workflow.state().is_submitting())
    }

    /// Label for the submit action; `None` means show the busy indicator.
    pub fn submit_label(&self) -> Option<String> {
        if self.is_submitting() {
            None
        } else {
            Some(self.inner.submit_label.clone())
        }
    }

    /// Submit the current draft and wait for the backend's answer.
    ///
    /// Returns `None` without contacting the backend when submission is not
    /// allowed: nothing to submit, already submitting, or a notification is
    /// still open.
    ///
    /// The request runs on its own task. Dropping this future does not abort
    /// it; the outcome still lands in the state as a notification.
    pub async fn submit(&self) -> Option<SubmissionOutcome> {
        let events = self.dispatch(OrderWorkflowCommand::BeginSubmission).ok()?;
        let request = events.into_iter().find_map(|event| match event {
            OrderWorkflowEvent::SubmissionStarted { request } => Some(request),
            _ => None,
        })?;

        let attempt_id = Uuid::now_v7();
        let span = tracing::info_span!(
            "submit_order",
            %attempt_id,
            seller_id = %request.seller_id,
            articles = request.article_codes.len(),
        );
        let task = tokio::spawn(
            run_submission(
                Arc::downgrade(&self.inner),
                self.inner.sink.clone(),
                self.inner.fallback_error_message.clone(),
                request,
            )
            .instrument(span),
        );

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "submission task failed");
                let outcome = SubmissionOutcome::failure(None, &self.inner.fallback_error_message);
                self.dispatch(OrderWorkflowCommand::CompleteSubmission {
                    outcome: outcome.clone(),
                })
                .ok()?;
                Some(outcome)
            }
        }
    }

    /// Outcome waiting to be dismissed, if any.
    pub fn notification(&self) -> Option<SubmissionOutcome> {
        self.inner.store.read(|s| s.workflow.notification())
    }

    /// Close the notification and return to idle.
    ///
    /// A dismissed success clears the draft; a dismissed failure keeps it.
    pub fn dismiss_notification(&self) -> Option<SubmissionOutcome> {
        let result = self.inner.store.try_update(|state| {
            let outcome = state.workflow.notification();
            state
                .workflow
                .execute(&OrderWorkflowCommand::DismissNotification)?;
            Ok::<_, DomainError>(outcome)
        });

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(error = %err, "dismiss ignored");
                None
            }
        }
    }

    // ---- observation ----

    pub fn snapshot(&self) -> ComposerSnapshot {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> Subscription {
        self.inner.store.subscribe()
    }

    fn dispatch(
        &self,
        command: OrderWorkflowCommand,
    ) -> Result<Vec<OrderWorkflowEvent>, DomainError> {
        self.inner.dispatch(command)
    }
}

async fn run_submission(
    weak: Weak<Inner>,
    sink: Arc<dyn OrderSink>,
    fallback_error_message: String,
    request: PurchaseOrderRequest,
) -> Option<SubmissionOutcome> {
    let outcome = match sink.submit_order(&request).await {
        Ok(accepted) => {
            tracing::info!(server_message = accepted.message(), "purchase order accepted");
            SubmissionOutcome::success(accepted.message.unwrap_or_default())
        }
        Err(err) => {
            tracing::warn!(error = %err, "purchase order failed");
            SubmissionOutcome::failure(err.server_message(), &fallback_error_message)
        }
    };

    let Some(inner) = weak.upgrade() else {
        tracing::debug!("composer dropped; discarding submission outcome");
        return None;
    };
    inner
        .dispatch(OrderWorkflowCommand::CompleteSubmission {
            outcome: outcome.clone(),
        })
        .ok()?;
    Some(outcome)
}

/// Clears a loading flag when dropped, including on cancellation.
///
/// A superseded load leaves the flag to the load that replaced it.
struct LoadingGuard {
    inner: Weak<Inner>,
    list: CatalogList,
    generation: u64,
}

impl LoadingGuard {
    fn start(inner: &Arc<Inner>, list: CatalogList, generation: u64) -> Self {
        inner.store.update(|s| s.loading.set(list, true));
        Self {
            inner: Arc::downgrade(inner),
            list,
            generation,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let list = self.list;
        if let Some(inner) = self.inner.upgrade() {
            if inner.is_current_load(self.generation) {
                inner.store.update(|s| s.loading.set(list, false));
            }
        }
    }
}

fn begin_load(
    weak: &Weak<Inner>,
    list: CatalogList,
    generation: u64,
) -> Option<(Arc<dyn CatalogSource>, LoadingGuard)> {
    let inner = weak.upgrade()?;
    let guard = LoadingGuard::start(&inner, list, generation);
    Some((inner.catalog.clone(), guard))
}

/// Commit `apply` if the composer is alive and no newer load has started.
fn commit_loaded(
    weak: &Weak<Inner>,
    list: CatalogList,
    generation: u64,
    apply: impl FnOnce(&mut ComposerState),
) {
    let Some(inner) = weak.upgrade() else {
        tracing::debug!(list = list.as_str(), "composer dropped; discarding late response");
        return;
    };

    let committed = inner.store.try_update(|state| {
        if !inner.is_current_load(generation) {
            return Err(());
        }
        apply(state);
        Ok(())
    });
    if committed.is_err() {
        tracing::debug!(list = list.as_str(), generation, "superseded load; discarding response");
    }
}

async fn load_catalog_lists(weak: Weak<Inner>) {
    let Some(generation) = weak
        .upgrade()
        .map(|inner| inner.catalog_generation.fetch_add(1, Ordering::SeqCst) + 1)
    else {
        return;
    };
    tokio::join!(
        load_articles(weak.clone(), generation),
        load_sellers(weak, generation)
    );
}

async fn load_articles(weak: Weak<Inner>, generation: u64) {
    let Some((source, guard)) = begin_load(&weak, CatalogList::Articles, generation) else {
        return;
    };

    let raw = match source.fetch_articles().await {
        Ok(articles) => articles,
        Err(err) => {
            tracing::warn!(error = %err, "article fetch failed; showing empty list");
            Vec::new()
        }
    };

    commit_loaded(&weak, CatalogList::Articles, generation, |state| {
        state.set_articles(&raw);
        let candidates = state.candidates.iter().map(|a| a.code.clone()).collect();
        if let Err(err) = state
            .workflow
            .execute(&OrderWorkflowCommand::RetainArticles { candidates })
        {
            tracing::debug!(error = %err, "selection pruning rejected");
        }
        tracing::info!(
            fetched = raw.len(),
            candidates = state.candidates.len(),
            "articles loaded"
        );
    });
    drop(guard);
}

async fn load_sellers(weak: Weak<Inner>, generation: u64) {
    let Some((source, guard)) = begin_load(&weak, CatalogList::Sellers, generation) else {
        return;
    };

    let sellers = match source.fetch_sellers().await {
        Ok(sellers) => sellers,
        Err(err) => {
            tracing::warn!(error = %err, "seller fetch failed; showing empty list");
            Vec::new()
        }
    };

    commit_loaded(&weak, CatalogList::Sellers, generation, |state| {
        tracing::info!(sellers = sellers.len(), "sellers loaded");
        state.set_sellers(sellers);
    });
    drop(guard);
}
