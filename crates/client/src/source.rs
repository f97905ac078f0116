//! Seams to the backend: where the catalog comes from and where orders go.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use marketdesk_catalog::{Article, Seller};
use marketdesk_purchasing::PurchaseOrderRequest;

use crate::error::ClientError;

/// Provides the raw article and seller lists.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_articles(&self) -> Result<Vec<Article>, ClientError>;

    async fn fetch_sellers(&self) -> Result<Vec<Seller>, ClientError>;
}

/// Accepts a composed purchase order.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn submit_order(
        &self,
        request: &PurchaseOrderRequest,
    ) -> Result<OrderAccepted, ClientError>;
}

/// Success body of the purchase-order resource.
///
/// Any 2xx answer means the order exists, so the message is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    #[serde(default)]
    pub message: Option<String>,
}

impl OrderAccepted {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The server's message, empty when it sent none.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}
