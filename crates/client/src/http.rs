//! HTTP backend for the purchasing API.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use marketdesk_catalog::{Article, Seller};
use marketdesk_purchasing::PurchaseOrderRequest;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::source::{CatalogSource, OrderAccepted, OrderSink};

pub const ARTICLES_PATH: &str = "/Articles";
pub const SELLERS_PATH: &str = "/Sellers";
pub const PURCHASE_ORDERS_PATH: &str = "/PurchaseOrders";

#[derive(Debug, Deserialize)]
struct ArticlesEnvelope {
    #[serde(default)]
    articulos: Option<Vec<Article>>,
}

#[derive(Debug, Deserialize)]
struct SellersEnvelope {
    #[serde(default)]
    vendedores: Option<Vec<Seller>>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Talks to the purchasing API over HTTP. Implements both seams.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                error: parse_error_body(&body),
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

fn parse_error_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .unwrap_or_default()
        .error
}

#[async_trait]
impl CatalogSource for HttpBackend {
    async fn fetch_articles(&self) -> Result<Vec<Article>, ClientError> {
        let envelope: ArticlesEnvelope = self.get_json(ARTICLES_PATH).await?;
        Ok(envelope.articulos.unwrap_or_default())
    }

    async fn fetch_sellers(&self) -> Result<Vec<Seller>, ClientError> {
        let envelope: SellersEnvelope = self.get_json(SELLERS_PATH).await?;
        Ok(envelope.vendedores.unwrap_or_default())
    }
}

#[async_trait]
impl OrderSink for HttpBackend {
    async fn submit_order(
        &self,
        request: &PurchaseOrderRequest,
    ) -> Result<OrderAccepted, ClientError> {
        let url = self.url(PURCHASE_ORDERS_PATH);
        tracing::debug!(%url, articles = request.article_codes.len(), "POST");

        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                error: parse_error_body(&body),
            });
        }

        Ok(parse_accepted_body(&body))
    }
}

fn parse_accepted_body(body: &str) -> OrderAccepted {
    serde_json::from_str(body).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "unreadable success body; order treated as accepted");
        OrderAccepted::default()
    })
}
