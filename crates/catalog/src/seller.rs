use serde::{Deserialize, Serialize};

use marketdesk_core::Entity;

/// Seller identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(pub String);

impl SellerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SellerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SellerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Seller as returned by the sellers resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    #[serde(rename = "descripcion")]
    pub description: String,
}

impl Seller {
    pub fn new(id: impl Into<SellerId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl Entity for Seller {
    type Id = SellerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
