use serde::{Deserialize, Deserializer, Serialize};

use marketdesk_core::Entity;

/// Article identifier (the backend's `codigo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleCode(pub String);

impl ArticleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ArticleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Article as returned by the articles resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "codigo")]
    pub code: ArticleCode,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "deposito", deserialize_with = "deposit_from_number")]
    pub deposit_id: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeposit {
    Integer(i64),
    Float(f64),
}

/// Accepts `1` and `1.0` alike; a fractional deposit id is invalid.
fn deposit_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDeposit::deserialize(deserializer)? {
        RawDeposit::Integer(id) => Ok(id),
        RawDeposit::Float(id) if id.fract() == 0.0 && id.abs() < i64::MAX as f64 => Ok(id as i64),
        RawDeposit::Float(id) => Err(serde::de::Error::custom(format!(
            "deposit id must be integral, got {id}"
        ))),
    }
}

impl Article {
    pub fn new(
        code: impl Into<ArticleCode>,
        description: impl Into<String>,
        price: f64,
        deposit_id: i64,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            price,
            deposit_id,
        }
    }

    /// Display label used next to the selection checkbox.
    pub fn label(&self) -> String {
        format!("{} - ${}", self.description, self.price)
    }
}

impl Entity for Article {
    type Id = ArticleCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_field_names() {
        let json = r#"{"codigo":"A1","descripcion":"Widget","precio":10.5,"deposito":1}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article, Article::new("A1", "Widget", 10.5, 1));
    }

    #[test]
    fn integral_float_deposit_is_accepted() {
        let json = r#"{"codigo":"A1","descripcion":"Widget","precio":10,"deposito":1.0}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.deposit_id, 1);
        assert!(crate::is_eligible(&article));
    }

    #[test]
    fn fractional_deposit_is_rejected() {
        let json = r#"{"codigo":"A1","descripcion":"Widget","precio":10,"deposito":1.5}"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn missing_field_is_rejected() {
        let json = r#"{"codigo":"A1","precio":10,"deposito":1}"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn label_formats_integral_prices_without_decimals() {
        assert_eq!(Article::new("A1", "Widget", 10.0, 1).label(), "Widget - $10");
        assert_eq!(Article::new("A2", "Gadget", 2.5, 1).label(), "Gadget - $2.5");
    }
}
