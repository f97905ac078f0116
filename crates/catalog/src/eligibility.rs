//! Eligibility filter: turns a raw article list into the selectable candidates.
//!
//! An article is a candidate when it has a positive price, belongs to
//! deposit 1, and its description is made only of ASCII letters, digits and
//! whitespace (whole-string match). Candidates are then deduplicated by code,
//! keeping the first eligible occurrence in fetch order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use marketdesk_core::Entity;

use crate::article::Article;

/// Only articles stocked in this deposit can be ordered.
pub const ELIGIBLE_DEPOSIT: i64 = 1;

static DESCRIPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").expect("description pattern is valid"));

/// Predicate half of the filter.
pub fn is_eligible(article: &Article) -> bool {
    article.price > 0.0
        && article.deposit_id == ELIGIBLE_DEPOSIT
        && DESCRIPTION_PATTERN.is_match(&article.description)
}

/// Filter then deduplicate, preserving source order.
pub fn eligible_articles(articles: &[Article]) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .filter(|article| is_eligible(article))
        .filter(|article| seen.insert(article.id().clone()))
        .cloned()
        .collect()
}
