//! Catalog domain module (articles and sellers offered by the backend).
//!
//! Records are immutable once fetched. The only derived data is the
//! candidate list produced by the eligibility filter.

pub mod article;
pub mod eligibility;
pub mod seller;

pub use article::{Article, ArticleCode};
pub use eligibility::{ELIGIBLE_DEPOSIT, eligible_articles, is_eligible};
pub use seller::{Seller, SellerId};
