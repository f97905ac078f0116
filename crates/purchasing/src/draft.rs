//! In-progress order selection.

use marketdesk_catalog::{ArticleCode, SellerId};

/// Ordered set of selected article codes (insertion order, unique by code).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    codes: Vec<ArticleCode>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &ArticleCode) -> bool {
        self.codes.contains(code)
    }

    /// Returns `false` if the code was already present.
    pub fn insert(&mut self, code: ArticleCode) -> bool {
        if self.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Returns `false` if the code was not present.
    pub fn remove(&mut self, code: &ArticleCode) -> bool {
        let before = self.codes.len();
        self.codes.retain(|c| c != code);
        self.codes.len() != before
    }

    /// Remove the code if present, otherwise append it.
    ///
    /// Returns whether the code is selected afterwards.
    pub fn toggle(&mut self, code: &ArticleCode) -> bool {
        if self.remove(code) {
            false
        } else {
            self.codes.push(code.clone());
            true
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&ArticleCode) -> bool) {
        self.codes.retain(|c| keep(c));
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArticleCode> {
        self.codes.iter()
    }

    pub fn as_slice(&self) -> &[ArticleCode] {
        &self.codes
    }
}

impl FromIterator<ArticleCode> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ArticleCode>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

/// Seller + articles chosen so far. Reset after a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    seller_id: Option<SellerId>,
    article_codes: SelectionSet,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seller_id(&self) -> Option<&SellerId> {
        self.seller_id.as_ref()
    }

    pub fn article_codes(&self) -> &SelectionSet {
        &self.article_codes
    }

    pub fn is_selected(&self, code: &ArticleCode) -> bool {
        self.article_codes.contains(code)
    }

    /// Returns whether the article is selected afterwards.
    pub fn toggle_article(&mut self, code: &ArticleCode) -> bool {
        self.article_codes.toggle(code)
    }

    pub fn select_article(&mut self, code: ArticleCode) -> bool {
        self.article_codes.insert(code)
    }

    pub fn deselect_article(&mut self, code: &ArticleCode) -> bool {
        self.article_codes.remove(code)
    }

    /// Single-select: replaces any previous seller.
    pub fn set_seller(&mut self, seller_id: SellerId) {
        self.seller_id = Some(seller_id);
    }

    pub fn retain_articles(&mut self, keep: impl FnMut(&ArticleCode) -> bool) {
        self.article_codes.retain(keep);
    }

    pub fn is_submit_enabled(&self) -> bool {
        !self.article_codes.is_empty() && self.seller_id.is_some()
    }

    pub fn reset(&mut self) {
        self.seller_id = None;
        self.article_codes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ArticleCode {
        ArticleCode::new(s)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut draft = OrderDraft::new();
        assert!(draft.toggle_article(&code("A1")));
        assert!(draft.is_selected(&code("A1")));
        assert!(!draft.toggle_article(&code("A1")));
        assert!(draft.article_codes().is_empty());
    }

    #[test]
    fn selection_keeps_insertion_order() {
        let mut draft = OrderDraft::new();
        draft.toggle_article(&code("B2"));
        draft.toggle_article(&code("A1"));
        draft.toggle_article(&code("C3"));
        draft.toggle_article(&code("A1"));
        draft.toggle_article(&code("A1"));
        assert_eq!(
            draft.article_codes().as_slice(),
            &[code("B2"), code("C3"), code("A1")]
        );
    }

    #[test]
    fn set_seller_replaces_previous_selection() {
        let mut draft = OrderDraft::new();
        draft.set_seller(SellerId::new("S1"));
        draft.set_seller(SellerId::new("S2"));
        assert_eq!(draft.seller_id(), Some(&SellerId::new("S2")));
    }

    #[test]
    fn submit_requires_seller_and_articles() {
        let mut draft = OrderDraft::new();
        assert!(!draft.is_submit_enabled());

        draft.set_seller(SellerId::new("S1"));
        assert!(!draft.is_submit_enabled());

        draft.toggle_article(&code("A1"));
        assert!(draft.is_submit_enabled());

        draft.toggle_article(&code("A1"));
        assert!(!draft.is_submit_enabled());
    }

    #[test]
    fn articles_without_seller_cannot_submit() {
        let mut draft = OrderDraft::new();
        draft.toggle_article(&code("A1"));
        assert!(!draft.is_submit_enabled());
    }

    #[test]
    fn reset_clears_everything() {
        let mut draft = OrderDraft::new();
        draft.set_seller(SellerId::new("S1"));
        draft.toggle_article(&code("A1"));
        draft.reset();
        assert_eq!(draft, OrderDraft::new());
    }

    #[test]
    fn selection_set_from_iter_drops_duplicates() {
        let set: SelectionSet = ["A1", "B2", "A1"].into_iter().map(code).collect();
        assert_eq!(set.as_slice(), &[code("A1"), code("B2")]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: toggling the same code twice is a no-op.
            #[test]
            fn double_toggle_restores_selection(
                initial in prop::collection::vec("[A-E][0-2]", 0..10),
                target in "[A-E][0-2]",
            ) {
                let mut draft = OrderDraft::new();
                for c in &initial {
                    draft.toggle_article(&code(c));
                }
                let before = draft.clone();

                draft.toggle_article(&code(&target));
                draft.toggle_article(&code(&target));

                prop_assert_eq!(
                    before.article_codes().iter().collect::<std::collections::BTreeSet<_>>(),
                    draft.article_codes().iter().collect::<std::collections::BTreeSet<_>>()
                );
            }

            /// Property: an empty selection never enables submission.
            #[test]
            fn empty_selection_never_submits(seller in prop::option::of("[A-Z][0-9]{1,3}")) {
                let mut draft = OrderDraft::new();
                if let Some(id) = seller {
                    draft.set_seller(SellerId::new(id));
                }
                prop_assert!(!draft.is_submit_enabled());
            }
        }
    }
}
