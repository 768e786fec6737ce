//! Per-login booking state.
//!
//! Holds what the user entered between requests: the last search and the
//! requester draft. A new search or a successful booking resets it.

use serde::{Deserialize, Serialize};

use crate::admission::{Requester, Selection, Supplementary};
use crate::catalog::CatalogQuery;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: CatalogQuery,
    pub reason: Option<String>,
}

/// Requester fields kept while the user fills the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterDraft {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub cost_center: Option<String>,
}

impl RequesterDraft {
    /// Overwrite the fields present in `update`.
    pub fn merge(&mut self, update: RequesterDraft) {
        if update.first_name.is_some() {
            self.first_name = update.first_name;
        }
        if update.last_name.is_some() {
            self.last_name = update.last_name;
        }
        if update.manager.is_some() {
            self.manager = update.manager;
        }
        if update.cost_center.is_some() {
            self.cost_center = update.cost_center;
        }
    }
}

/// A booking request where any field may be left to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPatch {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub requester: RequesterDraft,
    #[serde(default)]
    pub supplementary: Supplementary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSession {
    pub search: Option<SearchState>,
    pub draft: RequesterDraft,
}

impl BookingSession {
    /// Start a new search. The previous draft is discarded.
    pub fn begin_search(&mut self, query: CatalogQuery, reason: Option<String>) {
        self.search = Some(SearchState { query, reason });
        self.draft = RequesterDraft::default();
    }

    pub fn update_draft(&mut self, update: RequesterDraft) {
        self.draft.merge(update);
    }

    /// Combine `patch` with the session; values in `patch` win.
    pub fn fill(&self, patch: SelectionPatch) -> Selection {
        let search = self.search.clone().unwrap_or_default();
        let mut draft = self.draft.clone();
        draft.merge(patch.requester);

        Selection {
            customer_id: patch
                .customer_id
                .unwrap_or(search.query.customer_id),
            portfolio: patch.portfolio.or(search.query.portfolio),
            reason: patch.reason.or(search.reason).unwrap_or_default(),
            cost_center: draft.cost_center,
            requester: Requester {
                first_name: draft.first_name.unwrap_or_default(),
                last_name: draft.last_name.unwrap_or_default(),
                manager: draft.manager.unwrap_or_default(),
            },
            supplementary: patch.supplementary,
        }
    }

    pub fn complete_booking(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searched() -> BookingSession {
        let mut session = BookingSession::default();
        session.begin_search(
            CatalogQuery {
                customer_id: "1001".into(),
                portfolio: Some("PORT_A".into()),
            },
            Some("scansione documenti specifici".into()),
        );
        session.update_draft(RequesterDraft {
            first_name: Some("Mario".into()),
            last_name: Some("Rossi".into()),
            manager: None,
            cost_center: Some("CC01".into()),
        });
        session
    }

    #[test]
    fn fill_takes_search_and_draft_values() {
        let selection = searched().fill(SelectionPatch {
            requester: RequesterDraft {
                manager: Some("Bianchi".into()),
                ..RequesterDraft::default()
            },
            ..SelectionPatch::default()
        });
        assert_eq!(selection.customer_id, "1001");
        assert_eq!(selection.portfolio.as_deref(), Some("PORT_A"));
        assert_eq!(selection.reason, "scansione documenti specifici");
        assert_eq!(selection.cost_center.as_deref(), Some("CC01"));
        assert_eq!(selection.requester.first_name, "Mario");
        assert_eq!(selection.requester.manager, "Bianchi");
    }

    #[test]
    fn patch_values_override_session() {
        let selection = searched().fill(SelectionPatch {
            reason: Some("richiesta originali specifici".into()),
            requester: RequesterDraft {
                first_name: Some("Luigi".into()),
                ..RequesterDraft::default()
            },
            ..SelectionPatch::default()
        });
        assert_eq!(selection.reason, "richiesta originali specifici");
        assert_eq!(selection.requester.first_name, "Luigi");
        assert_eq!(selection.requester.last_name, "Rossi");
    }

    #[test]
    fn new_search_clears_the_draft() {
        let mut session = searched();
        session.begin_search(
            CatalogQuery {
                customer_id: "2002".into(),
                portfolio: None,
            },
            None,
        );
        assert_eq!(session.draft, RequesterDraft::default());
        assert_eq!(session.search.as_ref().unwrap().query.customer_id, "2002");
    }

    #[test]
    fn completed_booking_resets_everything() {
        let mut session = searched();
        session.complete_booking();
        assert_eq!(session, BookingSession::default());
    }

    #[test]
    fn empty_session_fills_blank_selection() {
        let selection = BookingSession::default().fill(SelectionPatch::default());
        assert!(selection.customer_id.is_empty());
        assert!(selection.reason.is_empty());
        assert!(selection.portfolio.is_none());
    }
}
