//! Reservation admission: availability check, selection validation and
//! record construction.
//!
//! All functions are pure. Callers supply the catalog and ledger snapshots
//! and are responsible for their freshness.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::cost_center::CostCenterLookup;
use crate::error::CoreError;
use crate::requirements::{FieldKind, RequirementTable, FIELD_DOCUMENT_TYPES, FIELD_NOTES};
use crate::reservation::{ReservationKey, ReservationRecord};
use crate::types::{is_blank, is_blank_opt, BookingDate};

pub const FIELD_CUSTOMER_ID: &str = "customer_id";
pub const FIELD_PORTFOLIO: &str = "portfolio";
pub const FIELD_REASON: &str = "reason";
pub const FIELD_COST_CENTER: &str = "cost_center";
pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_LAST_NAME: &str = "last_name";
pub const FIELD_MANAGER: &str = "manager";

/// Outcome of [`check_availability`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "existing", rename_all = "snake_case")]
pub enum Availability {
    Available,
    /// Carries the active record holding the key.
    Conflict(ReservationRecord),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub first_name: String,
    pub last_name: String,
    pub manager: String,
}

/// Reason-dependent companion values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplementary {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sub_reason: Option<String>,
    #[serde(default)]
    pub document_types: Vec<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Everything the user entered for one booking attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub customer_id: String,
    #[serde(default)]
    pub portfolio: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub cost_center: Option<String>,
    pub requester: Requester,
    #[serde(default)]
    pub supplementary: Supplementary,
}

impl Selection {
    pub fn portfolio_filter(&self) -> Option<&str> {
        self.portfolio.as_deref().filter(|p| !is_blank(p))
    }

    pub fn cost_center_filter(&self) -> Option<&str> {
        self.cost_center.as_deref().filter(|c| !is_blank(c))
    }
}

/// Which base fields a deployment treats as mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// `false` for the variant that searches a customer across all portfolios.
    pub portfolio_required: bool,
    pub cost_center_required: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            portfolio_required: true,
            cost_center_required: true,
        }
    }
}

/// Look for an active record whose key equals `key`.
///
/// Keys compare as exact, case-sensitive strings. Closed records never
/// conflict.
pub fn check_availability(ledger: &[ReservationRecord], key: &ReservationKey) -> Availability {
    ledger
        .iter()
        .filter(|r| r.is_active())
        .find(|r| {
            r.customer_id == key.customer_id && r.portfolio == key.portfolio && r.reason == key.reason
        })
        .map_or(Availability::Available, |r| Availability::Conflict(r.clone()))
}

/// Check mandatory fields, reason companions and that the selection
/// resolved to at least one catalog item.
pub fn validate_selection(
    selection: &Selection,
    policy: &SelectionPolicy,
    table: &RequirementTable,
    items_found: &[CatalogItem],
) -> Result<(), CoreError> {
    if is_blank(&selection.customer_id) {
        return Err(CoreError::missing(FIELD_CUSTOMER_ID));
    }
    if policy.portfolio_required && selection.portfolio_filter().is_none() {
        return Err(CoreError::missing(FIELD_PORTFOLIO));
    }
    if is_blank(&selection.reason) {
        return Err(CoreError::missing(FIELD_REASON));
    }
    let rule = table.rule_for(&selection.reason).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unknown reason '{}'. Must be one of: {}",
            selection.reason,
            table.reasons().join(", ")
        ))
    })?;
    if policy.cost_center_required && selection.cost_center_filter().is_none() {
        return Err(CoreError::missing(FIELD_COST_CENTER));
    }

    let requester = &selection.requester;
    for (field, value) in [
        (FIELD_FIRST_NAME, &requester.first_name),
        (FIELD_LAST_NAME, &requester.last_name),
        (FIELD_MANAGER, &requester.manager),
    ] {
        if is_blank(value) {
            return Err(CoreError::missing(field));
        }
    }

    let supplementary = &selection.supplementary;
    for required in &rule.required {
        match required.kind {
            FieldKind::FreeText => {
                if is_blank(&supplementary.notes) {
                    return Err(CoreError::missing(FIELD_NOTES));
                }
            }
            FieldKind::SingleChoice | FieldKind::DetailChoice => {
                let value = match required.kind {
                    FieldKind::SingleChoice => supplementary.sub_reason.as_deref(),
                    _ => supplementary.detail.as_deref(),
                };
                let field = required.field();
                if is_blank_opt(value) {
                    return Err(CoreError::missing(field));
                }
                let value = value.unwrap_or_default().trim();
                if !required.allows(value) {
                    return Err(CoreError::Validation(format!(
                        "'{value}' is not a valid choice for {field}"
                    )));
                }
            }
            FieldKind::MultiSelect => {
                let chosen: Vec<&str> = supplementary
                    .document_types
                    .iter()
                    .map(|d| d.trim())
                    .filter(|d| !d.is_empty())
                    .collect();
                if chosen.is_empty() {
                    return Err(CoreError::missing(FIELD_DOCUMENT_TYPES));
                }
                if let Some(bad) = chosen.iter().find(|d| !required.allows(d)) {
                    return Err(CoreError::Validation(format!(
                        "'{bad}' is not a valid choice for {FIELD_DOCUMENT_TYPES}"
                    )));
                }
            }
        }
    }

    if items_found.is_empty() {
        return Err(CoreError::NoMatch {
            customer_id: selection.customer_id.clone(),
            portfolio: selection.portfolio_filter().unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

/// Assemble the ledger row for a validated selection.
///
/// Identity fields come from the first item in store order. When a
/// cost-center lookup is configured and has no row for the customer, the
/// booking fails with [`CoreError::MappingNotFound`].
pub fn build_record(
    items_found: &[CatalogItem],
    selection: &Selection,
    cost_centers: Option<&dyn CostCenterLookup>,
    today: BookingDate,
) -> Result<ReservationRecord, CoreError> {
    let item = items_found.first().ok_or_else(|| CoreError::NoMatch {
        customer_id: selection.customer_id.clone(),
        portfolio: selection.portfolio_filter().unwrap_or_default().to_string(),
    })?;

    let mut header_name = item.header_name.clone();
    let mut cost_center = selection.cost_center_filter().unwrap_or_default().to_string();
    let mut cost_center_portfolio = String::new();

    if let Some(lookup) = cost_centers {
        let mapping = lookup
            .lookup(&item.customer_id, selection.cost_center_filter())
            .ok_or_else(|| CoreError::MappingNotFound {
                customer_id: item.customer_id.clone(),
                cost_center: cost_center.clone(),
            })?;
        header_name = mapping.header_name;
        cost_center = mapping.cost_center;
        cost_center_portfolio = mapping.portfolio_cc;
    }

    let supplementary = &selection.supplementary;
    let trimmed = |value: Option<&String>| value.map(|v| v.trim().to_string()).unwrap_or_default();

    Ok(ReservationRecord {
        portfolio: item.portfolio.clone(),
        customer_id: item.customer_id.clone(),
        reason: selection.reason.clone(),
        request_date: today,
        requester_first_name: selection.requester.first_name.trim().to_string(),
        requester_last_name: selection.requester.last_name.trim().to_string(),
        manager: selection.requester.manager.trim().to_string(),
        notes: supplementary.notes.trim().to_string(),
        sub_reason: trimmed(supplementary.sub_reason.as_ref()),
        document_types: supplementary
            .document_types
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect(),
        detail: trimmed(supplementary.detail.as_ref()),
        booked: true,
        returned: false,
        fulfillment_date: None,
        return_date: None,
        cost_center,
        cost_center_portfolio,
        header_name,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::catalog::item;
    use crate::cost_center::{entry, CostCenterTable};
    use crate::requirements::{ReasonRule, RequiredField, REASON_DELIVERY, REASON_SPECIFIC_SCAN};
    use crate::reservation::record;

    fn today() -> BookingDate {
        BookingDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn selection(reason: &str) -> Selection {
        Selection {
            customer_id: "1001".into(),
            portfolio: Some("PORT_A".into()),
            reason: reason.into(),
            cost_center: Some("CC01".into()),
            requester: Requester {
                first_name: " Mario ".into(),
                last_name: "Rossi".into(),
                manager: "Bianchi".into(),
            },
            supplementary: Supplementary::default(),
        }
    }

    fn choice_table() -> RequirementTable {
        let field = |kind, options: &[&str]| RequiredField {
            kind,
            label: "x".into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            hint: None,
        };
        RequirementTable::new(vec![
            ReasonRule {
                reason: "scan".into(),
                required: vec![
                    field(FieldKind::SingleChoice, &["parziale", "totale"]),
                    field(FieldKind::MultiSelect, &["contratto", "garanzia"]),
                    field(FieldKind::DetailChoice, &[]),
                ],
            },
            ReasonRule {
                reason: "plain".into(),
                required: Vec::new(),
            },
        ])
        .unwrap()
    }

    // -- check_availability --------------------------------------------------

    #[test]
    fn active_record_with_same_key_conflicts() {
        let ledger = vec![record("1001", "PORT_A", "scan whole folder", false)];
        let key = ReservationKey::new("1001", "PORT_A", "scan whole folder");
        assert_matches!(
            check_availability(&ledger, &key),
            Availability::Conflict(existing) if existing.customer_id == "1001"
        );
    }

    #[test]
    fn different_reason_is_available() {
        let ledger = vec![record("1001", "PORT_A", "scan whole folder", false)];
        let key = ReservationKey::new("1001", "PORT_A", "request original documents");
        assert_eq!(check_availability(&ledger, &key), Availability::Available);
    }

    #[test]
    fn closed_record_never_conflicts() {
        let ledger = vec![record("1001", "PORT_A", "scan whole folder", true)];
        let key = ReservationKey::new("1001", "PORT_A", "scan whole folder");
        assert!(check_availability(&ledger, &key).is_available());
    }

    #[test]
    fn key_comparison_is_case_and_whitespace_sensitive() {
        let ledger = vec![record("1001", "PORT_A", "scan whole folder", false)];
        for key in [
            ReservationKey::new("1001", "PORT_A", "Scan whole folder"),
            ReservationKey::new("1001", "PORT_A", "scan whole folder "),
            ReservationKey::new("1001", "port_a", "scan whole folder"),
        ] {
            assert!(check_availability(&ledger, &key).is_available(), "{key}");
        }
    }

    #[test]
    fn repeated_checks_give_the_same_answer() {
        let ledger = vec![
            record("1001", "PORT_A", "scan whole folder", true),
            record("1001", "PORT_A", "scan whole folder", false),
        ];
        let key = ReservationKey::new("1001", "PORT_A", "scan whole folder");
        let first = check_availability(&ledger, &key);
        assert_eq!(first, check_availability(&ledger, &key));
        assert!(!first.is_available());
    }

    #[test]
    fn empty_ledger_is_available() {
        let key = ReservationKey::new("1001", "PORT_A", "x");
        assert!(check_availability(&[], &key).is_available());
    }

    // -- validate_selection --------------------------------------------------

    #[test]
    fn reason_without_companions_passes_regardless_of_notes() {
        let table = RequirementTable::default();
        let items = vec![item("PORT_A", "1001", "1")];
        let mut sel = selection(REASON_DELIVERY);
        assert!(validate_selection(&sel, &SelectionPolicy::default(), &table, &items).is_ok());
        sel.supplementary.notes = "   ".into();
        assert!(validate_selection(&sel, &SelectionPolicy::default(), &table, &items).is_ok());
    }

    #[test]
    fn specific_scan_with_empty_notes_is_missing_notes() {
        let table = RequirementTable::default();
        let items = vec![item("PORT_A", "1001", "1")];
        let mut sel = selection(REASON_SPECIFIC_SCAN);
        sel.supplementary.notes = " \n ".into();
        assert_matches!(
            validate_selection(&sel, &SelectionPolicy::default(), &table, &items),
            Err(CoreError::MissingField { field }) if field == "notes"
        );
        sel.supplementary.notes = "contratto del 2019".into();
        assert!(validate_selection(&sel, &SelectionPolicy::default(), &table, &items).is_ok());
    }

    #[test]
    fn base_fields_are_mandatory_in_order() {
        let table = RequirementTable::default();
        let items = vec![item("PORT_A", "1001", "1")];
        let policy = SelectionPolicy::default();

        let cases: Vec<(&str, Box<dyn Fn(&mut Selection)>)> = vec![
            ("customer_id", Box::new(|s: &mut Selection| s.customer_id = " ".into())),
            ("portfolio", Box::new(|s: &mut Selection| s.portfolio = None)),
            ("reason", Box::new(|s: &mut Selection| s.reason = String::new())),
            ("cost_center", Box::new(|s: &mut Selection| s.cost_center = Some(String::new()))),
            ("first_name", Box::new(|s: &mut Selection| s.requester.first_name = "  ".into())),
            ("last_name", Box::new(|s: &mut Selection| s.requester.last_name = String::new())),
            ("manager", Box::new(|s: &mut Selection| s.requester.manager = String::new())),
        ];
        for (expected, mutate) in cases {
            let mut sel = selection(REASON_DELIVERY);
            mutate(&mut sel);
            assert_matches!(
                validate_selection(&sel, &policy, &table, &items),
                Err(CoreError::MissingField { field }) if field == expected,
                "{expected}"
            );
        }
    }

    #[test]
    fn optional_portfolio_variant_accepts_missing_portfolio() {
        let table = RequirementTable::default();
        let items = vec![item("PORT_A", "1001", "1")];
        let policy = SelectionPolicy {
            portfolio_required: false,
            cost_center_required: false,
        };
        let mut sel = selection(REASON_DELIVERY);
        sel.portfolio = None;
        sel.cost_center = None;
        assert!(validate_selection(&sel, &policy, &table, &items).is_ok());
    }

    #[test]
    fn unknown_reason_is_a_validation_error() {
        let table = RequirementTable::default();
        let items = vec![item("PORT_A", "1001", "1")];
        assert_matches!(
            validate_selection(&selection("other"), &SelectionPolicy::default(), &table, &items),
            Err(CoreError::Validation(msg)) if msg.contains("Unknown reason")
        );
    }

    #[test]
    fn no_items_found_is_no_match() {
        let table = RequirementTable::default();
        let mut sel = selection(REASON_DELIVERY);
        sel.customer_id = "9999".into();
        assert_matches!(
            validate_selection(&sel, &SelectionPolicy::default(), &table, &[]),
            Err(CoreError::NoMatch { customer_id, portfolio })
                if customer_id == "9999" && portfolio == "PORT_A"
        );
    }

    #[test]
    fn choice_companions_are_required_and_restricted() {
        let table = choice_table();
        let items = vec![item("PORT_A", "1001", "1")];
        let policy = SelectionPolicy::default();
        let mut sel = selection("scan");

        assert_matches!(
            validate_selection(&sel, &policy, &table, &items),
            Err(CoreError::MissingField { field }) if field == "sub_reason"
        );

        sel.supplementary.sub_reason = Some("nessuna".into());
        assert_matches!(
            validate_selection(&sel, &policy, &table, &items),
            Err(CoreError::Validation(_))
        );

        sel.supplementary.sub_reason = Some("parziale".into());
        sel.supplementary.document_types = vec![" ".into()];
        assert_matches!(
            validate_selection(&sel, &policy, &table, &items),
            Err(CoreError::MissingField { field }) if field == "document_types"
        );

        sel.supplementary.document_types = vec!["contratto".into(), "mutuo".into()];
        assert_matches!(
            validate_selection(&sel, &policy, &table, &items),
            Err(CoreError::Validation(msg)) if msg.contains("mutuo")
        );

        sel.supplementary.document_types = vec!["contratto".into(), "garanzia".into()];
        assert_matches!(
            validate_selection(&sel, &policy, &table, &items),
            Err(CoreError::MissingField { field }) if field == "detail"
        );

        sel.supplementary.detail = Some("qualsiasi".into());
        assert!(validate_selection(&sel, &policy, &table, &items).is_ok());
    }

    // -- build_record --------------------------------------------------------

    #[test]
    fn build_copies_first_item_and_sets_open_state() {
        let items = vec![item("PORT_A", "1001", "3"), item("PORT_A", "1001", "5")];
        let rows = vec![entry("1001", "CC01")];
        let table = CostCenterTable::new(&rows);
        let record =
            build_record(&items, &selection(REASON_DELIVERY), Some(&table), today()).unwrap();

        assert_eq!(record.portfolio, "PORT_A");
        assert_eq!(record.customer_id, "1001");
        assert_eq!(record.reason, REASON_DELIVERY);
        assert_eq!(record.request_date, today());
        assert_eq!(record.requester_first_name, "Mario");
        assert!(record.booked);
        assert!(!record.returned);
        assert!(record.fulfillment_date.is_none());
        assert!(record.return_date.is_none());
        assert_eq!(record.cost_center, "CC01");
        assert_eq!(record.cost_center_portfolio, "PCC01");
        assert_eq!(record.header_name, "Intestazione 1001");
    }

    #[test]
    fn build_without_lookup_keeps_catalog_header() {
        let items = vec![item("PORT_A", "1001", "3")];
        let record = build_record(&items, &selection(REASON_DELIVERY), None, today()).unwrap();
        assert_eq!(record.header_name, "Header 1001");
        assert_eq!(record.cost_center, "CC01");
        assert!(record.cost_center_portfolio.is_empty());
    }

    #[test]
    fn build_fails_when_cost_center_mapping_is_missing() {
        let items = vec![item("PORT_A", "2002", "1")];
        let rows = vec![entry("1001", "CC01")];
        let table = CostCenterTable::new(&rows);
        let mut sel = selection(REASON_DELIVERY);
        sel.customer_id = "2002".into();
        assert_matches!(
            build_record(&items, &sel, Some(&table), today()),
            Err(CoreError::MappingNotFound { customer_id, .. }) if customer_id == "2002"
        );
    }

    #[test]
    fn build_keeps_supplementary_values() {
        let items = vec![item("PORT_A", "1001", "3")];
        let mut sel = selection("scan");
        sel.supplementary = Supplementary {
            notes: " pagine 1-4 ".into(),
            sub_reason: Some("parziale".into()),
            document_types: vec!["contratto".into(), "".into()],
            detail: Some(" urgente".into()),
        };
        let record = build_record(&items, &sel, None, today()).unwrap();
        assert_eq!(record.notes, "pagine 1-4");
        assert_eq!(record.sub_reason, "parziale");
        assert_eq!(record.document_types, ["contratto"]);
        assert_eq!(record.detail, "urgente");
    }

    #[test]
    fn build_with_no_items_is_no_match() {
        assert_matches!(
            build_record(&[], &selection(REASON_DELIVERY), None, today()),
            Err(CoreError::NoMatch { .. })
        );
    }
}
