//! Reason table: which supplementary fields each request reason requires.
//!
//! The set of reasons and their companions changes between releases, so it
//! is data (loadable from JSON) rather than control flow.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const REASON_DELIVERY: &str = "azionare-posizione-consegna STA";
pub const REASON_FULL_SCAN: &str = "analisi documenti - scansione fascicolo";
pub const REASON_SPECIFIC_SCAN: &str = "scansione documenti specifici";
pub const REASON_ORIGINALS: &str = "richiesta originali specifici";

pub const FIELD_NOTES: &str = "notes";
pub const FIELD_SUB_REASON: &str = "sub_reason";
pub const FIELD_DOCUMENT_TYPES: &str = "document_types";
pub const FIELD_DETAIL: &str = "detail";

/// Shown next to the notes box for reasons that require them.
pub const NOTES_HINT: &str = "INSERIRE TUTTE LE RICHIESTE ALL'INTERNO DELLE NOTE, ALTRIMENTI NON SARA' POSSIBILE FARLO PRIMA CHE LA RICHIESTA VENGA EVASA TOTALMENTE";

/// How a supplementary field is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, rejected when blank after trimming. Stored in `notes`.
    FreeText,
    /// Secondary classification. Stored in `sub_reason`.
    SingleChoice,
    /// Document categories. Stored in `document_types`.
    MultiSelect,
    /// Single detail choice. Stored in `detail`.
    DetailChoice,
}

impl FieldKind {
    /// Record field a value of this kind lands in.
    pub fn field_name(self) -> &'static str {
        match self {
            FieldKind::FreeText => FIELD_NOTES,
            FieldKind::SingleChoice => FIELD_SUB_REASON,
            FieldKind::MultiSelect => FIELD_DOCUMENT_TYPES,
            FieldKind::DetailChoice => FIELD_DETAIL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredField {
    pub kind: FieldKind,
    /// Label shown in the booking form.
    pub label: String,
    /// Allowed values for choice kinds; empty accepts any non-blank value.
    #[serde(default)]
    pub options: Vec<String>,
    /// Guidance text displayed with the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl RequiredField {
    pub fn field(&self) -> &'static str {
        self.kind.field_name()
    }

    /// Whether `value` is one of the allowed options (any value when unrestricted).
    pub fn allows(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonRule {
    pub reason: String,
    #[serde(default)]
    pub required: Vec<RequiredField>,
}

/// Ordered reason table. Order is the display order of the reason picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementTable {
    pub rules: Vec<ReasonRule>,
}

impl Default for RequirementTable {
    fn default() -> Self {
        let notes = || RequiredField {
            kind: FieldKind::FreeText,
            label: "Note aggiuntive".to_string(),
            options: Vec::new(),
            hint: Some(NOTES_HINT.to_string()),
        };
        Self {
            rules: vec![
                ReasonRule {
                    reason: REASON_DELIVERY.to_string(),
                    required: Vec::new(),
                },
                ReasonRule {
                    reason: REASON_FULL_SCAN.to_string(),
                    required: Vec::new(),
                },
                ReasonRule {
                    reason: REASON_SPECIFIC_SCAN.to_string(),
                    required: vec![notes()],
                },
                ReasonRule {
                    reason: REASON_ORIGINALS.to_string(),
                    required: vec![notes()],
                },
            ],
        }
    }
}

impl RequirementTable {
    /// Build a table and check it for duplicate reasons and duplicate kinds.
    pub fn new(rules: Vec<ReasonRule>) -> Result<Self, CoreError> {
        let table = Self { rules };
        table.check()?;
        Ok(table)
    }

    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let table: Self = serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid reason table: {e}")))?;
        table.check()?;
        Ok(table)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("Cannot read reason table {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn reasons(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.reason.as_str()).collect()
    }

    pub fn contains(&self, reason: &str) -> bool {
        self.rule_for(reason).is_some()
    }

    pub fn rule_for(&self, reason: &str) -> Option<&ReasonRule> {
        self.rules.iter().find(|r| r.reason == reason)
    }

    /// Supplementary fields required by `reason`; empty for unknown reasons.
    pub fn required_for(&self, reason: &str) -> &[RequiredField] {
        self.rule_for(reason)
            .map(|r| r.required.as_slice())
            .unwrap_or(&[])
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.rules.is_empty() {
            return Err(CoreError::Validation(
                "Reason table must list at least one reason".into(),
            ));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if crate::types::is_blank(&rule.reason) {
                return Err(CoreError::Validation(format!(
                    "Reason table entry {i} has a blank reason"
                )));
            }
            if self.rules[..i].iter().any(|r| r.reason == rule.reason) {
                return Err(CoreError::Validation(format!(
                    "Reason '{}' is listed twice",
                    rule.reason
                )));
            }
            for (j, field) in rule.required.iter().enumerate() {
                if rule.required[..j].iter().any(|f| f.kind == field.kind) {
                    return Err(CoreError::Validation(format!(
                        "Reason '{}' requires {} twice",
                        rule.reason,
                        field.field()
                    )));
                }
            }
        }
        Ok(())
    }
}
