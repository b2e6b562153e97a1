//! Fields extracted from an identity document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three fields pulled out of recognized document text.
///
/// Every field starts unset and is filled at most once per scan. The JSON
/// shape (`name`, `document_number`, `expiration_date`, `null` when unset)
/// is the HTTP response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFields {
    /// Holder's name.
    pub name: Option<String>,

    /// Document or ID number.
    pub document_number: Option<String>,

    /// Expiration date, verbatim as printed on the document.
    pub expiration_date: Option<String>,
}

impl DocumentFields {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field.
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    /// Whether a field still accepts a value.
    ///
    /// An empty capture does not lock the field: later lines may replace it.
    pub fn is_unset(&self, kind: FieldKind) -> bool {
        self.get(kind).is_none_or(str::is_empty)
    }

    /// Store a value for a field.
    pub fn set(&mut self, kind: FieldKind, value: impl Into<String>) {
        *self.slot_mut(kind) = Some(value.into());
    }

    /// Whether no field carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        FieldKind::ALL.iter().all(|kind| self.is_unset(*kind))
    }

    /// Number of fields holding a non-empty value.
    pub fn populated_count(&self) -> usize {
        FieldKind::ALL.iter().filter(|kind| !self.is_unset(**kind)).count()
    }

    fn slot(&self, kind: FieldKind) -> &Option<String> {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::DocumentNumber => &self.document_number,
            FieldKind::ExpirationDate => &self.expiration_date,
        }
    }

    fn slot_mut(&mut self, kind: FieldKind) -> &mut Option<String> {
        match kind {
            FieldKind::Name => &mut self.name,
            FieldKind::DocumentNumber => &mut self.document_number,
            FieldKind::ExpirationDate => &mut self.expiration_date,
        }
    }
}

/// Kind of extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    DocumentNumber,
    ExpirationDate,
}

impl FieldKind {
    /// All field kinds, in scan order.
    pub const ALL: [FieldKind; 3] = [
        FieldKind::Name,
        FieldKind::DocumentNumber,
        FieldKind::ExpirationDate,
    ];

    /// Key used in serialized output.
    pub fn key(self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::DocumentNumber => "document_number",
            FieldKind::ExpirationDate => "expiration_date",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
