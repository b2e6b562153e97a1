//! Line-by-line field extraction over recognized text.

use tracing::debug;

use crate::models::document::{DocumentFields, FieldKind};

use super::rules::{patterns_for, DateValidator};

/// Pulls name, document number and expiration date out of OCR text.
///
/// Lines are scanned top to bottom. For every field that is still unset the
/// field's patterns are tried in priority order; the first accepted capture
/// fills the field and later lines never overwrite it.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    dates: DateValidator,
}

impl FieldExtractor {
    /// Create an extractor checking dates against the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific date validator.
    pub fn with_date_validator(mut self, validator: DateValidator) -> Self {
        self.dates = validator;
        self
    }

    /// Extract all fields from recognized text.
    pub fn extract(&self, text: &str) -> DocumentFields {
        let mut fields = DocumentFields::new();

        for line in text.split('\n').map(str::trim) {
            for kind in FieldKind::ALL {
                if fields.is_unset(kind) {
                    self.scan_line(kind, line, &mut fields);
                }
            }
        }

        fields
    }

    fn scan_line(&self, kind: FieldKind, line: &str, fields: &mut DocumentFields) {
        for pattern in patterns_for(kind) {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let value = caps[1].trim();

            // A rejected date leaves the field open; the next pattern still gets a go.
            if let Some(accepted) = self.accept(kind, value) {
                debug!("Found {}: {}", kind, accepted);
                fields.set(kind, accepted);
                return;
            }
        }
    }

    fn accept(&self, kind: FieldKind, value: &str) -> Option<String> {
        match kind {
            FieldKind::ExpirationDate => self.dates.validate(value),
            FieldKind::Name | FieldKind::DocumentNumber => Some(value.to_string()),
        }
    }
}
