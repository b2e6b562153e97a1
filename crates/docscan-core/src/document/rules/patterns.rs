//! Labeled patterns for identity document fields.
//!
//! Each table is tried in order and every pattern has exactly one capture
//! group holding the value.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::document::FieldKind;

lazy_static! {
    // Holder name
    pub static ref NAME_PATTERNS: [Regex; 2] = [
        Regex::new(r"(?i)(?:NAME|GIVEN NAME|SURNAME)[\s:]*([\w\s]+)").unwrap(),
        Regex::new(r"(?i)(?:FIRST NAME|LAST NAME)[\s:]*([\w\s]+)").unwrap(),
    ];

    // Document number
    pub static ref DOCUMENT_NUMBER_PATTERNS: [Regex; 2] = [
        Regex::new(
            r"(?i)(?:DOCUMENT NO|PASSPORT NO|LICENSE NO|ID NO|ID NO\.|NO\.)[\s:]*([A-Z0-9/]+)"
        ).unwrap(),
        Regex::new(r"(?i)ID NO\.\s*:\s*([0-9]{4}/[0-9]{2})").unwrap(),
    ];

    // Expiration date
    pub static ref EXPIRATION_DATE_PATTERNS: [Regex; 2] = [
        Regex::new(
            r"(?i)(?:EXPIRY DATE|EXPIRATION DATE|VALID UNTIL|VALID UPTO|VALID TO|VALID TILL|VALIDITY)[\s:]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})"
        ).unwrap(),
        Regex::new(r"(?i)(?:VALID THRU)[\s:]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})").unwrap(),
    ];
}

/// Patterns for a field, highest priority first.
pub fn patterns_for(kind: FieldKind) -> &'static [Regex] {
    match kind {
        FieldKind::Name => &NAME_PATTERNS[..],
        FieldKind::DocumentNumber => &DOCUMENT_NUMBER_PATTERNS[..],
        FieldKind::ExpirationDate => &EXPIRATION_DATE_PATTERNS[..],
    }
}
