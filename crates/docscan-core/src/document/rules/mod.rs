//! Rule tables for identity document fields.

pub mod dates;
pub mod patterns;

pub use dates::{Clock, DateFormat, DateValidator, DateVerdict, FixedClock, SystemClock};
pub use patterns::{
    patterns_for, DOCUMENT_NUMBER_PATTERNS, EXPIRATION_DATE_PATTERNS, NAME_PATTERNS,
};
