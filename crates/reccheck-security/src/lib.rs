//! Personal-information redaction for extracted record text

pub mod redactor;

pub use redactor::{Redaction, RedactionInfo, Redactor};
