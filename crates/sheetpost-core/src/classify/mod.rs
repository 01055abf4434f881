pub mod contacts;
pub mod validation;

pub use contacts::{
    classify_contacts, extract_emails, Contact, ContactList, ContactSummary, EmailList,
    EmailSummary,
};
pub use validation::{
    classify_validation, IssueKind, ValidationEntry, ValidationReport, ValidationSummary,
};
