use crate::classify::contacts::ROW_OFFSET;
use crate::email::{canonicalize_email, clean_email, is_valid_email_format};
use crate::grid::Record;
use crate::resolve::{EMAIL_FIELD, NAME_FIELD};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    MissingName,
    MissingEmail,
    InvalidEmailFormat,
    FormattingIssue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEntry {
    pub row: usize,
    pub name: String,
    pub original_email: String,
    pub cleaned_email: String,
    pub is_valid: bool,
    pub issues: Vec<IssueKind>,
    pub has_issues: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub missing_names: usize,
    pub missing_emails: usize,
    pub invalid_emails: usize,
    pub formatting_issues: usize,
    pub valid_contacts: usize,
}

impl ValidationSummary {
    fn record(&mut self, entry: &ValidationEntry) {
        self.total_rows += 1;
        for issue in &entry.issues {
            match issue {
                IssueKind::MissingName => self.missing_names += 1,
                IssueKind::MissingEmail => self.missing_emails += 1,
                IssueKind::InvalidEmailFormat => self.invalid_emails += 1,
                IssueKind::FormattingIssue => self.formatting_issues += 1,
            }
        }
        if !entry.has_issues {
            self.valid_contacts += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
    pub summary: ValidationSummary,
}

/// One diagnostic entry per record; no row is dropped.
///
/// With `fix`, validity is judged on the whitespace-stripped address and
/// `cleaned_email` carries it. Without `fix`, validity uses the trimmed
/// lowercase address and `cleaned_email` repeats `original_email`.
/// `FormattingIssue` is raised whenever the stripped form differs from the
/// trimmed original, case differences included, in both modes.
pub fn classify_validation(records: &[Record], fix: bool) -> ValidationReport {
    let mut entries = Vec::with_capacity(records.len());
    let mut summary = ValidationSummary::default();

    for (index, record) in records.iter().enumerate() {
        let entry = validate_record(index + ROW_OFFSET, record, fix);
        summary.record(&entry);
        entries.push(entry);
    }

    ValidationReport { entries, summary }
}

fn validate_record(row: usize, record: &Record, fix: bool) -> ValidationEntry {
    let name = NAME_FIELD.resolve(record).trim().to_string();
    let original_email = EMAIL_FIELD.resolve(record).trim().to_string();
    let cleaned = clean_email(&original_email);
    let effective = if fix {
        cleaned.clone()
    } else {
        canonicalize_email(&original_email)
    };
    let has_email = !original_email.is_empty();
    let is_valid = has_email && is_valid_email_format(&effective);

    let mut issues = Vec::new();
    if name.is_empty() {
        issues.push(IssueKind::MissingName);
    }
    if !has_email {
        issues.push(IssueKind::MissingEmail);
    }
    if has_email && !is_valid {
        issues.push(IssueKind::InvalidEmailFormat);
    }
    if original_email != cleaned {
        issues.push(IssueKind::FormattingIssue);
    }

    let cleaned_email = if fix { cleaned } else { original_email.clone() };
    ValidationEntry {
        row,
        name,
        original_email,
        cleaned_email,
        is_valid,
        has_issues: !issues.is_empty(),
        issues,
    }
}
