use crate::email::{canonicalize_email, is_valid_email_format};
use crate::grid::Record;
use crate::resolve::{CERTIFICATE_FIELD, EMAIL_FIELD, NAME_FIELD};
use serde::{Deserialize, Serialize};

/// Offset from a record index to its spreadsheet row (1-based plus header).
pub const ROW_OFFSET: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub ordinal: usize,
    pub name: String,
    pub email: String,
    pub is_valid_email: bool,
    pub original_row_number: usize,
    pub certificate_link: Option<String>,
}

impl Contact {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub total: usize,
    pub valid_email_count: usize,
    pub invalid_email_count: usize,
    pub contacts_with_both: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    pub contacts: Vec<Contact>,
    pub summary: ContactSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSummary {
    pub total_emails: usize,
    pub valid_email_count: usize,
    pub invalid_email_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailList {
    pub emails: Vec<String>,
    pub summary: EmailSummary,
}

/// Builds numbered contacts, dropping rows with neither name nor email.
///
/// `ordinal` counts kept rows only, while `original_row_number` is derived
/// from the position among all records so it still points at the source row.
pub fn classify_contacts(records: &[Record]) -> ContactList {
    let mut contacts = Vec::new();
    let mut summary = ContactSummary::default();

    for (index, record) in records.iter().enumerate() {
        let name = NAME_FIELD.resolve(record).trim().to_string();
        let email = canonicalize_email(EMAIL_FIELD.resolve(record));
        if name.is_empty() && email.is_empty() {
            continue;
        }

        let link = CERTIFICATE_FIELD.resolve(record).trim();
        let is_valid_email = is_valid_email_format(&email);
        let contact = Contact {
            ordinal: contacts.len() + 1,
            name,
            email,
            is_valid_email,
            original_row_number: index + ROW_OFFSET,
            certificate_link: (!link.is_empty()).then(|| link.to_string()),
        };

        if contact.is_valid_email {
            summary.valid_email_count += 1;
        } else if contact.has_email() {
            summary.invalid_email_count += 1;
        }
        if contact.has_name() && contact.has_email() && contact.is_valid_email {
            summary.contacts_with_both += 1;
        }
        contacts.push(contact);
    }

    summary.total = contacts.len();
    ContactList { contacts, summary }
}

/// Valid canonical emails in contact order, with counts over all emails seen.
pub fn extract_emails(records: &[Record]) -> EmailList {
    let ContactList { contacts, summary } = classify_contacts(records);
    let emails = contacts
        .into_iter()
        .filter(|contact| contact.is_valid_email)
        .map(|contact| contact.email)
        .collect();
    EmailList {
        emails,
        summary: EmailSummary {
            total_emails: summary.valid_email_count + summary.invalid_email_count,
            valid_email_count: summary.valid_email_count,
            invalid_email_count: summary.invalid_email_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_contacts, extract_emails};
    use crate::grid::Record;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    fn sheet() -> Vec<Record> {
        vec![
            record(&[("Name", "Ada"), ("Email", " Ada@Example.com ")]),
            record(&[("Name", ""), ("Email", "")]),
            record(&[("Name", "Grace"), ("Email", "grace-at-example")]),
            record(&[("Name", ""), ("Email", "anon@example.com")]),
            record(&[("Name", "Linus"), ("Email", "")]),
        ]
    }

    #[test]
    fn empty_rows_are_dropped_but_row_numbers_stay_aligned() {
        let list = classify_contacts(&sheet());
        let ordinals: Vec<_> = list.contacts.iter().map(|c| c.ordinal).collect();
        let rows: Vec<_> = list
            .contacts
            .iter()
            .map(|c| c.original_row_number)
            .collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
        assert_eq!(rows, vec![2, 4, 5, 6]);
    }

    #[test]
    fn emails_are_canonicalized_and_validated() {
        let list = classify_contacts(&sheet());
        assert_eq!(list.contacts[0].email, "ada@example.com");
        assert!(list.contacts[0].is_valid_email);
        assert!(!list.contacts[1].is_valid_email);
        assert!(!list.contacts[3].is_valid_email);
    }

    #[test]
    fn summary_counts_validity_and_completeness() {
        let summary = classify_contacts(&sheet()).summary;
        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid_email_count, 2);
        assert_eq!(summary.invalid_email_count, 1);
        assert_eq!(summary.contacts_with_both, 1);
        assert!(
            summary.contacts_with_both <= summary.valid_email_count.min(summary.total)
        );
    }

    #[test]
    fn certificate_link_is_optional() {
        let list = classify_contacts(&[
            record(&[("Name", "Ada"), ("Email", "a@x.com"), ("Certificate", " https://x/1 ")]),
            record(&[("Name", "Bob"), ("Email", "b@x.com"), ("Certificate", "  ")]),
        ]);
        assert_eq!(
            list.contacts[0].certificate_link.as_deref(),
            Some("https://x/1")
        );
        assert_eq!(list.contacts[1].certificate_link, None);
    }

    #[test]
    fn contact_serializes_with_camel_case_fields() {
        let list = classify_contacts(&sheet());
        let value = serde_json::to_value(&list).expect("serialize");
        assert_eq!(value["contacts"][0]["originalRowNumber"], 2);
        assert_eq!(value["contacts"][0]["isValidEmail"], true);
        assert!(value["contacts"][0]["certificateLink"].is_null());
        assert_eq!(value["summary"]["contactsWithBoth"], 1);
    }

    #[test]
    fn extract_emails_lists_valid_addresses() {
        let list = extract_emails(&sheet());
        assert_eq!(list.emails, vec!["ada@example.com", "anon@example.com"]);
        assert_eq!(list.summary.total_emails, 3);
        assert_eq!(list.summary.valid_email_count, 2);
        assert_eq!(list.summary.invalid_email_count, 1);
    }
}
