use crate::grid::Record;

/// Where to look for a logical field in a record with arbitrary headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Exact header names, tried in order.
    pub canonical: &'static [&'static str],
    /// Lowercase fragments matched against lowercased headers.
    pub hints: &'static [&'static str],
}

pub const NAME_FIELD: FieldSpec = FieldSpec {
    canonical: &["name", "Name", "Full Name", "full_name"],
    hints: &["name"],
};

pub const EMAIL_FIELD: FieldSpec = FieldSpec {
    canonical: &["email", "Email", "Email Address", "email_address"],
    hints: &["email", "mail"],
};

pub const CERTIFICATE_FIELD: FieldSpec = FieldSpec {
    canonical: &[
        "certificate",
        "Certificate",
        "Certificate Link",
        "certificate_link",
    ],
    hints: &["certificate"],
};

impl FieldSpec {
    pub fn resolve<'a>(&self, record: &'a Record) -> &'a str {
        resolve_field(record, self.canonical, self.hints)
    }
}

/// Exact header match first, then the first header (in column order) whose
/// lowercase form contains a hint, else `""`.
pub fn resolve_field<'a>(record: &'a Record, canonical: &[&str], hints: &[&str]) -> &'a str {
    if let Some(value) = canonical.iter().find_map(|name| record.get(name)) {
        return value;
    }

    record
        .iter()
        .find(|(key, _)| {
            let key = key.to_lowercase();
            hints.iter().any(|hint| key.contains(hint))
        })
        .map(|(_, value)| value)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::{resolve_field, CERTIFICATE_FIELD, EMAIL_FIELD, NAME_FIELD};
    use crate::grid::Record;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn canonical_name_wins_over_earlier_hint_match() {
        let row = record(&[("Work mail", "work@x.com"), ("Email", "home@x.com")]);
        assert_eq!(EMAIL_FIELD.resolve(&row), "home@x.com");
    }

    #[test]
    fn canonical_names_are_tried_in_order() {
        let row = record(&[("Email Address", "b@x.com"), ("email", "a@x.com")]);
        assert_eq!(EMAIL_FIELD.resolve(&row), "a@x.com");
    }

    #[test]
    fn exact_match_is_case_sensitive_but_hints_are_not() {
        let row = record(&[("EMAIL", "caps@x.com")]);
        assert_eq!(EMAIL_FIELD.resolve(&row), "caps@x.com");
        let row = record(&[("Participant NAME", "Ada")]);
        assert_eq!(NAME_FIELD.resolve(&row), "Ada");
    }

    #[test]
    fn hint_scan_returns_first_matching_column() {
        let row = record(&[("E-Mail 1", "one@x.com"), ("Backup mail", "two@x.com")]);
        assert_eq!(EMAIL_FIELD.resolve(&row), "one@x.com");
    }

    #[test]
    fn missing_field_resolves_to_empty() {
        let row = record(&[("Phone", "555")]);
        assert_eq!(CERTIFICATE_FIELD.resolve(&row), "");
        assert_eq!(resolve_field(&Record::default(), &["x"], &["y"]), "");
    }

    #[test]
    fn certificate_link_found_by_hint() {
        let row = record(&[("Name", "Ada"), ("Certificate URL", "https://x/1")]);
        assert_eq!(CERTIFICATE_FIELD.resolve(&row), "https://x/1");
    }

    #[test]
    fn resolution_is_idempotent() {
        let row = record(&[("Full Name", "Ada"), ("mail", "ada@x.com")]);
        let first = (NAME_FIELD.resolve(&row), EMAIL_FIELD.resolve(&row));
        let second = (NAME_FIELD.resolve(&row), EMAIL_FIELD.resolve(&row));
        assert_eq!(first, second);
        assert_eq!(first, ("Ada", "ada@x.com"));
    }
}
