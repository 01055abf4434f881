use sheetpost_core::{
    classify_contacts, classify_validation, dispatch, extract_emails, normalize, CoreError,
    DispatchRequest, IssueKind, Mailer, OutgoingMail, RawGrid, TemplateKind,
};
use std::cell::RefCell;

#[derive(Default)]
struct Outbox {
    refuse: Option<&'static str>,
    sent: RefCell<Vec<OutgoingMail>>,
}

impl Mailer for Outbox {
    type Error = String;

    fn send_mail(&self, mail: &OutgoingMail) -> Result<(), String> {
        if self.refuse == Some(mail.to.as_str()) {
            return Err("550 rejected".to_string());
        }
        self.sent.borrow_mut().push(mail.clone());
        Ok(())
    }
}

fn grid(rows: &[&[&str]]) -> RawGrid {
    RawGrid::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

fn attendees() -> RawGrid {
    grid(&[
        &["Participant Name", "Contact Email", "Certificate URL"],
        &[" Ana ", "ANA@Example.org", "https://certs/ana"],
        &["Ben", "ben@example", "https://certs/ben"],
        &["Cleo", "cleo@example.org"],
        &["", ""],
        &["", "dee@example.org", "https://certs/dee"],
    ])
}

#[test]
fn hinted_columns_flow_through_classification() {
    let records = normalize(&attendees(), None).expect("records");
    assert_eq!(records.len(), 5);

    let list = classify_contacts(&records);
    let names: Vec<_> = list.contacts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Ben", "Cleo", ""]);
    let ordinals: Vec<_> = list.contacts.iter().map(|c| c.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 3, 4]);
    assert_eq!(list.contacts[3].original_row_number, 6);
    assert_eq!(list.contacts[0].email, "ana@example.org");
    assert_eq!(list.summary.valid_email_count, 3);
    assert_eq!(list.summary.invalid_email_count, 1);
    assert_eq!(list.summary.contacts_with_both, 2);
    assert!(list.summary.contacts_with_both <= list.summary.valid_email_count);

    let emails = extract_emails(&records);
    assert_eq!(
        emails.emails,
        vec!["ana@example.org", "cleo@example.org", "dee@example.org"]
    );
}

#[test]
fn validation_reports_every_row() {
    let records = normalize(&attendees(), None).expect("records");
    let report = classify_validation(&records, false);

    assert_eq!(report.summary.total_rows, 5);
    assert_eq!(report.entries[3].row, 5);
    assert_eq!(
        report.entries[3].issues,
        vec![IssueKind::MissingName, IssueKind::MissingEmail]
    );
    assert!(report
        .entries
        .iter()
        .all(|entry| entry.cleaned_email == entry.original_email));
    assert_eq!(report.summary.valid_contacts, 1);
}

#[test]
fn certificate_dispatch_isolates_failures() {
    let records = normalize(&attendees(), None).expect("records");
    let contacts = classify_contacts(&records).contacts;
    let outbox = Outbox {
        refuse: Some("dee@example.org"),
        ..Outbox::default()
    };
    let request = DispatchRequest {
        from: "events@example.org",
        subject: "Your certificate",
        body: r##"<h1>Congratulations!</h1><a href="#" class="btn"> Get Your Certificate </a>"##,
        template: TemplateKind::Certificate,
    };

    let result = dispatch(&outbox, &contacts, &request).expect("dispatch");
    assert_eq!(result.sent_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.failures[0].email, "dee@example.org");

    let sent = outbox.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].html,
        r#"<h1>Congratulations Ana!</h1><a href="https://certs/ana" class="btn"> 📜 Get your certificate </a>"#
    );
}

#[test]
fn header_only_sheet_has_no_recipients() {
    let records = normalize(&grid(&[&["Name", "Email"]]), None).expect("records");
    assert!(records.is_empty());
    let contacts = classify_contacts(&records).contacts;
    let request = DispatchRequest {
        from: "events@example.org",
        subject: "Hi",
        body: "<p>Hi</p>",
        template: TemplateKind::Plain,
    };
    assert_eq!(
        dispatch(&Outbox::default(), &contacts, &request).unwrap_err(),
        CoreError::NoEligibleRecipients
    );
    assert_eq!(
        normalize(&RawGrid::default(), None).unwrap_err(),
        CoreError::EmptyInput
    );
}
