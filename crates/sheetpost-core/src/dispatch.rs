use crate::classify::Contact;
use crate::error::{CoreError, Result};
use crate::personalize::personalize_certificate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Personalized per recipient; requires a certificate link.
    Certificate,
    /// Sent verbatim.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Single-recipient mail transport.
pub trait Mailer {
    type Error: fmt::Display;

    fn send_mail(&self, mail: &OutgoingMail) -> std::result::Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchRequest<'a> {
    pub from: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub template: TemplateKind,
}

impl DispatchRequest<'_> {
    /// Rejects blank sender, subject or body.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(CoreError::MissingInput("subject"));
        }
        if self.body.trim().is_empty() {
            return Err(CoreError::MissingInput("body"));
        }
        if self.from.trim().is_empty() {
            return Err(CoreError::MissingInput("sender address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFailure {
    pub email: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub sent_count: usize,
    pub failed_count: usize,
    pub failures: Vec<SendFailure>,
}

pub fn is_eligible(contact: &Contact, template: TemplateKind) -> bool {
    if !contact.is_valid_email {
        return false;
    }
    match template {
        TemplateKind::Certificate => contact
            .certificate_link
            .as_deref()
            .is_some_and(|link| !link.is_empty()),
        TemplateKind::Plain => true,
    }
}

pub fn eligible_recipients(contacts: &[Contact], template: TemplateKind) -> Vec<&Contact> {
    contacts
        .iter()
        .filter(|contact| is_eligible(contact, template))
        .collect()
}

pub fn render_body(body: &str, template: TemplateKind, contact: &Contact) -> String {
    match template {
        TemplateKind::Certificate => personalize_certificate(
            body,
            &contact.name,
            contact.certificate_link.as_deref().unwrap_or_default(),
        ),
        TemplateKind::Plain => body.to_string(),
    }
}

/// Sends one message per eligible contact, sequentially and in order.
///
/// Ineligible contacts are skipped without being reported. A failed send is
/// recorded and the loop moves on; each recipient gets a single attempt.
pub fn dispatch<M>(
    mailer: &M,
    contacts: &[Contact],
    request: &DispatchRequest<'_>,
) -> Result<DispatchResult>
where
    M: Mailer + ?Sized,
{
    request.validate()?;

    let recipients = eligible_recipients(contacts, request.template);
    if recipients.is_empty() {
        return Err(CoreError::NoEligibleRecipients);
    }

    let mut result = DispatchResult::default();
    for contact in recipients {
        let mail = OutgoingMail {
            from: request.from.to_string(),
            to: contact.email.clone(),
            subject: request.subject.to_string(),
            html: render_body(request.body, request.template, contact),
        };
        match mailer.send_mail(&mail) {
            Ok(()) => result.sent_count += 1,
            Err(err) => {
                result.failed_count += 1;
                result.failures.push(SendFailure {
                    email: contact.email.clone(),
                    error_message: err.to_string(),
                });
            }
        }
    }
    Ok(result)
}
