use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use sheetpost_config::AppConfig;
use sheetpost_core::{Mailer, OutgoingMail};
use sheetpost_io::{SmtpMailer, UpstreamError};
use tracing::info;

pub type BoxedMailer = Box<dyn Mailer<Error = UpstreamError> + Send + Sync>;

/// Accepts every message and sends nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewMailer;

impl Mailer for PreviewMailer {
    type Error = UpstreamError;

    fn send_mail(&self, mail: &OutgoingMail) -> Result<(), UpstreamError> {
        info!(to = %mail.to, subject = %mail.subject, bytes = mail.html.len(), "dry run, not sent");
        Ok(())
    }
}

pub fn build_mailer(config: &AppConfig, dry_run: bool) -> Result<BoxedMailer> {
    if dry_run {
        return Ok(Box::new(PreviewMailer));
    }
    let smtp = config
        .smtp
        .as_ref()
        .ok_or_else(|| invalid_input("smtp is not configured; add an [smtp] section or use --dry-run"))?;
    let mailer = SmtpMailer::new(smtp).with_context(|| "configure smtp transport")?;
    Ok(Box::new(mailer))
}

/// Sender from the command line, else the configured smtp sender.
pub fn resolve_from(config: &AppConfig, from: Option<String>) -> String {
    from.or_else(|| config.smtp.as_ref().map(|smtp| smtp.from.clone()))
        .unwrap_or_default()
}
