use crate::{Result, UpstreamError};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport as _};
use sheetpost_config::{SmtpConfig, SmtpTls};
use sheetpost_core::{Mailer, OutgoingMail};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse()
            .map_err(|_| mail_config("smtp.from must be a valid email address"))?;

        let mut builder = match config.tls {
            SmtpTls::Tls => SmtpTransport::relay(&config.host)
                .map_err(|_| mail_config("invalid smtp.host"))?,
            SmtpTls::StartTls => SmtpTransport::starttls_relay(&config.host)
                .map_err(|_| mail_config("invalid smtp.host"))?,
            SmtpTls::None => SmtpTransport::builder_dangerous(&config.host),
        };

        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Some(Duration::from_secs(seconds)));
        }

        if let (Some(username), Some(password_env)) =
            (config.username.as_deref(), config.password_env.as_deref())
        {
            let password = env::var(password_env)
                .map_err(|_| mail_config(format!("missing env var {password_env}")))?;
            let password = password.trim();
            if password.is_empty() {
                return Err(mail_config(format!("env var {password_env} is empty")));
            }
            let credentials = Credentials::new(username.to_string(), password.to_string());
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    /// Configured sender, used when a request names none.
    pub fn default_from(&self) -> String {
        self.from.to_string()
    }
}

impl Mailer for SmtpMailer {
    type Error = UpstreamError;

    fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;
        debug!(to = %mail.to, "sending mail");
        self.transport.send(&message).map_err(|err| {
            warn!(to = %mail.to, error = %err, "mail delivery failed");
            UpstreamError::Mail(err.to_string())
        })?;
        Ok(())
    }
}

fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from: Mailbox = mail
        .from
        .parse()
        .map_err(|_| UpstreamError::Mail(format!("invalid sender address {:?}", mail.from)))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|_| UpstreamError::Mail(format!("invalid recipient address {:?}", mail.to)))?;
    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(mail.html.clone())
        .map_err(|err| UpstreamError::Mail(err.to_string()))
}

fn mail_config(message: impl Into<String>) -> UpstreamError {
    UpstreamError::MailConfig(message.into())
}
