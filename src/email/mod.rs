use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::MailConfig,
    error::{AppError, Result},
    service::validation::ContactSubmission,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// Contact form relay message sent to the organization's inboxes.
    pub fn contact(submission: &ContactSubmission, recipients: &[String]) -> Self {
        Self {
            to: recipients.to_vec(),
            subject: format!("Contacto CAS - {}", submission.name),
            body: format!(
                "Nombre: {}\nEmail: {}\n\nMensaje:\n{}",
                submission.name, submission.email, submission.message
            ),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// One delivery attempt. No retry and no queueing.
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// SMTP relay delivery through lettre.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| AppError::Email(format!("Invalid SMTP relay '{}': {}", config.host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
        };

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = parse_mailbox(&config.default_sender)?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.as_str());

        for recipient in &email.to {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let message = builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| AppError::Email(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        tracing::info!("Sent '{}' to {} recipient(s)", email.subject, email.to.len());
        Ok(())
    }
}

/// Used when `mail.enabled` is false: every send fails, so callers take
/// their normal failure path.
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        Err(AppError::Email(format!(
            "Mail delivery is disabled, dropped '{}'",
            email.subject
        )))
    }
}

pub fn build_sender(config: &MailConfig) -> Result<Arc<dyn EmailSender>> {
    if !config.enabled {
        tracing::warn!("Mail delivery disabled; contact form submissions will fail");
        return Ok(Arc::new(DisabledEmailSender));
    }

    tracing::info!("Mail relay {}:{} (tls: {})", config.host, config.port, config.use_tls);
    Ok(Arc::new(SmtpEmailSender::new(config)?))
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| AppError::Email(format!("Invalid address '{}': {}", address, e)))
}
