//! Outgoing email.
//!
//! Handlers send mail through the [`Mailer`] trait so that endpoint tests can swap in a mock. [`SmtpMailer`] delivers
//! over SMTP with STARTTLS.
use lettre::{
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use log::*;
use thiserror::Error;

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("The mailer has not been configured")]
    NotConfigured,
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Could not build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),
}

#[allow(async_fn_in_trait)]
pub trait Mailer {
    /// Sends a plain-text email.
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl SmtpMailer {
    /// Builds the SMTP transport. If no host is configured, the mailer is created anyway, but every send fails with
    /// [`MailerError::NotConfigured`].
    pub fn new(config: &EmailConfig) -> Result<Self, MailerError> {
        if config.host.is_empty() {
            warn!("📧️ No SMTP host has been configured. Emails will not be sent.");
            return Ok(Self { transport: None, from_address: config.username.clone() });
        }
        let credentials = Credentials::new(config.username.clone(), config.password.reveal().clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();
        info!("📧️ Mail will be sent through {}:{}", config.host, config.port);
        Ok(Self { transport: Some(transport), from_address: config.username.clone() })
    }
}

impl Mailer for SmtpMailer {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let transport = self.transport.as_ref().ok_or(MailerError::NotConfigured)?;
        let email = Message::builder()
            .from(self.from_address.parse().map_err(|_| MailerError::InvalidAddress(self.from_address.clone()))?)
            .to(to.parse().map_err(|_| MailerError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .body(body.to_string())?;
        transport.send(email).await?;
        debug!("📧️ Sent \"{subject}\" to {to}");
        Ok(())
    }
}
