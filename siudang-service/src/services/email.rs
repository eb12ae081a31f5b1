use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::time::Duration;

use crate::config::EmailConfig;

pub const OTP_SUBJECT: &str = "OTP untuk SiUdang";

pub fn otp_body(code: &str) -> String {
    format!("Kode OTP Anda: {}", code)
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Deliver a registration code. Attempted once.
    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from_email: String,
}

impl EmailService {
    pub fn new(config: &EmailConfig, sender: &str) -> Result<Self, AppError> {
        let creds = Credentials::new(
            sender.to_string(),
            config.app_password.expose_secret().to_string(),
        );

        // 587 negotiates STARTTLS; anything else is implicit TLS.
        let builder = if config.smtp_port == 587 {
            SmtpTransport::starttls_relay(&config.smtp_host)
        } else {
            SmtpTransport::relay(&config.smtp_host)
        }
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid SMTP relay: {}", e)))?;

        let mailer = builder
            .credentials(creds)
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.smtp_host, port = config.smtp_port, "Email service initialized");

        Ok(Self {
            mailer,
            from_email: sender.to_string(),
        })
    }
}

#[async_trait]
impl EmailProvider for EmailService {
    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e: lettre::address::AddressError| AppError::EmailError(e.to_string()))?,
            )
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| AppError::EmailError(e.to_string()))?)
            .subject(OTP_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(otp_body(code))?;

        // SmtpTransport blocks; keep it off the async workers.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, "OTP email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %to_email, "Failed to send OTP email");
                Err(AppError::EmailError(e.to_string()))
            }
        }
    }
}

/// Development stand-in when no sender is configured: the code goes to the
/// log instead of a mailbox.
#[derive(Clone, Default)]
pub struct LogEmailService;

#[async_trait]
impl EmailProvider for LogEmailService {
    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        tracing::warn!(to = %to_email, code = %code, "No mail relay configured; OTP logged");
        Ok(())
    }
}
