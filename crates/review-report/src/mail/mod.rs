//! Email delivery
//!
//! The report goes out as `multipart/mixed`: a `multipart/alternative` body
//! (the Markdown as plain text plus a styled HTML rendering) followed by the
//! report file as an attachment. Submission uses STARTTLS with the sender's
//! credentials.

mod html;

pub use html::markdown_to_html;

use crate::MailConfig;
use crate::error::MailError;
use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use review_utils::beijing_today;
use std::path::Path;
use tracing::{error, info};

/// `A股晚间复盘报告 - {YYYY年MM月DD日}`
pub fn default_subject(date: NaiveDate) -> String {
    format!("A股晚间复盘报告 - {}", date.format("%Y年%m月%d日"))
}

/// Sends report files over SMTP
#[derive(Clone)]
pub struct EmailSender {
    config: MailConfig,
    sender: Mailbox,
    password: String,
}

impl std::fmt::Debug for EmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSender")
            .field("server", &self.config.server)
            .field("port", &self.config.port)
            .field("sender", &self.sender.to_string())
            .finish_non_exhaustive()
    }
}

impl EmailSender {
    /// Create a sender; both sender address and password are required
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let (Some(address), Some(password)) = (&config.sender, &config.password) else {
            return Err(MailError::MissingCredentials);
        };

        Ok(Self {
            sender: address.parse()?,
            password: password.clone(),
            config,
        })
    }

    /// Read the report at `path` and deliver it to `recipient`
    ///
    /// Without an explicit subject, today's date (Beijing time) is used.
    pub async fn send_report(
        &self,
        recipient: &str,
        path: &Path,
        subject: Option<&str>,
    ) -> Result<(), MailError> {
        let subject = subject.map_or_else(|| default_subject(beijing_today()), str::to_string);
        let message = self.build_message(recipient, path, &subject).await?;

        info!("Sending report to {recipient} via {}:{}", self.config.server, self.config.port);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.sender.email.to_string(),
                self.password.clone(),
            ))
            .build();

        match transport.send(message).await {
            Ok(_) => {
                info!("Email sent to {recipient}");
                Ok(())
            }
            Err(e) => {
                error!("Email delivery to {recipient} failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Assemble the MIME message for the report at `path`
    pub async fn build_message(
        &self,
        recipient: &str,
        path: &Path,
        subject: &str,
    ) -> Result<Message, MailError> {
        let bytes = tokio::fs::read(path).await?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let file_name = path
            .file_name()
            .map_or_else(|| "report.md".to_string(), |name| name.to_string_lossy().into_owned());

        let attachment = Attachment::new(file_name)
            .body(bytes, ContentType::parse("application/octet-stream")?);

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient.parse::<Mailbox>()?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(
                        content.clone(),
                        markdown_to_html(&content),
                    ))
                    .singlepart(attachment),
            )?;

        Ok(message)
    }
}
