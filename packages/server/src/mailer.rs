use chrono::{DateTime, Utc};
use common::export;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::config::EmailConfig;
use crate::error::AppError;

/// SMTP sink used for submissions when no store is available.
///
/// One message per submission: a plain-text answer list plus a CSV
/// attachment, sent over an authenticated STARTTLS session. No retry.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl Mailer {
    pub fn from_config(cfg: &EmailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(cfg.sender.clone(), cfg.password.clone()))
            .build();

        let sender: Mailbox = cfg.sender.parse()?;
        let recipient: Mailbox = match &cfg.recipient {
            Some(r) => r.parse()?,
            None => sender.clone(),
        };

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }

    /// Compose and send the confirmation for one accepted submission.
    pub async fn send_confirmation(
        &self,
        user_name: &str,
        submitted_at: DateTime<Utc>,
        rows: &[(String, String)],
    ) -> Result<(), AppError> {
        let message = compose(
            self.sender.clone(),
            self.recipient.clone(),
            user_name,
            submitted_at,
            rows,
        )
        .map_err(|e| AppError::Mail(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        Ok(())
    }
}

fn compose(
    sender: Mailbox,
    recipient: Mailbox,
    user_name: &str,
    submitted_at: DateTime<Utc>,
    rows: &[(String, String)],
) -> anyhow::Result<Message> {
    let mut body = format!(
        "Prediction confirmation from {user_name}\nSubmitted at: {}\n\nPredictions:\n",
        submitted_at.format(export::TIMESTAMP_FORMAT)
    );
    for (category, answer) in rows {
        body.push_str(category);
        body.push_str(": ");
        body.push_str(answer);
        body.push('\n');
    }

    let csv = export::prediction_csv(user_name, submitted_at, rows)?;
    let attachment = Attachment::new(export::attachment_filename(user_name, submitted_at))
        .body(csv.into_bytes(), ContentType::parse("text/csv")?);

    let message = Message::builder()
        .from(sender)
        .to(recipient)
        .subject(format!(
            "[Gridpool] Prediction confirmation from {user_name}"
        ))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body))
                .singlepart(attachment),
        )?;

    Ok(message)
}
