//! Prescription mail composition and SMTP dispatch
//!
//! Messages are multipart (HTML plus plain text) listing a patient's
//! prescriptions. The transport is built once and reused; each send is
//! an independent SMTP transaction.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// One line of a prescription listing.
#[derive(Debug, Clone)]
pub struct PrescriptionLine {
    pub tablets: String,
    pub dosage: String,
    pub duration: String,
}

/// A prescription update addressed to one patient.
#[derive(Debug, Clone)]
pub struct PrescriptionEmail {
    pub to: String,
    pub patient_name: String,
    pub items: Vec<PrescriptionLine>,
}

impl PrescriptionEmail {
    /// HTML part: greeting, bullet list, dosage-advice footer.
    pub fn html_body(&self) -> String {
        let items = self
            .items
            .iter()
            .map(|p| {
                format!(
                    "<li><strong>{}</strong>: {} for {}</li>",
                    p.tablets, p.dosage, p.duration
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<h2>Hello {},</h2>\n\
             <p>Here are your latest prescriptions:</p>\n\
             <ul>{}</ul>\n\
             <p><i>Please follow the prescribed dosage and consult your doctor for any concerns.</i></p>",
            self.patient_name, items
        )
    }

    /// Plain-text part with the same content.
    pub fn text_body(&self) -> String {
        let items = self
            .items
            .iter()
            .map(|p| format!("- {}: {} for {}", p.tablets, p.dosage, p.duration))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Hello {},\n\nHere are your latest prescriptions:\n{}\n\n\
             Please follow the prescribed dosage and consult your doctor for any concerns.",
            self.patient_name, items
        )
    }
}

/// SMTP mailer holding a reusable async transport.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build the transport from relay credentials. STARTTLS against the
    /// configured host.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.parse()?,
        })
    }

    /// Send one prescription email.
    pub async fn send(&self, email: &PrescriptionEmail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject("Prescription Update")
            .multipart(MultiPart::alternative_plain_html(
                email.text_body(),
                email.html_body(),
            ))?;

        self.transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PrescriptionEmail {
        PrescriptionEmail {
            to: "ada@example.com".to_string(),
            patient_name: "Ada".to_string(),
            items: vec![
                PrescriptionLine {
                    tablets: "Paracetamol".to_string(),
                    dosage: "500mg twice daily".to_string(),
                    duration: "5 days".to_string(),
                },
                PrescriptionLine {
                    tablets: "Cetirizine".to_string(),
                    dosage: "10mg at night".to_string(),
                    duration: "3 days".to_string(),
                },
            ],
        }
    }

    #[test]
    fn html_lists_every_prescription() {
        let html = sample().html_body();
        assert!(html.contains("Hello Ada,"));
        assert!(html.contains("<strong>Paracetamol</strong>: 500mg twice daily for 5 days"));
        assert!(html.contains("<strong>Cetirizine</strong>: 10mg at night for 3 days"));
        assert!(html.contains("consult your doctor"));
    }

    #[test]
    fn text_lists_every_prescription() {
        let text = sample().text_body();
        assert!(text.contains("Hello Ada,"));
        assert!(text.contains("- Paracetamol: 500mg twice daily for 5 days"));
        assert!(text.contains("- Cetirizine: 10mg at night for 3 days"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn invalid_sender_rejected() {
        let config = MailConfig {
            host: "smtp.example.com".to_string(),
            username: "clinic".to_string(),
            password: "secret".to_string(),
            from: "not a mailbox".to_string(),
        };
        assert!(matches!(Mailer::new(&config), Err(MailError::Address(_))));
    }

    #[tokio::test]
    async fn recipient_must_parse() {
        let config = MailConfig {
            host: "smtp.example.com".to_string(),
            username: "clinic".to_string(),
            password: "secret".to_string(),
            from: "Clinic <clinic@example.com>".to_string(),
        };
        let mailer = Mailer::new(&config).unwrap();

        let mut email = sample();
        email.to = "no-at-sign".to_string();
        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, MailError::Address(_)));
    }
}
