//! Email service for sending visitor QR code passes

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Luma};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use qrcode::QrCode;
use std::io::Cursor;
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::visitor::Visitor,
};

/// Content-ID of the inline QR code image
const QR_CONTENT_ID: &str = "visitor-qr";

/// Sends the QR code pass to a visitor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorNotifier: Send + Sync {
    async fn send_visitor_qr_code(&self, visitor: &Visitor) -> AppResult<()>;
}

/// Text encoded in the QR code shown at the gate.
///
/// Only the record id and visit date; reception looks the rest up.
pub fn pass_payload(visitor: &Visitor) -> String {
    format!(
        "VISITOR:{};DATE:{}",
        visitor.id.map(|id| id.to_string()).unwrap_or_default(),
        visitor.date.as_deref().unwrap_or_default(),
    )
}

/// Render `payload` as a PNG QR code, at least 300px wide
pub fn render_qr_png(payload: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;
    let image = code.render::<Luma<u8>>().min_dimensions(300, 300).build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to render QR code: {}", e)))?;
    Ok(png)
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Plain text alternative plus an HTML part with the QR code inlined
    pub fn pass_body(&self, text: String, html: String, qr_png: Vec<u8>) -> AppResult<MultiPart> {
        let png_type = ContentType::parse("image/png")
            .map_err(|e| AppError::Internal(format!("Invalid content type: {}", e)))?;

        Ok(MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(text),
            )
            .multipart(
                MultiPart::related()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    )
                    .singlepart(Attachment::new_inline(QR_CONTENT_ID.to_string()).body(qr_png, png_type)),
            ))
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: MultiPart) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Visitor Desk");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl VisitorNotifier for EmailService {
    async fn send_visitor_qr_code(&self, visitor: &Visitor) -> AppResult<()> {
        let to = visitor
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::BadRequest("Visitor has no email address".to_string()))?;

        let name = visitor.name.as_deref().unwrap_or("Visitor");
        let date = visitor.date.as_deref().unwrap_or("-");
        let host = visitor.host.as_deref().unwrap_or("-");
        let qr_png = render_qr_png(&pass_payload(visitor))?;

        let subject = "Your visitor pass";
        let text = format!(
            r#"
Hello {name},

Your visit on {date} to meet {host} has been registered.

Show the QR code from this email at the reception desk on arrival.
"#,
        );
        let html = format!(
            r#"<html><body>
<p>Hello {name},</p>
<p>Your visit on {date} to meet {host} has been registered.</p>
<p>Show this QR code at the reception desk on arrival:</p>
<p><img src="cid:{QR_CONTENT_ID}" alt="Visitor QR code" width="300" height="300"></p>
</body></html>"#,
        );

        let body = self.pass_body(text, html, qr_png)?;
        self.send_email(to, subject, body).await
    }
}
