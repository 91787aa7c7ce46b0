use crate::domain::ports::notification_dispatcher::{NotificationDispatcher, StatusChangeNotice};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    Message as LettreMessage, SmtpTransport, Transport,
};

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

/// Sends status-change e-mails to the ticket requester
pub struct SmtpNotificationDispatcher {
    settings: SmtpSettings,
}

impl SmtpNotificationDispatcher {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self) -> Result<SmtpTransport, String> {
        let mut builder = SmtpTransport::starttls_relay(&self.settings.host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            .port(self.settings.port);

        if let (Some(username), Some(password)) = (&self.settings.username, &self.settings.password)
        {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(builder.build())
    }
}

pub fn status_change_subject(ticket_id: &str) -> String {
    format!("Ticket {} Status Update", ticket_id)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_status_change_body(notice: &StatusChangeNotice) -> String {
    format!(
        "<html><body>\
         <h2>Ticket Status Update</h2>\
         <p>Your ticket <strong>{}</strong> has a new status: <strong>{}</strong>.</p>\
         <p>Remark: {}</p>\
         <p><small>Updated at {}</small></p>\
         <p>Support Team</p>\
         </body></html>",
        escape_html(&notice.ticket_id),
        notice.new_status,
        escape_html(&notice.remark),
        escape_html(&notice.timestamp),
    )
}

#[async_trait]
impl NotificationDispatcher for SmtpNotificationDispatcher {
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> Result<(), String> {
        let email = LettreMessage::builder()
            .from(
                self.settings
                    .from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(notice
                .recipient_email
                .parse()
                .map_err(|e| format!("Invalid to address: {}", e))?)
            .subject(status_change_subject(&notice.ticket_id))
            .header(ContentType::TEXT_HTML)
            .body(render_status_change_body(notice))
            .map_err(|e| format!("Failed to build email: {}", e))?;

        let mailer = self.transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| format!("Task join error: {}", e))?
            .map_err(|e| format!("SMTP send error: {}", e))?;

        tracing::info!(
            "Status e-mail sent to {} for ticket {}",
            notice.recipient_email,
            notice.ticket_id
        );

        Ok(())
    }
}
