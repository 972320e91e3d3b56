//! Outbound message delivery.
//!
//! Delivery channels are traits so deployments can plug in a real mail or SMS gateway. The
//! logging implementations are the defaults and always succeed.

use crate::CoreResult;
use tonic::async_trait;

#[cfg(test)]
use mockall::automock;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmsMessage {
    pub to: Vec<String>,
    pub body: String,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    async fn send_email(&self, message: &EmailMessage) -> CoreResult<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SmsSender: Send + Sync + 'static {
    async fn send_sms(&self, message: &SmsMessage) -> CoreResult<()>;
}

/// Writes emails to the log instead of sending them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_email(&self, message: &EmailMessage) -> CoreResult<()> {
        tracing::info!(
            to = ?message.to,
            cc = ?message.cc,
            bcc = message.bcc.len(),
            subject = %message.subject,
            "email dispatched"
        );
        Ok(())
    }
}

/// Writes text messages to the log instead of sending them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSmsSender;

#[async_trait]
impl SmsSender for LoggingSmsSender {
    async fn send_sms(&self, message: &SmsMessage) -> CoreResult<()> {
        tracing::info!(to = ?message.to, chars = message.body.chars().count(), "sms dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_senders_succeed() {
        LoggingEmailSender
            .send_email(&EmailMessage {
                to: vec!["a@b.io".into()],
                subject: "Hi".into(),
                ..Default::default()
            })
            .await
            .expect("logging email sender never fails");
        LoggingSmsSender
            .send_sms(&SmsMessage {
                to: vec!["+15550100".into()],
                body: "Hi".into(),
            })
            .await
            .expect("logging sms sender never fails");
    }
}
