//! Notification dispatch.
//!
//! A notification names a [`pb::NotificationEvent`], which in turn names the email and/or
//! SMS template to render. Each channel moves through `PENDING` to `SENT`, or to `FAILED`
//! once its failure count reaches the event's retry threshold. Channels the event or the
//! recipients don't cover are `NOT_REQUIRED` from the start.

use super::RecordService;
use crate::actor::Actor;
use crate::audit::{AuditEvent, AuditEventType, AuditService};
use crate::constants::NOTIFICATIONS;
use crate::record::{now_rfc3339, Record};
use crate::repository::{ListQuery, Page, Repository};
use crate::senders::{EmailMessage, EmailSender, SmsMessage, SmsSender};
use crate::store::DocumentStore;
use crate::templates::{check_variables, render};
use crate::{CoreError, CoreResult};
use api_shared::pb;
use api_shared::pb::{NotificationPriority, NotificationStatus};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

const PENDING: i32 = NotificationStatus::Pending as i32;
const SENT: i32 = NotificationStatus::Sent as i32;
const FAILED: i32 = NotificationStatus::Failed as i32;
const NOT_REQUIRED: i32 = NotificationStatus::NotRequired as i32;

/// Outcome of one delivery attempt on a channel.
enum Delivery {
    Sent,
    Failed,
}

/// Applies a delivery outcome to a channel's status and failure counter.
fn apply_delivery(status: &mut i32, failures: &mut i32, retry: i32, delivery: Delivery) {
    match delivery {
        Delivery::Sent => *status = SENT,
        Delivery::Failed => {
            *failures += 1;
            if *failures >= retry.max(1) {
                *status = FAILED;
            }
        }
    }
}

/// A channel that cannot be rendered will not succeed on retry.
fn reject_channel(status: &mut i32, failures: &mut i32) {
    *failures += 1;
    *status = FAILED;
}

fn channel_status(has_template: bool, has_recipients: bool) -> i32 {
    if has_template && has_recipients {
        PENDING
    } else {
        NOT_REQUIRED
    }
}

/// Notification ids currently being delivered.
#[derive(Clone, Default)]
struct Claims(Arc<Mutex<HashSet<String>>>);

/// Releases its notification id when dropped.
struct Claim {
    claims: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Claims {
    fn claim(&self, id: &str) -> Option<Claim> {
        self.0.lock().insert(id.to_string()).then(|| Claim {
            claims: Arc::clone(&self.0),
            id: id.to_string(),
        })
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.claims.lock().remove(&self.id);
    }
}

#[derive(Clone)]
pub struct NotificationService {
    records: RecordService<pb::Notification>,
    events: Repository<pb::NotificationEvent>,
    email_templates: Repository<pb::EmailTemplate>,
    sms_templates: Repository<pb::SmsTemplate>,
    audit: Arc<dyn AuditService>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
    claims: Claims,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        audit: Arc<dyn AuditService>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self {
            records: RecordService::new(Arc::clone(&store), Arc::clone(&audit)),
            events: Repository::new(Arc::clone(&store)),
            email_templates: Repository::new(Arc::clone(&store)),
            sms_templates: Repository::new(store),
            audit,
            email,
            sms,
            claims: Claims::default(),
        }
    }

    /// Queues a notification, delivering it at once when its event is `IMMEDIATE`.
    ///
    /// # Errors
    ///
    /// - `NotAcceptable` for invalid recipients or a missing event id.
    /// - `NotFound` if the event (or named patient) does not exist.
    /// - `FailedPrecondition` if immediate delivery finds template variables missing.
    pub async fn send(
        &self,
        actor: &Actor,
        mut notification: pb::Notification,
    ) -> CoreResult<pb::Notification> {
        notification.validate()?;
        let event = self.find_event(notification.event_id.trim())?;

        let has_email = !(notification.to_email.is_empty()
            && notification.cc_email.is_empty()
            && notification.bcc_email.is_empty());
        let has_sms = !notification.to_phone_number.is_empty();

        notification.priority = event.priority;
        notification.email_status =
            channel_status(!event.email_template_id.trim().is_empty(), has_email);
        notification.sms_status = channel_status(!event.sms_template_id.trim().is_empty(), has_sms);
        notification.email_failure_count = 0;
        notification.sms_failure_count = 0;
        notification.sent_at.clear();

        let stored = self.records.create(actor, notification)?;
        tracing::info!(
            id = %stored.id,
            event = %event.event_name,
            priority = event.priority,
            "notification queued"
        );

        if event.priority == NotificationPriority::Immediate as i32 {
            return self.process(actor, &stored.id).await;
        }
        Ok(stored)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> CoreResult<pb::Notification> {
        self.records.get(actor, id)
    }

    pub fn list(&self, query: &ListQuery) -> CoreResult<Page<pb::Notification>> {
        self.records.list(query)
    }

    /// Attempts delivery on every `PENDING` channel and persists the result.
    ///
    /// Every pending channel is rendered before any sender is called. A channel whose
    /// template is missing or whose variables are incomplete is marked `FAILED`; the other
    /// channels are still delivered, and the first such error is returned after the
    /// outcome is saved. A notification already being processed elsewhere is returned as
    /// stored, untouched.
    pub async fn process(&self, actor: &Actor, id: &str) -> CoreResult<pb::Notification> {
        let Some(_claim) = self.claims.claim(id) else {
            tracing::debug!(id, "notification already being processed");
            return self.records.find(id);
        };
        let mut notification = self.records.find(id)?;
        let event = self.find_event(&notification.event_id)?;

        let email = (notification.email_status == PENDING)
            .then(|| self.email_message(&event, &notification));
        let sms =
            (notification.sms_status == PENDING).then(|| self.sms_message(&event, &notification));

        let mut rejected = None;
        let mut sent_via = Vec::new();

        match email {
            Some(Ok(message)) => {
                let delivery = match self.email.send_email(&message).await {
                    Ok(()) => {
                        sent_via.push("email");
                        Delivery::Sent
                    }
                    Err(e) => {
                        tracing::warn!(id, "email delivery failed: {e}");
                        Delivery::Failed
                    }
                };
                apply_delivery(
                    &mut notification.email_status,
                    &mut notification.email_failure_count,
                    event.email_retry,
                    delivery,
                );
            }
            Some(Err(e)) => {
                tracing::warn!(id, "email not deliverable: {e}");
                reject_channel(&mut notification.email_status, &mut notification.email_failure_count);
                rejected = rejected.or(Some(e));
            }
            None => {}
        }

        match sms {
            Some(Ok(message)) => {
                let delivery = match self.sms.send_sms(&message).await {
                    Ok(()) => {
                        sent_via.push("sms");
                        Delivery::Sent
                    }
                    Err(e) => {
                        tracing::warn!(id, "sms delivery failed: {e}");
                        Delivery::Failed
                    }
                };
                apply_delivery(
                    &mut notification.sms_status,
                    &mut notification.sms_failure_count,
                    event.sms_retry,
                    delivery,
                );
            }
            Some(Err(e)) => {
                tracing::warn!(id, "sms not deliverable: {e}");
                reject_channel(&mut notification.sms_status, &mut notification.sms_failure_count);
                rejected = rejected.or(Some(e));
            }
            None => {}
        }

        let now = now_rfc3339();
        if !sent_via.is_empty() {
            notification.sent_at = now.clone();
        }
        notification.set_modified(now, actor.user_id().to_string());
        self.records.repository().replace(&notification)?;

        if !sent_via.is_empty() {
            self.audit.record(AuditEvent::new(
                AuditEventType::CommunicationSent,
                actor,
                notification.subject_id(),
                format!("{NOTIFICATIONS}/{}", notification.id),
                format!("notification sent via {}", sent_via.join(" and ")),
            ))?;
        }

        match rejected {
            Some(e) => Err(e),
            None => Ok(notification),
        }
    }

    fn email_message(
        &self,
        event: &pb::NotificationEvent,
        notification: &pb::Notification,
    ) -> CoreResult<EmailMessage> {
        let template = self
            .email_templates
            .find_by_id(&event.email_template_id)?
            .ok_or_else(|| {
                CoreError::NotFound(format!("email template {} not found", event.email_template_id))
            })?;
        check_variables(&template.variables, &notification.variables)?;
        Ok(EmailMessage {
            to: notification.to_email.clone(),
            cc: notification.cc_email.clone(),
            bcc: notification.bcc_email.clone(),
            subject: render(&template.subject, &notification.variables),
            body: render(&template.content, &notification.variables),
        })
    }

    fn sms_message(
        &self,
        event: &pb::NotificationEvent,
        notification: &pb::Notification,
    ) -> CoreResult<SmsMessage> {
        let template = self
            .sms_templates
            .find_by_id(&event.sms_template_id)?
            .ok_or_else(|| {
                CoreError::NotFound(format!("sms template {} not found", event.sms_template_id))
            })?;
        check_variables(&template.variables, &notification.variables)?;
        Ok(SmsMessage {
            to: notification.to_phone_number.clone(),
            body: render(&template.message, &notification.variables),
        })
    }

    /// Processes every notification with a pending channel, oldest first.
    ///
    /// `Unspecified` matches every priority. Errors on individual notifications are logged
    /// and counted as failures rather than aborting the run.
    pub async fn process_pending(
        &self,
        actor: &Actor,
        priority: NotificationPriority,
    ) -> CoreResult<pb::ProcessNotificationsRes> {
        let mut pending: Vec<pb::Notification> = self
            .records
            .list(&ListQuery::default())?
            .items
            .into_iter()
            .filter(|n| n.email_status == PENDING || n.sms_status == PENDING)
            .filter(|n| {
                priority == NotificationPriority::Unspecified || n.priority == priority as i32
            })
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut summary = pb::ProcessNotificationsRes::default();
        for before in pending {
            summary.processed += 1;
            let id = before.id.clone();
            let (email_before, sms_before) = (before.email_status, before.sms_status);
            let failures_before = before.email_failure_count + before.sms_failure_count;

            let after = match self.process(actor, &id).await {
                Ok(after) => {
                    if after.email_failure_count + after.sms_failure_count > failures_before {
                        summary.failed += 1;
                    }
                    Some(after)
                }
                Err(e) => {
                    tracing::warn!(id = %id, "notification processing failed: {e}");
                    summary.failed += 1;
                    self.records.find(&id).ok()
                }
            };
            if let Some(after) = after {
                let newly_sent = (email_before == PENDING && after.email_status == SENT)
                    || (sms_before == PENDING && after.sms_status == SENT);
                if newly_sent {
                    summary.sent += 1;
                }
            }
        }

        if summary.processed > 0 {
            tracing::info!(
                processed = summary.processed,
                sent = summary.sent,
                failed = summary.failed,
                "processed pending notifications"
            );
        }
        Ok(summary)
    }

    fn find_event(&self, id: &str) -> CoreResult<pb::NotificationEvent> {
        self.events
            .find_by_id(id)?
            .ok_or_else(|| CoreError::NotFound(format!("notification event {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::StoreAuditService;
    use crate::senders::{LoggingSmsSender, MockEmailSender, MockSmsSender};
    use crate::services::{ProfileService, RecordService};
    use crate::store::MemoryDocumentStore;
    use std::collections::HashMap;

    struct Fixture {
        store: Arc<dyn DocumentStore>,
        audit: Arc<dyn AuditService>,
        patient_id: String,
    }

    impl Fixture {
        fn new() -> Self {
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
            let audit: Arc<dyn AuditService> = Arc::new(StoreAuditService::new(store.clone()));
            let patient = ProfileService::new(store.clone(), audit.clone())
                .create(
                    &Actor::system(),
                    pb::Profile {
                        first_name: "Jane".into(),
                        last_name: "Doe".into(),
                        national_health_id: "NH-1".into(),
                        ..Default::default()
                    },
                )
                .unwrap();
            Self {
                store,
                audit,
                patient_id: patient.id,
            }
        }

        fn event(&self, priority: NotificationPriority, email_retry: i32, with_sms: bool) -> String {
            let sms_variables: &[&str] = if with_sms { &["code"] } else { &[] };
            self.event_with_sms(priority, email_retry, with_sms.then_some(sms_variables))
        }

        fn event_with_sms(
            &self,
            priority: NotificationPriority,
            email_retry: i32,
            sms_variables: Option<&[&str]>,
        ) -> String {
            let email = RecordService::<pb::EmailTemplate>::new(self.store.clone(), self.audit.clone())
                .create(
                    &Actor::system(),
                    pb::EmailTemplate {
                        subject: "Hello {{first_name}}".into(),
                        content: "Your code is {{code}}".into(),
                        variables: vec!["first_name".into(), "code".into()],
                        ..Default::default()
                    },
                )
                .unwrap();
            let sms_template_id = if let Some(variables) = sms_variables {
                let message = variables
                    .iter()
                    .map(|v| format!("{{{{{v}}}}}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                RecordService::<pb::SmsTemplate>::new(self.store.clone(), self.audit.clone())
                    .create(
                        &Actor::system(),
                        pb::SmsTemplate {
                            message: format!("Code {message}"),
                            variables: variables.iter().map(|v| v.to_string()).collect(),
                            ..Default::default()
                        },
                    )
                    .unwrap()
                    .id
            } else {
                String::new()
            };
            RecordService::<pb::NotificationEvent>::new(self.store.clone(), self.audit.clone())
                .create(
                    &Actor::system(),
                    pb::NotificationEvent {
                        event_name: "code".into(),
                        email_template_id: email.id,
                        sms_template_id,
                        priority: priority as i32,
                        email_retry,
                        ..Default::default()
                    },
                )
                .unwrap()
                .id
        }

        fn service(&self, email: MockEmailSender, sms: Arc<dyn SmsSender>) -> NotificationService {
            NotificationService::new(self.store.clone(), self.audit.clone(), Arc::new(email), sms)
        }

        fn notification(&self, event_id: &str) -> pb::Notification {
            pb::Notification {
                event_id: event_id.into(),
                patient_id: self.patient_id.clone(),
                to_email: vec!["jane@example.org".into()],
                variables: HashMap::from([
                    ("first_name".to_string(), "Jane".to_string()),
                    ("code".to_string(), "1234".to_string()),
                ]),
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_apply_delivery_threshold() {
        let (mut status, mut failures) = (PENDING, 0);
        apply_delivery(&mut status, &mut failures, 2, Delivery::Failed);
        assert_eq!((status, failures), (PENDING, 1));
        apply_delivery(&mut status, &mut failures, 2, Delivery::Failed);
        assert_eq!((status, failures), (FAILED, 2));

        let (mut status, mut failures) = (PENDING, 0);
        apply_delivery(&mut status, &mut failures, 0, Delivery::Failed);
        assert_eq!(status, FAILED, "a zero retry count still allows one attempt");
    }

    #[tokio::test]
    async fn test_immediate_notification_is_rendered_and_sent() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::Immediate, 3, false);

        let mut email = MockEmailSender::new();
        email
            .expect_send_email()
            .withf(|m: &EmailMessage| {
                m.subject == "Hello Jane" && m.body == "Your code is 1234" && m.to.len() == 1
            })
            .times(1)
            .returning(|_| Ok(()));
        let svc = f.service(email, Arc::new(LoggingSmsSender));

        let sent = svc
            .send(&Actor::new("clinic"), f.notification(&event_id))
            .await
            .unwrap();
        assert_eq!(sent.email_status, SENT);
        assert_eq!(sent.sms_status, NOT_REQUIRED);
        assert!(!sent.sent_at.is_empty());
        assert_eq!(sent.priority, NotificationPriority::Immediate as i32);

        let stored = svc.get(&Actor::system(), &sent.id).unwrap();
        assert_eq!(stored.email_status, SENT);

        let audited = f.audit.events_for_patient(&f.patient_id).unwrap();
        assert!(audited
            .iter()
            .any(|e| e.event_type == AuditEventType::CommunicationSent));
    }

    #[tokio::test]
    async fn test_missing_variables_fail_precondition() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::Immediate, 3, false);
        let svc = f.service(MockEmailSender::new(), Arc::new(LoggingSmsSender));

        let mut notification = f.notification(&event_id);
        notification.variables.remove("code");
        let err = svc.send(&Actor::system(), notification).await.unwrap_err();
        assert!(matches!(err, CoreError::FailedPrecondition(msg) if msg.contains("code")));

        let stored = svc.list(&ListQuery::default()).unwrap().items;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email_status, FAILED);
        assert_eq!(stored[0].email_failure_count, 1);
    }

    #[tokio::test]
    async fn test_unrenderable_sms_does_not_resend_email() {
        let f = Fixture::new();
        let event_id = f.event_with_sms(NotificationPriority::Low, 3, Some(&["pin"]));

        let mut email = MockEmailSender::new();
        email.expect_send_email().times(1).returning(|_| Ok(()));
        let svc = f.service(email, Arc::new(MockSmsSender::new()));

        let mut notification = f.notification(&event_id);
        notification.to_phone_number = vec!["+15550100123".into()];
        let queued = svc.send(&Actor::system(), notification).await.unwrap();
        assert_eq!((queued.email_status, queued.sms_status), (PENDING, PENDING));

        let first = svc
            .process_pending(&Actor::system(), NotificationPriority::Unspecified)
            .await
            .unwrap();
        assert_eq!((first.processed, first.sent, first.failed), (1, 1, 1));

        for _ in 0..2 {
            let again = svc
                .process_pending(&Actor::system(), NotificationPriority::Unspecified)
                .await
                .unwrap();
            assert_eq!(again.processed, 0);
        }

        let stored = svc.get(&Actor::system(), &queued.id).unwrap();
        assert_eq!(stored.email_status, SENT);
        assert_eq!(stored.sms_status, FAILED);
        assert_eq!(stored.sms_failure_count, 1);
        assert!(!stored.sent_at.is_empty());

        let audited = f.audit.events_for_patient(&f.patient_id).unwrap();
        assert_eq!(
            audited
                .iter()
                .filter(|e| e.event_type == AuditEventType::CommunicationSent)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_queued_notification_with_missing_variables_fails_once() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::Medium, 3, false);
        let svc = f.service(MockEmailSender::new(), Arc::new(LoggingSmsSender));

        let mut notification = f.notification(&event_id);
        notification.variables.remove("first_name");
        let queued = svc.send(&Actor::system(), notification).await.unwrap();
        assert_eq!(queued.email_status, PENDING);

        let first = svc
            .process_pending(&Actor::system(), NotificationPriority::Unspecified)
            .await
            .unwrap();
        assert_eq!((first.processed, first.sent, first.failed), (1, 0, 1));

        let again = svc
            .process_pending(&Actor::system(), NotificationPriority::Unspecified)
            .await
            .unwrap();
        assert_eq!(again.processed, 0);

        let stored = svc.get(&Actor::system(), &queued.id).unwrap();
        assert_eq!(stored.email_status, FAILED);
        assert!(stored.sent_at.is_empty());
    }

    #[tokio::test]
    async fn test_sms_send_failure_does_not_block_email() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::High, 3, true);

        let mut email = MockEmailSender::new();
        email.expect_send_email().times(1).returning(|_| Ok(()));
        let mut sms = MockSmsSender::new();
        sms.expect_send_sms()
            .times(1)
            .returning(|_| Err(CoreError::ExternalService("gateway down".into())));
        let svc = f.service(email, Arc::new(sms));

        let mut notification = f.notification(&event_id);
        notification.to_phone_number = vec!["+15550100123".into()];
        let queued = svc.send(&Actor::system(), notification).await.unwrap();

        let summary = svc
            .process_pending(&Actor::system(), NotificationPriority::High)
            .await
            .unwrap();
        assert_eq!((summary.processed, summary.sent, summary.failed), (1, 1, 1));

        let stored = svc.get(&Actor::system(), &queued.id).unwrap();
        assert_eq!(stored.email_status, SENT);
        assert_eq!(stored.sms_status, FAILED, "a zero sms retry allows one attempt");
        assert_eq!(stored.sms_failure_count, 1);

        let again = svc
            .process_pending(&Actor::system(), NotificationPriority::Unspecified)
            .await
            .unwrap();
        assert_eq!(again.processed, 0);
    }

    #[tokio::test]
    async fn test_claimed_notification_is_left_alone() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::Low, 3, false);

        let mut email = MockEmailSender::new();
        email.expect_send_email().times(1).returning(|_| Ok(()));
        let svc = f.service(email, Arc::new(LoggingSmsSender));
        let queued = svc.send(&Actor::system(), f.notification(&event_id)).await.unwrap();

        let claim = svc.claims.claim(&queued.id).expect("unclaimed");
        assert!(svc.claims.claim(&queued.id).is_none());
        let untouched = svc.process(&Actor::system(), &queued.id).await.unwrap();
        assert_eq!(untouched.email_status, PENDING);
        drop(claim);

        let delivered = svc.process(&Actor::system(), &queued.id).await.unwrap();
        assert_eq!(delivered.email_status, SENT);
        let repeat = svc.process(&Actor::system(), &queued.id).await.unwrap();
        assert_eq!(repeat.email_status, SENT);
    }

    #[tokio::test]
    async fn test_failures_count_until_retry_threshold() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::Immediate, 2, false);

        let mut email = MockEmailSender::new();
        email
            .expect_send_email()
            .times(2)
            .returning(|_| Err(CoreError::ExternalService("smtp down".into())));
        let svc = f.service(email, Arc::new(LoggingSmsSender));

        let first = svc.send(&Actor::system(), f.notification(&event_id)).await.unwrap();
        assert_eq!(first.email_status, PENDING);
        assert_eq!(first.email_failure_count, 1);

        let summary = svc
            .process_pending(&Actor::system(), NotificationPriority::Unspecified)
            .await
            .unwrap();
        assert_eq!((summary.processed, summary.sent, summary.failed), (1, 0, 1));

        let stored = svc.get(&Actor::system(), &first.id).unwrap();
        assert_eq!(stored.email_status, FAILED);
        assert_eq!(stored.email_failure_count, 2);

        let again = svc
            .process_pending(&Actor::system(), NotificationPriority::Unspecified)
            .await
            .unwrap();
        assert_eq!(again.processed, 0, "failed channels are not retried");
    }

    #[tokio::test]
    async fn test_queued_notifications_processed_by_priority() {
        let f = Fixture::new();
        let event_id = f.event(NotificationPriority::Low, 1, true);

        let mut email = MockEmailSender::new();
        email.expect_send_email().times(1).returning(|_| Ok(()));
        let mut sms = MockSmsSender::new();
        sms.expect_send_sms()
            .withf(|m: &SmsMessage| m.body == "Code 1234")
            .times(1)
            .returning(|_| Ok(()));
        let svc = f.service(email, Arc::new(sms));

        let mut notification = f.notification(&event_id);
        notification.to_phone_number = vec!["+15550100123".into()];
        let queued = svc.send(&Actor::system(), notification).await.unwrap();
        assert_eq!(queued.email_status, PENDING);
        assert_eq!(queued.sms_status, PENDING);

        let high = svc
            .process_pending(&Actor::system(), NotificationPriority::High)
            .await
            .unwrap();
        assert_eq!(high.processed, 0);

        let low = svc
            .process_pending(&Actor::system(), NotificationPriority::Low)
            .await
            .unwrap();
        assert_eq!((low.processed, low.sent, low.failed), (1, 1, 0));

        let stored = svc.get(&Actor::system(), &queued.id).unwrap();
        assert_eq!(stored.email_status, SENT);
        assert_eq!(stored.sms_status, SENT);
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let f = Fixture::new();
        let svc = f.service(MockEmailSender::new(), Arc::new(LoggingSmsSender));
        let err = svc
            .send(&Actor::system(), f.notification("ffffffffffffffffffffffffffffffff"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
