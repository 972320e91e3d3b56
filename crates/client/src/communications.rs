//! Templates, notification events, notifications and CDC reporting.

use crate::{service_client, unary};
use api_shared::pb::{
    self, cdc_service_client::CdcServiceClient,
    notification_event_service_client::NotificationEventServiceClient,
    notification_service_client::NotificationServiceClient,
    template_service_client::TemplateServiceClient,
};

service_client!(TemplateClient => TemplateServiceClient);
service_client!(NotificationEventClient => NotificationEventServiceClient);
service_client!(NotificationClient => NotificationServiceClient);
service_client!(CdcClient => CdcServiceClient);

impl TemplateClient {
    unary! {
        create_email_template(pb::EmailTemplate) -> pb::EmailTemplate;
        get_email_template(pb::IdReq) -> pb::EmailTemplate;
        update_email_template(pb::EmailTemplate) -> pb::EmailTemplate;
        delete_email_template(pb::IdReq) -> pb::DeleteRes;
        list_email_templates(pb::ListReq) -> pb::EmailTemplateList;

        create_sms_template(pb::SmsTemplate) -> pb::SmsTemplate;
        get_sms_template(pb::IdReq) -> pb::SmsTemplate;
        update_sms_template(pb::SmsTemplate) -> pb::SmsTemplate;
        delete_sms_template(pb::IdReq) -> pb::DeleteRes;
        list_sms_templates(pb::ListReq) -> pb::SmsTemplateList;
    }
}

impl NotificationEventClient {
    unary! {
        create_notification_event(pb::NotificationEvent) -> pb::NotificationEvent;
        get_notification_event(pb::IdReq) -> pb::NotificationEvent;
        update_notification_event(pb::NotificationEvent) -> pb::NotificationEvent;
        delete_notification_event(pb::IdReq) -> pb::DeleteRes;
        list_notification_events(pb::ListReq) -> pb::NotificationEventList;
    }
}

impl NotificationClient {
    unary! {
        /// Queues a notification; `IMMEDIATE` events are delivered before the call returns.
        send_notification(pb::Notification) -> pb::Notification;
        get_notification(pb::IdReq) -> pb::Notification;
        list_notifications(pb::ListReq) -> pb::NotificationList;
        process_notifications(pb::ProcessNotificationsReq) -> pb::ProcessNotificationsRes;
    }
}

impl CdcClient {
    unary! {
        send_cdc_message(pb::CdcMessageReq) -> pb::CdcMessageRes;
    }
}
