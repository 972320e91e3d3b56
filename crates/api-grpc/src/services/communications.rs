//! Communications group: templates, notification events, notifications and CDC reports.

use super::{record_service, CdxGrpcService};
use crate::context::actor_from_request;
use crate::crud::{self, RpcResult};
use crate::status::to_status;
use api_shared::pb;
use api_shared::pb::{
    cdc_service_server::CdcService, notification_service_server::NotificationService,
    template_service_server::TemplateService, NotificationPriority,
};
use cdx_core::ListQuery;
use tonic::{Request, Response, Status};

record_service!(
    pb::notification_event_service_server::NotificationEventService, notification_events,
    pb::NotificationEvent, pb::NotificationEventList,
    create_notification_event, get_notification_event, update_notification_event,
    delete_notification_event, list_notification_events
);

#[tonic::async_trait]
impl TemplateService for CdxGrpcService {
    async fn create_email_template(
        &self,
        request: Request<pb::EmailTemplate>,
    ) -> RpcResult<pb::EmailTemplate> {
        crud::create(&self.services.email_templates, request)
    }

    async fn get_email_template(&self, request: Request<pb::IdReq>) -> RpcResult<pb::EmailTemplate> {
        crud::get(&self.services.email_templates, request)
    }

    async fn update_email_template(
        &self,
        request: Request<pb::EmailTemplate>,
    ) -> RpcResult<pb::EmailTemplate> {
        crud::update(&self.services.email_templates, request)
    }

    async fn delete_email_template(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.email_templates, request)
    }

    async fn list_email_templates(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::EmailTemplateList> {
        crud::list(&self.services.email_templates, request)
    }

    async fn create_sms_template(
        &self,
        request: Request<pb::SmsTemplate>,
    ) -> RpcResult<pb::SmsTemplate> {
        crud::create(&self.services.sms_templates, request)
    }

    async fn get_sms_template(&self, request: Request<pb::IdReq>) -> RpcResult<pb::SmsTemplate> {
        crud::get(&self.services.sms_templates, request)
    }

    async fn update_sms_template(
        &self,
        request: Request<pb::SmsTemplate>,
    ) -> RpcResult<pb::SmsTemplate> {
        crud::update(&self.services.sms_templates, request)
    }

    async fn delete_sms_template(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        crud::delete(&self.services.sms_templates, request)
    }

    async fn list_sms_templates(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::SmsTemplateList> {
        crud::list(&self.services.sms_templates, request)
    }
}

#[tonic::async_trait]
impl NotificationService for CdxGrpcService {
    async fn send_notification(
        &self,
        request: Request<pb::Notification>,
    ) -> RpcResult<pb::Notification> {
        let actor = actor_from_request(&request);
        self.services
            .notifications
            .send(&actor, request.into_inner())
            .await
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_notification(&self, request: Request<pb::IdReq>) -> RpcResult<pb::Notification> {
        let actor = actor_from_request(&request);
        self.services
            .notifications
            .get(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn list_notifications(
        &self,
        request: Request<pb::ListReq>,
    ) -> RpcResult<pb::NotificationList> {
        let query = ListQuery::from(request.into_inner());
        self.services
            .notifications
            .list(&query)
            .map(|page| Response::new(page.into()))
            .map_err(to_status)
    }

    async fn process_notifications(
        &self,
        request: Request<pb::ProcessNotificationsReq>,
    ) -> RpcResult<pb::ProcessNotificationsRes> {
        let actor = actor_from_request(&request);
        let raw = request.into_inner().priority;
        let priority = NotificationPriority::try_from(raw)
            .map_err(|_| Status::invalid_argument(format!("unknown priority {raw}")))?;
        self.services
            .notifications
            .process_pending(&actor, priority)
            .await
            .map(Response::new)
            .map_err(to_status)
    }
}

#[tonic::async_trait]
impl CdcService for CdxGrpcService {
    async fn send_cdc_message(
        &self,
        request: Request<pb::CdcMessageReq>,
    ) -> RpcResult<pb::CdcMessageRes> {
        let actor = actor_from_request(&request);
        self.services
            .cdc
            .send(&actor, &request.into_inner().message)
            .await
            .map(Response::new)
            .map_err(to_status)
    }
}
