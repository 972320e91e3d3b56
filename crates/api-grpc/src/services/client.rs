//! Client group: patient profiles and providers.

use super::CdxGrpcService;
use crate::context::actor_from_request;
use crate::crud::RpcResult;
use crate::status::to_status;
use api_shared::pb;
use api_shared::pb::{profile_service_server::ProfileService, provider_service_server::ProviderService};
use cdx_core::ListQuery;
use tonic::{Request, Response};

#[tonic::async_trait]
impl ProfileService for CdxGrpcService {
    async fn create_profile(&self, request: Request<pb::Profile>) -> RpcResult<pb::Profile> {
        let actor = actor_from_request(&request);
        self.services
            .profiles
            .create(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_profile(&self, request: Request<pb::IdReq>) -> RpcResult<pb::Profile> {
        let actor = actor_from_request(&request);
        self.services
            .profiles
            .get(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_profile_by_nhid(&self, request: Request<pb::NhidReq>) -> RpcResult<pb::Profile> {
        let actor = actor_from_request(&request);
        self.services
            .profiles
            .get_by_nhid(&actor, &request.into_inner().national_health_id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn update_profile(&self, request: Request<pb::Profile>) -> RpcResult<pb::Profile> {
        let actor = actor_from_request(&request);
        self.services
            .profiles
            .update(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn delete_profile(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        let actor = actor_from_request(&request);
        self.services
            .profiles
            .delete(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn list_profiles(&self, request: Request<pb::ListReq>) -> RpcResult<pb::ProfileList> {
        let query = ListQuery::from(request.into_inner());
        self.services
            .profiles
            .list(&query)
            .map(|page| Response::new(page.into()))
            .map_err(to_status)
    }
}

#[tonic::async_trait]
impl ProviderService for CdxGrpcService {
    async fn create_provider(&self, request: Request<pb::Provider>) -> RpcResult<pb::Provider> {
        let actor = actor_from_request(&request);
        self.services
            .providers
            .create(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn get_provider(&self, request: Request<pb::IdReq>) -> RpcResult<pb::Provider> {
        let actor = actor_from_request(&request);
        self.services
            .providers
            .get(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn update_provider(&self, request: Request<pb::Provider>) -> RpcResult<pb::Provider> {
        let actor = actor_from_request(&request);
        self.services
            .providers
            .update(&actor, request.into_inner())
            .map(Response::new)
            .map_err(to_status)
    }

    async fn delete_provider(&self, request: Request<pb::IdReq>) -> RpcResult<pb::DeleteRes> {
        let actor = actor_from_request(&request);
        self.services
            .providers
            .delete(&actor, &request.into_inner().id)
            .map(Response::new)
            .map_err(to_status)
    }

    async fn list_providers(&self, request: Request<pb::ListReq>) -> RpcResult<pb::ProviderList> {
        let query = ListQuery::from(request.into_inner());
        self.services
            .providers
            .list(&query)
            .map(|page| Response::new(page.into()))
            .map_err(to_status)
    }

    async fn load_provider(
        &self,
        request: Request<pb::LoadProviderReq>,
    ) -> RpcResult<pb::Provider> {
        let actor = actor_from_request(&request);
        self.services
            .providers
            .load_provider(&actor, &request.into_inner().npi_number)
            .await
            .map(Response::new)
            .map_err(to_status)
    }
}
