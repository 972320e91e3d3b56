//! tonic service implementations.
//!
//! One [`CdxGrpcService`] value implements every generated service trait; each trait impl
//! lives with the other services of its group.

mod client;
mod communications;
mod health;

use api_shared::pb::{system_server::System, HealthRes};
use api_shared::HealthService;
use cdx_core::CdxServices;
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Simple CRUD services: every RPC delegates to a `RecordService` through `crud`.
macro_rules! record_service {
    (
        $trait_path:path, $field:ident, $ty:ty, $list:ty,
        $create:ident, $get:ident, $update:ident, $delete:ident, $list_fn:ident
    ) => {
        #[tonic::async_trait]
        impl $trait_path for crate::services::CdxGrpcService {
            async fn $create(
                &self,
                request: tonic::Request<$ty>,
            ) -> crate::crud::RpcResult<$ty> {
                crate::crud::create(&self.services.$field, request)
            }

            async fn $get(
                &self,
                request: tonic::Request<api_shared::pb::IdReq>,
            ) -> crate::crud::RpcResult<$ty> {
                crate::crud::get(&self.services.$field, request)
            }

            async fn $update(
                &self,
                request: tonic::Request<$ty>,
            ) -> crate::crud::RpcResult<$ty> {
                crate::crud::update(&self.services.$field, request)
            }

            async fn $delete(
                &self,
                request: tonic::Request<api_shared::pb::IdReq>,
            ) -> crate::crud::RpcResult<api_shared::pb::DeleteRes> {
                crate::crud::delete(&self.services.$field, request)
            }

            async fn $list_fn(
                &self,
                request: tonic::Request<api_shared::pb::ListReq>,
            ) -> crate::crud::RpcResult<$list> {
                crate::crud::list(&self.services.$field, request)
            }
        }
    };
}

pub(crate) use record_service;

#[derive(Clone)]
pub struct CdxGrpcService {
    services: Arc<CdxServices>,
}

impl CdxGrpcService {
    pub fn new(services: Arc<CdxServices>) -> Self {
        Self { services }
    }
}

#[tonic::async_trait]
impl System for CdxGrpcService {
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        let health_res = HealthService::check_health();
        Ok(Response::new(health_res))
    }
}
