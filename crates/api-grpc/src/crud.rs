//! Shared request handling for record RPCs.

use crate::context::actor_from_request;
use crate::status::to_status;
use api_shared::pb;
use cdx_core::repository::Page;
use cdx_core::services::RecordService;
use cdx_core::{ListQuery, Record};
use tonic::{Request, Response, Status};

pub(crate) type RpcResult<T> = Result<Response<T>, Status>;

pub(crate) fn create<T: Record>(svc: &RecordService<T>, request: Request<T>) -> RpcResult<T> {
    let actor = actor_from_request(&request);
    svc.create(&actor, request.into_inner())
        .map(Response::new)
        .map_err(to_status)
}

pub(crate) fn get<T: Record>(svc: &RecordService<T>, request: Request<pb::IdReq>) -> RpcResult<T> {
    let actor = actor_from_request(&request);
    svc.get(&actor, &request.into_inner().id)
        .map(Response::new)
        .map_err(to_status)
}

pub(crate) fn update<T: Record>(svc: &RecordService<T>, request: Request<T>) -> RpcResult<T> {
    let actor = actor_from_request(&request);
    svc.update(&actor, request.into_inner())
        .map(Response::new)
        .map_err(to_status)
}

pub(crate) fn delete<T: Record>(
    svc: &RecordService<T>,
    request: Request<pb::IdReq>,
) -> RpcResult<pb::DeleteRes> {
    let actor = actor_from_request(&request);
    svc.delete(&actor, &request.into_inner().id)
        .map(Response::new)
        .map_err(to_status)
}

pub(crate) fn list<T, L>(svc: &RecordService<T>, request: Request<pb::ListReq>) -> RpcResult<L>
where
    T: Record,
    L: From<Page<T>>,
{
    let query = ListQuery::from(request.into_inner());
    svc.list(&query)
        .map(|page| Response::new(L::from(page)))
        .map_err(to_status)
}
