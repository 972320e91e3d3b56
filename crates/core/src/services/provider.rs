//! Providers and NPI registry import.

use super::RecordService;
use crate::actor::Actor;
use crate::audit::AuditService;
use crate::external::NpiRegistry;
use crate::records::is_valid_npi;
use crate::repository::{ListQuery, Page};
use crate::store::DocumentStore;
use crate::{CoreError, CoreResult};
use api_shared::pb;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProviderService {
    records: RecordService<pb::Provider>,
    registry: Arc<dyn NpiRegistry>,
}

impl ProviderService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        audit: Arc<dyn AuditService>,
        registry: Arc<dyn NpiRegistry>,
    ) -> Self {
        Self {
            records: RecordService::new(store, audit),
            registry,
        }
    }

    pub fn create(&self, actor: &Actor, provider: pb::Provider) -> CoreResult<pb::Provider> {
        self.records.create(actor, provider)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> CoreResult<pb::Provider> {
        self.records.get(actor, id)
    }

    pub fn update(&self, actor: &Actor, provider: pb::Provider) -> CoreResult<pb::Provider> {
        self.records.update(actor, provider)
    }

    pub fn delete(&self, actor: &Actor, id: &str) -> CoreResult<pb::DeleteRes> {
        self.records.delete(actor, id)
    }

    pub fn list(&self, query: &ListQuery) -> CoreResult<Page<pb::Provider>> {
        self.records.list(query)
    }

    /// Imports a provider from the NPI registry.
    ///
    /// A stored provider with the same NPI is refreshed in place; otherwise a new one is
    /// created.
    ///
    /// # Errors
    ///
    /// - `NotAcceptable` if `npi_number` is not ten digits.
    /// - `NotFound` if the registry has no such provider.
    /// - `ExternalService` if the registry call fails.
    pub async fn load_provider(&self, actor: &Actor, npi_number: &str) -> CoreResult<pb::Provider> {
        let npi_number = npi_number.trim();
        if !is_valid_npi(npi_number) {
            return Err(CoreError::NotAcceptable("npi_number must be 10 digits".into()));
        }

        let mut provider = self
            .registry
            .lookup(npi_number)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("no provider registered for NPI {npi_number}")))?;
        provider.npi_number = npi_number.to_string();

        let existing = self
            .records
            .repository()
            .find_where("npi_number", npi_number)?
            .into_iter()
            .next();

        match existing {
            Some(existing) => {
                tracing::info!(npi_number, id = %existing.id, "refreshing provider from NPI registry");
                provider.id = existing.id;
                self.records.update(actor, provider)
            }
            None => {
                tracing::info!(npi_number, "importing provider from NPI registry");
                self.records.create(actor, provider)
            }
        }
    }
}
