//! Clients for third-party registries.

mod npi;
mod openfda;

pub use npi::{provider_from_npi_result, HttpNpiRegistry, NpiRegistry, NpiResult};
pub use openfda::{medication_from_ndc_product, DrugCatalog, NdcProduct, OpenFdaCatalog};

#[cfg(test)]
pub use npi::MockNpiRegistry;
#[cfg(test)]
pub use openfda::MockDrugCatalog;
