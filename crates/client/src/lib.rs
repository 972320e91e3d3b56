//! # CDX Client
//!
//! Typed async wrappers over the CDX gRPC services.
//!
//! Every wrapper shares one [`tonic::transport::Channel`] and the same [`CallCredentials`];
//! cloning a wrapper is cheap. Server statuses come back as [`ClientError`] with the
//! original code preserved.

#![warn(rust_2018_idioms)]

mod communications;
mod credentials;
mod error;
mod health;
mod identity;
mod system;

pub use api_shared::pb;
pub use communications::{CdcClient, NotificationClient, NotificationEventClient, TemplateClient};
pub use credentials::CallCredentials;
pub use error::{ClientError, ClientResult};
pub use health::{
    AllergyClient, AnalysisEngineClient, ConnectedLabClient, DoctorNotesClient,
    MedicalConditionClient, MedicalHistoryClient, MedicalRecordClient,
    MedicationAdministrationClient, MedicationClient, VaccineClient, VitalsClient,
};
pub use identity::{ProfileClient, ProviderClient};
pub use system::SystemClient;

use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint};

pub(crate) type Transport = InterceptedService<Channel, CallCredentials>;

/// Declares a wrapper struct over one generated client.
macro_rules! service_client {
    ($(#[$meta:meta])* $name:ident => $generated:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            inner: $generated<crate::Transport>,
        }

        impl $name {
            pub fn new(
                channel: tonic::transport::Channel,
                credentials: crate::CallCredentials,
            ) -> Self {
                Self {
                    inner: $generated::with_interceptor(channel, credentials),
                }
            }
        }
    };
}

/// Declares unary methods that forward to the generated client of the same name.
macro_rules! unary {
    ($($(#[$meta:meta])* $method:ident($req:ty) -> $res:ty;)*) => {
        $(
            $(#[$meta])*
            pub async fn $method(&self, request: $req) -> crate::ClientResult<$res> {
                let mut client = self.inner.clone();
                let response = client.$method(request).await.map_err(|status| {
                    tracing::debug!(method = stringify!($method), code = ?status.code(), "call failed");
                    crate::ClientError::from(status)
                })?;
                Ok(response.into_inner())
            }
        )*
    };
}

pub(crate) use {service_client, unary};

/// Every service wrapper over one connection.
#[derive(Clone)]
pub struct CdxClients {
    pub system: SystemClient,
    pub profiles: ProfileClient,
    pub providers: ProviderClient,
    pub allergies: AllergyClient,
    pub vitals: VitalsClient,
    pub doctor_notes: DoctorNotesClient,
    pub conditions: MedicalConditionClient,
    pub medical_histories: MedicalHistoryClient,
    pub medications: MedicationClient,
    pub administrations: MedicationAdministrationClient,
    pub vaccines: VaccineClient,
    pub connected_labs: ConnectedLabClient,
    pub analysis_engines: AnalysisEngineClient,
    pub medical_records: MedicalRecordClient,
    pub templates: TemplateClient,
    pub notification_events: NotificationEventClient,
    pub notifications: NotificationClient,
    pub cdc: CdcClient,
}

impl CdxClients {
    /// Connects to `endpoint` (for example `http://127.0.0.1:50051`).
    ///
    /// # Errors
    ///
    /// Returns an `Unavailable` [`ClientError`] if the endpoint is malformed or unreachable.
    pub async fn connect(
        endpoint: impl Into<String>,
        credentials: CallCredentials,
    ) -> ClientResult<Self> {
        let endpoint = endpoint.into();
        let channel = Endpoint::from_shared(endpoint.clone())?.connect().await?;
        tracing::debug!(%endpoint, "connected to CDX");
        Ok(Self::from_channel(channel, credentials))
    }

    pub fn from_channel(channel: Channel, credentials: CallCredentials) -> Self {
        let (ch, cr) = (&channel, &credentials);
        Self {
            system: SystemClient::new(ch.clone(), cr.clone()),
            profiles: ProfileClient::new(ch.clone(), cr.clone()),
            providers: ProviderClient::new(ch.clone(), cr.clone()),
            allergies: AllergyClient::new(ch.clone(), cr.clone()),
            vitals: VitalsClient::new(ch.clone(), cr.clone()),
            doctor_notes: DoctorNotesClient::new(ch.clone(), cr.clone()),
            conditions: MedicalConditionClient::new(ch.clone(), cr.clone()),
            medical_histories: MedicalHistoryClient::new(ch.clone(), cr.clone()),
            medications: MedicationClient::new(ch.clone(), cr.clone()),
            administrations: MedicationAdministrationClient::new(ch.clone(), cr.clone()),
            vaccines: VaccineClient::new(ch.clone(), cr.clone()),
            connected_labs: ConnectedLabClient::new(ch.clone(), cr.clone()),
            analysis_engines: AnalysisEngineClient::new(ch.clone(), cr.clone()),
            medical_records: MedicalRecordClient::new(ch.clone(), cr.clone()),
            templates: TemplateClient::new(ch.clone(), cr.clone()),
            notification_events: NotificationEventClient::new(ch.clone(), cr.clone()),
            notifications: NotificationClient::new(ch.clone(), cr.clone()),
            cdc: CdcClient::new(channel, credentials),
        }
    }
}
