//! Patient profiles and care providers.

use crate::{service_client, unary};
use api_shared::pb::{
    self, profile_service_client::ProfileServiceClient, provider_service_client::ProviderServiceClient,
};

service_client!(ProfileClient => ProfileServiceClient);
service_client!(ProviderClient => ProviderServiceClient);

impl ProfileClient {
    unary! {
        create_profile(pb::Profile) -> pb::Profile;
        get_profile(pb::IdReq) -> pb::Profile;
        /// Looks a profile up by national health id.
        get_profile_by_nhid(pb::NhidReq) -> pb::Profile;
        update_profile(pb::Profile) -> pb::Profile;
        delete_profile(pb::IdReq) -> pb::DeleteRes;
        list_profiles(pb::ListReq) -> pb::ProfileList;
    }
}

impl ProviderClient {
    unary! {
        create_provider(pb::Provider) -> pb::Provider;
        get_provider(pb::IdReq) -> pb::Provider;
        update_provider(pb::Provider) -> pb::Provider;
        delete_provider(pb::IdReq) -> pb::DeleteRes;
        list_providers(pb::ListReq) -> pb::ProviderList;
        /// Imports or refreshes a provider from the NPI registry.
        load_provider(pb::LoadProviderReq) -> pb::Provider;
    }
}
