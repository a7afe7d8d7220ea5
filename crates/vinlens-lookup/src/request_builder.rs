use crate::error::FetchError;
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;
use vinlens_core::Vin;
use vinlens_provider::{HttpMethod, ProviderSpec, VIN_PLACEHOLDER};

/// A provider request with the VIN substituted and a user agent chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Query parameters for GET, form fields for POST.
    pub params: IndexMap<String, String>,
    pub user_agent: String,
}

/// Fill a provider's request template for `vin`.
///
/// The VIN is percent-encoded into the endpoint. Parameter values get the raw
/// VIN; the HTTP client encodes them when it serializes the query or form.
pub fn build_request(
    spec: &ProviderSpec,
    vin: &Vin,
    user_agent: &str,
) -> Result<ProviderRequest, FetchError> {
    let encoded = utf8_percent_encode(vin.as_str(), NON_ALPHANUMERIC).to_string();
    let raw_url = spec.endpoint().replace(VIN_PLACEHOLDER, &encoded);

    let url = Url::parse(&raw_url).map_err(|e| FetchError::InvalidUrl {
        url: raw_url.clone(),
        reason: e.to_string(),
    })?;

    let params = spec
        .request_params()
        .iter()
        .map(|(key, value)| (key.clone(), value.replace(VIN_PLACEHOLDER, vin.as_str())))
        .collect();

    Ok(ProviderRequest {
        method: spec.method(),
        url,
        params,
        user_agent: user_agent.to_string(),
    })
}
