use crate::error::LoadError;
#[cfg(feature = "http")]
use crate::options::NetworkOptions;

/// Producer of model bundle bytes.
///
/// Implementations return the raw payload; classification into archive or
/// error happens in the load pipeline. Called on the load thread.
pub trait ModelSource: Send {
    /// Bundle for the whole molecule described by `formula`.
    fn fetch_molecule(&self, formula: &str) -> Result<Vec<u8>, LoadError>;

    /// Bundle for a single pre-built atom of `element`.
    fn fetch_atom_model(&self, element: &str) -> Result<Vec<u8>, LoadError>;
}

/// Model source backed by the generation service over HTTP.
#[cfg(feature = "http")]
pub struct HttpModelSource {
    agent: ureq::Agent,
    network: NetworkOptions,
}

/// Upper bound on a downloaded bundle.
#[cfg(feature = "http")]
const MAX_BUNDLE_BYTES: u64 = 64 * 1024 * 1024;

#[cfg(feature = "http")]
impl HttpModelSource {
    /// Client for the endpoints in `network`.
    #[must_use]
    pub fn new(network: NetworkOptions) -> Self {
        // non-2xx answers carry JSON error bodies we want to read
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, network }
    }

    fn get(&self, url: &str, param: &str, value: &str) -> Result<Vec<u8>, LoadError> {
        log::debug!("GET {url}?{param}={value}");
        let mut response = self
            .agent
            .get(url)
            .query(param, value)
            .call()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BUNDLE_BYTES)
            .read_to_vec()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        log::debug!("HTTP {status}, {} bytes", body.len());

        super::remote::classify_response(status, content_type.as_deref(), body)
    }
}

#[cfg(feature = "http")]
impl ModelSource for HttpModelSource {
    fn fetch_molecule(&self, formula: &str) -> Result<Vec<u8>, LoadError> {
        self.get(
            &self.network.molecule_url(),
            &self.network.molecule_param,
            formula,
        )
    }

    fn fetch_atom_model(&self, element: &str) -> Result<Vec<u8>, LoadError> {
        self.get(&self.network.atom_url(), &self.network.atom_param, element)
    }
}
