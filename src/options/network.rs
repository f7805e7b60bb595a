use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Network", inline)]
#[serde(default)]
/// Location of the model generation service.
pub struct NetworkOptions {
    /// Service root, without a trailing slash.
    pub base_url: String,
    /// Path of the molecule generation endpoint.
    pub molecule_path: String,
    /// Query parameter carrying the formula.
    pub molecule_param: String,
    /// Path of the single-atom model endpoint.
    pub atom_path: String,
    /// Query parameter carrying the element symbol.
    pub atom_param: String,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            molecule_path: "/generate_chemistry_3d/".to_owned(),
            molecule_param: "chemistry_formule".to_owned(),
            atom_path: "/atom_model/".to_owned(),
            atom_param: "atom_name".to_owned(),
        }
    }
}

impl NetworkOptions {
    /// Full URL of the molecule endpoint (query not included).
    #[must_use]
    pub fn molecule_url(&self) -> String {
        join_url(&self.base_url, &self.molecule_path)
    }

    /// Full URL of the atom endpoint (query not included).
    #[must_use]
    pub fn atom_url(&self) -> String {
        join_url(&self.base_url, &self.atom_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slash() {
        let opts = NetworkOptions {
            base_url: "http://example.test/".to_owned(),
            ..NetworkOptions::default()
        };
        assert_eq!(
            opts.molecule_url(),
            "http://example.test/generate_chemistry_3d/"
        );
        assert_eq!(opts.atom_url(), "http://example.test/atom_model/");
    }
}
