use serde::{Deserialize, Serialize};

/// The parts of an integration's `manifest.json` the checks depend on
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub config_flow: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_defaults() {
        let json = r#"{"domain": "abode", "name": "Abode", "codeowners": ["@shred86"]}"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.domain, "abode");
        assert!(!manifest.config_flow);
    }
}
