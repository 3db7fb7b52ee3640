//! Service descriptions for integrations
//!
//! This crate loads the `services.yaml` documents integrations ship, and
//! provides the ServiceDescriptions store a host consults to render service
//! forms and to validate service-call data before dispatching it.

mod description;
mod error;

pub use description::{FieldDescription, ServiceDescription, TARGET_KEYS};
pub use error::{ServiceError, ServiceResult};

use dashmap::DashMap;
use indexmap::IndexMap;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Result of parsing a `services.yaml` document
#[derive(Debug, Default)]
pub struct ServicesDocument {
    /// Valid services in document order
    pub services: Vec<ServiceDescription>,
    /// One error per rejected service, or a single document-level error
    pub errors: Vec<ServiceError>,
}

/// Parse a loaded `services.yaml` document
///
/// An empty document describes no services. Every service is parsed even if
/// an earlier one is invalid.
pub fn parse_services(domain: &str, document: &Value) -> ServicesDocument {
    let mut parsed = ServicesDocument::default();

    let map = match document {
        Value::Null => return parsed,
        Value::Object(map) => map,
        other => {
            parsed.errors.push(ServiceError::InvalidDocument(format!(
                "expected a mapping of service names to descriptions, got {}",
                value_kind(other)
            )));
            return parsed;
        }
    };

    for (service, value) in map {
        match ServiceDescription::from_value(domain, service, value) {
            Ok(description) => parsed.services.push(description),
            Err(e) => parsed.errors.push(e),
        }
    }

    parsed
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Whether a value is a template that is only resolved at call time
fn is_template(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| s.contains("{{") || s.contains("{%"))
        .unwrap_or(false)
}

/// Accept any value for fields given as templates
///
/// The field still counts as present for the required check.
fn relax_templated_fields(schema: &mut Value, data: &Value) {
    let (Some(data), Some(properties)) = (
        data.as_object(),
        schema.get_mut("properties").and_then(Value::as_object_mut),
    ) else {
        return;
    };

    for (key, value) in data {
        if is_template(value) {
            if let Some(field_schema) = properties.get_mut(key) {
                *field_schema = Value::Object(serde_json::Map::new());
            }
        }
    }
}

/// The store of all known service descriptions
///
/// Descriptions are grouped per domain and keep the order they were declared
/// in, which is the order a frontend lists them.
pub struct ServiceDescriptions {
    /// Domain -> service name -> description
    domains: DashMap<String, IndexMap<String, ServiceDescription>>,
}

impl ServiceDescriptions {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            domains: DashMap::new(),
        }
    }

    /// Load a `services.yaml` document for a domain
    ///
    /// Valid services are stored; the errors for the rejected ones are
    /// returned.
    #[instrument(skip(self, document))]
    pub fn load_services_yaml(&self, domain: &str, document: &Value) -> Vec<ServiceError> {
        let parsed = parse_services(domain, document);

        debug!(
            domain = %domain,
            services = parsed.services.len(),
            errors = parsed.errors.len(),
            "Loaded service descriptions"
        );

        for description in parsed.services {
            self.insert(description);
        }

        parsed.errors
    }

    /// Store a description, replacing an existing one for the same service
    pub fn insert(&self, description: ServiceDescription) {
        debug!(
            domain = %description.domain,
            service = %description.service,
            "Registering service description"
        );

        self.domains
            .entry(description.domain.clone())
            .or_default()
            .insert(description.service.clone(), description);
    }

    /// Check if a service is described
    pub fn has_service(&self, domain: &str, service: &str) -> bool {
        self.domains
            .get(domain)
            .map(|services| services.contains_key(service))
            .unwrap_or(false)
    }

    /// Get a service description
    pub fn get_service(&self, domain: &str, service: &str) -> Option<ServiceDescription> {
        self.domains
            .get(domain)
            .and_then(|services| services.get(service).cloned())
    }

    /// Get all services of a domain in declaration order
    pub fn domain_services(&self, domain: &str) -> Vec<ServiceDescription> {
        self.domains
            .get(domain)
            .map(|services| services.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Get all domains that have described services, sorted
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self
            .domains
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        domains.sort();
        domains
    }

    /// Remove all descriptions of a domain, returning how many were removed
    #[instrument(skip(self))]
    pub fn remove_domain(&self, domain: &str) -> usize {
        let count = self
            .domains
            .remove(domain)
            .map(|(_, services)| services.len())
            .unwrap_or(0);

        debug!(domain = %domain, count = count, "Removed domain service descriptions");
        count
    }

    /// Get total number of described services
    pub fn service_count(&self) -> usize {
        self.domains.iter().map(|entry| entry.value().len()).sum()
    }

    /// Build the descriptions response for the frontend
    ///
    /// Format: `{domain: {service: {name, description, fields, target?}}}`
    pub fn as_json(&self) -> Value {
        let mut result = serde_json::Map::new();

        for domain in self.domains() {
            let Some(services) = self.domains.get(&domain) else {
                continue;
            };

            let mut domain_map = serde_json::Map::new();
            for (service, description) in services.iter() {
                match serde_json::to_value(description) {
                    Ok(value) => {
                        domain_map.insert(service.clone(), value);
                    }
                    Err(e) => {
                        warn!(
                            domain = %domain,
                            service = %service,
                            "Failed to serialize description: {}",
                            e
                        );
                    }
                }
            }
            result.insert(domain, Value::Object(domain_map));
        }

        Value::Object(result)
    }

    /// Validate service-call data against a service's field descriptions
    ///
    /// Templated values are skipped; they can only be checked once rendered.
    #[instrument(skip(self, data))]
    pub fn validate_service_data(
        &self,
        domain: &str,
        service: &str,
        data: &Value,
    ) -> ServiceResult<()> {
        let description = self
            .get_service(domain, service)
            .ok_or_else(|| ServiceError::NotFound {
                domain: domain.to_string(),
                service: service.to_string(),
            })?;

        let data = match data {
            Value::Null => Value::Object(serde_json::Map::new()),
            Value::Object(_) => data.clone(),
            other => {
                return Err(ServiceError::InvalidData(format!(
                    "expected a mapping, got {}",
                    value_kind(other)
                )))
            }
        };

        let mut schema = description.data_schema();
        relax_templated_fields(&mut schema, &data);

        let compiled = JSONSchema::compile(&schema).map_err(|e| ServiceError::InvalidDescriptor {
            domain: domain.to_string(),
            service: service.to_string(),
            reason: e.to_string(),
        })?;

        let result = compiled.validate(&data);
        if let Err(errors) = result {
            let reasons: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(ServiceError::InvalidData(reasons.join("; ")));
        }

        Ok(())
    }
}

impl Default for ServiceDescriptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper for ServiceDescriptions
pub type SharedServiceDescriptions = Arc<ServiceDescriptions>;
