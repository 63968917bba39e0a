//! Schema document model and per-request structural validation.
//!
//! The schema document is an externally maintained JSON artifact describing
//! every operation the API exposes: its method, path template, parameters,
//! and body fields. It is loaded exactly once at startup into a
//! [`SchemaRegistry`]; a missing or malformed document is a fatal
//! [`StartupError`], never a per-request condition.
//!
//! Per request, [`SchemaRegistry::validate`] matches the route and checks the
//! structural shape of body, query, and path parameters. It collects the full
//! set of [`Violation`]s rather than stopping at the first, so a client sees
//! everything wrong with a request in one response. Responses are never
//! validated.

use crate::error::{RequestFailure, StartupError, Violation};
use crate::request::{ApiRequest, Method};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Declared type of a body field or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    /// Wire name of this type, for violation messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Does a JSON value conform to this type?
    fn matches_value(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    /// Does a raw query/path string parse as this type?
    ///
    /// Parameters arrive as strings; structured types cannot be represented
    /// there, so they never match.
    fn matches_text(&self, raw: &str) -> bool {
        match self {
            Self::String => true,
            Self::Integer => raw.parse::<i64>().is_ok(),
            Self::Number => raw.parse::<f64>().is_ok(),
            Self::Boolean => matches!(raw, "true" | "false"),
            Self::Object | Self::Array => false,
        }
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
}

/// One declared path or query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

/// One declared body field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

/// Declared shape of a JSON request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodySpec {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl BodySpec {
    fn has_required_fields(&self) -> bool {
        self.fields.iter().any(|field| field.required)
    }
}

/// One operation the API exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Stable identifier the pipeline dispatches on, e.g. `createUser`.
    pub id: String,
    pub method: Method,
    /// Path template; `{name}` segments bind path parameters.
    pub path: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub body: Option<BodySpec>,
}

/// The whole schema document as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub title: Option<String>,
    pub operations: Vec<OperationSpec>,
}

/// A successfully matched route, with its bound path parameters.
#[derive(Debug)]
pub struct MatchedOperation<'a> {
    pub operation: &'a OperationSpec,
    pub path_params: HashMap<String, String>,
}

/// Loaded, sanity-checked schema document with validation services.
///
/// Construction is the one-time blocking step of startup; afterwards every
/// lookup is read-only.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    document: SchemaDocument,
}

impl SchemaRegistry {
    /// Load and sanity-check a schema document from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StartupError> {
        let display = path.as_ref().display().to_string();
        let content = fs::read_to_string(&path).map_err(|source| StartupError::SchemaRead {
            path: display.clone(),
            source,
        })?;
        let document: SchemaDocument =
            serde_json::from_str(&content).map_err(|source| StartupError::SchemaParse {
                path: display.clone(),
                source,
            })?;
        let registry = Self::from_document(document)?;
        info!(
            "loaded schema document '{}' ({} operations)",
            display,
            registry.document.operations.len()
        );
        Ok(registry)
    }

    /// Build a registry from an already-parsed document.
    pub fn from_document(document: SchemaDocument) -> Result<Self, StartupError> {
        if document.operations.is_empty() {
            return Err(StartupError::invalid("document declares no operations"));
        }

        let mut seen = HashSet::new();
        for operation in &document.operations {
            if operation.id.is_empty() {
                return Err(StartupError::invalid(format!(
                    "operation '{} {}' has an empty id",
                    operation.method, operation.path
                )));
            }
            if !seen.insert(operation.id.clone()) {
                return Err(StartupError::invalid(format!(
                    "duplicate operation id '{}'",
                    operation.id
                )));
            }
            for parameter in &operation.parameters {
                if parameter.location == ParameterLocation::Path
                    && !template_segments(&operation.path)
                        .any(|segment| segment == format!("{{{}}}", parameter.name))
                {
                    return Err(StartupError::invalid(format!(
                        "operation '{}' declares path parameter '{}' absent from its template",
                        operation.id, parameter.name
                    )));
                }
            }
        }

        Ok(Self { document })
    }

    /// Every operation the document declares.
    pub fn operations(&self) -> &[OperationSpec] {
        &self.document.operations
    }

    /// Validate a request against the document.
    ///
    /// Returns the matched operation (so the pipeline can dispatch on it) or
    /// a [`RequestFailure::Validation`] carrying every violation found.
    pub fn validate<'a>(&'a self, request: &ApiRequest) -> Result<MatchedOperation<'a>, RequestFailure> {
        let Some(matched) = self.match_route(request) else {
            return Err(RequestFailure::validation(
                "Request does not match any schema operation",
                vec![Violation::new(
                    request.path.clone(),
                    format!("no operation matches {} {}", request.method, request.path),
                )],
            ));
        };

        let mut violations = Vec::new();
        self.check_body(matched.operation, request.body.as_ref(), &mut violations);
        self.check_parameters(&matched, request, &mut violations);

        if violations.is_empty() {
            debug!("request passed validation for operation '{}'", matched.operation.id);
            Ok(matched)
        } else {
            Err(RequestFailure::validation(
                "Request validation failed",
                violations,
            ))
        }
    }

    fn match_route<'a>(&'a self, request: &ApiRequest) -> Option<MatchedOperation<'a>> {
        self.document
            .operations
            .iter()
            .filter(|operation| operation.method == request.method)
            .find_map(|operation| {
                bind_template(&operation.path, &request.path).map(|path_params| MatchedOperation {
                    operation,
                    path_params,
                })
            })
    }

    fn check_body(
        &self,
        operation: &OperationSpec,
        body: Option<&Value>,
        violations: &mut Vec<Violation>,
    ) {
        let Some(spec) = &operation.body else {
            // Operation declares no body; anything supplied is ignored.
            return;
        };

        let body = match body {
            Some(value) if !value.is_null() => value,
            _ => {
                if spec.has_required_fields() {
                    violations.push(Violation::new("/body", "request body is required"));
                }
                return;
            }
        };

        let Some(object) = body.as_object() else {
            violations.push(Violation::new("/body", "request body must be a JSON object"));
            return;
        };

        for field in &spec.fields {
            match object.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        violations.push(Violation::new(
                            format!("/body/{}", field.name),
                            "required field is missing",
                        ));
                    }
                }
                Some(value) => {
                    if !field.field_type.matches_value(value) {
                        violations.push(Violation::new(
                            format!("/body/{}", field.name),
                            format!(
                                "expected {}, got {}",
                                field.field_type.name(),
                                json_type_name(value)
                            ),
                        ));
                    }
                }
            }
        }
    }

    fn check_parameters(
        &self,
        matched: &MatchedOperation<'_>,
        request: &ApiRequest,
        violations: &mut Vec<Violation>,
    ) {
        let operation = matched.operation;

        for parameter in &operation.parameters {
            match parameter.location {
                ParameterLocation::Path => {
                    // Route matching binds every template segment, so a
                    // declared path parameter is always present here.
                    if let Some(raw) = matched.path_params.get(&parameter.name) {
                        if !parameter.field_type.matches_text(raw) {
                            violations.push(Violation::new(
                                format!("/params/{}", parameter.name),
                                format!("expected {}", parameter.field_type.name()),
                            ));
                        }
                    }
                }
                ParameterLocation::Query => match request.query.get(&parameter.name) {
                    None => {
                        if parameter.required {
                            violations.push(Violation::new(
                                format!("/query/{}", parameter.name),
                                "required query parameter is missing",
                            ));
                        }
                    }
                    Some(raw) => {
                        if !parameter.field_type.matches_text(raw) {
                            violations.push(Violation::new(
                                format!("/query/{}", parameter.name),
                                format!("expected {}", parameter.field_type.name()),
                            ));
                        }
                    }
                },
            }
        }

        // Strict on query parameters nobody declared.
        for name in request.query.keys() {
            let declared = operation.parameters.iter().any(|parameter| {
                parameter.location == ParameterLocation::Query && parameter.name == *name
            });
            if !declared {
                violations.push(Violation::new(
                    format!("/query/{name}"),
                    "unknown query parameter",
                ));
            }
        }
    }
}

/// Non-empty segments of a path or template.
fn template_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Match a concrete path against a template, binding `{name}` segments.
fn bind_template(template: &str, path: &str) -> Option<HashMap<String, String>> {
    let template: Vec<&str> = template_segments(template).collect();
    let concrete: Vec<&str> = template_segments(path).collect();
    if template.len() != concrete.len() {
        return None;
    }

    let mut bound = HashMap::new();
    for (pattern, segment) in template.iter().zip(&concrete) {
        if let Some(name) = pattern.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            bound.insert(name.to_string(), (*segment).to_string());
        } else if pattern != segment {
            return None;
        }
    }
    Some(bound)
}

/// Human-readable name of a JSON value's type, for violation messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
