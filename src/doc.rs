use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One security requirement: every named scheme must be satisfied.
/// Requirements in a list are alternatives, any one of them suffices.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// An OpenAPI document as assembled for the JSON endpoint.
///
/// Only the four overlay fields (`servers`, `info`, `components`, `security`)
/// are inspected here; everything the scanner produced (`paths`, `tags`,
/// `definitions`, ...) passes through untouched in `rest`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OpenApiDocument {
    #[serde(default = "default_openapi_version")]
    pub openapi: String,
    #[serde(default)]
    pub info: ApiInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ApiServer>,
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

fn default_openapi_version() -> String {
    "3.0.0".to_string()
}

impl Default for OpenApiDocument {
    fn default() -> Self {
        Self {
            openapi: default_openapi_version(),
            info: Default::default(),
            servers: Default::default(),
            components: Default::default(),
            security: Default::default(),
            rest: Default::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ApiInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ApiServer {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Components {
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.security_schemes.is_empty() && self.rest.is_empty()
    }
}

/// A named authentication mechanism referenced by security requirements.
/// `kind` is one of `apiKey`, `http`, `oauth2`, `openIdConnect`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    /// where an apiKey travels: `query`, `header` or `cookie`
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(
        rename = "bearerFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bearer_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
