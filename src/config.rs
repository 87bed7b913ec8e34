use std::collections::{BTreeMap, HashMap};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::doc::{ApiInfo, ApiServer, Components, OpenApiDocument, SecurityRequirement, SecurityScheme};

/// configuration struct.
/// Loaded once at startup and handed to the components that need it;
/// nothing reads configuration ambiently afterwards.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// address and port to which Calliope will listen for incoming requests.
    pub listen_address: SocketAddr,
    /// where and how the annotation scanner looks for document fragments
    pub scan: ScanConfig,
    /// document cache configuration
    pub cache: CacheConfig,
    /// static metadata overlaid on every served document
    pub api: ApiMetadata,
    /// UI page configuration
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 9840)),
            scan: Default::default(),
            cache: Default::default(),
            api: ApiMetadata::default().with_bearer_auth(),
            ui: Default::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ScanConfig {
    /// directories or files handed to the scanner
    pub paths: Vec<PathBuf>,
    /// short name -> expansion, applied to `$ref` values by the scanner
    pub aliases: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CacheConfig {
    /// when disabled, every request triggers a fresh scan
    pub enable: bool,
    /// the key under which the generated document is stored
    pub key: String,
    /// how long a generated document stays valid
    pub expiration: Duration,
    /// in megabytes, the maximum size of memory the cache can take.
    pub size_limit: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: false,
            key: "api-swagger-cache".to_string(),
            expiration: Duration::from_secs(360),
            size_limit: 32,
        }
    }
}

/// Static document metadata, applied as a post-cache overlay so responses
/// always carry the configuration current at response time.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ApiMetadata {
    pub servers: Vec<ApiServer>,
    pub info: ApiInfo,
    pub components: Components,
    pub security: Vec<SecurityRequirement>,
}

impl ApiMetadata {
    /// Replace the four metadata fields of a document, cache hit or not.
    pub fn overlay(&self, doc: &mut OpenApiDocument) {
        doc.servers = self.servers.clone();
        doc.info = self.info.clone();
        doc.components = self.components.clone();
        doc.security = self.security.clone();
    }

    /// A bearer-token scheme plus requirement, the usual starting point.
    pub fn with_bearer_auth(mut self) -> Self {
        self.components.security_schemes.insert(
            "bearerAuth".to_string(),
            SecurityScheme {
                kind: "http".to_string(),
                scheme: Some("Bearer".to_string()),
                bearer_format: Some("JWT".to_string()),
                ..Default::default()
            },
        );
        self.security
            .push(BTreeMap::from([("bearerAuth".to_string(), Vec::new())]));
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UiConfig {
    /// the url the embedded viewer fetches the document from
    pub rest_url: String,
    /// extra templates loaded from disk, recursively, by relative name
    pub template_dir: Option<PathBuf>,
    /// selects template `themes/<theme>/index` instead of the built-in page
    pub theme: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            rest_url: "/openapi.json".to_string(),
            template_dir: None,
            theme: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_replaces_all_four_fields() {
        let meta = ApiMetadata {
            servers: vec![ApiServer {
                url: "https://api.example.com".into(),
                description: None,
            }],
            info: ApiInfo {
                title: "Example".into(),
                version: "2.0".into(),
                ..Default::default()
            },
            ..Default::default()
        }
        .with_bearer_auth();

        let mut doc = OpenApiDocument::default();
        doc.info.title = "stale title".into();
        doc.servers.push(ApiServer {
            url: "http://stale".into(),
            description: None,
        });
        doc.rest
            .insert("paths".into(), json!({"/ping": {"get": {}}}));

        meta.overlay(&mut doc);
        assert_eq!(doc.servers, meta.servers);
        assert_eq!(doc.info, meta.info);
        assert_eq!(doc.components, meta.components);
        assert_eq!(doc.security, meta.security);
        // scanner output is untouched
        assert!(doc.rest.contains_key("paths"));
    }
}
