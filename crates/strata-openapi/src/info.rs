//! The `info` block and the metadata document handed to a web framework.

use serde::Serialize;
use strata_core::ResolvedSettings;
use tracing::debug;

use crate::error::OpenApiResult;
use crate::tag::TagList;

/// OpenAPI specification version the document declares.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Version reported when the settings carry none.
pub const FALLBACK_VERSION: &str = "0.1.0";

/// API title, version and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiInfo {
    /// Creates an info block.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Creates an info block whose version is the resolved `version` setting.
    pub fn from_settings(title: impl Into<String>, settings: &ResolvedSettings) -> Self {
        let version = settings.get_str("version").unwrap_or(FALLBACK_VERSION);
        debug!(version, origin = ?settings.origin("version"), "API version");
        Self::new(title, version)
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Documentation metadata: `openapi`, `info` and `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiMetadata {
    pub openapi: String,
    pub info: ApiInfo,
    #[serde(skip_serializing_if = "TagList::is_empty")]
    pub tags: TagList,
}

impl ApiMetadata {
    /// Combines an info block with a tag list.
    pub fn new(info: ApiInfo, tags: TagList) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            tags,
        }
    }

    /// Renders the metadata as JSON.
    pub fn to_json(&self) -> OpenApiResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Renders the metadata as indented JSON text.
    pub fn to_json_pretty(&self) -> OpenApiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;
    use serde_json::json;
    use strata_core::{ConfigKey, ConfigSource, Schema, SourceChain, SourceResult, Value, resolve};

    struct Fixed(Option<&'static str>);

    impl ConfigSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
            Ok(match (key, self.0) {
                ("version", Some(v)) => Some(Value::from(v)),
                _ => None,
            })
        }
    }

    fn settings(version: Option<&'static str>) -> ResolvedSettings {
        let schema = Schema::builder()
            .key(ConfigKey::string("version", "0.1.0"))
            .build()
            .unwrap();
        resolve(&schema, &SourceChain::new().then(Fixed(version))).unwrap()
    }

    #[test]
    fn test_version_from_settings() {
        let info = ApiInfo::from_settings("Example Backend", &settings(Some("0.1.2")));
        assert_eq!(info.version, "0.1.2");

        let info = ApiInfo::from_settings("Example Backend", &settings(None));
        assert_eq!(info.version, "0.1.0");
    }

    #[test]
    fn test_version_missing_from_schema_falls_back() {
        let info = ApiInfo::from_settings("Example Backend", &ResolvedSettings::default());
        assert_eq!(info.version, FALLBACK_VERSION);
    }

    #[test]
    fn test_metadata_document() {
        let metadata = ApiMetadata::new(
            ApiInfo::new("Example Backend", "0.1.2"),
            TagList::from_tags([Tag::new("Orders"), Tag::new("Products")]).unwrap(),
        );

        assert_eq!(
            metadata.to_json().unwrap(),
            json!({
                "openapi": "3.1.0",
                "info": { "title": "Example Backend", "version": "0.1.2" },
                "tags": [{ "name": "Orders" }, { "name": "Products" }]
            })
        );
    }

    #[test]
    fn test_empty_tags_omitted() {
        let metadata = ApiMetadata::new(
            ApiInfo::new("Example Backend", "1.0.0").description("Backend API"),
            TagList::new(),
        );

        let json = metadata.to_json().unwrap();
        assert!(json.get("tags").is_none());
        assert_eq!(json["info"]["description"], "Backend API");
    }
}
