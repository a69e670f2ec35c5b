//! Global fields configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fields attached to a root span that encloses every event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields {
    /// Service name
    pub service: Option<String>,
    /// Environment (dev/staging/prod)
    pub env: Option<String>,
    /// Version
    pub version: Option<String>,
    /// Custom fields
    #[serde(flatten)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl Fields {
    /// Reads `TESSERA_SERVICE`, `TESSERA_ENV` and `TESSERA_VERSION`
    /// through `lookup`. The version falls back to the crate version.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service: lookup("TESSERA_SERVICE"),
            env: lookup("TESSERA_ENV"),
            version: lookup("TESSERA_VERSION")
                .or_else(|| Some(env!("CARGO_PKG_VERSION").to_owned())),
            custom: BTreeMap::new(),
        }
    }

    /// Check if fields are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.env.is_none()
            && self.version.is_none()
            && self.custom.is_empty()
    }

    /// Custom fields rendered as one JSON object, if any.
    pub(crate) fn custom_json(&self) -> Option<String> {
        if self.custom.is_empty() {
            return None;
        }
        serde_json::to_string(&self.custom).ok()
    }
}
