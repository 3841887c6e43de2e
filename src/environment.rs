use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Result, TemplateError};

/// Host configuration: product name plus the shared `AppData` and `Bundle`
/// objects every provider can address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PictSettings {
    pub product: String,
    pub app_data: Value,
    pub bundle: Value,
}

impl Default for PictSettings {
    fn default() -> Self {
        Self {
            product: "Pict".to_string(),
            app_data: json!({}),
            bundle: json!({}),
        }
    }
}

impl PictSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: PictSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<()> {
        if !self.app_data.is_object() {
            return Err(TemplateError::Settings("AppData must be an object".into()));
        }
        if !self.bundle.is_object() {
            return Err(TemplateError::Settings("Bundle must be an object".into()));
        }
        Ok(())
    }
}

/// The read-only host handle given to every provider.
///
/// Its JSON projection is what `Pict` (and `Fable`) resolve to in addresses,
/// and what the context sequence defaults to when none is supplied.
#[derive(Debug, Clone)]
pub struct Environment {
    root: Value,
}

impl Environment {
    pub fn new(settings: PictSettings) -> Self {
        let root = json!({
            "Product": settings.product,
            "Settings": { "Product": settings.product },
            "AppData": settings.app_data,
            "Bundle": settings.bundle,
        });
        Self { root }
    }

    pub fn product(&self) -> &str {
        self.root["Product"].as_str().unwrap_or_default()
    }

    pub fn app_data(&self) -> &Value {
        &self.root["AppData"]
    }

    pub fn bundle(&self) -> &Value {
        &self.root["Bundle"]
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(PictSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn settings_fill_missing_fields() {
        let settings = PictSettings::from_json(r#"{"Product":"Tp"}"#).unwrap();
        assert_eq!(settings.product, "Tp");
        assert_eq!(settings.app_data, json!({}));
    }

    #[test]
    fn settings_reject_non_object_app_data() {
        let err = PictSettings::from_json(r#"{"AppData":[1,2]}"#).unwrap_err();
        assert!(matches!(err, TemplateError::Settings(_)));
    }

    #[test]
    fn environment_exposes_shared_data() {
        let env = Environment::new(PictSettings {
            app_data: json!({"Title": "Home"}),
            ..PictSettings::default()
        });
        assert_eq!(env.product(), "Pict");
        assert_eq!(env.app_data(), &json!({"Title": "Home"}));
        assert_eq!(env.bundle(), &json!({}));
        assert_eq!(env.as_value()["Settings"]["Product"], json!("Pict"));
    }
}
