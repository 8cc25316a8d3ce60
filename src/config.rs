use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::filter::FilterField;
use crate::join::JoinConfig;
use crate::normalize::FieldAlias;
use crate::render::{ColumnSpec, RenderSpec, ViewMode};

const BUILTIN_CONFIG: &str = include_str!("../config/console.yaml");

fn default_identity_field() -> String {
    "id".to_string()
}

fn default_tenant_field() -> String {
    "dealershipId".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub uri: String,
}

/// Static description of one resource screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub collection: String,
    #[serde(default = "default_identity_field")]
    pub identity_field: String,
    #[serde(default = "default_tenant_field")]
    pub tenant_field: String,
    #[serde(default)]
    pub tenant_scoped: bool,
    /// Name field whose trailing number orders the snapshot.
    #[serde(default)]
    pub order_field: Option<String>,
    #[serde(default)]
    pub title_field: Option<String>,
    #[serde(default)]
    pub image_field: Option<String>,
    #[serde(default)]
    pub aliases: Vec<FieldAlias>,
    #[serde(default)]
    pub filters: Vec<FilterField>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub view: ViewMode,
}

impl ScreenConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            identity_field: default_identity_field(),
            tenant_field: default_tenant_field(),
            tenant_scoped: false,
            order_field: None,
            title_field: None,
            image_field: None,
            aliases: Vec::new(),
            filters: Vec::new(),
            columns: Vec::new(),
            required_fields: Vec::new(),
            view: ViewMode::default(),
        }
    }

    pub fn render_spec(&self) -> RenderSpec<'_> {
        RenderSpec {
            columns: &self.columns,
            identity_field: &self.identity_field,
            title_field: self.title_field.as_deref(),
            image_field: self.image_field.as_deref(),
        }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(anyhow!("screen {name}: collection must not be empty"));
        }
        if self.identity_field.is_empty() || self.tenant_field.is_empty() {
            return Err(anyhow!(
                "screen {name}: identity_field and tenant_field must not be empty"
            ));
        }

        let mut seen = HashSet::new();
        for filter in &self.filters {
            if filter.field.is_empty() {
                return Err(anyhow!("screen {name}: filter field must not be empty"));
            }
            if !seen.insert(filter.field.as_str()) {
                return Err(anyhow!(
                    "screen {name}: duplicate filter field {}",
                    filter.field
                ));
            }
        }
        if self.columns.iter().any(|c| c.field.is_empty()) {
            return Err(anyhow!("screen {name}: column field must not be empty"));
        }
        for alias in &self.aliases {
            if alias.canonical.is_empty() || alias.primary.is_empty() || alias.fallback.is_empty()
            {
                return Err(anyhow!("screen {name}: alias fields must not be empty"));
            }
        }
        Ok(())
    }
}

/// Which screens make up the feedback join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub feedback: String,
    pub customers: String,
    pub orders: String,
    #[serde(default)]
    pub join: JoinConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub screens: BTreeMap<String, ScreenConfig>,
    #[serde(default)]
    pub feedback: Option<FeedbackConfig>,
}

impl ConsoleConfig {
    /// The configuration shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CONFIG)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ConsoleConfig =
            serde_yaml::from_str(yaml).context("Failed to parse console configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn screen(&self, name: &str) -> Result<&ScreenConfig> {
        self.screens
            .get(name)
            .ok_or_else(|| anyhow!("Unknown screen: {}", name))
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.uri.trim().is_empty() {
            return Err(anyhow!("storage.uri must not be empty"));
        }
        for (name, screen) in &self.screens {
            screen.validate(name)?;
        }
        if let Some(feedback) = &self.feedback {
            for name in [&feedback.feedback, &feedback.customers, &feedback.orders] {
                if !self.screens.contains_key(name) {
                    return Err(anyhow!("feedback references unknown screen: {}", name));
                }
            }
        }
        Ok(())
    }
}
