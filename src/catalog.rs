//! Embedded metadata catalog
//!
//! The tab list and per-module field schemas ship inside the binary and are
//! parsed once at startup into an immutable [`Catalog`]. Request handling only
//! ever borrows it; anything that needs to modify field values works on a copy.

use indexmap::IndexMap;
use rust_embed::Embed;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{PreviewError, Result};

/// Catalog files baked in at build time.
#[derive(Embed)]
#[folder = "catalog/"]
struct CatalogFiles;

const TABS_FILE: &str = "tabs.json";
const MODULES_FILE: &str = "modules.json";

/// One tab of the settings UI.
///
/// Wire names follow the keys the bundled UI reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    #[serde(rename = "groupCode")]
    pub group_code: String,
    /// Join key into [`ModuleMetadata`]
    #[serde(rename = "modelCode")]
    pub module_code: String,
    #[serde(rename = "modelIcon")]
    pub module_icon: String,
    #[serde(rename = "modelName")]
    pub module_name: String,
}

/// UI control type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Boolean,
    Integer,
    MultiplyInteger,
    String,
    List,
    Choice,
    Select,
    SelectAndCount,
    UrlText,
    ReadText,
}

/// A single configurable setting within a module.
///
/// `config_value` is always a string whatever the field type; see
/// [`crate::merge`] for how override values are coerced into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub code: String,
    #[serde(rename = "configValue")]
    pub config_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Choice labels, indexed by the numeric `configValue` of `CHOICE` fields
    #[serde(
        rename = "expandKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expand_key: Option<Vec<String>>,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Field schemas keyed by module code, in UI order.
pub type ModuleMetadata = IndexMap<String, Vec<FieldDefinition>>;

/// Immutable tab and module metadata shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tabs: Vec<TabDescriptor>,
    modules: ModuleMetadata,
}

impl Catalog {
    /// Build a catalog from explicit parts.
    pub fn new(tabs: Vec<TabDescriptor>, modules: ModuleMetadata) -> Self {
        Self { tabs, modules }
    }

    /// Parse the catalog embedded in the binary.
    pub fn embedded() -> Result<Self> {
        let tabs: Vec<TabDescriptor> = read_embedded(TABS_FILE)?;
        let modules: ModuleMetadata = read_embedded(MODULES_FILE)?;
        let catalog = Self::new(tabs, modules);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn tabs(&self) -> &[TabDescriptor] {
        &self.tabs
    }

    pub fn modules(&self) -> &ModuleMetadata {
        &self.modules
    }

    /// Field list of one module, if it is known.
    pub fn module(&self, module_code: &str) -> Option<&[FieldDefinition]> {
        self.modules.get(module_code).map(Vec::as_slice)
    }

    /// Check that field codes are unique per module and every tab resolves.
    pub fn validate(&self) -> Result<()> {
        for (module_code, fields) in &self.modules {
            let mut seen = HashSet::new();
            for field in fields {
                if !seen.insert(field.code.as_str()) {
                    return Err(PreviewError::Catalog(format!(
                        "duplicate field '{}' in module '{}'",
                        field.code, module_code
                    )));
                }
            }
        }

        if let Some(tab) = self
            .tabs
            .iter()
            .find(|tab| !self.modules.contains_key(&tab.module_code))
        {
            return Err(PreviewError::Catalog(format!(
                "tab '{}' has no module metadata",
                tab.module_code
            )));
        }

        Ok(())
    }
}

fn read_embedded<T: DeserializeOwned>(name: &str) -> Result<T> {
    let file = CatalogFiles::get(name)
        .ok_or_else(|| PreviewError::Catalog(format!("missing embedded file '{name}'")))?;
    serde_json::from_slice(&file.data)
        .map_err(|e| PreviewError::Catalog(format!("malformed embedded file '{name}': {e}")))
}
