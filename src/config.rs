//! Configuration loaded from `smelter.toml`
//!
//! Severity overrides map rule ids or categories to a severity; the rest are
//! knobs consumed by individual rules and transformers. Every field has a
//! default so an absent or partial file behaves sensibly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::{Result, RuleMeta, Severity, SmelterError};

pub const CONFIG_FILE: &str = "smelter.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmelterConfig {
    #[serde(default)]
    pub severities: SeverityOverrides,
    #[serde(default)]
    pub hot_path: HotPathConfig,
    #[serde(default)]
    pub injection: InjectionConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub states: StatesConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

/// Per-rule and per-category severity overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityOverrides {
    #[serde(default)]
    pub rules: HashMap<String, Severity>,
    #[serde(default)]
    pub categories: HashMap<String, Severity>,
}

/// Knobs for the hot-path lookup rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotPathConfig {
    /// Methods treated as per-tick hot paths
    #[serde(default = "default_hot_path_methods")]
    pub methods: Vec<String>,
    /// Static receivers flagged inside hot paths
    #[serde(default = "default_hot_path_receivers")]
    pub receivers: Vec<String>,
    /// Callee prefix flagged inside hot paths
    #[serde(default = "default_finder_prefix")]
    pub finder_prefix: String,
}

fn default_hot_path_methods() -> Vec<String> {
    vec!["Simulate".to_string()]
}

fn default_hot_path_receivers() -> Vec<String> {
    vec!["Time".to_string(), "Random".to_string()]
}

fn default_finder_prefix() -> String {
    "Find".to_string()
}

impl Default for HotPathConfig {
    fn default() -> Self {
        Self {
            methods: default_hot_path_methods(),
            receivers: default_hot_path_receivers(),
            finder_prefix: default_finder_prefix(),
        }
    }
}

/// Knobs for direct-instantiation detection and the injection transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Type name suffixes that mark a class as a resolvable service
    #[serde(default = "default_service_suffixes")]
    pub service_suffixes: Vec<String>,
    /// Field/property types that can resolve services
    #[serde(default = "default_resolver_types")]
    pub resolver_types: Vec<String>,
    /// Namespace imported when a resolver field is synthesized
    #[serde(default = "default_resolver_namespace")]
    pub resolver_namespace: String,
    /// Base type whose descendants receive lifecycle injection
    #[serde(default = "default_component_base")]
    pub component_base: String,
    /// Lifecycle method used as the injection point for components
    #[serde(default = "default_lifecycle_method")]
    pub lifecycle_method: String,
    /// Name of the synthesized resolver field
    #[serde(default = "default_resolver_field")]
    pub resolver_field: String,
}

fn default_service_suffixes() -> Vec<String> {
    ["Service", "Provider", "Repository", "Cache", "Client"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_resolver_types() -> Vec<String> {
    vec!["ServiceResolver".to_string(), "IServiceResolver".to_string()]
}

fn default_resolver_namespace() -> String {
    "Core.Services".to_string()
}

fn default_component_base() -> String {
    "Component".to_string()
}

fn default_lifecycle_method() -> String {
    "OnInit".to_string()
}

fn default_resolver_field() -> String {
    "_resolver".to_string()
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            service_suffixes: default_service_suffixes(),
            resolver_types: default_resolver_types(),
            resolver_namespace: default_resolver_namespace(),
            component_base: default_component_base(),
            lifecycle_method: default_lifecycle_method(),
            resolver_field: default_resolver_field(),
        }
    }
}

/// Abbreviation dictionary for the terse-identifier rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_abbreviations")]
    pub abbreviations: HashMap<String, String>,
}

fn default_abbreviations() -> HashMap<String, String> {
    [
        ("rng", "randomGenerator"),
        ("idx", "index"),
        ("cnt", "count"),
        ("tmp", "temporary"),
        ("mgr", "manager"),
        ("cfg", "config"),
        ("msg", "message"),
        ("buf", "buffer"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            abbreviations: default_abbreviations(),
        }
    }
}

/// Companion-enum file layout convention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatesConfig {
    #[serde(default = "default_states_folder")]
    pub folder: String,
}

fn default_states_folder() -> String {
    "States".to_string()
}

impl Default for StatesConfig {
    fn default() -> Self {
        Self {
            folder: default_states_folder(),
        }
    }
}

/// Quality-gate threshold for the analyze exit code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
}

fn default_fail_on() -> Severity {
    Severity::Major
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
        }
    }
}

impl SmelterConfig {
    /// Effective severity for a rule: rule override, then category override,
    /// then the rule's declared default
    pub fn severity_for(&self, meta: &RuleMeta) -> Severity {
        self.severities
            .rules
            .get(meta.id)
            .or_else(|| self.severities.categories.get(meta.category))
            .copied()
            .unwrap_or(meta.severity)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SmelterError::Config(format!("{}: {e}", path.display())))
    }

    /// Load `smelter.toml` from the project root, or fall back to defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Template written by `smelter init`
pub fn default_config_toml() -> &'static str {
    r#"# smelter configuration

[severities.rules]
# "comment-only-method" = "major"

[severities.categories]
# "naming" = "info"

[hot_path]
methods = ["Simulate"]
receivers = ["Time", "Random"]
finder_prefix = "Find"

[injection]
service_suffixes = ["Service", "Provider", "Repository", "Cache", "Client"]
resolver_types = ["ServiceResolver", "IServiceResolver"]
resolver_namespace = "Core.Services"
component_base = "Component"
lifecycle_method = "OnInit"
resolver_field = "_resolver"

[naming.abbreviations]
rng = "randomGenerator"
idx = "index"
cnt = "count"
tmp = "temporary"
mgr = "manager"
cfg = "config"
msg = "message"
buf = "buffer"

[states]
folder = "States"

[gate]
fail_on = "major"
"#
}
