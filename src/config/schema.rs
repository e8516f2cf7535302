//! Configuration schema types.
//!
//! This module defines all the types that represent a `cfgtool.yml`
//! configuration file. Tools and repositories keep the order they were
//! declared in, which is the tie-break order for installs.

use crate::links::LinkSpec;
use crate::repository::RepositorySpec;
use crate::requirements::{InstallRecipe, ProbeStrategy, ToolRequirement, Version};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CfgConfig {
    /// Directory that holds cloned repositories, relative to the working
    /// directory unless absolute.
    #[serde(default = "default_deps_root")]
    pub deps_root: PathBuf,

    /// Required tools, in declaration order.
    #[serde(default)]
    pub tools: OrderedMap<ToolConfig>,

    /// Repositories to bind or clone, in declaration order.
    #[serde(default)]
    pub repositories: OrderedMap<RepositoryConfig>,

    /// Symlinks to create after a successful run.
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

impl Default for CfgConfig {
    fn default() -> Self {
        Self {
            deps_root: default_deps_root(),
            tools: OrderedMap::default(),
            repositories: OrderedMap::default(),
            links: Vec::new(),
        }
    }
}

fn default_deps_root() -> PathBuf {
    PathBuf::from("deps")
}

impl CfgConfig {
    /// Tool requirements in declaration order.
    pub fn requirements(&self) -> Vec<ToolRequirement> {
        self.tools
            .iter()
            .map(|(name, tool)| tool.to_requirement(name))
            .collect()
    }

    /// Repository specs rooted at `deps_root`, resolved against `base`.
    pub fn repository_specs(&self, base: &Path) -> Vec<RepositorySpec> {
        let default_root = base.join(&self.deps_root);
        self.repositories
            .iter()
            .map(|(name, repo)| RepositorySpec {
                name: name.clone(),
                remote_url: repo.remote.clone(),
                branch: repo.branch.clone(),
                local_root: repo
                    .local_root
                    .as_ref()
                    .map(|r| base.join(r))
                    .unwrap_or_else(|| default_root.clone()),
            })
            .collect()
    }
}

/// A tool entry.
///
/// Accepts a bare version as shorthand for `{ minimum_version: ... }`, and
/// an empty entry for a tool with no constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Lowest acceptable version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_version: Option<Version>,

    /// Tools that must be usable before this one can be installed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// How to read the installed version.
    #[serde(default)]
    pub probe: ProbeStrategy,

    /// How to install the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<InstallRecipe>,

    /// Manual install command shown when the tool is not satisfied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ToolConfig {
    /// Build the requirement for the tool named `name`.
    pub fn to_requirement(&self, name: &str) -> ToolRequirement {
        ToolRequirement {
            identifier: name.to_string(),
            minimum_version: self.minimum_version,
            prerequisites: self.requires.clone(),
            probe: self.probe.clone(),
            install: self.install.clone(),
            manual_hint: self.hint.clone(),
        }
    }
}

/// Parse a tool entry from any of its accepted shapes.
pub fn deserialize_tool_entry<'de, D: Deserializer<'de>>(d: D) -> Result<ToolConfig, D::Error> {
    let value = serde_yaml::Value::deserialize(d)?;
    match value {
        serde_yaml::Value::Null => Ok(ToolConfig::default()),
        serde_yaml::Value::Mapping(_) => ToolConfig::deserialize(value).map_err(de::Error::custom),
        other => Version::deserialize(other)
            .map(|v| ToolConfig {
                minimum_version: Some(v),
                ..Default::default()
            })
            .map_err(de::Error::custom),
    }
}

/// A repository entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Remote URL.
    pub remote: String,

    /// Branch to clone.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Overrides `deps_root` for this repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_root: Option<PathBuf>,
}

fn default_branch() -> String {
    "master".to_string()
}

/// String-keyed map that keeps declaration order.
///
/// Read through `serde_yaml::Mapping`, which keeps document order;
/// `insert` replaces an existing key in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// How one map value is read from its YAML node.
pub trait MapEntry: Sized {
    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error>;
}

impl MapEntry for ToolConfig {
    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error> {
        deserialize_tool_entry(value)
    }
}

impl MapEntry for RepositoryConfig {
    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_value(value)
    }
}

impl<'de, V: MapEntry> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let mapping = Option::<serde_yaml::Mapping>::deserialize(d)?.unwrap_or_default();
        let mut out = OrderedMap::new();
        for (key, value) in mapping {
            let Some(name) = key.as_str() else {
                return Err(de::Error::custom(format!(
                    "entry names must be strings, found {:?}",
                    key
                )));
            };
            let entry = V::from_value(value)
                .map_err(|e| de::Error::custom(format!("'{}': {}", name, e)))?;
            out.insert(name, entry);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> CfgConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse("{}");
        assert_eq!(config.deps_root, PathBuf::from("deps"));
        assert!(config.tools.is_empty());
        assert!(config.links.is_empty());
    }

    #[test]
    fn tool_shorthand_sets_minimum() {
        let config = parse("tools:\n  vim: \"8.10\"\n");
        let vim = config.tools.get("vim").unwrap();
        assert_eq!(vim.minimum_version, Some(Version::new(8, 10)));
        assert_eq!(vim.probe, ProbeStrategy::default());
    }

    #[test]
    fn empty_tool_entry_has_no_constraints() {
        let config = parse("tools:\n  bear: {}\n  ccls:\n");
        assert_eq!(config.tools.get("bear"), Some(&ToolConfig::default()));
        assert_eq!(config.tools.get("ccls"), Some(&ToolConfig::default()));
    }

    #[test]
    fn float_version_is_rejected() {
        let err = serde_yaml::from_str::<CfgConfig>("tools:\n  vim: 8.10\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("vim"), "{msg}");
        assert!(msg.contains("quote"), "{msg}");
    }

    #[test]
    fn full_tool_entry() {
        let config = parse(
            r#"
tools:
  ccls:
    requires: [cmake]
    probe: { kind: presence }
    install:
      kind: source
      repository: ccls
      build: ["cmake -H. -BRelease"]
    hint: "sudo snap install ccls --classic"
"#,
        );
        let ccls = config.tools.get("ccls").unwrap();
        assert_eq!(ccls.requires, vec!["cmake"]);
        assert_eq!(ccls.probe, ProbeStrategy::Presence);
        assert!(matches!(ccls.install, Some(InstallRecipe::Source { .. })));

        let req = ccls.to_requirement("ccls");
        assert_eq!(req.prerequisites, vec!["cmake"]);
        assert_eq!(req.manual_hint.as_deref(), Some("sudo snap install ccls --classic"));
    }

    #[test]
    fn unknown_tool_field_is_rejected() {
        assert!(serde_yaml::from_str::<CfgConfig>("tools:\n  vim:\n    minimum: \"8.1\"\n").is_err());
    }

    #[test]
    fn tools_keep_declaration_order() {
        let config = parse("tools:\n  node: \"10.12\"\n  vim: \"8.1\"\n  bear: {}\n");
        let names: Vec<&String> = config.tools.keys().collect();
        assert_eq!(names, vec!["node", "vim", "bear"]);
    }

    #[test]
    fn repository_branch_defaults_to_master() {
        let config = parse("repositories:\n  bear:\n    remote: https://github.com/rizsotto/Bear.git\n");
        assert_eq!(config.repositories.get("bear").unwrap().branch, "master");
    }

    #[test]
    fn repository_specs_resolve_roots() {
        let config = parse(
            r#"
deps_root: third_party
repositories:
  ccls: { remote: "https://github.com/MaskRay/ccls" }
  bear: { remote: "https://github.com/rizsotto/Bear.git", local_root: /opt/src }
"#,
        );
        let specs = config.repository_specs(Path::new("/work"));
        assert_eq!(specs[0].local_path(), PathBuf::from("/work/third_party/ccls"));
        assert_eq!(specs[1].local_path(), PathBuf::from("/opt/src/bear"));
    }

    #[test]
    fn null_section_is_empty() {
        let config = parse("tools:\nrepositories: ~\n");
        assert!(config.tools.is_empty());
        assert!(config.repositories.is_empty());
    }

    #[test]
    fn non_string_tool_name_is_rejected() {
        let err = serde_yaml::from_str::<CfgConfig>("tools:\n  8: \"8.1\"\n").unwrap_err();
        assert!(err.to_string().contains("must be strings"), "{err}");
    }

    #[test]
    fn repository_error_names_the_entry() {
        let err = serde_yaml::from_str::<CfgConfig>("repositories:\n  ccls: { branch: main }\n")
            .unwrap_err();
        assert!(err.to_string().contains("'ccls'"), "{err}");
    }

    #[test]
    fn ordered_map_insert_replaces_in_place() {
        let mut map = OrderedMap::new();
        map.insert("vim", 1);
        map.insert("node", 2);
        map.insert("vim", 3);
        let items: Vec<(&String, &i32)> = map.iter().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], (&"vim".to_string(), &3));
    }

    #[test]
    fn serializes_back_in_order() {
        let config = parse("tools:\n  node: \"10.12\"\n  cmake: \"3.8\"\n");
        let yaml = serde_yaml::to_string(&config).unwrap();
        let node = yaml.find("node").unwrap();
        let cmake = yaml.find("cmake").unwrap();
        assert!(node < cmake);
    }
}
