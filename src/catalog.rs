use crate::domain::models::{GroupSpec, VariantInfo};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Immutable descriptor of one contract variant. Pure data: adding a
/// variant means adding a TOML file and one `EMBEDDED` line.
#[derive(Debug, Deserialize)]
pub struct Variant {
    pub key: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub parties: Vec<String>,
    pub articles: u32,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub groups: BTreeMap<String, GroupSpec>,
    /// Filled source field → dependent fields that inherit its value.
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Uppercase-amount field → numeric source field it is derived from.
    #[serde(default)]
    pub amount_words: BTreeMap<String, String>,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("unknown contract type: {0}")]
    UnknownVariant(String),
    #[error("duplicate contract type key: {0}")]
    DuplicateVariant(String),
    #[error("embedded config {0} declares key {1}")]
    KeyMismatch(String, String),
}

const EMBEDDED_CONFIGS: &[(&str, &str)] = &[
    ("tigong", include_str!("../config/tigong.toml")),
    ("weituo", include_str!("../config/weituo.toml")),
    ("ronghe", include_str!("../config/ronghe.toml")),
    ("zhongjie", include_str!("../config/zhongjie.toml")),
];

pub struct Catalog {
    variants: Vec<Variant>,
}

impl Catalog {
    /// Parse and validate the embedded variant configs. Any config error
    /// here is a build defect, but it still surfaces as a normal error
    /// instead of a panic.
    pub fn load() -> anyhow::Result<Catalog> {
        let mut variants = Vec::new();
        let mut seen = HashSet::new();
        for (key, raw) in EMBEDDED_CONFIGS {
            let v: Variant = toml::from_str(raw)
                .map_err(|e| anyhow::anyhow!("invalid embedded config {}: {}", key, e))?;
            if v.key != *key {
                return Err(CatalogError::KeyMismatch(key.to_string(), v.key).into());
            }
            if !seen.insert(v.key.clone()) {
                return Err(CatalogError::DuplicateVariant(v.key).into());
            }
            variants.push(v);
        }
        Ok(Catalog { variants })
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, key: &str) -> anyhow::Result<&Variant> {
        self.variants
            .iter()
            .find(|v| v.key == key)
            .ok_or_else(|| CatalogError::UnknownVariant(key.to_string()).into())
    }

    pub fn infos(&self) -> Vec<VariantInfo> {
        self.variants
            .iter()
            .map(|v| VariantInfo {
                key: v.key.clone(),
                name: v.name.clone(),
                code: v.code.clone(),
                description: v.description.clone(),
                parties: v.parties.clone(),
                articles: v.articles,
            })
            .collect()
    }

    /// Human-readable catalog, shown by `list` and whenever routing fails.
    pub fn listing(&self) -> String {
        let mut lines = vec!["支持的合同类型：".to_string()];
        for (i, v) in self.variants.iter().enumerate() {
            lines.push(format!("  {}. {}（{}）", i + 1, v.name, v.code));
            lines.push(format!("     {}", v.description));
            lines.push(format!("     当事人：{}", v.parties.join(" / ")));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::CHECKBOX_PREFIX;

    #[test]
    fn embedded_catalog_loads_and_keys_match() {
        let catalog = Catalog::load().expect("embedded configs parse");
        let keys: Vec<&str> = catalog.variants().iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, ["tigong", "weituo", "ronghe", "zhongjie"]);
    }

    #[test]
    fn unknown_variant_is_a_named_error() {
        let catalog = Catalog::load().unwrap();
        let err = catalog.variant("zulin").unwrap_err();
        assert!(err.to_string().contains("zulin"));
    }

    #[test]
    fn group_fields_are_unique_within_each_variant() {
        let catalog = Catalog::load().unwrap();
        for v in catalog.variants() {
            let mut seen = HashSet::new();
            for g in v.groups.values() {
                for f in &g.fields {
                    assert!(seen.insert(f), "{} declared twice in {}", f, v.key);
                }
            }
        }
    }

    #[test]
    fn alias_and_amount_sources_are_declared_fields() {
        let catalog = Catalog::load().unwrap();
        for v in catalog.variants() {
            let declared: HashSet<&String> =
                v.groups.values().flat_map(|g| g.fields.iter()).collect();
            for src in v.aliases.keys() {
                assert!(declared.contains(src), "alias source {} missing in {}", src, v.key);
            }
            for (target, src) in &v.amount_words {
                assert!(declared.contains(src), "amount source {} missing in {}", src, v.key);
                assert!(
                    !target.starts_with(CHECKBOX_PREFIX),
                    "amount target {} cannot be a checkbox",
                    target
                );
            }
        }
    }
}
