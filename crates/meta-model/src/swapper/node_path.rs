//! Relative node paths of rule items

use meta_store::validate_segment;

/// Path layout of one rule below the rule root.
///
/// - root: `<tag>`
/// - unique item: `<tag>/<item>`
/// - named item: `<tag>/<item>/<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNodePath {
    tag: String,
}

impl RuleNodePath {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn root(&self) -> String {
        self.tag.clone()
    }

    pub fn unique_item(&self, item: &str) -> String {
        format!("{}/{}", self.tag, item)
    }

    /// Path of a named item, or an error message if `name` is not a valid segment.
    pub fn named_item(&self, item: &str, name: &str) -> std::result::Result<String, String> {
        validate_segment(name).map_err(|reason| format!("{} name '{}': {}", item, name, reason))?;
        Ok(format!("{}/{}/{}", self.tag, item, name))
    }

    /// Whether `path` belongs to this rule at all.
    pub fn owns(&self, path: &str) -> bool {
        path == self.tag
            || path
                .strip_prefix(self.tag.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn is_root(&self, path: &str) -> bool {
        path == self.tag
    }

    pub fn is_unique_item(&self, item: &str, path: &str) -> bool {
        path.strip_prefix(self.tag.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| rest == item)
    }

    /// The item name if `path` is `<tag>/<item>/<name>`.
    pub fn find_named_item<'a>(&self, item: &str, path: &'a str) -> Option<&'a str> {
        let name = path
            .strip_prefix(self.tag.as_str())?
            .strip_prefix('/')?
            .strip_prefix(item)?
            .strip_prefix('/')?;
        (!name.is_empty() && !name.contains('/')).then_some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_item_paths() {
        let path = RuleNodePath::new("sharding");
        assert_eq!(path.named_item("tables", "t_order").unwrap(), "sharding/tables/t_order");
        assert!(path.named_item("tables", "a/b").is_err());
        assert_eq!(path.find_named_item("tables", "sharding/tables/t_order"), Some("t_order"));
        assert_eq!(path.find_named_item("tables", "sharding/tables/t_order/x"), None);
        assert_eq!(path.find_named_item("tables", "sharding/tables"), None);
        assert_eq!(path.find_named_item("tables", "shardingx/tables/t"), None);
    }

    #[test]
    fn test_unique_item_and_ownership() {
        let path = RuleNodePath::new("sharding");
        assert!(path.is_unique_item("default_key_generate_strategy", "sharding/default_key_generate_strategy"));
        assert!(!path.is_unique_item("tables", "sharding/tables/t_order"));
        assert!(path.owns("sharding"));
        assert!(path.owns("sharding/tables/t_order"));
        assert!(!path.owns("sharding_ext/tables/t_order"));
    }
}
