use serde::{Deserialize, Serialize};

pub const GREYHOUND_CATEGORY_ID: &str = "9daef0d7-bf3c-4f50-921d-8e818c60fe61";
pub const HARNESS_CATEGORY_ID: &str = "161d9be2-e909-4326-8c2c-35ed71fb460b";
pub const HORSE_CATEGORY_ID: &str = "4a2788f8-e825-4d36-9894-efd4baf1cfae";

/// A racing category the user can filter on.
///
/// Categories come from static configuration and never change while the
/// process runs. `icon` is an opaque handle the renderer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: icon.into(),
        }
    }
}

/// The three racing codes the feed reports.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(GREYHOUND_CATEGORY_ID, "Greyhound", "greyhound"),
        Category::new(HARNESS_CATEGORY_ID, "Harness", "harness"),
        Category::new(HORSE_CATEGORY_ID, "Horse", "horse"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories_have_unique_ids() {
        let categories = default_categories();
        assert_eq!(categories.len(), 3);
        let mut ids: Vec<_> = categories.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_parse_category_toml() {
        let toml = r#"
[[categories]]
id = "1"
title = "Greyhound"
icon = "dog"

[[categories]]
id = "2"
title = "Harness"
"#;

        #[derive(Deserialize)]
        struct Wrapper {
            categories: Vec<Category>,
        }

        let parsed: Wrapper = toml::from_str(toml).unwrap();
        assert_eq!(parsed.categories.len(), 2);
        assert_eq!(parsed.categories[0], Category::new("1", "Greyhound", "dog"));
        assert_eq!(parsed.categories[1].icon, "");
    }
}
