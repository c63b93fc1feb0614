use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Number of hourly bars in a daily usage chart.
pub const HOURS_PER_DAY: usize = 24;

/// Hour labels in chart order, left to right.
pub const HOUR_LABELS: [&str; HOURS_PER_DAY] = [
    "12am", "1am", "2am", "3am", "4am", "5am", "6am", "7am", "8am", "9am", "10am", "11am",
    "12pm", "1pm", "2pm", "3pm", "4pm", "5pm", "6pm", "7pm", "8pm", "9pm", "10pm", "11pm",
];

/// Index of an hour label, case-insensitive.
pub fn hour_index(label: &str) -> Option<usize> {
    let label = label.trim().to_lowercase();
    HOUR_LABELS.iter().position(|h| *h == label)
}

/// A canonical usage category and the words that identify it on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryData {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Raw categories.json file format
#[derive(Debug, Deserialize)]
struct CategoriesFile {
    categories: Vec<CategoryData>,
}

const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    ("social", &["social"]),
    ("entertainment", &["entertainment"]),
    ("education", &["education"]),
    ("games", &["games", "game"]),
    ("productivity", &["productivity"]),
    ("creativity", &["creativity"]),
    ("utilities", &["utilities", "utility"]),
    ("shopping & food", &["shopping", "food"]),
    ("travel", &["travel"]),
    ("health & fitness", &["health", "fitness"]),
    ("information & reading", &["information", "reading"]),
    ("finance", &["finance"]),
    ("other", &["other"]),
];

/// Category registry
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    pub categories: Vec<CategoryData>,
    by_keyword: HashMap<String, String>,
}

impl CategoryRegistry {
    /// The category table shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (name, keywords) in BUILTIN_CATEGORIES {
            registry.insert(CategoryData {
                name: (*name).to_string(),
                keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            });
        }
        registry
    }

    /// Load the builtin table plus any extra categories from `data_dir/categories.json`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut registry = Self::builtin();

        let categories_path = data_dir.join("categories.json");
        if categories_path.exists() {
            let content = std::fs::read_to_string(&categories_path)
                .with_context(|| format!("Failed to read {}", categories_path.display()))?;
            let file: CategoriesFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", categories_path.display()))?;

            let extra = file.categories.len();
            for category in file.categories {
                registry.insert(category);
            }

            tracing::info!(
                "Loaded {} extra categories ({} total)",
                extra,
                registry.categories.len()
            );
        } else {
            tracing::warn!(
                "No categories.json found at {}, using builtin categories",
                categories_path.display()
            );
        }

        Ok(registry)
    }

    fn insert(&mut self, category: CategoryData) {
        let name = category.name.to_lowercase();
        for keyword in &category.keywords {
            self.by_keyword.insert(keyword.to_lowercase(), name.clone());
        }
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.keywords.extend(category.keywords),
            None => self.categories.push(CategoryData {
                name,
                keywords: category.keywords,
            }),
        }
    }

    /// Canonical category for a label as it appears on screen ("Social", "Shopping & Food").
    ///
    /// The first word of the label that is a known keyword decides the category.
    pub fn canonicalize(&self, label: &str) -> Option<&str> {
        normalize_label(label)
            .split_whitespace()
            .find_map(|word| self.by_keyword.get(word))
            .map(String::as_str)
    }
}

/// Lowercase, turn `&` and anything that is not an ASCII letter into spaces, squeeze runs of spaces.
pub fn normalize_label(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
