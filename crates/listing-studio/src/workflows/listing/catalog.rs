use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const FALLBACK_ICON: &str = "help-circle";

/// Identifier wrapper for taxonomy categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub subcategories: Vec<String>,
}

impl Category {
    pub fn new(id: &str, name: &str, subcategories: &[&str]) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.to_string(),
            subcategories: subcategories.iter().map(|sub| sub.to_string()).collect(),
        }
    }

    pub fn icon(&self) -> &'static str {
        icon_for(&self.name)
    }

    pub fn has_subcategory(&self, name: &str) -> bool {
        self.subcategories.iter().any(|sub| sub == name)
    }
}

/// Icon glyph shown on a category tile.
pub fn icon_for(category_name: &str) -> &'static str {
    match category_name {
        "Decor/Art" => "palette",
        "Clothing" => "tshirt-crew",
        "Furniture" => "sofa",
        "Electronics" => "desktop-mac",
        "Books & Media" => "book-open",
        "Hobbies" => "puzzle",
        "Other" => "dots-horizontal",
        _ => FALLBACK_ICON,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("category id {0} appears more than once")]
    DuplicateId(String),
    #[error("category {0} has a blank name")]
    BlankName(String),
    #[error("unable to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Ordered, immutable taxonomy offered on the category step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    pub fn standard() -> Self {
        Self {
            categories: vec![
                Category::new("1", "Decor/Art", &["Paintings", "Sculptures", "Wall Art"]),
                Category::new("2", "Clothing", &["Men", "Women", "Kids"]),
                Category::new("3", "Furniture", &["Sofas", "Tables", "Chairs"]),
                Category::new("4", "Electronics", &["Phones", "Laptops", "TVs"]),
                Category::new("5", "Books & Media", &["Books", "Magazines", "DVDs"]),
                Category::new("6", "Hobbies", &["Crafts", "Collectibles", "Games"]),
                Category::new("7", "Other", &[]),
            ],
        }
    }

    pub fn from_categories(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for category in &categories {
            if category.name.trim().is_empty() {
                return Err(CatalogError::BlankName(category.id.0.clone()));
            }
            if !seen.insert(category.id.clone()) {
                return Err(CatalogError::DuplicateId(category.id.0.clone()));
            }
        }

        Ok(Self { categories })
    }

    /// Reads `id,name,subcategories` rows; subcategories are `|`-separated.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut categories = Vec::new();
        for record in csv_reader.deserialize::<CatalogRow>() {
            categories.push(record?.into_category());
        }

        Self::from_categories(categories)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Subcategory names are not qualified by parent, so any owner counts.
    pub fn knows_subcategory(&self, name: &str) -> bool {
        self.categories
            .iter()
            .any(|category| category.has_subcategory(name))
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "split_subcategories")]
    subcategories: Vec<String>,
}

impl CatalogRow {
    fn into_category(self) -> Category {
        Category {
            id: CategoryId(self.id),
            name: self.name,
            subcategories: self.subcategories,
        }
    }
}

fn split_subcategories<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}
