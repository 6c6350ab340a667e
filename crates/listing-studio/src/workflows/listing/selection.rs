use super::animation::{AccordionAnimations, AccordionSettings};
use super::catalog::{Category, CategoryCatalog, CategoryId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// Accordion and multi-select state for the category step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    expanded: Option<CategoryId>,
    selected_categories: BTreeSet<CategoryId>,
    selected_subcategories: BTreeSet<String>,
}

impl SelectionState {
    pub fn expanded(&self) -> Option<&CategoryId> {
        self.expanded.as_ref()
    }

    pub fn selected_categories(&self) -> &BTreeSet<CategoryId> {
        &self.selected_categories
    }

    pub fn selected_subcategories(&self) -> &BTreeSet<String> {
        &self.selected_subcategories
    }

    pub fn is_subcategory_selected(&self, name: &str) -> bool {
        self.selected_subcategories.contains(name)
    }

    pub fn is_category_selected(&self, category: &Category) -> bool {
        self.selected_categories.contains(&category.id)
            || category
                .subcategories
                .iter()
                .any(|sub| self.selected_subcategories.contains(sub))
    }

    pub fn with_subcategory_toggled(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !next.selected_subcategories.remove(name) {
            next.selected_subcategories.insert(name.to_string());
        }
        next
    }
}

/// Accordion transition: at most one panel stays open, and opening a panel selects its
/// category. Collapsing the target drops it from the selection unless one of its
/// subcategories is picked. A panel closed because another one opened keeps its selection.
pub fn toggle_expansion(
    state: &SelectionState,
    category_id: &CategoryId,
    subcategories: &[String],
) -> SelectionState {
    let mut next = state.clone();
    let collapsing = state.expanded.as_ref() == Some(category_id);

    if collapsing {
        next.expanded = None;
        let keeps_subselection = subcategories
            .iter()
            .any(|sub| state.selected_subcategories.contains(sub));
        if !keeps_subselection {
            next.selected_categories.remove(category_id);
            return next;
        }
    } else {
        next.expanded = Some(category_id.clone());
    }

    next.selected_categories.insert(category_id.clone());
    next
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("category {0} is not part of the catalog")]
    UnknownCategory(CategoryId),
    #[error("subcategory {0} is not part of the catalog")]
    UnknownSubcategory(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryRow {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub icon: &'static str,
    pub selected: bool,
    pub expanded: bool,
    pub panel_height: f32,
    pub subcategories: Vec<SubcategoryRow>,
}

/// Catalog-backed selector owning the logical selection and the visual panel progress.
#[derive(Debug, Clone)]
pub struct CategorySelector {
    catalog: CategoryCatalog,
    state: SelectionState,
    animations: AccordionAnimations,
}

impl CategorySelector {
    pub fn new(catalog: CategoryCatalog, settings: AccordionSettings) -> Self {
        Self {
            catalog,
            state: SelectionState::default(),
            animations: AccordionAnimations::new(settings),
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn animations(&self) -> &AccordionAnimations {
        &self.animations
    }

    pub fn toggle_category_expansion(
        &mut self,
        category_id: &CategoryId,
    ) -> Result<&SelectionState, SelectionError> {
        let subcategories = self
            .catalog
            .get(category_id)
            .map(|category| category.subcategories.clone())
            .ok_or_else(|| SelectionError::UnknownCategory(category_id.clone()))?;

        let previous = self.state.expanded.clone();
        self.state = toggle_expansion(&self.state, category_id, &subcategories);

        if let Some(previous) = previous.filter(|id| id != category_id) {
            self.animations.close(&previous);
        }
        if self.state.expanded.as_ref() == Some(category_id) {
            self.animations.open(category_id);
        } else {
            self.animations.close(category_id);
        }

        tracing::debug!(
            category = %category_id,
            expanded = ?self.state.expanded,
            selected = self.state.selected_categories.len(),
            "category panel toggled"
        );
        Ok(&self.state)
    }

    pub fn toggle_subcategory(&mut self, name: &str) -> Result<&SelectionState, SelectionError> {
        if !self.catalog.knows_subcategory(name) {
            return Err(SelectionError::UnknownSubcategory(name.to_string()));
        }

        self.state = self.state.with_subcategory_toggled(name);
        tracing::debug!(
            subcategory = name,
            selected = self.state.is_subcategory_selected(name),
            "subcategory toggled"
        );
        Ok(&self.state)
    }

    pub fn is_category_selected(&self, category: &Category) -> bool {
        self.state.is_category_selected(category)
    }

    /// True once any category would render highlighted.
    pub fn has_selection(&self) -> bool {
        self.catalog
            .categories()
            .iter()
            .any(|category| self.state.is_category_selected(category))
    }

    pub fn advance_animations(&mut self, elapsed: Duration) {
        self.animations.advance(elapsed);
    }

    pub fn rows(&self) -> Vec<CategoryRow> {
        self.catalog
            .categories()
            .iter()
            .map(|category| CategoryRow {
                id: category.id.clone(),
                name: category.name.clone(),
                icon: category.icon(),
                selected: self.state.is_category_selected(category),
                expanded: self.state.expanded.as_ref() == Some(&category.id),
                panel_height: self.animations.panel_height(category),
                subcategories: category
                    .subcategories
                    .iter()
                    .map(|name| SubcategoryRow {
                        name: name.clone(),
                        selected: self.state.is_subcategory_selected(name),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for CategorySelector {
    fn default() -> Self {
        Self::new(CategoryCatalog::standard(), AccordionSettings::default())
    }
}
