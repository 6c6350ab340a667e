use super::catalog::{Category, CategoryId};
use crate::config::ListingConfig;
use std::collections::HashMap;
use std::time::Duration;

/// Geometry and timing for the accordion panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccordionSettings {
    pub row_height: f32,
    pub duration: Duration,
}

impl Default for AccordionSettings {
    fn default() -> Self {
        Self::from(&ListingConfig::default())
    }
}

impl From<&ListingConfig> for AccordionSettings {
    fn from(config: &ListingConfig) -> Self {
        Self {
            row_height: config.row_height,
            duration: config.animation,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PanelAnimation {
    progress: f32,
    target: f32,
}

impl PanelAnimation {
    fn step(&mut self, delta: f32) {
        if self.progress < self.target {
            self.progress = (self.progress + delta).min(self.target);
        } else if self.progress > self.target {
            self.progress = (self.progress - delta).max(self.target);
        }
    }
}

/// Per-category panel progress in `[0, 1]`. Visual only; selection never reads it.
#[derive(Debug, Clone, Default)]
pub struct AccordionAnimations {
    settings: AccordionSettings,
    panels: HashMap<CategoryId, PanelAnimation>,
}

impl AccordionAnimations {
    pub fn new(settings: AccordionSettings) -> Self {
        Self {
            settings,
            panels: HashMap::new(),
        }
    }

    pub fn settings(&self) -> AccordionSettings {
        self.settings
    }

    pub fn open(&mut self, id: &CategoryId) {
        self.panel_mut(id).target = 1.0;
    }

    pub fn close(&mut self, id: &CategoryId) {
        self.panel_mut(id).target = 0.0;
    }

    /// Moves every panel toward its target; a full sweep takes `settings.duration`.
    pub fn advance(&mut self, elapsed: Duration) {
        let total = self.settings.duration.as_secs_f32();
        let delta = if total > 0.0 {
            elapsed.as_secs_f32() / total
        } else {
            1.0
        };

        for panel in self.panels.values_mut() {
            panel.step(delta);
        }
    }

    /// Jumps every panel to its target.
    pub fn settle(&mut self) {
        for panel in self.panels.values_mut() {
            panel.progress = panel.target;
        }
    }

    pub fn progress(&self, id: &CategoryId) -> f32 {
        self.panels
            .get(id)
            .map(|panel| panel.progress)
            .unwrap_or_default()
    }

    pub fn is_animating(&self) -> bool {
        self.panels
            .values()
            .any(|panel| (panel.progress - panel.target).abs() > f32::EPSILON)
    }

    /// Fully open height is one header row plus one row per subcategory.
    pub fn panel_height(&self, category: &Category) -> f32 {
        let rows = category.subcategories.len() as f32 + 1.0;
        self.progress(&category.id) * rows * self.settings.row_height
    }

    fn panel_mut(&mut self, id: &CategoryId) -> &mut PanelAnimation {
        self.panels.entry(id.clone()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn furniture() -> Category {
        Category::new("3", "Furniture", &["Sofas", "Tables", "Chairs"])
    }

    #[test]
    fn untouched_panels_report_zero_without_allocating() {
        let animations = AccordionAnimations::default();
        assert_eq!(animations.progress(&CategoryId::new("3")), 0.0);
        assert!(animations.panels.is_empty());
    }

    #[test]
    fn opening_reaches_full_height_after_duration() {
        let mut animations = AccordionAnimations::default();
        let category = furniture();
        animations.open(&category.id);

        animations.advance(Duration::from_millis(150));
        assert!((animations.progress(&category.id) - 0.5).abs() < 1e-4);
        assert!(animations.is_animating());

        animations.advance(Duration::from_millis(500));
        assert_eq!(animations.progress(&category.id), 1.0);
        assert_eq!(animations.panel_height(&category), 200.0);
        assert!(!animations.is_animating());
    }

    #[test]
    fn closing_returns_to_zero() {
        let mut animations = AccordionAnimations::default();
        let category = furniture();
        animations.open(&category.id);
        animations.settle();

        animations.close(&category.id);
        animations.advance(Duration::from_millis(300));
        assert_eq!(animations.panel_height(&category), 0.0);
    }

    #[test]
    fn empty_category_opens_to_a_single_row() {
        let mut animations = AccordionAnimations::new(AccordionSettings {
            row_height: 40.0,
            duration: Duration::from_millis(100),
        });
        let other = Category::new("7", "Other", &[]);
        animations.open(&other.id);
        animations.settle();
        assert_eq!(animations.panel_height(&other), 40.0);
    }
}
