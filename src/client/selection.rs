//! Selection tracking.
//!
//! The count is always derived from checkbox state. Toggling a checkbox and
//! clicking a loaded vector flip the same checkbox and share one recount.

use super::render::IconContainer;
use crate::catalog::IconCatalog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCounter {
    pub count: usize,
    /// Emphasis is on exactly when something is selected.
    pub highlighted: bool,
}

/// A checked icon resolved against the current catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedIcon {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    counter: SelectionCounter,
}

impl SelectionTracker {
    pub fn counter(&self) -> SelectionCounter {
        self.counter
    }

    /// Recompute the counter from the container.
    pub fn recount(&mut self, container: &IconContainer) -> SelectionCounter {
        let count = container.cards().iter().filter(|c| c.checked).count();
        self.counter = SelectionCounter {
            count,
            highlighted: count > 0,
        };
        self.counter
    }

    /// The user toggled the checkbox of card `index`.
    pub fn toggle_checkbox(
        &mut self,
        container: &mut IconContainer,
        index: usize,
    ) -> Option<SelectionCounter> {
        let card = container.card_mut(index)?;
        card.checked = !card.checked;
        Some(self.recount(container))
    }

    /// The user clicked the vector of card `index`. Only a loaded document
    /// with a click listener reacts.
    pub fn click_vector(
        &mut self,
        container: &mut IconContainer,
        index: usize,
    ) -> Option<SelectionCounter> {
        container.card(index)?.embed.click?;
        self.toggle_checkbox(container, index)
    }

    /// Check or uncheck every card.
    pub fn set_all(&mut self, container: &mut IconContainer, checked: bool) -> SelectionCounter {
        for card in container.cards_mut() {
            card.checked = checked;
        }
        self.recount(container)
    }

    /// Check the cards whose id or name is in `wanted`. Returns the terms
    /// that matched nothing.
    pub fn check_matching<'a>(
        &mut self,
        container: &mut IconContainer,
        wanted: &'a [String],
    ) -> Vec<&'a str> {
        let mut unmatched = Vec::new();
        for term in wanted {
            let mut hit = false;
            for card in container.cards_mut() {
                if card.id == *term || card.name == *term {
                    card.checked = true;
                    hit = true;
                }
            }
            if !hit {
                unmatched.push(term.as_str());
            }
        }
        self.recount(container);
        unmatched
    }
}

/// Checked cards in display order, skipping ids the catalog no longer has.
pub fn selected(container: &IconContainer, catalog: &IconCatalog) -> Vec<SelectedIcon> {
    container
        .cards()
        .iter()
        .filter(|c| c.checked)
        .filter_map(|c| {
            catalog.name_of(&c.id).map(|name| SelectedIcon {
                id: c.id.clone(),
                name: name.to_string(),
            })
        })
        .collect()
}
