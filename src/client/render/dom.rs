//! Headless model of the rendered catalog.
//!
//! ```text
//! IconContainer
//! ├── IconCard { id, name, checked, embed, errored }
//! ├── IconCard ...
//! └── watch: Option<SubtreeWatch>
//! ```
//!
//! Structural changes go through the container so an installed watch sees
//! every one of them.

use crate::svg::VectorDocument;

/// Load handler attached to an embedding element, numbered in attach order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadHandler(pub u64);

/// Click listener installed on a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickListener;

#[derive(Debug, Clone, PartialEq)]
pub enum EmbedState {
    /// Not requested yet.
    Pending,
    /// A load is outstanding.
    Requested,
    Loaded(VectorDocument),
    Failed(String),
}

/// Embedding element referencing an export location.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub location: Option<String>,
    pub handler: Option<LoadHandler>,
    pub click: Option<ClickListener>,
    pub state: EmbedState,
}

impl Embed {
    pub fn new(location: Option<String>) -> Self {
        Self {
            location,
            handler: None,
            click: None,
            state: EmbedState::Pending,
        }
    }

    pub fn document(&self) -> Option<&VectorDocument> {
        match &self.state {
            EmbedState::Loaded(doc) => Some(doc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconCard {
    pub id: String,
    pub name: String,
    pub checked: bool,
    pub embed: Embed,
    pub errored: bool,
}

impl IconCard {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checked: false,
            embed: Embed::new(location),
            errored: false,
        }
    }
}

/// Observer of structural changes anywhere under the container.
#[derive(Debug, PartialEq, Eq)]
pub struct SubtreeWatch {
    id: u64,
    pending: usize,
}

impl SubtreeWatch {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Default)]
pub struct IconContainer {
    cards: Vec<IconCard>,
    watch: Option<SubtreeWatch>,
}

impl IconContainer {
    pub fn cards(&self) -> &[IconCard] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&IconCard> {
        self.cards.get(index)
    }

    /// Non-structural access; changes made here are not observed.
    pub fn card_mut(&mut self, index: usize) -> Option<&mut IconCard> {
        self.cards.get_mut(index)
    }

    pub fn cards_mut(&mut self) -> impl Iterator<Item = &mut IconCard> {
        self.cards.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Replace every card.
    pub fn replace_all(&mut self, cards: Vec<IconCard>) {
        self.cards = cards;
        self.notify();
    }

    /// Insert a card at `index` (clamped to the end).
    #[cfg(test)]
    pub fn insert(&mut self, index: usize, card: IconCard) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        self.notify();
    }

    #[cfg(test)]
    pub fn remove(&mut self, index: usize) -> Option<IconCard> {
        if index >= self.cards.len() {
            return None;
        }
        let card = self.cards.remove(index);
        self.notify();
        Some(card)
    }

    /// Install `watch`, disconnecting any previous one.
    pub fn observe(&mut self, id: u64) -> Option<SubtreeWatch> {
        self.watch.replace(SubtreeWatch { id, pending: 0 })
    }

    pub fn disconnect(&mut self) -> Option<SubtreeWatch> {
        self.watch.take()
    }

    #[cfg(test)]
    pub fn watch_id(&self) -> Option<u64> {
        self.watch.as_ref().map(SubtreeWatch::id)
    }

    /// Drain the change notifications recorded since the last call.
    pub fn take_notifications(&mut self) -> usize {
        self.watch
            .as_mut()
            .map_or(0, |w| std::mem::take(&mut w.pending))
    }

    /// Record a change inside a card, such as a document swapped into its
    /// embed.
    pub fn mark_changed(&mut self) {
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(watch) = self.watch.as_mut() {
            watch.pending += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutations_notify_only_when_observed() {
        let mut container = IconContainer::default();
        container.insert(0, IconCard::new("1:1", "a", None));
        assert_eq!(container.take_notifications(), 0);

        container.observe(1);
        container.insert(5, IconCard::new("1:2", "b", None));
        container.remove(0);
        assert!(container.remove(10).is_none());
        assert_eq!(container.take_notifications(), 2);
        assert_eq!(container.take_notifications(), 0);
        assert_eq!(container.cards()[0].id, "1:2");
    }

    #[test]
    fn test_observe_replaces_previous_watch() {
        let mut container = IconContainer::default();
        assert!(container.observe(1).is_none());
        assert_eq!(container.observe(2).map(|w| w.id()), Some(1));
        assert_eq!(container.watch_id(), Some(2));
        assert_eq!(container.disconnect().map(|w| w.id()), Some(2));
        assert_eq!(container.watch_id(), None);
    }
}
