//! Interactive renderer.
//!
//! ```text
//! render(catalog)
//!   ├── generation += 1
//!   ├── disconnect watch
//!   ├── replace cards (ids order)
//!   └── init interactions ──► observe(new watch) ──► ensure handlers
//!
//! pending_loads() ──► LoadRequest ──► (caller fetches) ──► complete_load()
//! ```
//!
//! Loads are owned by the caller. A load that completes after a newer render
//! carries a stale generation and is dropped.

mod dom;
mod resize;


pub use dom::{ClickListener, EmbedState, IconCard, IconContainer, LoadHandler};
use resize::ResizeDebouncer;

use super::fetch::FetchError;
use crate::{catalog::IconCatalog, debug, svg::VectorDocument};
use std::time::{Duration, Instant};

/// A document load the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub index: usize,
    pub id: String,
    pub location: String,
}

#[derive(Debug, Default)]
pub struct Renderer {
    container: IconContainer,
    generation: u64,
    watches: u64,
    handlers: u64,
    resize: ResizeDebouncer,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self) -> &IconContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut IconContainer {
        &mut self.container
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace all cards with one per catalog id, in `ids` order.
    pub fn render(&mut self, catalog: &IconCatalog) {
        self.generation += 1;
        if let Some(watch) = self.container.disconnect() {
            debug!("render"; "disconnected watch {}", watch.id());
        }

        let cards = catalog
            .entries()
            .map(|(id, name)| IconCard::new(id, name, catalog.location(id).map(str::to_string)))
            .collect();
        self.container.replace_all(cards);

        self.init_interactions();
        debug!("render"; "rendered {} cards (generation {})", self.container.len(), self.generation);
    }

    /// Fresh watch, then one ensure pass.
    fn init_interactions(&mut self) {
        self.watches += 1;
        self.container.observe(self.watches);
        self.ensure_handlers_attached();
    }

    /// Attach a load handler to every embed without one. Returns how many
    /// were attached.
    pub fn ensure_handlers_attached(&mut self) -> usize {
        let mut attached = 0;
        for card in self.container.cards_mut() {
            if card.embed.handler.is_none() {
                self.handlers += 1;
                card.embed.handler = Some(LoadHandler(self.handlers));
                attached += 1;
            }
        }
        attached
    }

    /// Run the ensure pass if the watch saw changes since the last call.
    pub fn process_mutations(&mut self) -> usize {
        if self.container.take_notifications() == 0 {
            return 0;
        }
        self.ensure_handlers_attached()
    }

    /// Insert a card into the live container.
    #[cfg(test)]
    pub fn insert_card(&mut self, index: usize, card: IconCard) -> usize {
        self.container.insert(index, card);
        self.process_mutations()
    }

    /// Loads to start now. Each embed is requested at most once per render;
    /// a card without an export location fails here without a request.
    pub fn pending_loads(&mut self) -> Vec<LoadRequest> {
        let generation = self.generation;
        let mut requests = Vec::new();

        for (index, card) in self.container.cards_mut().enumerate() {
            if card.embed.handler.is_none() || card.embed.state != EmbedState::Pending {
                continue;
            }
            match &card.embed.location {
                Some(location) => {
                    card.embed.state = EmbedState::Requested;
                    requests.push(LoadRequest {
                        generation,
                        index,
                        id: card.id.clone(),
                        location: location.clone(),
                    });
                }
                None => {
                    card.embed.state = EmbedState::Failed("no export location".into());
                    card.errored = true;
                }
            }
        }
        requests
    }

    /// Apply a finished load. Returns `false` if it belongs to an older
    /// render or its card is gone.
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        result: Result<String, FetchError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!("render"; "dropping stale load for {}", request.id);
            return false;
        }
        let Some(card) = self.find_requested(request) else {
            return false;
        };

        match result {
            Ok(raw) => match VectorDocument::prepare(&raw) {
                Ok(doc) => {
                    card.embed.state = EmbedState::Loaded(doc);
                    card.embed.click = Some(ClickListener);
                }
                Err(e) => {
                    // shown as fetched, without interactions
                    debug!("render"; "{} is not interactive: {}", card.name, e);
                    card.embed.state = EmbedState::Loaded(VectorDocument::as_is(&raw));
                }
            },
            Err(e) => {
                debug!("render"; "{} failed to load: {}", card.name, e);
                card.embed.state = EmbedState::Failed(e.to_string());
                card.errored = true;
            }
        }
        self.container.mark_changed();
        true
    }

    fn find_requested(&mut self, request: &LoadRequest) -> Option<&mut IconCard> {
        let is_match =
            |card: &IconCard| card.id == request.id && card.embed.state == EmbedState::Requested;

        let index = match self.container.card(request.index) {
            Some(card) if is_match(card) => request.index,
            _ => self.container.cards().iter().position(is_match)?,
        };
        self.container.card_mut(index)
    }

    /// Record a viewport resize.
    pub fn on_resize(&mut self, now: Instant) {
        self.resize.on_resize(now);
    }

    /// Re-initialize interactions once the resize quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.resize.poll(now) {
            return false;
        }
        self.init_interactions();
        true
    }

    /// Time until [`Renderer::poll`] has work, if a resize is pending.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.resize.remaining(now)
    }
}
