//! FocusStack: which component receives keys.
//!
//! One base pane (deck, search bar or log panel) plus modal overlays stacked
//! on top of it (slide menu, help). The topmost entry has focus.

use crate::action::ComponentId;

pub struct FocusStack {
    base: ComponentId,
    overlays: Vec<ComponentId>,
}

impl FocusStack {
    pub fn new(base: ComponentId) -> Self {
        Self {
            base,
            overlays: Vec::new(),
        }
    }

    pub fn current(&self) -> ComponentId {
        self.overlays.last().copied().unwrap_or(self.base)
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == id
    }

    pub fn base(&self) -> ComponentId {
        self.base
    }

    /// Move the base focus. Overlays stay on top.
    pub fn focus(&mut self, id: ComponentId) {
        self.base = id;
    }

    /// Open an overlay; re-opening one already open moves it to the top.
    pub fn push(&mut self, id: ComponentId) {
        self.overlays.retain(|&o| o != id);
        self.overlays.push(id);
    }

    pub fn remove(&mut self, id: ComponentId) {
        self.overlays.retain(|&o| o != id);
    }

    pub fn has_overlay(&self, id: ComponentId) -> bool {
        self.overlays.contains(&id)
    }
}

impl Default for FocusStack {
    fn default() -> Self {
        Self::new(ComponentId::Deck)
    }
}
