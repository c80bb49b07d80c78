//! ScrollWindow: cursor plus viewport over a list of known length.
//!
//! Holds no items; the deck keeps one per region and maps its cursor onto
//! the region's cards.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollWindow {
    pub selected: usize,
    pub offset: usize,
}

impl ScrollWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the cursor inside `len` items after the list was replaced.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.offset > self.selected {
            self.offset = self.selected;
        }
    }

    /// Move up. Returns false when already at the top.
    pub fn up(&mut self, n: usize) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected = self.selected.saturating_sub(n);
        true
    }

    /// Move down within `len` items. Returns false when already at the bottom.
    pub fn down(&mut self, n: usize, len: usize) -> bool {
        if len == 0 || self.selected + 1 >= len {
            return false;
        }
        self.selected = (self.selected + n).min(len - 1);
        true
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Scroll so the cursor is inside a viewport of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }

    /// Index range shown in a viewport of `height` rows.
    pub fn visible_range(&self, height: usize, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        start..(start + height).min(len)
    }

    /// Item under viewport row `row`, if any.
    pub fn index_at(&self, row: usize, len: usize) -> Option<usize> {
        let idx = self.offset + row;
        (idx < len).then_some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_within_bounds() {
        let mut w = ScrollWindow::new();
        assert!(!w.up(1));
        assert!(w.down(1, 3));
        assert!(w.down(5, 3));
        assert_eq!(w.selected, 2);
        assert!(!w.down(1, 3));
        assert!(!w.down(1, 0));
    }

    #[test]
    fn viewport_follows_cursor() {
        let mut w = ScrollWindow::new();
        w.last(20);
        w.ensure_visible(5);
        assert_eq!(w.offset, 15);
        assert_eq!(w.visible_range(5, 20), 15..20);

        w.first();
        w.ensure_visible(5);
        assert_eq!(w.offset, 0);
        assert_eq!(w.index_at(4, 20), Some(4));
        assert_eq!(w.index_at(4, 3), None);
    }

    #[test]
    fn clamp_after_shrink() {
        let mut w = ScrollWindow::new();
        w.last(50);
        w.ensure_visible(10);
        w.clamp(4);
        assert_eq!(w.selected, 3);
        assert!(w.offset <= 3);
        w.clamp(0);
        assert_eq!(w.selected, 0);
    }
}
