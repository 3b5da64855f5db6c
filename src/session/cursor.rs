//! Selection cursor over the current result set

use crate::models::{ResultItem, ResultSet};

/// Selected index into the active `ResultSet`
///
/// The index is `None` exactly when the set is empty and otherwise stays
/// within `[0, len-1]`. Next/previous never wrap.
#[derive(Debug, Clone, Default)]
pub struct PlaylistCursor {
    items: ResultSet,
    index: Option<usize>,
    /// First row shown in the list viewport
    offset: usize,
}

impl PlaylistCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new result set, highlighting its first item
    pub fn replace(&mut self, items: ResultSet) {
        self.index = if items.is_empty() { None } else { Some(0) };
        self.items = items;
        self.offset = 0;
    }

    pub fn clear(&mut self) {
        self.replace(ResultSet::empty());
    }

    pub fn items(&self) -> &ResultSet {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&ResultItem> {
        self.index.and_then(|i| self.items.get(i))
    }

    /// Move the highlight up without selecting
    pub fn up(&mut self) {
        if let Some(i) = self.index {
            self.index = Some(i.saturating_sub(1));
            if i.saturating_sub(1) < self.offset {
                self.offset = i.saturating_sub(1);
            }
        }
    }

    /// Move the highlight down without selecting
    pub fn down(&mut self) {
        if let Some(i) = self.index {
            self.index = Some((i + 1).min(self.last_index()));
        }
    }

    /// Step forward and return the item to play
    ///
    /// At the last item the index stays put and that item is returned again.
    pub fn next(&mut self) -> Option<ResultItem> {
        self.down();
        self.current().cloned()
    }

    /// Step back and return the item to play
    pub fn prev(&mut self) -> Option<ResultItem> {
        self.up();
        self.current().cloned()
    }

    /// Item to play for an explicit selection, defaulting to the first
    pub fn select_current(&mut self) -> Option<ResultItem> {
        if self.index.is_none() && !self.items.is_empty() {
            self.index = Some(0);
        }
        self.current().cloned()
    }

    /// Update offset to keep the cursor visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        let Some(selected) = self.index else {
            self.offset = 0;
            return;
        };
        if visible_height == 0 {
            return;
        }
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + visible_height {
            self.offset = selected + 1 - visible_height;
        }
    }

    /// Items inside a viewport of `visible_height` rows
    pub fn visible(&self, visible_height: usize) -> &[ResultItem] {
        let items = self.items.as_slice();
        let start = self.offset.min(items.len());
        let end = (start + visible_height).min(items.len());
        &items[start..end]
    }

    fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }
}
