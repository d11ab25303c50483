//! Incremental search with a temporary match overlay.

use crate::document::Document;
use crate::highlight::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// What triggered a search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    /// The query text changed.
    Edit,
    Next,
    Previous,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub row: usize,
    /// Raw column of the first matched character.
    pub col: usize,
    /// Render column of the first matched character.
    pub render_col: usize,
}

#[derive(Debug, Clone)]
struct Overlay {
    row: usize,
    saved: Vec<Highlight>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    last_match: Option<usize>,
    direction: Direction,
    overlay: Option<Overlay>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Runs one search step for `query` and overlays the match, if any.
    pub fn step(
        &mut self,
        doc: &mut Document,
        query: &str,
        action: SearchAction,
    ) -> Option<SearchMatch> {
        self.restore(doc);

        match action {
            SearchAction::Confirm | SearchAction::Cancel => {
                self.reset();
                return None;
            }
            SearchAction::Next => self.direction = Direction::Forward,
            SearchAction::Previous => self.direction = Direction::Backward,
            SearchAction::Edit => self.reset(),
        }

        let total = doc.len();
        if self.last_match.is_some_and(|row| row >= total) {
            self.last_match = None;
        }
        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        let needle: Vec<char> = query.chars().collect();
        if needle.is_empty() || total == 0 {
            return None;
        }

        let mut current = self.last_match;
        for _ in 0..total {
            let row = match (current, self.direction) {
                (None, _) => 0,
                (Some(i), Direction::Forward) => (i + 1) % total,
                (Some(0), Direction::Backward) => total - 1,
                (Some(i), Direction::Backward) => i - 1,
            };
            current = Some(row);

            let render = doc.rows()[row].render();
            let Some(render_col) = render
                .windows(needle.len())
                .position(|window| window == needle.as_slice())
            else {
                continue;
            };

            self.last_match = Some(row);
            let col = doc.rx_to_cx(row, render_col);
            if let Some(target) = doc.row_mut(row) {
                let saved = target.highlights().to_vec();
                target.highlights_mut()[render_col..render_col + needle.len()]
                    .fill(Highlight::SearchMatch);
                self.overlay = Some(Overlay { row, saved });
            }
            log::debug!("Search match for {:?} at row {} col {}", query, row, col);
            return Some(SearchMatch {
                row,
                col,
                render_col,
            });
        }

        None
    }

    /// Puts back the tags the last overlay replaced. A row that no longer
    /// exists, or whose length changed, is left alone.
    pub fn restore(&mut self, doc: &mut Document) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        if let Some(row) = doc.row_mut(overlay.row) {
            if row.highlights().len() == overlay.saved.len() {
                row.highlights_mut().copy_from_slice(&overlay.saved);
            }
        }
    }

    fn reset(&mut self) {
        self.last_match = None;
        self.direction = Direction::Forward;
    }
}
