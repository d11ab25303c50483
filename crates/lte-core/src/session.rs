use crate::document::Document;
use crate::keys::Key;
use crate::search::{SearchAction, SearchMatch, SearchState};

/// Logical cursor position. `cx` indexes raw characters of row `cy`; `cy`
/// may equal the row count, meaning the empty line past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
}

/// Everything one editing session owns: the document, the cursor and the
/// search state. Cursor-level commands live here so the document itself
/// only deals in row/column coordinates.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub document: Document,
    pub cursor: Cursor,
    pub search: SearchState,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            cursor: Cursor::default(),
            search: SearchState::new(),
        }
    }

    /// Render column of the cursor, derived from the raw column.
    pub fn render_column(&self) -> usize {
        self.document.cx_to_rx(self.cursor.cy, self.cursor.cx)
    }

    fn current_row_len(&self) -> Option<usize> {
        self.document.row(self.cursor.cy).map(|row| row.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.cursor.cy == self.document.len() {
            self.document.insert_row(self.document.len(), "");
        }
        self.document
            .insert_char(self.cursor.cy, self.cursor.cx, ch);
        self.cursor.cx += 1;
    }

    pub fn insert_newline(&mut self) {
        self.document.split_row(self.cursor.cy, self.cursor.cx);
        self.cursor.cy += 1;
        self.cursor.cx = 0;
    }

    /// Deletes the character left of the cursor, joining with the previous
    /// row at column zero.
    pub fn delete_char(&mut self) {
        let Cursor { cx, cy } = self.cursor;
        if cy >= self.document.len() || (cx == 0 && cy == 0) {
            return;
        }
        if cx > 0 {
            self.document.delete_char(cy, cx - 1);
            self.cursor.cx -= 1;
        } else {
            self.cursor.cx = self.document.row(cy - 1).map_or(0, |row| row.len());
            self.document.join_with_previous(cy);
            self.cursor.cy -= 1;
        }
    }

    /// Moves the cursor for an arrow key; other keys are ignored.
    pub fn move_cursor(&mut self, key: Key) {
        let row_len = self.current_row_len();
        match key {
            Key::ArrowUp => {
                self.cursor.cy = self.cursor.cy.saturating_sub(1);
            }
            Key::ArrowDown => {
                if self.cursor.cy < self.document.len() {
                    self.cursor.cy += 1;
                }
            }
            Key::ArrowLeft => {
                if self.cursor.cx > 0 {
                    self.cursor.cx -= 1;
                } else if self.cursor.cy > 0 {
                    self.cursor.cy -= 1;
                    self.cursor.cx = self.current_row_len().unwrap_or(0);
                }
            }
            Key::ArrowRight => match row_len {
                Some(len) if self.cursor.cx < len => self.cursor.cx += 1,
                Some(len) if self.cursor.cx == len => {
                    self.cursor.cy += 1;
                    self.cursor.cx = 0;
                }
                _ => {}
            },
            _ => return,
        }
        self.clamp_cursor();
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.cx = 0;
    }

    pub fn move_to_line_end(&mut self) {
        if let Some(len) = self.current_row_len() {
            self.cursor.cx = len;
        }
    }

    /// Keeps the cursor inside the document after a move or edit.
    pub fn clamp_cursor(&mut self) {
        self.cursor.cy = self.cursor.cy.min(self.document.len());
        self.cursor.cx = self.current_row_len().map_or(0, |len| self.cursor.cx.min(len));
    }

    /// One incremental search step; a match moves the cursor onto it.
    pub fn find(&mut self, query: &str, action: SearchAction) -> Option<SearchMatch> {
        let found = self.search.step(&mut self.document, query, action)?;
        self.cursor = Cursor {
            cx: found.col,
            cy: found.row,
        };
        Some(found)
    }
}
