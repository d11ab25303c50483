//! One line of a document: raw text, its tab-expanded rendering and the
//! highlight tag of every rendered character.

use crate::highlight::Highlight;

pub const DEFAULT_TAB_STOP: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    idx: usize,
    chars: Vec<char>,
    render: Vec<char>,
    hl: Vec<Highlight>,
    open_comment: bool,
}

impl Row {
    /// Creates an unrendered row. The owning document renders and
    /// highlights it before it becomes observable.
    pub(crate) fn new(idx: usize, text: &str) -> Self {
        Self {
            idx,
            chars: text.chars().collect(),
            render: Vec::new(),
            hl: Vec::new(),
            open_comment: false,
        }
    }

    pub(crate) fn with_open_comment(mut self, open: bool) -> Self {
        self.open_comment = open;
        self
    }

    /// Position of this row in its document.
    pub fn index(&self) -> usize {
        self.idx
    }

    pub(crate) fn set_index(&mut self, idx: usize) {
        self.idx = idx;
    }

    /// Raw length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn render(&self) -> &[char] {
        &self.render
    }

    pub fn render_text(&self) -> String {
        self.render.iter().collect()
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.hl
    }

    pub(crate) fn highlights_mut(&mut self) -> &mut [Highlight] {
        &mut self.hl
    }

    /// Whether a block comment is still open at the end of this row.
    pub fn has_open_comment(&self) -> bool {
        self.open_comment
    }

    pub(crate) fn set_highlights(&mut self, hl: Vec<Highlight>, open_comment: bool) {
        debug_assert_eq!(hl.len(), self.render.len());
        self.hl = hl;
        self.open_comment = open_comment;
    }

    /// Rebuilds the rendered text from the raw text.
    pub(crate) fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        self.render.clear();
        self.render.reserve(self.chars.len());
        for &ch in &self.chars {
            if ch == '\t' {
                self.render.push(' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(' ');
                }
            } else {
                self.render.push(ch);
            }
        }
    }

    pub(crate) fn insert_char(&mut self, at: usize, ch: char) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
    }

    /// Removes the character at `at`; returns false when out of range.
    pub(crate) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        true
    }

    pub(crate) fn append(&mut self, text: &[char]) {
        self.chars.extend_from_slice(text);
    }

    /// Cuts the row at `at`, keeping the head and returning the tail.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<char> {
        let at = at.min(self.chars.len());
        self.chars.split_off(at)
    }

    /// Maps a raw column to its render column.
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        self.chars.iter().take(cx).fold(0, |rx, &ch| {
            if ch == '\t' {
                rx + (tab_stop - 1) - (rx % tab_stop) + 1
            } else {
                rx + 1
            }
        })
    }

    /// Smallest raw column whose render column exceeds `rx`, or the row
    /// length when `rx` is past the rendered end.
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut cur = 0;
        for (cx, &ch) in self.chars.iter().enumerate() {
            if ch == '\t' {
                cur += (tab_stop - 1) - (cur % tab_stop);
            }
            cur += 1;
            if cur > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    /// The rendered window starting at `offset`, at most `width` characters
    /// wide, paired with each character's tag.
    pub fn visible(&self, offset: usize, width: usize) -> impl Iterator<Item = (char, Highlight)> + '_ {
        self.render
            .iter()
            .copied()
            .zip(self.hl.iter().copied())
            .skip(offset)
            .take(width)
    }
}
