use crate::highlight::highlight_row;
use crate::row::{Row, DEFAULT_TAB_STOP};
use crate::syntax::{Registry, Syntax};

/// Ordered rows of one open file.
///
/// Every mutation re-renders and re-highlights the affected rows before
/// returning, so a row's rendered text and tags always agree with its raw
/// text. Row indices always equal their position.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    syntax: Option<Syntax>,
    tab_stop: usize,
    dirty: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_tab_stop(DEFAULT_TAB_STOP)
    }

    pub fn with_tab_stop(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            syntax: None,
            tab_stop: tab_stop.max(1),
            dirty: false,
        }
    }

    /// Builds a document from file content, one row per line.
    pub fn from_text(text: &str, tab_stop: usize) -> Self {
        let mut doc = Self::with_tab_stop(tab_stop);
        doc.load(text);
        doc
    }

    /// Replaces all rows with the lines of `text`, newlines stripped.
    pub fn load(&mut self, text: &str) {
        self.rows.clear();
        for line in text.split_inclusive('\n') {
            let line = line.strip_suffix('\n').unwrap_or(line);
            let at = self.rows.len();
            self.insert_row(at, line);
        }
        self.dirty = false;
        log::debug!("Loaded {} rows", self.rows.len());
    }

    /// Every row followed by a newline, in order.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.rows.iter().map(|r| r.len() + 1).sum());
        for row in &self.rows {
            out.extend(row.chars());
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn syntax(&self) -> Option<&Syntax> {
        self.syntax.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Picks the profile for `filename` from `registry` and re-highlights
    /// every row.
    pub fn select_syntax(&mut self, filename: &str, registry: &Registry) {
        self.set_syntax(registry.select(filename).cloned());
    }

    pub fn set_syntax(&mut self, syntax: Option<Syntax>) {
        self.syntax = syntax;
        self.rehighlight_all();
    }

    pub fn insert_row(&mut self, at: usize, text: &str) {
        let at = at.min(self.rows.len());
        // Start from the flag the following row was highlighted against, so
        // the cascade sees a change whenever the new row alters it.
        let inherited = at > 0 && self.rows[at - 1].has_open_comment();
        self.rows
            .insert(at, Row::new(at, text).with_open_comment(inherited));
        for row in &mut self.rows[at + 1..] {
            row.set_index(row.index() + 1);
        }
        self.update_row(at);
        self.dirty = true;
    }

    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        for row in &mut self.rows[at..] {
            row.set_index(row.index() - 1);
        }
        // The row now at `at` has a new predecessor.
        if at < self.rows.len() {
            self.update_syntax(at);
        }
        self.dirty = true;
    }

    pub fn insert_char(&mut self, at: usize, col: usize, ch: char) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.insert_char(col, ch);
        self.update_row(at);
        self.dirty = true;
    }

    pub fn delete_char(&mut self, at: usize, col: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        if row.delete_char(col) {
            self.update_row(at);
            self.dirty = true;
        }
    }

    pub fn append_text(&mut self, at: usize, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        self.append_chars(at, &chars);
    }

    fn append_chars(&mut self, at: usize, chars: &[char]) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.append(chars);
        self.update_row(at);
        self.dirty = true;
    }

    /// Breaks row `at` at raw column `col`; the tail becomes row `at + 1`.
    pub fn split_row(&mut self, at: usize, col: usize) {
        if at >= self.rows.len() {
            self.insert_row(self.rows.len(), "");
            return;
        }
        if col == 0 {
            self.insert_row(at, "");
            return;
        }
        let tail: String = self.rows[at].split_off(col).into_iter().collect();
        self.update_row(at);
        self.insert_row(at + 1, &tail);
    }

    /// Appends row `at` to row `at - 1` and removes it.
    pub fn join_with_previous(&mut self, at: usize) {
        if at == 0 || at >= self.rows.len() {
            return;
        }
        let tail = self.rows[at].chars().to_vec();
        self.append_chars(at - 1, &tail);
        self.delete_row(at);
    }

    pub fn cx_to_rx(&self, at: usize, cx: usize) -> usize {
        self.rows
            .get(at)
            .map_or(0, |row| row.cx_to_rx(cx, self.tab_stop))
    }

    pub fn rx_to_cx(&self, at: usize, rx: usize) -> usize {
        self.rows
            .get(at)
            .map_or(0, |row| row.rx_to_cx(rx, self.tab_stop))
    }

    fn update_row(&mut self, at: usize) {
        let tab_stop = self.tab_stop;
        if let Some(row) = self.rows.get_mut(at) {
            row.update_render(tab_stop);
            self.update_syntax(at);
        }
    }

    /// Re-highlights row `at`, then each following row for as long as the
    /// open-comment flag handed to it keeps changing.
    fn update_syntax(&mut self, at: usize) {
        let mut next = Some(at);
        while let Some(i) = next.take() {
            let in_comment = i > 0 && self.rows[i - 1].has_open_comment();
            let row = &mut self.rows[i];
            let (hl, open) = highlight_row(row.render(), self.syntax.as_ref(), in_comment);
            let changed = open != row.has_open_comment();
            row.set_highlights(hl, open);
            if changed && i + 1 < self.rows.len() {
                next = Some(i + 1);
            }
        }
    }

    fn rehighlight_all(&mut self) {
        let mut in_comment = false;
        for row in &mut self.rows {
            let (hl, open) = highlight_row(row.render(), self.syntax.as_ref(), in_comment);
            row.set_highlights(hl, open);
            in_comment = open;
        }
    }
}
