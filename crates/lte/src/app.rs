use anyhow::Result;
use std::path::PathBuf;

use lte_core::{Cursor, Document, Key, Registry, SearchAction, Session};

use crate::config::Config;
use crate::file_manager::FileManager;
use crate::status_manager::StatusManager;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

const CTRL_A: Key = Key::ctrl('a');
const CTRL_E: Key = Key::ctrl('e');
const CTRL_F: Key = Key::ctrl('f');
const CTRL_H: Key = Key::ctrl('h');
const CTRL_L: Key = Key::ctrl('l');
const CTRL_Q: Key = Key::ctrl('q');
const CTRL_S: Key = Key::ctrl('s');

/// Where the visible window sits over the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
    /// Render column of the cursor, refreshed by [`App::scroll`].
    pub rx: usize,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

/// Cursor and scroll position captured when a search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedView {
    cursor: Cursor,
    row_offset: usize,
    col_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SaveAs,
    Search(SavedView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl Prompt {
    fn message(&self) -> String {
        match self.kind {
            PromptKind::SaveAs => format!("Save as: {} (ESC to cancel)", self.buffer),
            PromptKind::Search(_) => {
                format!("Search: {} (Use ESC/Arrows/Enter)", self.buffer)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Prompt(Prompt),
}

pub struct App {
    pub session: Session,
    pub config: Config,
    pub registry: Registry,
    pub file_manager: FileManager,
    pub status: StatusManager,
    pub viewport: Viewport,
    mode: Mode,
    quit_times: u32,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::new(Document::with_tab_stop(config.tab_stop)),
            registry: Registry::builtin(),
            file_manager: FileManager::new(),
            status: StatusManager::new(config.message_timeout),
            viewport: Viewport::default(),
            mode: Mode::Normal,
            quit_times: config.quit_times,
            should_quit: false,
            config,
        }
    }

    /// Loads `path` into a fresh document and picks its syntax.
    pub async fn open(&mut self, path: PathBuf) -> Result<()> {
        let content = self.file_manager.open_file(path).await?;
        let mut document = Document::from_text(&content, self.config.tab_stop);
        if let Some(name) = self.file_manager.file_name() {
            document.select_syntax(&name, &self.registry);
        }
        self.session = Session::new(document);
        self.viewport.row_offset = 0;
        self.viewport.col_offset = 0;
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_modified(&self) -> bool {
        self.session.document.is_dirty()
    }

    pub fn update_status(&mut self) {
        self.status.update();
    }

    pub async fn handle_key(&mut self, key: Key) -> Result<()> {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key).await,
            Mode::Prompt(_) => self.handle_prompt_key(key).await,
        }
    }

    async fn handle_normal_key(&mut self, key: Key) -> Result<()> {
        match key {
            Key::ENTER => self.session.insert_newline(),
            CTRL_Q => {
                if self.is_modified() && self.quit_times > 0 {
                    self.status.set_warning(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(());
                }
                log::info!("Quit requested");
                self.should_quit = true;
                return Ok(());
            }
            CTRL_S => self.save().await?,
            CTRL_F => self.start_search(),
            Key::Home | CTRL_A => self.session.move_to_line_start(),
            Key::End | CTRL_E => self.session.move_to_line_end(),
            Key::Backspace | CTRL_H => self.session.delete_char(),
            Key::Delete => {
                self.session.move_cursor(Key::ArrowRight);
                self.session.delete_char();
            }
            Key::PageUp => self.page(Key::ArrowUp),
            Key::PageDown => self.page(Key::ArrowDown),
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.session.move_cursor(key)
            }
            Key::Escape | CTRL_L => {}
            Key::Char(ch) => self.session.insert_char(ch),
        }
        self.quit_times = self.config.quit_times;
        Ok(())
    }

    /// Jumps to the top or bottom of the screen, then moves one screenful.
    fn page(&mut self, direction: Key) {
        let rows = self.viewport.screen_rows;
        if direction == Key::ArrowUp {
            self.session.cursor.cy = self.viewport.row_offset;
        } else {
            let bottom = (self.viewport.row_offset + rows).saturating_sub(1);
            self.session.cursor.cy = bottom.min(self.session.document.len());
        }
        self.session.clamp_cursor();
        for _ in 0..rows {
            self.session.move_cursor(direction);
        }
    }

    async fn save(&mut self) -> Result<()> {
        if !self.file_manager.has_file() {
            self.enter_prompt(PromptKind::SaveAs);
            return Ok(());
        }
        self.write_to_disk().await;
        Ok(())
    }

    async fn write_to_disk(&mut self) {
        match self
            .file_manager
            .save_file(&mut self.session.document)
            .await
        {
            Ok(bytes) => self.status.set_info(format!("{} bytes written to disk", bytes)),
            Err(e) => {
                log::error!("Save failed: {:#}", e);
                self.status.set_error(format!("Can't save! I/O error: {:#}", e));
            }
        }
    }

    fn start_search(&mut self) {
        let saved = SavedView {
            cursor: self.session.cursor,
            row_offset: self.viewport.row_offset,
            col_offset: self.viewport.col_offset,
        };
        self.enter_prompt(PromptKind::Search(saved));
    }

    fn enter_prompt(&mut self, kind: PromptKind) {
        let prompt = Prompt {
            kind,
            buffer: String::new(),
        };
        self.status.set_prompt(prompt.message());
        self.mode = Mode::Prompt(prompt);
    }

    async fn handle_prompt_key(&mut self, key: Key) -> Result<()> {
        let Mode::Prompt(mut prompt) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return Ok(());
        };

        match key {
            Key::Backspace | Key::Delete | CTRL_H => {
                prompt.buffer.pop();
            }
            Key::Escape => {
                self.status.clear();
                self.cancel_prompt(prompt.kind);
                return Ok(());
            }
            Key::ENTER if !prompt.buffer.is_empty() => {
                self.status.clear();
                self.confirm_prompt(prompt).await?;
                return Ok(());
            }
            Key::Char(ch) if !ch.is_control() => prompt.buffer.push(ch),
            _ => {}
        }

        if let PromptKind::Search(_) = prompt.kind {
            let action = match key {
                Key::ArrowRight | Key::ArrowDown => SearchAction::Next,
                Key::ArrowLeft | Key::ArrowUp => SearchAction::Previous,
                _ => SearchAction::Edit,
            };
            self.search_step(&prompt.buffer, action);
        }

        self.status.set_prompt(prompt.message());
        self.mode = Mode::Prompt(prompt);
        Ok(())
    }

    fn search_step(&mut self, query: &str, action: SearchAction) {
        if self.session.find(query, action).is_some() {
            // Past the end, so the next scroll puts the match at the top.
            self.viewport.row_offset = self.session.document.len();
        }
    }

    fn cancel_prompt(&mut self, kind: PromptKind) {
        match kind {
            PromptKind::SaveAs => self.status.set_info("Save aborted".to_string()),
            PromptKind::Search(saved) => {
                self.session.find("", SearchAction::Cancel);
                self.session.cursor = saved.cursor;
                self.viewport.row_offset = saved.row_offset;
                self.viewport.col_offset = saved.col_offset;
            }
        }
    }

    async fn confirm_prompt(&mut self, prompt: Prompt) -> Result<()> {
        match prompt.kind {
            PromptKind::SaveAs => {
                self.file_manager
                    .set_current_path(PathBuf::from(&prompt.buffer));
                self.session
                    .document
                    .select_syntax(&prompt.buffer, &self.registry);
                self.write_to_disk().await;
            }
            PromptKind::Search(_) => {
                self.session.find(&prompt.buffer, SearchAction::Confirm);
            }
        }
        Ok(())
    }

    /// Adjusts the offsets so the cursor is on screen.
    pub fn scroll(&mut self, screen_rows: usize, screen_cols: usize) {
        let view = &mut self.viewport;
        view.screen_rows = screen_rows.max(1);
        view.screen_cols = screen_cols.max(1);
        view.rx = self.session.render_column();

        let cy = self.session.cursor.cy;
        if cy < view.row_offset {
            view.row_offset = cy;
        }
        if cy >= view.row_offset + view.screen_rows {
            view.row_offset = cy + 1 - view.screen_rows;
        }
        if view.rx < view.col_offset {
            view.col_offset = view.rx;
        }
        if view.rx >= view.col_offset + view.screen_cols {
            view.col_offset = view.rx + 1 - view.screen_cols;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lte_core::Highlight;
    use tempfile::TempDir;

    fn app_with(text: &str) -> App {
        let mut app = App::new(Config::default());
        app.session = Session::new(Document::from_text(text, 8));
        app.scroll(10, 40);
        app
    }

    async fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(Key::Char(ch)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_and_newline() {
        let mut app = App::new(Config::default());
        type_str(&mut app, "ab").await;
        app.handle_key(Key::ENTER).await.unwrap();
        type_str(&mut app, "c").await;
        assert_eq!(app.session.document.to_text(), "ab\nc\n");
        assert!(app.is_modified());
    }

    #[tokio::test]
    async fn test_quit_needs_confirmation_when_dirty() {
        let mut app = App::new(Config::default());
        type_str(&mut app, "x").await;

        for remaining in (1..=3).rev() {
            app.handle_key(CTRL_Q).await.unwrap();
            assert!(!app.should_quit());
            let message = app.status.get_current_message().unwrap();
            assert!(message.content.contains(&format!("Press Ctrl-Q {} more times", remaining)));
        }
        app.handle_key(CTRL_Q).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_other_key_resets_quit_count() {
        let mut app = App::new(Config::default());
        type_str(&mut app, "x").await;
        app.handle_key(CTRL_Q).await.unwrap();
        app.handle_key(CTRL_Q).await.unwrap();
        app.handle_key(Key::ArrowLeft).await.unwrap();
        app.handle_key(CTRL_Q).await.unwrap();
        let message = app.status.get_current_message().unwrap();
        assert!(message.content.contains("Press Ctrl-Q 3 more times"));
    }

    #[tokio::test]
    async fn test_clean_document_quits_immediately() {
        let mut app = app_with("hello\n");
        app.handle_key(CTRL_Q).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_delete_key_removes_char_under_cursor() {
        let mut app = app_with("abc\n");
        app.handle_key(Key::Delete).await.unwrap();
        assert_eq!(app.session.document.to_text(), "bc\n");
        assert_eq!(app.session.cursor, Cursor { cx: 0, cy: 0 });
    }

    #[tokio::test]
    async fn test_home_end_and_ctrl_aliases() {
        let mut app = app_with("hello\n");
        app.handle_key(Key::End).await.unwrap();
        assert_eq!(app.session.cursor.cx, 5);
        app.handle_key(CTRL_A).await.unwrap();
        assert_eq!(app.session.cursor.cx, 0);
        app.handle_key(CTRL_E).await.unwrap();
        assert_eq!(app.session.cursor.cx, 5);
        app.handle_key(Key::Home).await.unwrap();
        assert_eq!(app.session.cursor.cx, 0);
    }

    #[tokio::test]
    async fn test_page_down_and_up() {
        let text: String = (0..30).map(|i| format!("line {}\n", i)).collect();
        let mut app = app_with(&text);

        app.handle_key(Key::PageDown).await.unwrap();
        // Bottom of the screen (row 9) plus one screenful.
        assert_eq!(app.session.cursor.cy, 19);
        app.scroll(10, 40);
        assert_eq!(app.viewport.row_offset, 10);

        app.handle_key(Key::PageUp).await.unwrap();
        assert_eq!(app.session.cursor.cy, 0);
    }

    #[tokio::test]
    async fn test_scroll_follows_cursor() {
        let text: String = (0..30).map(|i| format!("{}\n", i)).collect();
        let mut app = app_with(&text);
        app.session.cursor.cy = 25;
        app.scroll(10, 40);
        assert_eq!(app.viewport.row_offset, 16);
        app.session.cursor.cy = 3;
        app.scroll(10, 40);
        assert_eq!(app.viewport.row_offset, 3);

        let mut wide = app_with(&format!("{}\n", "x".repeat(100)));
        wide.session.cursor.cx = 60;
        wide.scroll(10, 40);
        assert_eq!(wide.viewport.col_offset, 21);
        assert_eq!(wide.viewport.rx, 60);
    }

    #[tokio::test]
    async fn test_search_cancel_restores_view() {
        let mut app = app_with("alpha\nbeta\ngamma beta\n");
        app.session.cursor = Cursor { cx: 2, cy: 0 };

        app.handle_key(CTRL_F).await.unwrap();
        assert!(matches!(app.mode(), Mode::Prompt(_)));
        type_str(&mut app, "beta").await;
        assert_eq!(app.session.cursor, Cursor { cx: 0, cy: 1 });
        assert_eq!(app.session.document.row(1).unwrap().highlights()[0], Highlight::SearchMatch);

        app.handle_key(Key::ArrowDown).await.unwrap();
        assert_eq!(app.session.cursor, Cursor { cx: 6, cy: 2 });

        app.handle_key(Key::Escape).await.unwrap();
        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(app.session.cursor, Cursor { cx: 2, cy: 0 });
        assert_eq!(app.viewport.row_offset, 0);
        assert!(app
            .session
            .document
            .rows()
            .iter()
            .all(|row| !row.highlights().contains(&Highlight::SearchMatch)));
    }

    #[tokio::test]
    async fn test_search_confirm_keeps_cursor() {
        let mut app = app_with("alpha\nbeta\n");
        app.handle_key(CTRL_F).await.unwrap();
        type_str(&mut app, "bet").await;
        app.handle_key(Key::ENTER).await.unwrap();
        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(app.session.cursor, Cursor { cx: 0, cy: 1 });
        assert!(!app.status.has_message());
    }

    #[tokio::test]
    async fn test_empty_prompt_enter_stays_in_prompt() {
        let mut app = app_with("alpha\n");
        app.handle_key(CTRL_F).await.unwrap();
        app.handle_key(Key::ENTER).await.unwrap();
        assert!(matches!(app.mode(), Mode::Prompt(_)));
        let message = app.status.get_current_message().unwrap();
        assert_eq!(message.content, "Search:  (Use ESC/Arrows/Enter)");
    }

    #[tokio::test]
    async fn test_save_as_prompt_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.go");

        let mut app = App::new(Config::default());
        type_str(&mut app, "func").await;
        app.handle_key(CTRL_S).await.unwrap();
        assert!(matches!(app.mode(), Mode::Prompt(_)));

        type_str(&mut app, &path.to_string_lossy()).await;
        app.handle_key(Key::ENTER).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "func\n");
        assert!(!app.is_modified());
        assert_eq!(app.session.document.syntax().unwrap().file_type, "go");
        let message = app.status.get_current_message().unwrap();
        assert_eq!(message.content, "5 bytes written to disk");
    }

    #[tokio::test]
    async fn test_save_as_escape_aborts() {
        let mut app = App::new(Config::default());
        type_str(&mut app, "x").await;
        app.handle_key(CTRL_S).await.unwrap();
        app.handle_key(Key::Escape).await.unwrap();
        assert_eq!(app.mode(), &Mode::Normal);
        assert!(!app.file_manager.has_file());
        assert_eq!(app.status.get_current_message().unwrap().content, "Save aborted");
    }

    #[tokio::test]
    async fn test_save_failure_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(Config::default());
        app.file_manager
            .set_current_path(dir.path().join("missing").join("f.txt"));
        type_str(&mut app, "x").await;
        app.handle_key(CTRL_S).await.unwrap();
        let message = app.status.get_current_message().unwrap();
        assert!(message.content.starts_with("Can't save! I/O error:"));
        assert!(app.is_modified());
    }

    #[tokio::test]
    async fn test_open_selects_syntax() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "int x; /* c\n*/\n").unwrap();

        let mut app = App::new(Config::default());
        app.open(path).await.unwrap();
        assert_eq!(app.session.document.len(), 2);
        assert!(!app.is_modified());
        let first = app.session.document.row(0).unwrap();
        assert_eq!(first.highlights()[0], Highlight::KeywordSecondary);
        assert!(first.has_open_comment());
    }
}
