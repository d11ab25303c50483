use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use lte_core::{Highlight, Row};

use crate::app::{App, VERSION};
use crate::status_manager::MessageType;
use crate::text_width::{fit_prefix, str_width, substitute};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Text rows
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Message bar
        ])
        .split(f.size());

    app.scroll(chunks[0].height as usize, chunks[0].width as usize);

    draw_rows(f, app, chunks[0]);
    draw_status_bar(f, app, chunks[1]);
    draw_message_bar(f, app, chunks[2]);
    place_cursor(f, app, chunks[0]);
}

pub fn highlight_style(hl: Highlight) -> Style {
    let style = Style::default();
    match hl {
        Highlight::Normal => style,
        Highlight::LineComment | Highlight::BlockComment => style.fg(Color::Cyan),
        Highlight::KeywordPrimary => style.fg(Color::Yellow),
        Highlight::KeywordSecondary => style.fg(Color::Green),
        Highlight::StringLiteral => style.fg(Color::Magenta),
        Highlight::NumericLiteral => style.fg(Color::Red),
        Highlight::SearchMatch => style.fg(Color::Blue),
    }
}

fn draw_rows(f: &mut Frame, app: &App, area: Rect) {
    let document = &app.session.document;
    let view = app.viewport;
    let width = area.width as usize;

    let lines: Vec<Line> = (0..area.height as usize)
        .map(|y| match document.row(y + view.row_offset) {
            Some(row) => row_line(row, view.col_offset, width),
            None if document.is_empty() && y == area.height as usize / 3 => {
                welcome_line(width)
            }
            None => Line::from("~"),
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn row_line(row: &Row, offset: usize, width: usize) -> Line<'static> {
    let fit = fit_prefix(row.visible(offset, width).map(|(ch, _)| ch), width);

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for (ch, hl) in row.visible(offset, fit) {
        let (glyph, style) = match substitute(ch) {
            Some(glyph) => (glyph, Style::default().add_modifier(Modifier::REVERSED)),
            None => (ch, highlight_style(hl)),
        };
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(glyph);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

fn welcome_line(width: usize) -> Line<'static> {
    let mut welcome = format!("lte -- version {}", VERSION);
    welcome.truncate(width);
    let mut padding = (width - welcome.len()) / 2;
    let mut line = String::new();
    if padding > 0 {
        line.push('~');
        padding -= 1;
    }
    line.push_str(&" ".repeat(padding));
    line.push_str(&welcome);
    Line::from(line)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let document = &app.session.document;
    let width = area.width as usize;

    let name = app
        .file_manager
        .file_name()
        .unwrap_or_else(|| "[No Name]".to_string());
    let modified = if app.is_modified() { "(modified)" } else { "" };
    let mut status: String = format!(
        "{:.20} - {} lines {}",
        name,
        document.len(),
        modified
    )
    .chars()
    .take(width)
    .collect();

    let file_type = document.syntax().map_or("no ft", |s| s.file_type.as_str());
    let right = format!(
        "{} | {}/{}",
        file_type,
        app.session.cursor.cy + 1,
        document.len()
    );

    let used = status.chars().count();
    let room = width.saturating_sub(used);
    if room >= right.len() {
        status.push_str(&" ".repeat(room - right.len()));
        status.push_str(&right);
    } else {
        status.push_str(&" ".repeat(room));
    }

    let bar = Paragraph::new(status).style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(bar, area);
}

fn draw_message_bar(f: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.status.get_current_message() else {
        return;
    };
    let style = match message.message_type {
        MessageType::Error => Style::default().fg(Color::Red),
        MessageType::Warning => Style::default().fg(Color::Yellow),
        MessageType::Info | MessageType::Prompt => Style::default(),
    };
    let text: String = message.content.chars().take(area.width as usize).collect();
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn place_cursor(f: &mut Frame, app: &App, area: Rect) {
    let view = app.viewport;
    let y = app.session.cursor.cy.saturating_sub(view.row_offset);
    let x = app
        .session
        .document
        .row(app.session.cursor.cy)
        .map_or(0, |row| {
            let render = row.render();
            let start = view.col_offset.min(render.len());
            let end = view.rx.clamp(start, render.len());
            str_width(&render[start..end])
        });

    if x < area.width as usize && y < area.height as usize {
        f.set_cursor(area.x + x as u16, area.y + y as u16);
    }
}
