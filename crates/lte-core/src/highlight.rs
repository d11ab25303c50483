//! Single-row syntax classification.
//!
//! [`highlight_row`] scans one row's rendered text and returns a tag per
//! character plus whether a block comment is still open at the end of the
//! row. Propagating that flag to following rows is the document's job; see
//! [`crate::Document`].

use crate::syntax::{KeywordClass, Syntax};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    LineComment,
    BlockComment,
    KeywordPrimary,
    KeywordSecondary,
    StringLiteral,
    NumericLiteral,
    SearchMatch,
}

const SEPARATORS: &str = ",.()+-/*=~%<>[];";

pub fn is_separator(ch: char) -> bool {
    ch == ' ' || ch == '\0' || SEPARATORS.contains(ch)
}

fn starts_with(text: &[char], pattern: &str) -> bool {
    let mut rest = text.iter();
    pattern.chars().all(|p| rest.next() == Some(&p))
}

/// Classifies `render` under `syntax`.
///
/// `in_comment` is the previous row's open-block-comment flag (false for the
/// first row). Returns the tags (same length as `render`) and this row's
/// open-block-comment flag.
pub fn highlight_row(
    render: &[char],
    syntax: Option<&Syntax>,
    in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let line_comment = syntax.line_comment.as_deref().filter(|m| !m.is_empty());
    let block_comment = syntax
        .block_comment
        .as_ref()
        .filter(|(open, close)| !open.is_empty() && !close.is_empty())
        .map(|(open, close)| (open.as_str(), close.as_str()));

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = in_comment;

    let mut i = 0;
    'scan: while i < render.len() {
        let ch = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };
        let rest = &render[i..];

        if let Some(marker) = line_comment {
            if in_string.is_none() && !in_comment && starts_with(rest, marker) {
                hl[i..].fill(Highlight::LineComment);
                break;
            }
        }

        if let Some((open, close)) = block_comment {
            if in_string.is_none() {
                if in_comment {
                    hl[i] = Highlight::BlockComment;
                    if starts_with(rest, close) {
                        let len = close.chars().count();
                        hl[i..i + len].fill(Highlight::BlockComment);
                        i += len;
                        in_comment = false;
                        prev_sep = true;
                    } else {
                        i += 1;
                    }
                    continue;
                } else if starts_with(rest, open) {
                    let len = open.chars().count();
                    hl[i..i + len].fill(Highlight::BlockComment);
                    i += len;
                    in_comment = true;
                    continue;
                }
            }
        }

        if syntax.highlight_strings {
            if let Some(delim) = in_string {
                hl[i] = Highlight::StringLiteral;
                if ch == '\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::StringLiteral;
                    i += 2;
                    continue;
                }
                if ch == delim {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if ch == '"' || ch == '\'' {
                in_string = Some(ch);
                hl[i] = Highlight::StringLiteral;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((ch.is_ascii_digit() && (prev_sep || prev_hl == Highlight::NumericLiteral))
                || (ch == '.' && prev_hl == Highlight::NumericLiteral))
        {
            hl[i] = Highlight::NumericLiteral;
            prev_sep = false;
            i += 1;
            continue;
        }

        if prev_sep {
            for keyword in &syntax.keywords {
                if keyword.text.is_empty() || !starts_with(rest, &keyword.text) {
                    continue;
                }
                let end = i + keyword.text.chars().count();
                if end < render.len() && !is_separator(render[end]) {
                    continue;
                }
                let tag = match keyword.class {
                    KeywordClass::Primary => Highlight::KeywordPrimary,
                    KeywordClass::Secondary => Highlight::KeywordSecondary,
                };
                hl[i..end].fill(tag);
                i = end;
                prev_sep = false;
                continue 'scan;
            }
        }

        hl[i] = Highlight::Normal;
        prev_sep = is_separator(ch);
        i += 1;
    }

    (hl, in_comment)
}
