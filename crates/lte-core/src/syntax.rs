//! Declarative file-type descriptions used by the highlighter.
//!
//! A [`Registry`] is an ordered list of [`Syntax`] entries. Callers may
//! register additional entries before a document selects its profile; once
//! selected, a profile is never mutated.

use std::path::Path;

/// How a keyword is classed for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    /// Control flow and declarations.
    Primary,
    /// Type names and builtins.
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub text: String,
    pub class: KeywordClass,
}

impl Keyword {
    pub fn primary(text: &str) -> Self {
        Self {
            text: text.to_string(),
            class: KeywordClass::Primary,
        }
    }

    pub fn secondary(text: &str) -> Self {
        Self {
            text: text.to_string(),
            class: KeywordClass::Secondary,
        }
    }
}

/// A rule matching a file name against a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMatcher {
    /// Exact extension equality, stored without the leading dot.
    Extension(String),
    /// Substring anywhere in the file name.
    Contains(String),
}

impl FileMatcher {
    /// Parses the compact notation used by the built-in table: a leading
    /// `.` means an extension, anything else a substring.
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix('.') {
            Some(ext) => FileMatcher::Extension(ext.to_string()),
            None => FileMatcher::Contains(pattern.to_string()),
        }
    }

    pub fn matches(&self, filename: &str) -> bool {
        match self {
            FileMatcher::Extension(ext) => Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == ext),
            FileMatcher::Contains(needle) => filename.contains(needle.as_str()),
        }
    }
}

/// Highlighting rules for one file type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub file_type: String,
    pub matchers: Vec<FileMatcher>,
    pub keywords: Vec<Keyword>,
    pub line_comment: Option<String>,
    pub block_comment: Option<(String, String)>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

impl Syntax {
    pub fn matches(&self, filename: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(filename))
    }

    pub fn go() -> Self {
        let mut keywords: Vec<Keyword> = [
            "switch", "if", "for", "range", "break", "continue", "return", "else", "case",
            "struct", "type",
        ]
        .iter()
        .map(|k| Keyword::primary(k))
        .collect();
        keywords.extend(
            [
                "int", "int32", "int64", "uint", "uint32", "uint64", "float", "float32",
                "float64", "string", "rune", "byte", "map", "chan", "error", "func",
            ]
            .iter()
            .map(|k| Keyword::secondary(k)),
        );

        Self {
            file_type: "go".to_string(),
            matchers: vec![FileMatcher::parse(".go")],
            keywords,
            line_comment: Some("//".to_string()),
            block_comment: Some(("/*".to_string(), "*/".to_string())),
            highlight_numbers: true,
            highlight_strings: true,
        }
    }

    pub fn c() -> Self {
        let mut keywords: Vec<Keyword> = [
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "case", "default", "goto", "sizeof",
            "#include", "#define",
        ]
        .iter()
        .map(|k| Keyword::primary(k))
        .collect();
        keywords.extend(
            [
                "int", "long", "double", "float", "char", "unsigned", "signed", "void",
                "short", "const", "size_t",
            ]
            .iter()
            .map(|k| Keyword::secondary(k)),
        );

        Self {
            file_type: "c".to_string(),
            matchers: [".c", ".h", ".cpp", ".hpp", ".cc"]
                .iter()
                .map(|p| FileMatcher::parse(p))
                .collect(),
            keywords,
            line_comment: Some("//".to_string()),
            block_comment: Some(("/*".to_string(), "*/".to_string())),
            highlight_numbers: true,
            highlight_strings: true,
        }
    }

    pub fn rust() -> Self {
        let mut keywords: Vec<Keyword> = [
            "fn", "let", "mut", "match", "if", "else", "for", "while", "loop", "in", "break",
            "continue", "return", "struct", "enum", "impl", "trait", "pub", "use", "mod",
            "crate", "self", "Self", "where", "as", "const", "static", "unsafe", "move", "ref",
            "type", "dyn",
        ]
        .iter()
        .map(|k| Keyword::primary(k))
        .collect();
        keywords.extend(
            [
                "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
                "usize", "f32", "f64", "bool", "char", "str", "String", "Vec", "Option",
                "Result", "Box",
            ]
            .iter()
            .map(|k| Keyword::secondary(k)),
        );

        Self {
            file_type: "rust".to_string(),
            matchers: vec![FileMatcher::parse(".rs")],
            keywords,
            line_comment: Some("//".to_string()),
            block_comment: Some(("/*".to_string(), "*/".to_string())),
            highlight_numbers: true,
            highlight_strings: true,
        }
    }
}

/// Ordered table of known file types.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Syntax>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self {
            entries: vec![Syntax::go(), Syntax::c(), Syntax::rust()],
        }
    }

    /// Appends an entry; earlier entries keep priority.
    pub fn register(&mut self, syntax: Syntax) {
        self.entries.push(syntax);
    }

    pub fn entries(&self) -> &[Syntax] {
        &self.entries
    }

    /// First entry, in declared order, with a matcher accepting `filename`.
    pub fn select(&self, filename: &str) -> Option<&Syntax> {
        let found = self.entries.iter().find(|s| s.matches(filename));
        match found {
            Some(syntax) => log::debug!("Selected syntax '{}' for {}", syntax.file_type, filename),
            None => log::debug!("No syntax matches {}", filename),
        }
        found
    }
}
