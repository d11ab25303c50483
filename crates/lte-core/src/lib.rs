// lte-core: the text-editing engine behind the lte editor

pub mod document;
pub mod highlight;
pub mod keys;
pub mod row;
pub mod search;
pub mod session;
pub mod syntax;


pub use document::Document;
pub use highlight::Highlight;
pub use keys::{ByteSource, Key, KeyDecoder};
pub use row::{Row, DEFAULT_TAB_STOP};
pub use search::{Direction, SearchAction, SearchMatch, SearchState};
pub use session::{Cursor, Session};
pub use syntax::{FileMatcher, Keyword, KeywordClass, Registry, Syntax};
