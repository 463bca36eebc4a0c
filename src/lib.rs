//! Lazy, multi-peek, rewindable cursors over single-pass sources.
//!
//! A [`Cursor`] pulls elements from a forward-only source only when a peek or move needs them and
//! remembers every element it pulled, so a lexer or parser built on top can look ahead, look
//! behind and jump back to a saved [`Location`] without the source supporting random access.
//! [`TextCursor`] adds line and column tracking for character sources.
//!
//! ```
//! use lookaround::{CharCursorExt, Lines, Navigate, Peek, TextCursor};
//!
//! let mut cursor = TextCursor::from("let x;\nlet y;");
//! let start = cursor.location();
//!
//! assert!(cursor.read_str("let ")?);
//! assert_eq!(cursor.read_identifier()?.as_deref(), Some("x"));
//! assert!(cursor.read_str(";")?);
//! assert!(cursor.skip_whitespace(false)?);
//! assert_eq!((cursor.line(), cursor.column()), (1, 0));
//!
//! assert!(cursor.reset(start)?);
//! assert_eq!(cursor.current()?, 'l');
//! # Ok::<(), anyhow::Error>(())
//! ```

mod char_cursor_ext;
mod config;
mod cursor;
mod error;
mod location;
mod log;
mod matching;
mod memory;
mod source;
mod text;
mod traits;

pub use char_cursor_ext::CharCursorExt;
pub use config::Config;
pub use cursor::{Cursor, Remaining};
pub use error::CursorError;
pub use location::{Location, TextLocation};
pub use log::{LOG_ENV_VAR, LogLevel, Logger, NO_COLOR_ENV_VAR};
pub use matching::Match;
pub use source::{Elements, Fallible, Source};
pub use text::TextCursor;
pub use traits::{Lines, Navigate, Peek};
