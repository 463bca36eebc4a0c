use std::fmt::{self, Display};

/// Storable snapshot of a cursor head, used to seek back later with
/// [`Navigate::move_to`](crate::Navigate::move_to).
///
/// Holds no reference into the buffer it came from, only the index. `-1` is the position of a
/// cursor over an empty source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    index: isize,
}

impl Location {
    pub fn new(index: isize) -> Self {
        Self { index }
    }

    pub fn index(self) -> isize {
        self.index
    }
}

/// [`Location`] of a [`TextCursor`](crate::TextCursor), additionally carrying the line and column
/// so that seeking restores them without rescanning.
///
/// Both `line` and `column` are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextLocation {
    index: isize,
    line: usize,
    column: usize,
}

impl TextLocation {
    pub fn new(index: isize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    pub fn index(self) -> isize {
        self.index
    }

    pub fn line(self) -> usize {
        self.line
    }

    pub fn column(self) -> usize {
        self.column
    }
}

impl From<TextLocation> for Location {
    fn from(value: TextLocation) -> Self {
        Location::new(value.index)
    }
}

impl PartialOrd for TextLocation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// line and column are derived from the index, so ordering by index alone is total
impl Ord for TextLocation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

/// renders as `line:column`, 1-based, the way editors and compilers report positions
impl Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
