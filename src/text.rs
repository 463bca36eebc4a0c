use crate::{
    config::Config,
    cursor::Cursor,
    error::CursorError,
    location::TextLocation,
    source::Source,
    traits::{Lines, Navigate, Peek},
};

/// [`Cursor`] over characters which also tracks the line and column of the head.
///
/// Line and column are 0-based and change only when the head moves. Moving forward over a line
/// feed starts a new line at column 0, any other character advances the column. Moving backward
/// over a line feed returns to the previous line, with the column recomputed from the buffered
/// text so it always equals the distance to the preceding line feed.
#[derive(Clone)]
pub struct TextCursor<'src> {
    inner: Cursor<'src, char>,
    line: usize,
    column: usize,
}

impl<'src> TextCursor<'src> {
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'src,
    {
        Self::from_cursor(Cursor::new(source))
    }

    pub fn with_config<I>(source: I, config: Config) -> Self
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'src,
    {
        Self::from_cursor(Cursor::with_config(source, config))
    }

    pub fn from_source<S>(source: S, config: Config) -> anyhow::Result<Self>
    where
        S: Source<Item = char> + 'src,
    {
        Ok(Self::from_cursor(Cursor::from_source(source, config)?))
    }

    /// wrap a freshly constructed cursor, its head must not have moved yet
    fn from_cursor(inner: Cursor<'src, char>) -> Self {
        debug_assert!(inner.index() <= 0);

        Self {
            inner,
            line: 0,
            column: 0,
        }
    }

    /// the underlying cursor, without line tracking
    pub fn as_cursor(&self) -> &Cursor<'src, char> {
        &self.inner
    }

    pub fn config(&self) -> Config {
        self.inner.config()
    }

    /// line and column of a head moved from `from` to `to` (both buffered), starting out at
    /// `line` and `column`
    ///
    /// Fails with [`CursorError::LocationMismatch`] when walking backward would take the line or
    /// column below zero, which only happens when the starting point did not come from this text
    fn track(
        &self,
        from: isize,
        to: isize,
        mut line: usize,
        mut column: usize,
    ) -> anyhow::Result<(usize, usize)> {
        if from == to {
            return Ok((line, column));
        }

        let line_feed = self.inner.config().line_feed;

        // both indexes are buffered and therefore non-negative
        let (from, to) = (from as usize, to as usize);

        self.inner.buffer().with_items(|items| -> anyhow::Result<_> {
            if to >= from {
                for &c in &items[from..to] {
                    if c == line_feed {
                        line += 1;
                        column = 0;
                    } else {
                        column += 1;
                    }
                }
            } else {
                for i in (to..from).rev() {
                    if items[i] == line_feed {
                        line = line.checked_sub(1).ok_or(CursorError::LocationMismatch)?;
                        column = items[..i]
                            .iter()
                            .rev()
                            .position(|&c| c == line_feed)
                            .unwrap_or(i);
                    } else {
                        column = column
                            .checked_sub(1)
                            .ok_or(CursorError::LocationMismatch)?;
                    }
                }
            }

            Ok((line, column))
        })
    }

    /// reject a location whose column cannot belong to the buffered index it names
    fn check_location(&self, location: TextLocation, at: usize) -> anyhow::Result<()> {
        let line_feed = self.inner.config().line_feed;

        let fits = location.line() <= at
            && location.column() <= at
            && self.inner.buffer().with_items(|items| match at.checked_sub(1) {
                None => location.line() == 0 && location.column() == 0,
                Some(before) => (items[before] == line_feed) == (location.column() == 0),
            });

        if fits {
            Ok(())
        } else {
            Err(CursorError::LocationMismatch.into())
        }
    }
}

impl<'src> From<&'src str> for TextCursor<'src> {
    fn from(value: &'src str) -> Self {
        Self::new(value.chars())
    }
}

impl std::fmt::Debug for TextCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCursor")
            .field("inner", &self.inner)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

impl PartialEq for TextCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialOrd for TextCursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl Peek for TextCursor<'_> {
    type Item = char;
    type Location = TextLocation;

    fn peek(&self, offset: isize) -> anyhow::Result<Option<char>> {
        self.inner.peek(offset)
    }

    fn index(&self) -> isize {
        self.inner.index()
    }

    fn has_reached_end(&self) -> bool {
        self.inner.has_reached_end()
    }

    fn location(&self) -> TextLocation {
        TextLocation::new(self.inner.index(), self.line, self.column)
    }
}

impl Navigate for TextCursor<'_> {
    fn move_by(&mut self, offset: isize) -> anyhow::Result<bool> {
        let from = self.inner.index();
        if !self.inner.move_by(offset)? {
            return Ok(false);
        }

        match self.track(from, self.inner.index(), self.line, self.column) {
            Ok((line, column)) => {
                self.line = line;
                self.column = column;
                Ok(true)
            }
            Err(e) => {
                self.inner.jump(from);
                Err(e)
            }
        }
    }

    fn move_to(&mut self, location: TextLocation, offset: isize) -> anyhow::Result<bool> {
        let target = location
            .index()
            .checked_add(offset)
            .ok_or(CursorError::SeekOverflow)?;

        if target == self.inner.index() {
            return Ok(true);
        }

        let buffered = self.inner.buffered_len();
        match usize::try_from(location.index()) {
            // restore from the snapshot, then walk the remaining distance through the buffer
            Ok(at) if at < buffered && usize::try_from(target).is_ok_and(|t| t < buffered) => {
                self.check_location(location, at)?;
                let (line, column) =
                    self.track(location.index(), target, location.line(), location.column())?;

                self.inner.jump(target);
                self.line = line;
                self.column = column;
                Ok(true)
            }
            _ => {
                let offset = target
                    .checked_sub(self.inner.index())
                    .ok_or(CursorError::SeekOverflow)?;
                self.move_by(offset)
            }
        }
    }
}

impl Lines for TextCursor<'_> {
    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }

    fn text(&self) -> anyhow::Result<String> {
        let pulled = self.inner.buffer().drain()?;

        if pulled > 0
            && let Some(logger) = self.inner.config().logger
        {
            logger.warn(format_args!(
                "materialising text pulled {pulled} unread characters from the source"
            ));
        }

        Ok(self
            .inner
            .buffer()
            .with_items(|items| items.iter().collect()))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        config::Config,
        location::TextLocation,
        log::{LogLevel, Logger},
        memory::test::Counting,
        text::TextCursor,
        error::CursorError,
        traits::{Lines, Navigate, Peek},
    };

    fn text(s: &str) -> TextCursor<'_> {
        TextCursor::with_config(s.chars(), Config::quiet())
    }

    fn pos(cursor: &TextCursor<'_>) -> (usize, usize) {
        (cursor.line(), cursor.column())
    }

    #[test]
    fn tracks_across_line_feed() {
        let mut cursor = text("a\nb");
        assert_eq!(pos(&cursor), (0, 0));
        assert!(cursor.is_start_of_line());

        assert!(cursor.move_by(1).unwrap());
        assert_eq!(cursor.current().unwrap(), '\n');
        assert_eq!(pos(&cursor), (0, 1));

        assert!(cursor.move_by(1).unwrap());
        assert_eq!(cursor.current().unwrap(), 'b');
        assert_eq!(pos(&cursor), (1, 0));
        assert!(cursor.is_start_of_line());
    }

    #[test]
    fn backward_over_line_feed_recomputes_column() {
        let mut cursor = text("abc\nde\nf");
        assert!(cursor.skip(7).unwrap());
        assert_eq!(cursor.current().unwrap(), 'f');
        assert_eq!(pos(&cursor), (2, 0));

        assert!(cursor.rewind(1).unwrap());
        assert_eq!(pos(&cursor), (1, 2));

        assert!(cursor.rewind(3).unwrap());
        assert_eq!(cursor.current().unwrap(), '\n');
        assert_eq!(pos(&cursor), (0, 3));

        assert!(cursor.rewind(3).unwrap());
        assert_eq!(pos(&cursor), (0, 0));
    }

    #[test]
    fn failed_moves_keep_line_and_column() {
        let mut cursor = text("x\ny");
        cursor.skip(2).unwrap();

        assert!(!cursor.move_by(1).unwrap());
        assert!(!cursor.move_by(-3).unwrap());
        assert_eq!(pos(&cursor), (1, 0));
    }

    #[test]
    fn peek_leaves_line_and_column() {
        let mut cursor = text("ab\ncd");
        cursor.skip(1).unwrap();

        for _ in 0..2 {
            assert_eq!(cursor.peek(1).unwrap(), Some('\n'));
            assert_eq!(cursor.peek(3).unwrap(), Some('d'));
            assert_eq!(cursor.index(), 1);
            assert_eq!(pos(&cursor), (0, 1));
        }
    }

    #[test]
    fn move_to_restores_line_and_column() {
        let mut cursor = text("one\ntwo\nthree");
        cursor.skip(5).unwrap();
        let mark = cursor.location();
        assert_eq!(mark, TextLocation::new(5, 1, 1));

        cursor.skip(5).unwrap();
        assert_eq!(pos(&cursor), (2, 2));

        assert!(cursor.reset(mark).unwrap());
        assert_eq!(cursor.location(), mark);

        assert!(cursor.move_to(mark, 3).unwrap());
        assert_eq!(pos(&cursor), (2, 0));

        assert!(cursor.move_to(mark, -2).unwrap());
        assert_eq!(cursor.current().unwrap(), '\n');
        assert_eq!(pos(&cursor), (0, 3));
    }

    #[test]
    fn move_to_unbuffered_target_tracks_from_head() {
        let mut cursor = text("ab\ncd\nef");
        let start = cursor.location();

        assert!(cursor.move_to(start, 7).unwrap());
        assert_eq!(cursor.current().unwrap(), 'f');
        assert_eq!(pos(&cursor), (2, 1));

        assert!(!cursor.move_to(start, 8).unwrap());
        assert_eq!(pos(&cursor), (2, 1));

        assert!(cursor.reset(start).unwrap());
        assert_eq!(pos(&cursor), (0, 0));
    }

    #[test]
    fn custom_line_feed() {
        let mut cursor = TextCursor::with_config("a;b".chars(), Config::quiet().with_line_feed(';'));
        cursor.skip(2).unwrap();
        assert_eq!(pos(&cursor), (1, 0));
    }

    #[test]
    fn clone_keeps_own_position() {
        let mut origin = text("ab\ncd");
        let mut fork = origin.clone();

        fork.skip(4).unwrap();
        assert_eq!(pos(&fork), (1, 1));
        assert_eq!(pos(&origin), (0, 0));

        origin.skip(1).unwrap();
        assert_eq!(pos(&origin), (0, 1));
        assert!(origin < fork);
    }

    #[test]
    fn text_drains_source_without_moving() {
        let (source, pulls) = Counting::new("hello\nworld".chars().collect());
        let mut cursor = TextCursor::from_source(source, Config::quiet()).unwrap();
        cursor.skip(2).unwrap();

        assert_eq!(cursor.text().unwrap(), "hello\nworld");
        assert_eq!(cursor.index(), 2);
        assert_eq!(pos(&cursor), (0, 2));
        assert!(cursor.as_cursor().source_exhausted());

        let pulled = pulls.get();
        assert_eq!(cursor.text().unwrap(), "hello\nworld");
        assert_eq!(pulls.get(), pulled);
    }

    #[test]
    fn text_with_logging_enabled() {
        let logger = Logger::new(false, LogLevel::Debug);
        let cursor = TextCursor::with_config("ab\nc".chars(), Config::quiet().with_logger(Some(logger)));
        let fork = cursor.clone();

        assert_eq!(fork.text().unwrap(), "ab\nc");
        assert_eq!(cursor.as_cursor().buffered_len(), 4);
    }

    fn assert_mismatch(err: anyhow::Error) {
        assert_eq!(
            err.downcast_ref::<CursorError>(),
            Some(&CursorError::LocationMismatch)
        );
    }

    #[test]
    fn move_to_rejects_impossible_line() {
        let mut cursor = text("a\nb");
        cursor.skip(2).unwrap();

        // column 0 after a line feed looks plausible, but the line cannot be 0 there
        let err = cursor
            .move_to(TextLocation::new(2, 0, 0), -1)
            .expect_err("Mismatched location accepted");
        assert_mismatch(err);

        assert_eq!(cursor.index(), 2);
        assert_eq!(pos(&cursor), (1, 0));
    }

    #[test]
    fn move_to_rejects_impossible_column() {
        let mut cursor = text("ab\ncd");
        cursor.skip(4).unwrap();

        let err = cursor
            .move_to(TextLocation::new(3, 1, 2), 0)
            .expect_err("Column after a line feed accepted");
        assert_mismatch(err);

        let err = cursor
            .move_to(TextLocation::new(1, 0, 0), 1)
            .expect_err("Column 0 mid line accepted");
        assert_mismatch(err);

        assert_eq!(cursor.index(), 4);
        assert_eq!(pos(&cursor), (1, 1));
    }

    #[test]
    fn move_to_rejects_location_from_other_text() {
        let mut other = text("xy\nz");
        other.skip(3).unwrap();
        let foreign = other.location();

        let mut cursor = text("a\n\nb");
        cursor.skip(3).unwrap();

        let err = cursor
            .move_to(foreign, -2)
            .expect_err("Foreign location accepted");
        assert_mismatch(err);
        assert_eq!(cursor.index(), 3);
        assert_eq!(pos(&cursor), (2, 0));

        assert!(cursor.move_to(cursor.location(), -2).unwrap());
        assert_eq!(pos(&cursor), (0, 1));
    }

    #[test]
    fn empty_text() {
        let mut cursor = TextCursor::from("");

        assert!(cursor.source_is_empty());
        assert!(cursor.move_by(0).unwrap());
        assert!(!cursor.move_by(1).unwrap());
        assert_eq!(cursor.text().unwrap(), "");
        assert_eq!(pos(&cursor), (0, 0));
    }
}
