use std::cmp::Ordering;

use crate::{
    config::Config,
    error::CursorError,
    location::Location,
    memory::Buffer,
    source::{Elements, Fallible, Source},
    traits::{Navigate, Peek},
};

/// Lazy, rewindable cursor over a single-pass source.
///
/// Elements are pulled from the source only when a peek or move needs them, and are kept in a
/// buffer shared by the cursor and all of its clones, so any position already visited can be
/// returned to without reading the source again.
///
/// [`Clone`] forks the cursor: the fork gets its own head over the same buffer. Growth caused by
/// any fork is visible to all of them, moving one never moves another.
///
/// [`PartialEq`] and [`PartialOrd`] compare heads over the same buffer. Cursors over different
/// buffers are never equal and have no ordering
pub struct Cursor<'src, T> {
    buffer: Buffer<'src, T>,
    index: isize,
    reached_end: bool,
}

impl<'src, T: Clone + 'src> Cursor<'src, T> {
    /// wrap an infallible source, eagerly pulling its first element
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'src,
    {
        Self::with_config(source, Config::default())
    }

    pub fn with_config<I>(source: I, config: Config) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'src,
    {
        let mut iter = source.into_iter();
        let first = iter.next();

        let buffer = Buffer::new(Elements::new(iter), config);
        buffer.prime(first);

        Self::at_start(buffer)
    }

    /// wrap a source of results, the first error, if any, is returned here
    pub fn try_new<I, E>(source: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = Result<T, E>>,
        I::IntoIter: 'src,
        E: Into<anyhow::Error>,
    {
        Self::from_source(Fallible::new(source.into_iter()), Config::default())
    }

    /// wrap any [`Source`], eagerly pulling its first element
    pub fn from_source<S>(source: S, config: Config) -> anyhow::Result<Self>
    where
        S: Source<Item = T> + 'src,
    {
        let buffer = Buffer::new(source, config);
        buffer.ensure_buffered(0)?;

        Ok(Self::at_start(buffer))
    }

    fn at_start(buffer: Buffer<'src, T>) -> Self {
        if buffer.len() > 0 {
            Self {
                buffer,
                index: 0,
                reached_end: false,
            }
        } else {
            Self {
                buffer,
                index: -1,
                reached_end: true,
            }
        }
    }

    /// get an iterator over the elements from the head onwards, without moving the head
    ///
    /// `with_previous` starts one element behind the head (when there is one), `with_current`
    /// includes the element under the head. Elements past what is buffered are pulled lazily as
    /// the iterator advances and stay available to every cursor over this buffer.
    ///
    /// The iterator holds its own handle to the buffer, calling this again restarts from the head
    pub fn remaining(&self, with_previous: bool, with_current: bool) -> Remaining<'src, T> {
        let head = self.index;
        let start = match (with_previous, with_current) {
            (true, _) if head > 0 => head - 1,
            (_, true) => head.max(0),
            (_, false) => head + 1,
        };

        Remaining {
            buffer: self.buffer.clone(),
            pos: usize::try_from(start).unwrap_or(0),
            skip: with_previous && !with_current && head > 0,
            head: usize::try_from(head).unwrap_or(0),
        }
    }

    /// get the number of elements pulled from the source so far
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// whether the source has reported exhaustion to any cursor over this buffer
    pub fn source_exhausted(&self) -> bool {
        self.buffer.is_exhausted()
    }

    pub fn config(&self) -> Config {
        self.buffer.config()
    }

    pub(crate) fn buffer(&self) -> &Buffer<'src, T> {
        &self.buffer
    }

    /// place the head on an already buffered index without any checks
    pub(crate) fn jump(&mut self, index: isize) {
        debug_assert!(index >= 0 && (index as usize) < self.buffer.len());
        self.index = index;
    }
}

impl<T: Clone> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        if let Some(logger) = self.buffer.config().logger {
            logger.verbose(format_args!("forking cursor at {}", self.index));
        }

        Self {
            buffer: self.buffer.clone(),
            index: self.index,
            reached_end: self.reached_end,
        }
    }
}

impl<T: Clone> std::fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("buffer", &self.buffer)
            .field("index", &self.index)
            .field("reached_end", &self.reached_end)
            .finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer && self.index == other.index
    }
}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.buffer == other.buffer {
            self.index.partial_cmp(&other.index)
        } else {
            None
        }
    }
}

impl<'src, T: Clone + 'src> Peek for Cursor<'src, T> {
    type Item = T;
    type Location = Location;

    fn peek(&self, offset: isize) -> anyhow::Result<Option<T>> {
        let Some(target) = self.index.checked_add(offset) else {
            return Ok(None);
        };
        let Ok(target) = usize::try_from(target) else {
            return Ok(None);
        };

        if self.buffer.ensure_buffered(target)? {
            Ok(self.buffer.get(target))
        } else {
            Ok(None)
        }
    }

    fn index(&self) -> isize {
        self.index
    }

    fn has_reached_end(&self) -> bool {
        self.reached_end
    }

    fn location(&self) -> Location {
        Location::new(self.index)
    }
}

impl<'src, T: Clone + 'src> Navigate for Cursor<'src, T> {
    fn move_by(&mut self, offset: isize) -> anyhow::Result<bool> {
        if offset == 0 {
            return Ok(true);
        }

        let target = self
            .index
            .checked_add(offset)
            .ok_or(CursorError::SeekOverflow)?;

        if self.index < 0 || target < 0 {
            return Ok(false);
        }

        // target is non-negative from here on
        if offset > 0 && !self.buffer.ensure_buffered(target as usize)? {
            self.reached_end = true;
            return Ok(false);
        }

        self.index = target;
        Ok(true)
    }

    fn move_to(&mut self, location: Location, offset: isize) -> anyhow::Result<bool> {
        let target = location
            .index()
            .checked_add(offset)
            .ok_or(CursorError::SeekOverflow)?;

        if target == self.index {
            return Ok(true);
        }

        match usize::try_from(target) {
            Ok(t) if t < self.buffer.len() => {
                self.index = target;
                Ok(true)
            }
            _ => {
                let offset = target
                    .checked_sub(self.index)
                    .ok_or(CursorError::SeekOverflow)?;
                self.move_by(offset)
            }
        }
    }
}

/// Iterator over the elements of a buffer starting at some head, see [`Cursor::remaining`]
pub struct Remaining<'src, T> {
    buffer: Buffer<'src, T>,
    pos: usize,
    /// jump over the head when yielding the previous element but not the current one
    skip: bool,
    head: usize,
}

impl<T: Clone> Iterator for Remaining<'_, T> {
    type Item = anyhow::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip && self.pos == self.head {
            self.pos += 1;
        }

        match self.buffer.ensure_buffered(self.pos) {
            Ok(true) => {
                let item = self.buffer.get(self.pos)?;
                self.pos += 1;
                Some(Ok(item))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
