use crate::{error::CursorError, matching::Match};

/// converts an element count into a head offset
pub(crate) fn to_offset(count: usize) -> anyhow::Result<isize> {
    isize::try_from(count).map_err(|_| CursorError::SeekOverflow.into())
}

/// Read-only view of a cursor head.
///
/// Nothing in this trait moves the head, so it is safe to hand out to code which must only look.
/// Looking ahead may still pull from the source as a cache side effect, which is why peeking
/// returns a [`anyhow::Result`]: the error, if any, comes from the source itself.
pub trait Peek {
    type Item: Clone;
    type Location: Copy;

    /// get the element at `index + offset`, 0 being the current element, negative offsets
    /// looking behind and positive offsets looking ahead
    ///
    /// `None` if that position is before the start or past the end of the source
    fn peek(&self, offset: isize) -> anyhow::Result<Option<Self::Item>>;

    /// position of the head, `-1` when the source was empty at construction
    fn index(&self) -> isize;

    /// whether a move has ever failed because the source ran out
    fn has_reached_end(&self) -> bool;

    /// snapshot of the head to seek back to later
    fn location(&self) -> Self::Location;

    fn source_is_empty(&self) -> bool {
        self.index() < 0
    }

    /// [`Peek::index`] as a buffer position, `None` for an empty source
    fn position(&self) -> Option<usize> {
        usize::try_from(self.index()).ok()
    }

    /// get the element under the head
    ///
    /// Calling this on a cursor over an empty source is a contract violation and returns
    /// [`CursorError::EmptySource`]
    fn current(&self) -> anyhow::Result<Self::Item> {
        if self.source_is_empty() {
            return Err(CursorError::EmptySource.into());
        }

        self.peek(0)?.ok_or_else(|| {
            anyhow::anyhow!("Head at {} does not refer to a buffered element", self.index())
        })
    }

    fn previous(&self) -> anyhow::Result<Option<Self::Item>> {
        self.peek(-1)
    }

    fn next(&self) -> anyhow::Result<Option<Self::Item>> {
        self.peek(1)
    }

    fn is_at_start(&self) -> bool {
        self.index() <= 0
    }

    /// whether no element follows the head, pulls one element ahead to find out
    fn is_at_end(&self) -> anyhow::Result<bool> {
        Ok(self.source_is_empty() || self.peek(1)?.is_none())
    }

    /// test whether `pattern` appears starting at `offset` without moving the head
    fn matches_at(&self, offset: isize, pattern: &[Self::Item]) -> anyhow::Result<bool>
    where
        Self::Item: PartialEq,
    {
        if pattern.is_empty() {
            return Err(CursorError::ZeroLengthMatch.into());
        }

        for (k, expected) in pattern.iter().enumerate() {
            let Some(at) = offset.checked_add(to_offset(k)?) else {
                return Ok(false);
            };

            match self.peek(at)? {
                Some(item) if &item == expected => {}
                _ => return Ok(false),
            }
        }

        Ok(true)
    }
}

/// Mutable cursor head: moving, seeking and the read family.
///
/// Every read is all-or-nothing: when the match fails, or the head cannot advance by the matched
/// length, the head is left exactly where it was.
///
/// Two consumption styles are provided. The `read*` operations match starting at the current
/// element and leave the head on the element after the match. The `read_next*` operations match
/// starting at the element after the head and leave the head on the last matched element, so a
/// match running up to the very end of the source can still be consumed.
pub trait Navigate: Peek {
    /// relocate the head by `offset`
    ///
    /// `0` always succeeds. Fails without moving when the target is before the start, when the
    /// source was empty, or when the source runs out first (which also marks the end as reached)
    fn move_by(&mut self, offset: isize) -> anyhow::Result<bool>;

    /// relocate the head to `location + offset`
    ///
    /// Constant time when the target has already been buffered, otherwise behaves like
    /// [`Navigate::move_by`] with the equivalent relative offset. A location that cannot belong to
    /// this cursor's elements is [`CursorError::LocationMismatch`]
    fn move_to(&mut self, location: Self::Location, offset: isize) -> anyhow::Result<bool>;

    fn reset(&mut self, location: Self::Location) -> anyhow::Result<bool> {
        self.move_to(location, 0)
    }

    fn skip(&mut self, count: usize) -> anyhow::Result<bool> {
        self.move_by(to_offset(count)?)
    }

    fn rewind(&mut self, count: usize) -> anyhow::Result<bool> {
        self.move_by(-to_offset(count)?)
    }

    /// consume the current element, returning it
    ///
    /// The head never moves past the last element, so on the final element this returns `None`
    /// even though [`Peek::current`] has a value. Use [`Navigate::read_next`] to step onto and
    /// return each element when the final one must be seen too
    fn read(&mut self) -> anyhow::Result<Option<Self::Item>> {
        let Some(item) = self.peek(0)? else {
            return Ok(None);
        };

        Ok(self.move_by(1)?.then_some(item))
    }

    /// consume the current element if it matches
    fn read_if(&mut self, m: &Match<'_, Self::Item>) -> anyhow::Result<Option<Self::Item>>
    where
        Self::Item: PartialEq,
    {
        match self.peek(0)? {
            Some(item) if m.matches(&item) => Ok(self.move_by(1)?.then_some(item)),
            _ => Ok(None),
        }
    }

    /// consume `pattern` if it appears starting at the current element
    fn read_seq(&mut self, pattern: &[Self::Item]) -> anyhow::Result<bool>
    where
        Self::Item: PartialEq,
    {
        if !self.matches_at(0, pattern)? {
            return Ok(false);
        }

        self.move_by(to_offset(pattern.len())?)
    }

    /// advance onto the next element, returning it
    fn read_next(&mut self) -> anyhow::Result<Option<Self::Item>> {
        if !self.move_by(1)? {
            return Ok(None);
        }

        self.peek(0)
    }

    /// advance onto the next element if it matches
    fn read_next_if(&mut self, m: &Match<'_, Self::Item>) -> anyhow::Result<Option<Self::Item>>
    where
        Self::Item: PartialEq,
    {
        match self.peek(1)? {
            Some(item) if m.matches(&item) => Ok(self.move_by(1)?.then_some(item)),
            _ => Ok(None),
        }
    }

    /// advance onto the last element of `pattern` if it appears right after the head
    fn read_next_seq(&mut self, pattern: &[Self::Item]) -> anyhow::Result<bool>
    where
        Self::Item: PartialEq,
    {
        if !self.matches_at(1, pattern)? {
            return Ok(false);
        }

        self.move_by(to_offset(pattern.len())?)
    }

    /// consume elements while they match, returning the elements the head advanced past
    ///
    /// An empty run means nothing matched and the head did not move. The head stops on the final
    /// element even when it matches, and that element is not part of the run, so over `aaa` this
    /// returns two elements. [`Navigate::read_next_while`] covers runs that end the source
    fn read_while(&mut self, m: &Match<'_, Self::Item>) -> anyhow::Result<Vec<Self::Item>>
    where
        Self::Item: PartialEq,
    {
        let mut run = Vec::new();
        while let Some(item) = self.read_if(m)? {
            run.push(item);
        }
        Ok(run)
    }

    /// advance while the next element matches, returning the elements the head moved onto
    fn read_next_while(&mut self, m: &Match<'_, Self::Item>) -> anyhow::Result<Vec<Self::Item>>
    where
        Self::Item: PartialEq,
    {
        let mut run = Vec::new();
        while let Some(item) = self.read_next_if(m)? {
            run.push(item);
        }
        Ok(run)
    }

    /// like [`Navigate::read_while`] without collecting, returns whether anything was skipped
    fn skip_while(&mut self, m: &Match<'_, Self::Item>) -> anyhow::Result<bool>
    where
        Self::Item: PartialEq,
    {
        let mut skipped = false;
        while self.read_if(m)?.is_some() {
            skipped = true;
        }
        Ok(skipped)
    }

    /// move the head onto the first element, from the current one onwards, that matches
    ///
    /// The head does not move at all when the source runs out before a match is found
    fn skip_until(&mut self, m: &Match<'_, Self::Item>) -> anyhow::Result<bool>
    where
        Self::Item: PartialEq,
    {
        let mut offset = 0isize;
        loop {
            match self.peek(offset)? {
                Some(item) if m.matches(&item) => return self.move_by(offset),
                Some(_) => {
                    offset = offset
                        .checked_add(1)
                        .ok_or(CursorError::SeekOverflow)?;
                }
                None => return Ok(false),
            }
        }
    }
}

/// Line and column tracking on top of a character cursor.
pub trait Lines: Peek<Item = char> {
    /// 0-based line of the head
    fn line(&self) -> usize;

    /// 0-based column of the head
    fn column(&self) -> usize;

    /// Drain the rest of the source and return every character it ever produced.
    ///
    /// This defeats laziness: it pulls the source to exhaustion no matter where the head is. It is
    /// meant for diagnostics and error messages, not for use while scanning.
    fn text(&self) -> anyhow::Result<String>;

    fn is_start_of_line(&self) -> bool {
        self.column() == 0
    }
}
