use unicode_id_start::{is_id_continue, is_id_start};

use crate::{
    matching::Match,
    traits::{Navigate, to_offset},
};

/// String-level reads for any cursor over characters.
///
/// Every read here is all-or-nothing like the element-level reads of [`Navigate`]: on a mismatch
/// the head does not move at all.
pub trait CharCursorExt: Navigate<Item = char> {
    /// test whether `pattern` starts at the head, without moving
    fn lookahead_match(&self, pattern: &str) -> anyhow::Result<bool>;

    /// consume `pattern` if it starts at the head, leaving the head on the character after it
    fn read_str(&mut self, pattern: &str) -> anyhow::Result<bool>;

    /// advance onto the last character of `pattern` if it starts right after the head
    fn read_next_str(&mut self, pattern: &str) -> anyhow::Result<bool>;

    /// [`Navigate::read_while`] collected into a [`String`]
    fn read_string_while(&mut self, m: &Match<'_, char>) -> anyhow::Result<String>;

    /// skip whitespace from the head onwards, returning whether any was skipped
    ///
    /// With `end_is_whitespace`, running into the end of the source also counts: an empty source,
    /// or a head left on trailing whitespace it cannot move past, returns `true`
    fn skip_whitespace(&mut self, end_is_whitespace: bool) -> anyhow::Result<bool>;

    /// consume an identifier starting at the head: `_` or a character with the `XID_Start`
    /// property, followed by any number of `XID_Continue` characters
    ///
    /// Like [`CharCursorExt::read_str`], the identifier is only consumed when the head can move
    /// past its last character. An identifier that ends the source returns `None` with the head
    /// unmoved, [`CharCursorExt::read_next_str`] or [`Navigate::read_next_while`] consume it
    fn read_identifier(&mut self) -> anyhow::Result<Option<String>>;
}

impl<C: Navigate<Item = char>> CharCursorExt for C {
    fn lookahead_match(&self, pattern: &str) -> anyhow::Result<bool> {
        let pattern = pattern.chars().collect::<Vec<_>>();
        self.matches_at(0, &pattern)
    }

    fn read_str(&mut self, pattern: &str) -> anyhow::Result<bool> {
        let pattern = pattern.chars().collect::<Vec<_>>();
        self.read_seq(&pattern)
    }

    fn read_next_str(&mut self, pattern: &str) -> anyhow::Result<bool> {
        let pattern = pattern.chars().collect::<Vec<_>>();
        self.read_next_seq(&pattern)
    }

    fn read_string_while(&mut self, m: &Match<'_, char>) -> anyhow::Result<String> {
        Ok(self.read_while(m)?.into_iter().collect())
    }

    fn skip_whitespace(&mut self, end_is_whitespace: bool) -> anyhow::Result<bool> {
        let whitespace = |c: &char| c.is_whitespace();

        if self.skip_while(&Match::Satisfies(&whitespace))? {
            return Ok(true);
        }

        if !end_is_whitespace {
            return Ok(false);
        }

        if self.source_is_empty() {
            return Ok(true);
        }

        Ok(self.peek(0)?.is_some_and(|c| c.is_whitespace()) && self.is_at_end()?)
    }

    fn read_identifier(&mut self) -> anyhow::Result<Option<String>> {
        let Some(first) = self.peek(0)? else {
            return Ok(None);
        };

        if first != '_' && !is_id_start(first) {
            return Ok(None);
        }

        let mut ident = String::from(first);
        let mut len = 1usize;

        while let Some(c) = self.peek(to_offset(len)?)? {
            if !is_id_continue(c) {
                break;
            }
            ident.push(c);
            len += 1;
        }

        Ok(self.move_by(to_offset(len)?)?.then_some(ident))
    }
}
