use thiserror::Error;

/// Contract violations raised by a cursor.
///
/// Ordinary navigation failure (moving or peeking past a boundary) is never an error, it is
/// reported through `false`/`None`. These variants cover misuse only, and reach the caller
/// wrapped in an [`anyhow::Error`] so they can be recovered with `downcast_ref`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("Cursor has no current element, the source was empty at construction")]
    EmptySource,

    #[error("Cannot match a zero-length pattern")]
    ZeroLengthMatch,

    #[error("Cannot execute seek, would overflow position")]
    SeekOverflow,

    #[error("Location line and column do not fit the text under this cursor")]
    LocationMismatch,
}

#[cfg(test)]
mod test {
    use super::CursorError;

    #[test]
    fn survives_anyhow_round_trip() {
        let err: anyhow::Error = CursorError::ZeroLengthMatch.into();

        assert_eq!(
            err.downcast_ref::<CursorError>(),
            Some(&CursorError::ZeroLengthMatch)
        );
        assert_eq!(err.to_string(), "Cannot match a zero-length pattern");
    }
}
