/// A forward-only, single-pass producer of elements.
///
/// Each element is pulled at most once. `Ok(None)` means the source is exhausted, and the buffer
/// feeding a cursor will never call [`Source::pull`] again after seeing it. Errors are handed to
/// whoever triggered the pull without being retried or masked.
pub trait Source {
    type Item;

    fn pull(&mut self) -> anyhow::Result<Option<Self::Item>>;
}

/// Adapts an infallible [`Iterator`] as a [`Source`]
#[derive(Debug, Clone)]
pub struct Elements<I> {
    inner: I,
}

impl<I: Iterator> Elements<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Iterator> Source for Elements<I> {
    type Item = I::Item;

    fn pull(&mut self) -> anyhow::Result<Option<Self::Item>> {
        Ok(self.inner.next())
    }
}

/// Adapts an [`Iterator`] of results as a [`Source`], errors are converted into
/// [`anyhow::Error`] and passed through unchanged otherwise
#[derive(Debug, Clone)]
pub struct Fallible<I> {
    inner: I,
}

impl<I> Fallible<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<T, E, I> Source for Fallible<I>
where
    I: Iterator<Item = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    type Item = T;

    fn pull(&mut self) -> anyhow::Result<Option<Self::Item>> {
        self.inner.next().transpose().map_err(Into::into)
    }
}
