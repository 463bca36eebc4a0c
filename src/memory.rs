use std::{cell::RefCell, rc::Rc};

use crate::{config::Config, source::Source};

struct Memory<'src, T> {
    /// every element pulled so far, append only
    items: Vec<T>,

    /// `None` once the source has reported exhaustion
    source: Option<Box<dyn Source<Item = T> + 'src>>,

    config: Config,
}

/// Shared handle to the elements pulled from a [`Source`].
///
/// Cloning the handle shares the same memory, so growth triggered through any holder is visible
/// to every other holder. Entries are never removed or mutated once appended.
pub(crate) struct Buffer<'src, T> {
    inner: Rc<RefCell<Memory<'src, T>>>,
}

impl<T> Clone for Buffer<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Buffer<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for Buffer<'_, T> {}

impl<T: Clone> std::fmt::Debug for Buffer<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("exhausted", &self.is_exhausted())
            .finish_non_exhaustive()
    }
}

/// Functions implemented here borrow the shared memory and thus should be self contained.
///
/// Do not call other `Buffer::` functions while a borrow is held, the `RefCell` would panic
impl<'src, T: Clone> Buffer<'src, T> {
    pub(crate) fn new<S: Source<Item = T> + 'src>(source: S, config: Config) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Memory {
                items: Vec::new(),
                source: Some(Box::new(source)),
                config,
            })),
        }
    }

    /// record an element the caller already pulled from the source, `None` marks the source as
    /// exhausted without pulling again
    pub(crate) fn prime(&self, first: Option<T>) {
        let mut memory = self.inner.borrow_mut();
        match first {
            Some(item) => memory.items.push(item),
            None => Self::exhaust(&mut memory),
        }
    }

    /// get the number of elements pulled so far, the source may still hold more
    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.inner.borrow().source.is_none()
    }

    pub(crate) fn config(&self) -> Config {
        self.inner.borrow().config
    }

    pub(crate) fn get(&self, idx: usize) -> Option<T> {
        self.inner.borrow().items.get(idx).cloned()
    }

    /// returns whether `target` refers to a buffered element, pulling from the source until it
    /// does or the source runs out
    pub(crate) fn ensure_buffered(&self, target: usize) -> anyhow::Result<bool> {
        let mut memory = self.inner.borrow_mut();

        while memory.items.len() <= target {
            let Some(source) = memory.source.as_mut() else {
                break;
            };

            match source.pull()? {
                Some(item) => memory.items.push(item),
                None => Self::exhaust(&mut memory),
            }
        }

        Ok(target < memory.items.len())
    }

    /// pull everything left in the source, returning how many elements that added
    pub(crate) fn drain(&self) -> anyhow::Result<usize> {
        let mut memory = self.inner.borrow_mut();
        let before = memory.items.len();

        while let Some(source) = memory.source.as_mut() {
            match source.pull()? {
                Some(item) => memory.items.push(item),
                None => Self::exhaust(&mut memory),
            }
        }

        Ok(memory.items.len() - before)
    }

    /// run `f` over the buffered elements without cloning them
    pub(crate) fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    fn exhaust(memory: &mut Memory<'src, T>) {
        memory.source = None;
        if let Some(logger) = memory.config.logger {
            logger.debug(format_args!(
                "source exhausted after {} elements",
                memory.items.len()
            ));
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::{cell::Cell, rc::Rc};

    use super::Buffer;
    use crate::{config::Config, source::Source};

    /// source over a fixed list which counts how often it is pulled, and can be told to fail at a
    /// given position
    pub(crate) struct Counting<T> {
        items: Vec<T>,
        pos: usize,
        pulls: Rc<Cell<usize>>,
        fail_at: Option<usize>,
    }

    impl<T: Clone> Counting<T> {
        pub(crate) fn new(items: Vec<T>) -> (Self, Rc<Cell<usize>>) {
            let pulls = Rc::new(Cell::new(0));
            (
                Self {
                    items,
                    pos: 0,
                    pulls: Rc::clone(&pulls),
                    fail_at: None,
                },
                pulls,
            )
        }

        pub(crate) fn failing_at(mut self, pos: usize) -> Self {
            self.fail_at = Some(pos);
            self
        }
    }

    impl<T: Clone> Source for Counting<T> {
        type Item = T;

        fn pull(&mut self) -> anyhow::Result<Option<T>> {
            self.pulls.set(self.pulls.get() + 1);

            if self.fail_at == Some(self.pos) {
                self.fail_at = None;
                anyhow::bail!("source failed at {}", self.pos);
            }

            let item = self.items.get(self.pos).cloned();
            if item.is_some() {
                self.pos += 1;
            }
            Ok(item)
        }
    }

    #[test]
    fn ensure_buffered_is_lazy_and_idempotent() {
        let (source, pulls) = Counting::new(vec![1, 2, 3, 4]);
        let buffer = Buffer::new(source, Config::quiet());

        assert!(buffer.ensure_buffered(1).unwrap());
        assert_eq!(buffer.len(), 2);
        assert_eq!(pulls.get(), 2);

        assert!(buffer.ensure_buffered(0).unwrap());
        assert!(buffer.ensure_buffered(1).unwrap());
        assert_eq!(pulls.get(), 2, "Already buffered elements were pulled again");

        assert_eq!(buffer.get(0), Some(1));
        assert_eq!(buffer.get(1), Some(2));
        assert_eq!(buffer.get(2), None);
    }

    #[test]
    fn exhaustion_is_permanent() {
        let (source, pulls) = Counting::new(vec!['x']);
        let buffer = Buffer::new(source, Config::quiet());

        assert!(!buffer.ensure_buffered(5).unwrap());
        assert!(buffer.is_exhausted());
        assert_eq!(pulls.get(), 2);

        assert!(!buffer.ensure_buffered(5).unwrap());
        assert_eq!(pulls.get(), 2, "Exhausted source was pulled again");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn clones_share_growth() {
        let (source, _) = Counting::new(vec![10, 20, 30]);
        let buffer = Buffer::new(source, Config::quiet());
        let other = buffer.clone();

        assert!(other.ensure_buffered(2).unwrap());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(2), Some(30));
        assert!(buffer == other);
    }

    #[test]
    fn drain_reports_new_elements() {
        let (source, _) = Counting::new(vec![1, 2, 3]);
        let buffer = Buffer::new(source, Config::quiet());

        buffer.ensure_buffered(0).unwrap();
        assert_eq!(buffer.drain().unwrap(), 2);
        assert_eq!(buffer.drain().unwrap(), 0);
        assert_eq!(buffer.with_items(|items| items.to_vec()), vec![1, 2, 3]);
    }

    #[test]
    fn source_errors_propagate_and_keep_source() {
        let (source, _) = Counting::new(vec![1, 2, 3]);
        let buffer = Buffer::new(source.failing_at(1), Config::quiet());

        let err = buffer.ensure_buffered(2).expect_err("Source error was masked");
        assert_eq!(err.to_string(), "source failed at 1");
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_exhausted());

        assert!(buffer.ensure_buffered(2).unwrap());
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn prime_none_exhausts_without_pulling() {
        let (source, pulls) = Counting::new(vec![1]);
        let buffer = Buffer::new(source, Config::quiet());

        buffer.prime(None);

        assert!(buffer.is_exhausted());
        assert!(!buffer.ensure_buffered(0).unwrap());
        assert_eq!(pulls.get(), 0);
    }
}
