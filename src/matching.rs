/// What a single element must look like for a read to consume it
pub enum Match<'m, T> {
    /// equal to the given value
    Exact(T),
    /// equal to any value in the set, an empty set never matches
    OneOf(&'m [T]),
    /// accepted by the predicate
    Satisfies(&'m dyn Fn(&T) -> bool),
}

impl<T: PartialEq> Match<'_, T> {
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Match::Exact(v) => v == item,
            Match::OneOf(set) => set.contains(item),
            Match::Satisfies(pred) => pred(item),
        }
    }
}

impl<T> From<T> for Match<'_, T> {
    fn from(value: T) -> Self {
        Match::Exact(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Match<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Match::Exact(v) => f.debug_tuple("Exact").field(v).finish(),
            Match::OneOf(set) => f.debug_tuple("OneOf").field(set).finish(),
            Match::Satisfies(_) => f.debug_tuple("Satisfies").finish_non_exhaustive(),
        }
    }
}
