//! Accumulating error container.
//!
//! Validation of a route map is total: every failing entry is collected and
//! reported together. `MultiError` is the value that carries those failures.
//! An empty `MultiError` stands for "no error".

use std::fmt;

/// Zero or more independent failures collected from unrelated checks.
///
/// Aggregates compose by flattening: appending one aggregate to another
/// yields a single flat list, never a nested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiError<E> {
    errors: Vec<E>,
}

impl<E> MultiError<E> {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one more failure.
    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    /// Fold every failure of `other` into this aggregate.
    pub fn append(&mut self, mut other: MultiError<E>) {
        self.errors.append(&mut other.errors);
    }

    /// Fold an aggregate of a narrower error type, converting each entry.
    pub fn absorb<F>(&mut self, other: MultiError<F>)
    where
        F: Into<E>,
    {
        self.errors.extend(other.errors.into_iter().map(Into::into));
    }

    /// Combine many aggregates into one flat aggregate.
    pub fn flatten<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = MultiError<E>>,
    {
        let mut combined = Self::new();
        for part in parts {
            combined.append(part);
        }
        combined
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.errors.iter()
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<E> {
        self.errors
    }

    /// `Ok(())` when nothing was collected, otherwise the aggregate itself.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl<E> Default for MultiError<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> From<E> for MultiError<E> {
    fn from(error: E) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl<E> From<Vec<E>> for MultiError<E> {
    fn from(errors: Vec<E>) -> Self {
        Self { errors }
    }
}

impl<E> FromIterator<E> for MultiError<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<E> Extend<E> for MultiError<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl<E> IntoIterator for MultiError<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a MultiError<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl<E: fmt::Display> fmt::Display for MultiError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no errors");
        }
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<E> std::error::Error for MultiError<E> where E: std::error::Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("boom {0}")]
    struct Boom(u32);

    #[derive(Debug, PartialEq, Eq, thiserror::Error)]
    enum Wide {
        #[error(transparent)]
        Boom(#[from] Boom),
    }

    #[test]
    fn empty_aggregate_is_no_error() {
        let errors: MultiError<Boom> = MultiError::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn flatten_of_empty_parts_is_empty() {
        let combined = MultiError::<Boom>::flatten(vec![MultiError::new(), MultiError::new()]);
        assert!(combined.is_empty());
        assert_eq!(combined, MultiError::default());
    }

    #[test]
    fn append_flattens_nested_aggregates() {
        let mut outer = MultiError::from(Boom(1));
        let inner: MultiError<Boom> = vec![Boom(2), Boom(3)].into();
        outer.append(inner);
        outer.append(MultiError::new());

        assert_eq!(outer.len(), 3);
        assert_eq!(outer.errors(), &[Boom(1), Boom(2), Boom(3)]);
    }

    #[test]
    fn absorb_converts_entries() {
        let mut wide: MultiError<Wide> = MultiError::new();
        wide.absorb(MultiError::from(Boom(7)));
        assert_eq!(wide.into_vec(), vec![Wide::Boom(Boom(7))]);
    }

    #[test]
    fn display_joins_entries() {
        let errors: MultiError<Boom> = [Boom(1), Boom(2)].into_iter().collect();
        assert_eq!(errors.to_string(), "boom 1; boom 2");
        assert_eq!(MultiError::<Boom>::new().to_string(), "no errors");
    }

    #[test]
    fn into_result_returns_collected_errors() {
        let mut errors = MultiError::new();
        errors.extend([Boom(4), Boom(5)]);
        let err = errors.into_result().expect_err("non-empty aggregate is an error");
        assert_eq!(err.iter().map(|e| e.0).collect::<Vec<_>>(), vec![4, 5]);
    }
}
