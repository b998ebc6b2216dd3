//! Accumulating validation.
//!
//! Checks are evaluated independently and every failure is kept, in the
//! order it was encountered. A successful result is only produced when no
//! check failed; otherwise the caller receives all errors at once.

use std::fmt;

/// A list with at least one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmpty<E> {
    head: E,
    tail: Vec<E>,
}

/// Either a valid value or every error that prevented it.
pub type Validated<T, E> = Result<T, NonEmpty<E>>;

impl<E> NonEmpty<E> {
    pub fn new(head: E) -> Self {
        Self {
            head,
            tail: Vec::new(),
        }
    }

    /// Returns `None` for an empty vector.
    pub fn from_vec(mut items: Vec<E>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let tail = items.split_off(1);
        let head = items.pop()?;
        Some(Self { head, tail })
    }

    pub fn head(&self) -> &E {
        &self.head
    }

    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    /// Always false; present so clippy's `len_without_is_empty` stays quiet.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn push(&mut self, item: E) {
        self.tail.push(item);
    }

    pub fn append(&mut self, other: NonEmpty<E>) {
        self.tail.push(other.head);
        self.tail.extend(other.tail);
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }

    pub fn into_vec(self) -> Vec<E> {
        let mut items = Vec::with_capacity(self.len());
        items.push(self.head);
        items.extend(self.tail);
        items
    }
}

impl<E> IntoIterator for NonEmpty<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<E: fmt::Display> fmt::Display for NonEmpty<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Combines three independent checks.
///
/// All three are always inspected. If any failed, the result carries every
/// failing check's error in argument order and the successful values are
/// discarded.
pub fn zip3<A, B, C, E, R>(
    a: Result<A, E>,
    b: Result<B, E>,
    c: Result<C, E>,
    f: impl FnOnce(A, B, C) -> R,
) -> Validated<R, E> {
    let ab = zip2(a.map_err(NonEmpty::new), b.map_err(NonEmpty::new));
    zip2(ab, c.map_err(NonEmpty::new)).map(|((a, b), c)| f(a, b, c))
}

/// Pairs two validated values, concatenating their errors when either failed.
pub fn zip2<A, B, E>(a: Validated<A, E>, b: Validated<B, E>) -> Validated<(A, B), E> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(mut first), Err(second)) => {
            first.append(second);
            Err(first)
        }
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors),
    }
}

/// Collects a list of independently validated items.
///
/// Returns every success when nothing failed, otherwise the concatenation of
/// every failure's errors in input order. Never a mix of the two.
pub fn collect_all<T, E, I>(items: I) -> Validated<Vec<T>, E>
where
    I: IntoIterator<Item = Validated<T, E>>,
{
    let mut values = Vec::new();
    let mut errors: Option<NonEmpty<E>> = None;

    for item in items {
        match item {
            Ok(value) if errors.is_none() => values.push(value),
            Ok(_) => {}
            Err(err) => match errors.as_mut() {
                Some(existing) => existing.append(err),
                None => errors = Some(err),
            },
        }
    }

    match errors {
        Some(errors) => Err(errors),
        None => Ok(values),
    }
}
