//! Pluggable token equivalence.
//!
//! Algorithms never compare tokens with `==` directly; they go through an
//! [`Equality`] so that "sameness" can differ from structural identity.

/// An equivalence relation over tokens.
pub trait Equality<T: ?Sized> {
    /// Returns true if `a` and `b` should be treated as the same token.
    fn equals(&self, a: &T, b: &T) -> bool;
}

/// Value equality through `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<T: PartialEq + ?Sized> Equality<T> for DefaultEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// ASCII case-insensitive equality for string-like tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAsciiCase;

impl<T: AsRef<str> + ?Sized> Equality<T> for IgnoreAsciiCase {
    fn equals(&self, a: &T, b: &T) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }
}

impl<T: ?Sized, F> Equality<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
