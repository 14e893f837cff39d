//! Depth-aware common prefix and suffix removal for structured tokens.
//!
//! A cut is only made where at most one element is left open (depth 0 or 1),
//! so the sliced ends can be matched around a middle that still nests
//! properly. If a depth-1 cut would leave either middle unbalanced, the
//! slicer retries with depth-0 cuts only, and gives up if that fails too.

use super::token::StructuredToken;
use crate::equality::Equality;
use crate::slice::Affixes;

/// Computes structural affixes for two token sequences.
pub struct TokenSlicer<'a, T, E: ?Sized> {
    from: &'a [T],
    to: &'a [T],
    eq: &'a E,
}

impl<'a, T, E> TokenSlicer<'a, T, E>
where
    T: StructuredToken,
    E: Equality<T> + ?Sized,
{
    pub fn new(from: &'a [T], to: &'a [T], eq: &'a E) -> Self {
        TokenSlicer { from, to, eq }
    }

    /// Finds the largest safe prefix and suffix.
    pub fn analyze(&self) -> Affixes {
        for max_depth in [1, 0] {
            let prefix = self.prefix(max_depth);
            let suffix = self.suffix(prefix, max_depth);
            let affixes = Affixes::new(prefix, suffix);
            if affixes.is_empty() {
                return affixes;
            }
            if is_balanced(affixes.middle(self.from)) && is_balanced(affixes.middle(self.to)) {
                return affixes;
            }
            tracing::trace!(max_depth, "slice leaves an unbalanced middle, retrying");
        }
        Affixes::default()
    }

    fn prefix(&self, max_depth: isize) -> usize {
        let mut depth = 0isize;
        let mut cut = 0;
        for (count, (a, b)) in self.from.iter().zip(self.to).enumerate() {
            if !self.eq.equals(a, b) {
                break;
            }
            if a.is_start() {
                depth += 1;
            } else if a.is_end() {
                depth -= 1;
            }
            if (0..=max_depth).contains(&depth) {
                cut = count + 1;
            }
        }
        cut
    }

    fn suffix(&self, prefix: usize, max_depth: isize) -> usize {
        let mut depth = 0isize;
        let mut cut = 0;
        let from = &self.from[prefix..];
        let to = &self.to[prefix..];
        for (count, (a, b)) in from.iter().rev().zip(to.iter().rev()).enumerate() {
            if !self.eq.equals(a, b) {
                break;
            }
            if a.is_end() {
                depth += 1;
            } else if a.is_start() {
                depth -= 1;
            }
            if (0..=max_depth).contains(&depth) {
                cut = count + 1;
            }
        }
        cut
    }
}

/// Whether every end marker closes the innermost open start marker and
/// nothing is left open.
pub fn is_balanced<T: StructuredToken>(tokens: &[T]) -> bool {
    let mut open: Vec<&T> = Vec::new();
    for token in tokens {
        if token.is_start() {
            open.push(token);
        } else if token.is_end() {
            match open.pop() {
                Some(start) if token.closes(start) => {}
                _ => return false,
            }
        }
    }
    open.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::DefaultEquality;
    use crate::xml::XmlToken;

    fn doc(body: &[XmlToken]) -> Vec<XmlToken> {
        let mut tokens = vec![XmlToken::start("root")];
        tokens.extend_from_slice(body);
        tokens.push(XmlToken::end("root"));
        tokens
    }

    #[test]
    fn test_cut_inside_root() {
        let from = doc(&[XmlToken::text("a")]);
        let to = doc(&[XmlToken::text("b")]);
        let affixes = TokenSlicer::new(&from, &to, &DefaultEquality).analyze();
        assert_eq!(affixes, Affixes::new(1, 1));
    }

    #[test]
    fn test_no_cut_below_depth_one() {
        let from = doc(&[XmlToken::start("p"), XmlToken::text("a"), XmlToken::end("p")]);
        let to = doc(&[XmlToken::start("p"), XmlToken::text("b"), XmlToken::end("p")]);
        let affixes = TokenSlicer::new(&from, &to, &DefaultEquality).analyze();
        // <root> can go but <p> would leave two elements open
        assert_eq!(affixes, Affixes::new(1, 1));
    }

    #[test]
    fn test_unbalanced_middle_falls_back() {
        let from = vec![
            XmlToken::start("a"),
            XmlToken::text("x"),
            XmlToken::end("a"),
            XmlToken::start("a"),
            XmlToken::text("y"),
            XmlToken::end("a"),
        ];
        let to = vec![XmlToken::start("a"), XmlToken::text("z"), XmlToken::end("a")];
        let affixes = TokenSlicer::new(&from, &to, &DefaultEquality).analyze();
        assert!(is_balanced(affixes.middle(&from)));
        assert!(is_balanced(affixes.middle(&to)));
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced(&doc(&[])));
        assert!(!is_balanced(&[XmlToken::end("a")]));
        assert!(!is_balanced(&[XmlToken::start("a")]));
        assert!(!is_balanced(&[XmlToken::start("a"), XmlToken::end("b")]));
    }
}
