//! Text rendering of edit scripts.

use std::fmt::Display;
use std::io::{self, Write};

use crate::error::Result;
use crate::handler::DiffHandler;
use crate::operator::Operator;

/// Writes one line per operation: the operator symbol followed by the token.
///
/// ```text
/// =<p>
/// -old
/// +new
/// =</p>
/// ```
///
/// Handlers cannot fail, so the first write error is kept and returned by
/// [`ShortFormatter::finish`]; later operations are dropped.
pub struct ShortFormatter<W: Write> {
    out: W,
    error: Option<io::Error>,
    matches: bool,
}

impl<W: Write> ShortFormatter<W> {
    pub fn new(out: W) -> Self {
        ShortFormatter {
            out,
            error: None,
            matches: true,
        }
    }

    /// Whether matched tokens are written; edits are always written.
    pub fn show_matches(mut self, matches: bool) -> Self {
        self.matches = matches;
        self
    }

    /// Flushes the writer and hands it back.
    pub fn finish(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<T: Display + ?Sized, W: Write> DiffHandler<T> for ShortFormatter<W> {
    fn handle(&mut self, operator: Operator, token: &T) {
        if self.error.is_some() || (operator == Operator::Match && !self.matches) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}{}", operator, token) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlToken;

    #[test]
    fn test_lines() {
        let mut formatter = ShortFormatter::new(Vec::new());
        formatter.handle(Operator::Match, &XmlToken::start("p"));
        formatter.handle(Operator::Delete, &XmlToken::text("old"));
        formatter.handle(Operator::Insert, &XmlToken::text("new"));
        formatter.handle(Operator::Match, &XmlToken::end("p"));
        let out = String::from_utf8(formatter.finish().unwrap()).unwrap();
        assert_eq!(out, "=<p>\n-old\n+new\n=</p>\n");
    }

    #[test]
    fn test_hide_matches() {
        let mut formatter = ShortFormatter::new(Vec::new()).show_matches(false);
        formatter.handle(Operator::Match, "same");
        formatter.handle(Operator::Insert, "added");
        let out = String::from_utf8(formatter.finish().unwrap()).unwrap();
        assert_eq!(out, "+added\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_first_error_kept() {
        let mut formatter = ShortFormatter::new(Broken);
        DiffHandler::<str>::handle(&mut formatter, Operator::Insert, "x");
        assert!(formatter.finish().is_err());
    }
}
