use std::borrow::Cow;
use std::ops::Range;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn zero_width(at: usize) -> Self {
        Span { start: at, end: at }
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A token together with its span in the input string.
///
/// Most tokens borrow their text from the input. Tokens whose text had whitespace removed
/// (`\begin {matrix}`, `1 em`) or that were resolved through the symbol table own it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Token<'source> {
    text: Cow<'source, str>,
    span: Span,
}

impl<'source> Token<'source> {
    #[inline]
    pub fn new(text: impl Into<Cow<'source, str>>, span: Span) -> Self {
        Token {
            text: text.into(),
            span,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn into_text(self) -> Cow<'source, str> {
        self.text
    }

    /// Whether this token is a control sequence like `\alpha` or `\,`.
    #[inline]
    pub fn is_command(&self) -> bool {
        self.text.starts_with('\\')
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::{Span, Token};

    #[test]
    fn span_to_range() {
        let range: Range<usize> = Span::new(2, 7).into();
        assert_eq!(range, 2..7);
        assert_eq!(Span::zero_width(4).end(), 4);
    }

    #[test]
    fn command_tokens() {
        assert!(Token::new(r"\alpha", Span::default()).is_command());
        assert!(!Token::new("x", Span::default()).is_command());
    }
}
