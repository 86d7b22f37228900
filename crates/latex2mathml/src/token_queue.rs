use crate::token::{Span, Token};

/// A cursor over the token sequence with one token of lookahead.
pub(crate) struct TokenQueue<'source> {
    tokens: Vec<Token<'source>>,
    pos: usize,
    input_len: usize,
}

impl<'source> TokenQueue<'source> {
    pub(crate) fn new(tokens: Vec<Token<'source>>, input_len: usize) -> Self {
        TokenQueue {
            tokens,
            pos: 0,
            input_len,
        }
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.pos)
    }

    #[inline]
    pub(crate) fn peek_is(&self, text: &str) -> bool {
        self.peek().is_some_and(|tok| tok.as_str() == text)
    }

    /// Takes the next token out of the queue.
    pub(crate) fn next(&mut self) -> Option<Token<'source>> {
        let tok = self.tokens.get_mut(self.pos).map(std::mem::take)?;
        self.pos += 1;
        Some(tok)
    }

    #[inline]
    pub(crate) fn is_eoi(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The span of the next token, or an empty span at the end of the input.
    pub(crate) fn next_span(&self) -> Span {
        self.peek()
            .map_or(Span::zero_width(self.input_len), Token::span)
    }
}
