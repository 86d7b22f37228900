use std::borrow::Cow;

use crate::commands::{BEGIN, CAPTURE_COMMANDS, END, FRAC_SHORTHAND, OPERATORNAME, UNITS};
use crate::symbols;
use crate::token::{Span, Token};

/// Splits LaTeX source into tokens.
///
/// The lexer never fails: anything it does not recognize becomes a single-character token.
/// Comments (`%` up to the end of the line) are dropped when `skip_comments` is set and kept as
/// one token otherwise.
pub fn tokenize(input: &str, skip_comments: bool) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(input, skip_comments);
    let mut tokens = Vec::new();
    while lexer.next_tokens(&mut tokens) {}
    tokens
}

struct Lexer<'source> {
    input: &'source str,
    pos: usize,
    skip_comments: bool,
}

impl<'source> Lexer<'source> {
    fn new(input: &'source str, skip_comments: bool) -> Self {
        Lexer {
            input,
            pos: 0,
            skip_comments,
        }
    }

    #[inline]
    fn peek_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    #[inline]
    fn slice(&self, start: usize, end: usize) -> &'source str {
        self.input.get(start..end).unwrap_or_default()
    }

    fn skip_whitespace_from(&self, mut pos: usize) -> usize {
        while self.byte_at(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        pos
    }

    fn push_borrowed(&self, tokens: &mut Vec<Token<'source>>, start: usize, end: usize) {
        tokens.push(Token::new(self.slice(start, end), Span::new(start, end)));
    }

    /// Lexes the next piece of input, which may produce more than one token.
    ///
    /// Returns `false` once the input is exhausted.
    fn next_tokens(&mut self, tokens: &mut Vec<Token<'source>>) -> bool {
        self.pos = self.skip_whitespace_from(self.pos);
        let start = self.pos;
        let Some(ch) = self.peek_at(start) else {
            return false;
        };
        match ch {
            '%' => {
                let end = memchr::memchr(b'\n', &self.input.as_bytes()[start..])
                    .map_or(self.input.len(), |offset| start + offset);
                if !self.skip_comments {
                    self.push_borrowed(tokens, start, end);
                }
                self.pos = end;
            }
            '_' | '^' if self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) => {
                self.push_borrowed(tokens, start, start + 1);
                self.push_borrowed(tokens, start + 1, start + 2);
                self.pos = start + 2;
            }
            '-' | '0'..='9' => {
                if let Some((end, dimension)) = self.read_dimension(start) {
                    tokens.push(Token::new(dimension, Span::new(start, end)));
                    self.pos = end;
                } else if ch == '-' {
                    self.push_borrowed(tokens, start, start + 1);
                    self.pos = start + 1;
                } else {
                    let end = self.read_number(start);
                    self.push_borrowed(tokens, start, end);
                    self.pos = end;
                }
            }
            '.' => {
                let mut end = start + 1;
                while self.byte_at(end).is_some_and(|b| b.is_ascii_digit()) {
                    end += 1;
                }
                self.push_borrowed(tokens, start, end);
                self.pos = end;
            }
            '\\' => self.read_backslash(tokens, start),
            _ => {
                let end = start + ch.len_utf8();
                self.push_borrowed(tokens, start, end);
                self.pos = end;
            }
        }
        true
    }

    /// Reads `\d+(\.\d+)?` and returns the end position.
    fn read_number(&self, start: usize) -> usize {
        let mut end = start;
        while self.byte_at(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
        }
        if self.byte_at(end) == Some(b'.')
            && self.byte_at(end + 1).is_some_and(|b| b.is_ascii_digit())
        {
            end += 1;
            while self.byte_at(end).is_some_and(|b| b.is_ascii_digit()) {
                end += 1;
            }
        }
        end
    }

    /// Reads a signed number followed by a unit, like `-1.5 em`.
    ///
    /// Whitespace between the number and the unit is removed from the token.
    fn read_dimension(&self, start: usize) -> Option<(usize, Cow<'source, str>)> {
        let number_start = if self.byte_at(start) == Some(b'-') {
            start + 1
        } else {
            start
        };
        if !self.byte_at(number_start).is_some_and(|b| b.is_ascii_digit()) {
            return None;
        }
        let number_end = self.read_number(number_start);
        let unit_start = self.skip_whitespace_from(number_end);
        let rest = self.input.get(unit_start..)?;
        let unit = UNITS.iter().find(|unit| rest.starts_with(**unit))?;
        let end = unit_start + unit.len();
        let dimension = if unit_start == number_end {
            Cow::Borrowed(self.slice(start, end))
        } else {
            Cow::Owned(format!("{}{}", self.slice(start, number_end), unit))
        };
        Some((end, dimension))
    }

    fn read_backslash(&mut self, tokens: &mut Vec<Token<'source>>, start: usize) {
        let Some(next) = self.peek_at(start + 1) else {
            // A lone backslash at the end of the input.
            self.push_borrowed(tokens, start, start + 1);
            self.pos = start + 1;
            return;
        };
        if next.is_ascii_whitespace() {
            tokens.push(Token::new(r"\ ", Span::new(start, start + 2)));
            self.pos = start + 2;
            return;
        }
        if matches!(
            next,
            '\\' | '[' | ']' | '{' | '}' | '!' | ',' | ':' | '>' | ';' | '|' | '_' | '%' | '#'
                | '$' | '&'
        ) {
            self.push_borrowed(tokens, start, start + 2);
            self.pos = start + 2;
            return;
        }
        if !next.is_ascii_alphabetic() {
            // The backslash and the character after it become separate tokens.
            self.push_borrowed(tokens, start, start + 1);
            self.pos = start + 1;
            return;
        }

        let mut name_end = start + 1;
        while self.byte_at(name_end).is_some_and(|b| b.is_ascii_alphabetic()) {
            name_end += 1;
        }
        let command = self.slice(start, name_end);
        self.pos = name_end;

        if (command == BEGIN || command == END) && self.read_environment(tokens, start, command) {
            return;
        }
        if command == OPERATORNAME && self.read_operatorname(tokens, start) {
            return;
        }
        if CAPTURE_COMMANDS.contains(command) && self.read_capture(tokens, start, command) {
            return;
        }
        if FRAC_SHORTHAND.contains(command) && self.read_frac_shorthand(tokens, start, command) {
            return;
        }
        if self.read_math_letter(tokens, start, command) {
            return;
        }
        self.push_borrowed(tokens, start, name_end);
    }

    /// `\begin{name}` or `\end{name*}`, with whitespace around the name removed.
    fn read_environment(
        &mut self,
        tokens: &mut Vec<Token<'source>>,
        start: usize,
        command: &str,
    ) -> bool {
        let open = self.skip_whitespace_from(self.pos);
        if self.byte_at(open) != Some(b'{') {
            return false;
        }
        let name_start = open + 1;
        let mut name_end = name_start;
        while self.byte_at(name_end).is_some_and(|b| b.is_ascii_alphabetic()) {
            name_end += 1;
        }
        if name_end == name_start {
            return false;
        }
        if self.byte_at(name_end) == Some(b'*') {
            name_end += 1;
        }
        if self.byte_at(name_end) != Some(b'}') {
            return false;
        }
        let end = name_end + 1;
        let text = if open == self.pos {
            Cow::Borrowed(self.slice(start, end))
        } else {
            Cow::Owned(format!("{command}{{{}}}", self.slice(name_start, name_end)))
        };
        tokens.push(Token::new(text, Span::new(start, end)));
        self.pos = end;
        true
    }

    /// `\operatorname{name}`, also in the starred form. Whitespace inside the braces is removed.
    fn read_operatorname(&mut self, tokens: &mut Vec<Token<'source>>, start: usize) -> bool {
        let mut open = self.pos;
        if self.byte_at(open) == Some(b'*') {
            open += 1;
        }
        let open = self.skip_whitespace_from(open);
        if self.byte_at(open) != Some(b'{') {
            return false;
        }
        let mut close = open + 1;
        while self
            .byte_at(close)
            .is_some_and(|b| b.is_ascii_alphabetic() || b.is_ascii_whitespace() || b == b'*')
        {
            close += 1;
        }
        if self.byte_at(close) != Some(b'}') {
            return false;
        }
        let name: String = self
            .slice(open + 1, close)
            .chars()
            .filter(|ch| !ch.is_ascii_whitespace())
            .collect();
        if name.is_empty() {
            return false;
        }
        let end = close + 1;
        tokens.push(Token::new(
            format!("{OPERATORNAME}{{{name}}}"),
            Span::new(start, end),
        ));
        self.pos = end;
        true
    }

    /// Commands like `\text{...}` whose argument is taken verbatim up to the first `}`.
    ///
    /// Braces inside the argument are not balanced.
    fn read_capture(
        &mut self,
        tokens: &mut Vec<Token<'source>>,
        start: usize,
        command: &'source str,
    ) -> bool {
        let open = self.skip_whitespace_from(self.pos);
        if self.byte_at(open) != Some(b'{') {
            return false;
        }
        let Some(offset) = memchr::memchr(b'}', &self.input.as_bytes()[open + 1..]) else {
            return false;
        };
        let close = open + 1 + offset;
        tokens.push(Token::new(command, Span::new(start, start + command.len())));
        self.push_borrowed(tokens, open + 1, close);
        self.pos = close + 1;
        true
    }

    /// `\frac12` and friends: up to two single-digit (or `.`) arguments without braces.
    fn read_frac_shorthand(
        &mut self,
        tokens: &mut Vec<Token<'source>>,
        start: usize,
        command: &'source str,
    ) -> bool {
        let is_arg = |b: u8| b.is_ascii_digit() || b == b'.';
        let first = self.skip_whitespace_from(self.pos);
        if !self.byte_at(first).is_some_and(is_arg) {
            return false;
        }
        tokens.push(Token::new(command, Span::new(start, start + command.len())));
        self.push_borrowed(tokens, first, first + 1);
        let second = self.skip_whitespace_from(first + 1);
        if self.byte_at(second).is_some_and(is_arg) {
            self.push_borrowed(tokens, second, second + 1);
            self.pos = second + 1;
        } else {
            self.pos = second;
        }
        true
    }

    /// `\mathbb{R}` and similar: a font command applied to one letter.
    ///
    /// If the symbol table knows the combination, it becomes a single numeric character
    /// reference token. Otherwise the four pieces are emitted as separate tokens.
    fn read_math_letter(
        &mut self,
        tokens: &mut Vec<Token<'source>>,
        start: usize,
        command: &'source str,
    ) -> bool {
        let Some(font) = command.strip_prefix(r"\math") else {
            return false;
        };
        if font.is_empty() || !font.bytes().all(|b| b.is_ascii_lowercase()) {
            return false;
        }
        let open = self.pos;
        if self.byte_at(open) != Some(b'{')
            || !self.byte_at(open + 1).is_some_and(|b| b.is_ascii_alphabetic())
            || self.byte_at(open + 2) != Some(b'}')
        {
            return false;
        }
        let end = open + 3;
        if let Some(code) = symbols::convert_symbol(self.slice(start, end)) {
            tokens.push(Token::new(format!("&#x{code};"), Span::new(start, end)));
        } else {
            self.push_borrowed(tokens, start, open);
            for pos in open..end {
                self.push_borrowed(tokens, pos, pos + 1);
            }
        }
        self.pos = end;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input, true)
            .iter()
            .map(|tok| tok.as_str().to_string())
            .collect()
    }

    #[test]
    fn single_backslash() {
        assert_eq!(texts("\\"), vec!["\\"]);
    }

    #[test]
    fn letters_are_separate() {
        assert_eq!(texts("abC"), vec!["a", "b", "C"]);
    }

    #[test]
    fn numbers() {
        assert_eq!(texts("1234567890"), vec!["1234567890"]);
        assert_eq!(texts("12.56"), vec!["12.56"]);
        assert_eq!(texts("5.8x"), vec!["5.8", "x"]);
        assert_eq!(texts("3 x"), vec!["3", "x"]);
    }

    #[test]
    fn backslashes_after_numbers() {
        assert_eq!(texts("123\\"), vec!["123", "\\"]);
        assert_eq!(texts("123\\\\"), vec!["123", "\\\\"]);
        assert_eq!(texts("12.\\\\"), vec!["12", ".", "\\\\"]);
    }

    #[test]
    fn operators() {
        assert_eq!(
            texts("+-*/=()[]_^{}"),
            vec!["+", "-", "*", "/", "=", "(", ")", "[", "]", "_", "^", "{", "}"]
        );
        assert_eq!(
            texts("3 + 5x - 5y = 7"),
            vec!["3", "+", "5", "x", "-", "5", "y", "=", "7"]
        );
    }

    #[test]
    fn commands() {
        assert_eq!(texts(r"\alpha\beta"), vec![r"\alpha", r"\beta"]);
        assert_eq!(
            texts(r"\max \{a, b\}"),
            vec![r"\max", r"\{", "a", ",", "b", r"\}"]
        );
    }

    #[test]
    fn frac_shorthand() {
        assert_eq!(texts(r"\frac2x"), vec![r"\frac", "2", "x"]);
        assert_eq!(texts(r"\dfrac 1 2"), vec![r"\dfrac", "1", "2"]);
        assert_eq!(texts(r"\frac{1}{2}"), vec![r"\frac", "{", "1", "}", "{", "2", "}"]);
    }

    #[test]
    fn environments() {
        assert_eq!(
            texts(r"\begin{matrix*}[r]a & b \\ c \end{matrix*}"),
            vec![
                r"\begin{matrix*}",
                "[",
                "r",
                "]",
                "a",
                "&",
                "b",
                r"\\",
                "c",
                r"\end{matrix*}"
            ]
        );
        assert_eq!(
            texts(r"\begin {cases} \end {cases}"),
            vec![r"\begin{cases}", r"\end{cases}"]
        );
    }

    #[test]
    fn scripts_with_single_digit() {
        assert_eq!(
            texts("a^{i+1}_3"),
            vec!["a", "^", "{", "i", "+", "1", "}", "_", "3"]
        );
        assert_eq!(texts("x^23"), vec!["x", "^", "2", "3"]);
    }

    #[test]
    fn math_font_letter() {
        assert_eq!(texts(r"\mathbb{R}"), vec!["&#x0211D;"]);
        assert_eq!(texts(r"\mathrm{d}"), vec![r"\mathrm", "{", "d", "}"]);
        assert_eq!(
            texts(r"\mathrm{...}"),
            vec![r"\mathrm", "{", ".", ".", ".", "}"]
        );
    }

    #[test]
    fn operatorname() {
        assert_eq!(texts(r"\operatorname{sn}x"), vec![r"\operatorname{sn}", "x"]);
        assert_eq!(
            texts(r"\operatorname { s n } x"),
            vec![r"\operatorname{sn}", "x"]
        );
        assert_eq!(
            texts(r"\operatorname*{argmax}"),
            vec![r"\operatorname{argmax}"]
        );
    }

    #[test]
    fn capture_commands() {
        assert_eq!(
            texts(r"\text{Let}\ x=\text{number of cats}."),
            vec![r"\text", "Let", r"\ ", "x", "=", r"\text", "number of cats", "."]
        );
        assert_eq!(texts(r"\fbox{E=mc^2}"), vec![r"\fbox", "E=mc^2"]);
        assert_eq!(texts(r"\color{}ab"), vec![r"\color", "", "a", "b"]);
        assert_eq!(texts(r"\textstyle x"), vec![r"\textstyle", "x"]);
    }

    #[test]
    fn dimensions() {
        assert_eq!(texts(r"\hspace{1 em}"), vec![r"\hspace", "{", "1em", "}"]);
        assert_eq!(texts("-0.5pt"), vec!["-0.5pt"]);
        assert_eq!(texts("-a"), vec!["-", "a"]);
    }

    #[test]
    fn comments() {
        assert_eq!(
            texts("% this is hidden\n100\\%! 100% this is hidden, too\n\\test% this is another hidden line"),
            vec!["100", r"\%", "!", "100", r"\test"]
        );
        let kept: Vec<_> = tokenize("a % note\nb", false)
            .iter()
            .map(|tok| tok.as_str().to_string())
            .collect();
        assert_eq!(kept, vec!["a", "% note", "b"]);
    }

    #[test]
    fn spans_point_into_input() {
        let tokens = tokenize(r"a + \beta", true);
        let spans: Vec<_> = tokens
            .iter()
            .map(|tok| (tok.span().start(), tok.span().end()))
            .collect();
        assert_eq!(spans, vec![(0, 1), (2, 3), (4, 9)]);
    }
}
