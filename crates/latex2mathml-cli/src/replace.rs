use std::fmt;

use memchr::memmem::Finder;

use latex2mathml::{LatexError, MathDisplay};

/// A failure while replacing formulas in a document; the position is a byte offset into it.
#[derive(Debug)]
pub struct ConversionError<'source>(pub usize, pub ConvErrKind, pub &'source str);

#[derive(Debug)]
pub enum ConvErrKind {
    UnclosedDelimiter,
    NestedDelimiters,
    MismatchedDelimiters(usize),
    /// The formula failed to convert; the second field is its LaTeX source.
    LatexError(Box<LatexError>, String),
}

impl fmt::Display for ConversionError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (line, col) = line_and_col(self.0, self.2);
        match &self.1 {
            ConvErrKind::UnclosedDelimiter => {
                write!(f, "Unclosed delimiter on line {line}, column {col}.")
            }
            ConvErrKind::NestedDelimiters => {
                write!(
                    f,
                    "Nested delimiters are not allowed (on line {line}, column {col})."
                )
            }
            ConvErrKind::MismatchedDelimiters(close) => {
                let (close_line, close_col) = line_and_col(*close, self.2);
                write!(
                    f,
                    "Mismatched delimiters: opening at line {line}, column {col}, closing at line {close_line}, column {close_col}."
                )
            }
            ConvErrKind::LatexError(err, latex) => {
                write!(
                    f,
                    "Error at line {line}, column {col} in '{latex}':\n{}",
                    err.error_message()
                )
            }
        }
    }
}

impl std::error::Error for ConversionError<'_> {}

/// Determine line and column numbers of `loc` within the input string.
fn line_and_col(loc: usize, input: &str) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in input.char_indices() {
        if i >= loc {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Finds formulas between inline and block delimiters and replaces them.
pub struct Replacer<'args> {
    opening_finders: (Finder<'args>, Finder<'args>),
    closing_finders: (Finder<'args>, Finder<'args>),
    opening_lengths: (usize, usize),
    closing_lengths: (usize, usize),
    closing_identical: bool,
    ignore_escaped_delim: bool,
    continue_on_error: bool,
}

impl<'args> Replacer<'args> {
    pub fn new(
        inline_delim: (&'args str, &'args str),
        block_delim: (&'args str, &'args str),
        ignore_escaped_delim: bool,
        continue_on_error: bool,
    ) -> Self {
        Self {
            opening_finders: (Finder::new(inline_delim.0), Finder::new(block_delim.0)),
            closing_finders: (Finder::new(inline_delim.1), Finder::new(block_delim.1)),
            opening_lengths: (inline_delim.0.len(), block_delim.0.len()),
            closing_lengths: (inline_delim.1.len(), block_delim.1.len()),
            closing_identical: inline_delim.1 == block_delim.1,
            ignore_escaped_delim,
            continue_on_error,
        }
    }

    /// Replaces the content of inline and block math delimiters with the output of `f`.
    ///
    /// Delimiters must not be nested. With `continue_on_error`, a formula that fails to convert is
    /// kept as it was, delimiters included.
    pub fn replace<'source, F>(
        &self,
        input: &'source str,
        mut f: F,
    ) -> Result<String, ConversionError<'source>>
    where
        F: FnMut(&mut String, &str, MathDisplay) -> Result<(), Box<LatexError>>,
    {
        let mut result = String::with_capacity(input.len());
        let mut current_pos = 0;

        while current_pos < input.len() {
            let remaining = &input[current_pos..];
            let Some((open_typ, idx)) = self.find_next_delimiter(remaining, true) else {
                result.push_str(remaining);
                break;
            };
            let opening_delim_len = match open_typ {
                MathDisplay::Inline => self.opening_lengths.0,
                MathDisplay::Block => self.opening_lengths.1,
            };

            let open_pos = current_pos + idx;
            result.push_str(&input[current_pos..open_pos]);
            let start = open_pos + opening_delim_len;

            let Some((close_typ, idx)) = self.find_next_delimiter(&input[start..], false) else {
                return Err(ConversionError(
                    open_pos,
                    ConvErrKind::UnclosedDelimiter,
                    input,
                ));
            };
            let closing_delim_len = match close_typ {
                MathDisplay::Inline => self.closing_lengths.0,
                MathDisplay::Block => self.closing_lengths.1,
            };
            if !self.closing_identical && open_typ != close_typ {
                return Err(ConversionError(
                    open_pos,
                    ConvErrKind::MismatchedDelimiters(start + idx),
                    input,
                ));
            }

            let end = start + idx;
            let content = &input[start..end];
            if let Some((_, idx)) = self.find_next_delimiter(content, true) {
                return Err(ConversionError(
                    start + idx,
                    ConvErrKind::NestedDelimiters,
                    input,
                ));
            }

            let mut converted = String::new();
            match f(&mut converted, content, open_typ) {
                Ok(()) => result.push_str(&converted),
                Err(_) if self.continue_on_error => {
                    result.push_str(&input[open_pos..end + closing_delim_len]);
                }
                Err(err) => {
                    return Err(ConversionError(
                        start,
                        ConvErrKind::LatexError(err, content.to_string()),
                        input,
                    ));
                }
            }
            current_pos = end + closing_delim_len;
        }

        Ok(result)
    }

    /// Finds the next inline or block delimiter. Block delimiters win ties.
    fn find_next_delimiter(&self, input: &str, opening: bool) -> Option<(MathDisplay, usize)> {
        let input = input.as_bytes();
        let (finders, lengths) = if opening {
            (&self.opening_finders, self.opening_lengths)
        } else {
            (&self.closing_finders, self.closing_lengths)
        };
        let inline_result = self.find_delimiter_position(input, &finders.0, lengths.0);
        let block_result = self.find_delimiter_position(input, &finders.1, lengths.1);

        match (inline_result, block_result) {
            (Some(inline_pos), Some(block_pos)) => {
                if block_pos <= inline_pos {
                    Some((MathDisplay::Block, block_pos))
                } else {
                    Some((MathDisplay::Inline, inline_pos))
                }
            }
            (Some(pos), None) => Some((MathDisplay::Inline, pos)),
            (None, Some(pos)) => Some((MathDisplay::Block, pos)),
            (None, None) => None,
        }
    }

    /// Finds the next delimiter that is not preceded by a backslash, if escapes are honored.
    fn find_delimiter_position(
        &self,
        input: &[u8],
        finder: &Finder,
        delimiter_len: usize,
    ) -> Option<usize> {
        if !self.ignore_escaped_delim {
            return finder.find(input);
        }
        let mut offset = 0;
        while let Some(relative_pos) = finder.find(&input[offset..]) {
            let absolute_pos = offset + relative_pos;
            if absolute_pos > 0 && input[absolute_pos - 1] == b'\\' {
                offset = absolute_pos + delimiter_len;
                continue;
            }
            return Some(absolute_pos);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use latex2mathml::{LatexErrKind, LatexError, MathDisplay};

    use super::{ConvErrKind, ConversionError, Replacer};

    fn mock_convert(
        buf: &mut String,
        content: &str,
        typ: MathDisplay,
    ) -> Result<(), Box<LatexError>> {
        match typ {
            MathDisplay::Inline => write!(buf, "[T1:{content}]").unwrap(),
            MathDisplay::Block => write!(buf, "[T2:{content}]").unwrap(),
        }
        Ok(())
    }

    fn replace<'source>(
        input: &'source str,
        inline_delim: (&str, &str),
        block_delim: (&str, &str),
        ignore_escaped_delim: bool,
    ) -> Result<String, ConversionError<'source>> {
        Replacer::new(inline_delim, block_delim, ignore_escaped_delim, false)
            .replace(input, mock_convert)
    }

    #[test]
    fn basic_replacement() {
        let result = replace("Hello $world$ and $$universe$$", ("$", "$"), ("$$", "$$"), false);
        assert_eq!(result.unwrap(), "Hello [T1:world] and [T2:universe]");
    }

    #[test]
    fn escaped_delimiters() {
        let result = replace(r"Hello\$ $world$ and $$universe$$", ("$", "$"), ("$$", "$$"), true);
        assert_eq!(result.unwrap(), r"Hello\$ [T1:world] and [T2:universe]");
        let result = replace(r"Hello \$world\$ and $$universe$$", ("$", "$"), ("$$", "$$"), true);
        assert_eq!(result.unwrap(), r"Hello \$world\$ and [T2:universe]");
    }

    #[test]
    fn nested_delimiters() {
        let err = replace("Nested $$outer $inner$ delimiter$$", ("$", "$"), ("$$", "$$"), false)
            .unwrap_err();
        assert!(matches!(err, ConversionError(7, ConvErrKind::MismatchedDelimiters(15), _)));

        let err = replace(r"let \(a=1 and \(b=2\).", (r"\(", r"\)"), (r"\[", r"\]"), false)
            .unwrap_err();
        assert!(matches!(err, ConversionError(14, ConvErrKind::NestedDelimiters, _)));
    }

    #[test]
    fn unclosed() {
        let err = replace("Unclosed $delimiter", ("$", "$"), ("$$", "$$"), false).unwrap_err();
        assert!(matches!(err, ConversionError(9, ConvErrKind::UnclosedDelimiter, _)));
        assert_eq!(err.to_string(), "Unclosed delimiter on line 1, column 10.");
    }

    #[test]
    fn no_delimiters() {
        assert_eq!(replace("", ("$", "$"), ("$$", "$$"), false).unwrap(), "");
        assert_eq!(
            replace("Hello, world!", ("$", "$"), ("$$", "$$"), false).unwrap(),
            "Hello, world!"
        );
    }

    #[test]
    fn asymmetric_delimiters() {
        let result = replace(r"let \(a=1\) and \[b=2\].", (r"\(", r"\)"), (r"\[", r"\]"), false);
        assert_eq!(result.unwrap(), "let [T1:a=1] and [T2:b=2].");
        let result = replace(r"let a=1\) and \(b=2\).", (r"\(", r"\)"), (r"\[", r"\]"), false);
        assert_eq!(result.unwrap(), r"let a=1\) and [T1:b=2].");
    }

    #[test]
    fn multibyte_delimiters() {
        let result = replace("this is über ü(a=2ü).", ("ü(", "ü)"), ("ü[", "ü]"), false);
        assert_eq!(result.unwrap(), "this is über [T1:a=2].");
    }

    fn failing(_: &mut String, _: &str, _: MathDisplay) -> Result<(), Box<LatexError>> {
        Err(Box::new(LatexError(0..1, LatexErrKind::NoAvailableTokens)))
    }

    #[test]
    fn conversion_error() {
        let replacer = Replacer::new((r"\(", r"\)"), (r"\[", r"\]"), false, false);
        let err = replacer
            .replace("hello world\nlet\\(x^\\).", failing)
            .unwrap_err();
        assert!(matches!(&err.1, ConvErrKind::LatexError(_, latex) if latex == "x^"));
        assert!(err.to_string().contains("line 2, column 6"));
    }

    #[test]
    fn continue_on_error() {
        let replacer = Replacer::new(("$", "$"), ("$$", "$$"), false, true);
        let output = replacer.replace("a $x^$ b", failing).unwrap();
        assert_eq!(output, "a $x^$ b");
    }
}
