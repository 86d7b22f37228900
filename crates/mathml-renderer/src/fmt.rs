const INDENT: &str = "  ";

/// Starts a new line and indents it by `indent_num` levels.
///
/// An indent of zero means pretty-printing is off, so nothing is written.
pub fn new_line_and_indent(s: &mut String, indent_num: usize) {
    if indent_num > 0 {
        s.push('\n');
    }
    for _ in 0..indent_num {
        s.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::new_line_and_indent;

    #[test]
    fn no_indent() {
        let mut s = String::from("<mi>");
        new_line_and_indent(&mut s, 0);
        assert_eq!(s, "<mi>");
    }

    #[test]
    fn nested_indent() {
        let mut s = String::new();
        new_line_and_indent(&mut s, 3);
        assert_eq!(s, "\n      ");
    }
}
