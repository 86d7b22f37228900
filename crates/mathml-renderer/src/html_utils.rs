/// Escapes `&`, `<` and `>` in `input` for use as element content.
///
/// The search for special characters is done with `memchr`, so long runs of ordinary text are
/// copied in one go.
pub fn escape_html_content(output: &mut String, input: &str) {
    let mut rest = input;
    while let Some(index) = memchr::memchr3(b'&', b'<', b'>', rest.as_bytes()) {
        let (before, after) = rest.split_at(index);
        output.push_str(before);
        // The special characters are all ASCII, so slicing off one byte is valid.
        let (special, after) = after.split_at(1);
        output.push_str(match special {
            "&" => "&amp;",
            "<" => "&lt;",
            _ => "&gt;",
        });
        rest = after;
    }
    output.push_str(rest);
}

/// Escapes `&`, `<` and `"` in `input` for use inside a double-quoted attribute value.
pub fn escape_double_quoted_html_attribute(output: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(input: &str) -> String {
        let mut output = String::new();
        escape_html_content(&mut output, input);
        output
    }

    fn attribute(input: &str) -> String {
        let mut output = String::new();
        escape_double_quoted_html_attribute(&mut output, input);
        output
    }

    #[test]
    fn empty_input() {
        assert_eq!(content(""), "");
        assert_eq!(attribute(""), "");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(content("a+b=c"), "a+b=c");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(content("a<b && c>d"), "a&lt;b &amp;&amp; c&gt;d");
    }

    #[test]
    fn keeps_multibyte_characters() {
        assert_eq!(content("∑<∞"), "∑&lt;∞");
    }

    #[test]
    fn escapes_attribute_quotes() {
        assert_eq!(
            attribute(r#"https://a.org/?q="x"&y"#),
            "https://a.org/?q=&quot;x&quot;&amp;y"
        );
    }
}
