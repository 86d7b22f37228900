//! Splitting the text of `\text{…}` and friends into text and math spans.

/// Whether a span of text-command content is plain text or `$…$` math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Math,
}

/// Splits text at unescaped `$` signs, alternating between text and math.
///
/// `\$` is a literal dollar sign. A backslash that is followed by another backslash, a `$` or the
/// end of the text is dropped. Empty spans are left out.
pub fn separate_by_mode(text: &str) -> Vec<(String, Mode)> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut mode = Mode::Text;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '$' => {
                if !current.is_empty() {
                    spans.push((std::mem::take(&mut current), mode));
                }
                mode = match mode {
                    Mode::Text => Mode::Math,
                    Mode::Math => Mode::Text,
                };
            }
            '\\' => match chars.peek() {
                Some('$') => {
                    chars.next();
                    current.push('$');
                }
                Some('\\') | None => {}
                Some(_) => current.push('\\'),
            },
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        spans.push((current, mode));
    }
    spans
}
