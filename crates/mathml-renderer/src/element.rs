use std::fmt::{self, Write};

#[cfg(feature = "serde")]
use serde::Serialize;
use strum_macros::IntoStaticStr;

use crate::fmt::new_line_and_indent;
use crate::html_utils::{escape_double_quoted_html_attribute, escape_html_content};

/// The MathML elements the converter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[strum(serialize_all = "lowercase")]
pub enum Tag {
    Math,
    Menclose,
    Mfrac,
    Mi,
    Mn,
    Mo,
    Mover,
    Mpadded,
    Mphantom,
    Mroot,
    Mrow,
    Mspace,
    Msqrt,
    Mstyle,
    Msub,
    Msubsup,
    Msup,
    Mtable,
    Mtd,
    Mtext,
    Mtr,
    Munder,
    Munderover,
}

impl Tag {
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Content {
    Element(Element),
    Text(String),
}

/// A MathML element with ordered attributes and children.
///
/// Attributes keep their insertion order. Setting an attribute that is already present replaces
/// its value in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element {
    tag: Tag,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Content>,
}

static_assertions::assert_impl_all!(Element: Send, Sync);

impl Element {
    pub fn new(tag: Tag) -> Self {
        Element {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element whose only child is the given text.
    pub fn with_text(tag: Tag, text: impl Into<String>) -> Self {
        let mut element = Element::new(tag);
        element.children.push(Content::Text(text.into()));
        element
    }

    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, old)) => *old = value,
            None => self.attributes.push((name, value)),
        }
    }

    #[inline]
    pub fn attributes(&self) -> &[(&'static str, String)] {
        &self.attributes
    }

    #[inline]
    pub fn children(&self) -> &[Content] {
        &self.children
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends a child element and returns a reference to it, so that it can be filled in place.
    pub fn push(&mut self, element: Element) -> &mut Element {
        self.children.push(Content::Element(element));
        match self.children.last_mut() {
            Some(Content::Element(element)) => element,
            _ => unreachable!(),
        }
    }

    /// Unwraps an element that holds exactly one child element; hands `self` back otherwise.
    pub fn into_only_child(mut self) -> Result<Element, Element> {
        if self.children.len() == 1
            && let Some(Content::Element(child)) = self.children.pop()
        {
            return Ok(child);
        }
        Err(self)
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Content::Text(text.into()));
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(Content::Text(text.into()));
    }

    /// Serializes the element.
    ///
    /// A `base_indent` of zero writes everything on one line. Otherwise every element starts on a
    /// new line, indented by its depth.
    pub fn emit(&self, s: &mut String, base_indent: usize) -> fmt::Result {
        let child_indent = if base_indent > 0 {
            base_indent.saturating_add(1)
        } else {
            0
        };
        self.emit_with_indents(s, base_indent, child_indent)
    }

    /// Serializes the element as the root of a document.
    pub fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.emit_with_indents(&mut s, 0, usize::from(pretty));
        s
    }

    fn emit_with_indents(&self, s: &mut String, indent: usize, child_indent: usize) -> fmt::Result {
        new_line_and_indent(s, indent);
        write!(s, "<{}", self.tag.as_str())?;
        for (name, value) in &self.attributes {
            write!(s, " {name}=\"")?;
            escape_double_quoted_html_attribute(s, value);
            s.push('"');
        }
        if self.children.is_empty() {
            s.push_str("/>");
            return Ok(());
        }
        s.push('>');

        let has_elements = self
            .children
            .iter()
            .any(|child| matches!(child, Content::Element(_)));
        for child in &self.children {
            match child {
                Content::Element(element) => element.emit(s, child_indent)?,
                Content::Text(text) => {
                    if has_elements {
                        new_line_and_indent(s, child_indent);
                    }
                    escape_html_content(s, text);
                }
            }
        }
        if has_elements && child_indent > 0 {
            if indent == 0 {
                s.push('\n');
            } else {
                new_line_and_indent(s, indent);
            }
        }
        write!(s, "</{}>", self.tag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, Tag};

    fn render(element: &Element) -> String {
        let mut output = String::new();
        element.emit(&mut output, 0).unwrap();
        output
    }

    #[test]
    fn render_text_element() {
        assert_eq!(render(&Element::with_text(Tag::Mi, "x")), "<mi>x</mi>");
    }

    #[test]
    fn render_empty_element_self_closes() {
        let space = Element::new(Tag::Mspace).with_attr("width", "1em");
        assert_eq!(render(&space), r#"<mspace width="1em"/>"#);
        assert_eq!(render(&Element::new(Tag::Mi)), "<mi/>");
    }

    #[test]
    fn render_escapes_text_and_attributes() {
        let op = Element::with_text(Tag::Mo, "<").with_attr("title", r#"a "b" & c"#);
        assert_eq!(
            render(&op),
            r#"<mo title="a &quot;b&quot; &amp; c">&lt;</mo>"#
        );
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut op = Element::with_text(Tag::Mo, "(")
            .with_attr("stretchy", "true")
            .with_attr("fence", "true");
        op.set_attr("stretchy", "false");
        assert_eq!(op.attr("stretchy"), Some("false"));
        assert_eq!(
            render(&op),
            r#"<mo stretchy="false" fence="true">(</mo>"#
        );
    }

    #[test]
    fn push_returns_the_new_child() {
        let mut row = Element::new(Tag::Mrow);
        let style = row.push(Element::new(Tag::Mstyle).with_attr("scriptlevel", "1"));
        style.push(Element::with_text(Tag::Mn, "1"));
        assert_eq!(
            render(&row),
            r#"<mrow><mstyle scriptlevel="1"><mn>1</mn></mstyle></mrow>"#
        );
    }

    #[test]
    fn set_text_replaces_children() {
        let mut text = Element::with_text(Tag::Mtext, "a");
        text.set_text("b");
        assert_eq!(render(&text), "<mtext>b</mtext>");
    }

    #[test]
    fn render_pretty() {
        let mut math = Element::new(Tag::Math).with_attr("display", "block");
        let frac = math.push(Element::new(Tag::Mfrac));
        frac.push(Element::with_text(Tag::Mn, "1"));
        frac.push(Element::with_text(Tag::Mn, "2"));
        assert_eq!(
            math.render(true),
            "<math display=\"block\">\n  <mfrac>\n    <mn>1</mn>\n    <mn>2</mn>\n  </mfrac>\n</math>"
        );
        assert_eq!(
            math.render(false),
            r#"<math display="block"><mfrac><mn>1</mn><mn>2</mn></mfrac></math>"#
        );
    }

    #[test]
    fn tag_names_are_lowercase() {
        assert_eq!(Tag::Munderover.as_str(), "munderover");
        assert_eq!(Tag::Mtd.as_str(), "mtd");
    }
}
