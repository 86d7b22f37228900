use std::borrow::Cow;

use crate::commands::BRACES;

/// How scripts attached to a base are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Modifier {
    /// Above and below the base (`\limits`, or `\sum` in display mode).
    Limits,
    /// Beside the base (`\nolimits`).
    NoLimits,
    /// The superscript labels an `\overbrace`.
    Overbrace,
    /// The subscript labels an `\underbrace`.
    Underbrace,
}

/// Delimiters attached to a node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Delimiter<'source> {
    /// The delimiter of `\left` or `\right`. A `.` means no delimiter.
    Single(Cow<'source, str>),
    /// The opening and closing delimiters of a generalized fraction; `None` leaves a side open.
    Pair(Option<Cow<'source, str>>, Option<Cow<'source, str>>),
}

/// A node of the parse tree.
///
/// Leaves have `children: None`. Groups in braces use the token `{}`; scripts use `_`, `^` and
/// `_^` with the base as first child.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node<'source> {
    pub token: Cow<'source, str>,
    pub children: Option<Vec<Node<'source>>>,
    pub delimiter: Option<Delimiter<'source>>,
    pub alignment: Option<String>,
    pub text: Option<Cow<'source, str>>,
    pub attributes: Vec<(&'static str, Cow<'source, str>)>,
    pub modifier: Option<Modifier>,
}

impl<'source> Node<'source> {
    pub fn leaf(token: impl Into<Cow<'source, str>>) -> Self {
        Node {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_children(token: impl Into<Cow<'source, str>>, children: Vec<Node<'source>>) -> Self {
        Node {
            token: token.into(),
            children: Some(children),
            ..Default::default()
        }
    }

    pub fn braces(children: Vec<Node<'source>>) -> Self {
        Node::with_children(BRACES, children)
    }

    /// The node that stands in for a missing base, as in `^2`.
    pub fn empty() -> Self {
        Node::leaf("")
    }

    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<Cow<'source, str>>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl Into<Cow<'source, str>>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, old)) => *old = value,
            None => self.attributes.push((name, value)),
        }
    }

    #[inline]
    pub fn is(&self, token: &str) -> bool {
        self.token == token
    }

    #[inline]
    pub fn is_braces(&self) -> bool {
        self.token == BRACES
    }

    #[inline]
    pub fn is_command(&self) -> bool {
        self.token.starts_with('\\')
    }

    /// A base of `""` with no children, left behind by a script without a base.
    pub fn is_empty_base(&self) -> bool {
        self.token.is_empty() && self.children.is_none()
    }

    pub fn children(&self) -> &[Node<'source>] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn child(&self, index: usize) -> Option<&Node<'source>> {
        self.children.as_ref()?.get(index)
    }
}
