//! Internal library for the `latex2mathml` crate for building and rendering MathML.
//!
//! The converter builds a tree of [`Element`](element::Element)s and then serializes it to a
//! string, optionally with newlines and indentation.
//!
//! # Example
//!
//! ```rust
//! use latex2mathml_renderer_internal::element::{Element, Tag};
//!
//! let mut sup = Element::new(Tag::Msup);
//! sup.push(Element::with_text(Tag::Mi, "x"));
//! sup.push(Element::with_text(Tag::Mn, "2"));
//!
//! let mut output = String::new();
//! sup.emit(&mut output, 0).unwrap();
//! assert_eq!(output, "<msup><mi>x</mi><mn>2</mn></msup>");
//! ```
pub mod element;
pub mod fmt;
pub mod html_utils;
