//! Convert LaTeX math to MathML.
//!
//! # Usage
//!
//! The main struct of this library is [`LatexToMathML`]. Create an instance with a
//! [`MathMLConfig`] and call [`LatexToMathML::convert`] for every formula:
//!
//! ```rust
//! use latex2mathml::{LatexToMathML, MathDisplay, MathMLConfig};
//!
//! let converter = LatexToMathML::new(MathMLConfig::default());
//! let mathml = converter.convert(r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}", MathDisplay::Block).unwrap();
//! assert!(mathml.starts_with(r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="block">"#));
//! ```
//!
//! For one-off conversions with the default settings there is the free function [`convert`]:
//!
//! ```rust
//! use latex2mathml::{MathDisplay, convert};
//!
//! let mathml = convert("x^2", MathDisplay::Inline, "").unwrap();
//! assert_eq!(mathml, r#"<math display="inline"><mrow><msup><mi>x</mi><mn>2</mn></msup></mrow></math>"#);
//! ```
//!
//! # Features
//!
//! - `serde`: `MathMLConfig` and `PrettyPrint` implement serde's `Deserialize`, and the parse
//!   tree implements `Serialize`.
//! - `ariadne`: [`LatexError::to_report`] builds a pretty error report.
//!
mod commands;
mod converter;
mod error;
mod lexer;
mod node;
mod parser;
mod preprocess;
mod symbols;
mod text_parser;
mod token;
mod token_queue;

use std::borrow::Cow;

use mathml_renderer::element::{Element, Tag};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::converter::DepthExceeded;
pub use self::error::{LatexErrKind, LatexError};
pub use self::lexer::tokenize;
pub use self::node::{Delimiter, Modifier, Node};
pub use self::parser::walk;
pub use self::preprocess::preprocess;
pub use self::token::{Span, Token};

/// The namespace put on the `<math>` element by default.
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Display mode for the LaTeX math equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDisplay {
    /// For inline equations, like those in `$...$` in LaTeX.
    Inline,
    /// For block equations (or "display style" equations), like those in `$$...$$` in LaTeX.
    Block,
}

impl MathDisplay {
    /// The value of the `display` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            MathDisplay::Inline => "inline",
            MathDisplay::Block => "block",
        }
    }
}

/// Configuration for pretty-printing the MathML output.
///
/// Pretty-printing means that newlines and indentation is added to the MathML output, to make it
/// easier to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[non_exhaustive]
pub enum PrettyPrint {
    /// Never pretty print.
    #[default]
    Never,
    /// Always pretty print.
    Always,
    /// Pretty print for block equations only.
    Auto,
}

/// Configuration object for the LaTeX to MathML conversion.
///
/// # Example usage
///
/// ```rust
/// use latex2mathml::{MathMLConfig, PrettyPrint};
///
/// // Default values
/// let config = MathMLConfig::default();
///
/// // No namespace, pretty-printed block equations
/// let config = MathMLConfig {
///     pretty_print: PrettyPrint::Auto,
///     namespace: String::new(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct MathMLConfig {
    /// A configuration for pretty-printing the MathML output. See [`PrettyPrint`] for details.
    pub pretty_print: PrettyPrint,
    /// The `xmlns` of the `<math>` element. An empty string leaves the attribute out.
    pub namespace: String,
    /// If `true`, `\specialChar{N}` and HTML entities in the input are decoded first.
    pub decode_entities: bool,
}

impl Default for MathMLConfig {
    fn default() -> Self {
        MathMLConfig {
            pretty_print: PrettyPrint::default(),
            namespace: MATHML_NAMESPACE.to_string(),
            decode_entities: true,
        }
    }
}

/// A converter that transforms LaTeX math equations into MathML.
#[derive(Debug, Clone, Default)]
pub struct LatexToMathML {
    config: MathMLConfig,
}

impl LatexToMathML {
    /// Create a new `LatexToMathML` converter with the given configuration.
    pub fn new(config: MathMLConfig) -> Self {
        LatexToMathML { config }
    }

    /// Convert LaTeX text to MathML.
    ///
    /// The second argument specifies whether it is inline-equation or block-equation.
    ///
    /// ```rust
    /// use latex2mathml::{LatexToMathML, MathDisplay, MathMLConfig};
    ///
    /// let converter = LatexToMathML::new(MathMLConfig::default());
    /// let mathml = converter.convert(r"(n + 1)! = \Gamma ( n + 1 )", MathDisplay::Inline).unwrap();
    /// assert!(mathml.contains("<mi>Γ</mi>"));
    /// ```
    pub fn convert(&self, latex: &str, display: MathDisplay) -> Result<String, Box<LatexError>> {
        let math = self.convert_to_element(latex, display)?;
        let pretty_print = matches!(self.config.pretty_print, PrettyPrint::Always)
            || (matches!(self.config.pretty_print, PrettyPrint::Auto)
                && display == MathDisplay::Block);
        Ok(math.render(pretty_print))
    }

    /// The text that is actually converted, and that the spans of a [`LatexError`] point into.
    ///
    /// This is `latex` itself unless `decode_entities` is on.
    pub fn source_text<'source>(&self, latex: &'source str) -> Cow<'source, str> {
        if self.config.decode_entities {
            preprocess(latex)
        } else {
            latex.into()
        }
    }

    /// Convert LaTeX text to a `<math>` element tree, without serializing it.
    ///
    /// Error spans index into [`LatexToMathML::source_text`], not necessarily into `latex`.
    pub fn convert_to_element(
        &self,
        latex: &str,
        display: MathDisplay,
    ) -> Result<Element, Box<LatexError>> {
        let latex = self.source_text(latex);
        let nodes = walk(&latex, display)?;

        let mut math = Element::new(Tag::Math);
        if !self.config.namespace.is_empty() {
            math.set_attr("xmlns", self.config.namespace.as_str());
        }
        math.set_attr("display", display.as_str());
        let row = math.push(Element::new(Tag::Mrow));
        converter::convert_group(&nodes, row, None, 0).map_err(|DepthExceeded| {
            Box::new(LatexError(0..latex.len(), LatexErrKind::HardLimitExceeded))
        })?;
        Ok(math)
    }
}

/// Convert LaTeX text to MathML with the given `display` mode and `<math>` namespace.
///
/// An empty `namespace` leaves the `xmlns` attribute out. Entities in the input are decoded
/// and the output is not pretty-printed.
pub fn convert(
    latex: &str,
    display: MathDisplay,
    namespace: &str,
) -> Result<String, Box<LatexError>> {
    LatexToMathML::new(MathMLConfig {
        namespace: namespace.to_string(),
        ..Default::default()
    })
    .convert(latex, display)
}

#[cfg(test)]
mod tests {
    use super::{
        LatexErrKind, LatexToMathML, MATHML_NAMESPACE, MathDisplay, MathMLConfig, PrettyPrint,
        convert,
    };

    #[test]
    fn namespace_and_display() {
        let mathml = convert("x", MathDisplay::Block, MATHML_NAMESPACE).unwrap();
        assert_eq!(
            mathml,
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="block"><mrow><mi>x</mi></mrow></math>"#
        );
        let mathml = convert("x", MathDisplay::Inline, "").unwrap();
        assert_eq!(mathml, r#"<math display="inline"><mrow><mi>x</mi></mrow></math>"#);
    }

    #[test]
    fn empty_input() {
        let mathml = convert("", MathDisplay::Inline, "").unwrap();
        assert_eq!(mathml, r#"<math display="inline"><mrow/></math>"#);
    }

    #[test]
    fn pretty_print_auto() {
        let converter = LatexToMathML::new(MathMLConfig {
            pretty_print: PrettyPrint::Auto,
            namespace: String::new(),
            ..Default::default()
        });
        assert_eq!(
            converter.convert("1", MathDisplay::Inline).unwrap(),
            r#"<math display="inline"><mrow><mn>1</mn></mrow></math>"#
        );
        assert_eq!(
            converter.convert("1", MathDisplay::Block).unwrap(),
            "<math display=\"block\">\n  <mrow>\n    <mn>1</mn>\n  </mrow>\n</math>"
        );
    }

    #[test]
    fn entities_are_decoded() {
        let mathml = convert("a &lt; b", MathDisplay::Inline, "").unwrap();
        assert!(mathml.contains("<mo>&lt;</mo>"));

        let converter = LatexToMathML::new(MathMLConfig {
            decode_entities: false,
            namespace: String::new(),
            ..Default::default()
        });
        let mathml = converter.convert("a &lt; b", MathDisplay::Inline).unwrap();
        assert!(!mathml.contains("<mo>&lt;</mo>"));
    }

    #[test]
    fn error_spans_point_into_decoded_text() {
        let converter = LatexToMathML::default();
        let latex = "&lt;a_b_c";
        let source = converter.source_text(latex);
        assert_eq!(source, "<a_b_c");
        let err = converter.convert(latex, MathDisplay::Inline).unwrap_err();
        assert_eq!(err.1, LatexErrKind::DoubleSubscripts);
        assert_eq!(&source[err.0.clone()], "_");

        let raw = LatexToMathML::new(MathMLConfig {
            decode_entities: false,
            ..Default::default()
        });
        assert_eq!(raw.source_text(latex), latex);
    }

    #[test]
    fn conversion_is_deterministic() {
        let latex = r"\sum_{i=1}^n \frac{1}{i^2}";
        assert_eq!(
            convert(latex, MathDisplay::Block, MATHML_NAMESPACE).unwrap(),
            convert(latex, MathDisplay::Block, MATHML_NAMESPACE).unwrap()
        );
    }
}
