use std::fmt::{self, Write};
use std::ops::Range;

use mathml_renderer::html_utils::{escape_double_quoted_html_attribute, escape_html_content};

use crate::MathDisplay;

/// Represents an error that occurred during LaTeX parsing.
///
/// The range is the byte span of the offending token in the (preprocessed) input.
#[derive(Debug, Clone, PartialEq)]
pub struct LatexError(pub Range<usize>, pub LatexErrKind);

#[derive(Debug, Clone, PartialEq)]
pub enum LatexErrKind {
    NumeratorNotFound,
    DenominatorNotFound,
    ExtraLeftOrMissingRight,
    MissingSuperScriptOrSubscript,
    DoubleSubscripts,
    DoubleSuperscripts,
    NoAvailableTokens,
    InvalidStyleForGenfrac,
    MissingEnd(Box<str>),
    InvalidAlignment(Box<str>),
    InvalidWidth(Box<str>),
    LimitsMustFollowMathOperator,
    HardLimitExceeded,
}

impl LatexErrKind {
    /// Returns the error message as a string.
    pub fn string(&self) -> String {
        match self {
            LatexErrKind::NumeratorNotFound => "Numerator not found.".to_string(),
            LatexErrKind::DenominatorNotFound => "Denominator not found.".to_string(),
            LatexErrKind::ExtraLeftOrMissingRight => {
                r"Extra \left or missing \right.".to_string()
            }
            LatexErrKind::MissingSuperScriptOrSubscript => {
                "Missing superscript or subscript.".to_string()
            }
            LatexErrKind::DoubleSubscripts => {
                "Double subscripts: use braces to clarify.".to_string()
            }
            LatexErrKind::DoubleSuperscripts => {
                "Double superscripts: use braces to clarify.".to_string()
            }
            LatexErrKind::NoAvailableTokens => {
                "Expected more input but reached the end.".to_string()
            }
            LatexErrKind::InvalidStyleForGenfrac => {
                r"Invalid style for \genfrac, must be one of 0, 1, 2 or 3.".to_string()
            }
            LatexErrKind::MissingEnd(env) => {
                "Missing \"\\end{".to_string() + env + "}\"."
            }
            LatexErrKind::InvalidAlignment(got) => {
                "Invalid column alignment \"".to_string() + got + "\"; expected l, c, r or |."
            }
            LatexErrKind::InvalidWidth(got) => {
                "Invalid width \"".to_string() + got + "\"; expected a number."
            }
            LatexErrKind::LimitsMustFollowMathOperator => {
                r"\limits must follow a math operator.".to_string()
            }
            LatexErrKind::HardLimitExceeded => {
                "Hard limit exceeded. Please simplify your equation.".to_string()
            }
        }
    }
}

impl LatexError {
    /// Format a LaTeX error as an HTML snippet.
    ///
    /// # Arguments
    /// - `latex`: The original LaTeX input that caused the error.
    /// - `display`: The display mode of the equation (inline or block).
    /// - `css_class`: An optional CSS class to apply to the error element. If `None`,
    ///   defaults to `"latex2mathml-error"`.
    pub fn to_html(&self, latex: &str, display: MathDisplay, css_class: Option<&str>) -> String {
        let mut output = String::new();
        let tag = if matches!(display, MathDisplay::Block) {
            "p"
        } else {
            "span"
        };
        let css_class = css_class.unwrap_or("latex2mathml-error");
        let _ = write!(
            output,
            r#"<{} class="{}" title="{}: "#,
            tag, css_class, self.0.start
        );
        escape_double_quoted_html_attribute(&mut output, &self.1.string());
        output.push_str(r#""><code>"#);
        escape_html_content(&mut output, latex);
        let _ = write!(output, "</code></{tag}>");
        output
    }

    pub fn error_message(&self) -> String {
        self.1.string()
    }

    #[inline]
    pub fn kind(&self) -> &LatexErrKind {
        &self.1
    }
}

#[cfg(feature = "ariadne")]
impl LatexError {
    /// Convert this error into an [`ariadne::Report`] for pretty-printing.
    pub fn to_report<'name>(
        &self,
        source_name: &'name str,
        with_color: bool,
    ) -> ariadne::Report<'static, (&'name str, Range<usize>)> {
        use ariadne::{Label, Report, ReportKind};

        let label_msg = match &self.1 {
            LatexErrKind::NumeratorNotFound => "nothing before this to use as numerator".into(),
            LatexErrKind::DenominatorNotFound => "nothing after this to use as denominator".into(),
            LatexErrKind::ExtraLeftOrMissingRight => r"unmatched \left or \right".into(),
            LatexErrKind::MissingSuperScriptOrSubscript => "expected an argument here".into(),
            LatexErrKind::DoubleSubscripts => "second subscript".into(),
            LatexErrKind::DoubleSuperscripts => "second superscript".into(),
            LatexErrKind::NoAvailableTokens => "expected more input here".into(),
            LatexErrKind::InvalidStyleForGenfrac => "style must be 0-3".into(),
            LatexErrKind::MissingEnd(env) => format!("expected \"\\end{{{env}}}\""),
            LatexErrKind::InvalidAlignment(_) => "expected l, c, r or |".into(),
            LatexErrKind::InvalidWidth(_) => "expected a number here".into(),
            LatexErrKind::LimitsMustFollowMathOperator => "not after a math operator".into(),
            LatexErrKind::HardLimitExceeded => "limit exceeded".into(),
        };

        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        Report::build(ReportKind::Error, (source_name, self.0.start..self.0.start))
            .with_config(config)
            .with_message(self.1.string())
            .with_label(Label::new((source_name, self.0.clone())).with_message(label_msg))
            .finish()
    }
}

impl fmt::Display for LatexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.start, self.1.string())
    }
}

impl std::error::Error for LatexError {}
