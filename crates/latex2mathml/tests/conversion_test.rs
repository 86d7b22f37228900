use insta::assert_snapshot;
use latex2mathml::{LatexToMathML, MathDisplay, MathMLConfig, PrettyPrint, convert};

fn inline(latex: &str) -> String {
    convert(latex, MathDisplay::Inline, "").unwrap()
}

fn block(latex: &str) -> String {
    convert(latex, MathDisplay::Block, "").unwrap()
}

/// Asserts that the parts occur in `haystack` in the given order.
fn assert_in_order(haystack: &str, parts: &[&str]) {
    let mut offset = 0;
    for part in parts {
        match haystack[offset..].find(part) {
            Some(found) => offset += found + part.len(),
            None => panic!("{part:?} not found in order in {haystack}"),
        }
    }
}

#[test]
fn leaves() {
    assert!(inline("x").contains("<mi>x</mi>"));
    assert!(inline("3").contains("<mn>3</mn>"));
    assert!(inline("+").contains("<mo>+</mo>"));
    assert!(inline("3.14").contains("<mn>3.14</mn>"));
}

#[test]
fn superscript() {
    assert_snapshot!(inline("x^2"), @r#"<math display="inline"><mrow><msup><mi>x</mi><mn>2</mn></msup></mrow></math>"#);
}

#[test]
fn fraction() {
    assert_snapshot!(inline(r"\frac{a}{b}"), @r#"<math display="inline"><mrow><mfrac><mrow><mi>a</mi></mrow><mrow><mi>b</mi></mrow></mfrac></mrow></math>"#);
}

#[test]
fn over() {
    assert!(inline(r"1 \over 2").contains("<mfrac><mn>1</mn><mn>2</mn></mfrac>"));
}

#[test]
fn quadratic_formula() {
    let mathml = inline(r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}");
    assert_in_order(
        &mathml,
        &["<mfrac>", "<msqrt>", "<msup><mi>b</mi><mn>2</mn></msup>", "</msqrt>", "</mfrac>"],
    );
    assert!(mathml.contains("<mo>\u{B1}</mo>"));
}

#[test]
fn roots() {
    assert!(inline(r"\sqrt[3]{x}").contains("<mroot><mrow><mi>x</mi></mrow><mn>3</mn></mroot>"));
    assert!(inline(r"\root 3 \of x").contains("<mroot><mi>x</mi><mn>3</mn></mroot>"));
}

#[test]
fn limits_depend_on_display() {
    let mathml = inline(r"\lim_{x \to \infty} f(x)");
    assert!(mathml.contains("<msub><mo>lim</mo><mrow>"));
    assert!(!mathml.contains("<munder>"));

    let mathml = block(r"\sum_{i=1}^{n} i");
    assert!(mathml.contains("<munderover><mo>\u{2211}</mo>"));
    let mathml = inline(r"\sum_{i=1}^{n} i");
    assert!(mathml.contains("<msubsup><mo>\u{2211}</mo>"));
}

#[test]
fn explicit_limits() {
    assert!(inline(r"\int\limits_0^1").contains("<munderover><mo>\u{222B}</mo>"));
    assert!(block(r"\sum\nolimits_i").contains("<msub><mo>\u{2211}</mo>"));
}

#[test]
fn big_operator_groups_its_operand() {
    assert!(inline(r"\int_0^1 x dx").contains("</msubsup><mrow><mi>x</mi><mi>d</mi><mi>x</mi></mrow>"));
}

#[test]
fn overbrace_label() {
    let mathml = inline(r"\overbrace{a+b}^{n}");
    assert_in_order(&mathml, &["<mover>", "<mover>", "\u{23DE}", "</mover>", "<mi>n</mi>", "</mover>"]);
}

#[test]
fn primes() {
    assert!(inline("f'").contains("<msup><mi>f</mi><mi>\u{2032}</mi></msup>"));
    assert!(inline("f''").contains("<msup><mi>f</mi><mi>\u{2033}</mi></msup>"));
}

#[test]
fn fonts() {
    assert!(inline(r"\mathbb{R}").contains("<mi>\u{211D}</mi>"));
    assert!(inline(r"\mathbf{x}").contains(r#"<mi mathvariant="bold">x</mi>"#));
    assert!(inline(r"\boldsymbol{x}").contains(r#"<mi mathvariant="bold-italic">x</mi>"#));
    assert_in_order(
        &inline(r"a {\bf b} c"),
        &["<mi>a</mi>", r#"<mi mathvariant="bold">b</mi>"#, "<mi>c</mi>"],
    );
}

#[test]
fn style_switches() {
    assert!(inline(r"\displaystyle x").contains(r#"<mstyle displaystyle="true" scriptlevel="0"><mi>x</mi></mstyle>"#));
    assert!(inline(r"\large x").contains(r#"<mstyle mathsize="1.2em"><mi>x</mi></mstyle>"#));
}

#[test]
fn delimiters() {
    assert!(inline(r"\left\{ x \right\}").contains(r#"<mo stretchy="true" fence="true" form="prefix">{</mo>"#));
    assert!(inline(r"\big( x").contains(r#"<mo minsize="1.2em" maxsize="1.2em">(</mo>"#));
    assert_in_order(
        &inline(r"\left( a \middle| b \right)"),
        &["form=\"prefix\"", "<mi>a</mi>", "lspace=\"0.05em\"", "|", "<mi>b</mi>", "form=\"postfix\""],
    );
}

#[test]
fn text() {
    assert_eq!(
        inline(r"\text{for all $x$}"),
        "<math display=\"inline\"><mrow><mtext>for\u{A0}all\u{A0}</mtext><mrow><mi>x</mi></mrow></mrow></math>"
    );
    assert!(inline(r"\textbf{bold}").contains(r#"<mtext mathvariant="bold">bold</mtext>"#));
    assert!(inline(r"\mbox{a}").contains(r#"<mstyle displaystyle="false" scriptlevel="0"><mtext>a</mtext></mstyle>"#));
}

#[test]
fn text_references() {
    assert!(inline(r"\cite{knuth}").contains("<mtext>[knuth]</mtext>"));
    assert!(inline(r"\ref{eq}").contains("<mtext>eq</mtext>"));
}

#[test]
fn binomials() {
    assert!(inline(r"\tbinom{n}{k}").contains(r#"<mstyle displaystyle="false" scriptlevel="0"><mo minsize="1.2em" maxsize="1.2em">(</mo><mfrac linethickness="0">"#));
    assert!(inline(r"n \choose k").contains(r#"<mo minsize="2.047em" maxsize="2.047em">(</mo><mfrac linethickness="0"><mi>n</mi><mi>k</mi></mfrac>"#));
}

#[test]
fn genfrac() {
    let mathml = inline(r"\genfrac{[}{]}{0pt}{1}{a}{b}");
    assert!(mathml.contains(r#"<mfrac linethickness="0pt">"#));
    assert_in_order(&mathml, &[r#"<mstyle displaystyle="false""#, "[", "<mfrac", "]"]);
}

#[test]
fn href_and_color() {
    assert!(inline(r"\href{https://example.org}{x}").contains(r#"<mrow href="https://example.org"><mrow><mi>x</mi></mrow></mrow>"#));
    assert!(inline(r"{\color{blue} y}").contains(r#"<mstyle mathcolor="blue"><mi>y</mi></mstyle>"#));
}

#[test]
fn phantoms() {
    assert!(inline(r"\phantom{x}").contains("<mphantom><mrow><mi>x</mi></mrow></mphantom>"));
    assert!(inline(r"\vphantom{x}").contains(r#"<mpadded width="0"><mphantom>"#));
}

#[test]
fn boxes() {
    assert!(inline(r"\boxed{x}").contains(r#"<menclose notation="box"><mrow><mi>x</mi></mrow></menclose>"#));
}

#[test]
fn unknown_command_is_literal() {
    assert!(inline(r"\unknowncommand").contains(r"<mi>\unknowncommand</mi>"));
}

#[test]
fn special_chars_and_entities() {
    assert!(inline(r"\specialChar{960}").contains("<mi>\u{3C0}</mi>"));
    assert!(inline("a &amp;lt; b").contains("<mo>&lt;</mo>"));
}

#[test]
fn pretty_print() {
    let converter = LatexToMathML::new(MathMLConfig {
        pretty_print: PrettyPrint::Always,
        namespace: String::new(),
        ..Default::default()
    });
    let mathml = converter.convert("x", MathDisplay::Inline).unwrap();
    assert_eq!(mathml, "<math display=\"inline\">\n  <mrow>\n    <mi>x</mi>\n  </mrow>\n</math>");
}

#[test]
fn deterministic() {
    let latex = r"\begin{pmatrix} a & b \\ c & d \end{pmatrix} \xrightarrow[u]{v} \hat{x}";
    assert_eq!(inline(latex), inline(latex));
}
