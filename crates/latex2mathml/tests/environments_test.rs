use insta::assert_snapshot;
use latex2mathml::{MathDisplay, convert};

fn inline(latex: &str) -> String {
    convert(latex, MathDisplay::Inline, "").unwrap()
}

#[test]
fn matrix() {
    assert_snapshot!(
        inline(r"\begin{matrix}a & b \\ c & d \end{matrix}"),
        @"<math display=\"inline\"><mrow><mtable><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr><mtr><mtd><mi>c</mi></mtd><mtd><mi>d</mi></mtd></mtr></mtable></mrow></math>"
    );
}

#[test]
fn row_and_column_counts() {
    let mathml = inline(r"\begin{matrix} 1 & 2 & 3 \\ 4 \\ 5 & 6 \end{matrix}");
    assert_eq!(mathml.matches("<mtr>").count(), 3);
    assert_eq!(mathml.matches("<mtd>").count() + mathml.matches("<mtd/>").count(), 9);
}

#[test]
fn fenced_matrices() {
    assert!(inline(r"\begin{pmatrix} 1 \end{pmatrix}").contains("<mo>(</mo><mtable><mtr><mtd><mn>1</mn></mtd></mtr></mtable><mo>)</mo>"));
    assert!(inline(r"\begin{bmatrix} 1 \end{bmatrix}").contains("<mo>[</mo><mtable>"));
    assert!(inline(r"\begin{Bmatrix} 1 \end{Bmatrix}").contains("<mo>{</mo><mtable>"));
    assert!(inline(r"\begin{vmatrix} 1 \end{vmatrix}").contains("<mo>|</mo><mtable>"));
    assert!(inline(r"\begin{Vmatrix} 1 \end{Vmatrix}").contains("<mo>\u{2016}</mo><mtable>"));
}

#[test]
fn starred_matrix_alignment() {
    let mathml = inline(r"\begin{pmatrix*}[r] 1 & 2 \end{pmatrix*}");
    assert!(mathml.contains(r#"<mtd columnalign="right"><mn>1</mn></mtd><mtd columnalign="right"><mn>2</mn></mtd>"#));
    assert!(mathml.contains("<mo>(</mo>"));
}

#[test]
fn plain_matrix_macro() {
    assert!(inline(r"\pmatrix{a & b}").contains("<mo>(</mo><mtable><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr></mtable><mo>)</mo>"));
}

#[test]
fn array_alignment_and_lines() {
    let mathml = inline(r"\begin{array}{l|r} 1 & 2 \\ \hline 3 & 4 \end{array}");
    assert!(mathml.contains(r#"<mtable columnlines="solid" rowlines="solid">"#));
    assert!(mathml.contains(r#"<mtd columnalign="left"><mn>1</mn></mtd><mtd columnalign="right"><mn>2</mn></mtd>"#));
}

#[test]
fn dashed_row_line() {
    let mathml = inline(r"\begin{array}{cc} 1 & 2 \\ \hdashline 3 & 4 \\ 5 & 6 \end{array}");
    assert!(mathml.contains(r#"rowlines="dashed none""#));
}

#[test]
fn cases() {
    let mathml = inline(r"f(x) = \begin{cases} 1 & x > 0 \\ 0 & x \le 0 \end{cases}");
    assert!(mathml.contains(r#"<mrow><mo stretchy="true" fence="true" form="prefix">{</mo><mtable>"#));
    assert!(mathml.contains(r#"<mtd columnalign="left"><mn>1</mn></mtd>"#));
    assert_eq!(mathml.matches("<mtr>").count(), 2);
}

#[test]
fn align() {
    assert_snapshot!(
        inline(r"\begin{align} a &= b \\ c &= d \end{align}"),
        @r#"<math display="inline"><mrow><mtable displaystyle="true" rowspacing="3pt" columnspacing="0em 2em"><mtr><mtd columnalign="right"><mi>a</mi></mtd><mtd columnalign="left"><mi/><mo>=</mo><mi>b</mi></mtd></mtr><mtr><mtd columnalign="right"><mi>c</mi></mtd><mtd columnalign="left"><mi/><mo>=</mo><mi>d</mi></mtd></mtr></mtable></mrow></math>"#
    );
}

#[test]
fn alignat_skips_column_count() {
    let mathml = inline(r"\begin{alignat}{2} a &= b & c &= d \end{alignat}");
    assert!(!mathml.contains("<mn>2</mn>"));
    assert!(mathml.contains(r#"columnspacing="0em 2em 0em 2em""#));
}

#[test]
fn split_has_no_column_spacing_pairs() {
    let mathml = inline(r"\begin{split} a &= b \end{split}");
    assert!(mathml.contains(r#"<mtable displaystyle="true" columnspacing="0em" rowspacing="3pt">"#));
}

#[test]
fn eqnarray() {
    let mathml = inline(r"\begin{eqnarray} a & = & b \end{eqnarray}");
    assert!(mathml.contains(r#"<mtd columnalign="right"><mi>a</mi></mtd><mtd columnalign="center"><mo>=</mo></mtd><mtd columnalign="left"><mi>b</mi></mtd>"#));
}

#[test]
fn multline() {
    let mathml = inline(r"\begin{multline} a \\ b \\ c \end{multline}");
    assert!(mathml.contains(r#"<mtd columnalign="left"><mi>a</mi></mtd>"#));
    assert!(mathml.contains(r#"<mtd columnalign="center"><mi>b</mi></mtd>"#));
    assert!(mathml.contains(r#"<mtd columnalign="right"><mi>c</mi></mtd>"#));
}

#[test]
fn substack() {
    let mathml = inline(r"\sum_{\substack{i \\ j}} x");
    assert!(mathml.contains(r#"<mstyle scriptlevel="1"><mtable><mtr><mtd><mi>i</mi></mtd></mtr><mtr><mtd><mi>j</mi></mtd></mtr></mtable></mstyle>"#));
}

#[test]
fn hfil_aligns_cells() {
    let mathml = inline(r"\begin{matrix} a \hfil & \hfil b \end{matrix}");
    assert!(mathml.contains(r#"<mtd columnalign="left"><mi>a</mi></mtd><mtd columnalign="right"><mi>b</mi></mtd>"#));
}

#[test]
fn equation() {
    assert!(inline(r"\begin{equation} x \end{equation}").contains(r#"<mrow displaystyle="true"><mi>x</mi></mrow>"#));
}
