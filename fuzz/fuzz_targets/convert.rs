#![no_main]

use latex2mathml::{LatexToMathML, MathDisplay};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let converter = LatexToMathML::default();
    for display in [MathDisplay::Inline, MathDisplay::Block] {
        match converter.convert(data, display) {
            Ok(mathml) => {
                assert!(mathml.starts_with("<math "));
                assert!(mathml.ends_with("</math>"));
            }
            // Every error must point into the decoded input.
            Err(err) => {
                let source = converter.source_text(data);
                assert!(err.0.start <= err.0.end && err.0.end <= source.len());
            }
        }
    }
});
