use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser};
use log::{LevelFilter, Log, Metadata, Record};

use latex2mathml::{LatexError, LatexToMathML, MathDisplay};

mod config_file;
mod replace;

use config_file::load_config_file;
use replace::{ConversionError, Replacer};

/// Converts LaTeX formulas to MathML
#[derive(Parser, Debug)]
#[command(version, about = "Converts LaTeX formulas to MathML", long_about = None)]
struct Args {
    /// The HTML file to process
    #[arg(conflicts_with = "formula", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Reads converter settings from a TOML file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sets the custom delimiter for inline LaTeX formulas
    #[arg(
        long,
        default_value = "$",
        conflicts_with = "formula",
        value_name = "STR"
    )]
    inline_del: String,

    /// Sets the custom delimiter for block LaTeX formulas
    #[arg(
        long,
        default_value = "$$",
        conflicts_with = "formula",
        value_name = "STR"
    )]
    block_del: String,

    /// Sets the custom opening delimiter for inline LaTeX formulas
    #[arg(
        long,
        conflicts_with = "inline_del",
        requires = "inline_close",
        value_name = "STR"
    )]
    inline_open: Option<String>,

    /// Sets the custom closing delimiter for inline LaTeX formulas
    #[arg(
        long,
        conflicts_with = "inline_del",
        requires = "inline_open",
        value_name = "STR"
    )]
    inline_close: Option<String>,

    /// Sets the custom opening delimiter for block LaTeX formulas
    #[arg(
        long,
        conflicts_with = "block_del",
        requires = "block_close",
        value_name = "STR"
    )]
    block_open: Option<String>,

    /// Sets the custom closing delimiter for block LaTeX formulas
    #[arg(
        long,
        conflicts_with = "block_del",
        requires = "block_open",
        value_name = "STR"
    )]
    block_close: Option<String>,

    /// Look recursively for HTML files in the given directory
    #[arg(short, long, conflicts_with = "formula")]
    recursive: bool,

    /// Dry run: convert but don't write anything
    #[arg(long, conflicts_with = "formula")]
    dry_run: bool,

    /// If true, delimiters are ignored that are preceded by a backslash
    #[arg(long, conflicts_with = "formula")]
    ignore_escaped_delim: bool,

    /// If true, the program continues to convert when an error occurs
    #[arg(long, conflicts_with = "formula")]
    continue_on_error: bool,

    /// Specifies a single LaTeX formula
    #[arg(short, long, conflicts_with = "file")]
    formula: Option<String>,

    /// Sets the display style for the formula to "inline"
    #[arg(short, long, conflicts_with = "file", group = "mode")]
    inline: bool,

    /// Sets the display style for the formula to "block"
    #[arg(short, long, conflicts_with = "file", group = "mode")]
    block: bool,

    /// Prints diagnostics to stderr; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let converter = match args.config {
        Some(ref path) => {
            let config = load_config_file(path).unwrap_or_else(|e| {
                eprintln!("Error loading config file '{}': {}", path.display(), e);
                std::process::exit(1);
            });
            log::debug!("loaded config from '{}'", path.display());
            LatexToMathML::new(config.mathml)
        }
        None => LatexToMathML::default(),
    };

    if let Some(ref fpath) = args.file {
        let inline_delim: (&str, &str) = match (&args.inline_open, &args.inline_close) {
            (Some(open), Some(close)) => (open, close),
            _ => (&args.inline_del, &args.inline_del),
        };
        let block_delim: (&str, &str) = match (&args.block_open, &args.block_close) {
            (Some(open), Some(close)) => (open, close),
            _ => (&args.block_del, &args.block_del),
        };
        let replacer = Replacer::new(
            inline_delim,
            block_delim,
            args.ignore_escaped_delim,
            args.continue_on_error,
        );
        if fpath == &PathBuf::from("-") {
            let input = read_stdin();
            match replace(&replacer, &input, &converter) {
                Ok(mathml) => {
                    println!("{mathml}");
                }
                Err(e) => exit_latex_error(e, None),
            };
        } else if args.recursive {
            convert_html_recursive(fpath, &replacer, &converter, args.dry_run);
        } else {
            convert_html(fpath, &replacer, &converter, args.dry_run);
        };
    } else if let Some(ref formula) = args.formula {
        convert_and_exit(&args, formula, &converter);
    } else {
        convert_and_exit(&args, &read_stdin(), &converter);
    }
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        exit_io_error(e);
    }
    buffer
}

fn convert_and_exit(args: &Args, latex: &str, converter: &LatexToMathML) {
    let display = if args.block {
        MathDisplay::Block
    } else {
        MathDisplay::Inline
    };
    match converter.convert(latex, display) {
        Ok(mathml) => println!("{mathml}"),
        Err(e) => exit_formula_error(&e, &converter.source_text(latex)),
    }
}

/// Find LaTeX equations and replace them with MathML.
///
/// The delimiters are configured by the `replacer` argument. Dollar signs that do not enclose a
/// formula must not appear in the input, unless they are escaped and `--ignore-escaped-delim` is
/// given.
fn replace<'source>(
    replacer: &Replacer,
    input: &'source str,
    converter: &LatexToMathML,
) -> Result<String, ConversionError<'source>> {
    replacer.replace(input, |buf, latex, display| {
        match converter.convert(latex, display) {
            Ok(mathml) => {
                buf.push_str(&mathml);
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to convert '{latex}': {}", e.error_message());
                Err(e)
            }
        }
    })
}

/// Convert all LaTeX formulas in all HTML files below `path`.
///
/// `path` can be a file or a directory. Only files with the extension `.html` are converted. A
/// file is only written when its content changed.
fn convert_html_recursive(
    path: &Path,
    replacer: &Replacer,
    converter: &LatexToMathML,
    dry_run: bool,
) {
    if path.is_dir() {
        let dir = fs::read_dir(path).unwrap_or_else(|e| exit_io_error(e));
        for entry in dir.filter_map(Result::ok) {
            convert_html_recursive(entry.path().as_ref(), replacer, converter, dry_run)
        }
    } else if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
        convert_html(path, replacer, converter, dry_run);
    }
}

fn convert_html(fp: &Path, replacer: &Replacer, converter: &LatexToMathML, dry_run: bool) {
    log::debug!("converting '{}'", fp.display());
    let original = fs::read_to_string(fp).unwrap_or_else(|e| exit_io_error(e));
    let converted =
        replace(replacer, &original, converter).unwrap_or_else(|e| exit_latex_error(e, Some(fp)));
    if !dry_run && original != converted {
        let mut fp = fs::File::create(fp).unwrap_or_else(|e| exit_io_error(e));
        fp.write_all(converted.as_bytes())
            .unwrap_or_else(|e| exit_io_error(e));
    }
}

/// Prints a report for `e`. `source` must be the text the error spans point into.
fn exit_formula_error(e: &LatexError, source: &str) -> ! {
    let report = e.to_report("<input>", true);
    if report
        .eprint(("<input>", ariadne::Source::from(source)))
        .is_err()
    {
        eprintln!("Conversion error: {e}");
    }
    std::process::exit(2);
}

fn exit_latex_error<E: std::error::Error>(e: E, fp: Option<&Path>) -> ! {
    eprint!("Conversion error");
    if let Some(fp) = fp {
        eprint!(" in '{}'", fp.display());
    }
    eprintln!(": {e}");
    std::process::exit(2);
}

fn exit_io_error(e: std::io::Error) -> ! {
    eprintln!("IO Error: {e}");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use latex2mathml::{LatexToMathML, MathMLConfig};

    use crate::replace::Replacer;

    #[test]
    fn full_test() {
        let text = r#"
Let us consider a rigid sphere of radius $R$ which is at rest relative to the system ($K$). The
equation of the surface of this sphere, moving with a velocity $v$ relative to $K$, is
$$\xi^2 + \eta^2 + \zeta^2 = R^2$$

At time $t = 0$ the equation is expressed by means of $(x, y, z, t)$ as
$$\frac{ x^2 }{ \left( \sqrt{ 1 - \frac{ v^2 }{ c^2 } } \right)^2 } + y^2 + z^2 = R^2 .$$
"#;
        let converter = LatexToMathML::new(MathMLConfig {
            namespace: String::new(),
            ..Default::default()
        });
        let replacer = Replacer::new(("$", "$"), ("$$", "$$"), false, false);
        let mathml = crate::replace(&replacer, text, &converter).unwrap();
        assert!(!mathml.contains('$'));
        assert_eq!(mathml.matches(r#"<math display="block">"#).count(), 2);
        assert_eq!(mathml.matches(r#"<math display="inline">"#).count(), 6);
        assert!(mathml.starts_with("\nLet us consider a rigid sphere of radius <math"));
    }

    #[test]
    fn keeps_failing_formulas() {
        let converter = LatexToMathML::default();
        let replacer = Replacer::new(("$", "$"), ("$$", "$$"), false, true);
        let output = crate::replace(&replacer, r"bad $\frac{1}$ here", &converter).unwrap();
        assert_eq!(output, r"bad $\frac{1}$ here");
    }
}
