//! The symbol table: LaTeX command names to Unicode code points.
//!
//! The table is read once from `data/unimathsymbols.txt` and then shared.

use std::sync::LazyLock;

use log::debug;
use rustc_hash::FxHashMap;

static SYMBOL_DATA: &str = include_str!("../data/unimathsymbols.txt");

static SYMBOLS: LazyLock<FxHashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let symbols = parse_symbols(SYMBOL_DATA);
    debug!("loaded {} symbols", symbols.len());
    symbols
});

/// Names that the data file lacks, mapped either to a code point or to another name.
const ALIASES: [(&str, Alias); 39] = [
    (r"\And", Alias::Name(r"\ampersand")),
    (r"\bigcirc", Alias::Name(r"\lgwhtcircle")),
    (r"\Box", Alias::Name(r"\square")),
    (r"\circledS", Alias::Code("024C8")),
    (r"\diagdown", Alias::Code("02572")),
    (r"\diagup", Alias::Code("02571")),
    (r"\dots", Alias::Code("02026")),
    (r"\dotsb", Alias::Name(r"\cdots")),
    (r"\dotsc", Alias::Code("02026")),
    (r"\dotsi", Alias::Name(r"\cdots")),
    (r"\dotsm", Alias::Name(r"\cdots")),
    (r"\dotso", Alias::Code("02026")),
    (r"\emptyset", Alias::Code("02205")),
    (r"\gggtr", Alias::Code("022D9")),
    (r"\gvertneqq", Alias::Code("02269")),
    (r"\gt", Alias::Name(r"\greater")),
    (r"\ldotp", Alias::Name(r"\period")),
    (r"\llless", Alias::Name(r"\lll")),
    (r"\lt", Alias::Name(r"\less")),
    (r"\lvert", Alias::Name(r"\vert")),
    (r"\lVert", Alias::Name(r"\Vert")),
    (r"\lvertneqq", Alias::Name(r"\lneqq")),
    (r"\ngeqq", Alias::Name(r"\ngeq")),
    (r"\nshortmid", Alias::Name(r"\nmid")),
    (r"\nshortparallel", Alias::Name(r"\nparallel")),
    (r"\nsubseteqq", Alias::Name(r"\nsubseteq")),
    (r"\omicron", Alias::Name(r"\upomicron")),
    (r"\rvert", Alias::Name(r"\vert")),
    (r"\rVert", Alias::Name(r"\Vert")),
    (r"\shortmid", Alias::Name(r"\mid")),
    (r"\smallfrown", Alias::Name(r"\frown")),
    (r"\smallint", Alias::Code("0222B")),
    (r"\smallsmile", Alias::Name(r"\smile")),
    (r"\surd", Alias::Name(r"\sqrt")),
    (r"\thicksim", Alias::Code("0223C")),
    (r"\thickapprox", Alias::Name(r"\approx")),
    (r"\varsubsetneqq", Alias::Name(r"\subsetneqq")),
    (r"\varsupsetneq", Alias::Code("0228B")),
    (r"\varsupsetneqq", Alias::Name(r"\supsetneqq")),
];

enum Alias {
    Code(&'static str),
    Name(&'static str),
}

fn parse_symbols(data: &'static str) -> FxHashMap<&'static str, &'static str> {
    let mut symbols = FxHashMap::default();
    for line in data.lines() {
        if line.starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = line.trim().split('^').collect();
        if columns.len() < 4 {
            continue;
        }
        let code = columns[0];
        for name in [columns[2], columns[3]] {
            if !name.is_empty() {
                symbols.entry(name).or_insert(code);
            }
        }
        if let Some(comments) = columns.last() {
            for name in equivalents(comments) {
                symbols.entry(name).or_insert(code);
            }
        }
    }

    // Aliases are resolved against the table as read from the file.
    let resolved: Vec<(&'static str, &'static str)> = ALIASES
        .iter()
        .filter_map(|(name, alias)| match alias {
            Alias::Code(code) => Some((*name, *code)),
            Alias::Name(target) => symbols.get(target).map(|code| (*name, *code)),
        })
        .collect();
    symbols.extend(resolved);
    // `\mathring` is an accent command, not a symbol.
    symbols.remove(r"\mathring");
    symbols
}

/// Finds the commands named after `=` or `#` in a comment column, like `= \dprime, # \ddprime`.
fn equivalents(comments: &'static str) -> impl Iterator<Item = &'static str> {
    comments
        .match_indices(['=', '#'])
        .filter_map(move |(pos, _)| {
            let rest = comments.get(pos + 1..)?.trim_start();
            let command = rest.strip_prefix('\\')?;
            let len = command
                .find([',', '^', ' '])
                .unwrap_or(command.len());
            if len == 0 {
                return None;
            }
            let start = comments.len() - rest.len();
            comments.get(start..start + 1 + len)
        })
}

/// Looks up the code point of a command, as a hexadecimal string like `"02192"`.
pub fn convert_symbol(name: &str) -> Option<&'static str> {
    SYMBOLS.get(name).copied()
}

/// Looks up the character a command stands for.
pub fn symbol_char(name: &str) -> Option<char> {
    convert_symbol(name).and_then(code_to_char)
}

pub fn code_to_char(code: &str) -> Option<char> {
    u32::from_str_radix(code, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::{convert_symbol, equivalents, symbol_char};

    #[test]
    fn ascii_operator() {
        assert_eq!(convert_symbol("+"), Some("0002B"));
    }

    #[test]
    fn arrow_through_equivalent() {
        assert_eq!(convert_symbol(r"\to"), Some("02192"));
        assert_eq!(symbol_char(r"\rightarrow"), Some('\u{2192}'));
    }

    #[test]
    fn font_letters() {
        assert_eq!(symbol_char(r"\mathbb{R}"), Some('\u{211D}'));
    }

    #[test]
    fn aliases() {
        assert_eq!(symbol_char(r"\lvert"), Some('|'));
        assert_eq!(symbol_char(r"\surd"), Some('\u{221A}'));
        assert_eq!(convert_symbol(r"\dots"), Some("02026"));
    }

    #[test]
    fn accent_is_not_a_symbol() {
        assert_eq!(convert_symbol(r"\mathring"), None);
    }

    #[test]
    fn unknown_command() {
        assert_eq!(convert_symbol(r"\notacommand"), None);
    }

    #[test]
    fn comment_equivalents() {
        let found: Vec<_> = equivalents(r"= \to, # \gets (near), PRIME").collect();
        assert_eq!(found, vec![r"\to", r"\gets"]);
    }
}
