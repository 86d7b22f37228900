//! Static command tables: which commands take arguments, how they map to MathML elements, and
//! which fonts and operators are known.

use mathml_renderer::element::Tag;

pub const BEGIN: &str = r"\begin";
pub const END: &str = r"\end";
pub const OPERATORNAME: &str = r"\operatorname";
pub const LEFT: &str = r"\left";
pub const RIGHT: &str = r"\right";
pub const MIDDLE: &str = r"\middle";
pub const LIMITS: &str = r"\limits";
pub const NOLIMITS: &str = r"\nolimits";
pub const NOT: &str = r"\not";
pub const COLOR: &str = r"\color";
pub const STYLE: &str = r"\style";
pub const HREF: &str = r"\href";
pub const SQRT: &str = r"\sqrt";
pub const ROOT: &str = r"\root";
pub const OF: &str = r"\of";
pub const FRAC: &str = r"\frac";
pub const CFRAC: &str = r"\cfrac";
pub const DFRAC: &str = r"\dfrac";
pub const TFRAC: &str = r"\tfrac";
pub const BINOM: &str = r"\binom";
pub const DBINOM: &str = r"\dbinom";
pub const TBINOM: &str = r"\tbinom";
pub const GENFRAC: &str = r"\genfrac";
pub const OVERSET: &str = r"\overset";
pub const UNDERSET: &str = r"\underset";
pub const OVERBRACE: &str = r"\overbrace";
pub const UNDERBRACE: &str = r"\underbrace";
pub const SIDESET: &str = r"\sideset";
pub const SKEW: &str = r"\skew";
pub const XLEFTARROW: &str = r"\xleftarrow";
pub const XRIGHTARROW: &str = r"\xrightarrow";
pub const LABEL: &str = r"\label";
pub const TAG: &str = r"\tag";
pub const NOTAG: &str = r"\notag";
pub const NONUMBER: &str = r"\nonumber";
pub const HBOX: &str = r"\hbox";
pub const MBOX: &str = r"\mbox";
pub const FBOX: &str = r"\fbox";
pub const CITE: &str = r"\cite";
pub const MOD: &str = r"\mod";
pub const PMOD: &str = r"\pmod";
pub const BMOD: &str = r"\bmod";
pub const HPHANTOM: &str = r"\hphantom";
pub const VPHANTOM: &str = r"\vphantom";
pub const SUBSTACK: &str = r"\substack";
pub const SMALLMATRIX: &str = r"\smallmatrix";
pub const CASES: &str = r"\cases";
pub const SPLIT: &str = r"\split";
pub const SUM: &str = r"\sum";
pub const PROD: &str = r"\prod";
pub const GCD: &str = r"\gcd";
pub const PRIME: &str = r"\prime";
pub const DPRIME: &str = r"\dprime";
pub const TRPRIME: &str = r"\trprime";
pub const QPRIME: &str = r"\qprime";
pub const HLINE: &str = r"\hline";
pub const HDASHLINE: &str = r"\hdashline";
pub const HFIL: &str = r"\hfil";
pub const CR: &str = r"\cr";
pub const LINE_BREAK: &str = r"\\";
pub const MKERN: &str = r"\mkern";
pub const INT: &str = r"\int";
pub const INTOP: &str = r"\intop";
pub const IDOTSINT: &str = r"\idotsint";
pub const NEG_THIN_SPACE: &str = "-0.167em";

pub const SUBSCRIPT: &str = "_";
pub const SUPERSCRIPT: &str = "^";
pub const SUBSUP: &str = "_^";
pub const BRACES: &str = "{}";
pub const OPEN_BRACE: &str = "{";
pub const CLOSE_BRACE: &str = "}";
pub const OPEN_BRACKET: &str = "[";
pub const CLOSE_BRACKET: &str = "]";
pub const APOSTROPHE: &str = "'";
pub const AMPERSAND: &str = "&";

/// Units that turn a number into a single dimension token.
pub const UNITS: [&str; 12] = [
    "in", "mm", "cm", "pt", "em", "ex", "pc", "bp", "dd", "cc", "sp", "mu",
];

/// Commands whose braced argument is captured verbatim by the lexer.
pub static CAPTURE_COMMANDS: phf::Set<&'static str> = phf::phf_set! {
    r"\cite", r"\color", r"\fbox", r"\hbox", r"\href", r"\label", r"\mbox", r"\ref",
    r"\style", r"\tag", r"\text", r"\textbf", r"\textit", r"\textrm", r"\textsf", r"\texttt",
};

/// Fraction commands that accept single digits without braces, as in `\frac12`.
pub static FRAC_SHORTHAND: phf::Set<&'static str> = phf::phf_set! {
    r"\frac", r"\cfrac", r"\dfrac", r"\tfrac",
};

pub static TWO_PARAMS: phf::Set<&'static str> = phf::phf_set! {
    r"\binom", r"\cfrac", r"\dbinom", r"\dfrac", r"\frac", r"\overset", r"\tbinom", r"\tfrac",
    r"\underset",
};

pub static ONE_PARAM: phf::Set<&'static str> = phf::phf_set! {
    r"\acute", r"\bar", r"\Bbb", r"\boldsymbol", r"\boxed", r"\breve", r"\check", r"\dot",
    r"\ddot", r"\dddot", r"\ddddot", r"\grave", r"\hat", r"\hphantom", r"\mathring", r"\mit",
    r"\mod", r"\oldstyle", r"\overbrace", r"\overleftarrow", r"\overleftrightarrow",
    r"\overline", r"\overparen", r"\overrightarrow", r"\phantom", r"\pmod", r"\scr", r"\tilde",
    r"\tt", r"\underbrace", r"\underleftarrow", r"\underline", r"\underparen",
    r"\underrightarrow", r"\underleftrightarrow", r"\vec", r"\vphantom", r"\widehat",
    r"\widetilde",
};

/// Commands that take the following token as literal text.
pub static TEXT_BEARING: phf::Set<&'static str> = phf::phf_set! {
    r"\big", r"\Big", r"\bigg", r"\Bigg",
    r"\bigl", r"\bigm", r"\bigr", r"\Bigl", r"\Bigm", r"\Bigr",
    r"\biggl", r"\biggm", r"\biggr", r"\Biggl", r"\Biggm", r"\Biggr",
    r"\cite", r"\fbox", r"\hbox", r"\mbox", r"\middle", r"\ref",
    r"\text", r"\textbf", r"\textit", r"\textrm", r"\textsf", r"\texttt",
};

/// Commands whose text is split into text and `$...$` math spans when rendered.
pub static TEXT_MODE: phf::Set<&'static str> = phf::phf_set! {
    r"\fbox", r"\hbox", r"\mbox", r"\text", r"\textbf", r"\textit", r"\textrm", r"\textsf",
    r"\texttt",
};

/// Commands whose only argument is a width.
pub static SPACING_WITH_WIDTH: phf::Set<&'static str> = phf::phf_set! {
    r"\hskip", r"\hspace", r"\kern", r"\mkern", r"\mskip", r"\mspace",
};

/// Infix commands that split the surrounding group into numerator and denominator.
pub static FRACTION_LIKE: phf::Set<&'static str> = phf::phf_set! {
    r"\above", r"\abovewithdelims", r"\atop", r"\atopwithdelims", r"\brace", r"\brack",
    r"\choose", r"\over",
};

/// Commands that render as tables, as environments or as plain macros.
pub static MATRICES: phf::Set<&'static str> = phf::phf_set! {
    r"\align", r"\align*", r"\alignat", r"\alignat*", r"\aligned", r"\alignedat",
    r"\array", r"\bmatrix", r"\bmatrix*", r"\Bmatrix", r"\Bmatrix*", r"\cases",
    r"\displaylines", r"\eqnarray", r"\eqnarray*", r"\flalign", r"\flalign*", r"\gather",
    r"\gather*", r"\gathered", r"\matrix", r"\matrix*", r"\multline", r"\multline*",
    r"\pmatrix", r"\pmatrix*", r"\smallmatrix", r"\split", r"\subarray", r"\substack",
    r"\vmatrix", r"\vmatrix*", r"\Vmatrix", r"\Vmatrix*",
};

/// Environments that read an argument (the number of column pairs) before their body.
pub static ALIGNAT: phf::Set<&'static str> = phf::phf_set! {
    "alignat", "alignat*", "alignedat", "alignedat*",
};

/// Environments that accept a bracketed column specification.
pub static OPTIONAL_ALIGNMENT: phf::Set<&'static str> = phf::phf_set! {
    "array", "matrix*", "pmatrix*", "bmatrix*", "Bmatrix*", "vmatrix*", "Vmatrix*", "aligned",
    "gathered",
};

/// Tables whose even columns start with an empty filler, so that `&=` keeps the relation
/// spacing.
pub static ALIGNED_PAIRS: phf::Set<&'static str> = phf::phf_set! {
    r"\align", r"\align*", r"\alignat", r"\alignat*", r"\aligned", r"\alignedat",
    r"\flalign", r"\flalign*", r"\split",
};

pub static EQNARRAY: phf::Set<&'static str> = phf::phf_set! {
    r"\eqnarray", r"\eqnarray*",
};

pub static MULTLINE: phf::Set<&'static str> = phf::phf_set! {
    r"\multline", r"\multline*",
};

/// The element and fixed attributes a command is rendered as.
#[derive(Debug, Clone, Copy)]
pub struct Conversion {
    pub tag: Tag,
    pub attrs: &'static [(&'static str, &'static str)],
}

impl Conversion {
    pub const fn new(tag: Tag, attrs: &'static [(&'static str, &'static str)]) -> Self {
        Conversion { tag, attrs }
    }
}

const ALIGN_TABLE: Conversion =
    Conversion::new(Tag::Mtable, &[("displaystyle", "true"), ("rowspacing", "3pt")]);
const TABLE: Conversion = Conversion::new(Tag::Mtable, &[]);
const MFRAC: Conversion = Conversion::new(Tag::Mfrac, &[]);
const BINOMIAL: Conversion = Conversion::new(Tag::Mfrac, &[("linethickness", "0")]);
const MOVER: Conversion = Conversion::new(Tag::Mover, &[]);
const MUNDER: Conversion = Conversion::new(Tag::Munder, &[]);
const MTEXT: Conversion = Conversion::new(Tag::Mtext, &[]);
const MPHANTOM: Conversion = Conversion::new(Tag::Mphantom, &[]);
const MSPACE: Conversion = Conversion::new(Tag::Mspace, &[]);
const MROW: Conversion = Conversion::new(Tag::Mrow, &[]);
const BOX: Conversion = Conversion::new(Tag::Menclose, &[("notation", "box")]);
const LIMIT_OP: Conversion = Conversion::new(Tag::Mo, &[]);

const BIG_FENCE: Conversion = Conversion::new(
    Tag::Mo,
    &[("stretchy", "true"), ("fence", "true"), ("minsize", "1.2em"), ("maxsize", "1.2em")],
);
const BIG_FENCE_2: Conversion = Conversion::new(
    Tag::Mo,
    &[("stretchy", "true"), ("fence", "true"), ("minsize", "1.623em"), ("maxsize", "1.623em")],
);
const BIG_FENCE_3: Conversion = Conversion::new(
    Tag::Mo,
    &[("stretchy", "true"), ("fence", "true"), ("minsize", "2.047em"), ("maxsize", "2.047em")],
);
const BIG_FENCE_4: Conversion = Conversion::new(
    Tag::Mo,
    &[("stretchy", "true"), ("fence", "true"), ("minsize", "2.470em"), ("maxsize", "2.470em")],
);

pub static CONVERSIONS: phf::Map<&'static str, Conversion> = phf::phf_map! {
    r"\matrix" => TABLE,
    r"\matrix*" => TABLE,
    r"\pmatrix" => TABLE,
    r"\pmatrix*" => TABLE,
    r"\bmatrix" => TABLE,
    r"\bmatrix*" => TABLE,
    r"\Bmatrix" => TABLE,
    r"\Bmatrix*" => TABLE,
    r"\vmatrix" => TABLE,
    r"\vmatrix*" => TABLE,
    r"\Vmatrix" => TABLE,
    r"\Vmatrix*" => TABLE,
    r"\array" => TABLE,
    r"\subarray" => TABLE,
    r"\substack" => TABLE,
    r"\cases" => TABLE,
    r"\smallmatrix" => Conversion::new(
        Tag::Mtable,
        &[("rowspacing", "0.1em"), ("columnspacing", "0.2778em")],
    ),
    r"\displaylines" => Conversion::new(
        Tag::Mtable,
        &[("rowspacing", "0.5em"), ("columnspacing", "1em"), ("displaystyle", "true")],
    ),
    r"\split" => Conversion::new(
        Tag::Mtable,
        &[("displaystyle", "true"), ("columnspacing", "0em"), ("rowspacing", "3pt")],
    ),
    r"\align" => ALIGN_TABLE,
    r"\align*" => ALIGN_TABLE,
    r"\aligned" => ALIGN_TABLE,
    r"\alignat" => ALIGN_TABLE,
    r"\alignat*" => ALIGN_TABLE,
    r"\alignedat" => ALIGN_TABLE,
    r"\flalign" => ALIGN_TABLE,
    r"\flalign*" => ALIGN_TABLE,
    r"\gather" => ALIGN_TABLE,
    r"\gather*" => ALIGN_TABLE,
    r"\gathered" => ALIGN_TABLE,
    r"\multline" => ALIGN_TABLE,
    r"\multline*" => ALIGN_TABLE,
    r"\eqnarray" => ALIGN_TABLE,
    r"\eqnarray*" => ALIGN_TABLE,
    r"\equation" => Conversion::new(Tag::Mrow, &[("displaystyle", "true")]),
    r"\equation*" => Conversion::new(Tag::Mrow, &[("displaystyle", "true")]),
    r"\subequations" => MROW,

    "_" => Conversion::new(Tag::Msub, &[]),
    "^" => Conversion::new(Tag::Msup, &[]),
    "_^" => Conversion::new(Tag::Msubsup, &[]),

    r"\frac" => MFRAC,
    r"\cfrac" => MFRAC,
    r"\dfrac" => MFRAC,
    r"\tfrac" => MFRAC,
    r"\genfrac" => MFRAC,
    r"\binom" => BINOMIAL,
    r"\dbinom" => BINOMIAL,
    r"\tbinom" => BINOMIAL,
    r"\overset" => MOVER,
    r"\underset" => MUNDER,

    r"\acute" => MOVER,
    r"\bar" => MOVER,
    r"\breve" => MOVER,
    r"\check" => MOVER,
    r"\dot" => MOVER,
    r"\ddot" => MOVER,
    r"\dddot" => MOVER,
    r"\ddddot" => MOVER,
    r"\grave" => MOVER,
    r"\hat" => MOVER,
    r"\mathring" => MOVER,
    r"\overbrace" => MOVER,
    r"\overleftarrow" => MOVER,
    r"\overleftrightarrow" => MOVER,
    r"\overline" => MOVER,
    r"\overparen" => MOVER,
    r"\overrightarrow" => MOVER,
    r"\tilde" => MOVER,
    r"\vec" => MOVER,
    r"\widehat" => MOVER,
    r"\widetilde" => MOVER,
    r"\underbrace" => MUNDER,
    r"\underleftarrow" => MUNDER,
    r"\underleftrightarrow" => MUNDER,
    r"\underline" => MUNDER,
    r"\underparen" => MUNDER,
    r"\underrightarrow" => MUNDER,

    r"\," => Conversion::new(Tag::Mspace, &[("width", "0.167em")]),
    r"\:" => Conversion::new(Tag::Mspace, &[("width", "0.222em")]),
    r"\>" => Conversion::new(Tag::Mspace, &[("width", "0.222em")]),
    r"\;" => Conversion::new(Tag::Mspace, &[("width", "0.278em")]),
    r"\!" => Conversion::new(Tag::Mspace, &[("width", "negativethinmathspace")]),
    r"\\" => Conversion::new(Tag::Mspace, &[("linebreak", "newline")]),
    r"\enspace" => Conversion::new(Tag::Mspace, &[("width", "0.5em")]),
    r"\quad" => Conversion::new(Tag::Mspace, &[("width", "1em")]),
    r"\qquad" => Conversion::new(Tag::Mspace, &[("width", "2em")]),
    r"\thinspace" => Conversion::new(Tag::Mspace, &[("width", "thinmathspace")]),
    r"\negthinspace" => Conversion::new(Tag::Mspace, &[("width", "negativethinmathspace")]),
    r"\negmedspace" => Conversion::new(Tag::Mspace, &[("width", "negativemediummathspace")]),
    r"\negthickspace" => Conversion::new(Tag::Mspace, &[("width", "negativethickmathspace")]),
    r"\hskip" => MSPACE,
    r"\hspace" => MSPACE,
    r"\kern" => MSPACE,
    r"\mkern" => MSPACE,
    r"\mskip" => MSPACE,
    r"\mspace" => MSPACE,

    r"\boxed" => BOX,
    r"\fbox" => BOX,

    r"\big" => Conversion::new(Tag::Mo, &[("minsize", "1.2em"), ("maxsize", "1.2em")]),
    r"\Big" => Conversion::new(Tag::Mo, &[("minsize", "1.623em"), ("maxsize", "1.623em")]),
    r"\bigg" => Conversion::new(Tag::Mo, &[("minsize", "2.047em"), ("maxsize", "2.047em")]),
    r"\Bigg" => Conversion::new(Tag::Mo, &[("minsize", "2.470em"), ("maxsize", "2.470em")]),
    r"\bigl" => BIG_FENCE,
    r"\bigm" => BIG_FENCE,
    r"\bigr" => BIG_FENCE,
    r"\Bigl" => BIG_FENCE_2,
    r"\Bigm" => BIG_FENCE_2,
    r"\Bigr" => BIG_FENCE_2,
    r"\biggl" => BIG_FENCE_3,
    r"\biggm" => BIG_FENCE_3,
    r"\biggr" => BIG_FENCE_3,
    r"\Biggl" => BIG_FENCE_4,
    r"\Biggm" => BIG_FENCE_4,
    r"\Biggr" => BIG_FENCE_4,

    r"\lim" => LIMIT_OP,
    r"\sup" => LIMIT_OP,
    r"\inf" => LIMIT_OP,
    r"\max" => LIMIT_OP,
    r"\min" => LIMIT_OP,

    r"\left" => Conversion::new(
        Tag::Mo,
        &[("stretchy", "true"), ("fence", "true"), ("form", "prefix")],
    ),
    r"\middle" => Conversion::new(
        Tag::Mo,
        &[("stretchy", "true"), ("fence", "true"), ("lspace", "0.05em"), ("rspace", "0.05em")],
    ),
    r"\right" => Conversion::new(
        Tag::Mo,
        &[("stretchy", "true"), ("fence", "true"), ("form", "postfix")],
    ),

    r"\color" => Conversion::new(Tag::Mstyle, &[]),
    r"\sqrt" => Conversion::new(Tag::Msqrt, &[]),
    r"\root" => Conversion::new(Tag::Mroot, &[]),
    r"\href" => MROW,

    r"\text" => MTEXT,
    r"\textrm" => MTEXT,
    r"\textbf" => Conversion::new(Tag::Mtext, &[("mathvariant", "bold")]),
    r"\textit" => Conversion::new(Tag::Mtext, &[("mathvariant", "italic")]),
    r"\textsf" => Conversion::new(Tag::Mtext, &[("mathvariant", "sans-serif")]),
    r"\texttt" => Conversion::new(Tag::Mtext, &[("mathvariant", "monospace")]),
    r"\hbox" => MTEXT,
    r"\mbox" => MTEXT,
    r"\cite" => MTEXT,
    r"\ref" => MTEXT,

    r"\phantom" => MPHANTOM,
    r"\hphantom" => MPHANTOM,
    r"\vphantom" => MPHANTOM,
    r"\sideset" => MROW,
    r"\skew" => MROW,
    r"\mod" => Conversion::new(Tag::Mi, &[]),
    r"\pmod" => Conversion::new(Tag::Mi, &[]),
    r"\bmod" => Conversion::new(Tag::Mo, &[]),
    r"\xleftarrow" => MOVER,
    r"\xrightarrow" => MOVER,
};


/// Switches that put the rest of the group into an `<mstyle>`.
pub static STYLE_SWITCHES: phf::Map<&'static str, &'static [(&'static str, &'static str)]> = phf::phf_map! {
    r"\displaystyle" => &[("displaystyle", "true"), ("scriptlevel", "0")],
    r"\textstyle" => &[("displaystyle", "false"), ("scriptlevel", "0")],
    r"\scriptstyle" => &[("displaystyle", "false"), ("scriptlevel", "1")],
    r"\scriptscriptstyle" => &[("displaystyle", "false"), ("scriptlevel", "2")],
    r"\Huge" => &[("mathsize", "2.49em")],
    r"\huge" => &[("mathsize", "2.07em")],
    r"\LARGE" => &[("mathsize", "1.73em")],
    r"\Large" => &[("mathsize", "1.44em")],
    r"\large" => &[("mathsize", "1.2em")],
    r"\normalsize" => &[("mathsize", "1em")],
    r"\scriptsize" => &[("mathsize", "0.7em")],
    r"\small" => &[("mathsize", "0.85em")],
    r"\tiny" => &[("mathsize", "0.5em")],
    r"\Tiny" => &[("mathsize", "0.6em")],
};

/// The `\genfrac` style argument, indexed by its value.
pub const GENFRAC_STYLES: [&str; 4] = [
    r"\displaystyle",
    r"\textstyle",
    r"\scriptstyle",
    r"\scriptscriptstyle",
];

/// The mark an accent command places over (or under) its argument.
#[derive(Debug, Clone, Copy)]
pub struct Diacritic {
    pub mark: &'static str,
    pub attrs: &'static [(&'static str, &'static str)],
}

const fn mark(mark: &'static str) -> Diacritic {
    Diacritic { mark, attrs: &[] }
}

pub static DIACRITICS: phf::Map<&'static str, Diacritic> = phf::phf_map! {
    r"\acute" => mark("\u{B4}"),
    r"\bar" => Diacritic { mark: "\u{AF}", attrs: &[("stretchy", "true")] },
    r"\breve" => mark("\u{2D8}"),
    r"\check" => mark("\u{2C7}"),
    r"\dot" => mark("\u{2D9}"),
    r"\ddot" => mark("\u{A8}"),
    r"\dddot" => mark("\u{20DB}"),
    r"\ddddot" => mark("\u{20DC}"),
    r"\grave" => mark("`"),
    r"\hat" => Diacritic { mark: "^", attrs: &[("stretchy", "false")] },
    r"\mathring" => mark("\u{2DA}"),
    r"\overbrace" => mark("\u{23DE}"),
    r"\overleftarrow" => mark("\u{2190}"),
    r"\overleftrightarrow" => mark("\u{2194}"),
    r"\overline" => Diacritic { mark: "\u{2015}", attrs: &[("accent", "true")] },
    r"\overparen" => mark("\u{23DC}"),
    r"\overrightarrow" => mark("\u{2192}"),
    r"\tilde" => Diacritic { mark: "~", attrs: &[("stretchy", "false")] },
    r"\underbrace" => mark("\u{23DF}"),
    r"\underleftarrow" => mark("\u{2190}"),
    r"\underleftrightarrow" => mark("\u{2194}"),
    r"\underline" => Diacritic { mark: "\u{2015}", attrs: &[("accent", "true")] },
    r"\underparen" => mark("\u{23DD}"),
    r"\underrightarrow" => mark("\u{2192}"),
    r"\vec" => Diacritic { mark: "\u{2192}", attrs: &[("stretchy", "true")] },
    r"\widehat" => mark("^"),
    r"\widetilde" => mark("~"),
};

/// The kinds of elements a font can restyle independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSlot {
    Mi,
    Mn,
    Mo,
    Mtext,
    Fence,
}

/// A `mathvariant` for every slot, with per-slot exceptions.
#[derive(Debug)]
pub struct Font {
    default: Option<&'static str>,
    replacements: &'static [(FontSlot, Option<&'static str>)],
}

impl Font {
    const fn new(
        default: Option<&'static str>,
        replacements: &'static [(FontSlot, Option<&'static str>)],
    ) -> Self {
        Font {
            default,
            replacements,
        }
    }

    pub fn variant(&self, slot: FontSlot) -> Option<&'static str> {
        self.replacements
            .iter()
            .find(|(s, _)| *s == slot)
            .map_or(self.default, |(_, variant)| *variant)
    }
}

const DOUBLE_STRUCK: Font = Font::new(Some("double-struck"), &[(FontSlot::Fence, None)]);
const SCRIPT: Font = Font::new(Some("script"), &[]);
const MONOSPACE: Font = Font::new(Some("monospace"), &[]);

/// Fonts that apply to their argument.
pub static LOCAL_FONTS: phf::Map<&'static str, Font> = phf::phf_map! {
    r"\Bbb" => DOUBLE_STRUCK,
    r"\mathbb" => DOUBLE_STRUCK,
    r"\boldsymbol" => Font::new(
        Some("bold"),
        &[(FontSlot::Mi, Some("bold-italic")), (FontSlot::Mtext, None)],
    ),
    r"\mathbf" => Font::new(Some("bold"), &[]),
    r"\mathcal" => SCRIPT,
    r"\mathscr" => SCRIPT,
    r"\scr" => SCRIPT,
    r"\mathfrak" => Font::new(Some("fraktur"), &[]),
    r"\mathit" => Font::new(Some("italic"), &[]),
    r"\mathrm" => Font::new(None, &[(FontSlot::Mi, Some("normal"))]),
    r"\mathsf" => Font::new(None, &[(FontSlot::Mi, Some("sans-serif"))]),
    r"\mathtt" => MONOSPACE,
    r"\tt" => MONOSPACE,
    r"\mit" => Font::new(Some("italic"), &[(FontSlot::Fence, None), (FontSlot::Mi, None)]),
    r"\oldstyle" => Font::new(Some("normal"), &[]),
};

/// Fonts that switch the style of all following siblings.
pub static GLOBAL_FONTS: phf::Map<&'static str, Font> = phf::phf_map! {
    r"\rm" => Font::new(None, &[(FontSlot::Mi, Some("normal"))]),
    r"\bf" => Font::new(None, &[(FontSlot::Mi, Some("bold"))]),
    r"\it" => Font::new(None, &[(FontSlot::Mi, Some("italic"))]),
    r"\sf" => Font::new(None, &[(FontSlot::Mi, Some("sans-serif"))]),
    r"\cal" => SCRIPT,
    r"\frak" => Font::new(Some("fraktur"), &[]),
};

/// Tokens always rendered as `<mo>`.
pub static OPERATORS: phf::Set<&'static str> = phf::phf_set! {
    "+", "-", "*", "/", "(", ")", "=", ",", "?", "[", "]", "|", r"\|", "!", r"\{", r"\}", ">",
    "<", ".",
    r"\bigotimes", r"\centerdot", r"\dots", r"\dotsc", r"\dotso", r"\gt", r"\ldotp", r"\lt",
    r"\lvert", r"\lVert", r"\lvertneqq", r"\ngeqq", r"\omicron", r"\rvert", r"\rVert", r"\S",
    r"\smallfrown", r"\smallint", r"\smallsmile", r"\surd", r"\varsubsetneqq",
    r"\varsupsetneqq",
};

/// Operators that do not stretch, and take the fence font slot.
pub static FENCES: phf::Set<&'static str> = phf::phf_set! {
    "(", ")", "[", "]", "|", r"\|", r"\{", r"\}", r"\surd",
};

/// Named functions written upright.
pub static FUNCTIONS: phf::Set<&'static str> = phf::phf_set! {
    r"\arccos", r"\arcsin", r"\arctan", r"\cos", r"\cosh", r"\cot", r"\coth", r"\csc", r"\deg",
    r"\dim", r"\exp", r"\hom", r"\ker", r"\ln", r"\lg", r"\log", r"\sec", r"\sin", r"\sinh",
    r"\tan", r"\tanh",
};

/// Operators with movable limits, and the text they are written as.
pub static MOVABLE_LIMITS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    r"\det" => "det",
    r"\gcd" => "gcd",
    r"\intop" => "\u{222B}",
    r"\injlim" => "inj\u{2006}lim",
    r"\liminf" => "lim\u{2006}inf",
    r"\limsup" => "lim\u{2006}sup",
    r"\Pr" => "Pr",
    r"\projlim" => "proj\u{2006}lim",
};

/// Non-breaking space tokens.
pub static SPACES: phf::Set<&'static str> = phf::phf_set! {
    r"\ ", "~", r"\nobreakspace", r"\space",
};

/// The next mark in the `\prime`, `\dprime`, `\trprime`, `\qprime` chain.
pub fn next_prime(prime: &str) -> Option<&'static str> {
    match prime {
        PRIME => Some(DPRIME),
        DPRIME => Some(TRPRIME),
        TRPRIME => Some(QPRIME),
        _ => None,
    }
}

#[inline]
pub fn is_prime(token: &str) -> bool {
    matches!(token, PRIME | DPRIME | TRPRIME | QPRIME)
}

/// Whether a character is an operator that belongs in an `<mo>`.
pub fn is_operator_char(ch: char) -> bool {
    let ordinary = matches!(
        ch,
        '\u{2202}' | '\u{2205}' | '\u{2206}' | '\u{2207}' | '\u{221E}' | '\u{2220}' | '\u{2221}'
            | '\u{2222}' | '\u{22A4}' | '\u{22A5}'
    );
    !ordinary
        && matches!(
            ch,
            '\u{B1}'
                | '\u{D7}'
                | '\u{F7}'
                | '\u{2190}'..='\u{21FF}'
                | '\u{2200}'..='\u{22FF}'
                | '\u{27F0}'..='\u{27FF}'
                | '\u{2900}'..='\u{297F}'
                | '\u{2A00}'..='\u{2AFF}'
        )
}

/// Whether a character is a large operator (sums, products, integrals and the like).
pub fn is_big_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{220F}'..='\u{2211}' | '\u{222B}'..='\u{2233}' | '\u{22C0}'..='\u{22C3}' | '\u{2A00}'..='\u{2A0C}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_replacements() {
        let bold = LOCAL_FONTS.get(r"\boldsymbol").unwrap();
        assert_eq!(bold.variant(FontSlot::Mi), Some("bold-italic"));
        assert_eq!(bold.variant(FontSlot::Mtext), None);
        assert_eq!(bold.variant(FontSlot::Mn), Some("bold"));
        let rm = LOCAL_FONTS.get(r"\mathrm").unwrap();
        assert_eq!(rm.variant(FontSlot::Mi), Some("normal"));
        assert_eq!(rm.variant(FontSlot::Mo), None);
    }

    #[test]
    fn prime_chain() {
        assert_eq!(next_prime(PRIME), Some(DPRIME));
        assert_eq!(next_prime(TRPRIME), Some(QPRIME));
        assert_eq!(next_prime(QPRIME), None);
    }

    #[test]
    fn operator_chars() {
        assert!(is_operator_char('\u{2192}'));
        assert!(is_operator_char('\u{B1}'));
        assert!(!is_operator_char('\u{221E}'));
        assert!(!is_operator_char('x'));
        assert!(is_big_operator_char('\u{2211}'));
        assert!(is_big_operator_char('\u{2210}'));
        assert!(!is_big_operator_char('\u{2212}'));
    }

    #[test]
    fn table_commands_have_conversions() {
        for command in MATRICES.iter() {
            assert!(CONVERSIONS.contains_key(command), "{command}");
        }
        for command in DIACRITICS.keys() {
            assert!(ONE_PARAM.contains(command), "{command}");
        }
    }
}
