//! Turns parsed nodes into MathML elements.
//!
//! Tokens that are not known render as their literal text. The only failure is output that
//! would nest deeper than [`MAX_DEPTH`], which long runs of style switches or big operators
//! produce even when the input itself is flat.

use std::slice;

use log::{trace, warn};
use mathml_renderer::element::{Element, Tag};

use crate::MathDisplay;
use crate::commands::{
    ALIGNED_PAIRS, AMPERSAND, BINOM, BMOD, CASES, CFRAC, CITE, CONVERSIONS, CR, Conversion, DBINOM,
    DFRAC, DIACRITICS, EQNARRAY, FBOX, FENCES, FRAC, FUNCTIONS, Font, FontSlot, GCD, GENFRAC,
    GLOBAL_FONTS, HBOX, HDASHLINE, HFIL, HLINE, HPHANTOM, IDOTSINT, INT, INTOP, LEFT, LIMITS,
    LINE_BREAK, LOCAL_FONTS, MATRICES, MBOX, MKERN, MOD, MOVABLE_LIMITS, MULTLINE, NEG_THIN_SPACE,
    NOLIMITS, NOT, OPERATORNAME, OPERATORS, PMOD, SIDESET, SKEW, SMALLMATRIX, SPACES, SPLIT,
    STYLE_SWITCHES, SUBSCRIPT, SUBSTACK, SUBSUP, SUPERSCRIPT, TBINOM, TEXT_MODE, TFRAC, VPHANTOM,
    XLEFTARROW, XRIGHTARROW, is_big_operator_char, is_operator_char,
};
use crate::node::{Delimiter, Modifier, Node};
use crate::parser::walk;
use crate::symbols;
use crate::text_parser::{Mode, separate_by_mode};

type FontRef = Option<&'static Font>;

const NBSP: char = '\u{A0}';

/// Maximum nesting of converted groups.
pub(crate) const MAX_DEPTH: usize = 256;

/// The output would nest deeper than [`MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepthExceeded;

type ConvResult<T = ()> = Result<T, DepthExceeded>;

/// Converts a sequence of sibling nodes into children of `parent`.
///
/// Style switches and global fonts apply to the siblings that follow them. After a big operator
/// the remaining siblings are grouped into one row.
pub(crate) fn convert_group(
    nodes: &[Node<'_>],
    parent: &mut Element,
    font: FontRef,
    depth: usize,
) -> ConvResult {
    if depth >= MAX_DEPTH {
        return Err(DepthExceeded);
    }
    let depth = depth + 1;
    let mut font = font;
    let mut iter = nodes.iter();
    while let Some(node) = iter.next() {
        let token = node.token.as_ref();

        if let Some(attrs) = STYLE_SWITCHES.get(token) {
            let mut style = Element::new(Tag::Mstyle);
            set_static_attrs(&mut style, attrs);
            set_node_attrs(&mut style, node);
            convert_group(iter.as_slice(), &mut style, font, depth)?;
            parent.push(style);
            break;
        }
        if token == LIMITS || token == NOLIMITS {
            continue;
        }

        if node.children.is_some() && matches!(token, SUBSCRIPT | SUPERSCRIPT | SUBSUP) {
            convert_script(node, parent, font, depth)?;
        } else if CONVERSIONS.contains_key(token) {
            convert_command(node, parent, font, depth)?;
        } else if let Some(local) = LOCAL_FONTS.get(token)
            && node.children.is_some()
        {
            convert_group(node.children(), parent, Some(local), depth)?;
        } else if token.starts_with(r"\math") && node.children.is_some() {
            convert_group(node.children(), parent, font, depth)?;
        } else if let Some(global) = GLOBAL_FONTS.get(token) {
            font = Some(global);
        } else if node.children.is_none() {
            convert_symbol(node, parent, font);
        } else {
            let mut row = Element::new(Tag::Mrow);
            set_node_attrs(&mut row, node);
            convert_group(node.children(), &mut row, font, depth)?;
            parent.push(row);
        }

        if is_big_operator(node) {
            let rest = iter.as_slice();
            if !rest.is_empty() {
                let mut row = Element::new(Tag::Mrow);
                convert_group(rest, &mut row, font, depth)?;
                parent.push(row);
            }
            break;
        }
    }
    Ok(())
}

/// Converts a node that fills exactly one argument slot of its parent, such as the numerator of
/// a fraction. A group that produces more than one element is wrapped in a row.
fn convert_arg(node: &Node<'_>, parent: &mut Element, font: FontRef, depth: usize) -> ConvResult {
    let mut row = Element::new(Tag::Mrow);
    convert_group(slice::from_ref(node), &mut row, font, depth)?;
    match row.into_only_child() {
        Ok(child) => parent.push(child),
        Err(row) => parent.push(row),
    };
    Ok(())
}

fn is_big_operator(node: &Node<'_>) -> bool {
    match node.token.as_ref() {
        INT | INTOP | IDOTSINT => true,
        SUBSCRIPT | SUPERSCRIPT | SUBSUP => node.child(0).is_some_and(is_big_operator),
        token => symbols::symbol_char(token).is_some_and(is_big_operator_char),
    }
}

fn convert_script(
    node: &Node<'_>,
    parent: &mut Element,
    font: FontRef,
    depth: usize,
) -> ConvResult {
    let children = node.children();
    let Some(base) = children.first() else {
        return Ok(());
    };
    if base.is_empty_base() {
        for script in children.iter().skip(1) {
            convert_group(slice::from_ref(script), parent, font, depth)?;
        }
        return Ok(());
    }
    let modifier = node.modifier;
    let tag = match node.token.as_ref() {
        SUBSUP => match modifier {
            Some(Modifier::Limits | Modifier::Overbrace | Modifier::Underbrace) => Tag::Munderover,
            _ if base.is(GCD) => Tag::Munderover,
            _ => Tag::Msubsup,
        },
        SUBSCRIPT => match modifier {
            Some(Modifier::Limits | Modifier::Underbrace) => Tag::Munder,
            _ => Tag::Msub,
        },
        _ => match modifier {
            Some(Modifier::Limits | Modifier::Overbrace) => Tag::Mover,
            _ => Tag::Msup,
        },
    };
    let mut element = Element::new(tag);
    set_node_attrs(&mut element, node);
    for child in children {
        convert_arg(child, &mut element, font, depth)?;
    }
    parent.push(element);
    Ok(())
}

fn set_static_attrs(element: &mut Element, attrs: &[(&'static str, &'static str)]) {
    for (name, value) in attrs {
        element.set_attr(*name, *value);
    }
}

fn set_node_attrs(element: &mut Element, node: &Node<'_>) {
    for (name, value) in &node.attributes {
        element.set_attr(*name, value.as_ref());
    }
}

fn set_font(element: &mut Element, font: FontRef, slot: FontSlot) {
    if let Some(variant) = font.and_then(|font| font.variant(slot)) {
        element.set_attr("mathvariant", variant);
    }
}

/// The character a delimiter token stands for, or the token itself.
fn resolve_delimiter(token: &str) -> String {
    match symbols::symbol_char(token) {
        Some(ch) => ch.to_string(),
        None => token.to_string(),
    }
}

fn mstyle(displaystyle: bool) -> Element {
    Element::new(Tag::Mstyle)
        .with_attr("displaystyle", if displaystyle { "true" } else { "false" })
        .with_attr("scriptlevel", "0")
}

fn mspace(width: impl Into<String>) -> Element {
    Element::new(Tag::Mspace).with_attr("width", width)
}

fn convert_command(
    node: &Node<'_>,
    parent: &mut Element,
    font: FontRef,
    depth: usize,
) -> ConvResult {
    let command = node.token.as_ref();

    let parent = match command {
        SUBSTACK | SMALLMATRIX => {
            parent.push(Element::new(Tag::Mstyle).with_attr("scriptlevel", "1"))
        }
        CASES => {
            let row = parent.push(Element::new(Tag::Mrow));
            row.push(
                Element::with_text(Tag::Mo, "{")
                    .with_attr("stretchy", "true")
                    .with_attr("fence", "true")
                    .with_attr("form", "prefix"),
            );
            row
        }
        DBINOM | DFRAC => parent.push(mstyle(true)),
        TBINOM | HBOX | MBOX | TFRAC => parent.push(mstyle(false)),
        HPHANTOM => parent.push(
            Element::new(Tag::Mpadded)
                .with_attr("height", "0")
                .with_attr("depth", "0"),
        ),
        VPHANTOM => parent.push(Element::new(Tag::Mpadded).with_attr("width", "0")),
        MOD | PMOD => {
            parent.push(mspace("1em"));
            parent
        }
        _ => parent,
    };
    let parent = if command == LEFT {
        parent.push(Element::new(Tag::Mrow))
    } else {
        parent
    };

    let conversion = CONVERSIONS
        .get(command)
        .copied()
        .unwrap_or(Conversion::new(Tag::Mrow, &[]));
    let (alignment, column_lines) = split_alignment(node.alignment.as_deref());

    let is_xarrow = command == XLEFTARROW || command == XRIGHTARROW;
    let (has_under, has_over) = if is_xarrow {
        xarrow_parts(node)
    } else {
        (false, false)
    };
    let tag = match (has_under, has_over) {
        _ if !is_xarrow => conversion.tag,
        (true, true) => Tag::Munderover,
        (true, false) => Tag::Munder,
        (false, true) => Tag::Mover,
        (false, false) => Tag::Mo,
    };

    let mut element = Element::new(tag);
    set_static_attrs(&mut element, conversion.attrs);
    if command != SKEW {
        set_node_attrs(&mut element, node);
    }
    if let Some(lines) = column_lines {
        element.set_attr("columnlines", lines);
    }
    if is_xarrow && tag == Tag::Mo {
        element.set_attr("stretchy", "true");
    }

    append_prefix(node, parent);

    // Elements that follow `element` as siblings.
    let mut after = Vec::new();
    let arrow = if command == XLEFTARROW { "\u{2190}" } else { "\u{2192}" };
    match command {
        r"\lim" | r"\sup" | r"\inf" | r"\max" | r"\min" => {
            element.set_text(command.trim_start_matches('\\'));
        }
        MOD | PMOD => {
            element.set_text("mod");
            after.push(mspace("0.333em"));
        }
        BMOD => element.set_text("mod"),
        _ if is_xarrow && tag == Tag::Mo => element.set_text(arrow),
        _ if is_xarrow => {
            element
                .push(Element::new(Tag::Mstyle).with_attr("scriptlevel", "0"))
                .push(Element::with_text(Tag::Mo, arrow));
        }
        CITE => {
            let text = node.text.as_deref().unwrap_or_default();
            element.set_text(format!("[{text}]"));
        }
        _ if TEXT_MODE.contains(command) => {
            let text = node.text.as_deref().unwrap_or_default();
            if command == FBOX {
                let template = Element::new(Tag::Mtext);
                let spans = text_spans(text, &template, font, depth)?;
                if spans.is_empty() {
                    element.push(template);
                }
                for span in spans {
                    element.push(span);
                }
            } else {
                let mut spans = text_spans(text, &element, font, depth)?.into_iter();
                match spans.next() {
                    Some(first) => {
                        element = first;
                        after.extend(spans);
                    }
                    None => set_font(&mut element, font, FontSlot::Mtext),
                }
            }
        }
        _ => {
            if let Some(text) = node.text.as_deref() {
                if tag == Tag::Mtext {
                    element.set_text(text.replace(' ', "\u{A0}"));
                    set_font(&mut element, font, FontSlot::Mtext);
                } else {
                    element.set_text(resolve_delimiter(text));
                }
            } else if let Some(Delimiter::Single(delimiter)) = &node.delimiter
                && delimiter != "."
            {
                element.set_text(resolve_delimiter(delimiter));
            }
        }
    }

    let children_beside = matches!(command, LEFT | MOD | PMOD);
    if node.children.is_some() && !children_beside {
        convert_children(node, &mut element, &alignment, font, depth)?;
    }

    if let Some(diacritic) = DIACRITICS.get(command) {
        let mut mark = Element::with_text(Tag::Mo, diacritic.mark);
        set_static_attrs(&mut mark, diacritic.attrs);
        element.push(mark);
    }

    parent.push(element);
    for sibling in after {
        parent.push(sibling);
    }
    if children_beside {
        convert_group(node.children(), parent, font, depth)?;
    }
    append_postfix(node, parent);
    Ok(())
}

/// Whether an extensible arrow has a non-empty text below and above it.
fn xarrow_parts(node: &Node<'_>) -> (bool, bool) {
    let present = |child: Option<&Node<'_>>| {
        child.is_some_and(|child| !(child.is_braces() && child.children().is_empty()))
    };
    match node.children() {
        [above] => (false, present(Some(above))),
        [below, above] => (present(Some(below)), present(Some(above))),
        _ => (false, false),
    }
}

/// Renders the text of a text command: plain spans become copies of `template` holding the text,
/// math spans become rows.
fn text_spans(
    text: &str,
    template: &Element,
    font: FontRef,
    depth: usize,
) -> ConvResult<Vec<Element>> {
    separate_by_mode(text)
        .into_iter()
        .map(|(span, mode)| match mode {
            Mode::Text => {
                let mut mtext = template.clone();
                mtext.set_text(span.replace(' ', "\u{A0}"));
                set_font(&mut mtext, font, FontSlot::Mtext);
                Ok(mtext)
            }
            Mode::Math => match walk(&span, MathDisplay::Inline) {
                Ok(nodes) => {
                    let mut row = Element::new(Tag::Mrow);
                    convert_group(&nodes, &mut row, None, depth)?;
                    Ok(row)
                }
                Err(err) => {
                    warn!("rendering math in text as plain text: {err}");
                    Ok(Element::with_text(Tag::Mtext, span))
                }
            },
        })
        .collect()
}

fn convert_children(
    node: &Node<'_>,
    element: &mut Element,
    alignment: &str,
    font: FontRef,
    depth: usize,
) -> ConvResult {
    let command = node.token.as_ref();
    let children = node.children();
    match command {
        _ if MATRICES.contains(command) => {
            let alignment = if command == CASES {
                "l"
            } else if ALIGNED_PAIRS.contains(command) {
                "rl"
            } else if EQNARRAY.contains(command) {
                "rcl"
            } else {
                alignment
            };
            convert_matrix(children, element, command, alignment, font, depth)?;
        }
        CFRAC => {
            for child in children {
                let style = element.push(mstyle(false));
                convert_group(slice::from_ref(child), style, font, depth)?;
            }
        }
        SIDESET => {
            let [left, right] = children else {
                return convert_group(children, element, font, depth);
            };
            convert_group(slice::from_ref(left), element, font, depth)?;
            element
                .push(Element::new(Tag::Mstyle).with_attr("scriptlevel", "0"))
                .push(mspace(NEG_THIN_SPACE));
            convert_group(slice::from_ref(right), element, font, depth)?;
        }
        SKEW => {
            let Some(child) = children.first() else {
                return Ok(());
            };
            let mut kern = Node::leaf(MKERN);
            kern.attributes = node.attributes.clone();
            let mut inner = child.children().to_vec();
            inner.push(kern);
            let shifted = Node::with_children(child.token.clone(), vec![Node::braces(inner)]);
            convert_group(slice::from_ref(&shifted), element, font, depth)?;
        }
        XLEFTARROW | XRIGHTARROW => {
            for child in children {
                if child.is_braces() && child.children().is_empty() {
                    continue;
                }
                let padded = element.push(
                    Element::new(Tag::Mpadded)
                        .with_attr("width", "+0.833em")
                        .with_attr("lspace", "0.556em")
                        .with_attr("voffset", "-.2em")
                        .with_attr("height", "-.2em"),
                );
                convert_group(slice::from_ref(child), padded, font, depth)?;
                padded.push(Element::new(Tag::Mspace).with_attr("depth", ".25em"));
            }
        }
        _ => match element.tag() {
            Tag::Mfrac
            | Tag::Mroot
            | Tag::Mover
            | Tag::Munder
            | Tag::Munderover
            | Tag::Msub
            | Tag::Msup
            | Tag::Msubsup => {
                for child in children {
                    convert_arg(child, element, font, depth)?;
                }
            }
            _ => convert_group(children, element, font, depth)?,
        },
    }
    Ok(())
}

fn matrix_fences(command: &str) -> Option<(&'static str, &'static str)> {
    match command.trim_end_matches('*') {
        r"\pmatrix" => Some(("(", ")")),
        r"\bmatrix" => Some(("[", "]")),
        r"\Bmatrix" => Some(("{", "}")),
        r"\vmatrix" => Some(("|", "|")),
        r"\Vmatrix" => Some(("\u{2016}", "\u{2016}")),
        _ => None,
    }
}

/// The size of a synthesized delimiter, smaller when the surrounding style is not display style.
fn delimiter_size(node: &Node<'_>, parent: &Element) -> &'static str {
    if parent.attr("displaystyle") == Some("false") || node.is(TBINOM) {
        "1.2em"
    } else {
        "2.047em"
    }
}

fn sized_fence(text: String, size: &'static str) -> Element {
    Element::with_text(Tag::Mo, text)
        .with_attr("minsize", size)
        .with_attr("maxsize", size)
}

fn append_prefix(node: &Node<'_>, parent: &mut Element) {
    let size = delimiter_size(node, parent);
    let command = node.token.as_ref();
    if command == PMOD {
        parent.push(Element::with_text(Tag::Mo, "("));
    } else if let Some((open, _)) = matrix_fences(command) {
        parent.push(Element::with_text(Tag::Mo, open));
    } else if matches!(command, BINOM | DBINOM | TBINOM) {
        parent.push(sized_fence("(".to_string(), size));
    } else if matches!(command, FRAC | GENFRAC)
        && let Some(Delimiter::Pair(Some(open), _)) = &node.delimiter
    {
        parent.push(sized_fence(resolve_delimiter(open), size));
    }
}

fn append_postfix(node: &Node<'_>, parent: &mut Element) {
    let size = delimiter_size(node, parent);
    let command = node.token.as_ref();
    if command == PMOD {
        parent.push(Element::with_text(Tag::Mo, ")"));
    } else if let Some((_, close)) = matrix_fences(command) {
        parent.push(Element::with_text(Tag::Mo, close));
    } else if matches!(command, BINOM | DBINOM | TBINOM) {
        parent.push(sized_fence(")".to_string(), size));
    } else if matches!(command, FRAC | GENFRAC)
        && let Some(Delimiter::Pair(_, Some(close))) = &node.delimiter
    {
        parent.push(sized_fence(resolve_delimiter(close), size));
    } else if command == SKEW
        && let Some((_, width)) = node.attributes.iter().find(|(name, _)| *name == "width")
    {
        parent.push(mspace(format!("-{width}")));
    }
}

/// Splits a column specification into the alignment letters and the `columnlines` value.
///
/// A `|` between two columns draws a solid line there. Bars before the first or after the last
/// column are ignored.
fn split_alignment(spec: Option<&str>) -> (String, Option<String>) {
    let Some(spec) = spec else {
        return (String::new(), None);
    };
    let alignment: String = spec.chars().filter(|ch| *ch != '|').collect();
    let columns = alignment.chars().count();
    if columns < 2 {
        return (alignment, None);
    }
    let mut lines = vec!["none"; columns - 1];
    let mut seen = 0;
    for ch in spec.chars() {
        if ch == '|' {
            if (1..columns).contains(&seen) {
                lines[seen - 1] = "solid";
            }
        } else {
            seen += 1;
        }
    }
    if lines.contains(&"solid") {
        (alignment, Some(lines.join(" ")))
    } else {
        (alignment, None)
    }
}

#[derive(Default)]
struct Cell<'a> {
    nodes: Vec<Node<'a>>,
    hfil: Vec<bool>,
}

impl Cell<'_> {
    /// `\hfil` on one side of the content pushes it to the other side.
    fn hfil_alignment(&self) -> Option<&'static str> {
        if self.hfil.len() < 2 || !self.hfil.contains(&true) {
            return None;
        }
        match (self.hfil.first(), self.hfil.last()) {
            (Some(true), Some(false)) => Some("right"),
            (Some(false), Some(true)) => Some("left"),
            _ => None,
        }
    }
}

fn current_cell<'r, 'a>(row: &'r mut Vec<Cell<'a>>) -> &'r mut Cell<'a> {
    if row.is_empty() {
        row.push(Cell::default());
    }
    let last = row.len() - 1;
    &mut row[last]
}

fn column_alignment(letter: char) -> Option<&'static str> {
    match letter {
        'l' => Some("left"),
        'c' => Some("center"),
        'r' => Some("right"),
        _ => None,
    }
}

fn convert_matrix(
    nodes: &[Node<'_>],
    table: &mut Element,
    command: &str,
    alignment: &str,
    font: FontRef,
    depth: usize,
) -> ConvResult {
    let mut rows: Vec<Vec<Cell<'_>>> = Vec::new();
    let mut row: Vec<Cell<'_>> = Vec::new();
    // Rules between row `i` and row `i + 1`, by `i`.
    let mut rules: Vec<(usize, &'static str)> = Vec::new();

    for node in nodes {
        match node.token.as_ref() {
            AMPERSAND => {
                current_cell(&mut row);
                row.push(Cell::default());
            }
            LINE_BREAK | CR => rows.push(std::mem::take(&mut row)),
            HLINE | HDASHLINE => {
                if let Some(above) = rows.len().checked_sub(1)
                    && row.is_empty()
                {
                    let style = if node.is(HLINE) { "solid" } else { "dashed" };
                    rules.push((above, style));
                }
            }
            HFIL => current_cell(&mut row).hfil.push(true),
            _ => {
                let cell = current_cell(&mut row);
                cell.nodes.push(node.clone());
                cell.hfil.push(false);
            }
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }

    if rows.len() > 1 && !rules.is_empty() {
        let mut lines = vec!["none"; rows.len() - 1];
        for (above, style) in rules {
            if let Some(line) = lines.get_mut(above) {
                *line = style;
            }
        }
        if lines.iter().any(|line| *line != "none") {
            table.set_attr("rowlines", lines.join(" "));
        }
    }

    let max_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let letters: Vec<char> = alignment.chars().collect();
    let multline = MULTLINE.contains(command);
    let filler = ALIGNED_PAIRS.contains(command);
    let last_row = rows.len().saturating_sub(1);

    for (row_index, cells) in rows.iter().enumerate() {
        let mtr = table.push(Element::new(Tag::Mtr));
        for column in 0..max_columns {
            let mut mtd = Element::new(Tag::Mtd);
            let align = if multline {
                Some(if row_index == 0 {
                    "left"
                } else if row_index == last_row {
                    "right"
                } else {
                    "center"
                })
            } else if letters.is_empty() {
                None
            } else {
                column_alignment(letters[column % letters.len()])
            };
            let cell = cells.get(column);
            if let Some(align) = cell.and_then(Cell::hfil_alignment).or(align) {
                mtd.set_attr("columnalign", align);
            }
            if filler && column % 2 == 1 {
                mtd.push(Element::new(Tag::Mi));
            }
            if let Some(cell) = cell {
                convert_group(&cell.nodes, &mut mtd, font, depth)?;
            }
            mtr.push(mtd);
        }
    }

    if ALIGNED_PAIRS.contains(command) && command != SPLIT {
        let spacing = vec!["0em 2em"; max_columns / 2];
        if !spacing.is_empty() {
            table.set_attr("columnspacing", spacing.join(" "));
        }
    }
    Ok(())
}

fn is_number(token: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match token.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(token),
    }
}

/// Decodes a `&#x…;` token produced for font-letter shorthands like `\mathbb{R}`.
fn decode_char_reference(token: &str) -> Option<char> {
    token
        .strip_prefix("&#x")
        .and_then(|rest| rest.strip_suffix(';'))
        .and_then(symbols::code_to_char)
}

fn text_element(tag: Tag, text: impl Into<String>, node: &Node<'_>) -> Element {
    let mut element = Element::with_text(tag, text);
    set_node_attrs(&mut element, node);
    element
}

fn convert_symbol(node: &Node<'_>, parent: &mut Element, font: FontRef) {
    let token = node.token.as_ref();

    if is_number(token) {
        let mut mn = text_element(Tag::Mn, token, node);
        set_font(&mut mn, font, FontSlot::Mn);
        parent.push(mn);
    } else if OPERATORS.contains(token) {
        let text = symbols::symbol_char(token).map_or_else(|| token.to_string(), String::from);
        let mut mo = text_element(Tag::Mo, text, node);
        if token == r"\|" {
            mo.set_attr("fence", "false");
        }
        if token == r"\smallint" {
            mo.set_attr("largeop", "false");
        }
        if FENCES.contains(token) {
            mo.set_attr("stretchy", "false");
            set_font(&mut mo, font, FontSlot::Fence);
        } else {
            set_font(&mut mo, font, FontSlot::Mo);
        }
        parent.push(mo);
    } else if let Some(ch) = symbols::symbol_char(token)
        && is_operator_char(ch)
    {
        let mut mo = text_element(Tag::Mo, ch, node);
        set_font(&mut mo, font, FontSlot::Mo);
        parent.push(mo);
    } else if SPACES.contains(token) {
        let mut mtext = text_element(Tag::Mtext, NBSP, node);
        set_font(&mut mtext, font, FontSlot::Mtext);
        parent.push(mtext);
    } else if token == NOT {
        parent
            .push(Element::new(Tag::Mpadded).with_attr("width", "0"))
            .push(Element::with_text(Tag::Mtext, "\u{29F8}"));
    } else if let Some(text) = MOVABLE_LIMITS.get(token) {
        let mut mo = Element::new(Tag::Mo).with_attr("movablelimits", "true");
        set_node_attrs(&mut mo, node);
        mo.push_text(*text);
        set_font(&mut mo, font, FontSlot::Mo);
        parent.push(mo);
    } else if token == IDOTSINT {
        let row = parent.push(Element::new(Tag::Mrow));
        set_node_attrs(row, node);
        for op in ["\u{222B}", "\u{22EF}", "\u{222B}"] {
            row.push(Element::with_text(Tag::Mo, op));
        }
    } else if token == r"\LaTeX" || token == r"\TeX" {
        let row = parent.push(Element::new(Tag::Mrow));
        set_node_attrs(row, node);
        append_logo(row, token == r"\LaTeX", font);
    } else if token.is_empty() {
        parent.push(mspace("0em"));
    } else if let Some(name) = token
        .strip_prefix(OPERATORNAME)
        .and_then(|rest| rest.strip_prefix('{'))
        .and_then(|rest| rest.strip_suffix('}'))
    {
        parent.push(text_element(Tag::Mo, name, node));
    } else if let Some(name) = token.strip_prefix('\\') {
        let text = match symbols::symbol_char(token) {
            Some(ch) => ch.to_string(),
            None if FUNCTIONS.contains(token) => name.to_string(),
            None => {
                trace!("no symbol for {token}, rendering it as text");
                token.to_string()
            }
        };
        let mut mi = text_element(Tag::Mi, text, node);
        set_font(&mut mi, font, FontSlot::Mi);
        parent.push(mi);
    } else if let Some(ch) = decode_char_reference(token) {
        let (tag, slot) = if is_operator_char(ch) {
            (Tag::Mo, FontSlot::Mo)
        } else {
            (Tag::Mi, FontSlot::Mi)
        };
        let mut element = text_element(tag, ch, node);
        set_font(&mut element, font, slot);
        parent.push(element);
    } else {
        let mut mi = text_element(Tag::Mi, token, node);
        set_font(&mut mi, font, FontSlot::Mi);
        parent.push(mi);
    }
}

/// The `\TeX` logo, with the raised small A of `\LaTeX` in front if requested.
fn append_logo(row: &mut Element, latex: bool, font: FontRef) {
    let letter = |text: &str| {
        let mut mi = Element::with_text(Tag::Mi, text);
        set_font(&mut mi, font, FontSlot::Mi);
        mi
    };
    if latex {
        row.push(letter("L"));
        row.push(mspace("-.325em"));
        row.push(
            Element::new(Tag::Mpadded)
                .with_attr("height", "+.21ex")
                .with_attr("depth", "-.21ex")
                .with_attr("voffset", "+.21ex"),
        )
        .push(
            Element::new(Tag::Mstyle)
                .with_attr("displaystyle", "false")
                .with_attr("scriptlevel", "1"),
        )
        .push(Element::new(Tag::Mrow))
        .push(letter("A"));
        row.push(mspace("-.17em"));
    }
    row.push(letter("T"));
    row.push(mspace("-.14em"));
    row.push(
        Element::new(Tag::Mpadded)
            .with_attr("height", "-.5ex")
            .with_attr("depth", "+.5ex")
            .with_attr("voffset", "-.5ex"),
    )
    .push(Element::new(Tag::Mrow))
    .push(letter("E"));
    row.push(mspace("-.115em"));
    row.push(letter("X"));
}

#[cfg(test)]
mod tests {
    use mathml_renderer::element::{Element, Tag};

    use super::{DepthExceeded, MAX_DEPTH, convert_group, is_number, split_alignment};
    use crate::MathDisplay;
    use crate::parser::walk;

    fn convert(latex: &str, display: MathDisplay) -> String {
        let nodes = walk(latex, display).unwrap();
        let mut row = Element::new(Tag::Mrow);
        convert_group(&nodes, &mut row, None, 0).unwrap();
        row.render(false)
    }

    fn inline(latex: &str) -> String {
        convert(latex, MathDisplay::Inline)
    }

    #[test]
    fn numbers() {
        assert!(is_number("12"));
        assert!(is_number("12.5"));
        assert!(!is_number("12."));
        assert!(!is_number(".5"));
        assert!(!is_number("1em"));
    }

    #[test]
    fn column_lines() {
        assert_eq!(split_alignment(Some("c|l")), ("cl".into(), Some("solid".into())));
        assert_eq!(
            split_alignment(Some("|cc|c|")),
            ("ccc".into(), Some("none solid".into()))
        );
        assert_eq!(split_alignment(Some("rl")), ("rl".into(), None));
        assert_eq!(split_alignment(None), (String::new(), None));
    }

    #[test]
    fn leaves() {
        assert_eq!(inline("x"), "<mrow><mi>x</mi></mrow>");
        assert_eq!(inline("3"), "<mrow><mn>3</mn></mrow>");
        assert_eq!(inline("+"), "<mrow><mo>+</mo></mrow>");
        assert_eq!(inline(r"\alpha"), "<mrow><mi>\u{3B1}</mi></mrow>");
        assert_eq!(inline(r"\to"), "<mrow><mo>\u{2192}</mo></mrow>");
        assert_eq!(inline(r"\infty"), "<mrow><mi>\u{221E}</mi></mrow>");
        assert_eq!(inline(r"\sin"), "<mrow><mi>sin</mi></mrow>");
        assert_eq!(inline(r"\foo"), r"<mrow><mi>\foo</mi></mrow>");
    }

    #[test]
    fn fences_do_not_stretch() {
        assert_eq!(
            inline("(x)"),
            r#"<mrow><mo stretchy="false">(</mo><mi>x</mi><mo stretchy="false">)</mo></mrow>"#
        );
    }

    #[test]
    fn font_letter_reference() {
        assert_eq!(inline(r"\mathbb{R}"), "<mrow><mi>\u{211D}</mi></mrow>");
    }

    #[test]
    fn local_font() {
        assert_eq!(
            inline(r"\mathrm{ab}"),
            r#"<mrow><mrow><mi mathvariant="normal">a</mi><mi mathvariant="normal">b</mi></mrow></mrow>"#
        );
    }

    #[test]
    fn global_font_applies_to_later_siblings() {
        assert_eq!(
            inline(r"a \rm b"),
            r#"<mrow><mi>a</mi><mi mathvariant="normal">b</mi></mrow>"#
        );
    }

    #[test]
    fn style_switch_takes_rest() {
        assert_eq!(
            inline(r"a \scriptstyle b c"),
            r#"<mrow><mi>a</mi><mstyle displaystyle="false" scriptlevel="1"><mi>b</mi><mi>c</mi></mstyle></mrow>"#
        );
    }

    #[test]
    fn big_operator_groups_the_rest() {
        assert_eq!(
            inline(r"\int_0^1 f"),
            "<mrow><msubsup><mo>\u{222B}</mo><mn>0</mn><mn>1</mn></msubsup><mrow><mi>f</mi></mrow></mrow>"
        );
    }

    #[test]
    fn sum_in_display_mode() {
        assert_eq!(
            convert(r"\sum_{i}^{n}", MathDisplay::Block),
            "<mrow><munderover><mo>\u{2211}</mo><mrow><mi>i</mi></mrow><mrow><mi>n</mi></mrow></munderover></mrow>"
        );
    }

    #[test]
    fn script_without_base() {
        assert_eq!(inline("^2"), "<mrow><mn>2</mn></mrow>");
    }

    #[test]
    fn fraction() {
        assert_eq!(
            inline(r"\frac{1}{2}"),
            "<mrow><mfrac><mrow><mn>1</mn></mrow><mrow><mn>2</mn></mrow></mfrac></mrow>"
        );
        assert_eq!(
            inline(r"1 \over 2"),
            "<mrow><mfrac><mn>1</mn><mn>2</mn></mfrac></mrow>"
        );
    }

    #[test]
    fn binomial_has_sized_parens() {
        assert_eq!(
            inline(r"\binom{1}{2}"),
            r#"<mrow><mo minsize="2.047em" maxsize="2.047em">(</mo><mfrac linethickness="0"><mrow><mn>1</mn></mrow><mrow><mn>2</mn></mrow></mfrac><mo minsize="2.047em" maxsize="2.047em">)</mo></mrow>"#
        );
    }

    #[test]
    fn left_right() {
        assert_eq!(
            inline(r"\left( x \right)"),
            r#"<mrow><mrow><mo stretchy="true" fence="true" form="prefix">(</mo><mi>x</mi><mo stretchy="true" fence="true" form="postfix">)</mo></mrow></mrow>"#
        );
        assert_eq!(
            inline(r"\left. x \right|"),
            r#"<mrow><mrow><mo stretchy="true" fence="true" form="prefix"/><mi>x</mi><mo stretchy="true" fence="true" form="postfix">|</mo></mrow></mrow>"#
        );
    }

    #[test]
    fn accent() {
        assert_eq!(
            inline(r"\hat{x}"),
            r#"<mrow><mover><mrow><mi>x</mi></mrow><mo stretchy="false">^</mo></mover></mrow>"#
        );
    }

    #[test]
    fn text_with_math() {
        assert_eq!(
            inline(r"\text{if $x$ holds}"),
            "<mrow><mtext>if\u{A0}</mtext><mrow><mi>x</mi></mrow><mtext>\u{A0}holds</mtext></mrow>"
        );
    }

    #[test]
    fn fbox_wraps_text() {
        assert_eq!(
            inline(r"\fbox{a b}"),
            "<mrow><menclose notation=\"box\"><mtext>a\u{A0}b</mtext></menclose></mrow>"
        );
    }

    #[test]
    fn negation() {
        assert_eq!(inline(r"\not\in"), "<mrow><mo>\u{2209}</mo></mrow>");
        assert_eq!(
            inline(r"\not="),
            r#"<mrow><mpadded width="0"><mtext>⧸</mtext></mpadded><mo>=</mo></mrow>"#
        );
    }

    #[test]
    fn operatorname() {
        assert_eq!(inline(r"\operatorname{sn}"), "<mrow><mo>sn</mo></mrow>");
    }

    #[test]
    fn movable_limits() {
        assert_eq!(
            inline(r"\det"),
            r#"<mrow><mo movablelimits="true">det</mo></mrow>"#
        );
    }

    #[test]
    fn color() {
        assert_eq!(
            inline(r"\color{red} x"),
            r#"<mrow><mstyle mathcolor="red"><mi>x</mi></mstyle></mrow>"#
        );
    }

    #[test]
    fn spacing() {
        assert_eq!(
            inline(r"a\,b\hspace{1em}"),
            r#"<mrow><mi>a</mi><mspace width="0.167em"/><mi>b</mi><mspace width="1em"/></mrow>"#
        );
    }

    #[test]
    fn pmod() {
        assert_eq!(
            inline(r"\pmod{p}"),
            r#"<mrow><mspace width="1em"/><mo>(</mo><mi>mod</mi><mspace width="0.333em"/><mrow><mi>p</mi></mrow><mo>)</mo></mrow>"#
        );
    }

    #[test]
    fn matrix_with_rules() {
        assert_eq!(
            inline(r"\begin{array}{c|c} a & b \\ \hline c & d \end{array}"),
            concat!(
                r#"<mrow><mtable columnlines="solid" rowlines="solid">"#,
                r#"<mtr><mtd columnalign="center"><mi>a</mi></mtd><mtd columnalign="center"><mi>b</mi></mtd></mtr>"#,
                r#"<mtr><mtd columnalign="center"><mi>c</mi></mtd><mtd columnalign="center"><mi>d</mi></mtd></mtr>"#,
                "</mtable></mrow>"
            )
        );
    }

    #[test]
    fn ragged_rows_are_padded() {
        assert_eq!(
            inline(r"\begin{matrix} a & b \\ c \end{matrix}"),
            "<mrow><mtable><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr><mtr><mtd><mi>c</mi></mtd><mtd/></mtr></mtable></mrow>"
        );
    }

    #[test]
    fn hfil_alignment() {
        assert_eq!(
            inline(r"\begin{matrix} \hfil a \end{matrix}"),
            r#"<mrow><mtable><mtr><mtd columnalign="right"><mi>a</mi></mtd></mtr></mtable></mrow>"#
        );
    }

    #[test]
    fn logo() {
        assert_eq!(
            inline(r"\TeX"),
            r#"<mrow><mrow><mi>T</mi><mspace width="-.14em"/><mpadded height="-.5ex" depth="+.5ex" voffset="-.5ex"><mrow><mi>E</mi></mrow></mpadded><mspace width="-.115em"/><mi>X</mi></mrow></mrow>"#
        );
    }

    #[test]
    fn xarrow() {
        assert_eq!(
            inline(r"\xrightarrow{f}"),
            r#"<mrow><mover><mstyle scriptlevel="0"><mo>→</mo></mstyle><mpadded width="+0.833em" lspace="0.556em" voffset="-.2em" height="-.2em"><mrow><mi>f</mi></mrow><mspace depth=".25em"/></mpadded></mover></mrow>"#
        );
        assert_eq!(
            inline(r"\xrightarrow{}"),
            r#"<mrow><mo stretchy="true">→</mo></mrow>"#
        );
    }

    #[test]
    fn depth_budget() {
        let input = r"\int ".repeat(MAX_DEPTH + 1);
        let nodes = walk(&input, MathDisplay::Inline).unwrap();
        let mut row = Element::new(Tag::Mrow);
        assert_eq!(convert_group(&nodes, &mut row, None, 0), Err(DepthExceeded));

        let input = r"\int ".repeat(MAX_DEPTH);
        let nodes = walk(&input, MathDisplay::Inline).unwrap();
        let mut row = Element::new(Tag::Mrow);
        assert_eq!(convert_group(&nodes, &mut row, None, 0), Ok(()));

        let nodes = walk("x", MathDisplay::Inline).unwrap();
        let mut row = Element::new(Tag::Mrow);
        assert_eq!(convert_group(&nodes, &mut row, None, MAX_DEPTH), Err(DepthExceeded));
    }
}
