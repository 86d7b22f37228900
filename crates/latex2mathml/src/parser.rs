use std::borrow::Cow;
use std::mem;

use crate::MathDisplay;
use crate::commands::{
    ALIGNAT, APOSTROPHE, BEGIN, CLOSE_BRACE, CLOSE_BRACKET, COLOR, FRAC, FRACTION_LIKE, GENFRAC,
    GENFRAC_STYLES, HREF, LABEL, LEFT, LIMITS, MATRICES, MIDDLE, NOLIMITS, NONUMBER, NOT, NOTAG,
    OF, ONE_PARAM, OPEN_BRACE, OPEN_BRACKET, OPTIONAL_ALIGNMENT, OVERBRACE, OVERSET, PRIME, PROD,
    RIGHT, ROOT, SIDESET, SKEW, SPACING_WITH_WIDTH, SQRT, STYLE, SUBSCRIPT, SUBSUP, SUM,
    SUPERSCRIPT, TAG, TEXT_BEARING, TWO_PARAMS, UNDERBRACE, UNDERSET, VPHANTOM, XLEFTARROW,
    XRIGHTARROW, is_prime, next_prime,
};
use crate::error::{LatexErrKind, LatexError};
use crate::lexer::tokenize;
use crate::node::{Delimiter, Modifier, Node};
use crate::symbols;
use crate::token::{Span, Token};
use crate::token_queue::TokenQueue;

/// Maximum nesting of groups and arguments.
const MAX_DEPTH: usize = 64;

type ParseResult<T> = Result<T, Box<LatexError>>;

/// Parses LaTeX math into a sequence of nodes.
///
/// Comments are skipped. An empty input gives an empty sequence.
pub fn walk(latex: &str, display: MathDisplay) -> ParseResult<Vec<Node<'_>>> {
    let tokens = tokenize(latex, true);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut parser = Parser::new(tokens, latex.len(), matches!(display, MathDisplay::Block));
    parser.parse(Stop::Before(None))
}

pub(crate) struct Parser<'source> {
    tokens: TokenQueue<'source>,
    block: bool,
    depth: usize,
}

/// Where a call to [`Parser::parse`] ends.
#[derive(Debug, Clone, Copy)]
enum Stop<'t> {
    /// At the terminator, which is consumed and kept as the last node.
    Close(&'t str),
    /// Before the terminator, or at the end of the input.
    Before(Option<&'t str>),
    /// After the given number of nodes, or before the terminator.
    Args(Option<&'t str>, usize),
}

/// What a token contributes to the group that is being parsed.
enum Step<'source> {
    Append(Node<'source>),
    /// Nothing to append. The token was discarded, or it already rewrote the group, as `\over`
    /// does with everything before it.
    Continue,
}

impl<'source> Parser<'source> {
    pub(crate) fn new(tokens: Vec<Token<'source>>, input_len: usize, block: bool) -> Self {
        Parser {
            tokens: TokenQueue::new(tokens, input_len),
            block,
            depth: 0,
        }
    }

    fn parse(&mut self, stop: Stop<'_>) -> ParseResult<Vec<Node<'source>>> {
        if self.tokens.is_eoi() {
            return Err(self.error_at_next(LatexErrKind::NoAvailableTokens));
        }
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at_next(LatexErrKind::HardLimitExceeded));
        }
        self.depth += 1;
        let result = self.parse_group(stop);
        self.depth -= 1;
        result
    }

    fn parse_group(&mut self, stop: Stop<'_>) -> ParseResult<Vec<Node<'source>>> {
        let (terminator, limit) = match stop {
            Stop::Close(terminator) => (Some(terminator), 0),
            Stop::Before(terminator) => (terminator, 0),
            Stop::Args(terminator, limit) => (terminator, limit),
        };
        let mut group = Vec::new();
        while let Some(next) = self.tokens.peek() {
            if terminator.is_some_and(|t| next.as_str() == t) {
                if matches!(stop, Stop::Close(_)) {
                    group.push(self.closing_marker());
                }
                break;
            }
            let Some(token) = self.tokens.next() else {
                break;
            };
            match self.parse_token(token, &mut group, terminator)? {
                Step::Append(node) => {
                    group.push(node);
                    if limit > 0 && group.len() >= limit {
                        break;
                    }
                }
                Step::Continue => {}
            }
        }
        Ok(group)
    }

    /// Consumes the terminator. A `\right` also takes its delimiter.
    fn closing_marker(&mut self) -> Node<'source> {
        let mut marker = self
            .tokens
            .next()
            .map(|tok| Node::leaf(tok.into_text()))
            .unwrap_or_default();
        if marker.is(RIGHT)
            && let Some(delimiter) = self.tokens.next()
        {
            marker.delimiter = Some(Delimiter::Single(delimiter.into_text()));
        }
        marker
    }

    /// Parses exactly one node.
    fn parse_argument(&mut self, terminator: Option<&str>) -> ParseResult<Node<'source>> {
        let mut nodes = self.parse(Stop::Args(terminator, 1))?;
        nodes
            .pop()
            .ok_or_else(|| self.error_at_next(LatexErrKind::NoAvailableTokens))
    }

    /// Parses exactly `count` nodes.
    fn parse_arguments(
        &mut self,
        terminator: Option<&str>,
        count: usize,
    ) -> ParseResult<Vec<Node<'source>>> {
        let nodes = self.parse(Stop::Args(terminator, count))?;
        if nodes.len() < count {
            return Err(self.error_at_next(LatexErrKind::NoAvailableTokens));
        }
        Ok(nodes)
    }

    /// Parses whatever is left of the current group, which may be nothing.
    fn parse_rest(&mut self, terminator: Option<&str>) -> ParseResult<Vec<Node<'source>>> {
        if self.tokens.is_eoi() {
            return Ok(Vec::new());
        }
        self.parse(Stop::Before(terminator))
    }

    fn next_text(&mut self) -> Option<Cow<'source, str>> {
        self.tokens.next().map(Token::into_text)
    }

    fn parse_token(
        &mut self,
        token: Token<'source>,
        group: &mut Vec<Node<'source>>,
        terminator: Option<&str>,
    ) -> ParseResult<Step<'source>> {
        let span = token.span();
        let text = token.into_text();
        match self.parse_command(&text, span, group, terminator)? {
            Some(step) => Ok(step),
            None => Ok(Step::Append(Node::leaf(text))),
        }
    }

    /// Handles tokens with structure. Returns `None` for plain symbols.
    fn parse_command(
        &mut self,
        text: &Cow<'source, str>,
        span: Span,
        group: &mut Vec<Node<'source>>,
        terminator: Option<&str>,
    ) -> ParseResult<Option<Step<'source>>> {
        let name = text.as_ref();
        let node = match name {
            RIGHT => return Err(error(span, LatexErrKind::ExtraLeftOrMissingRight)),
            MIDDLE if terminator != Some(RIGHT) => {
                return Err(error(span, LatexErrKind::ExtraLeftOrMissingRight));
            }
            LEFT => self.parse_left(span)?,
            OPEN_BRACE => {
                let mut children = self.parse(Stop::Close(CLOSE_BRACE))?;
                if children.last().is_some_and(|node| node.is(CLOSE_BRACE)) {
                    children.pop();
                }
                Node::braces(children)
            }
            SUBSCRIPT => self.parse_script(SUBSCRIPT, span, group, terminator)?,
            SUPERSCRIPT => self.parse_script(SUPERSCRIPT, span, group, terminator)?,
            APOSTROPHE => parse_apostrophe(span, group)?,
            NOT => return self.parse_not(group, terminator).map(Some),
            COLOR => {
                let Some(color) = self.next_text() else {
                    return Ok(Some(Step::Continue));
                };
                let children = self.parse_rest(terminator)?;
                Node::with_children(COLOR, children).with_attr("mathcolor", color)
            }
            STYLE => {
                let Some(style) = self.next_text() else {
                    return Ok(Some(Step::Continue));
                };
                if self.at_group_end(terminator) {
                    return Ok(Some(Step::Continue));
                }
                let mut node = self.parse_argument(terminator)?;
                node.set_attr("style", style);
                node
            }
            LABEL | TAG => {
                if !self.at_group_end(terminator) {
                    self.parse(Stop::Args(terminator, 1))?;
                }
                return Ok(Some(Step::Continue));
            }
            NOTAG | NONUMBER => return Ok(Some(Step::Continue)),
            HREF => {
                let Some(href) = self.next_text() else {
                    return Ok(Some(Step::Continue));
                };
                let body = self.parse_argument(terminator)?;
                Node::with_children(HREF, vec![body]).with_attr("href", href)
            }
            SQRT => self.parse_sqrt(terminator)?,
            ROOT => self.parse_plain_root(terminator)?,
            GENFRAC => self.parse_genfrac(span, terminator)?,
            SIDESET => self.parse_sideset(terminator)?,
            SKEW => self.parse_skew(span, terminator)?,
            XLEFTARROW | XRIGHTARROW => {
                let first = self.parse_argument(terminator)?;
                let children = if first.is(OPEN_BRACKET) {
                    let below = self.parse_bracketed()?;
                    let above = self.parse_argument(terminator)?;
                    vec![Node::braces(below), above]
                } else {
                    vec![first]
                };
                Node::with_children(text.clone(), children)
            }
            _ if name.starts_with(BEGIN) => {
                let Some(node) = self.parse_environment(name, span, terminator)? else {
                    return Ok(None);
                };
                node
            }
            _ if TWO_PARAMS.contains(name) => {
                let mut children = self.parse_arguments(terminator, 2)?;
                if name == OVERSET || name == UNDERSET {
                    children.reverse();
                }
                Node::with_children(text.clone(), children)
            }
            _ if ONE_PARAM.contains(name) || name.starts_with(r"\math") => {
                let arg = self.parse_argument(terminator)?;
                Node::with_children(text.clone(), vec![arg])
            }
            _ if TEXT_BEARING.contains(name) => {
                let mut node = Node::leaf(text.clone());
                if !self.at_group_end(terminator) {
                    node.text = self.next_text();
                }
                node
            }
            _ if SPACING_WITH_WIDTH.contains(name) => {
                let arg = self.parse_argument(terminator)?;
                let mut node = Node::leaf(text.clone());
                if let Some(width) = dimension_of(&arg) {
                    node.set_attr("width", width);
                }
                node
            }
            _ if FRACTION_LIKE.contains(name) => {
                self.parse_fraction_like(name, span, group, terminator)?;
                return Ok(Some(Step::Continue));
            }
            _ if MATRICES.contains(name) => {
                let mut children = self.parse_rest(terminator)?;
                if children.len() == 1 && children[0].is_braces() {
                    children = children
                        .pop()
                        .and_then(|braces| braces.children)
                        .unwrap_or_default();
                }
                let mut node = Node::with_children(text.clone(), children);
                node.alignment = Some(String::new());
                node
            }
            _ => return Ok(None),
        };
        Ok(Some(Step::Append(node)))
    }

    fn at_group_end(&self, terminator: Option<&str>) -> bool {
        match self.tokens.peek() {
            None => true,
            Some(tok) => terminator.is_some_and(|t| tok.as_str() == t),
        }
    }

    /// Parses up to the closing `]`, which is dropped.
    fn parse_bracketed(&mut self) -> ParseResult<Vec<Node<'source>>> {
        let mut nodes = self.parse(Stop::Close(CLOSE_BRACKET))?;
        if nodes.last().is_some_and(|node| node.is(CLOSE_BRACKET)) {
            nodes.pop();
        }
        Ok(nodes)
    }

    fn parse_left(&mut self, span: Span) -> ParseResult<Node<'source>> {
        let delimiter = self.next_text();
        let children = self
            .parse(Stop::Close(RIGHT))
            .map_err(|err| remap_missing(err, span, LatexErrKind::ExtraLeftOrMissingRight))?;
        if !children.last().is_some_and(|node| node.is(RIGHT)) {
            return Err(error(span, LatexErrKind::ExtraLeftOrMissingRight));
        }
        let mut node = Node::with_children(LEFT, children);
        node.delimiter = delimiter.map(Delimiter::Single);
        Ok(node)
    }

    fn parse_script(
        &mut self,
        kind: &'static str,
        span: Span,
        group: &mut Vec<Node<'source>>,
        terminator: Option<&str>,
    ) -> ParseResult<Node<'source>> {
        let mut previous = group.pop().unwrap_or_else(Node::empty);

        if kind == SUBSCRIPT && (previous.is(SUBSCRIPT) || previous.is(SUBSUP)) {
            return Err(error(span, LatexErrKind::DoubleSubscripts));
        }
        let primed = previous
            .child(1)
            .is_some_and(|sup| is_prime(&sup.token));
        if kind == SUPERSCRIPT
            && (previous.is(SUBSUP) || (previous.is(SUPERSCRIPT) && !primed))
        {
            return Err(error(span, LatexErrKind::DoubleSuperscripts));
        }

        let mut modifier = None;
        if previous.is(LIMITS) || previous.is(NOLIMITS) {
            modifier = Some(if previous.is(LIMITS) {
                Modifier::Limits
            } else {
                Modifier::NoLimits
            });
            previous = match group.pop() {
                Some(base) if base.is_command() => base,
                _ => return Err(error(span, LatexErrKind::LimitsMustFollowMathOperator)),
            };
        } else if self.block && (previous.is(SUM) || previous.is(PROD)) {
            modifier = Some(Modifier::Limits);
        }

        let script_kind = previous.token.clone();
        if previous.children.is_some() && (script_kind == SUBSCRIPT || script_kind == SUPERSCRIPT) {
            let arg = self.parse_script_argument(span, terminator)?;
            let inherited = previous.modifier;
            let mut children = previous.children.take().unwrap_or_default();
            let node = if script_kind == SUPERSCRIPT && kind == SUBSCRIPT {
                // `a^b_c` is stored as `a_c^b`.
                children.insert(1, arg);
                Node::with_children(SUBSUP, children)
            } else if script_kind == SUBSCRIPT {
                children.push(arg);
                Node::with_children(SUBSUP, children)
            } else {
                // A primed base: `a'^2` puts the prime and the exponent together.
                let rest = children.split_off(1.min(children.len()));
                let mut sup = rest;
                sup.push(arg);
                children.push(Node::braces(sup));
                Node::with_children(SUPERSCRIPT, children)
            };
            return Ok(Node {
                modifier: inherited,
                ..node
            });
        }

        let arg = self.parse_script_argument(span, terminator)?;
        if previous.is(OVERBRACE) {
            modifier = Some(Modifier::Overbrace);
        } else if previous.is(UNDERBRACE) {
            modifier = Some(Modifier::Underbrace);
        }
        Ok(Node {
            modifier,
            ..Node::with_children(kind, vec![previous, arg])
        })
    }

    fn parse_script_argument(
        &mut self,
        span: Span,
        terminator: Option<&str>,
    ) -> ParseResult<Node<'source>> {
        self.parse_argument(terminator)
            .map_err(|err| remap_missing(err, span, LatexErrKind::MissingSuperScriptOrSubscript))
    }

    /// `\not\in` becomes `\nin` if the symbol table has it; otherwise `\not` stays in front.
    fn parse_not(
        &mut self,
        group: &mut Vec<Node<'source>>,
        terminator: Option<&str>,
    ) -> ParseResult<Step<'source>> {
        if self.at_group_end(terminator) {
            return Ok(Step::Append(Node::leaf(NOT)));
        }
        let Some(next) = self.parse(Stop::Args(terminator, 1))?.pop() else {
            return Ok(Step::Append(Node::leaf(NOT)));
        };
        if let Some(name) = next.token.strip_prefix('\\') {
            let negated = format!(r"\n{name}");
            if symbols::convert_symbol(&negated).is_some() {
                return Ok(Step::Append(Node::leaf(negated)));
            }
        }
        group.push(Node::leaf(NOT));
        Ok(Step::Append(next))
    }

    fn parse_fraction_like(
        &mut self,
        name: &str,
        span: Span,
        group: &mut Vec<Node<'source>>,
        terminator: Option<&str>,
    ) -> ParseResult<()> {
        let (delimiter, mut thickness): (Option<Delimiter<'source>>, Option<Cow<'source, str>>) =
            match name {
                r"\abovewithdelims" => (Some(self.read_delimiter_pair()), None),
                r"\atopwithdelims" => (Some(self.read_delimiter_pair()), Some("0".into())),
                r"\brace" => (Some(fixed_pair("{", "}")), Some("0".into())),
                r"\brack" => (Some(fixed_pair("[", "]")), Some("0".into())),
                r"\choose" => (Some(fixed_pair("(", ")")), Some("0".into())),
                r"\atop" => (None, Some("0".into())),
                _ => (None, None),
            };
        if name == r"\above" || name == r"\abovewithdelims" {
            let dimension = self.parse_argument(terminator)?;
            thickness = dimension_of(&dimension);
        }
        let optional = name == r"\brace" || name == r"\brack";

        let mut denominator = self.parse_rest(terminator)?;
        if denominator.is_empty() {
            if !optional {
                return Err(error(span, LatexErrKind::DenominatorNotFound));
            }
            denominator.push(Node::braces(Vec::new()));
        }
        if group.is_empty() {
            if !optional {
                return Err(error(span, LatexErrKind::NumeratorNotFound));
            }
            group.push(Node::braces(Vec::new()));
        }

        let denominator = single_or_braces(denominator);
        let numerator = single_or_braces(mem::take(group));
        let mut frac = Node::with_children(FRAC, vec![numerator, denominator]);
        frac.delimiter = delimiter;
        if let Some(thickness) = thickness {
            frac.set_attr("linethickness", thickness);
        }
        group.push(frac);
        Ok(())
    }

    fn read_delimiter_pair(&mut self) -> Delimiter<'source> {
        let open = self.next_text().and_then(delimiter_text);
        let close = self.next_text().and_then(delimiter_text);
        Delimiter::Pair(open, close)
    }

    fn parse_sqrt(&mut self, terminator: Option<&str>) -> ParseResult<Node<'source>> {
        let first = self.parse_argument(terminator)?;
        if !first.is(OPEN_BRACKET) {
            return Ok(Node::with_children(SQRT, vec![first]));
        }
        let degree = self.parse_bracketed()?;
        let radicand = self.parse_argument(terminator)?;
        if degree.is_empty() {
            return Ok(Node::with_children(SQRT, vec![radicand]));
        }
        Ok(Node::with_children(
            ROOT,
            vec![radicand, single_or_braces(degree)],
        ))
    }

    /// Plain TeX `\root 3 \of x`.
    fn parse_plain_root(&mut self, terminator: Option<&str>) -> ParseResult<Node<'source>> {
        let mut degree = self.parse(Stop::Close(OF))?;
        if degree.last().is_some_and(|node| node.is(OF)) {
            degree.pop();
        }
        let radicand = self.parse_argument(terminator)?;
        let degree = if degree.is_empty() {
            Node::braces(Vec::new())
        } else {
            single_or_braces(degree)
        };
        Ok(Node::with_children(ROOT, vec![radicand, degree]))
    }

    /// `\genfrac{(}{)}{0pt}{1}{a}{b}`. The fraction is wrapped in a group that starts with the
    /// style switch.
    fn parse_genfrac(&mut self, span: Span, terminator: Option<&str>) -> ParseResult<Node<'source>> {
        let open = self.read_genfrac_delimiter()?;
        let close = self.read_genfrac_delimiter()?;
        let params = self.parse_arguments(terminator, 2)?;
        let thickness = dimension_of(&params[0]);
        let style = genfrac_style(&params[1], span)?;
        let children = self.parse_arguments(terminator, 2)?;

        let mut frac = Node::with_children(GENFRAC, children);
        frac.delimiter = Some(Delimiter::Pair(open, close));
        if let Some(thickness) = thickness {
            frac.set_attr("linethickness", thickness);
        }
        Ok(Node::braces(vec![Node::leaf(style), frac]))
    }

    fn read_genfrac_delimiter(&mut self) -> ParseResult<Option<Cow<'source, str>>> {
        let Some(token) = self.tokens.next() else {
            return Err(self.error_at_next(LatexErrKind::NoAvailableTokens));
        };
        if token.as_str() != OPEN_BRACE {
            return Ok(delimiter_text(token.into_text()));
        }
        if self.tokens.peek_is(CLOSE_BRACE) {
            self.tokens.next();
            return Ok(None);
        }
        let inner = self.next_text();
        if self.tokens.peek_is(CLOSE_BRACE) {
            self.tokens.next();
        }
        Ok(inner.and_then(delimiter_text))
    }

    /// `\sideset{_a^b}{_c^d}\sum`: the left scripts sit on a phantom copy of the operator.
    fn parse_sideset(&mut self, terminator: Option<&str>) -> ParseResult<Node<'source>> {
        let nodes = self.parse_arguments(terminator, 3)?;
        let mut nodes = nodes.into_iter();
        let (Some(left), Some(right), Some(operator)) = (nodes.next(), nodes.next(), nodes.next())
        else {
            return Err(self.error_at_next(LatexErrKind::NoAvailableTokens));
        };
        let operator = Node {
            token: operator.token,
            children: operator.children,
            attributes: vec![("movablelimits", "false".into())],
            ..Default::default()
        };

        let (left_kind, left_scripts) = sideset_scripts(left);
        let mut left_children = vec![Node::with_children(VPHANTOM, vec![operator.clone()])];
        left_children.extend(left_scripts);

        let (right_kind, right_scripts) = sideset_scripts(right);
        let mut right_children = vec![operator];
        right_children.extend(right_scripts);

        Ok(Node::with_children(
            SIDESET,
            vec![
                Node::with_children(left_kind, left_children),
                Node::with_children(right_kind, right_children),
            ],
        ))
    }

    /// `\skew{n}\hat{A}` shifts the accent by `n` mu.
    fn parse_skew(&mut self, span: Span, terminator: Option<&str>) -> ParseResult<Node<'source>> {
        let nodes = self.parse_arguments(terminator, 2)?;
        let mut nodes = nodes.into_iter();
        let (Some(width_node), Some(child)) = (nodes.next(), nodes.next()) else {
            return Err(self.error_at_next(LatexErrKind::NoAvailableTokens));
        };
        let width = if width_node.is_braces() {
            match width_node.child(0) {
                Some(first) => first.token.as_ref(),
                None => return Err(error(span, LatexErrKind::InvalidWidth("".into()))),
            }
        } else {
            width_node.token.as_ref()
        };
        let mu = match width.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value.trunc(),
            _ => return Err(error(span, LatexErrKind::InvalidWidth(width.into()))),
        };
        Ok(Node::with_children(SKEW, vec![child])
            .with_attr("width", format!("{:.3}em", 0.0555 * mu)))
    }

    fn parse_environment(
        &mut self,
        name: &str,
        span: Span,
        terminator: Option<&str>,
    ) -> ParseResult<Option<Node<'source>>> {
        let Some(env) = name
            .strip_prefix(BEGIN)
            .and_then(|rest| rest.strip_prefix('{'))
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            return Ok(None);
        };
        let end = format!(r"\end{{{env}}}");
        let missing_end = || error(span, LatexErrKind::MissingEnd(env.into()));

        if ALIGNAT.contains(env) && !self.at_group_end(terminator) {
            self.parse(Stop::Args(terminator, 1))?;
        }
        let mut children = self.parse(Stop::Close(&end)).map_err(|err| {
            if matches!(err.1, LatexErrKind::NoAvailableTokens) {
                missing_end()
            } else {
                err
            }
        })?;
        if !children.last().is_some_and(|node| node.is(&end)) {
            return Err(missing_end());
        }
        children.pop();

        let alignment = take_alignment(env, &mut children, span)?;
        let mut node = Node::with_children(format!(r"\{env}"), children);
        node.alignment = Some(alignment);
        Ok(Some(node))
    }

    fn error_at_next(&self, kind: LatexErrKind) -> Box<LatexError> {
        error(self.tokens.next_span(), kind)
    }
}

fn error(span: Span, kind: LatexErrKind) -> Box<LatexError> {
    Box::new(LatexError(span.into(), kind))
}

/// Reports running out of input as a more specific error.
fn remap_missing(err: Box<LatexError>, span: Span, kind: LatexErrKind) -> Box<LatexError> {
    if matches!(err.1, LatexErrKind::NoAvailableTokens) {
        error(span, kind)
    } else {
        err
    }
}

fn parse_apostrophe<'source>(
    span: Span,
    group: &mut Vec<Node<'source>>,
) -> ParseResult<Node<'source>> {
    let mut previous = group.pop().unwrap_or_else(Node::empty);
    let has_superscript = (previous.is(SUPERSCRIPT) && previous.child(1).is_some())
        || (previous.is(SUBSUP) && previous.child(2).is_some());
    if has_superscript {
        let token = previous.token.clone();
        let modifier = previous.modifier;
        let mut children = previous.children.take().unwrap_or_default();
        let Some(sup) = children.pop() else {
            return Err(error(span, LatexErrKind::DoubleSuperscripts));
        };
        if !is_prime(&sup.token) {
            return Err(error(span, LatexErrKind::DoubleSuperscripts));
        }
        let primes = match next_prime(&sup.token) {
            Some(next) => Node::leaf(next),
            None => Node::braces(vec![sup, Node::leaf(PRIME)]),
        };
        children.push(primes);
        return Ok(Node {
            modifier,
            ..Node::with_children(token, children)
        });
    }
    if previous.is(SUBSCRIPT) && previous.children.is_some() {
        let modifier = previous.modifier;
        let mut children = previous.children.take().unwrap_or_default();
        children.push(Node::leaf(PRIME));
        return Ok(Node {
            modifier,
            ..Node::with_children(SUBSUP, children)
        });
    }
    Ok(Node::with_children(
        SUPERSCRIPT,
        vec![previous, Node::leaf(PRIME)],
    ))
}

fn single_or_braces(mut nodes: Vec<Node<'_>>) -> Node<'_> {
    if nodes.len() == 1
        && let Some(node) = nodes.pop()
    {
        return node;
    }
    Node::braces(nodes)
}

/// The text of a dimension argument, like `0pt` in `{0pt}`.
fn dimension_of<'source>(node: &Node<'source>) -> Option<Cow<'source, str>> {
    if node.is_braces() {
        node.child(0).map(|first| first.token.clone())
    } else {
        Some(node.token.clone())
    }
}

fn fixed_pair(open: &'static str, close: &'static str) -> Delimiter<'static> {
    Delimiter::Pair(Some(open.into()), Some(close.into()))
}

/// A delimiter token, where `.` stands for none.
fn delimiter_text(text: Cow<'_, str>) -> Option<Cow<'_, str>> {
    (text != ".").then_some(text)
}

/// The style switch for a `\genfrac` style argument, which must be a single digit from 0 to 3.
fn genfrac_style(node: &Node<'_>, span: Span) -> ParseResult<&'static str> {
    let value = match node.children() {
        [only] if node.is_braces() => only.token.as_ref(),
        _ if node.is_braces() => "",
        _ => node.token.as_ref(),
    };
    match value {
        "0" => Ok(GENFRAC_STYLES[0]),
        "1" => Ok(GENFRAC_STYLES[1]),
        "2" => Ok(GENFRAC_STYLES[2]),
        "3" => Ok(GENFRAC_STYLES[3]),
        _ => Err(error(span, LatexErrKind::InvalidStyleForGenfrac)),
    }
}

/// Splits `{_a^b}` into the script kind and the scripts.
fn sideset_scripts(node: Node<'_>) -> (&'static str, Vec<Node<'_>>) {
    if !node.is_braces() {
        return ("", Vec::new());
    }
    let Some(script) = node.children.and_then(|children| children.into_iter().next()) else {
        return ("", Vec::new());
    };
    let kind = match script.token.as_ref() {
        SUBSCRIPT => SUBSCRIPT,
        SUPERSCRIPT => SUPERSCRIPT,
        SUBSUP => SUBSUP,
        _ => return ("", Vec::new()),
    };
    match script.children {
        Some(children) if (2..=3).contains(&children.len()) => {
            (kind, children.into_iter().skip(1).collect())
        }
        _ => ("", Vec::new()),
    }
}

fn is_alignment(token: &str) -> bool {
    matches!(token, "l" | "c" | "r" | "|")
}

/// Takes a column specification off the front of an environment body.
///
/// `[rl]` is accepted by the environments that allow it; a leading `{cc}` is a specification if
/// it only holds alignment letters. For `array` the braced specification is required to be valid.
fn take_alignment(env: &str, children: &mut Vec<Node<'_>>, span: Span) -> ParseResult<String> {
    let mut alignment = String::new();
    let Some(first) = children.first() else {
        return Ok(alignment);
    };
    if OPTIONAL_ALIGNMENT.contains(env) && first.is(OPEN_BRACKET) {
        let mut taken = 1;
        for node in children.iter().skip(1) {
            taken += 1;
            if node.is(CLOSE_BRACKET) {
                break;
            }
            if !is_alignment(&node.token) {
                return Err(error(
                    span,
                    LatexErrKind::InvalidAlignment(node.token.as_ref().into()),
                ));
            }
            alignment.push_str(&node.token);
        }
        children.drain(..taken);
    } else if first.is_braces() {
        match first.children().iter().find(|node| !is_alignment(&node.token)) {
            None => {
                alignment = first.children().iter().map(|node| node.token.as_ref()).collect();
                children.remove(0);
            }
            Some(bad) if env == "array" => {
                return Err(error(
                    span,
                    LatexErrKind::InvalidAlignment(bad.token.as_ref().into()),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(alignment)
}
