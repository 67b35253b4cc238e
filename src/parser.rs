use winnow::ModalResult;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, cut_err, delimited, fail, not, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_while};

use crate::ast::{DocumentOp, LineSpec, Rule, RuleSet};
use crate::error::{Diagnostics, Error, Result};

/// Where a rule appears. Free text runs to the end of a top-level rule-string,
/// but stops at a separator inside a `{ ... }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Top,
    Block,
}

impl Scope {
    fn ends_text(self, c: char) -> bool {
        match self {
            Scope::Top => false,
            Scope::Block => is_separator(c) || c == '}',
        }
    }
}

/// Parse every rule-string, replacing the ones that fail with `Rule::NoOp`.
///
/// Each failure is reported to `diagnostics` tagged with its 1-based rule index.
pub fn parse_rule_set<S: AsRef<str>>(sources: &[S], diagnostics: &mut dyn Diagnostics) -> RuleSet {
    let rules = sources
        .iter()
        .enumerate()
        .map(|(i, source)| match parse_rule(source.as_ref()) {
            Ok(rule) => rule,
            Err(e) => {
                diagnostics.warn(e.with_rule(i + 1));
                Rule::NoOp
            }
        })
        .collect();
    RuleSet::new(rules)
}

/// Parse a single rule-string.
pub fn parse_rule(input: &str) -> Result<Rule> {
    delimited(
        multispace0,
        (|i: &mut &str| rule(i, Scope::Top)).context(expected("rule")),
        multispace0,
    )
    .parse(input)
    .map_err(|e| {
        let offset = e.offset();
        let message = if let Some(ctx) = e.inner().context().next() {
            match ctx {
                StrContext::Label(label) => format!("parse error: expected {}", label),
                StrContext::Expected(StrContextValue::Description(desc)) => {
                    format!("parse error: expected {}", desc)
                }
                _ => "parse error: unexpected character".to_string(),
            }
        } else {
            "parse error: unexpected character".to_string()
        };
        Error::at_source(
            format!("{}\n  {}\n  {}^", message, input, " ".repeat(offset)),
            offset,
        )
    })
}

fn expected(desc: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(desc))
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ';'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parser for a single rule, dispatched on its leading syntax.
fn rule(input: &mut &str, scope: Scope) -> ModalResult<Rule> {
    alt((
        if_rule,
        between_rule,
        status_rule,
        long_print_rule,
        short_print_rule,
        |i: &mut &str| substitute_rule(i, scope),
        |i: &mut &str| line_substitute_rule(i, scope),
        document_rule,
    ))
    .parse_next(input)
}

/// Parser for `{ RULES }`. Rules are separated by whitespace or `;`.
fn block(input: &mut &str) -> ModalResult<RuleSet> {
    '{'.parse_next(input)?;
    let rules: Vec<Rule> =
        repeat(0.., preceded(separators, |i: &mut &str| rule(i, Scope::Block)))
            .parse_next(input)?;
    separators.parse_next(input)?;
    cut_err('}')
        .context(expected("rule or closing '}'"))
        .parse_next(input)?;
    Ok(RuleSet::new(rules))
}

fn separators<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., is_separator).parse_next(input)
}

/// A bare word that must not run into further word characters (`sort` but not `sorted`).
fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    terminated(word, not(one_of(is_word_char)))
}

/// Parser for `if/<pattern>/ { ... }`
fn if_rule(input: &mut &str) -> ModalResult<Rule> {
    "if/".parse_next(input)?;
    let pattern = cut_err(closed_pattern).parse_next(input)?;
    multispace0.parse_next(input)?;
    let then = cut_err(block).context(expected("'{'")).parse_next(input)?;
    Ok(Rule::If { pattern, then })
}

/// Parser for `between/<start>/<end>/ { ... }`
fn between_rule(input: &mut &str) -> ModalResult<Rule> {
    "between/".parse_next(input)?;
    let start = cut_err(pattern)
        .context(expected("<start pattern>"))
        .parse_next(input)?;
    cut_err('/')
        .context(expected("'/'"))
        .parse_next(input)?;
    let end = cut_err(closed_pattern).parse_next(input)?;
    multispace0.parse_next(input)?;
    let inner = cut_err(block).context(expected("'{'")).parse_next(input)?;
    Ok(Rule::Between { start, end, inner })
}

/// Parser for `status:<code> { ... } [else { ... }]`
fn status_rule(input: &mut &str) -> ModalResult<Rule> {
    "status:".parse_next(input)?;
    let code: &str = cut_err(take_till(1.., |c: char| c.is_whitespace() || c == '{'))
        .context(expected("<status code>"))
        .parse_next(input)?;
    multispace0.parse_next(input)?;
    let then = cut_err(block).context(expected("'{'")).parse_next(input)?;
    let otherwise = opt(preceded(
        (multispace0, keyword("else"), multispace0),
        cut_err(block).context(expected("'{'")),
    ))
    .parse_next(input)?
    .unwrap_or_default();
    Ok(Rule::Status {
        code: code.to_string(),
        then,
        otherwise,
    })
}

/// Parser for `print`, `print:<spec>` and `print/<pattern>/`
fn long_print_rule(input: &mut &str) -> ModalResult<Rule> {
    "print".parse_next(input)?;
    alt((
        print_selector,
        not(one_of(is_word_char)).value(Rule::PrintAll),
    ))
    .parse_next(input)
}

/// Parser for `p:<spec>` and `p/<pattern>/`
fn short_print_rule(input: &mut &str) -> ModalResult<Rule> {
    'p'.parse_next(input)?;
    print_selector.parse_next(input)
}

/// The part of a print rule after the keyword: `:<spec>` or `/<pattern>/`.
fn print_selector(input: &mut &str) -> ModalResult<Rule> {
    alt((
        preceded(
            ':',
            cut_err(line_spec).context(expected("<line number or range>")),
        )
        .map(Rule::PrintByIndex),
        preceded('/', cut_err(closed_pattern)).map(|pattern| Rule::PrintByPattern { pattern }),
    ))
    .parse_next(input)
}

/// Parser for `s/<pattern>/<replacement>` and `g/<pattern>/<replacement>`
///
/// A single trailing `/` after the replacement is accepted and dropped.
fn substitute_rule(input: &mut &str, scope: Scope) -> ModalResult<Rule> {
    let global = alt(("s/".value(false), "g/".value(true))).parse_next(input)?;
    let pattern = cut_err(pattern)
        .context(expected("<pattern>"))
        .parse_next(input)?;
    cut_err('/')
        .context(expected("'/'"))
        .parse_next(input)?;
    let replacement = text(input, |c| scope.ends_text(c))?;
    opt('/').parse_next(input)?;
    Ok(Rule::Substitute {
        pattern,
        replacement,
        global,
    })
}

/// Parser for `s:<line>:<text>`
fn line_substitute_rule(input: &mut &str, scope: Scope) -> ModalResult<Rule> {
    "s:".parse_next(input)?;
    let line = cut_err(signed)
        .context(expected("<line number>"))
        .parse_next(input)?;
    cut_err(':')
        .context(expected("':'"))
        .parse_next(input)?;
    let text: &str = take_till(0.., |c: char| scope.ends_text(c)).parse_next(input)?;
    Ok(Rule::LineSubstitute {
        line,
        text: text.to_string(),
    })
}

/// Parser for `sort`, `reverse` and `join`
fn document_rule(input: &mut &str) -> ModalResult<Rule> {
    alt((
        keyword("sort").value(DocumentOp::Sort),
        keyword("reverse").value(DocumentOp::Reverse),
        keyword("join").value(DocumentOp::Join),
    ))
    .map(Rule::Document)
    .parse_next(input)
}

/// A non-empty pattern followed by its closing `/`.
fn closed_pattern(input: &mut &str) -> ModalResult<String> {
    let pattern = pattern
        .context(expected("<pattern>"))
        .parse_next(input)?;
    '/'.context(expected("closing '/'")).parse_next(input)?;
    Ok(pattern)
}

/// A non-empty pattern running up to the next unescaped `/`.
fn pattern(input: &mut &str) -> ModalResult<String> {
    let pattern = text(input, |_| false)?;
    if pattern.is_empty() {
        return fail.parse_next(input);
    }
    Ok(pattern)
}

/// Free text up to an unescaped `/` or a character accepted by `stop`.
///
/// `\/` becomes a literal `/`; every other escape is kept for the regex engine.
fn text(input: &mut &str, stop: impl Fn(char) -> bool) -> ModalResult<String> {
    let mut result = String::new();
    loop {
        let chunk: &str =
            take_till(0.., |c: char| c == '\\' || c == '/' || stop(c)).parse_next(input)?;
        result.push_str(chunk);

        if !input.starts_with('\\') {
            return Ok(result);
        }
        '\\'.parse_next(input)?;
        match opt(any).parse_next(input)? {
            Some('/') => result.push('/'),
            Some(c) => {
                result.push('\\');
                result.push(c);
            }
            None => result.push('\\'),
        }
    }
}

/// Parser for `N`, `-N` or `A-B`.
fn line_spec(input: &mut &str) -> ModalResult<LineSpec> {
    alt((
        (unsigned, '-', unsigned).map(|(a, _, b)| LineSpec::Range(a, b)),
        signed.map(LineSpec::Index),
    ))
    .parse_next(input)
}

fn signed(input: &mut &str) -> ModalResult<i64> {
    (opt('-'), unsigned)
        .map(|(neg, n): (Option<char>, i64)| if neg.is_some() { -n } else { n })
        .parse_next(input)
}

fn unsigned(input: &mut &str) -> ModalResult<i64> {
    digit1
        .try_map(|digits: &str| digits.parse::<i64>())
        .parse_next(input)
}
