//! Element match rules used by string `show_on` specifications.
//!
//! A rule is a comma-separated list of complex selectors: compound selectors joined by the
//! descendant (`table td`) or child (`ul > li`) combinator. Each compound selector may combine:
//!
//! - a tag name (`h1`, ASCII case-insensitive) or `*`
//! - `.class`
//! - `#id`
//! - `[attr]`, `[attr=value]`, `[attr="value"]`, `[attr='value']`
//!
//! Combinators are matched right to left against the node's [`Ancestors`], which stop at the
//! editing host. Sibling combinators (`+`, `~`) are rejected. Text nodes never match.

use crate::dom::{Ancestors, Element, Node};
use crate::error::SelectorError;
use regex::Regex;
use std::sync::LazyLock;

static COMPOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<tag>\*|[A-Za-z][A-Za-z0-9-]*)?(?P<rest>(?:[.#][A-Za-z0-9_-]+|\[[A-Za-z_][A-Za-z0-9_:.-]*(?:=(?:"[^"]*"|'[^']*'|[^\]"'\s]*))?\])*)$"#,
    )
    .expect("compound selector pattern is valid")
});

static SIMPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<sigil>[.#])(?P<name>[A-Za-z0-9_-]+)|\[(?P<attr>[A-Za-z_][A-Za-z0-9_:.-]*)(?:=(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\]"'\s]*)))?\]"#,
    )
    .expect("simple selector pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Class(String),
    Id(String),
    HasAttribute(String),
    AttributeEquals(String, String),
}

impl Condition {
    fn matches(&self, el: &Element) -> bool {
        match self {
            Condition::Class(class) => el.has_class(class),
            Condition::Id(id) => el.id() == Some(id.as_str()),
            Condition::HasAttribute(name) => el.attribute(name).is_some(),
            Condition::AttributeEquals(name, value) => el.attribute(name) == Some(value.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    // `None` means any tag (`*` or omitted).
    tag: Option<String>,
    conditions: Vec<Condition>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !el.tag_name().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.conditions.iter().all(|c| c.matches(el))
    }

    fn matches_node(&self, node: &Node) -> bool {
        node.as_element().is_some_and(|el| self.matches(el))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One alternative: the compound the node itself must match, then the compounds its ancestors
/// must match, nearest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    context: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, el: &Element, ancestors: Ancestors<'_>) -> bool {
        self.subject.matches(el) && context_matches(&self.context, ancestors)
    }
}

fn context_matches(steps: &[(Combinator, Compound)], ancestors: Ancestors<'_>) -> bool {
    let Some(((combinator, compound), rest)) = steps.split_first() else {
        return true;
    };
    let mut remaining = ancestors;
    while let Some((node, farther)) = remaining.split_first() {
        if compound.matches_node(node) && context_matches(rest, farther) {
            return true;
        }
        if *combinator == Combinator::Child {
            return false;
        }
        remaining = farther;
    }
    false
}

/// A parsed element match rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a match rule.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = Vec::new();
        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(SelectorError::EmptyAlternative(source.to_string()));
            }
            alternatives.push(parse_complex(part)?);
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The rule text this selector was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the rule uses a descendant or child combinator.
    pub fn has_combinators(&self) -> bool {
        self.alternatives.iter().any(|c| !c.context.is_empty())
    }

    /// Returns `true` if `node` is an element matching any alternative, with no ancestors known.
    pub fn matches(&self, node: &Node) -> bool {
        self.matches_in(node, Ancestors::default())
    }

    /// Returns `true` if `node`, sitting under `ancestors`, matches any alternative.
    pub fn matches_in(&self, node: &Node, ancestors: Ancestors<'_>) -> bool {
        node.as_element().is_some_and(|el| {
            self.alternatives
                .iter()
                .any(|c| c.matches(el, ancestors))
        })
    }

    /// Returns `true` if `el` matches any alternative, with no ancestors known.
    pub fn matches_element(&self, el: &Element) -> bool {
        self.alternatives
            .iter()
            .any(|c| c.matches(el, Ancestors::default()))
    }
}

/// Split one alternative into compounds, each with the combinator linking it to the one before.
///
/// Whitespace and `>` inside `[...]` (quoted or not) belong to the attribute test.
fn split_steps(part: &str) -> Result<Vec<(Option<Combinator>, &str)>, SelectorError> {
    let invalid = || SelectorError::Invalid(part.to_string());
    let mut steps = Vec::new();
    let mut link = None;
    let mut start = None;
    let mut in_brackets = false;
    let mut quote = None;

    for (i, c) in part.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        if in_brackets {
            match c {
                '"' | '\'' => quote = Some(c),
                ']' => in_brackets = false,
                _ => {}
            }
            continue;
        }
        match c {
            '+' | '~' => return Err(SelectorError::UnsupportedCombinator(part.to_string())),
            '>' => {
                if let Some(s) = start.take() {
                    steps.push((link.take(), &part[s..i]));
                }
                if steps.is_empty() || link == Some(Combinator::Child) {
                    return Err(invalid());
                }
                link = Some(Combinator::Child);
            }
            c if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    steps.push((link.take(), &part[s..i]));
                }
                if !steps.is_empty() && link.is_none() {
                    link = Some(Combinator::Descendant);
                }
            }
            _ => {
                if c == '[' {
                    in_brackets = true;
                }
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        steps.push((link.take(), &part[s..]));
    }

    if in_brackets || quote.is_some() || link.is_some() {
        return Err(invalid());
    }
    Ok(steps)
}

fn parse_complex(part: &str) -> Result<Complex, SelectorError> {
    let steps = split_steps(part)?;
    let mut compounds = steps
        .iter()
        .map(|(link, text)| Ok((*link, parse_compound(text)?)))
        .collect::<Result<Vec<_>, SelectorError>>()?;

    let Some((mut link, subject)) = compounds.pop() else {
        return Err(SelectorError::Invalid(part.to_string()));
    };
    let mut context = Vec::with_capacity(compounds.len());
    while let Some((previous_link, compound)) = compounds.pop() {
        let Some(combinator) = link else {
            return Err(SelectorError::Invalid(part.to_string()));
        };
        context.push((combinator, compound));
        link = previous_link;
    }
    Ok(Complex { subject, context })
}

fn parse_compound(part: &str) -> Result<Compound, SelectorError> {
    let Some(caps) = COMPOUND.captures(part) else {
        return Err(SelectorError::Invalid(part.to_string()));
    };

    let tag = caps
        .name("tag")
        .map(|m| m.as_str())
        .filter(|t| *t != "*")
        .map(str::to_ascii_lowercase);

    let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or_default();
    let mut conditions = Vec::new();
    for simple in SIMPLE.captures_iter(rest) {
        if let (Some(sigil), Some(name)) = (simple.name("sigil"), simple.name("name")) {
            let name = name.as_str().to_string();
            conditions.push(match sigil.as_str() {
                "." => Condition::Class(name),
                _ => Condition::Id(name),
            });
            continue;
        }

        let Some(attr) = simple.name("attr") else {
            continue;
        };
        let value = simple
            .name("dq")
            .or_else(|| simple.name("sq"))
            .or_else(|| simple.name("bare"));
        conditions.push(match value {
            Some(value) => {
                Condition::AttributeEquals(attr.as_str().to_string(), value.as_str().to_string())
            }
            None => Condition::HasAttribute(attr.as_str().to_string()),
        });
    }

    if tag.is_none() && conditions.is_empty() && !part.starts_with('*') {
        return Err(SelectorError::Invalid(part.to_string()));
    }

    Ok(Compound { tag, conditions })
}
