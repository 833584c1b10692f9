use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::FieldDescriptor;

static COMPOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<tag>[A-Za-z][A-Za-z0-9_-]*)?(?:#(?P<id>[A-Za-z_][A-Za-z0-9_-]*))?(?P<attrs>(?:\[[^\]]*\])*)$",
    )
    .expect("compound selector regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[\s*(?P<name>[A-Za-z_][A-Za-z0-9_-]*)\s*(?:(?P<op>[*^$]?=)\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\]\s"']+))\s*)?\]"#,
    )
    .expect("attribute selector regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Exists,
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrFilter {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
}

impl AttrFilter {
    fn matches(&self, field: &FieldDescriptor) -> bool {
        let Some(actual) = field.attr(self.name.as_str()) else {
            return false;
        };
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == self.value,
            AttrOp::Contains => !self.value.is_empty() && actual.contains(self.value.as_str()),
            AttrOp::StartsWith => !self.value.is_empty() && actual.starts_with(self.value.as_str()),
            AttrOp::EndsWith => !self.value.is_empty() && actual.ends_with(self.value.as_str()),
        }
    }
}

/// One alternative of a selector list: `input#id_cnpj[name*="cnpj"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub attrs: Vec<AttrFilter>,
}

impl CompoundSelector {
    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(field.tag.as_str())
        {
            return false;
        }
        if let Some(id) = &self.id
            && field.id() != Some(id.as_str())
        {
            return false;
        }
        self.attrs.iter().all(|filter| filter.matches(field))
    }
}

/// Comma-separated list of compound selectors; matches when any does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    source: String,
    alternatives: Vec<CompoundSelector>,
}

impl FieldSelector {
    pub fn parse(source: &str) -> Result<Self, SelectorParseError> {
        let mut alternatives = Vec::new();
        for part in split_list(source)? {
            let part = part.trim();
            if part.is_empty() {
                return Err(SelectorParseError::new(source, "empty selector in list"));
            }
            alternatives.push(parse_compound(source, part)?);
        }

        if alternatives.is_empty() {
            return Err(SelectorParseError::new(source, "selector is empty"));
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn alternatives(&self) -> &[CompoundSelector] {
        self.alternatives.as_slice()
    }

    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(field))
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorParseError {
    message: String,
}

impl SelectorParseError {
    fn new(source: &str, message: impl Into<String>) -> Self {
        Self {
            message: format!("{} in selector `{source}`", message.into()),
        }
    }
}

impl fmt::Display for SelectorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for SelectorParseError {}

fn split_list(source: &str) -> Result<Vec<&str>, SelectorParseError> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0usize;

    for (idx, ch) in source.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SelectorParseError::new(source, "unbalanced `]`"))?;
            }
            (None, ',') if depth == 0 => {
                parts.push(&source[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(SelectorParseError::new(source, "unterminated quote"));
    }
    if depth > 0 {
        return Err(SelectorParseError::new(source, "unterminated `[`"));
    }

    parts.push(&source[start..]);
    Ok(parts)
}

fn parse_compound(source: &str, part: &str) -> Result<CompoundSelector, SelectorParseError> {
    let caps = COMPOUND_RE
        .captures(part)
        .ok_or_else(|| SelectorParseError::new(source, format!("cannot parse `{part}`")))?;

    let attrs_src = caps.name("attrs").map(|m| m.as_str()).unwrap_or("");
    let mut attrs = Vec::new();
    let mut consumed = 0usize;
    for attr in ATTR_RE.captures_iter(attrs_src) {
        let whole = attr.get(0).map(|m| m.range()).unwrap_or(0..0);
        if whole.start != consumed {
            break;
        }
        consumed = whole.end;

        let name = attr["name"].to_string();
        let op = match attr.name("op").map(|m| m.as_str()) {
            None => AttrOp::Exists,
            Some("=") => AttrOp::Equals,
            Some("*=") => AttrOp::Contains,
            Some("^=") => AttrOp::StartsWith,
            Some("$=") => AttrOp::EndsWith,
            Some(other) => {
                return Err(SelectorParseError::new(
                    source,
                    format!("unsupported operator `{other}`"),
                ));
            }
        };
        let value = ["dq", "sq", "bare"]
            .iter()
            .find_map(|group| attr.name(group))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        attrs.push(AttrFilter { name, op, value });
    }

    if consumed != attrs_src.len() {
        return Err(SelectorParseError::new(
            source,
            format!("malformed attribute filter in `{part}`"),
        ));
    }

    let tag = caps.name("tag").map(|m| m.as_str().to_string());
    let id = caps.name("id").map(|m| m.as_str().to_string());
    if tag.is_none() && id.is_none() && attrs.is_empty() {
        return Err(SelectorParseError::new(source, format!("cannot parse `{part}`")));
    }

    Ok(CompoundSelector { tag, id, attrs })
}
