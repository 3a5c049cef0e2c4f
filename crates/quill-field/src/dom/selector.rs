//! A small CSS selector engine.
//!
//! Supports type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! (bare, or single- or double-quoted with backslash escapes), compound
//! selectors and the descendant combinator. That covers every selector the
//! widget emits.

use super::memory::MemoryElement;
use super::DomError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class = element.attribute("class").unwrap_or_default();
            let has = |wanted: &String| class.split_ascii_whitespace().any(|c| c == wanted);
            if !self.classes.iter().all(has) {
                return false;
            }
        }
        self.attrs.iter().all(|attr| match (&attr.value, element.attribute(&attr.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(wanted), Some(actual)) => *wanted == actual,
        })
    }
}

/// A parsed selector: compounds separated by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let invalid = |reason: &str| DomError::InvalidSelector {
            selector: source.to_string(),
            reason: reason.to_string(),
        };
        let chars: Vec<char> = source.chars().collect();
        let mut compounds = Vec::new();
        let mut current = Compound::default();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        compounds.push(std::mem::take(&mut current));
                    }
                    i += 1;
                }
                '*' => {
                    if !current.is_empty() {
                        return Err(invalid("`*` must start a compound selector"));
                    }
                    current.tag = Some("*".into());
                    i += 1;
                }
                '#' | '.' => {
                    let (ident, next) = read_ident(&chars, i + 1);
                    if ident.is_empty() {
                        return Err(invalid("expected a name"));
                    }
                    if c == '#' {
                        current.id = Some(ident);
                    } else {
                        current.classes.push(ident);
                    }
                    i = next;
                }
                '[' => {
                    let (attr, next) = read_attr(&chars, i + 1).map_err(|reason| invalid(reason))?;
                    current.attrs.push(attr);
                    i = next;
                }
                c if is_ident_char(c) => {
                    if !current.is_empty() {
                        return Err(invalid("type selector must start a compound selector"));
                    }
                    let (ident, next) = read_ident(&chars, i);
                    current.tag = Some(ident.to_ascii_lowercase());
                    i = next;
                }
                other => return Err(invalid(&format!("unsupported character `{other}`"))),
            }
        }
        if !current.is_empty() {
            compounds.push(current);
        }
        if compounds.is_empty() {
            return Err(invalid("empty selector"));
        }
        Ok(Self { compounds })
    }

    /// Does `element` match, given its ancestors from the root downwards?
    pub fn matches(&self, element: &MemoryElement, ancestors: &[MemoryElement]) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(element) {
            return false;
        }
        let mut remaining = rest.iter().rev().peekable();
        for ancestor in ancestors.iter().rev() {
            match remaining.peek() {
                Some(compound) if compound.matches(ancestor) => {
                    remaining.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        remaining.peek().is_none()
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

/// Read a quoted string body starting after the opening quote. A backslash
/// takes the next character literally.
fn read_quoted(chars: &[char], start: usize, quote: char) -> Result<(String, usize), &'static str> {
    let mut value = String::new();
    let mut i = start;
    loop {
        match chars.get(i) {
            None => return Err("unterminated string"),
            Some(&'\\') => {
                let escaped = chars.get(i + 1).ok_or("unterminated string")?;
                value.push(*escaped);
                i += 2;
            }
            Some(&c) if c == quote => return Ok((value, i + 1)),
            Some(&c) => {
                value.push(c);
                i += 1;
            }
        }
    }
}

fn read_attr(chars: &[char], start: usize) -> Result<(AttrMatch, usize), &'static str> {
    let skip_ws = |mut i: usize| {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        i
    };
    let (name, mut i) = read_ident(chars, skip_ws(start));
    if name.is_empty() {
        return Err("expected an attribute name");
    }
    i = skip_ws(i);
    match chars.get(i) {
        Some(']') => Ok((AttrMatch { name, value: None }, i + 1)),
        Some('=') => {
            i = skip_ws(i + 1);
            let value = match chars.get(i) {
                Some(&quote) if quote == '"' || quote == '\'' => {
                    let (value, next) = read_quoted(chars, i + 1, quote)?;
                    i = next;
                    value
                }
                _ => {
                    let (value, next) = read_ident(chars, i);
                    if value.is_empty() {
                        return Err("expected an attribute value");
                    }
                    i = next;
                    value
                }
            };
            i = skip_ws(i);
            match chars.get(i) {
                Some(']') => Ok((
                    AttrMatch {
                        name,
                        value: Some(value),
                    },
                    i + 1,
                )),
                _ => Err("expected `]`"),
            }
        }
        _ => Err("unsupported attribute selector"),
    }
}
