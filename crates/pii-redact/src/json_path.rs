//! Compiled JSON path expressions.
//!
//! Supported syntax, always rooted at `$`:
//!
//! | Form | Selects |
//! |------|---------|
//! | `.name`, `['name']`, `["name"]` | object member |
//! | `.*`, `[*]` | every member or element |
//! | `[2]`, `[-1]` | array element, negative counts from the end |
//! | `[1:3]`, `[:2]`, `[-2:]` | array slice |
//! | `['a','b']`, `[0,2]` | union |
//! | `..name`, `..*`, `..['a']` | recursive descent |
//!
//! Filter and script expressions are rejected at compile time.

use crate::error::JsonPathError;
use serde_json::Value;
use std::collections::HashSet;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// Concrete position of a value inside a document.
pub type Location = Vec<Step>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Name(String),
    Index(i64),
    Wildcard,
    Slice { start: Option<i64>, end: Option<i64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    descendant: bool,
    selectors: Vec<Selector>,
}

/// A compiled JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    source: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Compile a path expression.
    pub fn parse(source: &str) -> Result<Self, JsonPathError> {
        let segments = Parser::new(source).parse()?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The expression as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Locations of every value the path selects, in document order,
    /// without duplicates.
    pub fn select(&self, root: &Value) -> Vec<Location> {
        let mut current: Vec<(Location, &Value)> = vec![(Vec::new(), root)];

        for segment in &self.segments {
            let mut next = Vec::new();
            for (location, node) in current {
                if segment.descendant {
                    let mut stack = Vec::new();
                    collect_descendants(location, node, &mut stack);
                    for (loc, value) in stack {
                        apply_selectors(&segment.selectors, &loc, value, &mut next);
                    }
                } else {
                    apply_selectors(&segment.selectors, &location, node, &mut next);
                }
            }
            current = next;
        }

        let mut seen = HashSet::new();
        current
            .into_iter()
            .map(|(location, _)| location)
            .filter(|location| seen.insert(location.clone()))
            .collect()
    }
}

impl std::str::FromStr for JsonPath {
    type Err = JsonPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Follow `location` from `root` to a mutable value.
pub fn resolve_mut<'a>(root: &'a mut Value, location: &[Step]) -> Option<&'a mut Value> {
    let mut current = root;
    for step in location {
        current = match step {
            Step::Key(key) => current.as_object_mut()?.get_mut(key)?,
            Step::Index(index) => current.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(current)
}

/// Pre-order walk: the node itself, then every descendant.
fn collect_descendants<'a>(location: Location, node: &'a Value, out: &mut Vec<(Location, &'a Value)>) {
    out.push((location.clone(), node));
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let mut loc = location.clone();
                loc.push(Step::Key(key.clone()));
                collect_descendants(loc, child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let mut loc = location.clone();
                loc.push(Step::Index(index));
                collect_descendants(loc, child, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn apply_selectors<'a>(
    selectors: &[Selector],
    location: &Location,
    node: &'a Value,
    out: &mut Vec<(Location, &'a Value)>,
) {
    let child = |step: Step| {
        let mut loc = location.clone();
        loc.push(step);
        loc
    };

    for selector in selectors {
        match (selector, node) {
            (Selector::Name(name), Value::Object(map)) => {
                if let Some(value) = map.get(name) {
                    out.push((child(Step::Key(name.clone())), value));
                }
            }
            (Selector::Index(index), Value::Array(items)) => {
                if let Some(i) = normalize_index(*index, items.len()) {
                    out.push((child(Step::Index(i)), &items[i]));
                }
            }
            (Selector::Wildcard, Value::Object(map)) => {
                for (key, value) in map {
                    out.push((child(Step::Key(key.clone())), value));
                }
            }
            (Selector::Wildcard, Value::Array(items)) => {
                for (i, value) in items.iter().enumerate() {
                    out.push((child(Step::Index(i)), value));
                }
            }
            (Selector::Slice { start, end }, Value::Array(items)) => {
                let (from, to) = slice_bounds(*start, *end, items.len());
                for i in from..to {
                    out.push((child(Step::Index(i)), &items[i]));
                }
            }
            _ => {}
        }
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        Some(resolved as usize)
    } else {
        None
    }
}

fn slice_bounds(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let len = len as i64;
    let clamp = |bound: i64| -> i64 {
        if bound < 0 {
            (len + bound).max(0)
        } else {
            bound.min(len)
        }
    };
    let from = start.map_or(0, clamp);
    let to = end.map_or(len, clamp);
    if from >= to {
        (0, 0)
    } else {
        (from as usize, to as usize)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.trim().chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> JsonPathError {
        JsonPathError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse(mut self) -> Result<Vec<Segment>, JsonPathError> {
        if !self.eat('$') {
            return Err(self.error("path must start with '$'"));
        }

        let mut segments = Vec::new();
        while let Some(c) = self.peek() {
            let segment = match c {
                '.' => {
                    self.pos += 1;
                    if self.eat('.') {
                        let selectors = if self.eat('[') {
                            self.parse_bracket()?
                        } else {
                            vec![self.parse_dot_member()?]
                        };
                        Segment {
                            descendant: true,
                            selectors,
                        }
                    } else {
                        Segment {
                            descendant: false,
                            selectors: vec![self.parse_dot_member()?],
                        }
                    }
                }
                '[' => {
                    self.pos += 1;
                    Segment {
                        descendant: false,
                        selectors: self.parse_bracket()?,
                    }
                }
                other => return Err(self.error(format!("unexpected character '{}'", other))),
            };
            segments.push(segment);
        }

        if segments.is_empty() {
            return Err(self.error("path must select below the root"));
        }
        Ok(segments)
    }

    /// Member name or `*` after a dot.
    fn parse_dot_member(&mut self) -> Result<Selector, JsonPathError> {
        if self.eat('*') {
            return Ok(Selector::Wildcard);
        }
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c != '.' && c != '[' && !c.is_whitespace()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected member name"));
        }
        Ok(Selector::Name(self.chars[start..self.pos].iter().collect()))
    }

    /// Comma-separated selectors after `[`, consuming the closing `]`.
    fn parse_bracket(&mut self) -> Result<Vec<Selector>, JsonPathError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            let selector = match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    Selector::Wildcard
                }
                Some(quote @ ('\'' | '"')) => {
                    self.pos += 1;
                    Selector::Name(self.parse_quoted(quote)?)
                }
                Some('?') | Some('(') => {
                    return Err(self.error("filter and script expressions are not supported"))
                }
                Some(c) if c == '-' || c == ':' || c.is_ascii_digit() => self.parse_index_or_slice()?,
                Some(other) => {
                    return Err(self.error(format!("unexpected character '{}' in brackets", other)))
                }
                None => return Err(self.error("unterminated '['")),
            };
            selectors.push(selector);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(selectors);
            }
            return Err(self.error("expected ',' or ']'"));
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, JsonPathError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some('\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                        _ => return Err(self.error("invalid escape")),
                    }
                    self.pos += 1;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_int(&mut self) -> Result<Option<i64>, JsonPathError> {
        let start = self.pos;
        self.eat('-');
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| self.error(format!("invalid integer '{}'", text)))
    }

    fn parse_index_or_slice(&mut self) -> Result<Selector, JsonPathError> {
        let start = self.parse_int()?;
        self.skip_whitespace();
        if !self.eat(':') {
            return start
                .map(Selector::Index)
                .ok_or_else(|| self.error("expected array index"));
        }
        self.skip_whitespace();
        let end = self.parse_int()?;
        self.skip_whitespace();
        if self.peek() == Some(':') {
            return Err(self.error("slice steps are not supported"));
        }
        Ok(Selector::Slice { start, end })
    }
}
