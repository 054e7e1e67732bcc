//! Message templates and captured arguments
//!
//! Templates use named holes (`"Fetched {Url} in {Attempts} tries"`). Holes
//! bind to arguments positionally; the name becomes the property name and an
//! optional `:format` suffix is kept for structured consumers. `{{` and `}}`
//! escape literal braces.

use std::fmt;

/// An opaque argument captured by value when an operation starts
pub struct Arg(Box<dyn fmt::Display + Send>);

impl Arg {
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + Send + 'static,
    {
        Self(Box::new(value))
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arg({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Hole {
        name: String,
        format: Option<String>,
    },
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template
    ///
    /// Parsing never fails: an unterminated or empty hole is kept as literal
    /// text, so a bad template still renders as written.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(pos) = rest.find(['{', '}']) {
            text.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("{{") {
                text.push('{');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with("}}") {
                text.push('}');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with('}') {
                text.push('}');
                rest = &tail[1..];
                continue;
            }

            match hole(tail) {
                Some((name, format, len)) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Hole { name, format });
                    rest = &tail[len..];
                }
                None => {
                    text.push('{');
                    rest = &tail[1..];
                }
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// `"<name>: {<name>}"`, binding one argument as a named property
    pub(crate) fn property(name: &str) -> Self {
        let escaped = name.replace('{', "{{").replace('}', "}}");
        Self {
            source: format!("{}: {{{}}}", escaped, escaped),
            segments: vec![
                Segment::Text(format!("{}: ", name)),
                Segment::Hole {
                    name: name.to_string(),
                    format: None,
                },
            ],
        }
    }

    /// This template followed by `other`
    pub(crate) fn append(mut self, other: Template) -> Self {
        self.source.push_str(&other.source);
        self.segments.extend(other.segments);
        self
    }

    /// Fit `args` to the holes: surplus arguments are dropped and missing
    /// ones render as the hole itself
    pub(crate) fn fit_args(&self, mut args: Vec<Arg>) -> Vec<Arg> {
        let holes: Vec<String> = self
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Hole { name, format } => Some(match format {
                    Some(format) => format!("{{{}:{}}}", name, format),
                    None => format!("{{{}}}", name),
                }),
                Segment::Text(_) => None,
            })
            .collect();
        args.truncate(holes.len());
        let bound = args.len();
        args.extend(holes.into_iter().skip(bound).map(Arg::new));
        args
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn hole_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Hole { .. }))
            .count()
    }

    /// Render against positional arguments; holes without an argument are kept verbatim
    pub fn render(&self, args: &[Arg]) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut next = args.iter();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Hole { name, format } => match next.next() {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        if let Some(format) = format.as_deref() {
                            out.push(':');
                            out.push_str(format);
                        }
                        out.push('}');
                    }
                },
            }
        }
        out
    }

    /// Pair each hole name with its rendered argument
    pub fn properties(&self, args: &[Arg]) -> Vec<(&str, String)> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Hole { name, .. } => Some(name.as_str()),
                Segment::Text(_) => None,
            })
            .zip(args.iter())
            .map(|(name, arg)| (name, arg.to_string()))
            .collect()
    }
}

/// Recognise a `{Name}` or `{Name:format}` hole at the start of `tail`
fn hole(tail: &str) -> Option<(String, Option<String>, usize)> {
    let close = tail.find('}')?;
    let body = &tail[1..close];
    let (name, format) = match body.split_once(':') {
        Some((name, format)) => (name, Some(format)),
        None => (body, None),
    };
    let name = name.trim();
    if name.is_empty() || body.contains('{') {
        return None;
    }
    Some((name.to_string(), format.map(str::to_string), close + 1))
}

/// Milliseconds rendered with one decimal place
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Millis(pub f64);

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
