//! Class-name templates keyed by semantic identifier.
//!
//! Templates use printf-style placeholders:
//!
//! - `%s` takes the next argument
//! - `%2$s` takes the second argument (1-based)
//! - `%%` is a literal `%`
//!
//! Anything else after a `%` is rejected when the template is parsed, so a
//! bad configuration fails at load time instead of on first render.

use std::collections::BTreeMap;
use std::fmt;

use smol_str::SmolStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// 0-based argument index
    Arg(usize),
}

/// A parsed class-name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTemplate {
    raw: SmolStr,
    segments: Vec<Segment>,
    arity: usize,
}

impl ClassTemplate {
    /// Parse `template`, naming it `key` in any error
    pub fn parse(key: &str, template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut next_arg = 0usize;
        let mut arity = 0usize;
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let index = match chars.next() {
                Some((_, '%')) => {
                    literal.push('%');
                    continue;
                }
                Some((_, 's')) => {
                    next_arg += 1;
                    next_arg - 1
                }
                Some((_, d)) if d.is_ascii_digit() && d != '0' => {
                    let mut n = d.to_digit(10).unwrap_or_default() as usize;
                    while let Some(&(_, d)) = chars.peek() {
                        let Some(digit) = d.to_digit(10) else { break };
                        n = n.saturating_mul(10).saturating_add(digit as usize);
                        chars.next();
                    }
                    match (chars.next(), chars.next()) {
                        (Some((_, '$')), Some((_, 's'))) => n - 1,
                        _ => {
                            return Err(Error::invalid_template(
                                key,
                                format!("expected `%{n}$s` at byte {pos}"),
                            ));
                        }
                    }
                }
                Some((_, other)) => {
                    return Err(Error::invalid_template(
                        key,
                        format!("unsupported placeholder `%{other}` at byte {pos}"),
                    ));
                }
                None => {
                    return Err(Error::invalid_template(key, "dangling `%` at end of template"));
                }
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Arg(index));
            arity = arity.max(index + 1);
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: SmolStr::new(template),
            segments,
            arity,
        })
    }

    /// Number of arguments the template needs
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute `args` into the template.
    ///
    /// Fails with [`Error::TemplateArity`] when fewer arguments than
    /// [`arity`](Self::arity) are given. Extra arguments are ignored.
    pub fn render<S: AsRef<str>>(&self, key: &str, args: &[S]) -> Result<String> {
        if args.len() < self.arity {
            return Err(Error::TemplateArity {
                key: key.to_string(),
                expected: self.arity,
                given: args.len(),
            });
        }
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Arg(i) => out.push_str(args[*i].as_ref()),
            }
        }
        Ok(out)
    }
}

impl fmt::Display for ClassTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The configured set of class-name templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTemplates {
    templates: BTreeMap<SmolStr, ClassTemplate>,
}

impl ClassTemplates {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// The Font Awesome 4 class conventions
    pub fn font_awesome() -> Self {
        let mut templates = Self::new();
        for (key, template) in [
            ("icon", "fa fa-%s"),
            ("list-item", "fa-li"),
            ("fixed-width", "fa-fw"),
            ("spin", "fa-spin"),
            ("border", "fa-border"),
            ("size", "fa-%sx"),
            ("rotate", "fa-rotate-%s"),
        ] {
            // literal templates above are well-formed
            if let Ok(parsed) = ClassTemplate::parse(key, template) {
                templates.templates.insert(SmolStr::new(key), parsed);
            }
        }
        templates
    }

    /// Build a set from `(key, template)` pairs, validating every template
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut templates = Self::new();
        for (key, template) in pairs {
            templates.insert(key.as_ref(), template.as_ref())?;
        }
        Ok(templates)
    }

    /// Add or replace the template for `key`
    pub fn insert(&mut self, key: &str, template: &str) -> Result<()> {
        let parsed = ClassTemplate::parse(key, template)?;
        self.templates.insert(SmolStr::new(key), parsed);
        Ok(())
    }

    /// Template for `key`
    pub fn get(&self, key: &str) -> Option<&ClassTemplate> {
        self.templates.get(key)
    }

    /// Iterate `(key, template)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassTemplate)> {
        self.templates.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates are configured
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Resolve `key` to a class name.
    ///
    /// An unknown key is `Ok(None)`: it contributes no class.
    pub fn class_name<S: AsRef<str>>(&self, key: &str, args: &[S]) -> Result<Option<String>> {
        self.templates
            .get(key)
            .map(|template| template.render(key, args))
            .transpose()
    }
}
