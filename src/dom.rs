//! Detached element values.
//!
//! The controller never holds live DOM nodes. Openers travel through the
//! pipeline and into history as plain values that can be serialized back to
//! markup and re-parsed later.

use std::fmt::Write as _;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    inner_html: String,
    form: Option<Box<Element>>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// An element with no tag. Showing it is a no-op for any sane view.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_inner_html(mut self, inner_html: impl Into<String>) -> Self {
        self.inner_html = inner_html.into();
        self
    }

    /// Attaches the owning form. The form is not part of the outer markup.
    pub fn with_form(mut self, form: Element) -> Self {
        self.form = Some(Box::new(form));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn form(&self) -> Option<&Element> {
        self.form.as_deref()
    }

    /// Reads `name` from the element, falling back to its owning form.
    pub fn attr_or_form(&self, name: &str) -> Option<&str> {
        self.attr(name)
            .or_else(|| self.form().and_then(|form| form.attr(name)))
    }

    pub fn has_attr_or_form(&self, name: &str) -> bool {
        self.has_attr(name) || self.form().is_some_and(|form| form.has_attr(name))
    }

    pub fn outer_html(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return out;
        }
        out.push_str(&self.inner_html);
        let _ = write!(out, "</{}>", self.tag);
        out
    }
}

/// A `data-*` flag is falsy only when explicitly set to `"false"`.
pub fn is_dataset_falsy(element: &Element, name: &str) -> bool {
    element.attr(name) == Some("false")
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
