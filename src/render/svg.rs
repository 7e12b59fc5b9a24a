//! Minimal SVG element builder
//!
//! Themes describe their drawing as a tree of [`Element`]s; text and
//! attribute values are escaped on output.

use std::fmt::{self, Display};

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Trim a float to at most two decimals for attribute values
pub fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        self.attrs.push((key, value.to_string()));
        self
    }

    /// Numeric attribute, rounded to two decimals
    pub fn num(self, key: &'static str, value: f64) -> Self {
        self.attr(key, num(value))
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Add a child only when present
    pub fn child_opt(self, child: Option<Element>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::Text(content.into()));
        self
    }

    fn write_to(&self, out: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(out, "{indent}<{}", self.name)?;
        for (key, value) in &self.attrs {
            write!(out, " {key}=\"{}\"", escape(value))?;
        }

        if self.children.is_empty() {
            return writeln!(out, "/>");
        }

        // text-only elements stay on one line so whitespace is not rendered
        if let [Node::Text(text)] = self.children.as_slice() {
            return writeln!(out, ">{}</{}>", escape(text), self.name);
        }

        writeln!(out, ">")?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out, depth + 1)?,
                Node::Text(text) => writeln!(out, "{indent}  {}", escape(text))?,
            }
        }
        writeln!(out, "{indent}</{}>", self.name)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, 0)
    }
}

/// Root `<svg>` element of the given size
pub fn document(width: u32, height: u32) -> Element {
    Element::new("svg")
        .attr("width", width)
        .attr("height", height)
        .attr("viewBox", format!("0 0 {width} {height}"))
        .attr("xmlns", "http://www.w3.org/2000/svg")
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Element {
    Element::new("rect")
        .num("x", x)
        .num("y", y)
        .num("width", width)
        .num("height", height)
}

pub fn circle(cx: f64, cy: f64, r: f64) -> Element {
    Element::new("circle").num("cx", cx).num("cy", cy).num("r", r)
}

pub fn text(x: f64, y: f64, content: impl Into<String>) -> Element {
    Element::new("text").num("x", x).num("y", y).text(content)
}

pub fn group() -> Element {
    Element::new("g")
}

pub fn translate(x: f64, y: f64) -> String {
    format!("translate({}, {})", num(x), num(y))
}
