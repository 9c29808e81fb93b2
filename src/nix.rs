//! Minimal Nix expression builder
//!
//! Just enough structure to emit a function over an attribute set of
//! `fetchurl` calls. String literals are escaped when rendered, so values
//! coming from the network (tags, hashes) cannot break out of their quotes.
//! Interpolations such as `${tag}` are kept as separate parts and emitted
//! unescaped.

use std::fmt;

/// Nix keywords that cannot be used as bare attribute names.
const KEYWORDS: &[&str] = &[
    "assert", "else", "if", "in", "inherit", "let", "or", "rec", "then", "with",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum StrPart {
    Literal(String),
    Interpolation(String),
}

/// A double-quoted Nix string made of literal text and `${ident}` splices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NixString {
    parts: Vec<StrPart>,
}

impl NixString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text; it is escaped on render.
    pub fn push_str(&mut self, s: &str) -> &mut Self {
        if let Some(StrPart::Literal(last)) = self.parts.last_mut() {
            last.push_str(s);
        } else {
            self.parts.push(StrPart::Literal(s.to_string()));
        }
        self
    }

    /// Append an `${ident}` splice referring to a binding in scope.
    pub fn push_interpolation(&mut self, ident: &str) -> &mut Self {
        self.parts.push(StrPart::Interpolation(ident.to_string()));
        self
    }

    fn render(&self, out: &mut String) {
        out.push('"');
        for (i, part) in self.parts.iter().enumerate() {
            match part {
                StrPart::Literal(text) => {
                    let before_splice =
                        matches!(self.parts.get(i + 1), Some(StrPart::Interpolation(_)));
                    match text.strip_suffix('$') {
                        // `$${` would turn the splice into literal text
                        Some(head) if before_splice => {
                            out.push_str(&escape_string(head));
                            out.push_str("\\$");
                        }
                        _ => out.push_str(&escape_string(text)),
                    }
                }
                StrPart::Interpolation(ident) => {
                    out.push_str("${");
                    out.push_str(ident);
                    out.push('}');
                }
            }
        }
        out.push('"');
    }
}

impl fmt::Display for NixString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out);
        f.write_str(&out)
    }
}

impl From<&str> for NixString {
    fn from(s: &str) -> Self {
        let mut string = Self::new();
        string.push_str(s);
        string
    }
}

impl From<String> for NixString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// A Nix expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    String(NixString),
    Ident(String),
    AttrSet(AttrSet),
    /// Function application, e.g. `fetchurl { ... }`
    Apply { function: String, argument: Box<Expr> },
}

impl Expr {
    pub fn string(s: impl Into<NixString>) -> Self {
        Self::String(s.into())
    }

    pub fn apply(function: &str, argument: Expr) -> Self {
        Self::Apply {
            function: function.to_string(),
            argument: Box::new(argument),
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Self::String(s) => s.render(out),
            Self::Ident(name) => out.push_str(name),
            Self::AttrSet(set) => set.render(out, " "),
            Self::Apply { function, argument } => {
                out.push_str(function);
                out.push(' ');
                argument.render(out);
            }
        }
    }
}

impl From<AttrSet> for Expr {
    fn from(set: AttrSet) -> Self {
        Self::AttrSet(set)
    }
}

/// An ordered attribute set. Attributes render in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrSet {
    bindings: Vec<(String, Expr)>,
}

impl AttrSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Expr>) {
        self.bindings.push((name.into(), value.into()));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    fn render(&self, out: &mut String, separator: &str) {
        out.push_str("{ ");
        render_bindings(&self.bindings, out, separator);
        if !self.bindings.is_empty() {
            out.push(' ');
        }
        out.push('}');
    }
}

fn render_bindings(bindings: &[(String, Expr)], out: &mut String, separator: &str) {
    for (i, (name, value)) in bindings.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        render_attr_name(name, out);
        out.push_str(" = ");
        value.render(out);
        out.push(';');
    }
}

/// `{ params, ... }: let <bindings> in <body>`, with one body attribute per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    params: Vec<String>,
    ellipsis: bool,
    let_bindings: Vec<(String, Expr)>,
    body: AttrSet,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a formal parameter of the outer function.
    pub fn param(mut self, name: &str) -> Self {
        self.params.push(name.to_string());
        self
    }

    /// Accept extra arguments (`...`).
    pub fn ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }

    pub fn bind(mut self, name: &str, value: impl Into<Expr>) -> Self {
        self.let_bindings.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: AttrSet) -> Self {
        self.body = body;
        self
    }

    pub fn attrs(&self) -> &AttrSet {
        &self.body
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.params.is_empty() || self.ellipsis {
            let mut formals: Vec<&str> = self.params.iter().map(String::as_str).collect();
            if self.ellipsis {
                formals.push("...");
            }
            out.push_str(&format!("{{ {} }}: ", formals.join(", ")));
        }

        if !self.let_bindings.is_empty() {
            out.push_str("let ");
            render_bindings(&self.let_bindings, &mut out, " ");
            out.push_str(" in ");
        }

        self.body.render(&mut out, "\n");
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Escape text for use inside a double-quoted Nix string.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

/// Whether `name` can be written as a bare attribute name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '-'))
        && !KEYWORDS.contains(&name)
}

fn render_attr_name(name: &str, out: &mut String) {
    if is_identifier(name) {
        out.push_str(name);
    } else {
        out.push_str(&format!("\"{}\"", escape_string(name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_string("v1.2.3"), "v1.2.3");
        assert_eq!(escape_string("https://example.com/a.tar.gz"), "https://example.com/a.tar.gz");
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_string(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_string(r"a\b"), r"a\\b");
        assert_eq!(escape_string("a\nb"), r"a\nb");
        assert_eq!(escape_string("${evil}"), r"\${evil}");
        // A lone dollar is not an interpolation
        assert_eq!(escape_string("$5"), "$5");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("x86_64-linux"));
        assert!(is_identifier("aarch64-darwin"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("foo'"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier("in"));
    }

    #[test]
    fn test_string_with_interpolation() {
        let mut s = NixString::new();
        s.push_str("https://github.com/")
            .push_interpolation("repo")
            .push_str("/releases/download/")
            .push_interpolation("tag")
            .push_str("/a\"b");

        assert_eq!(
            s.to_string(),
            r#""https://github.com/${repo}/releases/download/${tag}/a\"b""#
        );
    }

    #[test]
    fn test_dollar_before_interpolation_is_escaped() {
        let mut s = NixString::new();
        s.push_str("price$").push_interpolation("tag");
        assert_eq!(s.to_string(), r#""price\$${tag}""#);

        // Not followed by a splice, a trailing dollar stays as is
        assert_eq!(NixString::from("price$").to_string(), r#""price$""#);

        let mut s = NixString::new();
        s.push_interpolation("repo").push_str("$").push_interpolation("tag");
        assert_eq!(s.to_string(), r#""${repo}\$${tag}""#);
    }

    #[test]
    fn test_adjacent_literals_merge() {
        let mut s = NixString::new();
        s.push_str("a").push_str("b");
        assert_eq!(s, NixString::from("ab"));
    }

    #[test]
    fn test_apply_renders_inline_attrset() {
        let expr = Expr::apply(
            "fetchurl",
            AttrSet::new()
                .with("url", Expr::string("https://x/y"))
                .with("sha256", Expr::string("abc"))
                .into(),
        );
        let mut out = String::new();
        expr.render(&mut out);
        assert_eq!(out, r#"fetchurl { url = "https://x/y"; sha256 = "abc"; }"#);
    }

    #[test]
    fn test_non_identifier_attr_names_are_quoted() {
        let set = AttrSet::new().with("my attr", Expr::Ident("null".into()));
        let mut out = String::new();
        set.render(&mut out, " ");
        assert_eq!(out, r#"{ "my attr" = null; }"#);
    }

    #[test]
    fn test_empty_attrset() {
        let mut out = String::new();
        AttrSet::new().render(&mut out, " ");
        assert_eq!(out, "{ }");
    }

    #[test]
    fn test_document_layout() {
        let doc = Document::new()
            .param("fetchurl")
            .ellipsis()
            .bind("repo", Expr::string("o/r"))
            .bind("tag", Expr::string("v1"))
            .body(
                AttrSet::new()
                    .with("a", Expr::Ident("null".into()))
                    .with("b", Expr::Ident("true".into())),
            );

        assert_eq!(
            doc.render(),
            "{ fetchurl, ... }: let repo = \"o/r\"; tag = \"v1\"; in { a = null;\nb = true; }"
        );
        assert_eq!(doc.to_string(), doc.render());
        assert_eq!(doc.attrs().names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_document_escapes_bound_values() {
        let doc = Document::new()
            .bind("tag", Expr::string("v1\"; evil = \"x"))
            .body(AttrSet::new());
        assert_eq!(doc.render(), r#"let tag = "v1\"; evil = \"x"; in { }"#);
    }
}
