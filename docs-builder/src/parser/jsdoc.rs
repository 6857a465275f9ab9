//! Native JSDoc engine, a `/** ... */` block scanner.
//!
//! Emits jsdoc-compatible records: one per documented function, with
//! `@category` and `@summary` carried as top-level fields.

use super::{Engine, EngineOutput};
use crate::error::{DocsError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z]+)(?:[ \t]+(.*))?$").unwrap());

static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)")
        .unwrap()
});

static RE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=").unwrap()
});

static RE_EXPORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*=").unwrap()
});

/// Tags marking a block that documents something other than a function.
const NON_FUNCTION_TAGS: &[&str] = &[
    "file",
    "fileoverview",
    "overview",
    "module",
    "typedef",
    "callback",
];

// -- Output records -----------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Doclet {
    pub id: String,
    pub longname: String,
    pub name: String,
    pub kind: &'static str,
    pub scope: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ParamDoc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<TypedDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<TypedDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Value>,
    pub meta: Meta,
    pub order: usize,
}

#[derive(Debug, Serialize)]
pub struct ParamDoc {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaultvalue: Option<String>,
}

/// `@returns` / `@throws` entry.
#[derive(Debug, Serialize)]
pub struct TypedDoc {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TypeNames {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub filename: String,
    pub lineno: usize,
    pub path: String,
}

// -- Engine -------------------------------------------------------------------

/// Built-in engine; parses the file in-process and replays the records as a
/// JSON stream.
pub struct NativeEngine;

#[async_trait]
impl Engine for NativeEngine {
    fn name(&self) -> &str {
        "native"
    }

    async fn open(&self, path: &Path) -> Result<EngineOutput> {
        let input = tokio::fs::read_to_string(path).await.map_err(|e| DocsError::Engine {
            engine: self.name().to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let bytes = serde_json::to_vec(&parse(&input, path))?;
        Ok(EngineOutput {
            stream: Box::new(Cursor::new(bytes)),
            child: None,
        })
    }
}

// -- Parsing ------------------------------------------------------------------

struct Tag<'a> {
    name: &'a str,
    lines: Vec<&'a str>,
}

impl Tag<'_> {
    fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    /// Keep inner indentation; drop only surrounding blank lines.
    fn verbatim(&self) -> String {
        self.lines.join("\n").trim_matches('\n').trim_end().to_string()
    }
}

/// Parse every doc block in a JavaScript source file.
pub fn parse(input: &str, path: &Path) -> Vec<Doclet> {
    let lines: Vec<&str> = input.lines().collect();
    let mut doclets = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        // A block opens only at the start of a line, so `/**` inside code
        // (string literals, globs) is ignored.
        let Some(opening) = lines[i].trim_start().strip_prefix("/**") else {
            i += 1;
            continue;
        };
        // `/**/` is an empty comment
        if opening.starts_with('/') {
            i += 1;
            continue;
        }
        let block_line = i + 1;

        let mut body: Vec<&str> = Vec::new();
        let mut rest = opening;
        let mut tail = "";
        loop {
            if let Some(end) = rest.find("*/") {
                body.push(&rest[..end]);
                tail = &rest[end + 2..];
                i += 1;
                break;
            }
            body.push(rest);
            i += 1;
            match lines.get(i) {
                Some(next) => rest = *next,
                None => break,
            }
        }

        // `/** ... */ function foo() {}` declares on the closing line itself
        let declared = match declared_name(tail) {
            Some(name) => Some((name, i)),
            None => {
                let mut j = i;
                while j < lines.len() && lines[j].trim().is_empty() {
                    j += 1;
                }
                lines.get(j).and_then(|l| declared_name(l)).map(|n| (n, j + 1))
            }
        };

        if let Some(doclet) = build_doclet(&body, declared, block_line, path, doclets.len()) {
            doclets.push(doclet);
        }
    }

    doclets
}

/// Name introduced by a declaration line, if it is one.
fn declared_name(line: &str) -> Option<String> {
    [&*RE_FUNCTION, &*RE_BINDING, &*RE_EXPORTS]
        .iter()
        .find_map(|re| re.captures(line))
        .map(|caps| caps[1].to_string())
}

fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    match line.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

fn build_doclet(
    body: &[&str],
    declared: Option<(String, usize)>,
    block_line: usize,
    path: &Path,
    order: usize,
) -> Option<Doclet> {
    let mut lead: Vec<&str> = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();
    for raw in body {
        let text = strip_gutter(raw);
        if let Some(caps) = RE_TAG.captures(text) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let first = caps.get(2).map_or("", |m| m.as_str());
            tags.push(Tag {
                name,
                lines: vec![first],
            });
        } else if let Some(tag) = tags.last_mut() {
            tag.lines.push(text);
        } else {
            lead.push(text);
        }
    }

    if tags
        .iter()
        .any(|t| matches!(t.name, "private" | "ignore") || NON_FUNCTION_TAGS.contains(&t.name))
    {
        return None;
    }

    let explicit_name = tags
        .iter()
        .find(|t| matches!(t.name, "name" | "function" | "func" | "method"))
        .map(|t| t.text())
        .filter(|n| !n.is_empty());
    let (name, lineno) = match (explicit_name, declared) {
        (Some(name), declared) => (name, declared.map_or(block_line, |(_, l)| l)),
        (None, Some((name, line))) => (name, line),
        (None, None) => {
            tracing::debug!(file = %path.display(), line = block_line, "skipping doc block without a name");
            return None;
        }
    };

    let mut doclet = Doclet {
        id: name.clone(),
        longname: name.clone(),
        name,
        kind: "function",
        scope: "static",
        category: None,
        summary: None,
        description: None,
        params: None,
        returns: Vec::new(),
        exceptions: Vec::new(),
        examples: Vec::new(),
        deprecated: None,
        meta: Meta {
            filename: file_name(path),
            lineno,
            path: path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
        },
        order,
    };

    for tag in &tags {
        match tag.name {
            "category" => doclet.category = non_empty(tag.text()),
            "summary" => doclet.summary = non_empty(tag.text()),
            "description" | "desc" => doclet.description = non_empty(tag.text()),
            "param" | "arg" | "argument" => doclet
                .params
                .get_or_insert_with(Vec::new)
                .push(parse_param(&tag.text())),
            "returns" | "return" => doclet.returns.push(parse_typed(&tag.text())),
            "throws" | "exception" => doclet.exceptions.push(parse_typed(&tag.text())),
            "example" => doclet.examples.push(tag.verbatim()),
            "deprecated" => {
                doclet.deprecated = Some(match non_empty(tag.text()) {
                    Some(text) => Value::String(text),
                    None => Value::Bool(true),
                })
            }
            _ => {}
        }
    }

    if doclet.description.is_none() {
        doclet.description = non_empty(lead.join("\n").trim().to_string());
    }

    Some(doclet)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `{type} [name=default] - description`
fn parse_param(text: &str) -> ParamDoc {
    let (kind, rest) = split_type(text);
    let rest = rest.trim_start();

    let (name, optional, defaultvalue, rest) = if rest.starts_with('[') {
        match closing(rest, '[', ']') {
            Some(end) => {
                let inner = &rest[1..end];
                let (name, default) = match inner.split_once('=') {
                    Some((name, default)) => (name.trim(), non_empty(default.trim().to_string())),
                    None => (inner.trim(), None),
                };
                (name.to_string(), true, default, &rest[end + 1..])
            }
            None => (rest.trim_start_matches('[').to_string(), true, None, ""),
        }
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (rest[..end].to_string(), false, None, &rest[end..])
    };

    ParamDoc {
        name,
        kind,
        description: description(rest),
        optional,
        defaultvalue,
    }
}

/// `{type} description`
fn parse_typed(text: &str) -> TypedDoc {
    let (kind, rest) = split_type(text);
    TypedDoc {
        kind,
        description: description(rest),
    }
}

fn description(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    non_empty(rest.trim().to_string())
}

/// Split a leading `{type}` (braces may nest) off the text.
fn split_type(text: &str) -> (Option<TypeNames>, &str) {
    let text = text.trim_start();
    if !text.starts_with('{') {
        return (None, text);
    }
    match closing(text, '{', '}') {
        Some(end) => (Some(type_names(&text[1..end])), &text[end + 1..]),
        None => (None, text),
    }
}

/// Byte index of the bracket closing the one at the start of `text`.
fn closing(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// `(Date|Number)` → `["Date", "Number"]`; unions inside generics stay whole.
fn type_names(expr: &str) -> TypeNames {
    let expr = expr.trim();
    let expr = expr
        .strip_prefix('(')
        .and_then(|e| e.strip_suffix(')'))
        .unwrap_or(expr);

    let mut names = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            '|' if depth == 0 => {
                names.push(expr[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    names.push(expr[start..].trim().to_string());
    names.retain(|n| !n.is_empty());
    TypeNames { names }
}
