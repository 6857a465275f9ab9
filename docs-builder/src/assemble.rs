//! Doc record assembler: raw engine record to published entry.

use crate::config::PackageConfig;
use crate::model::{DocEntry, Parameter, RawDocRecord, Usage, UsageSnippet, USAGE_TABS};
use crate::params;

/// Turn one raw record into a [`DocEntry`].
pub fn assemble(record: RawDocRecord, package: &PackageConfig) -> DocEntry {
    let RawDocRecord {
        name,
        category,
        summary,
        params,
        raw: content,
    } = record;

    let args = params::build_tree(params);
    let syntax = syntax_string(&name, args.as_deref());
    let usage = usage(&name, package);

    DocEntry {
        kind: "jsdoc",
        url_id: name.clone(),
        category,
        title: name,
        description: summary,
        content,
        args,
        usage,
        usage_tabs: USAGE_TABS,
        syntax,
    }
}

/// `name(a, [b])` over the top-level parameters only.
pub fn syntax_string(name: &str, args: Option<&[Parameter]>) -> String {
    let list = args
        .unwrap_or_default()
        .iter()
        .map(|arg| {
            if arg.optional {
                format!("[{}]", arg.name)
            } else {
                arg.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", name, list)
}

fn usage(name: &str, package: &PackageConfig) -> Usage {
    let module = format!("{}/{}", package.name, snake_case(name));
    Usage {
        commonjs: UsageSnippet {
            title: "CommonJS".to_string(),
            code: format!("var {} = require('{}')", name, module),
        },
        umd: UsageSnippet {
            title: "UMD".to_string(),
            code: format!("var {} = {}.{}", name, package.global, name),
        },
        es2015: UsageSnippet {
            title: "ES 2015".to_string(),
            code: format!("import {} from '{}'", name, module),
        },
    }
}

/// Lowercase, underscore-joined words: `getISOWeek` → `get_iso_week`.
///
/// Word breaks fall on separators, lower→upper transitions, the last capital
/// of an acronym run, and letter/digit transitions.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary = (c.is_ascii_uppercase()
                && (prev.is_ascii_lowercase() || prev.is_ascii_digit()))
                || (c.is_ascii_uppercase()
                    && prev.is_ascii_uppercase()
                    && next.is_some_and(|n| n.is_ascii_lowercase()))
                || (c.is_ascii_digit() && prev.is_ascii_alphabetic())
                || (c.is_ascii_alphabetic() && prev.is_ascii_digit());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join("_")
}
