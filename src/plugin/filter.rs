//! Pattern specifications compiled to path predicates.
//!
//! A specification is a comma-separated list. Each item is one of
//!   - `regex:<re>`: regular expression over the whole path,
//!   - `glob:<glob>` or a bare glob,
//!   - `@<file>`: one pattern per non-empty line of the file.
//!
//! Glob syntax: `*` matches within one path segment, `**` across
//! segments, `?` one non-`/` character, `[abc]` / `[!abc]` a class,
//! `{a,b}` alternatives, `\` escapes the next character, inside classes
//! too (`[\]]`, `[a\-z]`). A glob with no metacharacters matches one
//! exact path.

use std::path::Path;

use regex::Regex;

use crate::error::{LinkError, Result};

/// A compiled pattern list. Matches when any of its patterns matches.
#[derive(Clone, Debug)]
pub struct ResourceFilter {
    patterns: Vec<Regex>,
}

impl ResourceFilter {
    pub fn compile(spec: &str) -> Result<Self> {
        let mut patterns = Vec::new();
        for item in split_patterns(spec) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if let Some(file) = item.strip_prefix('@') {
                for line in read_pattern_file(Path::new(file))? {
                    patterns.push(compile_pattern(&line)?);
                }
            } else {
                patterns.push(compile_pattern(item)?);
            }
        }
        if patterns.is_empty() {
            return Err(LinkError::invalid_pattern(spec, "no patterns given"));
        }
        Ok(Self { patterns })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }

    /// Number of compiled patterns; never zero.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Split on commas that are not inside a `{...}` group or escaped.
fn split_patterns(spec: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in spec.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&spec[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&spec[start..]);
    items
}

fn read_pattern_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| LinkError::io(path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    let source = if let Some(re) = pattern.strip_prefix("regex:") {
        format!("^(?:{})$", re)
    } else {
        let glob = pattern.strip_prefix("glob:").unwrap_or(pattern);
        format!("^{}$", glob_to_regex(glob).map_err(|reason| {
            LinkError::invalid_pattern(pattern, reason)
        })?)
    };
    Regex::new(&source).map_err(|e| LinkError::invalid_pattern(pattern, e.to_string()))
}

/// Translate a glob into an unanchored regular expression body.
fn glob_to_regex(glob: &str) -> std::result::Result<String, String> {
    if glob.is_empty() {
        return Err("empty glob".to_string());
    }
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::new();
    let mut in_group = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let next = chars
                    .get(i + 1)
                    .ok_or_else(|| "trailing escape".to_string())?;
                out.push_str(&regex::escape(&next.to_string()));
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    out.push_str(".*");
                    i += 1;
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '[' => {
                let mut j = i + 1;
                let negated = chars.get(j) == Some(&'!');
                if negated {
                    j += 1;
                }
                // (member, escaped)
                let mut members: Vec<(char, bool)> = Vec::new();
                loop {
                    match chars.get(j) {
                        None => return Err("unterminated character class".to_string()),
                        Some(']') => break,
                        Some('\\') => {
                            let c = chars
                                .get(j + 1)
                                .ok_or_else(|| "unterminated character class".to_string())?;
                            members.push((*c, true));
                            j += 2;
                        }
                        Some(&c) => {
                            members.push((c, false));
                            j += 1;
                        }
                    }
                }
                if members.is_empty() {
                    return Err("empty character class".to_string());
                }
                out.push('[');
                if negated {
                    out.push('^');
                }
                for (c, escaped) in members {
                    match c {
                        '\\' | '[' | ']' | '^' | '&' | '~' => {
                            out.push('\\');
                            out.push(c);
                        }
                        '-' if escaped => out.push_str("\\-"),
                        _ => out.push(c),
                    }
                }
                out.push(']');
                i = j;
            }
            '{' => {
                if in_group {
                    return Err("nested groups are not supported".to_string());
                }
                in_group = true;
                out.push_str("(?:");
            }
            '}' if in_group => {
                in_group = false;
                out.push(')');
            }
            ',' if in_group => out.push('|'),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    if in_group {
        return Err("unterminated group".to_string());
    }
    Ok(out)
}
