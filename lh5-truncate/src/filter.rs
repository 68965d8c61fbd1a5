//! Path inclusion by shell-style glob patterns.
//!
//! Patterns follow `fnmatch` rules: `*` matches any run of characters (including `/`), `?` one
//! character, and `[...]` / `[!...]` a character class. Leading and trailing slashes of patterns
//! are ignored.

use itertools::Itertools;
use lh5_error::{Lh5Result, lh5_err};
use regex::Regex;

/// A precompiled include/exclude filter over slash-separated object paths.
///
/// Exclusion wins over inclusion. Include patterns also admit every ancestor of what they
/// name, so `a/b/c` includes `a` and `a/b`: the mapper has to descend through them to reach
/// `a/b/c`.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Option<Vec<Regex>>,
    exclude: Vec<Regex>,
}

impl PathFilter {
    /// Compile a filter. `None` for `include` admits every path not excluded.
    pub fn try_new(include: Option<&[String]>, exclude: Option<&[String]>) -> Lh5Result<Self> {
        let include = include
            .map(|patterns| {
                patterns
                    .iter()
                    .flat_map(|pattern| prefixes(pattern))
                    .unique()
                    .map(|prefix| compile(&prefix))
                    .collect::<Lh5Result<Vec<_>>>()
            })
            .transpose()?;
        let exclude = exclude
            .unwrap_or_default()
            .iter()
            .map(|pattern| compile(normalize(pattern)))
            .collect::<Lh5Result<Vec<_>>>()?;
        Ok(Self { include, exclude })
    }

    /// Whether neither include nor exclude patterns were given.
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }

    pub fn is_included(&self, path: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(path)) {
            return false;
        }
        match &self.include {
            None => true,
            Some(include) => include.iter().any(|re| re.is_match(path)),
        }
    }
}

/// Check a single path without keeping the compiled filter around.
pub fn is_included(
    path: &str,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Lh5Result<bool> {
    Ok(PathFilter::try_new(include, exclude)?.is_included(path))
}

fn normalize(pattern: &str) -> &str {
    pattern.trim_matches('/')
}

/// `a/b/c` -> `a`, `a/b`, `a/b/c`
fn prefixes(pattern: &str) -> Vec<String> {
    let segments = normalize(pattern).split('/').collect::<Vec<_>>();
    (1..=segments.len())
        .map(|n| segments[..n].join("/"))
        .collect()
}

fn compile(pattern: &str) -> Lh5Result<Regex> {
    Regex::new(&translate(pattern))
        .map_err(|e| lh5_err!("invalid path pattern '{}': {}", pattern, e))
}

/// Translate a glob into an anchored regex.
fn translate(pattern: &str) -> String {
    let chars = pattern.chars().collect::<Vec<_>>();
    let mut out = String::from("^(?s:");
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                // Consecutive stars are one star.
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push_str(")$");
    out
}

/// Index of the `]` closing a class whose content starts at `start`. A `]` directly after the
/// opening bracket (or after `[!`) is part of the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

/// Translate class content. A range running backwards (`z-a`) is empty and dropped; a class
/// left with nothing matches no character, or any character when negated.
fn translate_class(content: &[char]) -> String {
    let (negated, content) = match content.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, content),
    };

    let mut ranges = Vec::new();
    let mut i = 0;
    while i < content.len() {
        let lo = content[i];
        if i + 2 < content.len() && content[i + 1] == '-' {
            let hi = content[i + 2];
            if lo <= hi {
                ranges.push((lo, hi));
            }
            i += 3;
        } else {
            ranges.push((lo, lo));
            i += 1;
        }
    }

    if ranges.is_empty() {
        return (if negated { "." } else { r"[^\s\S]" }).to_string();
    }
    let mut out = String::from(if negated { "[^" } else { "[" });
    for (lo, hi) in ranges {
        push_class_char(&mut out, lo);
        if hi != lo {
            out.push('-');
            push_class_char(&mut out, hi);
        }
    }
    out.push(']');
    out
}

fn push_class_char(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}
