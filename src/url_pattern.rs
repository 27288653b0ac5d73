//! URL pattern compilation and matching.
//!
//! A pattern is decomposed into scheme / domain / path / query / fragment
//! components by one structural regex, and each component is translated to
//! an anchored matcher: `*` becomes a context-appropriate wildcard (domain
//! wildcards stop at `/`, path and fragment wildcards stop at `?`/`#`),
//! `:name` becomes a one-or-more parameter segment, and special regex
//! characters in literal text are escaped. Query pairs authored in the
//! pattern must each appear in the actual query string; components the
//! pattern omits accept anything except the scheme, which must still look
//! like a scheme.
//!
//! Compilation happens once per pattern per evaluation call; callers that
//! evaluate the same pattern set repeatedly should hold on to the compiled
//! [`UrlPattern`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Splits a URL or pattern into (scheme, domain, path, query, fragment).
static STRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*)://)?([^/?#]*)([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("structural URL regex is valid")
});

#[derive(Debug, Default)]
struct Components<'a> {
    scheme: Option<&'a str>,
    domain: Option<&'a str>,
    path: Option<&'a str>,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split(input: &str) -> Option<Components<'_>> {
    let caps = STRUCTURE.captures(input)?;
    Some(Components {
        scheme: caps.get(1).map(|m| m.as_str()),
        domain: caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()),
        path: caps.get(3).map(|m| m.as_str()).filter(|s| !s.is_empty()),
        query: caps.get(4).map(|m| m.as_str()),
        fragment: caps.get(5).map(|m| m.as_str()),
    })
}

/// What a query pair authored in a pattern requires of the actual query.
#[derive(Debug, Clone, PartialEq, Eq)]
enum QueryExpect {
    /// `key=*`: the key must carry some non-empty value.
    AnyValue,
    /// `key` or `key=`: the key must be present, with or without a value.
    Present,
    /// `key=value`: the key must carry exactly this value.
    Literal(String),
}

/// A compiled URL pattern: one anchored matcher per component plus the
/// required query pairs. Reusable and thread-safe.
#[derive(Debug)]
pub struct UrlPattern {
    scheme: Regex,
    domain: Option<Regex>,
    path: Option<Regex>,
    query: Vec<(String, QueryExpect)>,
    fragment: Option<Regex>,
}

impl UrlPattern {
    /// Compile a user-authored pattern. Returns `None` if the pattern (or a
    /// translated component) does not compile; an uncompilable pattern never
    /// matches anything.
    #[must_use]
    pub fn compile(pattern: &str) -> Option<Self> {
        match Self::try_compile(pattern) {
            Some(compiled) => Some(compiled),
            None => {
                debug!(pattern, "unparsable URL pattern");
                None
            }
        }
    }

    fn try_compile(pattern: &str) -> Option<Self> {
        let parts = split(pattern)?;

        let scheme = match parts.scheme {
            Some(s) => anchored(&regex::escape(&s.to_lowercase()))?,
            None => anchored("[a-z0-9]+")?,
        };
        let domain = match parts.domain {
            Some(d) => Some(anchored(&translate(&d.to_lowercase(), "[^/]", "[^/]"))?),
            None => None,
        };
        let path = match parts.path {
            Some(p) => Some(anchored(&format!(
                "{}/?",
                translate(p, "[^?#]", "[^/?#]")
            ))?),
            None => None,
        };
        let fragment = match parts.fragment {
            Some(f) => Some(anchored(&translate(f, "[^?#]", "[^/]"))?),
            None => None,
        };
        let query = parts.query.map_or_else(Vec::new, parse_query_expects);

        Some(Self {
            scheme,
            domain,
            path,
            query,
            fragment,
        })
    }

    /// Whether `url` satisfies this pattern.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let Some(parts) = split(url) else {
            return false;
        };

        let scheme = parts.scheme.unwrap_or_default().to_lowercase();
        if !self.scheme.is_match(&scheme) {
            return false;
        }
        if let Some(re) = &self.domain {
            let domain = parts.domain.unwrap_or_default().to_lowercase();
            if !re.is_match(&domain) {
                return false;
            }
        }
        if let Some(re) = &self.path {
            if !re.is_match(parts.path.unwrap_or("")) {
                return false;
            }
        }
        if !self.query.is_empty() {
            let pairs = parse_query_pairs(parts.query.unwrap_or(""));
            if !self.query.iter().all(|(key, expect)| {
                pairs
                    .iter()
                    .filter(|(k, _)| k == key)
                    .any(|(_, v)| match expect {
                        QueryExpect::AnyValue => v.as_ref().is_some_and(|v| !v.is_empty()),
                        QueryExpect::Present => true,
                        QueryExpect::Literal(want) => v.as_deref() == Some(want),
                    })
            }) {
                return false;
            }
        }
        if let Some(re) = &self.fragment {
            if !re.is_match(parts.fragment.unwrap_or("")) {
                return false;
            }
        }
        true
    }
}

/// Match a URL against include/exclude pattern lists.
///
/// The URL matches when no include patterns are given or at least one
/// matches, and no exclude pattern matches. Patterns that fail to compile
/// never match (and therefore never exclude).
#[must_use]
pub fn is_match_url_pattern(url: &str, includes: &[String], excludes: &[String]) -> bool {
    let matches_any = |patterns: &[String]| {
        patterns
            .iter()
            .filter_map(|p| UrlPattern::compile(p))
            .any(|m| m.matches(url))
    };
    (includes.is_empty() || matches_any(includes)) && !matches_any(excludes)
}

fn anchored(body: &str) -> Option<Regex> {
    Regex::new(&format!("^{body}$")).ok()
}

/// Translate one pattern component to a regex fragment: `*` becomes
/// `<wildcard>*`, `:name` becomes `<param>+`, and literal runs are escaped.
fn translate(component: &str, wildcard: &str, param: &str) -> String {
    let mut out = String::with_capacity(component.len() * 2);
    let mut literal = String::new();
    let mut chars = component.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(wildcard);
                out.push('*');
            }
            ':' if chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_') =>
            {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                while chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_')
                {
                    chars.next();
                }
                out.push_str(param);
                out.push('+');
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out
}

fn parse_query_expects(query: &str) -> Vec<(String, QueryExpect)> {
    query
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece.split_once('=') {
            None => (piece.to_owned(), QueryExpect::Present),
            Some((key, "*")) => (key.to_owned(), QueryExpect::AnyValue),
            Some((key, "")) => (key.to_owned(), QueryExpect::Present),
            Some((key, value)) => (key.to_owned(), QueryExpect::Literal(value.to_owned())),
        })
        .collect()
}

fn parse_query_pairs(query: &str) -> Vec<(String, Option<String>)> {
    query
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece.split_once('=') {
            None => (piece.to_owned(), None),
            Some((key, value)) => (key.to_owned(), Some(value.to_owned())),
        })
        .collect()
}
