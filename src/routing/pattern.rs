//! Path template compilation.
//!
//! # Responsibilities
//! - Turn a template such as `/groups/:group_id/join` into an anchored regex
//! - Record placeholder names in the order they appear
//! - Extract captured values from a concrete path
//!
//! # Design Decisions
//! - Placeholders (`:name` or `*`) capture one or more chars other than `/ ? #`
//! - Static text is regex-escaped
//! - A template ending in `/` is a prefix match (any tail is accepted)
//! - Every pattern is anchored at both ends, never a contains-match

use regex::Regex;
use std::sync::OnceLock;

use crate::routing::RouterError;

/// Capture used in place of every placeholder.
const SEGMENT_CAPTURE: &str = "([^/?#]+)";

fn placeholder_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r":[A-Za-z0-9_]+|\*").expect("placeholder token regex"))
}

/// A compiled path template.
///
/// The number of capture groups always equals `keys().len()`.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    regex: Regex,
    keys: Vec<String>,
}

impl CompiledPattern {
    /// Compile a path template.
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        let mut keys = Vec::new();
        let nodes: Vec<String> = split_segments(template)
            .map(|node| compile_segment(node, &mut keys))
            .collect();

        let tail = if template.ends_with('/') { "(?:/.*)?" } else { "" };
        let source = format!("^{}{}$", nodes.join("/"), tail);

        let regex = Regex::new(&source).map_err(|source| RouterError::InvalidPattern {
            template: template.to_string(),
            source,
        })?;
        debug_assert_eq!(regex.captures_len() - 1, keys.len());

        Ok(Self {
            template: template.to_string(),
            regex,
            keys,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names, left to right.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns true if the whole path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Pair captured values with placeholder names by position.
    ///
    /// Duplicate names yield duplicate pairs; consumers that collect into a
    /// map keep the last one.
    pub fn extract<'p>(&self, path: &'p str) -> Option<Vec<(&str, &'p str)>> {
        let captures = self.regex.captures(path)?;
        let values = captures.iter().skip(1).map(|m| m.map_or("", |m| m.as_str()));
        Some(self.keys.iter().map(String::as_str).zip(values).collect())
    }

    /// The generated regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.keys == other.keys
    }
}

impl Eq for CompiledPattern {}

/// Split on `/`, dropping trailing empty segments.
fn split_segments(template: &str) -> impl Iterator<Item = &str> {
    let trimmed = template.trim_end_matches('/');
    let trimmed = if trimmed.is_empty() && !template.is_empty() {
        None
    } else {
        Some(trimmed)
    };
    trimmed.into_iter().flat_map(|t| t.split('/'))
}

fn compile_segment(node: &str, keys: &mut Vec<String>) -> String {
    let mut out = String::with_capacity(node.len() + SEGMENT_CAPTURE.len());
    let mut last = 0;
    for token in placeholder_token().find_iter(node) {
        out.push_str(&regex::escape(&node[last..token.start()]));
        keys.push(token.as_str()[1..].to_string());
        out.push_str(SEGMENT_CAPTURE);
        last = token.end();
    }
    out.push_str(&regex::escape(&node[last..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_placeholder() {
        let pattern = CompiledPattern::compile("/groups/:group_id/join").unwrap();
        assert_eq!(pattern.keys(), ["group_id"]);
        assert!(pattern.is_match("/groups/42/join"));
        assert!(!pattern.is_match("/groups/42/join/extra"));
        assert!(!pattern.is_match("/prefix/groups/42/join"));
        assert!(!pattern.is_match("/groups//join"));
        assert_eq!(
            pattern.extract("/groups/42/join").unwrap(),
            vec![("group_id", "42")]
        );
    }

    #[test]
    fn test_placeholder_stops_at_separators() {
        let pattern = CompiledPattern::compile("/product/:id").unwrap();
        assert!(pattern.is_match("/product/7"));
        assert!(!pattern.is_match("/product/7/8"));
        assert!(!pattern.is_match("/product/7#frag"));
        assert!(!pattern.is_match("/product/7?x=1"));
    }

    #[test]
    fn test_multiple_placeholders_in_one_segment() {
        let pattern = CompiledPattern::compile("/files/:name.:ext").unwrap();
        assert_eq!(pattern.keys(), ["name", "ext"]);
        assert_eq!(
            pattern.extract("/files/report.pdf").unwrap(),
            vec![("name", "report"), ("ext", "pdf")]
        );
        // The dot is literal, not a regex wildcard.
        assert!(!pattern.is_match("/files/reportXpdf"));
    }

    #[test]
    fn test_star_placeholder_has_empty_key() {
        let pattern = CompiledPattern::compile("/assets/*").unwrap();
        assert_eq!(pattern.keys(), [""]);
        assert_eq!(pattern.extract("/assets/logo").unwrap(), vec![("", "logo")]);
    }

    #[test]
    fn test_duplicate_keys_are_kept_in_order() {
        let pattern = CompiledPattern::compile("/a/:id/b/:id").unwrap();
        assert_eq!(pattern.keys(), ["id", "id"]);
        assert_eq!(
            pattern.extract("/a/1/b/2").unwrap(),
            vec![("id", "1"), ("id", "2")]
        );
    }

    #[test]
    fn test_trailing_slash_is_prefix_match() {
        let pattern = CompiledPattern::compile("/products/").unwrap();
        assert!(pattern.is_match("/products/"));
        assert!(pattern.is_match("/products"));
        assert!(pattern.is_match("/products/liked"));
        assert!(pattern.is_match("/products/1/2/3"));
        assert!(!pattern.is_match("/productsX"));
        assert!(!pattern.is_match("/other/products/"));
    }

    #[test]
    fn test_no_trailing_slash_is_exact() {
        let pattern = CompiledPattern::compile("/login").unwrap();
        assert!(pattern.is_match("/login"));
        assert!(!pattern.is_match("/login/"));
        assert!(!pattern.is_match("/login/more"));
    }

    #[test]
    fn test_root_template_matches_everything() {
        let pattern = CompiledPattern::compile("/").unwrap();
        assert!(pattern.is_match("/"));
        assert!(pattern.is_match("/anything/at/all"));
        assert!(pattern.keys().is_empty());
    }

    #[test]
    fn test_capture_count_matches_keys() {
        for template in ["/", "/a/:b", "/:a/:b/c/*", "/x/:y-:z/"] {
            let pattern = CompiledPattern::compile(template).unwrap();
            let regex = Regex::new(pattern.as_str()).unwrap();
            assert_eq!(regex.captures_len() - 1, pattern.keys().len(), "{template}");
        }
    }
}
