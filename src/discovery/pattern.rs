//! Include/exclude glob matching

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Compiled include pattern plus exclude patterns
#[derive(Debug, Clone)]
pub struct PathMatcher {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathMatcher {
    /// Compile the patterns, expanding `{a,b}` alternatives
    pub fn new(include: &str, exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: exclude
                .iter()
                .map(|p| compile(p))
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .flatten()
                .collect(),
        })
    }

    /// Check a path relative to the discovery root
    pub fn matches(&self, relative: &Path) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
    }
}

fn compile(pattern: &str) -> Result<Vec<Pattern>> {
    expand_braces(pattern)
        .into_iter()
        .map(|expanded| {
            Pattern::new(&expanded).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

/// Expand shell-style brace alternatives: `*.{ts,tsx}` -> `*.ts`, `*.tsx`.
/// Braces without a top-level comma are kept literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close, alternatives)) = find_alternation(pattern) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    alternatives
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

/// Locate the first brace group containing a top-level comma
fn find_alternation(pattern: &str) -> Option<(usize, usize, Vec<&str>)> {
    let bytes = pattern.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = pattern[search_from..].find('{') {
        let open = search_from + offset;
        let mut depth = 0usize;
        let mut splits = Vec::new();
        let mut close = None;

        for (i, &b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                b',' if depth == 1 => splits.push(i),
                _ => {}
            }
        }

        let close = close?;
        if !splits.is_empty() {
            let mut alternatives = Vec::with_capacity(splits.len() + 1);
            let mut start = open + 1;
            for split in splits {
                alternatives.push(&pattern[start..split]);
                start = split + 1;
            }
            alternatives.push(&pattern[start..close]);
            return Some((open, close, alternatives));
        }

        search_from = open + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braces() {
        assert_eq!(
            expand_braces("**/*.{js,jsx,ts,tsx}"),
            vec!["**/*.js", "**/*.jsx", "**/*.ts", "**/*.tsx"]
        );
        assert_eq!(
            expand_braces("{src,lib}/*.{a,b}"),
            vec!["src/*.a", "src/*.b", "lib/*.a", "lib/*.b"]
        );
        assert_eq!(expand_braces("a{b,c{d,e}}"), vec!["ab", "acd", "ace"]);
        assert_eq!(expand_braces("{single}/x"), vec!["{single}/x"]);
        assert_eq!(expand_braces("no/braces"), vec!["no/braces"]);
        assert_eq!(expand_braces("{unclosed,x"), vec!["{unclosed,x"]);
    }

    #[test]
    fn test_include_and_exclude() {
        let matcher = PathMatcher::new(
            "**/pages/**/*.{js,jsx,ts,tsx}",
            &["**/node_modules/**".to_string(), "**/pages/api/**".to_string()],
        )
        .unwrap();

        assert!(matcher.matches(Path::new("pages/index.js")));
        assert!(matcher.matches(Path::new("pages/_app.tsx")));
        assert!(matcher.matches(Path::new("pages/[slug]/about.tsx")));
        assert!(matcher.matches(Path::new("web/pages/blog/post.ts")));
        assert!(!matcher.matches(Path::new("pages/api/index.ts")));
        assert!(!matcher.matches(Path::new("node_modules/lib/pages/a/index.ts")));
        assert!(!matcher.matches(Path::new("pages/styles.css")));
        assert!(!matcher.matches(Path::new("components/button.tsx")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PathMatcher::new("***/x", &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
