//! Glob matching for files excluded from rendering
//!
//! Patterns are matched against `/`-separated paths relative to the project
//! root, one path segment at a time:
//! - `**` matches zero or more whole segments
//! - `*` matches any run of characters inside one segment
//! - `?` matches exactly one character inside one segment
//!
//! A pattern without `/` only matches at the root (`*.png` does not match
//! `assets/logo.png`; write `**/*.png` for that).

/// Patterns that are always excluded
pub const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**"];

/// A set of ignore globs
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    patterns: Vec<String>,
}

impl IgnoreSet {
    /// The default ignores plus template-declared patterns
    pub fn with_defaults<S: AsRef<str>>(extra: &[S]) -> Self {
        let patterns = DEFAULT_IGNORES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().map(|p| normalize(p.as_ref())))
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// Whether a relative path matches any pattern
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| glob_match(pattern, relative_path))
    }
}

/// Whether any segment of a relative path is hidden (dot-prefixed)
pub fn is_hidden(relative_path: &str) -> bool {
    relative_path
        .split('/')
        .any(|segment| segment.starts_with('.') && segment != "." && segment != "..")
}

/// Match a relative path against one glob pattern
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match_segments(&pattern, &path)
}

fn normalize(pattern: &str) -> String {
    let trimmed = pattern.trim().replace('\\', "/");
    let trimmed = trimmed.strip_prefix("./").unwrap_or(&trimmed);
    trimmed.trim_start_matches('/').to_string()
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((segment_pattern, rest)) => match path.split_first() {
            Some((segment, path_rest)) => {
                match_segment(segment_pattern, segment) && match_segments(rest, path_rest)
            }
            None => false,
        },
    }
}

/// Wildcard match within one segment
fn match_segment(pattern: &str, segment: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = segment.chars().collect();

    // Iterative matcher with single-star backtracking
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
