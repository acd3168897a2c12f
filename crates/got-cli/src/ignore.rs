//! Ignore rules: which untracked paths stay out of sight.
//!
//! Rules come from `.git/info/exclude` (repo-wide) and from `.gitignore`
//! blobs staged in the index, each scoped to the directory holding it.
//! Within a source, the last matching rule wins; a `!` prefix negates.

use anyhow::Result;
use bstr::{BStr, BString, ByteSlice};
use got_object::Object;
use got_repository::Repository;

#[derive(Debug, Clone)]
struct Rule {
    negate: bool,
    pattern: String,
}

#[derive(Debug, Default)]
pub struct IgnoreRules {
    /// Repo-wide rules, matched against the full relative path.
    absolute: Vec<Rule>,
    /// Per-directory rules: (directory path, rules), matched against the
    /// path relative to that directory.
    scoped: Vec<(BString, Vec<Rule>)>,
}

impl IgnoreRules {
    /// Gather rules from the repository.
    pub fn load(repo: &Repository) -> Result<Self> {
        let mut rules = Self::default();

        let exclude = repo.git_path("info/exclude");
        if exclude.is_file() {
            rules.absolute = parse_rules(&std::fs::read(exclude)?);
        }

        let index = repo.load_index()?;
        for entry in index.iter() {
            let path = entry.path.as_bstr();
            if path.as_bytes() != b".gitignore" && !path.ends_with_str("/.gitignore") {
                continue;
            }
            let dir = match path.rfind_byte(b'/') {
                Some(pos) => BString::from(&path[..pos]),
                None => BString::from(""),
            };
            if let Object::Blob(blob) = repo.odb().read(&entry.id)? {
                rules.scoped.push((dir, parse_rules(&blob.data)));
            }
        }

        Ok(rules)
    }

    /// Whether a worktree-relative path is ignored.
    pub fn is_ignored(&self, path: &BStr) -> bool {
        // Scoped rules first, most specific directory first.
        let mut scopes: Vec<&(BString, Vec<Rule>)> = self
            .scoped
            .iter()
            .filter(|(dir, _)| in_scope(dir.as_bstr(), path))
            .collect();
        scopes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        for (dir, rules) in scopes {
            let rel = strip_scope(dir.as_bstr(), path);
            if let Some(ignored) = match_rules(rules, rel) {
                return ignored;
            }
        }

        match_rules(&self.absolute, path).unwrap_or(false)
    }
}

/// Apply rules in order; the last match wins. `None` when nothing matched.
fn match_rules(rules: &[Rule], path: &BStr) -> Option<bool> {
    let mut verdict = None;
    for rule in rules {
        if rule_matches(&rule.pattern, path) {
            verdict = Some(!rule.negate);
        }
    }
    verdict
}

fn in_scope(dir: &BStr, path: &BStr) -> bool {
    if dir.is_empty() {
        return true;
    }
    path.starts_with_str(dir) && path.get(dir.len()) == Some(&b'/')
}

fn strip_scope<'a>(dir: &BStr, path: &'a BStr) -> &'a BStr {
    if dir.is_empty() {
        path
    } else {
        path.as_bytes()[dir.len() + 1..].as_bstr()
    }
}

fn rule_matches(pattern: &str, path: &BStr) -> bool {
    // A trailing slash means "this directory and everything below".
    if let Some(dir) = pattern.strip_suffix('/') {
        return path.starts_with(dir.as_bytes())
            && path.get(dir.len()) == Some(&b'/');
    }

    // A pattern with a slash anchors to the scope root; otherwise it
    // matches the basename of any component.
    if pattern.contains('/') {
        glob_match(pattern.as_bytes(), path)
    } else {
        let basename = match path.rfind_byte(b'/') {
            Some(pos) => path[pos + 1..].as_bstr(),
            None => path,
        };
        glob_match(pattern.as_bytes(), basename)
    }
}

/// Minimal glob: `*` matches any run of non-separator bytes, `?` exactly
/// one.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.first(), text.first()) {
        (None, None) => true,
        (Some(b'*'), _) => {
            glob_match(&pattern[1..], text)
                || (!text.is_empty()
                    && text[0] != b'/'
                    && glob_match(pattern, &text[1..]))
        }
        (Some(b'?'), Some(&t)) if t != b'/' => glob_match(&pattern[1..], &text[1..]),
        (Some(&p), Some(&t)) if p == t => glob_match(&pattern[1..], &text[1..]),
        _ => false,
    }
}

fn parse_rules(raw: &[u8]) -> Vec<Rule> {
    let mut rules = Vec::new();
    for line in raw.split(|&b| b == b'\n') {
        let line = line.trim();
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        let (negate, pattern) = if line[0] == b'!' {
            (true, &line[1..])
        } else {
            (false, line)
        };
        rules.push(Rule {
            negate,
            pattern: String::from_utf8_lossy(pattern).into_owned(),
        });
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(text: &str) -> Vec<Rule> {
        parse_rules(text.as_bytes())
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let parsed = rules("# header\n\n*.log\n!keep.log\n");
        assert_eq!(parsed.len(), 2);
        assert!(!parsed[0].negate);
        assert_eq!(parsed[0].pattern, "*.log");
        assert!(parsed[1].negate);
        assert_eq!(parsed[1].pattern, "keep.log");
    }

    #[test]
    fn glob_basics() {
        assert!(glob_match(b"*.log", b"debug.log"));
        assert!(glob_match(b"?.txt", b"a.txt"));
        assert!(!glob_match(b"?.txt", b"ab.txt"));
        assert!(!glob_match(b"*.log", b"log"));
        // `*` never crosses a separator.
        assert!(!glob_match(b"*.log", b"dir/debug.log"));
    }

    #[test]
    fn basename_matching_for_plain_patterns() {
        assert!(rule_matches("*.log", BStr::new("deep/nested/trace.log")));
        assert!(!rule_matches("*.log", BStr::new("deep/log/file.txt")));
    }

    #[test]
    fn anchored_patterns_match_full_path() {
        assert!(rule_matches("build/*.o", BStr::new("build/main.o")));
        assert!(!rule_matches("build/*.o", BStr::new("src/build/main.o")));
    }

    #[test]
    fn directory_pattern_matches_contents() {
        assert!(rule_matches("target/", BStr::new("target/debug/foo")));
        assert!(!rule_matches("target/", BStr::new("targets/foo")));
    }

    #[test]
    fn last_match_wins_with_negation() {
        let parsed = rules("*.log\n!important.log\n");
        assert_eq!(match_rules(&parsed, BStr::new("a.log")), Some(true));
        assert_eq!(
            match_rules(&parsed, BStr::new("important.log")),
            Some(false)
        );
        assert_eq!(match_rules(&parsed, BStr::new("a.txt")), None);
    }
}
