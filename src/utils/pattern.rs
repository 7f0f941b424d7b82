use crate::error::{Result, UpdateError};
use regex::Regex;

/// Package family filter, e.g. `steamer*`
///
/// Matching is case-sensitive and covers the whole name. `*` stands for any
/// run of characters and `?` for exactly one, neither crossing the `/` of a
/// scoped name. A pattern without wildcards matches only that exact name.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: String,
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(UpdateError::Config(
                "Filter pattern cannot be empty".to_string(),
            ));
        }

        let regex = Regex::new(&Self::glob_to_regex(pattern)).map_err(|e| {
            UpdateError::Config(format!("Invalid filter pattern '{pattern}': {e}"))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    fn glob_to_regex(pattern: &str) -> String {
        let mut regex = String::from("^");
        let mut literal = String::new();

        for ch in pattern.chars() {
            let wildcard = match ch {
                '*' => "[^/]*",
                '?' => "[^/]",
                _ => {
                    literal.push(ch);
                    continue;
                }
            };
            regex.push_str(&regex::escape(&literal));
            literal.clear();
            regex.push_str(wildcard);
        }

        regex.push_str(&regex::escape(&literal));
        regex.push('$');
        regex
    }
}
