use regex::Regex;

/// A line of a file that matched the search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    pub path: String,
    /// 1-based.
    pub line: usize,
    pub text: String,
}

/// Finds the lines of a file that match the user's search term.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    pattern: Regex,
}

impl LineMatcher {
    /// Compile the unescaped search term as a regular expression.
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        Ok(LineMatcher {
            pattern: Regex::new(term)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Every line of `content` containing a match, in file order.
    ///
    /// Lines are split on `\n` only. A trailing newline produces a final
    /// empty line, which is numbered like any other.
    pub fn find_lines(&self, path: &str, content: &str) -> Vec<ResolvedMatch> {
        content
            .split('\n')
            .enumerate()
            .filter(|(_, line)| self.pattern.is_match(line))
            .map(|(i, line)| ResolvedMatch {
                path: path.to_string(),
                line: i + 1,
                text: line.to_string(),
            })
            .collect()
    }
}
