use std::path::Path;

use crate::poll::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Reads a count written in a cell. An empty cell has no count.
pub fn parse_count(content: &str, lineno: usize) -> PollResult<Option<u64>> {
    let s = content.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<u64>().ok().map(Some).context(InvalidCountSnafu {
        lineno,
        content: s,
    })
}
