use serde::{Deserialize, Serialize};

use crate::poll::{io_common::make_default_id, *};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct JsonCount {
    name: String,
    count: Option<u64>,
}

/// Reads a list of counts: `[{"name": "Alice", "count": 3}, ...]`
pub fn read_json_counts(path: String) -> PollResult<Vec<ParsedCount>> {
    let default_id = make_default_id(&path);
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let counts: Vec<JsonCount> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_json_counts: {:?}", counts);
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(idx, jc)| ParsedCount {
            id: default_id(idx + 1),
            name: jc.name,
            count: jc.count,
        })
        .collect())
}
