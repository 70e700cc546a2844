// Primitives for reading CSV files.

use std::fs::File;

use crate::poll::{io_common::make_default_id, io_common::parse_count, *};

pub fn read_csv_counts(path: String, cfs: &FileSource) -> PollResult<Vec<ParsedCount>> {
    let default_id = make_default_id(&path);

    let name_idx = cfs.name_column_index()?;
    let count_idx = cfs.count_column_index()?;

    let mut res: Vec<ParsedCount> = Vec::new();
    let (records, row_offset) = get_records(&path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_counts: lineno: {:?} line: {:?}", lineno, line);
        // Blank lines in the middle of a tally.
        if line.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let name = line
            .get(name_idx)
            .context(LineTooShortSnafu { lineno })?
            .trim()
            .to_string();
        let count = parse_count(
            line.get(count_idx).context(LineTooShortSnafu { lineno })?,
            lineno,
        )?;
        res.push(ParsedCount {
            id: default_id(lineno),
            name,
            count,
        });
    }
    Ok(res)
}

fn get_records(
    path: &String,
    cfs: &FileSource,
) -> PollResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_count_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
