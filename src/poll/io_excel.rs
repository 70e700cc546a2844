use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::poll::{io_common::make_default_id, io_common::parse_count, *};

/// Reads the counts from an Excel worksheet, laid out like a CSV file: one counter per row.
pub fn read_excel_counts(path: String, cfs: &FileSource) -> PollResult<Vec<ParsedCount>> {
    let default_id = make_default_id(&path);

    let wrange = get_range(&path, cfs)?;
    let name_idx = cfs.name_column_index()?;
    let count_idx = cfs.count_column_index()?;
    let first_row = cfs.first_count_row_index()?;

    let mut res: Vec<ParsedCount> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        let lineno = idx + 1;
        debug!("read_excel_counts: lineno: {:?} row: {:?}", lineno, row);
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            continue;
        }
        let name = match row.get(name_idx).context(LineTooShortSnafu { lineno })? {
            DataType::String(s) => s.trim().to_string(),
            DataType::Int(i) => i.to_string(),
            DataType::Float(f) => f.to_string(),
            c => {
                return ExcelWrongCellTypeSnafu {
                    lineno,
                    content: format!("{:?}", c),
                }
                .fail();
            }
        };
        let count = read_count_cell(row.get(count_idx), lineno)?;
        res.push(ParsedCount {
            id: default_id(lineno),
            name,
            count,
        });
    }
    Ok(res)
}

fn read_count_cell(cell: Option<&DataType>, lineno: usize) -> PollResult<Option<u64>> {
    match cell {
        // Trailing empty cells may be cut from the range.
        None | Some(DataType::Empty) => Ok(None),
        Some(DataType::Int(i)) if *i >= 0 => Ok(Some(*i as u64)),
        Some(DataType::Float(f)) if *f >= 0.0 && f.fract() == 0.0 => Ok(Some(*f as u64)),
        Some(DataType::String(s)) => parse_count(s, lineno),
        Some(c) => InvalidCountSnafu {
            lineno,
            content: format!("{:?}", c),
        }
        .fail(),
    }
}

fn get_range(path: &String, cfs: &FileSource) -> PollResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_file: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> =
        open_workbook(path.clone()).context(OpeningExcelSnafu { path: path.clone() })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path: path.clone(),
                worksheet: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path: path.clone() })?;

        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu {}.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_file: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => TooManyWorksheetsSnafu { path: path.clone() }.fail(),
        }
    }
}
