use crate::poll::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "pollTitle")]
    pub poll_title: String,
    #[serde(rename = "pollDescription")]
    pub poll_description: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub title: String,
    pub description: String,
    pub total: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "nameColumnIndex")]
    _name_column_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    _count_column_index: Option<JSValue>,
    #[serde(rename = "firstCountRowIndex")]
    _first_count_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// A source with the default layout: names in the first column, counts in the
    /// second one, starting from the first row.
    pub fn new(provider: &str, file_path: &str, excel_worksheet_name: Option<String>) -> Self {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _name_column_index: None,
            _count_column_index: None,
            _first_count_row_index: None,
            excel_worksheet_name,
        }
    }

    // All the indexes are 1-based in the configuration, and 0-based here.

    pub fn name_column_index(&self) -> PollResult<usize> {
        Ok(read_js_int_or(&self._name_column_index, 1)? - 1)
    }

    pub fn count_column_index(&self) -> PollResult<usize> {
        Ok(read_js_int_or(&self._count_column_index, 2)? - 1)
    }

    pub fn first_count_row_index(&self) -> PollResult<usize> {
        Ok(read_js_int_or(&self._first_count_row_index, 1)? - 1)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCounter {
    pub name: String,
    pub excluded: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "countSources")]
    pub count_sources: Vec<FileSource>,
    #[serde(default)]
    pub counters: Vec<ConfigCounter>,
}

pub fn read_config(path: &str) -> PollResult<PollConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&config_str).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: String) -> PollResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int_or(x: &Option<JSValue>, default: usize) -> PollResult<usize> {
    match x {
        None => Ok(default),
        Some(_) => read_js_int(x),
    }
}

/// Reads a 1-based index, written as a number, a string, or an Excel column name.
fn read_js_int(x: &Option<JSValue>) -> PollResult<usize> {
    let res = match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        // Parsing the Excel-style columns: A, B, ..., Z, AA, AB, ...
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_uppercase().chars().try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'A' as usize + 1)
            })
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok(),
        _ => None,
    };
    res.filter(|idx| *idx >= 1)
        .context(ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_indexes() {
        assert_eq!(read_js_int(&Some(json!(3))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("3"))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("c"))).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("AA"))).unwrap(), 27);
        assert!(read_js_int(&Some(json!(0))).is_err());
        assert!(read_js_int(&Some(json!("-1"))).is_err());
        assert!(read_js_int(&None).is_err());
        assert!(read_js_int(&Some(json!("Z".repeat(40)))).is_err());
    }

    #[test]
    fn default_layout() {
        let cfs = FileSource::new("csv", "counts.csv", None);
        assert_eq!(cfs.name_column_index().unwrap(), 0);
        assert_eq!(cfs.count_column_index().unwrap(), 1);
        assert_eq!(cfs.first_count_row_index().unwrap(), 0);
    }

    #[test]
    fn parses_config() {
        let config: PollConfig = serde_json::from_value(json!({
            "outputSettings": { "pollTitle": "Lunch" },
            "countSources": [{
                "provider": "xlsx",
                "filePath": "lunch.xlsx",
                "nameColumnIndex": "B",
                "countColumnIndex": 4,
                "firstCountRowIndex": "2",
                "excelWorksheetName": "Results"
            }]
        }))
        .unwrap();
        assert!(config.counters.is_empty());
        assert_eq!(config.output_settings.poll_description, None);
        let cfs = &config.count_sources[0];
        assert_eq!(cfs.name_column_index().unwrap(), 1);
        assert_eq!(cfs.count_column_index().unwrap(), 3);
        assert_eq!(cfs.first_count_row_index().unwrap(), 1);
        assert_eq!(cfs.excel_worksheet_name, Some("Results".to_string()));
    }
}
