/*!

This is the long-form manual for `poll_statistics` and `pollstats`.

## Percentages

Every counter gets the share of its count in the total, rounded to two decimal places.
Halves are rounded away from zero: 1 vote out of 32 is `3.13` percent.

The rounded percentages do not always add up to 100. For example, 4, 3 and 2 votes out of 9
give `44.44`, `33.33` and `22.22`, which sum up to `99.99`. The difference with 100 (the
*excess*, which can be negative) is then given to one counter:

- if a single counter has the highest percentage, it takes the excess: `44.45`, `33.33`, `22.22`;
- if several counters share the highest percentage, the counter with the lowest percentage takes
  it. When several counters share the lowest percentage, the first one in the order of the poll
  is picked. For example, 3, 3 and 1 votes give `42.86`, `42.86` and `14.28`;
- if all the counters share the same percentage (3 counters with one vote each), no counter is
  favored and the percentages stay at `33.33`. The summary then reports `"balanced": false`.

A poll with no vote at all has no percentages and is reported as an error. So are counts that
add up to more than `18446744073709551615`.

## Configuration

The `--config` flag points to a JSON file:

```json
{
  "outputSettings": {
    "pollTitle": "Team lunch",
    "pollDescription": "Where do we go on Friday?",
    "outputDirectory": "output"
  },
  "countSources": [
    {
      "provider": "csv",
      "filePath": "lunch_tally.csv",
      "nameColumnIndex": 1,
      "countColumnIndex": 2,
      "firstCountRowIndex": 2
    }
  ],
  "counters": [
    { "name": "Pizza" },
    { "name": "Sushi" },
    { "name": "Write-in", "excluded": true }
  ]
}
```

- `outputSettings.pollTitle` is mandatory, the description is optional. If `outputDirectory` is
  provided and `--out` is not, the summary is written to `summary.json` in this directory,
  which is created if needed.
- `countSources` lists the files with the counts. The paths are relative to the configuration
  file. The counts of a counter that appears in several rows or several files are added.
- `counters` declares the counters in display order. A name found in the sources that is not
  declared is an error. The counts of `excluded` counters are dropped. If no counter is declared,
  the counters are the names found in the sources, in the order they first appear.

A poll must have at least two counters.

## Input formats

The following providers are supported:
* `csv` Comma Separated Values
* `xlsx` Excel spreadsheets
* `json` a list of counts in JSON

### `csv`

One counter per line. By default, the name is in the first column and the count in the
second one. The options `nameColumnIndex`, `countColumnIndex` and `firstCountRowIndex`
change this layout. They start at 1 and the columns may also be given with
their Excel names (`A`, `B`, ...). Set `firstCountRowIndex` to 2 to skip a header line.
A line with an empty count is skipped.

### `xlsx`

The same layout as `csv`, in an Excel worksheet. If the file has several worksheets, the name
of the worksheet must be given with `excelWorksheetName` (or `--excel-worksheet-name`).

### `json`

```json
[
  { "name": "Pizza", "count": 4 },
  { "name": "Sushi", "count": 3 }
]
```

## Output

```json
{
  "config": { "title": "Team lunch", "description": "Where do we go on Friday?", "total": "9" },
  "results": [
    { "name": "Pizza", "count": "4", "percent": "44.45" },
    { "name": "Sushi", "count": "3", "percent": "33.33" },
    { "name": "Tacos", "count": "2", "percent": "22.22" }
  ],
  "balanced": true
}
```

With `--reference`, the summary is compared to the content of a reference file and any
difference is reported as an error.

*/
