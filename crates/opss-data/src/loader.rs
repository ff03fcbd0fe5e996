//! Flat-file loaders for the record and edge tables.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use opss_common::{Category, EdgeDetails, StandardRecord};
use opss_hierarchy::{canonicalize, EdgeTable, RawEdge};
use tracing::{debug, info, warn};

use crate::error::{LoadError, Result};

/// Date format of the `Published` column.
const PUBLISHED_FORMAT: &str = "%d/%m/%Y";

const EDGE_REQUIRED: [&str; 3] = ["standard", "parent", "type"];

/// Loaded record table plus its header row, in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub records: Vec<StandardRecord>,
}

fn open(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

fn headers(reader: &mut csv::Reader<File>, path: &Path) -> Result<Vec<String>> {
    let headers = reader.headers().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

/// Position of every required column, or the first one missing.
fn require(headers: &[String], required: &[&str], path: &Path) -> Result<Vec<usize>> {
    required
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    file: path.display().to_string(),
                    column: column.to_string(),
                })
        })
        .collect()
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

/// Parse `DD/MM/YYYY`, ignoring a trailing time part.
pub fn parse_published(raw: &str) -> Option<NaiveDate> {
    let date = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(date, PUBLISHED_FORMAT).ok()
}

/// Load the primary record table.
pub fn load_records(path: &Path) -> Result<RecordTable> {
    debug!("Loading records from {:?}", path);
    let mut reader = open(path)?;
    let columns = headers(&mut reader, path)?;
    let idx = require(&columns, &StandardRecord::COLUMNS, path)?;

    let extra_idx: Vec<usize> = (0..columns.len()).filter(|i| !idx.contains(i)).collect();
    let mut records = Vec::new();
    let mut bad_dates = 0usize;

    for result in reader.records() {
        let row = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let published_raw = cell(&row, idx[3]);
        let published = parse_published(published_raw);
        if published.is_none() && !published_raw.is_empty() {
            bad_dates += 1;
        }

        records.push(StandardRecord {
            identifier: canonicalize(cell(&row, idx[0])),
            title: cell(&row, idx[1]).to_string(),
            ics: cell(&row, idx[2]).to_string(),
            published,
            record_type: cell(&row, idx[4]).to_string(),
            designated_standard: cell(&row, idx[5]).to_string(),
            connections: cell(&row, idx[6]).to_string(),
            extra: extra_idx
                .iter()
                .map(|&i| (columns[i].clone(), cell(&row, i).to_string()))
                .collect(),
        });
    }

    if bad_dates > 0 {
        warn!(count = bad_dates, "records with an unparseable Published date");
    }
    info!("Loaded {} records", records.len());
    Ok(RecordTable { columns, records })
}

/// Load the edge table and disambiguate its standards.
pub fn load_edges(path: &Path) -> Result<EdgeTable> {
    debug!("Loading edges from {:?}", path);
    let mut reader = open(path)?;
    let columns = headers(&mut reader, path)?;
    let idx = require(&columns, &EDGE_REQUIRED, path)?;

    let optional = |name: &str| columns.iter().position(|h| h == name);
    let short_title = optional("Short_Title");
    let committee = optional("CommitteeReference");
    let classification = optional("Classification");
    let issuing_body = optional("IssuingBody");
    let publication_date = optional("PublicationDate");
    let ac_code = optional("ACCode");

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let row = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(category) = Category::parse(cell(&row, idx[2])) else {
            skipped += 1;
            continue;
        };
        let text = |i: Option<usize>| i.map(|i| cell(&row, i).to_string()).unwrap_or_default();

        rows.push(
            RawEdge::new(cell(&row, idx[0]), cell(&row, idx[1]), category).with_details(EdgeDetails {
                short_title: text(short_title),
                committee_reference: text(committee),
                classification: text(classification),
                issuing_body: text(issuing_body),
                publication_date: text(publication_date),
                ac_code: text(ac_code),
            }),
        );
    }

    if skipped > 0 {
        warn!(count = skipped, "edge rows with an unknown type were skipped");
    }
    let table = EdgeTable::from_raw(rows);
    info!("Loaded {} edges", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const RECORDS: &str = "\
Identifier,Title,ICS,Published,Type,Designated Standard,Connections,Committee
BS EN 71-1(inaccessible),Safety of toys,97.200.50,31/01/2023,Designated,Yes,4,CW/1
BS 1363,Plugs,29.120.30,not a date,Normative,No,1,PEL/23
";

    const EDGES: &str = "\
standard,parent,type,Short_Title,ACCode
BS EN 71-1,Standard,Designated,Toys,AC1
BS 1363,BS EN 71-1,Normative,Plugs,
BS 1363,BS 7671(inaccessible),Normative-No Full Text,Plugs,
ISO 1,BS 1363,Mystery,,
";

    #[test]
    fn test_parse_published() {
        assert_eq!(parse_published("31/01/2023"), NaiveDate::from_ymd_opt(2023, 1, 31));
        assert_eq!(parse_published("01/02/2020 00:00:00"), NaiveDate::from_ymd_opt(2020, 2, 1));
        assert_eq!(parse_published("2020-02-01"), None);
        assert_eq!(parse_published(""), None);
    }

    #[test]
    fn test_load_records() {
        let file = fixture(RECORDS);
        let table = load_records(file.path()).unwrap();

        assert_eq!(table.records.len(), 2);
        let first = &table.records[0];
        assert_eq!(first.identifier, "BS EN 71-1");
        assert_eq!(first.published, NaiveDate::from_ymd_opt(2023, 1, 31));
        assert_eq!(first.extra, vec![("Committee".to_string(), "CW/1".to_string())]);
        assert_eq!(table.records[1].published, None);
        assert_eq!(table.columns.last().map(String::as_str), Some("Committee"));
    }

    #[test]
    fn test_spliced_tag_matches_edge_identifier() {
        let records = fixture(
            "Identifier,Title,ICS,Published,Type,Designated Standard,Connections\n\
             BS 8((inaccessible)inaccessible),Ladders,,,Designated,Yes,0\n",
        );
        let edges = fixture(
            "standard,parent,type,Short_Title,ACCode\n\
             BS 8((inaccessible)inaccessible),Standard,Designated,Ladders,\n",
        );

        let table = load_records(records.path()).unwrap();
        assert_eq!(table.records[0].identifier, "BS 8");
        let edges = load_edges(edges.path()).unwrap();
        assert!(edges.contains_standard(&table.records[0].identifier));
    }

    #[test]
    fn test_missing_record_column() {
        let file = fixture("Identifier,Title\nA,B\n");
        match load_records(file.path()) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "ICS"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_load_edges() {
        let file = fixture(EDGES);
        let table = load_edges(file.path()).unwrap();

        // the unknown "Mystery" row is skipped
        assert_eq!(table.len(), 3);
        let edges = table.edges();
        assert!(edges[0].parent.is_root());
        assert_eq!(edges[0].details.ac_code, "AC1");
        assert_eq!(edges[2].standard.variant(), 1);
        assert_eq!(edges[2].parent.canonical(), Some("BS 7671"));
        assert_eq!(edges[2].category, Category::NormativeNoFullText);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_edges(Path::new("/nonexistent/edges.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
