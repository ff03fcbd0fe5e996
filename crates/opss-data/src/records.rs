//! Primary table queries: global search, multi-column sort, pagination.

use std::cmp::Ordering;

use opss_common::{ApiError, ApiResult, StandardRecord};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// One sort key: column header plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub ascending: bool,
}

impl SortKey {
    /// Parse `Column:asc,Column:desc`. A bare column sorts ascending.
    pub fn parse_list(raw: &str, known: &[String]) -> ApiResult<Vec<SortKey>> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (column, direction) = match part.rsplit_once(':') {
                    Some((c, d)) => (c.trim(), d.trim()),
                    None => (part, "asc"),
                };
                let ascending = match direction.to_ascii_lowercase().as_str() {
                    "asc" => true,
                    "desc" => false,
                    other => return Err(ApiError::BadRequest(format!("unknown sort direction `{other}`"))),
                };
                if !known.iter().any(|k| k == column) {
                    return Err(ApiError::BadRequest(format!("unknown sort column `{column}`")));
                }
                Ok(SortKey {
                    column: column.to_string(),
                    ascending,
                })
            })
            .collect()
    }
}

/// Query over the record table.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub search: String,
    pub sort: Vec<SortKey>,
    pub page: usize,
    pub page_size: usize,
}

/// One page of query results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub info: String,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            info: self.info,
        }
    }
}

/// Split a comma-separated search string into lowercased terms.
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Does any term appear in any column of the record?
pub fn matches(record: &StandardRecord, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    record.values().any(|value| {
        let value = value.to_lowercase();
        terms.iter().any(|t| value.contains(t.as_str()))
    })
}

fn compare(a: &StandardRecord, b: &StandardRecord, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = a.field(&key.column).unwrap_or_default();
        let right = b.field(&key.column).unwrap_or_default();
        let ord = left.cmp(&right);
        let ord = if key.ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

pub fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// Slice one page out of `rows`. A page past the end shows the last page.
pub fn paginate<T>(rows: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = clamp_page_size(page_size);
    let total = rows.len();
    let last_page = total.saturating_sub(1) / page_size;
    let page = page.min(last_page);
    let start = page * page_size;

    let info = range_info(page, page_size, total);
    let rows = rows.into_iter().skip(start).take(page_size).collect();
    Page {
        rows,
        page,
        page_size,
        total,
        info,
    }
}

/// "Showing 11 - 20 of 1,234 records", or "No rows to display".
pub fn range_info(page: usize, page_size: usize, total: usize) -> String {
    if total == 0 {
        return "No rows to display".to_string();
    }
    let start = page * page_size + 1;
    let end = ((page + 1) * page_size).min(total);
    format!("Showing {start} - {end} of {} records", thousands(total))
}

fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Filter, sort and paginate the record table.
pub fn run_query<'a>(records: &'a [StandardRecord], query: &RecordQuery) -> Page<&'a StandardRecord> {
    let terms = search_terms(&query.search);
    let mut hits: Vec<&StandardRecord> = records.iter().filter(|r| matches(r, &terms)).collect();
    if !query.sort.is_empty() {
        hits.sort_by(|a, b| compare(a, b, &query.sort));
    }
    paginate(hits, query.page, query.page_size)
}
