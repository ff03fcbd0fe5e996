//! Core domain types shared by the engine, the loaders and the web layer.
//! These mirror the two flat files the dashboard is built from.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Role of a standard in the hierarchy.
///
/// Declaration order is the rendering order: rows are sorted by category
/// before standard, so Designated nodes always come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Designated")]
    Designated,
    #[serde(rename = "Normative")]
    Normative,
    #[serde(rename = "Informative")]
    Informative,
    #[serde(rename = "Normative-No Full Text")]
    NormativeNoFullText,
    #[serde(rename = "Informative-No Full Text")]
    InformativeNoFullText,
}

/// Chart colour used for the highlighted node, whatever its category.
pub const HIGHLIGHT_COLOR: &str = "green";

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Designated,
        Category::Normative,
        Category::Informative,
        Category::NormativeNoFullText,
        Category::InformativeNoFullText,
    ];

    /// The spelling used in the source data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Designated            => "Designated",
            Category::Normative             => "Normative",
            Category::Informative           => "Informative",
            Category::NormativeNoFullText   => "Normative-No Full Text",
            Category::InformativeNoFullText => "Informative-No Full Text",
        }
    }

    /// Parse a category from the data. Case, hyphens and underscores are
    /// ignored, so "Normative-No-Full-Text" and "normative no full text"
    /// both resolve.
    pub fn parse(s: &str) -> Option<Self> {
        let folded: String = s
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match folded.as_str() {
            "designated"               => Some(Category::Designated),
            "normative"                => Some(Category::Normative),
            "informative"              => Some(Category::Informative),
            "normative no full text"   => Some(Category::NormativeNoFullText),
            "informative no full text" => Some(Category::InformativeNoFullText),
            _                          => None,
        }
    }

    /// Segment colour in the sunburst.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Designated => "#F6BA00",
            Category::Normative | Category::NormativeNoFullText => "#030072",
            Category::Informative | Category::InformativeNoFullText => "#950200",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Edge display fields
// ---------------------------------------------------------------------------

/// Auxiliary columns of the edge table, carried through the engine untouched
/// and surfaced as hover data.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeDetails {
    pub short_title: String,
    pub committee_reference: String,
    pub classification: String,
    pub issuing_body: String,
    pub publication_date: String,
    pub ac_code: String,
}

// ---------------------------------------------------------------------------
// Record table row
// ---------------------------------------------------------------------------

/// One row of the primary record table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardRecord {
    pub identifier: String,
    pub title: String,
    pub ics: String,
    pub published: Option<NaiveDate>,
    /// Raw `Type` column. Kept as text; it is only interpreted as a
    /// [`Category`] when a lone node has to be drawn.
    pub record_type: String,
    pub designated_standard: String,
    pub connections: String,
    /// Any further CSV columns, in file order.
    pub extra: Vec<(String, String)>,
}

impl StandardRecord {
    /// Required columns of the record file, in display order.
    pub const COLUMNS: [&'static str; 7] = [
        "Identifier",
        "Title",
        "ICS",
        "Published",
        "Type",
        "Designated Standard",
        "Connections",
    ];

    /// Look up a column by its header name.
    pub fn field(&self, column: &str) -> Option<Cow<'_, str>> {
        let value = match column {
            "Identifier"          => Cow::Borrowed(self.identifier.as_str()),
            "Title"               => Cow::Borrowed(self.title.as_str()),
            "ICS"                 => Cow::Borrowed(self.ics.as_str()),
            "Published"           => Cow::Owned(self.published_display()),
            "Type"                => Cow::Borrowed(self.record_type.as_str()),
            "Designated Standard" => Cow::Borrowed(self.designated_standard.as_str()),
            "Connections"         => Cow::Borrowed(self.connections.as_str()),
            other => {
                let (_, v) = self.extra.iter().find(|(name, _)| name == other)?;
                Cow::Borrowed(v.as_str())
            }
        };
        Some(value)
    }

    /// Every column value, required columns first.
    pub fn values(&self) -> impl Iterator<Item = Cow<'_, str>> {
        Self::COLUMNS
            .iter()
            .filter_map(move |c| self.field(c))
            .chain(self.extra.iter().map(|(_, v)| Cow::Borrowed(v.as_str())))
    }

    /// ISO calendar date, or empty when the source date was missing.
    pub fn published_display(&self) -> String {
        self.published
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// The record's `Type` as a category, if it names one.
    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.record_type)
    }
}

impl Serialize for StandardRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Self::COLUMNS.len() + self.extra.len()))?;
        for column in Self::COLUMNS {
            if let Some(value) = self.field(column) {
                map.serialize_entry(column, value.as_ref())?;
            }
        }
        for (name, value) in &self.extra {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
