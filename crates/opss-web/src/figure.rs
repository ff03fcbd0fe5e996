//! Sunburst figure builder: turns a normalized tree into a Plotly trace.

use opss_common::{Category, StandardRecord, HIGHLIGHT_COLOR};
use opss_data::DataContext;
use opss_hierarchy::{canonicalize, relevant_subtree, TreeEdge, TreeParent};
use serde::Serialize;
use tracing::debug;

pub const PLACEHOLDER: &str = "No data selected";

/// Labels for `customdata` columns 6, 0, 1, 2, 3, 4, 5 in that order.
pub const HOVER_TEMPLATE: &str = concat!(
    "<br><b>ACCode:</b> %{customdata[6]}",
    "<br><b>Identifier:</b> %{customdata[0]}",
    "<br><b>Title:</b> %{customdata[1]}",
    "<br><b>Committee:</b> %{customdata[2]}",
    "<br><b>ICS:</b> %{customdata[3]}",
    "<br><b>Published:</b> %{customdata[4]}",
    "<br><b>Reference:</b> %{customdata[5]}<extra></extra>",
);

/// Suffix added to the hover type of the highlighted standard.
const SELECTED_SUFFIX: &str = "(selected)";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Figure {
    Placeholder { placeholder: &'static str },
    Sunburst(SunburstTrace),
}

impl Figure {
    pub fn placeholder() -> Self {
        Figure::Placeholder { placeholder: PLACEHOLDER }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub colors: Vec<&'static str>,
}

/// Plotly `sunburst` trace. `ids` are unique; `labels` repeat for
/// standards shown under several parents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub marker: Marker,
    /// Identifier, short title, committee, classification, publication
    /// date, type, AC code.
    pub customdata: Vec<[String; 7]>,
    pub hovertemplate: &'static str,
    pub insidetextorientation: &'static str,
}

impl SunburstTrace {
    fn new() -> Self {
        Self {
            kind: "sunburst",
            ids: Vec::new(),
            labels: Vec::new(),
            parents: Vec::new(),
            marker: Marker { colors: Vec::new() },
            customdata: Vec::new(),
            hovertemplate: HOVER_TEMPLATE,
            insidetextorientation: "radial",
        }
    }

    fn push(&mut self, id: String, label: String, parent: String, colour: &'static str, hover: [String; 7]) {
        self.ids.push(id);
        self.labels.push(label);
        self.parents.push(parent);
        self.marker.colors.push(colour);
        self.customdata.push(hover);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn colour(category: Category, highlighted: bool) -> &'static str {
    if highlighted {
        HIGHLIGHT_COLOR
    } else {
        category.color()
    }
}

fn hover_type(category: Category, highlighted: bool) -> String {
    if highlighted {
        format!("{}{SELECTED_SUFFIX}", category.as_str())
    } else {
        category.as_str().to_string()
    }
}

/// Root and dangling parents both render as top-level segments.
fn parent_id(parent: &TreeParent) -> String {
    match parent {
        TreeParent::Node(key) => key.to_string(),
        TreeParent::Root | TreeParent::Detached(_) => String::new(),
    }
}

fn tree_trace(tree: &[TreeEdge], highlight: Option<&str>) -> SunburstTrace {
    let mut trace = SunburstTrace::new();
    for edge in tree {
        let highlighted = highlight.is_some_and(|h| h == edge.node.canonical());
        let d = &edge.details;
        trace.push(
            edge.node.to_string(),
            edge.node.canonical().to_string(),
            parent_id(&edge.parent),
            colour(edge.category, highlighted),
            [
                edge.node.canonical().to_string(),
                d.short_title.clone(),
                d.committee_reference.clone(),
                d.classification.clone(),
                d.publication_date.clone(),
                hover_type(edge.category, highlighted),
                d.ac_code.clone(),
            ],
        );
    }
    trace
}

/// A standard with no edges at all, drawn from its record.
fn lone_trace(record: &StandardRecord, highlight: Option<&str>) -> SunburstTrace {
    let identifier = canonicalize(&record.identifier);
    let category = record.category().unwrap_or(Category::Designated);
    let highlighted = highlight.is_some_and(|h| h == identifier);

    let mut trace = SunburstTrace::new();
    trace.push(
        identifier.clone(),
        identifier.clone(),
        String::new(),
        colour(category, highlighted),
        [
            identifier,
            record.title.clone(),
            String::new(),
            record.ics.clone(),
            record.published_display(),
            hover_type(category, highlighted),
            String::new(),
        ],
    );
    trace
}

/// Build the chart for the Layer Explorer selection.
///
/// No selection, or identifiers unknown to both tables, yield the
/// placeholder. An identifier with records but no edges yields a
/// single-node chart.
pub fn build<S: AsRef<str>>(
    data: &DataContext,
    selected: &[S],
    highlight: Option<&str>,
    show_lowest_layer: bool,
    max_depth: usize,
) -> Figure {
    let ids: Vec<String> = selected
        .iter()
        .map(|s| canonicalize(s.as_ref().trim()))
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() {
        return Figure::placeholder();
    }
    let highlight = highlight.map(|h| canonicalize(h.trim()));

    let tree = relevant_subtree(&ids, data.edges(), show_lowest_layer, max_depth);
    let trace = if tree.is_empty() {
        match ids
            .iter()
            .filter(|id| !data.edges().contains_standard(id))
            .find_map(|id| data.find_record(id))
        {
            Some(record) => lone_trace(record, highlight.as_deref()),
            None => return Figure::placeholder(),
        }
    } else {
        tree_trace(&tree, highlight.as_deref())
    };

    debug!(selected = ids.len(), nodes = trace.len(), "built sunburst");
    Figure::Sunburst(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opss_data::RecordTable;
    use opss_hierarchy::{EdgeTable, RawEdge, DEFAULT_MAX_DEPTH};

    fn data() -> DataContext {
        let records = RecordTable {
            columns: Vec::new(),
            records: vec![
                StandardRecord {
                    identifier: "A".to_string(),
                    title: "Alpha".to_string(),
                    record_type: "Designated".to_string(),
                    ..Default::default()
                },
                StandardRecord {
                    identifier: "LONE".to_string(),
                    title: "On its own".to_string(),
                    record_type: "Normative".to_string(),
                    ..Default::default()
                },
            ],
        };
        let edges = EdgeTable::from_raw(vec![
            RawEdge::new("A", "Standard", Category::Designated),
            RawEdge::new("B", "A", Category::Normative),
            RawEdge::new("B", "X", Category::Normative),
            RawEdge::new("C", "B", Category::Informative),
        ]);
        DataContext::new(records, edges)
    }

    fn trace(figure: Figure) -> SunburstTrace {
        match figure {
            Figure::Sunburst(t) => t,
            other => panic!("expected a sunburst, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_selection_is_placeholder() {
        let none: [&str; 0] = [];
        assert_eq!(build(&data(), &none, None, true, DEFAULT_MAX_DEPTH), Figure::placeholder());
        assert_eq!(build(&data(), &["  "], None, true, DEFAULT_MAX_DEPTH), Figure::placeholder());
    }

    #[test]
    fn test_unknown_identifier_is_placeholder() {
        assert_eq!(build(&data(), &["NOPE"], None, true, DEFAULT_MAX_DEPTH), Figure::placeholder());
    }

    #[test]
    fn test_tree_trace_ids_are_unique() {
        let t = trace(build(&data(), &["A"], Some("B"), true, DEFAULT_MAX_DEPTH));
        assert_eq!(t.len(), 4);

        let mut ids = t.ids.clone();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), t.len());

        // both B occurrences share a label and are highlighted
        let bs: Vec<usize> = (0..t.len()).filter(|&i| t.labels[i] == "B").collect();
        assert_eq!(bs.len(), 2);
        for i in bs {
            assert_eq!(t.marker.colors[i], HIGHLIGHT_COLOR);
            assert_eq!(t.customdata[i][5], "Normative(selected)");
        }

        // top-level segments have an empty parent; every other parent is an id
        let a = t.labels.iter().position(|l| l == "A").unwrap();
        assert_eq!(t.parents[a], "");
        for parent in t.parents.iter().filter(|p| !p.is_empty()) {
            assert!(t.ids.contains(parent));
        }
    }

    #[test]
    fn test_lowest_layer_toggle() {
        let t = trace(build(&data(), &["A"], None, false, DEFAULT_MAX_DEPTH));
        assert!(!t.labels.iter().any(|l| l == "C"));
    }

    #[test]
    fn test_lone_record_is_single_node() {
        let t = trace(build(&data(), &["LONE"], Some("LONE"), true, DEFAULT_MAX_DEPTH));
        assert_eq!(t.ids, vec!["LONE"]);
        assert_eq!(t.parents, vec![""]);
        assert_eq!(t.customdata[0][1], "On its own");
        assert_eq!(t.marker.colors[0], HIGHLIGHT_COLOR);
    }

    #[test]
    fn test_serializes_as_plotly_trace() {
        let json = serde_json::to_value(build(&data(), &["A"], None, true, DEFAULT_MAX_DEPTH)).unwrap();
        assert_eq!(json["type"], "sunburst");
        assert!(json["marker"]["colors"].is_array());
        assert_eq!(json["hovertemplate"], HOVER_TEMPLATE);

        let none: [&str; 0] = [];
        let json = serde_json::to_value(build(&data(), &none, None, true, DEFAULT_MAX_DEPTH)).unwrap();
        assert_eq!(json["placeholder"], PLACEHOLDER);
    }
}
