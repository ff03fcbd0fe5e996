//! Variant disambiguation.
//!
//! Used twice per dashboard lifetime: once at load time over the whole
//! edge table, and again inside every subtree computation, because
//! re-filtering and relinking reintroduce duplicate labels.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::label::{NodeKey, VARIANT_MARK};

/// Give every occurrence of a repeated label a distinct display string.
///
/// Equal values are grouped by raw equality; the N-th occurrence (0-based,
/// in input order) gets N marks appended. If that still collides with an
/// earlier output (inputs that already carried marks), more marks are
/// appended until it is unique. Same length and order as the input, and
/// `canonicalize(out[i]) == canonicalize(labels[i])`.
pub fn disambiguate<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut ranks: HashMap<&str, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::with_capacity(labels.len());
    let mut out = Vec::with_capacity(labels.len());

    for label in labels {
        let raw = label.as_ref();
        let rank = ranks.entry(raw).or_insert(0);
        let mut candidate = String::with_capacity(raw.len() + *rank * VARIANT_MARK.len_utf8());
        candidate.push_str(raw);
        candidate.extend(std::iter::repeat(VARIANT_MARK).take(*rank));
        *rank += 1;

        while used.contains(&candidate) {
            candidate.push(VARIANT_MARK);
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

/// Keyed form of [`disambiguate`]: each canonical identifier gets a
/// [`NodeKey`] whose variant is its occurrence rank.
pub fn assign_variants<'a, I>(canonicals: I) -> Vec<NodeKey>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranks: HashMap<&'a str, usize> = HashMap::new();
    canonicals
        .into_iter()
        .map(|id| {
            let rank = ranks.entry(id).or_insert(0);
            let key = NodeKey::new(id, *rank);
            *rank += 1;
            key
        })
        .collect()
}

/// Make a sequence of keys unique in place.
///
/// The first holder of a key keeps it; later duplicates move to the
/// smallest variant of their canonical group that nobody holds, so keys
/// other rows may point at are never renamed.
pub fn ensure_unique(keys: &mut [NodeKey]) {
    let mut taken: HashMap<String, BTreeSet<usize>> = HashMap::new();
    let mut duplicate = vec![false; keys.len()];

    for (i, key) in keys.iter().enumerate() {
        let group = taken.entry(key.canonical().to_string()).or_default();
        if !group.insert(key.variant()) {
            duplicate[i] = true;
        }
    }

    for (key, dup) in keys.iter_mut().zip(duplicate) {
        if !dup {
            continue;
        }
        let group = taken.entry(key.canonical().to_string()).or_default();
        let free = (0..).find(|v| !group.contains(v)).unwrap_or_default();
        group.insert(free);
        *key = key.with_variant(free);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::canonicalize;

    #[test]
    fn test_first_occurrence_stays_bare() {
        let out = disambiguate(&["A", "B", "A", "A"]);
        assert_eq!(out[0], "A");
        assert_eq!(out[1], "B");
        assert_eq!(out[2], format!("A{VARIANT_MARK}"));
        assert_eq!(out[3], format!("A{VARIANT_MARK}{VARIANT_MARK}"));
    }

    #[test]
    fn test_premarked_input_still_unique() {
        let marked = format!("A{VARIANT_MARK}");
        let labels = vec!["A".to_string(), marked.clone(), "A".to_string()];
        let out = disambiguate(&labels);
        let unique: HashSet<_> = out.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(out.iter().all(|o| canonicalize(o) == "A"));
    }

    #[test]
    fn test_empty_input() {
        let out = disambiguate::<&str>(&[]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_assign_variants_ranks_by_occurrence() {
        let keys = assign_variants(["X", "Y", "X"]);
        assert_eq!(keys, vec![NodeKey::new("X", 0), NodeKey::new("Y", 0), NodeKey::new("X", 1)]);
    }

    #[test]
    fn test_ensure_unique_keeps_original_holders() {
        let mut keys = vec![
            NodeKey::new("C", 0),
            NodeKey::new("C", 0),
            NodeKey::new("C", 1),
        ];
        ensure_unique(&mut keys);
        // the genuine C#1 keeps its key; the duplicate C#0 takes C#2
        assert_eq!(keys[0], NodeKey::new("C", 0));
        assert_eq!(keys[1], NodeKey::new("C", 2));
        assert_eq!(keys[2], NodeKey::new("C", 1));
    }
}
