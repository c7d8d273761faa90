use super::reader::RawParameterSet;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Deduplicated value(s) of one parameter key
///
/// Serializes as a plain string when one value remains and as an array otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Single(String),
    Multiple(Vec<String>),
}

impl NormalizedValue {
    fn from_values(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            NormalizedValue::Single(values.remove(0))
        } else {
            NormalizedValue::Multiple(values)
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            NormalizedValue::Single(value) => std::slice::from_ref(value),
            NormalizedValue::Multiple(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn is_multi_value(&self) -> bool {
        self.len() > 1
    }
}

/// Parameters after comma splitting and deduplication, in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedParameters {
    params: IndexMap<String, NormalizedValue>,
}

impl NormalizedParameters {
    /// Normalize every key of a raw parameter set
    ///
    /// Each occurrence is split on `,` and its fragments are trimmed and
    /// deduplicated. A single-fragment occurrence becomes one scalar value. A
    /// multi-fragment occurrence becomes one comma-joined array value, and later
    /// array occurrences of the same key merge their fragments into it. Values are
    /// then deduplicated by exact, case-sensitive equality keeping first occurrence.
    pub fn from_raw(raw: &RawParameterSet) -> Self {
        tracing::debug!("Normalizing {} parameter keys", raw.len());

        let params = raw
            .iter()
            .map(|(key, occurrences)| {
                let values = normalize_occurrences(occurrences);
                (key.to_string(), NormalizedValue::from_values(values))
            })
            .collect();

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.params.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedValue)> {
        self.params.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

fn normalize_occurrences(occurrences: &[String]) -> Vec<String> {
    let mut scalars: IndexSet<String> = IndexSet::new();
    // Scalar position the array value is inserted at, and its fragments so far
    let mut array: Option<(usize, IndexSet<String>)> = None;

    for occurrence in occurrences {
        let fragments = split_fragments(occurrence);

        if fragments.len() > 1 {
            match array.as_mut() {
                Some((_, merged)) => merged.extend(fragments),
                None => array = Some((scalars.len(), fragments)),
            }
            continue;
        }

        scalars.insert(fragments.into_iter().next().unwrap_or_default());
    }

    let mut values: Vec<String> = scalars.into_iter().collect();
    if let Some((slot, fragments)) = array {
        let joined = fragments.into_iter().collect::<Vec<_>>().join(",");
        values.insert(slot, joined);
    }

    values
}

/// Split on commas, trim each fragment and drop repeated fragments
fn split_fragments(value: &str) -> IndexSet<String> {
    value
        .split(',')
        .map(|fragment| fragment.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(query: &str) -> NormalizedParameters {
        NormalizedParameters::from_raw(&RawParameterSet::parse(query))
    }

    #[test]
    fn test_duplicate_values_are_removed() {
        let params = normalize("a=1&a=1&a=2");
        let value = params.get("a").unwrap();
        assert_eq!(value.values(), ["1", "2"]);
        assert_eq!(value.len(), 2);
        assert!(value.is_multi_value());
    }

    #[test]
    fn test_single_value_stays_scalar() {
        let params = normalize("name=alice&name=alice");
        assert_eq!(
            params.get("name"),
            Some(&NormalizedValue::Single("alice".to_string()))
        );
    }

    #[test]
    fn test_comma_value_is_one_trimmed_array_value() {
        let params = normalize("n=1,%202%20,3,1");
        assert_eq!(
            params.get("n"),
            Some(&NormalizedValue::Single("1,2,3".to_string()))
        );
    }

    #[test]
    fn test_array_occurrences_merge() {
        let params = normalize("tags=a,b&tags=b,c");
        assert_eq!(
            params.get("tags"),
            Some(&NormalizedValue::Single("a,b,c".to_string()))
        );
    }

    #[test]
    fn test_scalar_and_array_occurrences_stay_separate() {
        let params = normalize("x=1&x=2,3&x=4&x=3,5");
        assert_eq!(params.get("x").unwrap().values(), ["1", "2,3,5", "4"]);
    }

    #[test]
    fn test_empty_value_after_array_is_kept() {
        let params = normalize("x=1,2&x=");
        assert_eq!(params.get("x").unwrap().values(), ["1,2", ""]);
    }

    #[test]
    fn test_large_array_keeps_first_seen_order() {
        let numbers: Vec<String> = (0..50_000).map(|n| n.to_string()).collect();
        let query = format!("n={}&n={}", numbers.join(","), numbers[..10].join(","));

        let params = normalize(&query);
        let value = params.get("n").unwrap();

        assert!(!value.is_multi_value());
        let fragments: Vec<&str> = value.values()[0].split(',').collect();
        assert_eq!(fragments.len(), 50_000);
        assert_eq!(fragments[0], "0");
        assert_eq!(fragments[49_999], "49999");
    }

    #[test]
    fn test_values_are_trimmed_before_dedup() {
        let params = normalize("a=%201&a=1%20");
        assert_eq!(params.get("a").unwrap().values(), ["1"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let params = normalize("b=True&b=true");
        assert_eq!(params.get("b").unwrap().values(), ["True", "true"]);
    }

    #[test]
    fn test_stray_commas_collapse() {
        let params = normalize("s=,");
        assert_eq!(params.get("s").unwrap().values(), [""]);
    }

    #[test]
    fn test_serializes_single_and_multiple() {
        let single = serde_json::to_value(NormalizedValue::Single("x".to_string())).unwrap();
        assert_eq!(single, serde_json::json!("x"));

        let multiple = serde_json::to_value(NormalizedValue::Multiple(vec![
            "1".to_string(),
            "2".to_string(),
        ]))
        .unwrap();
        assert_eq!(multiple, serde_json::json!(["1", "2"]));
    }
}
