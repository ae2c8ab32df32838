use super::metric_def::{METRIC_DEFINITIONS, extract_all};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The fixed-shape set of metric values for one package.
///
/// A record always carries exactly one slot per entry in
/// [`METRIC_DEFINITIONS`]. A metric whose label was not found in the report
/// is an explicit `None` and serializes as JSON `null`; it is never dropped
/// from the record and never substituted with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    values: Vec<Option<f64>>,
}

impl MetricRecord {
    /// Scrape a record out of the analyzer's textual report.
    #[must_use]
    pub fn from_report(report: &str) -> Self {
        Self { values: extract_all(report) }
    }

    /// Look up a metric value by its record key.
    ///
    /// Returns `None` for an unknown key, `Some(None)` for a known key whose
    /// label was absent from the report.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<f64>> {
        METRIC_DEFINITIONS
            .iter()
            .position(|def| def.key == key)
            .and_then(|index| self.values.get(index).copied())
    }

    /// Iterate over `(key, value)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        METRIC_DEFINITIONS.iter().zip(self.values.iter()).map(|(def, value)| (def.key, *value))
    }
}

impl Serialize for MetricRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_always_has_full_key_set() {
        let record = MetricRecord::from_report("");
        assert_eq!(record.iter().count(), METRIC_DEFINITIONS.len());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let record = MetricRecord::from_report("Lines of code  120");
        assert_eq!(record.get("loc"), Some(Some(120.0)));
        assert_eq!(record.get("classes"), Some(None));
        assert_eq!(record.get("no_such_metric"), None);
    }

    #[test]
    fn test_serializes_absent_values_as_null() {
        let record = MetricRecord::from_report("Lines of code  120\nClasses  3");
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(json["loc"], serde_json::json!(120.0));
        assert_eq!(json["classes"], serde_json::json!(3.0));
        assert!(json["lloc"].is_null());
        assert!(json["kloc"].is_null());

        // Every key is present even when its value is null
        assert_eq!(json.as_object().unwrap().len(), METRIC_DEFINITIONS.len());
    }

    #[test]
    fn test_serialized_key_order_matches_definitions() {
        let record = MetricRecord::from_report("");
        let json = serde_json::to_string(&record).unwrap();

        let mut last_position = 0;
        for def in METRIC_DEFINITIONS {
            let needle = format!("\"{}\":", def.key);
            let position = json.find(&needle).unwrap();
            assert!(position >= last_position, "key '{}' out of order", def.key);
            last_position = position;
        }
    }
}
