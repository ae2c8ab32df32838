use regex::Regex;
use std::sync::LazyLock;

/// A single metric scraped from the analyzer's report: the key used in the
/// output record and the literal label preceding the value in the report text.
#[derive(Debug)]
pub struct MetricDef {
    pub key: &'static str,
    pub label: &'static str,
}

/// The fixed metric set, in record order.
///
/// Labels are matched literally against the report, including the
/// parenthetical qualifier on the Kan defect estimator.
pub const METRIC_DEFINITIONS: &[MetricDef] = &[
    MetricDef { key: "loc", label: "Lines of code" },
    MetricDef { key: "lloc", label: "Logical lines of code" },
    MetricDef { key: "lloc_class", label: "Logical lines of code by class" },
    MetricDef { key: "lloc_method", label: "Logical lines of code by method" },
    MetricDef { key: "classes", label: "Classes" },
    MetricDef { key: "methods", label: "Methods" },
    MetricDef { key: "methods_by_class", label: "Methods by class" },
    MetricDef { key: "lcm", label: "Lack of cohesion of methods" },
    MetricDef { key: "aci", label: "Average afferent coupling" },
    MetricDef { key: "eco", label: "Average efferent coupling" },
    MetricDef { key: "ai", label: "Average instability" },
    MetricDef { key: "dit", label: "Depth of Inheritance Tree" },
    MetricDef { key: "cc", label: "Average Cyclomatic complexity by class" },
    MetricDef { key: "wmc", label: "Average Weighted method count by class" },
    MetricDef { key: "rcs", label: "Average Relative system complexity" },
    MetricDef { key: "ad", label: "Average Difficulty" },
    MetricDef { key: "abc", label: "Average bugs by class" },
    MetricDef { key: "kloc", label: "Average defects by class (Kan)" },
];

/// Per-definition search patterns: the literal label, whitespace, then a
/// numeric token.
static LABEL_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    METRIC_DEFINITIONS
        .iter()
        .map(|def| Regex::new(&format!(r"{}\s+([0-9.]+)", regex::escape(def.label))).expect("invalid metric label regex"))
        .collect()
});

/// Scan the report text and produce the value for every definition, in
/// definition order.
///
/// The first occurrence of a label wins; an absent label or an unparseable
/// token yields `None` for that slot.
pub(crate) fn extract_all(report: &str) -> Vec<Option<f64>> {
    LABEL_REGEXES
        .iter()
        .map(|regex| {
            regex
                .captures(report)
                .and_then(|captures| captures.get(1))
                .and_then(|token| token.as_str().parse().ok())
        })
        .collect()
}
