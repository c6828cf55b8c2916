//! Diagnostics payloads returned by the `/debug/*` endpoints.
//!
//! Three levels, each fetched on its own:
//! - [`CorpusStats`] from `/debug/stats`
//! - [`DocumentDetail`] from `/debug/pdf/{filename}`
//! - [`PageDetail`] from `/debug/annotations/{filename}/{page}`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Corpus-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_pdfs: u64,
    pub total_annotations: u64,
    pub annotation_types: BTreeMap<String, u64>,
    pub pdf_files: Vec<String>,
}

/// Document-level detail for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub filename: String,
    pub total_pages: u64,
    pub total_text_length: u64,
    pub annotation_summary: BTreeMap<String, u64>,
    pub sample_pages: Vec<PageSummary>,
}

/// Per-page scores included in a [`DocumentDetail`] sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub page_number: u64,
    pub text_length: u64,
    pub importance_score: f64,
    pub comprehensive_score: ComprehensiveScore,
}

/// Page-level detail with grouped annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDetail {
    pub filename: String,
    pub page_number: u64,
    pub text_preview: String,
    pub importance_scores: ImportanceScores,
    pub annotations: BTreeMap<String, Vec<Annotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceScores {
    pub basic: f64,
    pub comprehensive: ComprehensiveScore,
}

/// A single detected annotation. Both fields are optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Composite importance score.
///
/// The service sends either a bare number or an object whose
/// `comprehensive_score` field holds the composite value; any other numeric
/// fields of that object are kept as `components`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComprehensiveScore", into = "RawComprehensiveScore")]
pub struct ComprehensiveScore {
    pub total: f64,
    pub components: BTreeMap<String, f64>,
}

impl ComprehensiveScore {
    pub fn scalar(total: f64) -> Self {
        Self {
            total,
            components: BTreeMap::new(),
        }
    }
}

const COMPOSITE_KEY: &str = "comprehensive_score";

/// Both accepted wire shapes of [`ComprehensiveScore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawComprehensiveScore {
    Scalar(f64),
    Breakdown(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreShapeError {
    #[error("score object has no numeric `comprehensive_score` field")]
    MissingComposite,
}

impl TryFrom<RawComprehensiveScore> for ComprehensiveScore {
    type Error = ScoreShapeError;

    fn try_from(raw: RawComprehensiveScore) -> Result<Self, Self::Error> {
        match raw {
            RawComprehensiveScore::Scalar(total) => Ok(Self::scalar(total)),
            RawComprehensiveScore::Breakdown(fields) => {
                let total = fields
                    .get(COMPOSITE_KEY)
                    .and_then(Value::as_f64)
                    .ok_or(ScoreShapeError::MissingComposite)?;
                let components = fields
                    .iter()
                    .filter(|(key, _)| key.as_str() != COMPOSITE_KEY)
                    .filter_map(|(key, value)| value.as_f64().map(|v| (key.clone(), v)))
                    .collect();
                Ok(Self { total, components })
            }
        }
    }
}

impl From<ComprehensiveScore> for RawComprehensiveScore {
    fn from(score: ComprehensiveScore) -> Self {
        if score.components.is_empty() {
            return Self::Scalar(score.total);
        }
        let mut fields: BTreeMap<String, Value> = score
            .components
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect();
        fields.insert(COMPOSITE_KEY.to_string(), Value::from(score.total));
        Self::Breakdown(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comprehensive_score_accepts_bare_number() {
        let score: ComprehensiveScore = serde_json::from_value(json!(0.75)).unwrap();
        assert_eq!(score.total, 0.75);
        assert!(score.components.is_empty());
    }

    #[test]
    fn comprehensive_score_accepts_nested_object() {
        let score: ComprehensiveScore = serde_json::from_value(json!({
            "comprehensive_score": 0.8123,
            "keyword_score": 0.5,
            "layout_score": 1,
            "label": "high"
        }))
        .unwrap();
        assert_eq!(score.total, 0.8123);
        assert_eq!(score.components.len(), 2);
        assert_eq!(score.components["layout_score"], 1.0);
    }

    #[test]
    fn comprehensive_score_object_without_composite_is_rejected() {
        let result = serde_json::from_value::<ComprehensiveScore>(json!({"keyword_score": 0.5}));
        assert!(result.is_err());
    }

    #[test]
    fn page_detail_parses_annotations_without_type_or_confidence() {
        let detail: PageDetail = serde_json::from_value(json!({
            "filename": "report.pdf",
            "page_number": 1,
            "text_preview": "Lorem",
            "importance_scores": {"basic": 0.4, "comprehensive": {"comprehensive_score": 0.6}},
            "annotations": {
                "highlight": [{"type": "highlight", "confidence": 0.9}, {}]
            }
        }))
        .unwrap();

        let highlights = &detail.annotations["highlight"];
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[1], Annotation::default());
        assert_eq!(detail.importance_scores.comprehensive.total, 0.6);
    }

    #[test]
    fn corpus_stats_requires_its_counters() {
        let result = serde_json::from_value::<CorpusStats>(json!({"pdf_files": []}));
        assert!(result.is_err());
    }
}
