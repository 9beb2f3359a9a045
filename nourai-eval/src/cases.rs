//! Evaluation test cases and their JSON loader.

use std::path::Path;

use nourai_rag::ClinicalAttributes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One evaluation case: a query, its expected answer, and the document ids
/// a good retrieval should surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub query: String,
    pub expected_answer: String,
    #[serde(default)]
    pub relevant_docs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_data: Option<ClinicalAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// Load a JSON array of test cases from disk.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_case_deserializes_with_defaults() {
        let json = r#"[{
            "id": "test_001",
            "query": "¿qué es la fibra?",
            "expected_answer": "Un componente vegetal no digerible."
        }]"#;
        let cases: Vec<TestCase> = serde_json::from_str(json).unwrap();
        assert_eq!(cases.len(), 1);
        assert!(cases[0].relevant_docs.is_empty());
        assert!(cases[0].clinical_data.is_none());
    }

    #[test]
    fn clinical_data_rides_along() {
        let json = r#"[{
            "id": "test_002",
            "query": "hazme un plan de comidas",
            "expected_answer": "Un plan semanal variado.",
            "relevant_docs": ["guia-fao"],
            "clinical_data": {"age": 40, "allergies": ["maní"]},
            "category": "plan",
            "difficulty": "hard"
        }]"#;
        let cases: Vec<TestCase> = serde_json::from_str(json).unwrap();
        let clinical = cases[0].clinical_data.as_ref().unwrap();
        assert_eq!(clinical.age, Some(40));
        assert_eq!(clinical.allergies, vec!["maní".to_string()]);
    }
}
