//! Caller-supplied patient attributes and their prompt rendering.

use serde::{Deserialize, Serialize};

/// Optional structured patient attributes supplied with a query.
///
/// Every field is individually optional. Absence means the field is omitted
/// from the rendered context; no default value is ever invented. The core
/// never stores or mutates this record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClinicalAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
}

/// Render patient attributes into the natural-language context block.
///
/// Each present field contributes exactly one line. BMI is computed only when
/// both weight and height are present, never partially. Returns an empty
/// string when there is nothing to render, so callers never inject an empty
/// patient-information header into the prompt.
pub fn clinical_context(attrs: Option<&ClinicalAttributes>) -> String {
    let Some(attrs) = attrs else {
        return String::new();
    };

    let mut lines = Vec::new();

    if let Some(age) = attrs.age {
        lines.push(format!("Edad: {age} años"));
    }
    if let Some(gender) = &attrs.gender {
        lines.push(format!("Sexo: {gender}"));
    }
    if let (Some(weight), Some(height)) = (attrs.weight_kg, attrs.height_cm) {
        let height_m = height / 100.0;
        let bmi = weight / (height_m * height_m);
        lines.push(format!("IMC: {bmi:.1}"));
    }
    if !attrs.conditions.is_empty() {
        lines.push(format!("Condiciones: {}", attrs.conditions.join(", ")));
    }
    if !attrs.allergies.is_empty() {
        lines.push(format!("Alergias: {}", attrs.allergies.join(", ")));
    }
    if !attrs.medications.is_empty() {
        lines.push(format!("Medicamentos: {}", attrs.medications.join(", ")));
    }
    if let Some(diet_type) = &attrs.diet_type {
        lines.push(format!("Tipo de dieta: {diet_type}"));
    }
    if let Some(activity_level) = &attrs.activity_level {
        lines.push(format!("Nivel de actividad: {activity_level}"));
    }

    if lines.is_empty() {
        return String::new();
    }

    format!("\n\nINFORMACIÓN DEL PACIENTE:\n{}\n", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_attributes_render_nothing() {
        assert_eq!(clinical_context(None), "");
        assert_eq!(clinical_context(Some(&ClinicalAttributes::default())), "");
    }

    #[test]
    fn only_age_renders_a_single_line() {
        let attrs = ClinicalAttributes { age: Some(34), ..Default::default() };
        let context = clinical_context(Some(&attrs));
        assert!(context.contains("Edad: 34 años"));
        assert!(!context.contains("IMC"));
        let rendered_lines: Vec<&str> =
            context.lines().filter(|l| l.contains(':') && !l.contains("INFORMACIÓN")).collect();
        assert_eq!(rendered_lines.len(), 1);
    }

    #[test]
    fn bmi_is_computed_from_weight_and_height() {
        let attrs = ClinicalAttributes {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            ..Default::default()
        };
        let context = clinical_context(Some(&attrs));
        assert!(context.contains("IMC: 22.9"));
    }

    #[test]
    fn bmi_is_omitted_without_height() {
        let attrs = ClinicalAttributes { weight_kg: Some(70.0), ..Default::default() };
        assert_eq!(clinical_context(Some(&attrs)), "");
    }

    #[test]
    fn list_fields_join_with_comma_and_space() {
        let attrs = ClinicalAttributes {
            allergies: vec!["maní".to_string(), "mariscos".to_string()],
            ..Default::default()
        };
        let context = clinical_context(Some(&attrs));
        assert!(context.contains("Alergias: maní, mariscos"));
        assert!(context.contains("INFORMACIÓN DEL PACIENTE:"));
    }
}
