//! Query expansion for under-specified diet questions.

/// Generic Spanish diet terms that signal an under-specified retrieval intent.
const GENERIC_DIET_KEYWORDS: [&str; 4] = ["dieta", "alimentación", "plan de comidas", "comer"];

/// Domain keywords appended to generic diet questions before embedding.
const EXPANSION_TERMS: &str = " nutrición saludable alimentos recomendados plan alimenticio";

/// Expand generic diet questions with nutrition-domain keywords.
///
/// If the lowercased query mentions any generic diet term, the fixed keyword
/// suffix is appended so retrieval pulls in broader nutrition guidance.
/// Otherwise the query is returned unchanged. The expanded text is used for
/// embedding only; prompt composition and citations always see the original
/// question.
pub fn expand_diet_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    if GENERIC_DIET_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        format!("{query}{EXPANSION_TERMS}")
    } else {
        query.to_string()
    }
}
