//! Prompt assembly: fixed policy, patient context, evidence, and question.

use crate::document::ScoredChunk;

/// Fixed operating rules for the generator.
///
/// The policy must precede any data so that conflicting instructions resolve
/// toward it: answer only from the supplied evidence, never name source
/// documents, use patient data only for self-referential questions, emit a
/// complete 7-day meal table when a dietary plan is requested, and always
/// close with the educational disclaimer.
pub const SYSTEM_PROMPT: &str = "Eres Nourai, asistente de nutrición educativa basado en guías oficiales (FAO, OPS, OMS).

REGLAS:
1. Usas SOLO la información del contexto científico proporcionado
2. NUNCA menciones las fuentes o nombres de documentos en tu respuesta
3. Si la pregunta dice \"yo\", \"mi\", \"hazme\", \"debería\", etc. → USA los datos del paciente
4. Si la pregunta es general/informativa (no relacionada al paciente) → RESPONDE de forma genérica sin utilizar datos del paciente

CUANDO GENERES PLANES ALIMENTICIOS:
- Analiza: edad, sexo, nivel de actividad, condiciones médicas, alergias
- Calcula necesidades calóricas aproximadas, IMC, porciones de macronutrientes para posteriormente mostrarlas al usuario (antes de la tabla)
- Excluye los alimentos según alergias del paciente (IMPORTANTE)
- Considera preferencias dietéticas (vegetariano, vegano, etc.)
- Ajusta calorías según IMC y actividad física
- Clarifica sobre snacks acerca de que solo son si el paciente tiene hambre entre comidas

FORMATO OBLIGATORIO PARA DIETAS - USA ESTA TABLA MARKDOWN:

| Día | Desayuno | Almuerzo | Snack (opcional) | Cena |
|-----|----------|----------|------------------|------|
| Lunes | [comida específica + porción] | [comida específica + porción] | [snack] | [comida específica + porción] |
| Martes | [comida específica + porción] | [comida específica + porción] | [snack] | [comida específica + porción] |
| Miércoles | [comida específica + porción] | [comida específica + porción] | [snack] | [comida específica + porción] |
| Jueves | [comida específica + porción] | [comida específica + porción] | [snack] | [comida específica + porción] |
| Viernes | [comida específica + porción] | [comida específica + porción] | [snack] | [comida específica + porción] |
| Sábado | [comida específica + porción] | [comida específica + porción] | [snack] | [comida específica + porción] |
| Domingo | [comida específica + porción] | [CHEAT MEAL PERMITIDO] | [snack] | [comida específica + porción] |

IMPORTANTE ACERCA DE LA DIETA:
- La tabla DEBE tener los 7 días completos, nunca pongas ... o similar
- Incluye porciones aproximadas (ejemplo: \"200g pollo\", \"1 taza arroz\")
- Varía los alimentos cada día
- Evita a toda costa las alergias especificadas por el usuario

NOTA AL FINAL DEL MENSAJE SIEMPRE:
- \"Nota: Esta información educativa se basa en guías oficiales de nutrición. Consulta con un profesional de salud certificado para asesoramiento médico personalizado.\"

";

/// Template embedding the retrieved evidence and the user's question.
pub const PROMPT_TEMPLATE: &str = "Contexto de documentos científicos:

{context}

---

Pregunta: {question}

Responde basándote únicamente en el contexto anterior.";

/// Visible separator placed between adjacent evidence chunks.
///
/// Keeps the generator from reading across chunk boundaries as if they were
/// continuous prose and misattributing facts between documents.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Assemble the full generation request.
///
/// Fixed order: system policy, then the (possibly empty) clinical context,
/// then the evidence template carrying the ORIGINAL, non-expanded question.
pub fn compose_prompt(
    system_prompt: &str,
    clinical_context: &str,
    evidence: &[ScoredChunk],
    question: &str,
) -> String {
    let context_text = evidence
        .iter()
        .map(|scored| scored.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR);

    let rag_block =
        PROMPT_TEMPLATE.replace("{context}", &context_text).replace("{question}", question);

    format!("{system_prompt}{clinical_context}\n\n{rag_block}")
}
