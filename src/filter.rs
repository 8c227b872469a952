// src/filter.rs

use crate::models::{Question, QuestionFilter};

/// Category and free-text filter over an already loaded list. The whole
/// term is matched; length limits are enforced by callers.
pub fn filter_questions(questions: &[Question], filter: &QuestionFilter) -> Vec<Question> {
    let term = normalize_term(&filter.search);

    questions
        .iter()
        .filter(|q| filter.category_id.map_or(true, |id| q.category_id == id))
        .filter(|q| match &term {
            None => true,
            Some(term) => matches_term(q, term, filter.include_details),
        })
        .cloned()
        .collect()
}

fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

fn matches_term(question: &Question, term: &str, include_details: bool) -> bool {
    if question.title.to_lowercase().contains(term) {
        return true;
    }
    include_details
        && (question.description.to_lowercase().contains(term)
            || question.tags.iter().any(|t| t.to_lowercase().contains(term)))
}
