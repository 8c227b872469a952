// src/schedule.rs

use crate::models::{Question, Reassignment};
use chrono::{Days, NaiveDate};
use log::{debug, warn};
use std::collections::HashSet;

pub fn is_overdue(question: &Question, today: NaiveDate) -> bool {
    matches!(question.scheduled_date, Some(date) if date < today)
}

/// Moves every question scheduled before `today` to the first free day
/// after the latest scheduled date. Overdue questions are taken in slice
/// order, so callers pass them sorted by date.
pub fn plan_reschedule(questions: &[Question], today: NaiveDate) -> Vec<Reassignment> {
    let overdue: Vec<(i64, NaiveDate)> = questions
        .iter()
        .filter(|q| is_overdue(q, today))
        .filter_map(|q| q.scheduled_date.map(|d| (q.id, d)))
        .collect();

    if overdue.is_empty() {
        return Vec::new();
    }

    let mut occupied: HashSet<NaiveDate> =
        questions.iter().filter_map(|q| q.scheduled_date).collect();
    let mut pointer = occupied
        .iter()
        .max()
        .copied()
        .or_else(|| today.checked_sub_days(Days::new(1)))
        .unwrap_or(today);

    let mut plan = Vec::with_capacity(overdue.len());
    for (question_id, from) in overdue {
        let Some(to) = next_free_after(&occupied, pointer) else {
            warn!("Calendar exhausted while rescheduling question {}", question_id);
            break;
        };
        debug!("[Schedule] Question {}: {} -> {}", question_id, from, to);
        occupied.insert(to);
        pointer = to;
        plan.push(Reassignment {
            question_id,
            from,
            to,
        });
    }
    plan
}

fn next_free_after(occupied: &HashSet<NaiveDate>, after: NaiveDate) -> Option<NaiveDate> {
    let mut candidate = after.succ_opt()?;
    while occupied.contains(&candidate) {
        candidate = candidate.succ_opt()?;
    }
    Some(candidate)
}

/// First day on or after `from` that no question uses.
pub fn next_available_date<I>(occupied: I, from: NaiveDate) -> NaiveDate
where
    I: IntoIterator<Item = NaiveDate>,
{
    let occupied: HashSet<NaiveDate> = occupied.into_iter().collect();
    let mut candidate = from;
    while occupied.contains(&candidate) {
        match candidate.succ_opt() {
            Some(next) => candidate = next,
            None => break,
        }
    }
    candidate
}

/// Applies a plan to the in-memory list and restores date order.
pub fn apply_reassignments(questions: &mut [Question], plan: &[Reassignment]) {
    for r in plan {
        if let Some(q) = questions.iter_mut().find(|q| q.id == r.question_id) {
            q.scheduled_date = Some(r.to);
        }
    }
    sort_by_schedule(questions);
}

/// Date ascending, unscheduled last. Stable, so equal dates keep their order.
pub fn sort_by_schedule(questions: &mut [Question]) {
    questions.sort_by_key(|q| (q.scheduled_date.is_none(), q.scheduled_date));
}

pub fn question_of_the_day(questions: &[Question], today: NaiveDate) -> Option<&Question> {
    questions
        .iter()
        .find(|q| q.is_active && q.scheduled_date == Some(today))
}
