// src/scoring.rs

use std::collections::HashMap;

use serde::Serialize;

/// The grading-relevant slice of a question record.
#[derive(Debug, Clone, Copy)]
pub struct QuestionKey {
    pub correct_index: i32,
    pub points: i32,
}

/// Aggregate outcome of grading one submission.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub score: i32,
    pub total_marks: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
}

/// Grades a submission against an exam's ordered question list.
///
/// `answers[i]` is the selected option index for `question_ids[i]`; `None`
/// (or a too-short array) counts as wrong. A question id with no record in
/// `keys` was deleted after the exam was composed: it contributes to neither
/// the totals nor the counts, but is logged as a data-integrity signal.
pub fn score(
    question_ids: &[i64],
    keys: &HashMap<i64, QuestionKey>,
    answers: &[Option<i32>],
) -> ScoreSummary {
    let mut summary = ScoreSummary::default();

    for (idx, question_id) in question_ids.iter().enumerate() {
        let Some(key) = keys.get(question_id) else {
            tracing::warn!(question_id, "exam references a deleted question, skipping");
            continue;
        };

        summary.total_marks += key.points;
        match answers.get(idx).copied().flatten() {
            Some(selected) if selected == key.correct_index => {
                summary.score += key.points;
                summary.correct_count += 1;
            }
            _ => summary.wrong_count += 1,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(entries: &[(i64, i32, i32)]) -> HashMap<i64, QuestionKey> {
        entries
            .iter()
            .map(|&(id, correct_index, points)| {
                (
                    id,
                    QuestionKey {
                        correct_index,
                        points,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn fully_correct_submission() {
        let keys = keys(&[(1, 0, 1), (2, 1, 1), (3, 2, 1)]);
        let summary = score(&[1, 2, 3], &keys, &[Some(0), Some(1), Some(2)]);
        assert_eq!(summary.score, summary.total_marks);
        assert_eq!(summary.correct_count, 3);
        assert_eq!(summary.wrong_count, 0);
    }

    #[test]
    fn all_wrong_submission() {
        let keys = keys(&[(1, 0, 1), (2, 1, 1), (3, 2, 1)]);
        // Shifted by one: no answer hits its correct index.
        let summary = score(&[1, 2, 3], &keys, &[Some(1), Some(2), Some(0)]);
        assert_eq!(summary.score, 0);
        assert_eq!(summary.wrong_count, 3);
        assert_eq!(summary.correct_count, 0);
        assert_eq!(summary.total_marks, 3);
    }

    #[test]
    fn weighted_points() {
        let keys = keys(&[(10, 0, 1), (11, 1, 2), (12, 2, 1)]);
        let summary = score(&[10, 11, 12], &keys, &[Some(0), Some(1), Some(0)]);
        assert_eq!(summary.score, 3);
        assert_eq!(summary.total_marks, 4);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.wrong_count, 1);
    }

    #[test]
    fn stale_question_is_skipped_entirely() {
        // Question 11 was deleted after the exam was composed.
        let keys = keys(&[(10, 0, 1), (12, 2, 1)]);
        let summary = score(&[10, 11, 12], &keys, &[Some(0), Some(1), Some(2)]);
        assert_eq!(summary.total_marks, 2);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.wrong_count, 0);
    }

    #[test]
    fn missing_answers_count_as_wrong() {
        let keys = keys(&[(1, 0, 1), (2, 1, 1)]);
        let summary = score(&[1, 2], &keys, &[None]);
        assert_eq!(summary.score, 0);
        assert_eq!(summary.wrong_count, 2);
        assert_eq!(summary.total_marks, 2);
    }
}
