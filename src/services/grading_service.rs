use crate::models::exam::{Answer, ExamQuestion, ExamResult, ExamResultQuestion, QuestionKind};

const DEFAULT_EXPLANATION: &str = "Answer explanation";

/// Scores an exam sheet. `answers` is index-aligned with `questions`;
/// a missing or `null` entry is an unanswered question.
///
/// Quiz questions are correct only on strict index equality. Every
/// other kind is correct as soon as something non-empty was submitted.
pub fn calculate_exam_results(
    answers: &[Option<Answer>],
    questions: &[ExamQuestion],
    time_taken_seconds: i64,
) -> ExamResult {
    let mut graded = Vec::with_capacity(questions.len());
    let mut correct_answers = 0usize;

    for (idx, q) in questions.iter().enumerate() {
        let given = answers.get(idx).and_then(|a| a.as_ref());
        let is_correct = answered_correctly(q, given);
        if is_correct {
            correct_answers += 1;
        }

        let user_answer = match given {
            Some(answer) => answer.clone(),
            None if q.kind == QuestionKind::Quiz => Answer::Index(-1),
            None => Answer::Text(String::new()),
        };

        let explanation = q
            .explanation
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EXPLANATION)
            .to_string();

        graded.push(ExamResultQuestion {
            id: q.id.clone(),
            question: q.question.clone(),
            options: q.options.clone().unwrap_or_default(),
            correct_answer: q.correct_answer,
            explanation,
            user_answer,
            is_correct,
        });
    }

    let total_questions = questions.len();

    ExamResult {
        score: score_percentage(correct_answers, total_questions),
        total_questions,
        correct_answers,
        time_taken: format_duration(time_taken_seconds),
        questions: graded,
    }
}

fn answered_correctly(question: &ExamQuestion, given: Option<&Answer>) -> bool {
    match question.kind {
        QuestionKind::Quiz => match (given, question.correct_answer) {
            (Some(answer), Some(correct)) => answer.matches_index(correct),
            _ => false,
        },
        QuestionKind::Exercise | QuestionKind::Text | QuestionKind::Other => {
            given.map(Answer::is_attempted).unwrap_or(false)
        }
    }
}

/// Rounded percentage of correct answers. An empty exam scores 0.
pub fn score_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Formats elapsed seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quiz(id: i64, correct: i64) -> ExamQuestion {
        ExamQuestion {
            id: json!(id),
            question: format!("Question {}", id),
            kind: QuestionKind::Quiz,
            options: Some(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
            correct_answer: Some(correct),
            explanation: Some("Because".into()),
        }
    }

    fn text(id: i64) -> ExamQuestion {
        ExamQuestion {
            id: json!(id),
            question: "Explain".into(),
            kind: QuestionKind::Text,
            options: None,
            correct_answer: None,
            explanation: None,
        }
    }

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(100 * 3600), "100:00:00");
        assert_eq!(format_duration(-5), "00:00:00");
    }

    #[test]
    fn two_of_three_quiz_answers_scores_67() {
        let questions = vec![quiz(1, 0), quiz(2, 1), quiz(3, 2)];
        let answers = vec![
            Some(Answer::Index(0)),
            Some(Answer::Index(1)),
            Some(Answer::Index(0)),
        ];

        let result = calculate_exam_results(&answers, &questions, 90);

        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.score, 67);
        assert_eq!(result.time_taken, "00:01:30");
        let flags: Vec<bool> = result.questions.iter().map(|q| q.is_correct).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn empty_text_answer_is_incorrect() {
        let result = calculate_exam_results(
            &[Some(Answer::Text(String::new()))],
            &[text(1)],
            10,
        );
        assert!(!result.questions[0].is_correct);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn any_text_answer_counts_as_attempted() {
        let result = calculate_exam_results(
            &[Some(Answer::Text("photosynthesis".into()))],
            &[text(1)],
            10,
        );
        assert!(result.questions[0].is_correct);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn empty_exam_scores_zero() {
        let result = calculate_exam_results(&[], &[], 0);
        assert_eq!(result.score, 0);
        assert_eq!(result.total_questions, 0);
        assert!(result.questions.is_empty());
    }

    #[test]
    fn string_index_does_not_match_quiz_answer() {
        let result = calculate_exam_results(
            &[Some(Answer::Text("1".into()))],
            &[quiz(1, 1)],
            0,
        );
        assert!(!result.questions[0].is_correct);
    }

    #[test]
    fn missing_answers_use_sentinels() {
        let questions = vec![quiz(1, 0), text(2)];
        let result = calculate_exam_results(&[None], &questions, 0);

        assert_eq!(result.questions[0].user_answer, Answer::Index(-1));
        assert_eq!(result.questions[1].user_answer, Answer::Text(String::new()));
        assert_eq!(result.correct_answers, 0);
    }

    #[test]
    fn quiz_without_answer_key_is_never_correct() {
        let mut q = quiz(1, 0);
        q.correct_answer = None;
        let result = calculate_exam_results(&[None], &[q], 0);
        assert!(!result.questions[0].is_correct);
    }

    #[test]
    fn zero_index_is_kept_as_the_user_answer() {
        let result =
            calculate_exam_results(&[Some(Answer::Index(0))], &[quiz(1, 0)], 0);
        assert!(result.questions[0].is_correct);
        assert_eq!(result.questions[0].user_answer, Answer::Index(0));
    }

    #[test]
    fn unknown_question_kinds_are_graded_by_presence() {
        let mut q = text(1);
        q.kind = QuestionKind::Other;
        let result = calculate_exam_results(
            &[Some(Answer::Other(json!(true)))],
            &[q],
            0,
        );
        assert!(result.questions[0].is_correct);
    }

    #[test]
    fn explanation_and_options_get_defaults() {
        let result = calculate_exam_results(&[], &[text(1)], 0);
        assert_eq!(result.questions[0].explanation, "Answer explanation");
        assert!(result.questions[0].options.is_empty());
    }

    #[test]
    fn submission_json_deserializes_mixed_answers() {
        let answers: Vec<Option<Answer>> =
            serde_json::from_value(json!([2, "an essay", null, 1.0])).unwrap();
        assert_eq!(answers[0], Some(Answer::Index(2)));
        assert_eq!(answers[1], Some(Answer::Text("an essay".into())));
        assert_eq!(answers[2], None);
        assert!(answers[3].as_ref().unwrap().matches_index(1));
    }
}
