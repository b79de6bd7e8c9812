use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Quiz,
    Exercise,
    Text,
    /// Any tag the generator invents (`mixed`, ...). Graded like free text.
    #[serde(other)]
    Other,
}

impl Default for QuestionKind {
    fn default() -> Self {
        QuestionKind::Other
    }
}

/// A single entry of the answer sheet, index-aligned with the questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Index(i64),
    Text(String),
    Other(JsonValue),
}

impl Answer {
    /// Strict equality against an option index: only a JSON number matches.
    pub fn matches_index(&self, index: i64) -> bool {
        match self {
            Answer::Index(i) => *i == index,
            Answer::Other(JsonValue::Number(n)) => n.as_f64() == Some(index as f64),
            _ => false,
        }
    }

    /// Whether the answer counts as attempted: truthy and not the empty string.
    pub fn is_attempted(&self) -> bool {
        match self {
            Answer::Index(i) => *i != 0,
            Answer::Text(s) => !s.is_empty(),
            Answer::Other(v) => match v {
                JsonValue::Null => false,
                JsonValue::Bool(b) => *b,
                JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
                JsonValue::String(s) => !s.is_empty(),
                JsonValue::Array(_) | JsonValue::Object(_) => true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestion {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub id: JsonValue,
    #[serde(default, deserialize_with = "lenient::string")]
    pub question: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::kind")]
    #[schema(value_type = String)]
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub correct_answer: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub explanation: Option<String>,
}

/// Field readers for client-built exam sheets. A value of the wrong JSON
/// type is read as absent so the sheet is still graded.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Number, Value as JsonValue};

    use super::QuestionKind;

    pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(optional_string(de)?.unwrap_or_default())
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match JsonValue::deserialize(de)? {
            JsonValue::String(s) => Some(s),
            _ => None,
        })
    }

    /// Non-string options are kept in their JSON text form.
    pub fn string_list<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match JsonValue::deserialize(de)? {
            JsonValue::Array(items) => Some(
                items
                    .into_iter()
                    .map(|item| match item {
                        JsonValue::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    /// Whole JSON numbers only: `"1"` and `1.5` are `None`.
    pub fn integer<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        Ok(match JsonValue::deserialize(de)? {
            JsonValue::Number(n) => whole(&n),
            _ => None,
        })
    }

    /// Elapsed seconds; anything that is not a number counts as zero.
    pub fn seconds<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
        Ok(match JsonValue::deserialize(de)? {
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0),
            _ => 0,
        })
    }

    pub fn kind<'de, D: Deserializer<'de>>(de: D) -> Result<QuestionKind, D::Error> {
        Ok(serde_json::from_value(JsonValue::deserialize(de)?).unwrap_or_default())
    }

    fn whole(n: &Number) -> Option<i64> {
        n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultQuestion {
    #[schema(value_type = Object)]
    pub id: JsonValue,
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<i64>,
    pub explanation: String,
    #[schema(value_type = Object)]
    pub user_answer: Answer,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub score: u32,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub time_taken: String,
    pub questions: Vec<ExamResultQuestion>,
}

/// Detected or requested shape of a generated exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    Quiz,
    Exercise,
    Mixed,
}

impl ExamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::Quiz => "quiz",
            ExamType::Exercise => "exercise",
            ExamType::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExamQuestion {
    #[serde(rename = "type", default = "default_generated_type")]
    pub kind: String,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<i64>,
    #[serde(default)]
    pub explanation: String,
}

fn default_generated_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedExam {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub questions: Vec<GeneratedExamQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mistyped_question_fields_read_as_absent() {
        let q: ExamQuestion = serde_json::from_value(json!({
            "id": 7,
            "type": "quiz",
            "question": null,
            "options": "A or B",
            "correctAnswer": "1",
            "explanation": 42
        }))
        .unwrap();

        assert_eq!(q.kind, QuestionKind::Quiz);
        assert_eq!(q.question, "");
        assert_eq!(q.options, None);
        assert_eq!(q.correct_answer, None);
        assert_eq!(q.explanation, None);
    }

    #[test]
    fn whole_number_answer_keys_are_kept() {
        let q: ExamQuestion = serde_json::from_value(json!({
            "type": "quiz",
            "correctAnswer": 2.0,
            "options": ["a", 3]
        }))
        .unwrap();
        assert_eq!(q.correct_answer, Some(2));
        assert_eq!(q.options, Some(vec!["a".to_string(), "3".to_string()]));

        let q: ExamQuestion =
            serde_json::from_value(json!({"type": "quiz", "correctAnswer": 1.5})).unwrap();
        assert_eq!(q.correct_answer, None);
    }

    #[test]
    fn odd_or_missing_type_is_graded_as_other() {
        let q: ExamQuestion = serde_json::from_value(json!({"type": 3})).unwrap();
        assert_eq!(q.kind, QuestionKind::Other);
        let q: ExamQuestion = serde_json::from_value(json!({"type": "mixed"})).unwrap();
        assert_eq!(q.kind, QuestionKind::Other);
        let q: ExamQuestion = serde_json::from_value(json!({})).unwrap();
        assert_eq!(q.kind, QuestionKind::Other);
    }
}
