use crate::config::Config;
use crate::error::{Error, ProviderError, Result};
use crate::models::exam::{ExamType, GeneratedExam, GeneratedExamQuestion};
use crate::models::message::ChatMessage;
use crate::utils::language::Language;
use crate::utils::text::clean_coach_reply;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

const COACH_MODEL: &str = "deepseek/deepseek-r1-0528:free";
const GENERATOR_MODEL: &str = "deepseek/deepseek-r1-0528:free";
const EXAM_MODEL: &str = "deepseek-ai/deepseek-coder:33b-instruct";
const NOTES_MODEL: &str = "openai/gpt-4o-mini";

const QUIZ_FAILURE: &str = "Failed to generate quiz. Please try again.";
const FLASHCARDS_FAILURE: &str = "Failed to generate flashcards. Please try again.";
const NOTES_FAILURE: &str = "Failed to generate smart notes";

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
    /// Sent as the `X-Title` attribution header, not in the body.
    #[serde(skip)]
    pub title: String,
}

impl CompletionRequest {
    fn new(model: &str, title: &str, messages: Vec<ChatMessage>, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature: 0.7,
            stream: false,
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: JsonValue,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError>;
}

/// Chat-completions client for OpenRouter (or any OpenAI-compatible base URL).
#[derive(Clone)]
pub struct OpenRouterClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    referer: String,
}

impl OpenRouterClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            api_key: config.openrouter_api_key.clone(),
            referer: config.site_url.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let res = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &request.title)
            .json(&request)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        let status = res.status().as_u16();
        if status == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !(200..300).contains(&status) {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body: JsonValue = res.json().await?;
        let message = body
            .pointer("/choices/0/message")
            .ok_or_else(|| ProviderError::InvalidResponse("no choices[0].message".into()))?;

        Ok(Completion {
            content: message
                .get("content")
                .and_then(|c| c.as_str())
                .unwrap_or_default()
                .to_string(),
            usage: body.get("usage").cloned().unwrap_or(JsonValue::Null),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachReply {
    pub message: String,
    pub usage: JsonValue,
}

impl CoachReply {
    fn canned(message: &str) -> Self {
        Self {
            message: message.to_string(),
            usage: json!({ "total_tokens": 0 }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesKind {
    SmartNotes,
    Summary,
    DetailedTranscript,
    MindMap,
}

impl NotesKind {
    /// Unknown output types fall back to smart notes.
    pub fn parse(value: &str) -> Self {
        match value {
            "summary" => NotesKind::Summary,
            "detailed_transcript" => NotesKind::DetailedTranscript,
            "mind_map" => NotesKind::MindMap,
            _ => NotesKind::SmartNotes,
        }
    }

    fn prompt(&self, content: &str) -> String {
        match self {
            NotesKind::SmartNotes => format!(
                "Create comprehensive smart notes from the following transcription. Organize the content with clear headings, bullet points, and key takeaways. Make it easy to study and review:\n\n{}\n\nPlease format the notes with:\n- Clear section headings\n- Bullet points for key concepts\n- Important definitions or terms\n- Summary points at the end",
                content
            ),
            NotesKind::Summary => format!(
                "Create a concise summary of the following transcription. Focus on the main points and key takeaways:\n\n{}\n\nPlease provide:\n- A brief overview\n- Main points (3-5 key ideas)\n- Key takeaways\n- Important concepts mentioned",
                content
            ),
            NotesKind::DetailedTranscript => format!(
                "Create a detailed, well-formatted transcript from the following content. Organize it with proper paragraphs, speaker identification if applicable, and clear structure:\n\n{}\n\nPlease format with:\n- Clear paragraph breaks\n- Proper punctuation and grammar\n- Logical flow and organization\n- Any relevant timestamps or sections",
                content
            ),
            NotesKind::MindMap => format!(
                "Create a mind map structure from the following content. Identify the main topic and key subtopics with their relationships:\n\n{}\n\nPlease provide a structured mind map with:\n- Main central topic\n- Primary branches (3-5 main concepts)\n- Secondary branches for each primary concept\n- Key terms and definitions\n- Relationships between concepts",
                content
            ),
        }
    }
}

/// Greedy extraction of the outermost `{ ... }` span of a model reply.
pub fn extract_json_object(text: &str) -> Option<JsonValue> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

struct ExamTypePatterns {
    questions: Regex,
    multiple_choice: Regex,
    math: Regex,
}

fn exam_type_patterns() -> &'static ExamTypePatterns {
    static PATTERNS: OnceLock<ExamTypePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ExamTypePatterns {
        questions: Regex::new(r"(?i)question|exercice|problème|calcul|résoudre")
            .expect("valid regex"),
        multiple_choice: Regex::new(r"(?i)a\)|b\)|c\)|d\)|choix|option").expect("valid regex"),
        math: Regex::new(r"(?i)[+\-*/=]|\d+[+\-*/]\d+|\sqrt|log|sin|cos").expect("valid regex"),
    })
}

pub fn has_question_markers(text: &str) -> bool {
    exam_type_patterns().questions.is_match(text)
}

pub fn has_multiple_choice_markers(text: &str) -> bool {
    exam_type_patterns().multiple_choice.is_match(text)
}

pub fn has_math_markers(text: &str) -> bool {
    exam_type_patterns().math.is_match(text)
}

/// Math alongside question keywords wins over multiple-choice markers.
pub fn detect_exam_type(text: &str) -> ExamType {
    if has_math_markers(text) && has_question_markers(text) {
        ExamType::Exercise
    } else if has_multiple_choice_markers(text) {
        ExamType::Quiz
    } else {
        ExamType::Mixed
    }
}

fn coach_system_prompt(language: Language) -> String {
    let name = language.french_name();
    format!(
        "Tu es Panda Coach, un assistant IA bienveillant et professionnel spécialisé dans l'aide aux études.

RÈGLE ABSOLUE DE LANGUE :
Tu DOIS répondre UNIQUEMENT en {name}.

INTRODUCTION OBLIGATOIRE :
Commence TOUJOURS tes réponses par cette introduction dans la langue détectée :
- Français : \"{fr}\"
- Anglais : \"{en}\"
- Allemand : \"{de}\"
- Espagnol : \"{es}\"
- Chinois : \"{zh}\"
- Japonais : \"{ja}\"
- Coréen : \"{ko}\"

Ton rôle :
Aider les étudiants avec leurs questions académiques, expliquer des concepts complexes de manière simple et claire, donner des conseils d'étude personnalisés, créer des plans d'apprentissage adaptés, et motiver l'étudiant.

RÈGLES STRICTES D'ÉCRITURE :
- RÈGLE ABSOLUE : Réponds UNIQUEMENT en {name}
- COMMENCE TOUJOURS par l'introduction dans la langue détectée
- Écris SANS AUCUN EMOJI (interdit total)
- SAUTE DEUX LIGNES APRÈS CHAQUE DEUX PHRASES pour aérer le texte
- Si tu fais une liste numérotée, saute deux lignes entre chaque point
- Fais des paragraphes courts et aérés
- Sois encourageant et positif
- Explique les choses étape par étape
- Propose des exemples concrets
- Reste toujours bienveillant et patient
- N'utilise JAMAIS de markdown (pas de ** ou __ ou # ou autres symboles)
- Écris en texte simple et lisible sans aucun formatage spécial

Domaines d'expertise :
Mathématiques, sciences, langues, histoire, techniques d'étude et de mémorisation, gestion du stress et de la motivation, organisation du temps d'étude, préparation aux examens.

IMPORTANT : Tu as détecté que l'utilisateur parle en {name}. Réponds UNIQUEMENT dans cette langue et commence par l'introduction appropriée.",
        name = name,
        fr = Language::French.coach_introduction(),
        en = Language::English.coach_introduction(),
        de = Language::German.coach_introduction(),
        es = Language::Spanish.coach_introduction(),
        zh = Language::Chinese.coach_introduction(),
        ja = Language::Japanese.coach_introduction(),
        ko = Language::Korean.coach_introduction(),
    )
}

fn exam_prompt(content: &str, exam_type: ExamType, duration: &str) -> String {
    format!(
        "Analyze this exam document and generate a comprehensive new exam with multiple questions.

Original document:
{content}

Detected exam type: {kind}
Duration: {duration} minutes

Generate an exam that:
1. Creates 5-8 questions based on the document content
2. Follows the same structure and style as the original
3. Uses the same question types (quiz, exercises, or mixed)
4. Covers different aspects of the document content
5. Is adapted to the specified duration
6. If it's an exercise, create detailed statements with written questions
7. If it's a quiz, create multiple choice questions with 4 options each
8. If it's mixed, combine both types appropriately

IMPORTANT:
- Generate 5-8 questions minimum
- For exercises: create detailed statements with open questions
- For quiz: create multiple choice questions with 4 options (A, B, C, D)
- Each question should test different concepts from the document
- Provide detailed explanations for each answer
- Make questions challenging but fair

JSON response format:
{{
  \"title\": \"Generated Exam Title\",
  \"instructions\": \"Detailed instructions for the student\",
  \"questions\": [
    {{
      \"type\": \"quiz|exercise|text\",
      \"question\": \"Question or detailed statement\",
      \"options\": [\"A\", \"B\", \"C\", \"D\"] (only if quiz type),
      \"correctAnswer\": 0 (only if quiz type, 0=A, 1=B, 2=C, 3=D),
      \"explanation\": \"Detailed explanation of the answer\"
    }}
  ]
}}

Generate exactly 5-8 questions based on the document content.",
        content = content,
        kind = exam_type.as_str(),
        duration = duration,
    )
}

fn unparsed_exam(raw: &str, exam_type: ExamType) -> GeneratedExam {
    let options = if exam_type == ExamType::Quiz {
        ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    };
    GeneratedExam {
        title: "Generated Exam".into(),
        instructions: "Answer the following questions".into(),
        questions: vec![GeneratedExamQuestion {
            kind: exam_type.as_str().into(),
            question: raw.to_string(),
            options: Some(options),
            correct_answer: Some(0),
            explanation: "AI generated response".into(),
        }],
    }
}

fn fallback_exam(content: &str, exam_type: ExamType) -> GeneratedExam {
    let is_quiz = exam_type == ExamType::Quiz;
    let excerpt: String = content.chars().take(200).collect();
    GeneratedExam {
        title: "Generated Exam".into(),
        instructions: "Answer the following questions based on the provided document.".into(),
        questions: vec![GeneratedExamQuestion {
            kind: exam_type.as_str().into(),
            question: format!(
                "Based on the provided document, answer the following question: {}...",
                excerpt
            ),
            options: Some(if is_quiz {
                ["Option A", "Option B", "Option C", "Option D"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            } else {
                Vec::new()
            }),
            correct_answer: if is_quiz { Some(0) } else { None },
            explanation: "This question is based on the content of the uploaded document.".into(),
        }],
    }
}

#[derive(Clone)]
pub struct AiService {
    client: Arc<dyn CompletionClient>,
}

impl AiService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn openrouter(http: Client, config: &Config) -> Self {
        Self::new(Arc::new(OpenRouterClient::new(http, config)))
    }

    /// Answers a tutoring conversation as the Panda Coach.
    ///
    /// A missing API key and an upstream 429 are not errors: both produce a
    /// canned reply in the user's language with zero token usage.
    pub async fn coach_reply(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<CoachReply, ProviderError> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        let language = Language::detect(last);

        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(coach_system_prompt(language)));
        conversation.extend_from_slice(messages);

        let request = CompletionRequest::new(
            COACH_MODEL,
            "PandaAI - Plateforme d'apprentissage IA",
            conversation,
            1000,
        );

        match self.client.complete(request).await {
            Ok(completion) => Ok(CoachReply {
                message: clean_coach_reply(&completion.content),
                usage: completion.usage,
            }),
            Err(ProviderError::MissingApiKey) => {
                tracing::info!("Coach running in test mode, no OpenRouter key configured");
                Ok(CoachReply::canned(
                    Language::detect_basic(last).test_mode_message(),
                ))
            }
            Err(ProviderError::RateLimited) => {
                tracing::warn!("OpenRouter rate limit reached for coach reply");
                Ok(CoachReply::canned(language.rate_limited_message()))
            }
            Err(e) => {
                tracing::error!("OpenRouter API error: {}", e);
                Err(e)
            }
        }
    }

    pub async fn generate_quiz(
        &self,
        subject: &str,
        num_questions: u32,
        difficulty: &str,
        language: &str,
    ) -> Result<JsonValue> {
        let prompt = format!(
            "Generate a {} level quiz about \"{}\" with exactly {} multiple choice questions in {}.

For each question, provide:
1. A clear question
2. 4 answer options (A, B, C, D)
3. The correct answer (A, B, C, or D)
4. A brief explanation of why the correct answer is right

Format the response as a JSON object with this structure:
{{
  \"quiz\": {{
    \"title\": \"Quiz about [subject]\",
    \"questions\": [
      {{
        \"question\": \"Question text here?\",
        \"options\": {{
          \"A\": \"Option A\",
          \"B\": \"Option B\",
          \"C\": \"Option C\",
          \"D\": \"Option D\"
        }},
        \"correctAnswer\": \"A\",
        \"explanation\": \"Brief explanation of why A is correct\"
      }}
    ]
  }}
}}

Make sure the questions are relevant to the subject, appropriate for the difficulty level, and the explanations are educational.",
            difficulty.to_lowercase(),
            subject,
            num_questions,
            language
        );

        self.generate_json(prompt, QUIZ_FAILURE).await
    }

    pub async fn generate_flashcards(
        &self,
        subject: &str,
        count: u32,
        difficulty: &str,
        language: &str,
    ) -> Result<JsonValue> {
        let prompt = format!(
            "Generate {} flashcards about \"{}\" with {} difficulty level in {}.

For each flashcard, provide:
1. A clear question or concept on the front
2. A detailed answer or explanation on the back

Format the response as a JSON object with this structure:
{{
  \"flashcards\": [
    {{
      \"front\": \"Question or concept here?\",
      \"back\": \"Detailed answer or explanation here\"
    }}
  ]
}}

Make sure the flashcards are:
- Relevant to the subject
- Appropriate for the difficulty level
- Educational and informative
- Clear and concise
- Cover different aspects of the topic",
            count, subject, difficulty, language
        );

        self.generate_json(prompt, FLASHCARDS_FAILURE).await
    }

    async fn generate_json(&self, prompt: String, failure: &str) -> Result<JsonValue> {
        let request = CompletionRequest::new(
            GENERATOR_MODEL,
            "PandaAI",
            vec![ChatMessage::user(prompt)],
            2000,
        );

        let completion = self.client.complete(request).await.map_err(|e| {
            tracing::error!("Generation request failed: {}", e);
            Error::Internal(failure.to_string())
        })?;

        extract_json_object(&completion.content).ok_or_else(|| {
            tracing::error!("Failed to parse generated JSON: {}", completion.content);
            Error::Internal(failure.to_string())
        })
    }

    /// Builds a new exam modelled on an uploaded document.
    ///
    /// Only a missing API key is an error. An unparseable reply becomes a
    /// single question holding the raw text, and any upstream failure yields
    /// a placeholder exam quoting the document.
    pub async fn generate_exam(
        &self,
        content: &str,
        exam_type: ExamType,
        duration: Option<u32>,
    ) -> Result<GeneratedExam> {
        let duration = duration
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unspecified".to_string());
        let request = CompletionRequest::new(
            EXAM_MODEL,
            "PandaAI Exam Generator",
            vec![ChatMessage::user(exam_prompt(content, exam_type, &duration))],
            2000,
        );

        match self.client.complete(request).await {
            Ok(completion) => match serde_json::from_str::<GeneratedExam>(completion.content.trim()) {
                Ok(exam) => Ok(exam),
                Err(e) => {
                    tracing::warn!("Exam reply was not JSON ({}), wrapping raw text", e);
                    Ok(unparsed_exam(&completion.content, exam_type))
                }
            },
            Err(ProviderError::MissingApiKey) => Err(Error::Internal(
                "Error generating exam: OPENROUTER_API_KEY not found".into(),
            )),
            Err(e) => {
                tracing::error!("AI generation error: {}", e);
                tracing::info!("Using fallback exam generation");
                Ok(fallback_exam(content, exam_type))
            }
        }
    }

    pub async fn smart_notes(&self, content: &str, kind: NotesKind) -> Result<String> {
        let request = CompletionRequest::new(
            NOTES_MODEL,
            "PandaAI Smart Notes",
            vec![
                ChatMessage::system("You are a helpful AI assistant that creates educational content and study materials. Always respond in English and provide well-structured, clear content."),
                ChatMessage::user(kind.prompt(content)),
            ],
            2000,
        );

        let completion = self.client.complete(request).await.map_err(|e| {
            tracing::error!("Smart Notes generation error: {}", e);
            Error::Internal(NOTES_FAILURE.into())
        })?;

        if completion.content.is_empty() {
            Ok("No content generated".to_string())
        } else {
            Ok(completion.content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(mock: MockCompletionClient) -> AiService {
        AiService::new(Arc::new(mock))
    }

    fn reply(content: &str) -> std::result::Result<Completion, ProviderError> {
        Ok(Completion {
            content: content.to_string(),
            usage: json!({ "total_tokens": 42 }),
        })
    }

    #[test]
    fn extracts_outermost_json_object() {
        let text = "Sure! Here it is:\n{\"quiz\": {\"title\": \"T\"}}\nGood luck.";
        assert_eq!(extract_json_object(text), Some(json!({"quiz": {"title": "T"}})));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
        assert_eq!(extract_json_object("{broken"), None);
    }

    #[test]
    fn exam_type_detection() {
        assert_eq!(detect_exam_type("Exercice 1: calculer 2+3"), ExamType::Exercise);
        assert_eq!(detect_exam_type("Choose a) red b) blue"), ExamType::Quiz);
        assert_eq!(detect_exam_type("Histoire de France"), ExamType::Mixed);
    }

    #[test]
    fn notes_kind_defaults_to_smart_notes() {
        assert_eq!(NotesKind::parse("mind_map"), NotesKind::MindMap);
        assert_eq!(NotesKind::parse("summary"), NotesKind::Summary);
        assert_eq!(NotesKind::parse("poem"), NotesKind::SmartNotes);
    }

    #[tokio::test]
    async fn coach_cleans_the_reply_and_keeps_usage() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| {
                req.model == COACH_MODEL
                    && req.max_tokens == 1000
                    && req.messages[0].role == "system"
                    && req.messages[0].content.contains("UNIQUEMENT en anglais")
            })
            .returning(|_| reply("**Great** question. Study daily. Sleep well."));

        let out = service(mock)
            .coach_reply(&[ChatMessage::user("How do I study for the exam?")])
            .await
            .unwrap();

        assert_eq!(out.message, "Great question. Study daily. . . Sleep well");
        assert_eq!(out.usage, json!({ "total_tokens": 42 }));
    }

    #[tokio::test]
    async fn coach_without_key_answers_in_test_mode() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(|_| Err(ProviderError::MissingApiKey));

        let out = service(mock)
            .coach_reply(&[ChatMessage::user("what is a derivative")])
            .await
            .unwrap();

        assert!(out.message.contains("test mode"));
        assert_eq!(out.usage, json!({ "total_tokens": 0 }));
    }

    #[tokio::test]
    async fn coach_rate_limit_is_a_localized_message() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(|_| Err(ProviderError::RateLimited));

        let out = service(mock)
            .coach_reply(&[ChatMessage::user("Je ne comprends pas les intégrales")])
            .await
            .unwrap();

        assert!(out.message.contains("limite de requêtes"));
    }

    #[tokio::test]
    async fn coach_surfaces_other_provider_errors() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_| {
            Err(ProviderError::Status {
                status: 503,
                body: "down".into(),
            })
        });

        let err = service(mock)
            .coach_reply(&[ChatMessage::user("hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn quiz_parse_failure_is_a_fixed_error() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_| reply("I cannot do that"));

        let err = service(mock)
            .generate_quiz("Biology", 5, "Easy", "English")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), QUIZ_FAILURE);
    }

    #[tokio::test]
    async fn flashcards_return_the_provider_json() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| req.messages[0].content.starts_with("Generate 3 flashcards about \"Rust\""))
            .returning(|_| reply("```json\n{\"flashcards\":[{\"front\":\"Q\",\"back\":\"A\"}]}\n```"));

        let out = service(mock)
            .generate_flashcards("Rust", 3, "medium", "English")
            .await
            .unwrap();
        assert_eq!(out["flashcards"][0]["front"], "Q");
    }

    #[tokio::test]
    async fn exam_wraps_unparseable_reply() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_| reply("Question 1: what is 2+2?"));

        let exam = service(mock)
            .generate_exam("a) b) choix", ExamType::Quiz, Some(60))
            .await
            .unwrap();

        assert_eq!(exam.questions.len(), 1);
        assert_eq!(exam.questions[0].question, "Question 1: what is 2+2?");
        assert_eq!(exam.questions[0].options.as_ref().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn exam_upstream_failure_uses_fallback() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_| {
            Err(ProviderError::Status {
                status: 500,
                body: String::new(),
            })
        });

        let doc = "x".repeat(500);
        let exam = service(mock)
            .generate_exam(&doc, ExamType::Mixed, None)
            .await
            .unwrap();

        let q = &exam.questions[0];
        assert!(q.question.ends_with(&format!("{}...", "x".repeat(200))));
        assert_eq!(q.correct_answer, None);
        assert_eq!(q.options.as_deref(), Some(&[][..]));
    }

    #[tokio::test]
    async fn exam_without_key_is_an_error() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(|_| Err(ProviderError::MissingApiKey));

        let err = service(mock)
            .generate_exam("doc", ExamType::Mixed, Some(30))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error generating exam: OPENROUTER_API_KEY not found"
        );
    }

    #[tokio::test]
    async fn smart_notes_empty_reply() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| req.model == NOTES_MODEL && req.messages[1].content.starts_with("Create a concise summary"))
            .returning(|_| reply(""));

        let out = service(mock)
            .smart_notes("lecture text", NotesKind::Summary)
            .await
            .unwrap();
        assert_eq!(out, "No content generated");
    }
}
