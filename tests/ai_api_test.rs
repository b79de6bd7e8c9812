mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use pandaai_backend::{
    error::ProviderError,
    services::ai_service::{AiService, Completion, CompletionClient, CompletionRequest},
};
use serde_json::json;

use common::{app, app_with_ai, json_request, send};

/// Replies with a fixed completion and records the models it was asked for.
struct CannedClient {
    reply: std::result::Result<String, u16>,
    models: Mutex<Vec<String>>,
}

impl CannedClient {
    fn ok(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(content.to_string()),
            models: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            models: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError> {
        self.models.lock().unwrap().push(request.model.clone());
        match &self.reply {
            Ok(content) => Ok(Completion {
                content: content.clone(),
                usage: json!({ "total_tokens": 12 }),
            }),
            Err(status) => Err(ProviderError::Status {
                status: *status,
                body: "upstream".into(),
            }),
        }
    }
}

#[tokio::test]
async fn chat_without_key_answers_in_test_mode() {
    let app = app();

    let payload = json!({ "messages": [{ "role": "user", "content": "Bonjour, explique moi la photosynthèse" }] });
    let (status, body) = send(&app, json_request("POST", "/api/chat", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("mode de test"));
    assert_eq!(body["usage"]["total_tokens"], 0);

    let payload = json!({ "messages": [{ "role": "user", "content": "What is photosynthesis?" }] });
    let (status, body) = send(&app, json_request("POST", "/api/chat", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("test mode"));
}

#[tokio::test]
async fn chat_requires_messages() {
    let app = app();
    let (status, _) = send(&app, json_request("POST", "/api/chat", &json!({ "messages": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_cleans_the_model_reply() {
    let client = CannedClient::ok("**Bien sûr** ! La photosynthèse produit du glucose 🌱");
    let app = app_with_ai(AiService::new(client.clone()));

    let payload = json!({ "messages": [{ "role": "user", "content": "Peux-tu m'aider ?" }] });
    let (status, body) = send(&app, json_request("POST", "/api/chat", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("**"));
    assert!(!message.contains('🌱'));
    assert_eq!(body["usage"]["total_tokens"], 12);
}

#[tokio::test]
async fn chat_forwards_the_upstream_status() {
    let app = app_with_ai(AiService::new(CannedClient::failing(503)));

    let payload = json!({ "messages": [{ "role": "user", "content": "Salut" }] });
    let (status, body) = send(&app, json_request("POST", "/api/chat", &payload)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Failed to get response from AI");
}

#[tokio::test]
async fn generators_reject_missing_fields() {
    let app = app();

    let cases = [
        (
            "/api/generate-quiz",
            json!({ "subject": "Maths", "numQuestions": 0, "difficulty": "easy", "language": "fr" }),
            "Missing required fields",
        ),
        (
            "/api/generate-flashcards",
            json!({ "subject": "", "flashcardCount": 5, "difficulty": "easy" }),
            "Missing required fields",
        ),
        (
            "/api/smart-notes",
            json!({ "content": "Cours", "outputType": "" }),
            "Content and output type are required",
        ),
        (
            "/api/generate-exam",
            json!({ "duration": 60, "allowDocuments": false }),
            "No document content provided",
        ),
    ];

    for (uri, payload, expected) in cases {
        let (status, body) = send(&app, json_request("POST", uri, &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], expected, "{}", uri);
    }
}

#[tokio::test]
async fn generate_quiz_returns_the_model_json() {
    let client = CannedClient::ok(
        "Voici le quiz:\n{\"questions\":[{\"question\":\"2+2?\",\"options\":[\"3\",\"4\"],\"correctAnswer\":1}]}\nBonne chance",
    );
    let app = app_with_ai(AiService::new(client.clone()));

    let payload = json!({ "subject": "Maths", "numQuestions": 1, "difficulty": "easy", "language": "French" });
    let (status, body) = send(&app, json_request("POST", "/api/generate-quiz", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][0]["correctAnswer"], 1);
    assert_eq!(client.models.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn generate_exam_without_key_fails_with_a_message() {
    let app = app();
    let payload = json!({
        "duration": 60,
        "allowDocuments": false,
        "allowCalculator": true,
        "extractedText": "Exercice 1: résoudre 2x + 3 = 7"
    });
    let (status, body) = send(&app, json_request("POST", "/api/generate-exam", &payload)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("OPENROUTER_API_KEY"));
}

#[tokio::test]
async fn generate_exam_wraps_the_generated_content() {
    let client = CannedClient::ok(
        r#"{"title":"Examen","instructions":"Répondez","questions":[{"type":"exercise","question":"Résoudre 2x+3=7","explanation":"x=2"}]}"#,
    );
    let app = app_with_ai(AiService::new(client));

    let payload = json!({
        "duration": 90,
        "allowDocuments": true,
        "allowCalculator": false,
        "extractedText": "Exercice 1: résoudre 2x + 3 = 7"
    });
    let (status, body) = send(&app, json_request("POST", "/api/generate-exam", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["exam"]["duration"], 90);
    assert_eq!(body["exam"]["allowDocuments"], true);
    assert_eq!(body["exam"]["content"]["title"], "Examen");
}
