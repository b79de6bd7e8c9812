use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    response::Json,
};
use bytes::Bytes;

use crate::{
    dto::content_dto::{
        ExtractPdfResponse, TranscribeYoutubeRequest, TranscriptionResponse, UploadPdfResponse,
    },
    error::{Error, Result},
    services::content_service::{analyze_content, extract_video_id, is_youtube_url},
    utils::{extract::ApiJson, language::Language, validation::non_empty},
    AppState,
};

const PDF_MIME: &str = "application/pdf";
const EXTRACT_MAX_BYTES: usize = 20 * 1024 * 1024;
const UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: Bytes,
}

/// Pulls the first multipart field called `name`; other fields are drained.
async fn read_file_field(multipart: &mut Multipart, name: &str) -> Result<Option<UploadedFile>> {
    let mut found = None;
    while let Some(field) = multipart.next_field().await? {
        if found.is_some() || field.name() != Some(name) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field.bytes().await?;
        found = Some(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }
    Ok(found)
}

#[axum::debug_handler]
pub async fn extract_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractPdfResponse>> {
    let file = read_file_field(&mut multipart, "file")
        .await?
        .ok_or_else(|| Error::BadRequest("No file provided".into()))?;

    if file.content_type.as_deref() != Some(PDF_MIME) {
        return Err(Error::BadRequest("Only PDF files are accepted".into()));
    }
    if file.bytes.len() > EXTRACT_MAX_BYTES {
        return Err(Error::BadRequest("File is too large (max 20MB)".into()));
    }

    tracing::info!(filename = %file.filename, size = file.bytes.len(), "Extracting PDF");
    let extraction = state.content_service.extract_pdf(&file.bytes).await?;
    let analysis = analyze_content(&extraction.text);

    Ok(Json(ExtractPdfResponse {
        success: true,
        filename: file.filename,
        extracted_text: extraction.text,
        content_type: analysis,
        pages: extraction.pages,
        message: "Content extracted successfully".into(),
    }))
}

#[axum::debug_handler]
pub async fn upload_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadPdfResponse>> {
    let file = read_file_field(&mut multipart, "file")
        .await?
        .ok_or_else(|| Error::BadRequest("Aucun fichier fourni".into()))?;

    if file.content_type.as_deref() != Some(PDF_MIME) {
        return Err(Error::BadRequest(
            "Seuls les fichiers PDF sont acceptés".into(),
        ));
    }
    if file.bytes.len() > UPLOAD_MAX_BYTES {
        return Err(Error::BadRequest(
            "Le fichier est trop volumineux (max 10MB)".into(),
        ));
    }

    let extraction = state
        .content_service
        .extract_pdf(&file.bytes)
        .await
        .map_err(|e| {
            tracing::error!("Upload PDF error: {}", e);
            Error::Internal("Erreur lors de l'upload du fichier".into())
        })?;

    let language = Language::from_accept_language(
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    );

    Ok(Json(UploadPdfResponse {
        success: true,
        filename: file.filename,
        extracted_text: extraction.text,
        message: language.file_attached_message().to_string(),
    }))
}

#[axum::debug_handler]
pub async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>> {
    let audio = read_file_field(&mut multipart, "audio")
        .await?
        .ok_or_else(|| Error::BadRequest("No audio file provided".into()))?;

    let transcription = state
        .content_service
        .transcribe_audio(&audio.filename, audio.content_type.as_deref(), audio.bytes.to_vec())
        .await
        .map_err(|e| {
            tracing::error!("Transcription error: {}", e);
            Error::Internal("Failed to transcribe audio".into())
        })?;

    Ok(Json(TranscriptionResponse {
        transcription,
        success: true,
        message: None,
    }))
}

#[axum::debug_handler]
pub async fn transcribe_youtube(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TranscribeYoutubeRequest>,
) -> Result<Json<TranscriptionResponse>> {
    let url = non_empty(&payload.url)
        .ok_or_else(|| Error::BadRequest("No YouTube URL provided".into()))?;

    if !is_youtube_url(url) {
        return Err(Error::BadRequest("Please enter a valid YouTube URL".into()));
    }
    let video_id =
        extract_video_id(url).ok_or_else(|| Error::BadRequest("Invalid YouTube URL".into()))?;

    tracing::info!(video_id = %video_id, "Fetching YouTube transcript");
    Ok(Json(state.content_service.transcribe_youtube(&video_id).await))
}
