use crate::config::Config;
use crate::dto::content_dto::{ContentAnalysis, TranscriptionResponse};
use crate::error::{ProviderError, Result};
use crate::models::exam::ExamType;
use regex::Regex;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;

const WHISPER_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

const IMAGE_ONLY_PDF: &str = "This PDF appears to contain images or scanned content. The text extraction was limited. Please ensure your PDF contains selectable text for better results.";
const UNREADABLE_PDF: &str = "Unable to extract text from this PDF. Please try uploading a PDF with selectable text or contact support.";

const NO_CAPTIONS: &str = "This video doesn't have captions available. Please try a different YouTube video that has captions enabled, or use the audio recording option.";
const TRANSCRIPT_UNAVAILABLE: &str = "Unable to get transcript for this YouTube video. Please try a different video that has captions enabled, or use the audio recording option.";
const DEMO_TRANSCRIPTION: &str = "This is a test transcription for demonstration purposes.

The video appears to have captions available, but automatic extraction is currently limited. However, we can still demonstrate the smart notes generation functionality.

Key topics that might be covered in this video include:
- Introduction to the subject matter
- Main concepts and definitions
- Examples and practical applications
- Summary and conclusions

This transcription allows you to test the smart notes generation features including:
1. Smart Notes - organized study materials
2. Summary - key points overview
3. Detailed Transcript - formatted text
4. Mind Map - visual connections

You can now try generating different types of notes from this content to see how the system works.";

#[derive(Debug, Clone, PartialEq)]
pub struct PdfExtraction {
    pub text: String,
    pub pages: u32,
}

struct ContentPatterns {
    questions: Regex,
    multiple_choice: Regex,
    math: Regex,
    images: Regex,
    whitespace: Regex,
    youtube_url: Regex,
    video_id: [Regex; 3],
    caption_tracks: Regex,
    base_url: Regex,
    timed_text: Regex,
}

fn patterns() -> &'static ContentPatterns {
    static PATTERNS: OnceLock<ContentPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ContentPatterns {
        questions: Regex::new(
            r"(?i)question|exercice|problème|calcul|résoudre|énoncé|problem|solve|calculate",
        )
        .expect("valid regex"),
        multiple_choice: Regex::new(
            r"(?i)a\)|b\)|c\)|d\)|choix|option|\(a\)|\(b\)|\(c\)|\(d\)|multiple choice",
        )
        .expect("valid regex"),
        math: Regex::new(
            r"(?i)[+\-*/=]|\d+[+\-*/]\d+|\sqrt|log|sin|cos|π|∫|∑|equation|formula",
        )
        .expect("valid regex"),
        images: Regex::new(r"(?i)image|figure|graphique|schéma|diagram|chart")
            .expect("valid regex"),
        whitespace: Regex::new(r"\s+").expect("valid regex"),
        youtube_url: Regex::new(
            r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)[a-zA-Z0-9_-]+",
        )
        .expect("valid regex"),
        video_id: [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
                .expect("valid regex"),
            Regex::new(r"youtube\.com/watch\?.*v=([^&\n?#]+)").expect("valid regex"),
            Regex::new(r"youtu\.be/([^&\n?#]+)").expect("valid regex"),
        ],
        caption_tracks: Regex::new(r#""captionTracks":\s*\[([^\]]*)\]"#).expect("valid regex"),
        base_url: Regex::new(r#""baseUrl":"([^"]+)""#).expect("valid regex"),
        timed_text: Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid regex"),
    })
}

/// Collapses every whitespace run (including page breaks) into one space.
pub fn clean_extracted_text(text: &str) -> String {
    patterns().whitespace.replace_all(text, " ").trim().to_string()
}

/// Interprets `pdftotext` output. `None` means the tool could not be run or
/// failed on the file.
pub fn interpret_pdf_text(raw: Option<&str>) -> PdfExtraction {
    let Some(raw) = raw else {
        return PdfExtraction {
            text: UNREADABLE_PDF.to_string(),
            pages: 1,
        };
    };

    // pdftotext terminates every page with a form feed.
    let pages = raw.matches('\u{c}').count().max(1) as u32;

    if raw.trim().is_empty() {
        return PdfExtraction {
            text: IMAGE_ONLY_PDF.to_string(),
            pages,
        };
    }

    PdfExtraction {
        text: clean_extracted_text(raw),
        pages,
    }
}

pub fn analyze_content(text: &str) -> ContentAnalysis {
    let p = patterns();
    let has_questions = p.questions.is_match(text);
    let has_multiple_choice = p.multiple_choice.is_match(text);
    let has_math = p.math.is_match(text);
    let has_images = p.images.is_match(text);

    let exam_type = if has_math && has_questions {
        ExamType::Exercise
    } else if has_multiple_choice {
        ExamType::Quiz
    } else {
        ExamType::Mixed
    };

    ContentAnalysis {
        kind: if has_images { "mixed" } else { "text" }.to_string(),
        has_questions,
        has_math,
        has_multiple_choice,
        exam_type,
    }
}

pub fn is_youtube_url(url: &str) -> bool {
    patterns().youtube_url.is_match(url)
}

pub fn extract_video_id(url: &str) -> Option<String> {
    patterns()
        .video_id
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Looks for the caption track list in a watch page.
///
/// Returns `None` when the page has no `captionTracks` entry, and
/// `Some(None)` when tracks exist but no usable `baseUrl` was found.
pub fn find_caption_url(html: &str) -> Option<Option<String>> {
    let p = patterns();
    let tracks = p.caption_tracks.captures(html)?;
    let inner = tracks.get(1).map(|m| m.as_str()).unwrap_or_default();
    Some(
        p.base_url
            .captures(inner)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace("\\u0026", "&").replace("\\/", "/")),
    )
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;#39;", "'")
        .replace("&amp;quot;", "\"")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Flattens a YouTube timed-text XML document into a single paragraph.
pub fn flatten_timed_text(xml: &str) -> String {
    let lines: Vec<String> = patterns()
        .timed_text
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|s| !s.is_empty())
        .collect();
    clean_extracted_text(&lines.join(" "))
}

#[derive(Clone)]
pub struct ContentService {
    http: Client,
    openai_api_key: Option<String>,
    tmp_dir: PathBuf,
}

impl ContentService {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            openai_api_key: config.openai_api_key.clone(),
            tmp_dir: PathBuf::from(&config.upload_tmp_dir),
        }
    }

    /// Runs `pdftotext -layout` over the uploaded bytes.
    pub async fn extract_pdf(&self, bytes: &[u8]) -> Result<PdfExtraction> {
        let path = self
            .tmp_dir
            .join(format!("pandaai-{}.pdf", uuid::Uuid::new_v4()));
        fs::write(&path, bytes).await?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(&path)
            .arg("-")
            .output()
            .await;

        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!("Could not remove temporary PDF {}: {}", path.display(), e);
        }

        let raw = match output {
            Ok(out) if out.status.success() => {
                Some(String::from_utf8_lossy(&out.stdout).to_string())
            }
            Ok(out) => {
                tracing::error!(
                    "pdftotext exited with {}: {}",
                    out.status,
                    String::from_utf8_lossy(&out.stderr)
                );
                None
            }
            Err(e) => {
                tracing::error!("Failed to run pdftotext: {}", e);
                None
            }
        };

        let extraction = interpret_pdf_text(raw.as_deref());
        tracing::info!(
            pages = extraction.pages,
            chars = extraction.text.len(),
            "PDF text extracted"
        );
        Ok(extraction)
    }

    /// Sends the audio to Whisper. Without an OpenAI key the transcription is
    /// empty, matching the behaviour of the web app before transcription existed.
    pub async fn transcribe_audio(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> std::result::Result<String, ProviderError> {
        let Some(api_key) = self.openai_api_key.as_deref() else {
            tracing::info!("No OpenAI key configured, returning empty transcription");
            return Ok(String::new());
        };

        let mut part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        if let Some(ct) = content_type {
            part = part.mime_str(ct)?;
        }
        let form = reqwest::multipart::Form::new()
            .text("model", "whisper-1")
            .part("file", part);

        let res = self
            .http
            .post(WHISPER_URL)
            .bearer_auth(api_key)
            .multipart(form)
            .timeout(Duration::from_secs(300))
            .send()
            .await?;

        let status = res.status().as_u16();
        if !(200..300).contains(&status) {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body: JsonValue = res.json().await?;
        body.get("text")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| ProviderError::InvalidResponse("missing text".into()))
    }

    pub async fn transcribe_youtube(&self, video_id: &str) -> TranscriptionResponse {
        let page = self
            .http
            .get(format!("https://www.youtube.com/watch?v={}", video_id))
            .timeout(Duration::from_secs(30))
            .send()
            .await;

        let html = match page {
            Ok(res) => res.text().await,
            Err(e) => Err(e),
        };
        let html = match html {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Transcript fetch error: {}", e);
                return TranscriptionResponse {
                    transcription: TRANSCRIPT_UNAVAILABLE.to_string(),
                    success: false,
                    message: Some("Transcript not available".to_string()),
                };
            }
        };

        let Some(caption_url) = find_caption_url(&html) else {
            return TranscriptionResponse {
                transcription: NO_CAPTIONS.to_string(),
                success: false,
                message: Some("No captions available".to_string()),
            };
        };

        if let Some(url) = caption_url {
            match self.fetch_captions(&url).await {
                Ok(text) if !text.is_empty() => {
                    return TranscriptionResponse {
                        transcription: text,
                        success: true,
                        message: Some("Transcript extracted from captions".to_string()),
                    };
                }
                Ok(_) => tracing::warn!("Caption track for {} was empty", video_id),
                Err(e) => tracing::warn!("Caption download failed for {}: {}", video_id, e),
            }
        }

        TranscriptionResponse {
            transcription: DEMO_TRANSCRIPTION.to_string(),
            success: true,
            message: Some("Test transcription provided for demonstration".to_string()),
        }
    }

    async fn fetch_captions(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        let xml = self
            .http
            .get(url)
            .timeout(Duration::from_secs(30))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(flatten_timed_text(&xml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_text_is_collapsed_and_pages_counted() {
        let raw = "Chapter 1\n\n   Intro   text that is long enough to pass the threshold\u{c}Page two\u{c}";
        let out = interpret_pdf_text(Some(raw));
        assert_eq!(out.pages, 2);
        assert_eq!(
            out.text,
            "Chapter 1 Intro text that is long enough to pass the threshold Page two"
        );
    }

    #[test]
    fn short_text_is_still_returned() {
        let out = interpret_pdf_text(Some("Hi\u{c}"));
        assert_eq!(out.text, "Hi");
        assert_eq!(out.pages, 1);
    }

    #[test]
    fn image_only_and_failed_pdfs_get_messages() {
        assert_eq!(interpret_pdf_text(Some("\u{c}\u{c}\u{c}")).text, IMAGE_ONLY_PDF);
        assert_eq!(interpret_pdf_text(Some("\u{c}\u{c}\u{c}")).pages, 3);
        assert_eq!(interpret_pdf_text(None).text, UNREADABLE_PDF);
    }

    #[test]
    fn content_analysis_flags() {
        let a = analyze_content("Exercice 2 : résoudre l'equation x = 3, voir la figure 1");
        assert!(a.has_questions);
        assert!(a.has_math);
        assert_eq!(a.exam_type, ExamType::Exercise);
        assert_eq!(a.kind, "mixed");

        let b = analyze_content("Pick one: (a) Paris (b) Rome");
        assert!(b.has_multiple_choice);
        assert_eq!(b.exam_type, ExamType::Quiz);
        assert_eq!(b.kind, "text");
    }

    #[test]
    fn youtube_url_validation_and_ids() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("youtu.be/dQw4w9WgXcQ"));
        assert!(!is_youtube_url("https://vimeo.com/12345"));

        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/abc_123").as_deref(),
            Some("abc_123")
        );
        assert_eq!(extract_video_id("https://example.com"), None);
    }

    #[test]
    fn caption_tracks_are_located() {
        let html = r#"var x = {"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{}}],"other":1}"#;
        assert_eq!(
            find_caption_url(html),
            Some(Some("https://www.youtube.com/api/timedtext?v=abc&lang=en".to_string()))
        );
        assert_eq!(find_caption_url("<html></html>"), None);
        assert_eq!(find_caption_url(r#""captionTracks": []"#), Some(None));
    }

    #[test]
    fn timed_text_is_flattened() {
        let xml = r#"<?xml version="1.0"?><transcript><text start="0" dur="1">Hello &amp;#39;world&amp;#39;</text><text start="1" dur="2">second
line</text><text start="3"></text></transcript>"#;
        assert_eq!(flatten_timed_text(xml), "Hello 'world' second line");
    }
}
