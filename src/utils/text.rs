use regex::Regex;
use std::sync::OnceLock;

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F600..=0x1F64F
            | 0x1F300..=0x1F5FF
            | 0x1F680..=0x1F6FF
            | 0x1F1E0..=0x1F1FF
            | 0x2600..=0x26FF
            | 0x2700..=0x27BF
    )
}

struct MarkdownPatterns {
    bold: Regex,
    underline: Regex,
    heading: Regex,
    italic: Regex,
    code: Regex,
    strike: Regex,
    sentence_end: Regex,
}

fn patterns() -> &'static MarkdownPatterns {
    static PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkdownPatterns {
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"),
        underline: Regex::new(r"__(.*?)__").expect("valid regex"),
        heading: Regex::new(r"#{1,6}\s").expect("valid regex"),
        italic: Regex::new(r"\*([^*]+)\*").expect("valid regex"),
        code: Regex::new(r"`([^`]+)`").expect("valid regex"),
        strike: Regex::new(r"~~([^~]+)~~").expect("valid regex"),
        sentence_end: Regex::new(r"[.!?]+").expect("valid regex"),
    })
}

pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|c| !is_emoji(*c)).collect()
}

pub fn strip_markdown(text: &str) -> String {
    let p = patterns();
    let text = p.bold.replace_all(text, "$1");
    let text = p.underline.replace_all(&text, "$1");
    let text = p.heading.replace_all(&text, "");
    let text = p.italic.replace_all(&text, "$1");
    let text = p.code.replace_all(&text, "$1");
    let text = p.strike.replace_all(&text, "$1");
    text.into_owned()
}

/// Splits on sentence punctuation and inserts two empty entries after every
/// second sentence, then joins everything back with ". ".
///
/// The terminal punctuation of the input is dropped and every sentence
/// boundary becomes a period.
pub fn aerate(text: &str) -> String {
    let sentences: Vec<&str> = patterns()
        .sentence_end
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut parts: Vec<&str> = Vec::with_capacity(sentences.len() * 2);
    for (i, sentence) in sentences.iter().copied().enumerate() {
        parts.push(sentence);
        if (i + 1) % 2 == 0 && i < sentences.len() - 1 {
            parts.push("");
            parts.push("");
        }
    }
    parts.join(". ")
}

/// Post-processing applied to every coach reply before it reaches the client.
pub fn clean_coach_reply(raw: &str) -> String {
    aerate(&strip_markdown(&strip_emoji(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_emoji() {
        assert_eq!(strip_emoji("Bravo 😀 !"), "Bravo  !");
        assert_eq!(strip_emoji("☀ sun ✂"), " sun ");
    }

    #[test]
    fn removes_markdown_markers() {
        assert_eq!(strip_markdown("**bold** and __under__"), "bold and under");
        assert_eq!(strip_markdown("## Title"), "Title");
        assert_eq!(strip_markdown("*it* `code` ~~gone~~"), "it code gone");
    }

    #[test]
    fn aerates_every_two_sentences() {
        assert_eq!(aerate("One. Two. Three."), "One. Two. . . Three");
        assert_eq!(aerate("One! Two?"), "One. Two");
        assert_eq!(aerate("Just one"), "Just one");
        assert_eq!(aerate("..."), "");
    }

    #[test]
    fn full_cleaning_pipeline() {
        let raw = "**Hello** 🎉. Study daily. Rest well.";
        assert_eq!(clean_coach_reply(raw), "Hello. Study daily. . . Rest well");
    }
}
