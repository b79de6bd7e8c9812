use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    French,
    English,
    German,
    Spanish,
    Chinese,
    Japanese,
    Korean,
}

const FRENCH_WORDS: &str = r"(?i)\b(je|tu|il|elle|nous|vous|ils|elles|le|la|les|un|une|des|ce|ces|mon|ma|mes|ton|ta|tes|son|sa|ses|notre|votre|leur|leurs|qui|que|quoi|où|quand|comment|pourquoi|est|sont|était|étaient|ai|as|a|avons|avez|ont|peux|peut|pouvons|pouvez|peuvent|veux|veut|voulons|voulez|veulent|dois|doit|devons|devez|doivent|suis|es|étais|étions|étiez)\b";
const ENGLISH_WORDS: &str = r"(?i)\b(the|and|or|but|in|on|at|to|for|with|by|from|what|how|why|when|where|who|which|that|this|these|those|is|are|was|were|have|has|had|do|does|did|can|could|will|would|should|may|might|i|you|he|she|we|they|my|your|his|her|our|their)\b";
const GERMAN_WORDS: &str = r"(?i)\b(die|der|das|und|oder|aber|in|auf|an|zu|für|mit|von|was|wie|warum|wann|wo|wer|welche|dies|diese|ist|sind|war|waren|habe|hat|hatte|kann|könnte|wird|würde|sollte|mag|möchte)\b";
const SPANISH_WORDS: &str = r"(?i)\b(el|la|los|las|y|o|pero|en|sobre|a|para|con|de|qué|cómo|por qué|cuándo|dónde|quién|cuál|que|este|esta|estos|estas|es|son|era|eran|tiene|tienen|tenía|puede|podría|será|sería|debería)\b";

fn word_list(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("language pattern is valid"))
}

fn french() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    word_list(&RE, FRENCH_WORDS)
}

fn english() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    word_list(&RE, ENGLISH_WORDS)
}

fn german() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    word_list(&RE, GERMAN_WORDS)
}

fn spanish() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    word_list(&RE, SPANISH_WORDS)
}

impl Language {
    /// Guesses the language of a chat message. The word lists overlap, so
    /// the check order matters: French wins ties, then English.
    pub fn detect(text: &str) -> Self {
        if french().is_match(text) {
            Language::French
        } else if english().is_match(text) {
            Language::English
        } else if german().is_match(text) {
            Language::German
        } else if spanish().is_match(text) {
            Language::Spanish
        } else if text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)) {
            Language::Chinese
        } else if text.chars().any(|c| ('\u{3040}'..='\u{30ff}').contains(&c)) {
            Language::Japanese
        } else if text.chars().any(|c| ('\u{ac00}'..='\u{d7af}').contains(&c)) {
            Language::Korean
        } else {
            Language::French
        }
    }

    /// Two-way detection used while the coach runs without an API key.
    pub fn detect_basic(text: &str) -> Self {
        if english().is_match(text) {
            Language::English
        } else {
            Language::French
        }
    }

    pub fn from_accept_language(header: Option<&str>) -> Self {
        let header = header.unwrap_or("fr");
        if header.starts_with("en") {
            Language::English
        } else if header.starts_with("de") {
            Language::German
        } else if header.starts_with("es") {
            Language::Spanish
        } else {
            Language::French
        }
    }

    /// Name of the language, written in French for the coach system prompt.
    pub fn french_name(&self) -> &'static str {
        match self {
            Language::French => "français",
            Language::English => "anglais",
            Language::German => "allemand",
            Language::Spanish => "espagnol",
            Language::Chinese => "chinois",
            Language::Japanese => "japonais",
            Language::Korean => "coréen",
        }
    }

    pub fn coach_introduction(&self) -> &'static str {
        match self {
            Language::French => "Je suis ton Panda AI Coach, là pour t'épauler dans tes révisions.",
            Language::English => "I am your Panda AI Coach, here to support you in your studies.",
            Language::German => "Ich bin dein Panda AI Coach, hier um dich bei deinen Studien zu unterstützen.",
            Language::Spanish => "Soy tu Panda AI Coach, aquí para apoyarte en tus estudios.",
            Language::Chinese => "我是你的熊猫AI教练，在这里支持你的学习。",
            Language::Japanese => "私はあなたのパンダAIコーチです。勉強をサポートするためにここにいます。",
            Language::Korean => "나는 당신의 판다 AI 코치입니다. 공부를 지원하기 위해 여기 있습니다.",
        }
    }

    /// Reply used when no OpenRouter key is configured. Only French and
    /// English are translated; everything else gets French.
    pub fn test_mode_message(&self) -> &'static str {
        match self {
            Language::English => "I am your Panda AI Coach, here to support you in your studies.\n\nI see you asked a question. Currently, I'm in test mode because the OpenRouter API key is not configured.\n\nTo activate the full chat, you need to:\n\n1. Go to https://openrouter.ai/\n2. Create an account and get a free API key\n3. Add this key to the .env.local file\n\nIn the meantime, I can help you with general study tips!",
            _ => "Je suis ton Panda AI Coach, là pour t'épauler dans tes révisions.\n\nJe vois que tu as posé une question. Pour le moment, je suis en mode de test car la clé API OpenRouter n'est pas configurée.\n\nPour activer le chat complet, tu dois :\n\n1. Aller sur https://openrouter.ai/\n2. Créer un compte et obtenir une clé API gratuite\n3. Ajouter cette clé dans le fichier .env.local\n\nEn attendant, je peux t'aider avec des conseils généraux d'étude !",
        }
    }

    pub fn rate_limited_message(&self) -> &'static str {
        match self {
            Language::English => "I am your Panda AI Coach, here to support you in your studies.\n\nI see you've reached the free request limit for today. This is normal with free OpenRouter accounts which have strict limits.\n\nTo continue using the chat without limits:\n\n1. Wait a few minutes before trying again\n2. Or upgrade to a paid account on OpenRouter\n3. Or use the test mode which works without limits\n\nIn the meantime, I can help you with general study tips!",
            _ => "Je suis ton Panda AI Coach, là pour t'épauler dans tes révisions.\n\nJe vois que tu as atteint la limite de requêtes gratuites pour aujourd'hui. C'est normal avec les comptes gratuits d'OpenRouter qui ont des limites strictes.\n\nPour continuer à utiliser le chat sans limite :\n\n1. Attends quelques minutes avant de réessayer\n2. Ou passe à un compte payant sur OpenRouter\n3. Ou utilise le mode de test qui fonctionne sans limite\n\nEn attendant, je peux t'aider avec des conseils d'étude généraux !",
        }
    }

    pub fn file_attached_message(&self) -> &'static str {
        match self {
            Language::English => "File attached",
            Language::German => "Datei angehängt",
            Language::Spanish => "Archivo adjunto",
            _ => "Fichier joint",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_french_first() {
        assert_eq!(Language::detect("Comment je peux réviser ?"), Language::French);
    }

    #[test]
    fn detects_english() {
        assert_eq!(Language::detect("How should I study for this exam?"), Language::English);
    }

    #[test]
    fn detects_german_and_spanish() {
        assert_eq!(Language::detect("Warum ist Mathematik wichtig?"), Language::German);
        assert_eq!(Language::detect("¿Cómo puedo estudiar mejor?"), Language::Spanish);
    }

    #[test]
    fn detects_cjk_scripts() {
        assert_eq!(Language::detect("数学"), Language::Chinese);
        assert_eq!(Language::detect("べんきょう"), Language::Japanese);
        assert_eq!(Language::detect("공부"), Language::Korean);
    }

    #[test]
    fn falls_back_to_french() {
        assert_eq!(Language::detect("12345"), Language::French);
        assert_eq!(Language::detect_basic("bonjour"), Language::French);
        assert_eq!(Language::detect_basic("what now"), Language::English);
    }

    #[test]
    fn accept_language_prefixes() {
        assert_eq!(Language::from_accept_language(Some("en-US,en;q=0.9")), Language::English);
        assert_eq!(Language::from_accept_language(Some("de-DE")), Language::German);
        assert_eq!(Language::from_accept_language(None), Language::French);
        assert_eq!(Language::English.file_attached_message(), "File attached");
        assert_eq!(Language::French.file_attached_message(), "Fichier joint");
    }
}
