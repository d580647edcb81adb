// File Path: src/services/responder.rs

//! # Responder
//!
//! Maps free-text input plus a language code to localized guidance from the
//! knowledge store. Matching is plain substring containment on the lowercased,
//! trimmed input; the first record in declaration order wins.

use crate::{
    models::ChatReply,
    services::{
        knowledge_store::{ConditionRecord, KnowledgeStore},
        reply_templates::TemplateCatalog,
    },
};

/// Reply for input that names no known condition. Not localized.
pub const FALLBACK_REPLY: &str = "Sorry, I don't have information about that.";

#[derive(Debug, Clone, Default)]
pub struct Responder {
    templates: TemplateCatalog,
}

impl Responder {
    pub fn new(templates: TemplateCatalog) -> Self {
        Self { templates }
    }

    pub fn respond(&self, message: &str, lang: &str, store: &KnowledgeStore) -> ChatReply {
        let user = normalize(message);

        let bot = match find_condition(&user, store) {
            Some(record) => self.render(record, lang),
            None => FALLBACK_REPLY.to_string(),
        };

        ChatReply {
            user,
            bot,
            lang: lang.to_string(),
        }
    }

    fn render(&self, record: &ConditionRecord, lang: &str) -> String {
        self.templates.select(lang).render(
            &title_case(&record.name),
            record.symptoms.resolve(lang),
            record.prevention.resolve(lang),
            record.treatment.resolve(lang),
            record.emergency.resolve(lang),
        )
    }
}

/// First record whose name occurs anywhere in `normalized`.
fn find_condition<'a>(normalized: &str, store: &'a KnowledgeStore) -> Option<&'a ConditionRecord> {
    store.entries().find(|record| normalized.contains(record.name.as_str()))
}

fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Uppercases the first character of each word; words split on whitespace and '-'.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = c.is_whitespace() || c == '-';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::knowledge_store::DataFormat;

    const STORE: &str = r#"{
        "flu": {
            "symptoms":   { "en": ["fever", "cough"], "hi": ["बुखार", "खांसी"] },
            "prevention": { "en": ["rest", "fluids"], "hi": ["आराम", "तरल पदार्थ"] },
            "treatment":  { "en": "antivirals" },
            "emergency":  { "en": "112", "hi": "112 पर कॉल करें" }
        },
        "dengue": {
            "symptoms":   { "en": ["high fever", "joint pain"] },
            "prevention": { "en": ["mosquito repellent"] },
            "treatment":  { "en": "hydration" },
            "emergency":  { "en": "108" }
        },
        "common cold": {
            "symptoms":   { "en": ["sneezing"] },
            "prevention": { "en": ["hand washing"] },
            "treatment":  { "en": "rest" },
            "emergency":  { "en": "112" }
        }
    }"#;

    fn store() -> KnowledgeStore {
        KnowledgeStore::parse(STORE, DataFormat::Json).unwrap()
    }

    #[test]
    fn english_reply_for_matching_condition() {
        let reply = Responder::default().respond("I think I have flu", "en", &store());

        assert_eq!(reply.user, "i think i have flu");
        assert_eq!(reply.lang, "en");
        for needle in ["Flu", "fever, cough", "rest, fluids", "antivirals", "112"] {
            assert!(reply.bot.contains(needle), "missing {needle:?} in {:?}", reply.bot);
        }
        assert!(reply.bot.starts_with("🦠 Flu info:"));
    }

    #[test]
    fn fallback_ignores_language() {
        let store = store();
        let responder = Responder::default();
        for lang in ["en", "hi", "xx", ""] {
            let reply = responder.respond("unknown", lang, &store);
            assert_eq!(reply.bot, FALLBACK_REPLY);
            assert_eq!(reply.lang, lang);
        }
    }

    #[test]
    fn empty_message_gets_fallback() {
        let reply = Responder::default().respond("   ", "en", &store());
        assert_eq!(reply.user, "");
        assert_eq!(reply.bot, FALLBACK_REPLY);
    }

    #[test]
    fn hindi_falls_back_per_field() {
        let reply = Responder::default().respond("मुझे flu है", "hi", &store());

        assert!(reply.bot.starts_with("🦠 Flu जानकारी:"));
        assert!(reply.bot.contains("लक्षण: बुखार, खांसी"));
        assert!(reply.bot.contains("बचाव: आराम, तरल पदार्थ"));
        assert!(reply.bot.contains("इलाज: antivirals"));
        assert!(reply.bot.contains("आपातकाल: 112 पर कॉल करें"));
    }

    #[test]
    fn unknown_language_uses_english_text_and_headers() {
        let reply = Responder::default().respond("flu", "ta", &store());
        assert!(reply.bot.contains("Symptoms: fever, cough"));
        assert_eq!(reply.lang, "ta");
    }

    #[test]
    fn input_is_lowercased_and_trimmed_before_matching() {
        let reply = Responder::default().respond("  Symptoms of DENGUE?  ", "en", &store());
        assert_eq!(reply.user, "symptoms of dengue?");
        assert!(reply.bot.contains("Dengue info"));
    }

    #[test]
    fn substring_match_is_literal() {
        let store = store();
        let responder = Responder::default();

        let inside_word = responder.respond("influenza-like symptoms", "en", &store);
        assert!(inside_word.bot.starts_with("🦠 Flu info:"));

        let split_word = responder.respond("fl u", "en", &store);
        assert_eq!(split_word.bot, FALLBACK_REPLY);
    }

    #[test]
    fn first_declared_condition_wins() {
        let reply = Responder::default().respond("dengue or flu?", "en", &store());
        assert!(reply.bot.contains("Flu info"));
        assert!(!reply.bot.contains("Dengue"));
    }

    #[test]
    fn multi_word_names_are_title_cased() {
        let reply = Responder::default().respond("a common cold again", "en", &store());
        assert!(reply.bot.starts_with("🦠 Common Cold info:"));
        assert_eq!(title_case("covid-19"), "Covid-19");
    }

    #[test]
    fn respond_is_idempotent() {
        let store = store();
        let responder = Responder::default();
        let first = responder.respond("Flu", "hi", &store);
        let second = responder.respond("Flu", "hi", &store);
        assert_eq!(first, second);
    }
}
