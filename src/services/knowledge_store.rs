// File Path: src/services/knowledge_store.rs
// Description: Loading and validation of the condition knowledge base.

// ====================================================
// SECTION: Imports and Types
// ====================================================

use jsonschema::{Draft, JSONSchema};
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};
use serde_json::{Map, Value};
use std::{
    collections::{HashMap, HashSet},
    fmt, io,
    path::Path,
    sync::OnceLock,
};
use tokio::fs;
use tracing::info;

const KNOWLEDGE_SCHEMA: &str = include_str!("../../schemas/health_data.schema.json");

/// Language used whenever a field has no entry for the requested one.
pub const FALLBACK_LANG: &str = "en";

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("knowledge file not found: {0}")]
    DataUnavailable(String),

    #[error("knowledge data is corrupt: {0}")]
    DataCorrupt(String),

    #[error("knowledge schema failed to compile: {0}")]
    Schema(String),

    #[error("failed to read knowledge file: {0}")]
    Io(#[from] io::Error),
}

/// On-disk encoding of the knowledge file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// `.yaml` / `.yml` files are YAML, everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DataFormat::Yaml
            }
            _ => DataFormat::Json,
        }
    }
}

/// A value with an English fallback and optional translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized<T> {
    fallback: T,
    translations: HashMap<String, T>,
}

impl<T> Localized<T> {
    fn from_map(mut map: HashMap<String, T>, field: &str) -> Result<Self, String> {
        let fallback = map
            .remove(FALLBACK_LANG)
            .ok_or_else(|| format!("field '{}' has no '{}' entry", field, FALLBACK_LANG))?;
        Ok(Self {
            fallback,
            translations: map,
        })
    }

    /// Returns the entry for `lang`, or the English one when `lang` is absent.
    pub fn resolve(&self, lang: &str) -> &T {
        self.translations.get(lang).unwrap_or(&self.fallback)
    }
}

/// One disease/condition entry with localized guidance text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionRecord {
    /// Trimmed, lowercased key used for matching.
    pub name: String,
    pub symptoms: Localized<Vec<String>>,
    pub prevention: Localized<Vec<String>>,
    pub treatment: Localized<String>,
    pub emergency: Localized<String>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    symptoms: HashMap<String, Vec<String>>,
    prevention: HashMap<String, Vec<String>>,
    treatment: HashMap<String, String>,
    emergency: HashMap<String, String>,
}

impl ConditionRecord {
    fn from_raw(name: String, raw: RawCondition) -> Result<Self, String> {
        let context = |e: String| format!("condition '{}': {}", name, e);
        Ok(Self {
            symptoms: Localized::from_map(raw.symptoms, "symptoms").map_err(context)?,
            prevention: Localized::from_map(raw.prevention, "prevention").map_err(context)?,
            treatment: Localized::from_map(raw.treatment, "treatment").map_err(context)?,
            emergency: Localized::from_map(raw.emergency, "emergency").map_err(context)?,
            name,
        })
    }
}

/// Top-level entries exactly as written, repeated keys included.
struct RawEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of condition names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Immutable, ordered collection of condition records.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    records: Vec<ConditionRecord>,
}

// ====================================================
// SECTION: Loading
// ====================================================

impl KnowledgeStore {
    /// Reads and parses the knowledge file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(KnowledgeError::DataUnavailable(path.display().to_string()));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(KnowledgeError::DataCorrupt(format!(
                    "{}: not valid UTF-8",
                    path.display()
                )));
            }
            Err(e) => return Err(KnowledgeError::Io(e)),
        };

        let store = Self::parse(&content, DataFormat::from_path(path)).map_err(|e| match e {
            KnowledgeError::DataCorrupt(reason) => {
                KnowledgeError::DataCorrupt(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })?;

        info!(path = %path.display(), conditions = store.len(), "Loaded knowledge store");
        Ok(store)
    }

    /// Parses an in-memory knowledge document.
    pub fn parse(content: &str, format: DataFormat) -> Result<Self, KnowledgeError> {
        let RawEntries(entries) = match format {
            DataFormat::Json => serde_json::from_str(content)
                .map_err(|e| KnowledgeError::DataCorrupt(format!("invalid JSON: {}", e)))?,
            DataFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| KnowledgeError::DataCorrupt(format!("invalid YAML: {}", e)))?,
        };

        let document: Map<String, Value> = entries.iter().cloned().collect();
        validate_schema(&Value::Object(document))?;

        let mut seen = HashSet::with_capacity(entries.len());
        let mut records = Vec::with_capacity(entries.len());

        for (raw_name, body) in entries {
            let name = raw_name.trim().to_lowercase();
            if name.is_empty() {
                return Err(KnowledgeError::DataCorrupt(format!(
                    "condition name {:?} is empty",
                    raw_name
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(KnowledgeError::DataCorrupt(format!(
                    "duplicate condition '{}'",
                    name
                )));
            }

            let raw: RawCondition = serde_json::from_value(body).map_err(|e| {
                KnowledgeError::DataCorrupt(format!("condition '{}': {}", name, e))
            })?;
            records.push(ConditionRecord::from_raw(name, raw).map_err(KnowledgeError::DataCorrupt)?);
        }

        Ok(Self { records })
    }
}

/// The embedded schema, compiled on first use.
fn knowledge_schema() -> Result<&'static JSONSchema, KnowledgeError> {
    static SCHEMA: OnceLock<Result<JSONSchema, String>> = OnceLock::new();

    SCHEMA
        .get_or_init(|| {
            let schema_value: Value =
                serde_json::from_str(KNOWLEDGE_SCHEMA).map_err(|e| e.to_string())?;
            let compiled = JSONSchema::options()
                .with_draft(Draft::Draft7)
                .compile(&schema_value)
                .map_err(|e| e.to_string());
            compiled
        })
        .as_ref()
        .map_err(|e| KnowledgeError::Schema(e.clone()))
}

fn validate_schema(document: &Value) -> Result<(), KnowledgeError> {
    let schema = knowledge_schema()?;

    if let Err(errors) = schema.validate(document) {
        let messages: Vec<String> = errors
            .map(|e| format!("at '{}': {}", e.instance_path, e))
            .collect();
        return Err(KnowledgeError::DataCorrupt(format!(
            "schema validation failed: {}",
            messages.join("; ")
        )));
    }

    Ok(())
}

// ====================================================
// SECTION: Access
// ====================================================

impl KnowledgeStore {
    /// Records in declaration order. Every call starts from the first record.
    pub fn entries(&self) -> impl Iterator<Item = &ConditionRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "malaria": {
            "symptoms":   { "en": ["fever", "chills"], "hi": ["बुखार", "ठंड लगना"] },
            "prevention": { "en": ["mosquito nets"] },
            "treatment":  { "en": "antimalarials", "hi": "मलेरिया-रोधी दवाएं" },
            "emergency":  { "en": "108" }
        },
        "Dengue ": {
            "symptoms":   { "en": ["rash"] },
            "prevention": { "en": ["no standing water"] },
            "treatment":  { "en": "fluids" },
            "emergency":  { "en": "108" }
        },
        "cold": {
            "symptoms":   { "en": ["sneezing"] },
            "prevention": { "en": ["hand washing"] },
            "treatment":  { "en": "rest" },
            "emergency":  { "en": "112" }
        }
    }"#;

    fn names(store: &KnowledgeStore) -> Vec<&str> {
        store.entries().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn keeps_declaration_order_and_canonical_names() {
        let store = KnowledgeStore::parse(SAMPLE, DataFormat::Json).unwrap();
        assert_eq!(names(&store), vec!["malaria", "dengue", "cold"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn entries_restart_on_every_call() {
        let store = KnowledgeStore::parse(SAMPLE, DataFormat::Json).unwrap();
        let first: Vec<_> = store.entries().take(2).map(|r| r.name.clone()).collect();
        let second: Vec<_> = store.entries().map(|r| r.name.clone()).collect();
        assert_eq!(first, vec!["malaria", "dengue"]);
        assert_eq!(second, vec!["malaria", "dengue", "cold"]);
    }

    #[test]
    fn localized_fields_fall_back_to_english() {
        let store = KnowledgeStore::parse(SAMPLE, DataFormat::Json).unwrap();
        let malaria = store.entries().next().unwrap();
        assert_eq!(malaria.symptoms.resolve("hi"), &vec!["बुखार".to_string(), "ठंड लगना".to_string()]);
        assert_eq!(malaria.prevention.resolve("hi"), &vec!["mosquito nets".to_string()]);
        assert_eq!(malaria.treatment.resolve("en"), "antimalarials");
        assert_eq!(malaria.emergency.resolve("ta"), "108");
    }

    #[test]
    fn missing_english_entry_is_corrupt() {
        let doc = r#"{ "flu": {
            "symptoms":   { "en": ["fever"] },
            "prevention": { "en": ["rest"] },
            "treatment":  { "hi": "आराम" },
            "emergency":  { "en": "112" }
        } }"#;
        let err = KnowledgeStore::parse(doc, DataFormat::Json).unwrap_err();
        assert!(matches!(err, KnowledgeError::DataCorrupt(_)), "got {err:?}");
    }

    #[test]
    fn missing_field_is_corrupt() {
        let doc = r#"{ "flu": {
            "symptoms":   { "en": ["fever"] },
            "treatment":  { "en": "rest" },
            "emergency":  { "en": "112" }
        } }"#;
        let err = KnowledgeStore::parse(doc, DataFormat::Json).unwrap_err();
        assert!(err.to_string().contains("schema validation failed"));
    }

    #[test]
    fn wrong_value_type_is_corrupt() {
        let doc = r#"{ "flu": {
            "symptoms":   { "en": "fever" },
            "prevention": { "en": ["rest"] },
            "treatment":  { "en": "rest" },
            "emergency":  { "en": "112" }
        } }"#;
        assert!(matches!(
            KnowledgeStore::parse(doc, DataFormat::Json),
            Err(KnowledgeError::DataCorrupt(_))
        ));
    }

    #[test]
    fn unparsable_json_is_corrupt() {
        assert!(matches!(
            KnowledgeStore::parse("{ not json", DataFormat::Json),
            Err(KnowledgeError::DataCorrupt(_))
        ));
        assert!(matches!(
            KnowledgeStore::parse(r#"["flu"]"#, DataFormat::Json),
            Err(KnowledgeError::DataCorrupt(_))
        ));
    }

    #[test]
    fn empty_and_duplicate_names_are_corrupt() {
        let entry = r#"{
            "symptoms":   { "en": ["x"] },
            "prevention": { "en": ["y"] },
            "treatment":  { "en": "z" },
            "emergency":  { "en": "112" }
        }"#;
        let empty = format!(r#"{{ "  ": {} }}"#, entry);
        let duplicate = format!(r#"{{ "Flu": {0}, "flu": {0} }}"#, entry);

        let err = KnowledgeStore::parse(&empty, DataFormat::Json).unwrap_err();
        assert!(err.to_string().contains("is empty"));
        let err = KnowledgeStore::parse(&duplicate, DataFormat::Json).unwrap_err();
        assert!(err.to_string().contains("duplicate condition 'flu'"));
    }

    #[test]
    fn repeated_key_is_corrupt_not_overwritten() {
        let entry = |symptom: &str| {
            format!(
                r#"{{
                "symptoms":   {{ "en": ["{symptom}"] }},
                "prevention": {{ "en": ["rest"] }},
                "treatment":  {{ "en": "fluids" }},
                "emergency":  {{ "en": "112" }}
            }}"#
            )
        };
        let doc = format!(
            r#"{{ "flu": {}, "cold": {}, "flu": {} }}"#,
            entry("first"),
            entry("sneezing"),
            entry("second")
        );

        let err = KnowledgeStore::parse(&doc, DataFormat::Json).unwrap_err();
        assert!(matches!(err, KnowledgeError::DataCorrupt(_)), "got {err:?}");
        assert!(err.to_string().contains("duplicate condition 'flu'"));
    }

    #[test]
    fn repeated_yaml_key_is_corrupt() {
        let doc = "\
flu:
  symptoms: { en: [fever] }
  prevention: { en: [rest] }
  treatment: { en: fluids }
  emergency: { en: '112' }
flu:
  symptoms: { en: [cough] }
  prevention: { en: [rest] }
  treatment: { en: fluids }
  emergency: { en: '112' }
";
        assert!(matches!(
            KnowledgeStore::parse(doc, DataFormat::Yaml),
            Err(KnowledgeError::DataCorrupt(_))
        ));
    }

    #[test]
    fn schema_compiles_once() {
        let first = knowledge_schema().unwrap();
        let second = knowledge_schema().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn parses_yaml_in_order() {
        let doc = "\
typhoid:
  symptoms: { en: [fever] }
  prevention: { en: [clean water] }
  treatment: { en: antibiotics }
  emergency: { en: '108' }
cholera:
  symptoms: { en: [diarrhoea] }
  prevention: { en: [boiled water] }
  treatment: { en: ORS }
  emergency: { en: '108' }
";
        let store = KnowledgeStore::parse(doc, DataFormat::Yaml).unwrap();
        assert_eq!(names(&store), vec!["typhoid", "cholera"]);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DataFormat::from_path(Path::new("a/b.yaml")), DataFormat::Yaml);
        assert_eq!(DataFormat::from_path(Path::new("a/b.YML")), DataFormat::Yaml);
        assert_eq!(DataFormat::from_path(Path::new("a/b.json")), DataFormat::Json);
        assert_eq!(DataFormat::from_path(Path::new("a/b")), DataFormat::Json);
    }

    #[tokio::test]
    async fn load_reports_missing_file_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeStore::load(dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::DataUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let store = KnowledgeStore::load(file.path()).await.unwrap();
        assert_eq!(names(&store), vec!["malaria", "dengue", "cold"]);
    }

    #[tokio::test]
    async fn bundled_knowledge_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/health_data.json");
        let store = KnowledgeStore::load(path).await.unwrap();
        assert_eq!(store.entries().next().map(|r| r.name.as_str()), Some("flu"));
        assert!(store.entries().any(|r| r.name == "dengue"));
    }

    #[tokio::test]
    async fn load_prefixes_corruption_with_path() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{ broken").unwrap();

        let err = KnowledgeStore::load(file.path()).await.unwrap_err();
        let KnowledgeError::DataCorrupt(reason) = err else {
            panic!("expected DataCorrupt");
        };
        assert!(reason.starts_with(&file.path().display().to_string()));
    }
}
