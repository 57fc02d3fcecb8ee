use std::collections::HashSet;
use std::fs;
use std::path::Path;
use log::{debug, info};
use serde_json::{Map, Value};
use crate::errors::PopulationError;
use crate::models::location::LocationCode;

/// A municipality in the population index
#[derive(Debug, Clone)]
pub struct Population {
    pub code: LocationCode,
    pub name: String,
    normalized: String,
}

/// All municipalities AEMET has forecasts for, in the order of the bundled dataset
pub struct PopulationIndex {
    entries: Vec<Population>,
}

impl PopulationIndex {
    /// Loads the population index from the bundled json dataset.
    ///
    /// The dataset is a one element array holding an object of code to name, a bare
    /// object is accepted as well. Key order is kept.
    ///
    /// # Arguments
    ///
    /// * 'path' - path to the dataset
    pub fn load(path: impl AsRef<Path>) -> Result<PopulationIndex, PopulationError> {
        let json = fs::read_to_string(path.as_ref())?;
        let index = PopulationIndex::from_json(&json)?;
        info!("loaded {} populations from {}", index.len(), path.as_ref().display());

        Ok(index)
    }

    /// Builds the population index from a json document
    ///
    /// # Arguments
    ///
    /// * 'json' - the dataset document
    pub fn from_json(json: &str) -> Result<PopulationIndex, PopulationError> {
        let document: Value = serde_json::from_str(json)?;

        let objects: Vec<Map<String, Value>> = match document {
            Value::Object(map) => vec![map],
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    _ => Err(PopulationError::Content("expected an object of code to name".to_string())),
                })
                .collect::<Result<_, _>>()?,
            _ => return Err(PopulationError::Content("expected an array or an object".to_string())),
        };

        let mut seen: HashSet<LocationCode> = HashSet::new();
        let mut entries: Vec<Population> = Vec::new();
        for (code, name) in objects.into_iter().flatten() {
            let code: LocationCode = code.parse()?;
            let name = match name {
                Value::String(n) => n,
                _ => return Err(PopulationError::Content(format!("name for {} is not a string", code))),
            };
            if !seen.insert(code.clone()) {
                return Err(PopulationError::Content(format!("duplicate code {}", code)));
            }
            entries.push(Population { normalized: normalize(&name), code, name });
        }

        let index = PopulationIndex { entries };
        if index.is_empty() {
            return Err(PopulationError::Content("population dataset is empty".to_string()));
        }

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the populations in dataset order
    pub fn iter(&self) -> impl Iterator<Item = &Population> {
        self.entries.iter()
    }

    /// Returns the name of the given location, if known
    pub fn name(&self, code: &LocationCode) -> Option<&str> {
        self.iter().find(|p| &p.code == code).map(|p| p.name.as_str())
    }

    /// Filters populations by a text typed by the user.
    ///
    /// Ignoring case and diacritics (so "n" finds "ñ" as well), a population matches if
    /// the text is found at the start of any word of its name. The text is taken
    /// literally and may span several words. Surrounding blanks are ignored and an
    /// empty text matches everything.
    ///
    /// # Arguments
    ///
    /// * 'query' - text to look for
    pub fn filter(&self, query: &str) -> Vec<(LocationCode, String)> {
        let query = normalize(query.trim());

        let result = self
            .iter()
            .filter(|p| query.is_empty() || starts_any_word(&p.normalized, &query))
            .map(|p| (p.code.clone(), p.name.clone()))
            .collect::<Vec<(LocationCode, String)>>();

        debug!("filter '{}' gave {} results", query, result.len());
        result
    }
}

/// Transliterates to ascii and lowercases
fn normalize(text: &str) -> String {
    deunicode::deunicode(text).to_lowercase()
}

/// True if 'query' occurs in 'name' at a word boundary
fn starts_any_word(name: &str, query: &str) -> bool {
    let bytes = name.as_bytes();
    (0..=bytes.len())
        .filter(|&i| is_word_boundary(bytes, i))
        .any(|i| name.get(i..).is_some_and(|rest| rest.starts_with(query)))
}

fn is_word_boundary(bytes: &[u8], i: usize) -> bool {
    let before = i > 0 && is_word_byte(bytes[i - 1]);
    let after = i < bytes.len() && is_word_byte(bytes[i]);
    before != after
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[{
        "15030": "Coruña (A)",
        "28079": "Madrid",
        "38038": "Santa Cruz de Tenerife",
        "99001": "Villacoruña",
        "08019": "Barcelona",
        "29067": "Málaga",
        "31201": "Pamplona/Iruña",
        "05019": "Ávila"
    }]"#;

    fn codes(result: &[(LocationCode, String)]) -> Vec<&str> {
        result.iter().map(|(c, _)| c.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let index = PopulationIndex::from_json(DATASET).unwrap();
        let result = index.filter("");

        assert_eq!(result.len(), index.len());
        assert_eq!(codes(&result), vec!["15030", "28079", "38038", "99001", "08019", "29067", "31201", "05019"]);
    }

    #[test]
    fn test_blank_and_padded_query() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert_eq!(index.filter("   ").len(), index.len());
        assert_eq!(index.filter("\t").len(), index.len());
        assert_eq!(codes(&index.filter(" madrid ")), vec!["28079"]);
        assert_eq!(codes(&index.filter("madrid ")), vec!["28079"]);
        assert_eq!(codes(&index.filter("  santa cruz")), vec!["38038"]);
    }

    #[test]
    fn test_iter_keeps_dataset_order() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert!(!index.is_empty());
        assert_eq!(index.iter().count(), 8);
        assert_eq!(index.iter().map(|p| p.name.as_str()).nth(2), Some("Santa Cruz de Tenerife"));
        assert_eq!(index.iter().last().map(|p| p.code.as_str()), Some("05019"));
    }

    #[test]
    fn test_word_start_ignoring_accents_and_case() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert_eq!(codes(&index.filter("coru")), vec!["15030"]);
        assert_eq!(codes(&index.filter("CORUÑA")), vec!["15030"]);
        assert_eq!(codes(&index.filter("malaga")), vec!["29067"]);
        assert_eq!(codes(&index.filter("avi")), vec!["05019"]);
        assert_eq!(codes(&index.filter("iru")), vec!["31201"]);
    }

    #[test]
    fn test_mid_word_is_not_a_match() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert!(index.filter("drid").is_empty());
        assert!(!codes(&index.filter("coru")).contains(&"99001"));
    }

    #[test]
    fn test_query_spanning_words() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert_eq!(codes(&index.filter("santa cruz")), vec!["38038"]);
        assert_eq!(codes(&index.filter("cruz de t")), vec!["38038"]);
    }

    #[test]
    fn test_query_is_literal_text() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert!(index.filter(".*").is_empty());
        assert!(index.filter("(").is_empty());
        assert_eq!(codes(&index.filter("a)")), vec!["15030"]);
    }

    #[test]
    fn test_name_lookup() {
        let index = PopulationIndex::from_json(DATASET).unwrap();

        assert_eq!(index.name(&"08019".parse().unwrap()), Some("Barcelona"));
        assert_eq!(index.name(&"8019".parse().unwrap()), None);
    }

    #[test]
    fn test_bare_object_dataset() {
        let index = PopulationIndex::from_json(r#"{ "28079": "Madrid" }"#).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_malformed_datasets() {
        assert!(matches!(PopulationIndex::from_json("[{"), Err(PopulationError::Document(_))));
        assert!(matches!(PopulationIndex::from_json("[]"), Err(PopulationError::Content(_))));
        assert!(matches!(PopulationIndex::from_json(r#"[{ "Madrid": "28079" }]"#), Err(PopulationError::Content(_))));
        assert!(matches!(PopulationIndex::from_json(r#"[{ "28079": 1 }]"#), Err(PopulationError::Content(_))));
        assert!(matches!(
            PopulationIndex::from_json(r#"[{ "28079": "Madrid" }, { "28079": "Madrid" }]"#),
            Err(PopulationError::Content(_))
        ));
    }

    #[test]
    fn test_missing_dataset_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PopulationIndex::load(dir.path().join("poblaciones.json"));

        assert!(matches!(result, Err(PopulationError::File(_))));
    }
}
