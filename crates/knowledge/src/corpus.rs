//! The fixed knowledge base of advisory statements.
//!
//! The statement set is supplied at construction time as configuration
//! data; the knowledge base is append-never and edit-never at runtime.

use crate::types::Document;
use krishi_core::{AppError, AppResult};
use std::path::Path;

/// An ordered, immutable sequence of advisory statements.
///
/// Documents are identified by their 0-based position. Built exactly once
/// per process lifetime; safe for concurrent reads.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    documents: Vec<Document>,
}

/// The builtin advisory statements, used when no knowledge file is
/// configured.
const BUILTIN_STATEMENTS: &[&str] = &[
    "Rice requires consistent water supply and grows best in warm, humid conditions.",
    "Wheat is a cool-season crop that needs well-drained soil and moderate rainfall.",
    "Cotton needs hot, dry weather and well-drained soil for optimal growth.",
    "Tomatoes require full sun, warm temperatures, and regular watering.",
    "Pests like aphids can be controlled with neem oil or insecticidal soap.",
    "Fertilizers should be applied based on soil test results to avoid over-fertilization.",
    "Crop rotation helps maintain soil fertility and reduces pest problems.",
    "Drip irrigation is more efficient than flood irrigation for water conservation.",
    "Organic farming uses natural methods to improve soil health and reduce chemical use.",
    "Weather forecasting helps farmers plan planting and harvesting activities.",
    "Soil pH affects nutrient availability; most crops prefer slightly acidic to neutral soil.",
    "Companion planting can help control pests naturally, like planting marigolds with tomatoes.",
    "Mulching helps retain soil moisture and suppress weed growth.",
    "Integrated Pest Management combines biological, cultural, and chemical methods.",
    "Sustainable agriculture focuses on long-term soil health and environmental protection.",
];

impl KnowledgeBase {
    /// The builtin agricultural knowledge base.
    pub fn builtin() -> Self {
        Self::from_statements(BUILTIN_STATEMENTS.iter().copied())
    }

    /// Build a knowledge base from a sequence of statements.
    pub fn from_statements<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: statements.into_iter().map(Document::new).collect(),
        }
    }

    /// Load statements from a YAML file holding a list of strings.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read knowledge file {:?}: {}", path, e))
        })?;

        let statements: Vec<String> = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse knowledge file {:?}: {}", path, e))
        })?;

        tracing::debug!("Loaded {} statements from {:?}", statements.len(), path);

        Ok(Self::from_statements(statements))
    }

    /// All documents, in position order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Document at the given position, if in range.
    pub fn get(&self, position: usize) -> Option<&Document> {
        self.documents.get(position)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_statements_preserves_order() {
        let base = KnowledgeBase::from_statements(["first", "second", "third"]);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get(0).unwrap().text, "first");
        assert_eq!(base.get(2).unwrap().text, "third");
        assert!(base.get(3).is_none());
    }

    #[test]
    fn test_load_yaml_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "- Rice needs water.").unwrap();
        writeln!(file, "- Wheat needs drained soil.").unwrap();

        let base = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(base.len(), 2);
        assert_eq!(base.get(0).unwrap().text, "Rice needs water.");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = KnowledgeBase::load(Path::new("/nonexistent/knowledge.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_statements() {
        let base = KnowledgeBase::builtin();
        assert_eq!(base.len(), 15);
        assert!(base.get(0).unwrap().text.starts_with("Rice requires"));
        assert!(base.get(14).unwrap().text.starts_with("Sustainable agriculture"));
    }

    #[test]
    fn test_empty_base() {
        let base = KnowledgeBase::default();
        assert!(base.is_empty());
        assert_eq!(base.len(), 0);
    }
}
