//! Knowledge base of documented internal processes.
//!
//! The corpus is read from a JSON document of the form
//! `{"processos": [{"id", "titulo", "categoria", "tags", "pergunta", "resposta"}]}`
//! and validated once per load. After construction a [`Corpus`] is immutable
//! and shared by reference with the matcher.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// One documented internal procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "pergunta")]
    pub question: String,
    #[serde(rename = "resposta")]
    pub answer: String,
}

#[derive(Deserialize)]
struct ProcessDocument {
    #[serde(default)]
    processos: Vec<ProcessRecord>,
}

#[derive(thiserror::Error, Debug)]
pub enum CorpusError {
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate process id: {0}")]
    DuplicateId(String),
}

/// Ordered, read-only collection of [`ProcessRecord`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    records: Vec<ProcessRecord>,
}

impl Corpus {
    /// Build a corpus, rejecting duplicate ids.
    pub fn new(records: Vec<ProcessRecord>) -> Result<Self, CorpusError> {
        {
            let mut seen = HashSet::with_capacity(records.len());
            for r in &records {
                if !seen.insert(r.id.as_str()) {
                    return Err(CorpusError::DuplicateId(r.id.clone()));
                }
            }
        }
        Ok(Self { records })
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let doc: ProcessDocument = serde_json::from_str(json)?;
        Self::new(doc.processos)
    }

    pub async fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CorpusError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&content)
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Titles in corpus order, used to list the available topics.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title.as_str())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a ProcessRecord;
    type IntoIter = std::slice::Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// File-backed source of the corpus.
///
/// With `reload` set, every call re-reads the file so edits are picked up
/// without a restart; otherwise the first successful load is kept.
pub struct KnowledgeBase {
    path: PathBuf,
    reload: bool,
    cached: RwLock<Option<Arc<Corpus>>>,
}

impl KnowledgeBase {
    pub fn new(path: impl Into<PathBuf>, reload: bool) -> Self {
        Self {
            path: path.into(),
            reload,
            cached: RwLock::new(None),
        }
    }

    /// Serve a fixed in-memory corpus, never touching the filesystem.
    pub fn from_corpus(corpus: Corpus) -> Self {
        Self {
            path: PathBuf::new(),
            reload: false,
            cached: RwLock::new(Some(Arc::new(corpus))),
        }
    }

    pub async fn corpus(&self) -> Result<Arc<Corpus>, CorpusError> {
        if !self.reload {
            if let Some(c) = self.cached.read().await.as_ref() {
                return Ok(Arc::clone(c));
            }
        }

        let corpus = match Corpus::from_path(&self.path).await {
            Ok(c) => Arc::new(c),
            Err(e) => {
                error!(path = %self.path.display(), "failed to load knowledge base: {e}");
                return Err(e);
            }
        };
        debug!(path = %self.path.display(), records = corpus.len(), "knowledge base loaded");

        if !self.reload {
            let mut slot = self.cached.write().await;
            if let Some(existing) = slot.as_ref() {
                return Ok(Arc::clone(existing));
            }
            info!(records = corpus.len(), "knowledge base cached");
            *slot = Some(Arc::clone(&corpus));
        }
        Ok(corpus)
    }
}

#[cfg(test)]
pub(crate) fn record(id: &str, title: &str, tags: &[&str], question: &str) -> ProcessRecord {
    ProcessRecord {
        id: id.into(),
        title: title.into(),
        category: "Geral".into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        question: question.into(),
        answer: format!("answer {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "processos": [
            {
                "id": "1",
                "titulo": "Férias",
                "categoria": "RH",
                "tags": ["ferias", "rh"],
                "pergunta": "Como solicitar férias?",
                "resposta": "Peça ao seu gestor."
            },
            {
                "id": "2",
                "titulo": "VPN",
                "categoria": "TI",
                "tags": ["vpn", "remoto"],
                "pergunta": "Como configurar acesso VPN?",
                "resposta": "Instale o cliente."
            }
        ]
    }"#;

    #[test]
    fn parses_wire_names() {
        let corpus = Corpus::from_json(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 2);
        let first = &corpus.records()[0];
        assert_eq!(first.title, "Férias");
        assert_eq!(first.category, "RH");
        assert_eq!(first.tags, vec!["ferias", "rh"]);
        assert_eq!(first.answer, "Peça ao seu gestor.");
        assert_eq!(corpus.titles().collect::<Vec<_>>(), vec!["Férias", "VPN"]);
    }

    #[test]
    fn missing_collection_is_empty() {
        let corpus = Corpus::from_json("{}").unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Corpus::new(vec![record("a", "x", &[], "q"), record("a", "y", &[], "q")])
            .unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Corpus::from_json("{\"processos\": [{\"id\": 1}]}"),
            Err(CorpusError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn in_memory_knowledge_base() {
        let kb = KnowledgeBase::from_corpus(Corpus::from_json(SAMPLE).unwrap());
        let a = kb.corpus().await.unwrap();
        let b = kb.corpus().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let kb = KnowledgeBase::new("/definitely/not/here/processos.json", true);
        assert!(matches!(kb.corpus().await, Err(CorpusError::Io { .. })));
    }
}
