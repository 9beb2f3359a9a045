//! Corpus loading: walk a directory of extracted-text sources and attach
//! document-index metadata.

use std::path::{Path, PathBuf};

use anyhow::Context;
use nourai_rag::Document;
use tracing::{info, warn};

use crate::index::DocumentIndex;

const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Recursively load every `.txt`/`.md` file under `dir` as a [`Document`],
/// resolving attribution metadata through the document index.
///
/// Unreadable files are logged and skipped rather than aborting the batch.
pub fn load_corpus(dir: &Path, index: &DocumentIndex) -> anyhow::Result<Vec<Document>> {
    let mut paths = Vec::new();
    collect_text_files(dir, &mut paths)
        .with_context(|| format!("walking corpus directory {}", dir.display()))?;
    paths.sort();

    info!(count = paths.len(), dir = %dir.display(), "found corpus files");

    let mut documents = Vec::new();
    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };

        let filename =
            path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let source = index.source_for(&path.to_string_lossy(), &filename);
        documents.push(Document { content, source });
    }

    info!(count = documents.len(), "loaded corpus documents");
    Ok(documents)
}

fn collect_text_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_text_files(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TEXT_EXTENSIONS.contains(&e))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_nested_text_files_and_skips_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("fao");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("guia.txt"), "Texto de la guía.").unwrap();
        std::fs::write(dir.path().join("notas.md"), "Notas.").unwrap();
        std::fs::write(dir.path().join("imagen.png"), [0u8; 4]).unwrap();

        let documents = load_corpus(dir.path(), &DocumentIndex::default()).unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().any(|d| d.source.filename == "guia.txt"));
        assert!(documents.iter().all(|d| d.source.title.is_none()));
    }
}
