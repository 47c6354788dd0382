use super::extension_of;
use crate::error::{InputRole, ProofError, Result};
use lopdf::Document as PdfDocument;
use std::path::Path;
use text_proof_common::Document;

/// 本文ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryFormat {
    Text,
    Pdf,
}

impl PrimaryFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match extension_of(path).as_deref() {
            Some("txt") => Ok(PrimaryFormat::Text),
            Some("pdf") => Ok(PrimaryFormat::Pdf),
            _ => Err(ProofError::UnsupportedFormat {
                path: path.to_path_buf(),
                role: InputRole::Primary,
            }),
        }
    }
}

/// 本文ファイルからトークン列を抽出
pub fn extract_primary(path: &Path) -> Result<Document> {
    let format = PrimaryFormat::from_path(path)?;

    let document = match format {
        PrimaryFormat::Text => read_text(path)?,
        PrimaryFormat::Pdf => read_pdf(path)?,
    };

    tracing::debug!(
        path = %path.display(),
        ?format,
        lines = document.lines.len(),
        tokens = document.token_count(),
        "primary document extracted"
    );
    Ok(document)
}

fn read_text(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| ProofError::read(path, e))?;
    // BOM付きUTF-8
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok(Document::from_text(content))
}

/// ページ単位で抽出する。抽出に失敗したページは空ページとして扱う。
fn read_pdf(path: &Path) -> Result<Document> {
    let pdf = PdfDocument::load(path).map_err(|e| ProofError::read(path, e))?;

    let pages: Vec<String> = pdf
        .get_pages()
        .keys()
        .map(|&number| match pdf.extract_text(&[number]) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), page = number, %err, "page text extraction failed, treated as empty");
                String::new()
            }
        })
        .collect();

    Ok(Document::from_pages(&pages))
}
