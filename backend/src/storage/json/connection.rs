use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Connection to a directory of JSON log documents.
///
/// Owns the base data directory and computes document and version-set
/// paths. Repositories share one connection behind an `Arc`.
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a connection rooted at `base_directory`, creating the
    /// directory if it does not exist yet.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory)?;
            info!("Created data directory: {:?}", base_directory);
        }
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a document's JSON payload
    pub fn document_path(&self, document_id: &str) -> PathBuf {
        self.base_directory
            .join(format!("{}.babylog.json", document_id))
    }

    /// Sidecar directory holding a document's competing versions
    pub fn versions_directory(&self, document_id: &str) -> PathBuf {
        self.base_directory
            .join(format!("{}.babylog.versions", document_id))
    }

    /// Generate a safe filesystem identifier from a display name
    /// Converts "Emma Smith" -> "emma_smith", "José María" -> "jose_maria", etc.
    pub fn generate_safe_document_name(name: &str) -> String {
        let result = name
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    '_'
                } else {
                    // Replace accented characters and special chars first
                    match c {
                        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
                        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
                        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
                        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
                        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
                        'ñ' | 'Ñ' => 'n',
                        'ç' | 'Ç' => 'c',
                        c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
                        '#' => '_',
                        '-' => '_',
                        _ => '_',
                    }
                }
            })
            .collect::<String>();

        // Collapse consecutive underscores into single underscores
        let mut collapsed = String::new();
        let mut last_was_underscore = false;

        for c in result.chars() {
            if c == '_' {
                if !last_was_underscore {
                    collapsed.push('_');
                }
                last_was_underscore = true;
            } else {
                collapsed.push(c);
                last_was_underscore = false;
            }
        }

        collapsed.trim_matches('_').to_string()
    }
}
