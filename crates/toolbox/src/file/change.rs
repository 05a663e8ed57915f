//! Content changes shared by the create and edit tools.

use runtime::ToolError;
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Bytes inspected when deciding whether a file is binary.
const BINARY_PROBE_LEN: usize = 512;

/// A change to a single file.
///
/// Creation and in-place replacement are distinct variants; a replacement
/// never creates a file and a creation never touches an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// Create a new file with this content. Fails if the file exists.
    Create { content: String },
    /// Replace the single occurrence of `old` with `new` in an existing text file.
    Replace { old: String, new: String },
}

impl FileChange {
    /// Apply the change to `path`. `display` is the path as the caller named it.
    pub async fn apply(&self, path: &Path, display: &str) -> Result<String, ToolError> {
        match self {
            Self::Create { content } => create(path, display, content).await,
            Self::Replace { old, new } => replace(path, display, old, new).await,
        }
    }
}

async fn create(path: &Path, display: &str, content: &str) -> Result<String, ToolError> {
    super::ensure_parent(path).await?;

    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(ToolError::failed(format!(
                "file {display} already exists. Use write_file to overwrite existing files"
            )));
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;

    if content.is_empty() {
        Ok(format!("Successfully created empty file {display}"))
    } else {
        Ok(format!("Successfully created file {display}"))
    }
}

async fn replace(path: &Path, display: &str, old: &str, new: &str) -> Result<String, ToolError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ToolError::failed(format!(
                "file {display} does not exist. Use create_file or write_file for new files"
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if is_binary(&bytes) {
        return Err(ToolError::failed(format!(
            "cannot edit binary file {display}. Use write_file to replace binary files entirely"
        )));
    }
    let text = String::from_utf8(bytes)
        .map_err(|_| ToolError::failed(format!("cannot edit {display}: not valid UTF-8")))?;

    match text.matches(old).count() {
        1 => {}
        0 => return Err(ToolError::failed(format!("old_str '{old}' not found in file"))),
        n => {
            return Err(ToolError::failed(format!(
                "old_str '{old}' found {n} times in file, must exist exactly once"
            )));
        }
    }

    tokio::fs::write(path, text.replacen(old, new, 1)).await?;
    Ok(format!("Successfully edited file {display}"))
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_PROBE_LEN).any(|&b| b == 0)
}
