use super::Workspace;
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListFilesInput {
    #[serde(default)]
    pub path: Option<String>,
}

/// Recursive directory listing.
pub struct ListFiles {
    workspace: Workspace,
}

impl ListFiles {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListFiles {
    type Input = ListFilesInput;

    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories recursively at a given path. If no path is provided, \
         lists the working directory. Returns a JSON array of relative paths; directories \
         end with '/'."
    }

    fn shape(&self) -> InputShape {
        InputShape::new().field(FieldSpec::optional(
            "path",
            FieldKind::String,
            "Optional relative path to list. Defaults to the working directory.",
        ))
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: ListFilesInput,
    ) -> Result<String, ToolError> {
        let dir = match input.path.as_deref() {
            Some(path) if !path.is_empty() => self.workspace.resolve(path),
            _ => self.workspace.root().to_path_buf(),
        };

        let entries = walk(&dir).await?;
        serde_json::to_string(&entries).map_err(|e| ToolError::failed(e.to_string()))
    }
}

/// Every entry below `dir`, relative to it, in lexical order.
///
/// Symlinks are listed but not followed.
async fn walk(dir: &Path) -> Result<Vec<String>, ToolError> {
    let mut entries = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut reader = tokio::fs::read_dir(&current).await?;
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            let relative = relative_display(dir, &path);
            if entry.file_type().await?.is_dir() {
                entries.push(format!("{relative}/"));
                pending.push(path);
            } else {
                entries.push(relative);
            }
        }
    }

    entries.sort();
    Ok(entries)
}

fn relative_display(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
