use super::{Workspace, require};
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;
use std::io::ErrorKind;

pub const CANCELLED: &str = "File deletion cancelled by user";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteFileInput {
    pub path: String,
}

/// Deletes a single file after the operator confirms.
pub struct DeleteFile {
    workspace: Workspace,
}

impl DeleteFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for DeleteFile {
    type Input = DeleteFileInput;

    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file from the filesystem.\n\n\
         - The file must exist\n\
         - Only deletes files, not directories\n\
         - The user is asked to confirm before anything is removed; this cannot be undone"
    }

    fn shape(&self) -> InputShape {
        InputShape::new().field(FieldSpec::required(
            "path",
            FieldKind::String,
            "File path to delete. Must be an existing file.",
        ))
    }

    fn validate(&self, input: &DeleteFileInput) -> Result<(), String> {
        require(&input.path, "path")
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        input: DeleteFileInput,
    ) -> Result<String, ToolError> {
        let path = self.workspace.resolve(&input.path);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ToolError::failed(format!("file not found: {}", input.path)));
            }
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            return Err(ToolError::failed(format!(
                "{} is a directory, not a file. Use directory tools for directory operations",
                input.path
            )));
        }

        let prompt = format!(
            "Billdozer wants to delete the file: {}\n\
             Do you want to proceed? (yes/y to confirm, anything else to cancel): ",
            input.path
        );
        if !is_yes(ctx.confirm(&prompt).await.as_deref()) {
            tracing::info!(path = %input.path, "deletion declined");
            return Ok(CANCELLED.to_string());
        }

        tokio::fs::remove_file(&path).await?;
        Ok(format!("Successfully deleted file {}", input.path))
    }
}

/// No input counts as a refusal.
fn is_yes(answer: Option<&str>) -> bool {
    answer
        .map(|a| a.trim().to_ascii_lowercase())
        .is_some_and(|a| a == "yes" || a == "y")
}
