use super::{Workspace, ensure_parent, require};
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteFileInput {
    pub path: String,
    pub content: String,
}

/// Writes a whole file, creating or overwriting it.
pub struct WriteFile {
    workspace: Workspace,
}

impl WriteFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for WriteFile {
    type Input = WriteFileInput;

    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file, creating it if needed and overwriting it if it exists. \
         Parent directories are created automatically. Empty content creates an empty file."
    }

    fn shape(&self) -> InputShape {
        InputShape::new()
            .field(FieldSpec::required(
                "path",
                FieldKind::String,
                "File path to write to. Examples: 'src/main.rs', 'docs/readme.md'",
            ))
            .field(FieldSpec::required(
                "content",
                FieldKind::String,
                "Content to write. May be an empty string.",
            ))
    }

    fn validate(&self, input: &WriteFileInput) -> Result<(), String> {
        require(&input.path, "path")
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: WriteFileInput,
    ) -> Result<String, ToolError> {
        let path = self.workspace.resolve(&input.path);
        ensure_parent(&path).await?;
        tokio::fs::write(&path, &input.content).await?;

        if input.content.is_empty() {
            Ok(format!("Created empty file {}", input.path))
        } else {
            Ok(format!("Successfully wrote content to file {}", input.path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::testing::ScriptedOperator;
    use tempfile::TempDir;

    #[tokio::test]
    async fn overwrites_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let tool = WriteFile::new(Workspace::new(dir.path()));
        let operator = ScriptedOperator::default();
        let ctx = operator.context("write_file");

        let out = tool
            .execute(
                &ctx,
                WriteFileInput {
                    path: "a/b/c.txt".into(),
                    content: "first".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(out, "Successfully wrote content to file a/b/c.txt");

        tool.execute(
            &ctx,
            WriteFileInput {
                path: "a/b/c.txt".into(),
                content: "second".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a/b/c.txt")).unwrap(),
            "second"
        );
    }

    #[tokio::test]
    async fn empty_content_makes_empty_file() {
        let dir = TempDir::new().unwrap();
        let tool = WriteFile::new(Workspace::new(dir.path()));
        let operator = ScriptedOperator::default();

        let out = tool
            .execute(
                &operator.context("write_file"),
                WriteFileInput {
                    path: "empty.txt".into(),
                    content: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(out, "Created empty file empty.txt");
        assert_eq!(std::fs::metadata(dir.path().join("empty.txt")).unwrap().len(), 0);
    }
}
