use super::{FileChange, Workspace, require};
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFileInput {
    pub path: String,
    #[serde(default)]
    pub content: String,
}

/// Creates a new file; never overwrites.
pub struct CreateFile {
    workspace: Workspace,
}

impl CreateFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for CreateFile {
    type Input = CreateFileInput;

    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Create a new file, empty unless content is given.\n\n\
         - Fails if the file already exists\n\
         - Creates directories in the path if they don't exist\n\
         - Use write_file to overwrite an existing file"
    }

    fn shape(&self) -> InputShape {
        InputShape::new()
            .field(FieldSpec::required(
                "path",
                FieldKind::String,
                "File path for the new file (directories will be created as needed)",
            ))
            .field(
                FieldSpec::optional("content", FieldKind::String, "Initial content")
                    .with_default(serde_json::json!("")),
            )
    }

    fn validate(&self, input: &CreateFileInput) -> Result<(), String> {
        require(&input.path, "path")
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: CreateFileInput,
    ) -> Result<String, ToolError> {
        let path = self.workspace.resolve(&input.path);
        FileChange::Create {
            content: input.content,
        }
        .apply(&path, &input.path)
        .await
    }
}
