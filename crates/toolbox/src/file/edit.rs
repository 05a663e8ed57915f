use super::{FileChange, Workspace};
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditFileInput {
    pub path: String,
    pub old_str: String,
    pub new_str: String,
}

/// Replaces one exact occurrence of a string in an existing text file.
pub struct EditFile {
    workspace: Workspace,
}

impl EditFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for EditFile {
    type Input = EditFileInput;

    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Edit an existing text file by replacing text.\n\n\
         - The file must already exist (use create_file or write_file for new files)\n\
         - Replaces 'old_str' with 'new_str' in the given file\n\
         - 'old_str' must appear exactly once in the file\n\
         - 'old_str' and 'new_str' must be different"
    }

    fn shape(&self) -> InputShape {
        InputShape::new()
            .field(FieldSpec::required(
                "path",
                FieldKind::String,
                "Path to existing file to edit",
            ))
            .field(FieldSpec::required(
                "old_str",
                FieldKind::String,
                "Exact text to find and replace (must appear exactly once)",
            ))
            .field(FieldSpec::required(
                "new_str",
                FieldKind::String,
                "Replacement text (must differ from old_str)",
            ))
    }

    fn validate(&self, input: &EditFileInput) -> Result<(), String> {
        if input.path.is_empty() {
            return Err("path cannot be empty. Provide a file path to edit".into());
        }
        if input.old_str.is_empty() {
            return Err("old_str cannot be empty. Use create_file or write_file for new files".into());
        }
        if input.old_str == input.new_str {
            return Err("old_str and new_str must be different".into());
        }
        Ok(())
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: EditFileInput,
    ) -> Result<String, ToolError> {
        let path = self.workspace.resolve(&input.path);
        FileChange::Replace {
            old: input.old_str,
            new: input.new_str,
        }
        .apply(&path, &input.path)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(path: &str, old: &str, new: &str) -> EditFileInput {
        EditFileInput {
            path: path.into(),
            old_str: old.into(),
            new_str: new.into(),
        }
    }

    #[test]
    fn validation_rules() {
        let tool = EditFile::new(Workspace::new("."));
        assert!(tool.validate(&input("", "a", "b")).unwrap_err().starts_with("path"));
        assert!(tool.validate(&input("f", "", "b")).unwrap_err().starts_with("old_str cannot be empty"));
        assert_eq!(
            tool.validate(&input("f", "same", "same")).unwrap_err(),
            "old_str and new_str must be different"
        );
        assert!(tool.validate(&input("f", "a", "")).is_ok());
    }
}
