use super::{Workspace, require};
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadFileInput {
    pub path: String,
    /// 1-based first line.
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Reads a whole file or a window of its lines.
pub struct ReadFile {
    workspace: Workspace,
}

impl ReadFile {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ReadFile {
    type Input = ReadFileInput;

    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file, optionally a range of lines.\n\n\
         - {\"path\": \"src/main.rs\"} reads the entire file\n\
         - {\"path\": \"config.toml\", \"offset\": 10} reads from line 10 to the end\n\
         - {\"path\": \"data.txt\", \"offset\": 5, \"limit\": 20} reads lines 5-24\n\n\
         Line numbers are 1-based. Do not use this with directory names."
    }

    fn shape(&self) -> InputShape {
        InputShape::new()
            .field(FieldSpec::required(
                "path",
                FieldKind::String,
                "The relative path of a file in the working directory.",
            ))
            .field(FieldSpec::optional(
                "offset",
                FieldKind::Integer,
                "Starting line number (1-based). If provided, only reads from this line onwards.",
            ))
            .field(FieldSpec::optional(
                "limit",
                FieldKind::Integer,
                "Maximum number of lines to read.",
            ))
    }

    fn validate(&self, input: &ReadFileInput) -> Result<(), String> {
        require(&input.path, "path")?;
        if input.offset.is_some_and(|offset| offset < 1) {
            return Err("offset must be >= 1 (line numbers are 1-based)".into());
        }
        if input.limit.is_some_and(|limit| limit < 1) {
            return Err("limit must be >= 1".into());
        }
        Ok(())
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: ReadFileInput,
    ) -> Result<String, ToolError> {
        let bytes = tokio::fs::read(self.workspace.resolve(&input.path)).await?;
        // Invalid UTF-8 is replaced rather than refused.
        let content = String::from_utf8_lossy(&bytes);
        if input.offset.is_none() && input.limit.is_none() {
            return Ok(content.into_owned());
        }
        select_lines(&content, input.offset, input.limit)
    }
}

fn select_lines(content: &str, offset: Option<i64>, limit: Option<i64>) -> Result<String, ToolError> {
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len();

    let start = match offset {
        Some(offset) => {
            let start = usize::try_from(offset - 1).unwrap_or(0);
            if start >= total {
                return Err(ToolError::failed(format!(
                    "offset {offset} exceeds file length ({total} lines)"
                )));
            }
            start
        }
        None => 0,
    };
    let end = match limit {
        Some(limit) => start.saturating_add(usize::try_from(limit).unwrap_or(0)).min(total),
        None => total,
    };

    Ok(lines[start..end].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::testing::ScriptedOperator;
    use tempfile::TempDir;

    const TEXT: &str = "one\ntwo\nthree\nfour\nfive\n";

    fn input(offset: Option<i64>, limit: Option<i64>) -> ReadFileInput {
        ReadFileInput {
            path: "notes.txt".into(),
            offset,
            limit,
        }
    }

    async fn read(offset: Option<i64>, limit: Option<i64>) -> Result<String, ToolError> {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), TEXT).unwrap();
        let tool = ReadFile::new(Workspace::new(dir.path()));
        let operator = ScriptedOperator::default();
        tool.execute(&operator.context("read_file"), input(offset, limit)).await
    }

    #[tokio::test]
    async fn whole_file_is_returned_verbatim() {
        assert_eq!(read(None, None).await.unwrap(), TEXT);
    }

    #[tokio::test]
    async fn window_is_one_based() {
        assert_eq!(read(Some(2), Some(2)).await.unwrap(), "two\nthree");
        assert_eq!(read(Some(4), None).await.unwrap(), "four\nfive");
        assert_eq!(read(None, Some(1)).await.unwrap(), "one");
        assert_eq!(read(Some(5), Some(100)).await.unwrap(), "five");
    }

    #[tokio::test]
    async fn offset_past_end_is_an_error() {
        let err = read(Some(6), None).await.unwrap_err();
        assert_eq!(err.to_string(), "offset 6 exceeds file length (5 lines)");
    }

    #[tokio::test]
    async fn invalid_utf8_is_read_lossily() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("latin1.txt"), b"caf\xe9\nsecond\n").unwrap();
        let tool = ReadFile::new(Workspace::new(dir.path()));
        let operator = ScriptedOperator::default();

        let whole = ReadFileInput {
            path: "latin1.txt".into(),
            offset: None,
            limit: None,
        };
        let out = tool.execute(&operator.context("read_file"), whole).await.unwrap();
        assert_eq!(out, "caf\u{FFFD}\nsecond\n");

        let tail = ReadFileInput {
            path: "latin1.txt".into(),
            offset: Some(2),
            limit: None,
        };
        let out = tool.execute(&operator.context("read_file"), tail).await.unwrap();
        assert_eq!(out, "second");
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let tool = ReadFile::new(Workspace::new("."));
        assert!(tool.validate(&input(Some(0), None)).unwrap_err().contains("1-based"));
        assert_eq!(tool.validate(&input(None, Some(0))).unwrap_err(), "limit must be >= 1");
        let empty = ReadFileInput {
            path: String::new(),
            offset: None,
            limit: None,
        };
        assert!(tool.validate(&empty).is_err());
        assert!(tool.validate(&input(Some(1), Some(1))).is_ok());
    }
}
