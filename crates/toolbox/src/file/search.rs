use super::{Workspace, require};
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobSearchInput {
    pub pattern: String,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResult {
    pattern: String,
    matches: Vec<String>,
    count: usize,
}

/// Finds files by glob pattern.
pub struct GlobSearch {
    workspace: Workspace,
}

impl GlobSearch {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for GlobSearch {
    type Input = GlobSearchInput;

    fn name(&self) -> &str {
        "glob_search"
    }

    fn description(&self) -> &str {
        "Find files matching a glob pattern.\n\n\
         - {\"pattern\": \"*.rs\"} finds .rs files in the working directory\n\
         - {\"pattern\": \"**/*.toml\"} searches recursively\n\
         - {\"pattern\": \"test_*.txt\", \"path\": \"tests\"} searches inside tests/\n\n\
         Supports *, ?, [abc] and **. Use forward slashes on all platforms."
    }

    fn shape(&self) -> InputShape {
        InputShape::new()
            .field(FieldSpec::required(
                "pattern",
                FieldKind::String,
                "Glob pattern to search for. Examples: '*.rs', 'test_*.txt', 'src/**/*.rs'",
            ))
            .field(FieldSpec::optional(
                "path",
                FieldKind::String,
                "Base directory to search in (defaults to the working directory)",
            ))
    }

    fn validate(&self, input: &GlobSearchInput) -> Result<(), String> {
        require(&input.pattern, "pattern")
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: GlobSearchInput,
    ) -> Result<String, ToolError> {
        let (base, shown) = match input.path.as_deref() {
            Some(path) if !path.is_empty() => (
                self.workspace.resolve(path),
                format!("{}/{}", path.trim_end_matches('/'), input.pattern),
            ),
            _ => (self.workspace.root().to_path_buf(), input.pattern.clone()),
        };
        let root = self.workspace.root().to_path_buf();
        let pattern = input.pattern;

        let matches = tokio::task::spawn_blocking(move || search(&base, &pattern, &root))
            .await
            .map_err(|e| ToolError::failed(format!("glob search aborted: {e}")))??;

        if matches.is_empty() {
            return Ok(format!("No files found matching pattern '{shown}'"));
        }
        let result = SearchResult {
            pattern: shown,
            count: matches.len(),
            matches,
        };
        serde_json::to_string_pretty(&result).map_err(|e| ToolError::failed(e.to_string()))
    }
}

/// Matches of `pattern` under `base`, shown relative to `root` when inside it.
fn search(base: &Path, pattern: &str, root: &Path) -> Result<Vec<String>, ToolError> {
    let base = base
        .to_str()
        .ok_or_else(|| ToolError::failed(format!("path {} is not valid UTF-8", base.display())))?;
    let full = format!("{}/{}", glob::Pattern::escape(base.trim_end_matches('/')), pattern);

    let paths = glob::glob(&full)
        .map_err(|e| ToolError::failed(format!("invalid glob pattern '{pattern}': {e}")))?;

    let mut matches: Vec<String> = paths
        .filter_map(Result::ok)
        .map(|path: PathBuf| {
            path.strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::testing::ScriptedOperator;
    use tempfile::TempDir;

    async fn glob(dir: &TempDir, pattern: &str, path: Option<&str>) -> Result<String, ToolError> {
        let tool = GlobSearch::new(Workspace::new(dir.path()));
        let operator = ScriptedOperator::default();
        tool.execute(
            &operator.context("glob_search"),
            GlobSearchInput {
                pattern: pattern.into(),
                path: path.map(String::from),
            },
        )
        .await
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("tests")).unwrap();
        std::fs::write(dir.path().join("a.rs"), "").unwrap();
        std::fs::write(dir.path().join("b.rs"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        std::fs::write(dir.path().join("tests/test_one.txt"), "").unwrap();
        dir
    }

    #[tokio::test]
    async fn matches_are_reported_as_json() {
        let dir = fixture();
        let out = glob(&dir, "*.rs", None).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"pattern": "*.rs", "matches": ["a.rs", "b.rs"], "count": 2})
        );
    }

    #[tokio::test]
    async fn base_path_scopes_the_search() {
        let dir = fixture();
        let out = glob(&dir, "test_*.txt", Some("tests")).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["pattern"], "tests/test_*.txt");
        assert_eq!(value["matches"], serde_json::json!(["tests/test_one.txt"]));
    }

    #[tokio::test]
    async fn no_matches_is_plain_text() {
        let dir = fixture();
        assert_eq!(
            glob(&dir, "*.py", None).await.unwrap(),
            "No files found matching pattern '*.py'"
        );
    }

    #[tokio::test]
    async fn bad_pattern_is_an_error() {
        let dir = fixture();
        let err = glob(&dir, "[", None).await.unwrap_err();
        assert!(err.to_string().starts_with("invalid glob pattern '['"));
    }
}
