//! Filesystem tools.

mod change;
mod create;
mod delete;
mod edit;
mod list;
mod read;
mod search;
mod write;

pub use change::FileChange;
pub use create::CreateFile;
pub use delete::DeleteFile;
pub use edit::EditFile;
pub use list::ListFiles;
pub use read::ReadFile;
pub use search::GlobSearch;
pub use write::WriteFile;

use runtime::{Registry, RegistryError};
use std::path::{Path, PathBuf};

/// The directory relative tool paths resolve against.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths are used as given.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Register the file tool family.
pub fn register(registry: &Registry, root: &Path) -> Result<(), RegistryError> {
    let workspace = Workspace::new(root);
    registry.register_tool(ListFiles::new(workspace.clone()))?;
    registry.register_tool(ReadFile::new(workspace.clone()))?;
    registry.register_tool(WriteFile::new(workspace.clone()))?;
    registry.register_tool(CreateFile::new(workspace.clone()))?;
    registry.register_tool(EditFile::new(workspace.clone()))?;
    registry.register_tool(DeleteFile::new(workspace.clone()))?;
    registry.register_tool(GlobSearch::new(workspace))?;
    Ok(())
}

pub(crate) fn require(value: &str, name: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("parameter {name:?} is required"));
    }
    Ok(())
}

/// Create the parent directories of `path`.
pub(crate) async fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use runtime::{ExecutionContext, Operator};
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers confirmation prompts from a script and records the prompts.
    #[derive(Default)]
    pub struct ScriptedOperator {
        pub answers: Mutex<VecDeque<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedOperator {
        pub fn answering(answers: &[&str]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
                prompts: Mutex::default(),
            }
        }

        pub fn context<'a>(&'a self, tool: &'a str) -> ExecutionContext<'a> {
            ExecutionContext::new(tool, self)
        }
    }

    #[async_trait]
    impl Operator for ScriptedOperator {
        async fn read_line(&self) -> Option<String> {
            self.answers.lock().unwrap().pop_front()
        }
        fn prompt(&self, text: &str) {
            self.prompts.lock().unwrap().push(text.to_string());
        }
        fn show_assistant(&self, _text: &str) {}
        fn show_tool_call(&self, _name: &str, _input: &Value) {}
        fn show_error(&self, _text: &str) {}
    }
}
