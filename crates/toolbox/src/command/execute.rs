use super::config::{CommandSpec, CommandsConfig};
use crate::file::require;
use async_trait::async_trait;
use runtime::{ExecutionContext, FieldKind, FieldSpec, InputShape, Tool, ToolError};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

const LIST: &str = "list";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecuteCommandInput {
    pub name: String,
}

/// Runs commands declared in the project's command file.
pub struct ExecuteCommand {
    workdir: PathBuf,
    config_path: PathBuf,
}

impl ExecuteCommand {
    pub fn new(workdir: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            config_path: config_path.into(),
        }
    }

    fn list(&self, config: &CommandsConfig) -> String {
        if config.commands.is_empty() {
            return format!(
                "No commands available. Create {} with command definitions.",
                self.config_path.display()
            );
        }

        let mut out = String::from("Available commands:\n");
        for (name, spec) in &config.commands {
            out.push_str(&format!("- {name}: {}\n", spec.description));
        }
        out
    }

    async fn run(&self, name: &str, spec: &CommandSpec) -> Result<String, ToolError> {
        let (program, args) = spec
            .argv()
            .ok_or_else(|| ToolError::failed(format!("empty command for {name:?}")))?;

        tracing::debug!(name, command = %spec.command, timeout = ?spec.timeout(), "running command");
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        let child = cmd.spawn()?;

        let output = wait_with_timeout(child, &spec.command, spec.timeout()).await?;
        if output.is_empty() {
            return Ok(format!("Command {name} completed successfully with no output"));
        }
        Ok(output)
    }
}

#[async_trait]
impl Tool for ExecuteCommand {
    type Input = ExecuteCommandInput;

    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a predefined project command (lint, test, build).\n\n\
         - {\"name\": \"list\"} shows the available commands\n\
         - {\"name\": \"test\"} runs the command named test\n\n\
         Only commands defined in .agent-commands.toml can be run, each with a timeout. \
         Use this after making code changes to validate them."
    }

    fn shape(&self) -> InputShape {
        InputShape::new().field(FieldSpec::required(
            "name",
            FieldKind::String,
            "Name of the configured command to execute, or 'list' to show available commands",
        ))
    }

    fn validate(&self, input: &ExecuteCommandInput) -> Result<(), String> {
        require(&input.name, "name")
    }

    async fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        input: ExecuteCommandInput,
    ) -> Result<String, ToolError> {
        // Re-read on every call so edits to the file apply without a restart.
        let config = CommandsConfig::load(&self.config_path)
            .await
            .map_err(|e| ToolError::failed(format!("failed to load command configuration: {e}")))?;

        if input.name == LIST {
            return Ok(self.list(&config));
        }

        let Some(spec) = config.commands.get(&input.name) else {
            return Err(ToolError::failed(format!(
                "unknown command {:?}. Available commands: {}",
                input.name,
                config.names().join(", ")
            )));
        };
        self.run(&input.name, spec).await
    }
}

/// Wait for `child`, killing and reaping it if it outlives `timeout`.
///
/// Returns stdout followed by stderr. A non-zero exit is
/// [`ToolError::CommandFailed`] carrying that output. On timeout the child's
/// process group is killed and the output captured so far is kept in
/// [`ToolError::Timeout`].
pub(crate) async fn wait_with_timeout(
    mut child: Child,
    command: &str,
    timeout: Duration,
) -> Result<String, ToolError> {
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    let waited = tokio::time::timeout(timeout, async {
        let (_, _, status) = tokio::join!(
            drain(stdout_pipe.as_mut(), &mut stdout),
            drain(stderr_pipe.as_mut(), &mut stderr),
            child.wait(),
        );
        status
    })
    .await;

    let mut output = String::from_utf8_lossy(&stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&stderr));

    let status = match waited {
        Ok(status) => status?,
        Err(_) => {
            kill_group(&child);
            child.kill().await?;
            tracing::warn!(command, ?timeout, "command timed out and was killed");
            return Err(ToolError::Timeout {
                command: command.to_string(),
                after: timeout,
                output,
            });
        }
    };

    if status.success() {
        Ok(output)
    } else {
        Err(ToolError::CommandFailed {
            command: command.to_string(),
            status: status.to_string(),
            output,
        })
    }
}

/// Read `pipe` to the end, appending each chunk to `buf` as it arrives so a
/// cancelled read keeps what was already received.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<&mut R>, buf: &mut Vec<u8>) {
    let Some(pipe) = pipe else { return };
    let mut chunk = [0u8; 4096];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading command output");
                break;
            }
        }
    }
}

/// Kill every process in the child's group, so grandchildren holding the
/// output pipes go down with it.
#[cfg(unix)]
fn kill_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else { return };
    let Ok(pid) = i32::try_from(pid) else { return };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::debug!(error = %e, pid, "failed to kill process group");
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}
