//! End-to-end conversations over the real toolbox with a scripted model.

use async_trait::async_trait;
use runtime::{
    Backend, FinishReason, Message, ModelError, ModelRequest, ModelResponse, Operator, Part,
    Registry, Role, Session, State, ToolCall, ToolResult, Usage,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use toolbox::{ToolboxConfig, register_all};

struct ScriptedModel {
    turns: Mutex<VecDeque<Message>>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    fn new(turns: Vec<Message>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            seen: Mutex::default(),
        }
    }
}

impl Backend for &ScriptedModel {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        self.seen.lock().unwrap().push(request.messages.to_vec());
        let message = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModelError::Api("no more scripted turns".into()))?;
        let finish_reason = if message.has_tool_calls() {
            FinishReason::ToolCalls
        } else {
            FinishReason::Stop
        };
        Ok(ModelResponse {
            message,
            finish_reason,
            usage: Usage::default(),
        })
    }
}

#[derive(Default)]
struct Terminal {
    input: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    shown: Mutex<Vec<String>>,
}

impl Terminal {
    fn typing(lines: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            input: Mutex::new(lines.iter().map(|l| l.to_string()).collect()),
            ..Self::default()
        })
    }
}

#[async_trait]
impl Operator for Terminal {
    async fn read_line(&self) -> Option<String> {
        self.input.lock().unwrap().pop_front()
    }
    fn prompt(&self, text: &str) {
        self.prompts.lock().unwrap().push(text.to_string());
    }
    fn show_assistant(&self, text: &str) {
        self.shown.lock().unwrap().push(text.to_string());
    }
    fn show_tool_call(&self, name: &str, _input: &Value) {
        self.shown.lock().unwrap().push(format!("tool: {name}"));
    }
    fn show_error(&self, text: &str) {
        self.shown.lock().unwrap().push(format!("error: {text}"));
    }
}

fn call(id: &str, name: &str, input: Value) -> Message {
    Message::assistant(vec![Part::ToolCall(ToolCall {
        id: id.into(),
        name: name.into(),
        input,
    })])
}

fn say(text: &str) -> Message {
    Message::assistant(vec![Part::Text(text.into())])
}

fn registry_for(dir: &TempDir) -> Arc<Registry> {
    let registry = Registry::new();
    register_all(&registry, &ToolboxConfig::new(dir.path())).unwrap();
    Arc::new(registry)
}

fn results(history: &[Message]) -> Vec<ToolResult> {
    history
        .iter()
        .filter(|m| m.role == Role::Tool)
        .flat_map(|m| m.results().cloned().collect::<Vec<_>>())
        .collect()
}

#[tokio::test]
async fn listing_files_answers_the_user() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();

    let model = ScriptedModel::new(vec![
        call("t1", "list_files", json!({})),
        say("There is a.txt and a docs directory."),
    ]);
    let terminal = Terminal::typing(&["what files are here?"]);
    let mut session = Session::new(&model, registry_for(&dir), terminal.clone());

    session.run().await.unwrap();
    assert_eq!(session.state(), State::Terminated);

    let results = results(session.history());
    assert_eq!(results, vec![ToolResult::success("t1", r#"["a.txt","docs/"]"#)]);
    assert_eq!(
        *terminal.shown.lock().unwrap(),
        vec!["tool: list_files", "There is a.txt and a docs directory."]
    );

    // Every model call after the first ends with the answer to the previous call.
    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].last().unwrap().role, Role::Tool);
}

#[tokio::test]
async fn failed_edit_is_reported_and_retry_succeeds() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.rs");
    std::fs::write(&file, "fn main() {\n    println!(\"hi\");\n}\n").unwrap();

    let model = ScriptedModel::new(vec![
        call(
            "e1",
            "edit_file",
            json!({"path": "main.rs", "old_str": "println!(\"hello\")", "new_str": "println!(\"bye\")"}),
        ),
        call(
            "e2",
            "edit_file",
            json!({"path": "main.rs", "old_str": "println!(\"hi\")", "new_str": "println!(\"bye\")"}),
        ),
        say("Done."),
    ]);
    let terminal = Terminal::typing(&["say bye instead"]);
    let mut session = Session::new(&model, registry_for(&dir), terminal);

    assert_eq!(session.chat("say bye instead").await.unwrap(), "Done.");

    let results = results(session.history());
    assert_eq!(results.len(), 2);
    assert!(results[0].is_error);
    assert_eq!(results[0].content, "old_str 'println!(\"hello\")' not found in file");
    assert_eq!(results[1], ToolResult::success("e2", "Successfully edited file main.rs"));
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "fn main() {\n    println!(\"bye\");\n}\n"
    );
    assert_eq!(session.state(), State::AwaitingUserInput);
}

#[tokio::test]
async fn declined_delete_leaves_file_in_place() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("precious.txt");
    std::fs::write(&file, "keep me").unwrap();

    let model = ScriptedModel::new(vec![
        call("d1", "delete_file", json!({"path": "precious.txt"})),
        say("Okay, I left it alone."),
    ]);
    // The second line answers the confirmation prompt.
    let terminal = Terminal::typing(&["delete precious.txt", "no"]);
    let mut session = Session::new(&model, registry_for(&dir), terminal.clone());

    session.run().await.unwrap();

    assert_eq!(
        results(session.history()),
        vec![ToolResult::success("d1", "File deletion cancelled by user")]
    );
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "keep me");
    assert!(
        terminal
            .prompts
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.contains("wants to delete the file: precious.txt"))
    );
}

#[tokio::test]
async fn one_turn_with_several_calls_gets_one_answer() {
    let dir = TempDir::new().unwrap();

    let model = ScriptedModel::new(vec![
        Message::assistant(vec![
            Part::Text("Writing then reading.".into()),
            Part::ToolCall(ToolCall {
                id: "w".into(),
                name: "write_file".into(),
                input: json!({"path": "out/log.txt", "content": "line1\nline2\n"}),
            }),
            Part::ToolCall(ToolCall {
                id: "r".into(),
                name: "read_file".into(),
                input: json!({"path": "out/log.txt", "offset": 2}),
            }),
            Part::ToolCall(ToolCall {
                id: "x".into(),
                name: "read_file".into(),
                input: json!({"path": "out/log.txt", "unknown": true}),
            }),
        ]),
        say("line2 it is."),
    ]);
    let terminal = Terminal::typing(&[]);
    let mut session = Session::new(&model, registry_for(&dir), terminal);

    session.chat("go").await.unwrap();

    let tool_messages: Vec<_> = session
        .history()
        .iter()
        .filter(|m| m.role == Role::Tool)
        .collect();
    assert_eq!(tool_messages.len(), 1);

    let results = results(session.history());
    let ids: Vec<_> = results.iter().map(|r| r.tool_call_id.as_str()).collect();
    assert_eq!(ids, vec!["w", "r", "x"]);
    assert!(!results[0].is_error);
    assert_eq!(results[1].content, "line2");
    assert!(results[2].is_error);
    assert!(results[2].content.starts_with("invalid arguments for read_file"));
}
