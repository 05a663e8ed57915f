//! The terminal operator: stdin for input, stdout for output.

use async_trait::async_trait;
use runtime::{Operator, USER_PROMPT};
use serde_json::Value;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

pub struct StdinOperator {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for StdinOperator {
    fn default() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl Operator for StdinOperator {
    async fn read_line(&self) -> Option<String> {
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stdin");
                None
            }
        }
    }

    fn prompt(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        if text == USER_PROMPT {
            let _ = write!(stdout, "{BLUE}You{RESET}: ");
        } else {
            let _ = write!(stdout, "{text}");
        }
        let _ = stdout.flush();
    }

    fn show_assistant(&self, text: &str) {
        println!("{YELLOW}Claude{RESET}: {text}");
    }

    fn show_tool_call(&self, name: &str, input: &Value) {
        println!("{GREEN}tool{RESET}: {name}({input})");
    }

    fn show_error(&self, text: &str) {
        println!("{RED}Error{RESET}: {text}");
    }
}
