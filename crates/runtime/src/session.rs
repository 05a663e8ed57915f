//! The conversation engine.

use std::sync::Arc;

use crate::model::{Backend, Message, ModelRequest, Usage};
use crate::tools::{Dispatcher, Registry};
use crate::{Error, Operator, Result};

/// Shown before each user turn is read.
pub const USER_PROMPT: &str = "You: ";

/// Where a session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingUserInput,
    AwaitingModelResponse,
    ExecutingTools,
    /// Input closed or the provider failed. Absorbing.
    Terminated,
}

/// A conversation with the model.
///
/// Owns the message history. Model turns that request tools are answered
/// by running every requested call, in order, and sending all results back
/// in a single tool message before the model is called again.
pub struct Session<B> {
    backend: B,
    dispatcher: Dispatcher,
    operator: Arc<dyn Operator>,
    messages: Vec<Message>,
    state: State,
    usage: Usage,
}

impl<B: Backend> Session<B> {
    /// Create a session over the given backend, tool registry and operator.
    pub fn new(backend: B, registry: Arc<Registry>, operator: Arc<dyn Operator>) -> Self {
        Self {
            backend,
            dispatcher: Dispatcher::new(registry),
            operator,
            messages: Vec::new(),
            state: State::AwaitingUserInput,
            usage: Usage::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// All messages exchanged so far.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    /// Token usage summed over every model response.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.dispatcher.registry()
    }

    /// Drive the session until input closes.
    ///
    /// Returns an error only when the provider fails; the session is
    /// terminated in that case.
    pub async fn run(&mut self) -> Result<()> {
        while self.state != State::Terminated {
            self.step().await?;
        }
        Ok(())
    }

    /// Perform one state transition and return the new state.
    pub async fn step(&mut self) -> Result<State> {
        match self.state {
            State::AwaitingUserInput => self.read_user_turn().await,
            State::AwaitingModelResponse => self.request_model().await?,
            State::ExecutingTools => self.execute_tools().await,
            State::Terminated => {}
        }
        Ok(self.state)
    }

    /// Submit one user message and run until the model stops asking for
    /// tools. Returns the text of the final assistant turn.
    pub async fn chat(&mut self, user_input: &str) -> Result<String> {
        if self.state != State::AwaitingUserInput {
            return Err(Error::InvalidState(format!(
                "cannot accept user input while {:?}",
                self.state
            )));
        }
        self.push_user(user_input);

        while !matches!(self.state, State::AwaitingUserInput | State::Terminated) {
            self.step().await?;
        }

        Ok(self
            .messages
            .last()
            .map(Message::text)
            .unwrap_or_default())
    }

    async fn read_user_turn(&mut self) {
        self.operator.prompt(USER_PROMPT);
        let Some(line) = self.operator.read_line().await else {
            tracing::debug!("operator input closed");
            self.state = State::Terminated;
            return;
        };

        let input = line.trim();
        if !input.is_empty() {
            self.push_user(input);
        }
    }

    fn push_user(&mut self, input: &str) {
        self.messages.push(Message::user(input));
        self.state = State::AwaitingModelResponse;
    }

    async fn request_model(&mut self) -> Result<()> {
        let tools = self.dispatcher.registry().specs();
        tracing::debug!(
            messages = self.messages.len(),
            tools = tools.len(),
            "calling model"
        );

        let request = ModelRequest {
            messages: &self.messages,
            tools: &tools,
        };
        let response = match self.backend.call(request).await {
            Ok(response) => response,
            Err(e) => {
                self.state = State::Terminated;
                return Err(e.into());
            }
        };

        self.usage.accumulate(response.usage);
        tracing::debug!(
            finish_reason = ?response.finish_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model responded"
        );

        let message = response.message;
        let text = message.text();
        if !text.is_empty() {
            self.operator.show_assistant(&text);
        }

        self.state = if message.has_tool_calls() {
            State::ExecutingTools
        } else {
            State::AwaitingUserInput
        };
        // An empty assistant turn cannot be replayed to the provider.
        if message.parts.is_empty() {
            tracing::debug!("model returned an empty turn");
        } else {
            self.messages.push(message);
        }
        Ok(())
    }

    async fn execute_tools(&mut self) {
        let calls = self
            .messages
            .last()
            .map(Message::tool_calls)
            .unwrap_or_default();

        // Sequential on purpose: later calls may depend on earlier side effects.
        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            self.operator.show_tool_call(&call.name, &call.input);
            results.push(self.dispatcher.dispatch(call, self.operator.as_ref()).await);
        }

        self.messages.push(Message::tool_results(results));
        self.state = State::AwaitingModelResponse;
    }
}
