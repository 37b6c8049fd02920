use crate::agent::prompt::build_system_prompt;
use crate::agent::protocol::{AgentError, Decision, Turn};
use crate::agent::registry::ToolRegistry;
use crate::traits::{ChatMessage, Provider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_ITERATIONS: usize = 20;

/// One conversation with the model.
///
/// Holds the growing transcript and alternates between requesting a decision
/// and executing at most one declared tool call per iteration, until the
/// model emits a terminal `output`. The transcript is seeded with the fixed
/// system instruction and persists across [`Session::ask`] calls, so a REPL
/// can carry context from one query into the next.
pub struct Session {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    transcript: Vec<ChatMessage>,
    max_iterations: usize,
}

impl Session {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        let transcript = vec![ChatMessage::system(build_system_prompt(&tools))];
        Self {
            provider,
            tools,
            transcript,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Run the decision loop for one user query.
    ///
    /// Returns the model's final answer, or an error when the reply cannot
    /// be decoded, an unknown tool is requested, the provider fails, or the
    /// iteration bound is exhausted without an `output`.
    pub async fn ask(&mut self, query: &str) -> Result<String> {
        anyhow::ensure!(!query.trim().is_empty(), "query must not be empty");

        self.transcript
            .push(ChatMessage::user(Turn::User { user: query }.encode()));

        for iteration in 1..=self.max_iterations {
            let raw = self.provider.complete(&self.transcript).await?;
            self.transcript.push(ChatMessage::assistant(raw.clone()));

            match Decision::parse(&raw)? {
                Decision::Output { output } => {
                    info!(iteration, "session finished");
                    return Ok(output);
                }
                Decision::Action { function, input } => {
                    let observation = self.tools.invoke(&function, &input).await?;
                    info!(tool = %function, %input, %observation, "tool executed");
                    self.transcript.push(ChatMessage::observation(
                        Turn::Observation {
                            observation: &observation,
                        }
                        .encode(),
                    ));
                }
                Decision::Plan { plan } => {
                    // Plans are observational; the assistant append above is
                    // all the transcript needs before asking again.
                    debug!(%plan, iteration, "model plan");
                }
            }
        }

        Err(AgentError::IterationLimit(self.max_iterations).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Tool, ToolName};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed sequence of raw model replies.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(&self, _transcript: &[ChatMessage]) -> Result<String> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    /// Records every invocation and answers with a canned temperature.
    struct RecordingWeather {
        calls: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingWeather {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(vec![]),
                reply: reply.to_string(),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Tool for RecordingWeather {
        fn name(&self) -> ToolName {
            ToolName::CurrentWeather
        }

        fn description(&self) -> &str {
            "Returns the current temperature for a city"
        }

        async fn invoke(&self, input: &str) -> String {
            self.calls.lock().unwrap().push(input.to_string());
            self.reply.clone()
        }
    }

    fn session_with(
        replies: &[&str],
        weather: Arc<RecordingWeather>,
    ) -> Session {
        let mut registry = ToolRegistry::new();
        registry.register(weather);
        Session::new(ScriptedProvider::new(replies), Arc::new(registry))
    }

    #[tokio::test]
    async fn single_city_query_invokes_tool_once() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(
            &[
                r#"{"type":"plan","plan":"I will call get_current_weather for Varanasi"}"#,
                r#"{"type":"action","function":"get_current_weather","input":"Varanasi"}"#,
                r#"{"type":"output","output":"It is 17°C in Varanasi"}"#,
            ],
            weather.clone(),
        );

        let answer = session.ask("What is the weather in Varanasi?").await.unwrap();
        assert_eq!(answer, "It is 17°C in Varanasi");
        assert_eq!(weather.calls(), vec!["Varanasi"]);
    }

    #[tokio::test]
    async fn two_city_query_invokes_tool_twice_in_order() {
        let weather = RecordingWeather::new("10°C");
        let mut session = session_with(
            &[
                r#"{"type":"plan","plan":"I will look up Varanasi first"}"#,
                r#"{"type":"action","function":"get_current_weather","input":"Varanasi"}"#,
                r#"{"type":"plan","plan":"Now Gurugram"}"#,
                r#"{"type":"action","function":"get_current_weather","input":"Gurugram"}"#,
                r#"{"type":"output","output":"The sum is 20°C"}"#,
            ],
            weather.clone(),
        );

        let answer = session
            .ask("What is the sum of weather of Varanasi and Gurugram today?")
            .await
            .unwrap();
        assert_eq!(answer, "The sum is 20°C");
        assert_eq!(weather.calls(), vec!["Varanasi", "Gurugram"]);
    }

    #[tokio::test]
    async fn direct_answer_makes_no_tool_calls() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(
            &[r#"{"type":"output","output":"Weather is the state of the atmosphere."}"#],
            weather.clone(),
        );

        let answer = session.ask("What is weather?").await.unwrap();
        assert_eq!(answer, "Weather is the state of the atmosphere.");
        assert!(weather.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_is_a_typed_error() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(
            &[r#"{"type":"action","function":"getCurrentWeather","input":"Pune"}"#],
            weather.clone(),
        );

        let err = session.ask("Weather in Pune?").await.unwrap_err();
        let agent_err = err.downcast::<AgentError>().unwrap();
        assert!(matches!(agent_err, AgentError::UnknownTool(name) if name == "getCurrentWeather"));
        assert!(weather.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_reply_is_a_typed_error() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(&["Sure, checking the weather now!"], weather);

        let err = session.ask("Weather in Pune?").await.unwrap_err();
        let agent_err = err.downcast::<AgentError>().unwrap();
        assert!(matches!(agent_err, AgentError::MalformedDecision(_)));
    }

    #[tokio::test]
    async fn endless_planning_hits_iteration_limit() {
        let weather = RecordingWeather::new("17°C");
        let plan = r#"{"type":"plan","plan":"still thinking"}"#;
        let mut session = session_with(&[plan, plan, plan, plan], weather).with_max_iterations(3);

        let err = session.ask("Weather in Pune?").await.unwrap_err();
        let agent_err = err.downcast::<AgentError>().unwrap();
        assert!(matches!(agent_err, AgentError::IterationLimit(3)));
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_provider_call() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(&[], weather);

        assert!(session.ask("   ").await.is_err());
    }

    #[tokio::test]
    async fn transcript_persists_across_queries() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(
            &[
                r#"{"type":"output","output":"first"}"#,
                r#"{"type":"output","output":"second"}"#,
            ],
            weather,
        );

        session.ask("one").await.unwrap();
        let after_first = session.transcript().len();
        session.ask("two").await.unwrap();

        // system + (user, assistant) per query
        assert_eq!(after_first, 3);
        assert_eq!(session.transcript().len(), 5);
        assert_eq!(session.transcript()[0].role, "system");
        assert_eq!(session.transcript()[1].role, "user");
        assert_eq!(session.transcript()[2].role, "assistant");
    }

    #[tokio::test]
    async fn observation_is_appended_as_developer_turn() {
        let weather = RecordingWeather::new("17°C");
        let mut session = session_with(
            &[
                r#"{"type":"action","function":"get_current_weather","input":"Pune"}"#,
                r#"{"type":"output","output":"17°C in Pune"}"#,
            ],
            weather,
        );

        session.ask("Weather in Pune?").await.unwrap();
        let observation = session
            .transcript()
            .iter()
            .find(|m| m.role == "developer")
            .expect("observation turn");
        assert_eq!(
            observation.content,
            r#"{"type":"observation","observation":"17°C"}"#
        );
    }
}
