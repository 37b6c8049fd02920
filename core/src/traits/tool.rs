use async_trait::async_trait;
use std::fmt;

/// Closed set of tools the model may request.
///
/// Decision messages carry the tool as a free-form string; parsing it into
/// this enum is the only way to reach a tool, so an unrecognized name can
/// never dispatch anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    CurrentWeather,
}

impl ToolName {
    /// Wire name as advertised in the system prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::CurrentWeather => "get_current_weather",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get_current_weather" => Some(ToolName::CurrentWeather),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> ToolName;

    fn description(&self) -> &str;

    /// Execute the tool with its string argument.
    ///
    /// Tools never fail past this boundary: every failure mode is rendered
    /// as a sentinel string that flows back to the model as a plain
    /// observation.
    async fn invoke(&self, input: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_name() {
        assert_eq!(
            ToolName::parse("get_current_weather"),
            Some(ToolName::CurrentWeather)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(ToolName::parse("getCurrentWeather"), None);
        assert_eq!(ToolName::parse(""), None);
        assert_eq!(ToolName::parse("shell"), None);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(ToolName::CurrentWeather.to_string(), "get_current_weather");
    }
}
