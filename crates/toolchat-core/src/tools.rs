/// Backend tools the client knows how to label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Calculator,
    Weather,
    DataAnalyzer,
    PasswordGenerator,
    EmailValidator,
    CurrencyConverter,
}

impl Tool {
    pub const GENERIC_ICON: &'static str = "🔧";

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Calculator => "calculator",
            Tool::Weather => "get_weather",
            Tool::DataAnalyzer => "analyze_data",
            Tool::PasswordGenerator => "generate_password",
            Tool::EmailValidator => "validate_email",
            Tool::CurrencyConverter => "convert_currency",
        }
    }

    // Ids are matched exactly; the backend reports them verbatim.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|tool| tool.as_str() == id)
    }

    pub fn all() -> Vec<Tool> {
        vec![
            Tool::Calculator,
            Tool::Weather,
            Tool::DataAnalyzer,
            Tool::PasswordGenerator,
            Tool::EmailValidator,
            Tool::CurrencyConverter,
        ]
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Calculator => "🧮",
            Tool::Weather => "🌤️",
            Tool::DataAnalyzer => "📊",
            Tool::PasswordGenerator => "🔐",
            Tool::EmailValidator => "📧",
            Tool::CurrencyConverter => "💱",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Calculator => "Calculator",
            Tool::Weather => "Weather",
            Tool::DataAnalyzer => "Data Analyzer",
            Tool::PasswordGenerator => "Password Generator",
            Tool::EmailValidator => "Email Address Validator",
            Tool::CurrencyConverter => "Currency Converter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_round_trips_its_id() {
        for tool in Tool::all() {
            assert_eq!(Tool::from_id(tool.as_str()), Some(tool));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Tool::from_id("Calculator"), None);
        assert_eq!(Tool::from_id(""), None);
    }

    #[test]
    fn test_weather_display() {
        let tool = Tool::from_id("get_weather").unwrap();
        assert_eq!(tool.display_name(), "Weather");
        assert_eq!(tool.icon(), "🌤️");
    }
}
