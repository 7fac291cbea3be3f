//! Unit tests for configuration structures and parsing.

#[cfg(test)]
mod config_tests {
    use crate::config::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(
            config.symbols,
            vec!["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "SPY"]
        );
        assert!(!config.use_simulation);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.alpaca.data_url, "https://data.alpaca.markets");
        assert_eq!(
            config.alpaca.stream_url,
            "wss://stream.data.alpaca.markets/v2/iex"
        );
    }

    #[test]
    fn test_app_config_deserialize() {
        let yaml = r#"
symbols:
  - AAPL
  - TSLA
use_simulation: true
llm:
  model: "gemma3"
  base_url: "http://localhost:11434/v1"
alpaca:
  api_key: "key"
  secret_key: "secret"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.symbols, vec!["AAPL", "TSLA"]);
        assert!(config.use_simulation);
        assert_eq!(config.llm.model, "gemma3");
        assert_eq!(
            config.llm.base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert_eq!(config.alpaca.api_key, "key");
        // Unspecified fields fall back to defaults
        assert_eq!(config.alpaca.data_url, "https://data.alpaca.markets");
    }

    #[test]
    fn test_app_config_defaults_in_deserialize() {
        // A minimal file should produce a fully usable config
        let yaml = "use_simulation: true\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(config.use_simulation);
        assert_eq!(config.symbols.len(), 6);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        let config = AlpacaConfig::default();
        assert!(config.credentials().is_err());
    }

    #[test]
    fn test_partial_credentials_are_fatal() {
        let config = AlpacaConfig {
            api_key: "key".to_string(),
            ..AlpacaConfig::default()
        };
        assert!(config.credentials().is_err());
    }

    #[test]
    fn test_present_credentials() {
        let config = AlpacaConfig {
            api_key: "key".to_string(),
            secret_key: "secret".to_string(),
            ..AlpacaConfig::default()
        };
        let (key, secret) = config.credentials().unwrap();
        assert_eq!(key, "key");
        assert_eq!(secret, "secret");
    }
}
