//! Free-text strategy interpretation
//!
//! One LLM call turns the user's strategy into a structured rule. The
//! parser is staged: strict JSON first, then a legacy substring fallback
//! for malformed output. A parse failure never crashes the run; the worst
//! outcome is an empty rule that yields no signals.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::error::TradingError;
use crate::strategy::rule::StrategyRule;

const INTERPRETER_PROMPT: &str = r#"You are a trading strategy interpreter. Translate the user's strategy into a structured JSON format that can be directly consumed by a trading agent. Your output must be valid JSON and follow this exact schema:

```json
{
  "strategy": {
    "asset": "[ASSET_SYMBOL]",
    "description": "[Brief description of the overall strategy]",
    "entry_condition": {
      "condition": "[above/below/equal]",
      "price": [NUMERIC_VALUE],
      "description": "[Human-readable description of buy condition]"
    },
    "exit_condition": {
      "condition": "[above/below/equal]",
      "price": [NUMERIC_VALUE],
      "description": "[Human-readable description of sell condition]"
    }
  }
}
```

Replace the placeholders with actual values:
- [ASSET_SYMBOL]: The stock symbol (e.g., AAPL, GOOGL, SPY)
- [NUMERIC_VALUE]: A number without the dollar sign (e.g., 150.50)
- Description fields should contain human-readable explanations

Your output must be valid JSON that can be parsed directly. Do not include any text before or after the JSON."#;

/// Result of interpreting one strategy text.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    /// A structured rule, possibly degraded to descriptions only by the
    /// legacy fallback
    Ok(StrategyRule),
    /// Output that neither parser stage could use
    Malformed { raw: String },
    /// No usable input or no interpreter output
    Empty,
}

impl ParseOutcome {
    /// The rule the workflow proceeds with either way.
    pub fn into_rule(self) -> StrategyRule {
        match self {
            ParseOutcome::Ok(rule) => rule,
            ParseOutcome::Malformed { raw } => {
                warn!("Strategy output was malformed, proceeding with empty rule: {}", raw);
                StrategyRule::empty()
            }
            ParseOutcome::Empty => StrategyRule::empty(),
        }
    }
}

#[derive(Deserialize)]
struct RuleEnvelope {
    #[serde(default)]
    strategy: Option<StrategyRule>,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.api_key.clone().unwrap_or_default());
        if let Some(url) = &config.base_url {
            openai_config = openai_config.with_api_base(url.clone());
        }
        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
        }
    }

    pub async fn chat(&self, system_prompt: &str, user_input: &str) -> Result<String, TradingError> {
        info!("Sending request to LLM (model: {})...", self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(system_prompt)
                        .build()
                        .map_err(|e| TradingError::Llm(e.to_string()))?,
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(user_input)
                        .build()
                        .map_err(|e| TradingError::Llm(e.to_string()))?,
                ),
            ])
            .build()
            .map_err(|e| TradingError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TradingError::Llm(e.to_string()))?;

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}

pub struct StrategyInterpreter {
    llm: LlmClient,
}

impl StrategyInterpreter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Interpret one free-text strategy. Transport failures degrade to
    /// `Empty` rather than erroring the workflow.
    pub async fn interpret(&self, user_strategy: &str) -> ParseOutcome {
        if user_strategy.trim().is_empty() {
            return ParseOutcome::Empty;
        }

        info!("Interpreting strategy: {}", user_strategy);
        match self.llm.chat(INTERPRETER_PROMPT, user_strategy).await {
            Ok(raw) => parse_rule(&raw),
            Err(e) => {
                warn!("Strategy interpretation failed ({}); proceeding with empty rule", e);
                ParseOutcome::Empty
            }
        }
    }
}

/// Staged parser over raw interpreter output.
pub fn parse_rule(raw: &str) -> ParseOutcome {
    if raw.trim().is_empty() {
        return ParseOutcome::Empty;
    }

    let json_str = extract_json_block(raw);
    if let Ok(envelope) = serde_json::from_str::<RuleEnvelope>(json_str) {
        if let Some(rule) = envelope.strategy {
            info!("Parsed strategy rule: {:?}", rule);
            return ParseOutcome::Ok(rule);
        }
    }

    if let Some(rule) = legacy_conditions(raw) {
        warn!("Strategy JSON parse failed; extracted conditions as text only");
        return ParseOutcome::Ok(rule);
    }

    ParseOutcome::Malformed {
        raw: raw.to_string(),
    }
}

/// Content of a ```json fenced block if present, otherwise the trimmed raw
/// text.
fn extract_json_block(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let rest = &raw[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    raw.trim()
}

/// Legacy best-effort extraction: "Buy condition:" / "Sell condition:"
/// markers. Produces a rule carrying the descriptions only; with no asset
/// or typed conditions it yields no signals.
fn legacy_conditions(raw: &str) -> Option<StrategyRule> {
    let buy_start = raw.find("Buy condition:")?;
    let sell_start = raw.find("Sell condition:")?;
    if sell_start < buy_start {
        return None;
    }

    let buy = raw[buy_start + "Buy condition:".len()..sell_start].trim();
    let sell = raw[sell_start + "Sell condition:".len()..].trim();

    Some(StrategyRule {
        asset: None,
        description: format!("buy: {}; sell: {}", buy, sell),
        entry_condition: None,
        exit_condition: None,
    })
}
