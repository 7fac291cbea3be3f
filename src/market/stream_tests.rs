//! Unit tests for stream message decoding.

#[cfg(test)]
mod stream_tests {
    use crate::market::stream::decode_messages;
    use crate::market::types::MarketMessage;

    #[test]
    fn test_decode_bar_message() {
        let text = r#"[{"T":"b","S":"AAPL","o":174.0,"h":176.5,"l":173.2,"c":175.8,"v":120000,"t":"2025-01-08T15:00:00Z"}]"#;
        let messages = decode_messages(text);

        assert_eq!(messages.len(), 1);
        match &messages[0] {
            MarketMessage::Bar(bar) => {
                assert_eq!(bar.symbol, "AAPL");
                assert_eq!(bar.close, 175.8);
                assert_eq!(bar.volume, 120000.0);
            }
            other => panic!("expected bar, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_quote_message() {
        let text = r#"[{"T":"q","S":"TSLA","bp":249.5,"ap":250.5,"bs":3,"as":2,"t":"2025-01-08T15:00:00Z"}]"#;
        let messages = decode_messages(text);

        assert_eq!(messages.len(), 1);
        match &messages[0] {
            MarketMessage::Quote(quote) => {
                assert_eq!(quote.symbol, "TSLA");
                assert_eq!(quote.bid_price, 249.5);
                assert_eq!(quote.ask_price, 250.5);
                assert_eq!(quote.mid_price(), 250.0);
            }
            other => panic!("expected quote, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_trade_message() {
        let text = r#"[{"T":"t","S":"GOOGL","p":140.25,"s":50,"t":"2025-01-08T15:00:00Z"}]"#;
        let messages = decode_messages(text);

        assert_eq!(messages.len(), 1);
        match &messages[0] {
            MarketMessage::Trade(trade) => {
                assert_eq!(trade.symbol, "GOOGL");
                assert_eq!(trade.price, 140.25);
                assert_eq!(trade.size, 50.0);
            }
            other => panic!("expected trade, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_mixed_frame_preserves_order() {
        let text = r#"[
            {"T":"q","S":"AAPL","bp":174.0,"ap":175.0,"bs":1,"as":1,"t":"2025-01-08T15:00:00Z"},
            {"T":"t","S":"AAPL","p":174.6,"s":10,"t":"2025-01-08T15:00:01Z"},
            {"T":"b","S":"AAPL","o":174.0,"h":175.0,"l":173.0,"c":174.5,"v":1000,"t":"2025-01-08T15:01:00Z"}
        ]"#;
        let messages = decode_messages(text);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].kind(), "quote");
        assert_eq!(messages[1].kind(), "trade");
        assert_eq!(messages[2].kind(), "bar");
        assert!(messages.iter().all(|m| m.symbol() == "AAPL"));
    }

    #[test]
    fn test_control_messages_are_dropped() {
        let text = r#"[{"T":"success","msg":"authenticated"},{"T":"subscription","bars":["AAPL"]}]"#;
        assert!(decode_messages(text).is_empty());
    }

    #[test]
    fn test_malformed_frame_yields_nothing() {
        assert!(decode_messages("not json").is_empty());
        assert!(decode_messages(r#"{"T":"t"}"#).is_empty());
        assert!(decode_messages(r#"[{"S":"AAPL"}]"#).is_empty());
    }
}
