//! Unit tests for comparators and rule deserialization.

#[cfg(test)]
mod rule_tests {
    use crate::strategy::rule::{Comparator, PriceCondition, StrategyRule};

    #[test]
    fn test_comparator_below() {
        assert!(Comparator::Below.matches(175.0, 180.0));
        assert!(!Comparator::Below.matches(180.0, 180.0));
        assert!(!Comparator::Below.matches(185.0, 180.0));
    }

    #[test]
    fn test_comparator_above() {
        assert!(Comparator::Above.matches(195.0, 190.0));
        assert!(!Comparator::Above.matches(190.0, 190.0));
        assert!(!Comparator::Above.matches(185.0, 190.0));
    }

    #[test]
    fn test_comparator_equal_tolerance() {
        assert!(Comparator::Equal.matches(180.0, 180.0));
        assert!(Comparator::Equal.matches(180.005, 180.0));
        assert!(Comparator::Equal.matches(179.995, 180.0));
        assert!(!Comparator::Equal.matches(180.02, 180.0));
        assert!(!Comparator::Equal.matches(179.98, 180.0));
    }

    #[test]
    fn test_condition_deserialize_wire_names() {
        let json = r#"{"condition":"below","price":180.0,"description":"Buy under 180"}"#;
        let condition: PriceCondition = serde_json::from_str(json).unwrap();

        assert_eq!(condition.comparator, Comparator::Below);
        assert_eq!(condition.threshold_price, 180.0);
        assert_eq!(condition.description, "Buy under 180");
    }

    #[test]
    fn test_condition_unknown_fields_ignored() {
        // The interpreter schema carries extra fields such as "type"
        let json = r#"{"type":"price_trigger","condition":"above","price":190.0}"#;
        let condition: PriceCondition = serde_json::from_str(json).unwrap();

        assert_eq!(condition.comparator, Comparator::Above);
        assert_eq!(condition.description, "");
    }

    #[test]
    fn test_rule_deserialize_full() {
        let json = r#"{
            "asset": "AAPL",
            "description": "Range trade",
            "entry_condition": {"condition":"below","price":180.0,"description":"entry"},
            "exit_condition": {"condition":"above","price":190.0,"description":"exit"}
        }"#;
        let rule: StrategyRule = serde_json::from_str(json).unwrap();

        assert_eq!(rule.asset.as_deref(), Some("AAPL"));
        assert!(!rule.is_empty());
        assert_eq!(rule.entry_condition.unwrap().threshold_price, 180.0);
        assert_eq!(rule.exit_condition.unwrap().comparator, Comparator::Above);
    }

    #[test]
    fn test_rule_partial_directions() {
        // A missing condition just disables that direction
        let json = r#"{"asset":"AAPL","entry_condition":{"condition":"below","price":180.0}}"#;
        let rule: StrategyRule = serde_json::from_str(json).unwrap();

        assert!(rule.entry_condition.is_some());
        assert!(rule.exit_condition.is_none());
        assert!(!rule.is_empty());
    }

    #[test]
    fn test_empty_rule() {
        let rule = StrategyRule::empty();
        assert!(rule.is_empty());
        assert!(rule.asset.is_none());
        assert!(rule.entry_condition.is_none());
        assert!(rule.exit_condition.is_none());
    }
}
