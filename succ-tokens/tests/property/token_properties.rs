use proptest::prelude::*;
use succ_tokens::TokenCounter;

proptest! {
    #[test]
    fn counting_is_deterministic(text in ".{0,200}") {
        let counter = TokenCounter::new();
        let a = counter.count(&text);
        let b = counter.count(&text);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn repeating_text_never_decreases_token_count(text in "[a-z ]{1,40}") {
        let counter = TokenCounter::new();
        let once = counter.count(&text);
        let twice = counter.count(&format!("{text} {text}"));
        prop_assert!(twice >= once);
    }

    #[test]
    fn empty_text_is_always_zero_tokens(_unused in 0..10u8) {
        let counter = TokenCounter::new();
        prop_assert_eq!(counter.count(""), 0);
    }
}
