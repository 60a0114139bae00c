//! Text grammar contract tests for `Label` and `EvalLabel`.

use cb_cont_label::{
    hash_action, label_tokens, CodecConfig, CostEntry, EntryKind, EvalLabel, Label, LabelCodec,
    LabelError, COST_UNKNOWN, HEADER_PROBABILITY,
};

fn parse_line(line: &str) -> Label {
    Label::parse(&label_tokens(line)).expect("valid label line")
}

#[test]
fn test_single_supervised_token() {
    let label = Label::parse(&["a:1.0:0.5"]).unwrap();
    assert_eq!(
        label.costs,
        vec![CostEntry {
            action: hash_action("a", 0),
            cost: 1.0,
            probability: 0.5,
            partial_prediction: 0.0,
        }]
    );
    assert!(!label.is_test());
    assert!(!label.is_header());
}

#[test]
fn test_zero_probability_is_test_example() {
    let label = Label::parse(&["a:1.0:0"]).unwrap();
    assert!(label.is_test());
}

#[test]
fn test_empty_token_list_is_test_example() {
    let empty: Vec<&str> = Vec::new();
    let label = Label::parse(&empty).unwrap();
    assert!(label.is_empty());
    assert!(label.is_test());
    assert!(!label.is_header());
}

#[test]
fn test_shared_is_header_and_test() {
    let label = Label::parse(&["shared"]).unwrap();
    assert_eq!(label.len(), 1);
    assert_eq!(label.costs[0].probability, HEADER_PROBABILITY);
    assert_eq!(label.costs[0].cost, COST_UNKNOWN);
    assert_eq!(label.costs[0].kind(), EntryKind::Header);
    assert!(label.is_header());
    assert!(label.is_test());
}

#[test]
fn test_probability_clamping() {
    let label = Label::parse(&["a:1:1.5", "b:1:-0.3"]).unwrap();
    assert_eq!(label.costs[0].probability, 1.0);
    assert_eq!(label.costs[1].probability, 0.0);
}

#[test]
fn test_order_and_duplicates_preserved() {
    let label = parse_line("b:2:0.1 a:1:0.2 b:3:0.3 | features here");
    let actions: Vec<u32> = label.costs.iter().map(|c| c.action).collect();
    assert_eq!(
        actions,
        vec![hash_action("b", 0), hash_action("a", 0), hash_action("b", 0)]
    );
    let costs: Vec<f32> = label.costs.iter().map(|c| c.cost).collect();
    assert_eq!(costs, vec![2.0, 1.0, 3.0]);
}

#[test]
fn test_four_parts_is_malformed() {
    let err = Label::parse(&["a:1:2:3"]).unwrap_err();
    assert!(matches!(err, LabelError::MalformedCostSpec { .. }));
    assert!(err.is_parse_error());
}

#[test]
fn test_nan_cost_fails() {
    let err = Label::parse(&["a:nan"]).unwrap_err();
    assert!(matches!(err, LabelError::NaNCost { .. }));
}

#[test]
fn test_failed_parse_clears_previous_contents() {
    let mut label = Label::parse(&["x:1:0.5", "y:2:0.5"]).unwrap();
    let err = label
        .parse_tokens_with(&["a:1:0.5", "b:nan:0.5"], &CodecConfig::default())
        .unwrap_err();
    assert!(matches!(err, LabelError::NaNCost { .. }));
    assert!(label.is_empty());
}

#[test]
fn test_reparse_replaces_entries() {
    let mut label = Label::parse(&["x:1:0.5", "y:2:0.5"]).unwrap();
    label
        .parse_tokens_with(&["z"], &CodecConfig::default())
        .unwrap();
    assert_eq!(label.costs, vec![CostEntry::unobserved(hash_action("z", 0))]);
}

#[test]
fn test_hash_seed_is_configurable() {
    let cfg = CodecConfig::new(5);
    let label = Label::parse_with(&["a:1:0.5", "12"], &cfg).unwrap();
    assert_eq!(label.costs[0].action, hash_action("a", 5));
    assert_eq!(label.costs[1].action, 17);
}

#[test]
fn test_text_rendering_reparses() {
    let label = parse_line("shared");
    assert_eq!(parse_line(&label.to_text()), label);

    let label = Label::parse(&["3:0.5:0.25", "9", "4:-2:1"]).unwrap();
    assert_eq!(label.to_text(), "3:0.5:0.25 9 4:-2:1");
    assert_eq!(parse_line(&label.to_text()), label);
}

#[test]
fn test_eval_label_parse() {
    let label = EvalLabel::parse(&["act", "a:1.0:0.5"]).unwrap();
    assert_eq!(label.action, hash_action("act", 0));
    assert_eq!(label.event, Label::parse(&["a:1.0:0.5"]).unwrap());
    assert!(!label.is_test());
}

#[test]
fn test_eval_label_needs_two_tokens() {
    let err = EvalLabel::parse(&["act"]).unwrap_err();
    assert!(matches!(err, LabelError::MissingEvalAction { tokens: 1 }));
}

#[test]
fn test_parse_line_through_trait() {
    let cfg = CodecConfig::default();

    let mut label = Label::new();
    label.parse_line("a:1:0.5 | x y", &cfg).unwrap();
    assert_eq!(label, Label::parse(&["a:1:0.5"]).unwrap());

    let mut eval = EvalLabel::new();
    eval.parse_line("act a:1:0.5 |x", &cfg).unwrap();
    assert_eq!(eval, EvalLabel::parse(&["act", "a:1:0.5"]).unwrap());

    assert!(matches!(
        eval.parse_line("act | x", &cfg),
        Err(LabelError::MissingEvalAction { tokens: 1 })
    ));
}
