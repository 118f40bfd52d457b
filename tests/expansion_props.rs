//! Property tests for the expansion gate and whole-line rewriting.
//!
//! These exercise only the public API: arbitrary non-space input must never
//! rewrite the document, and whole-line expansion must leave every other line
//! untouched while indenting each template line.

use altre_snippet::{
    decide, ExpanderConfig, ExpansionOutcome, FixedClock, LineDocument, LineSpan, Position, Rule,
    RuleSet, SnippetExpander, StaticRuleSource, TokenValues,
};
use chrono::{Local, TimeZone};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn expander() -> SnippetExpander<StaticRuleSource, FixedClock> {
    let rules = RuleSet::new(vec![
        Rule::new("/d", "${date}").unwrap(),
        Rule::new("/t", "${time}").unwrap().insert_at_current_position(true),
        Rule::new("//todo", "// TODO").unwrap(),
    ]);
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();
    SnippetExpander::with_clock(
        StaticRuleSource::new(ExpanderConfig::new(rules)),
        FixedClock(now),
    )
}

fn line_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just('/'), Just('d'), Just('t'), Just(' '), Just('\t'), any::<char>()],
        0..24,
    )
    .prop_map(|chars| chars.into_iter().filter(|c| *c != '\n').collect())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn non_space_insertions_never_rewrite(
        line in line_strategy(),
        ch in any::<char>().prop_filter("not a space", |c| *c != ' ' && *c != '\n'),
        column_seed in 0usize..32,
    ) {
        let expander = expander();
        let mut doc = LineDocument::new("main.cpp", &line);
        let column = column_seed % (line.chars().count() + 1);

        let event = doc.insert(Position::new(0, column), &ch.to_string()).unwrap();
        let before = doc.to_string();
        let outcome = expander.on_document_change(&event, Some(&mut doc));

        prop_assert!(!outcome.is_expanded());
        prop_assert!(matches!(outcome, ExpansionOutcome::Skipped(_)));
        prop_assert_eq!(doc.to_string(), before);
    }

    #[test]
    fn whole_line_expansion_preserves_other_lines(
        above in proptest::collection::vec("[a-z;{} ]{0,12}", 0..4),
        below in proptest::collection::vec("[a-z;{} ]{0,12}", 0..4),
        indent in "[ \t]{0,6}",
        template_lines in proptest::collection::vec("[a-z ]{0,10}", 1..5),
    ) {
        let template = template_lines.join("\n");
        let rules = RuleSet::new(vec![Rule::new("/blk", template.clone()).unwrap()]);
        let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();
        let expander = SnippetExpander::with_clock(
            StaticRuleSource::new(ExpanderConfig::new(rules)),
            FixedClock(now),
        );

        let mut lines = above.clone();
        lines.push(format!("{}/blk", indent));
        lines.extend(below.iter().cloned());
        let mut doc = LineDocument::new("x.h", &lines.join("\n"));

        let event = doc.type_at_line_end(above.len(), ' ').unwrap();
        let outcome = expander.on_document_change(&event, Some(&mut doc));
        prop_assert!(outcome.is_expanded());

        let result = doc.lines();
        prop_assert_eq!(result.len(), above.len() + template_lines.len() + below.len());
        prop_assert_eq!(&result[..above.len()], above.as_slice());
        prop_assert_eq!(&result[above.len() + template_lines.len()..], below.as_slice());

        for (idx, produced) in result[above.len()..above.len() + template_lines.len()].iter().enumerate() {
            prop_assert!(produced.starts_with(indent.as_str()));
            let expected_body = if idx == 0 {
                template_lines[0].trim_start()
            } else {
                template_lines[idx].as_str()
            };
            prop_assert_eq!(&produced[indent.len()..], expected_body);
        }
    }

    #[test]
    fn partial_expansion_keeps_text_outside_key(
        head in "[a-z(=]{0,8}",
        tail in "[a-z);]{0,8}",
    ) {
        let rules = RuleSet::new(vec![
            Rule::new("/t", "T").unwrap().insert_at_current_position(true),
        ]);
        let tokens = TokenValues::new("20240102", "03:04:05", "0");
        let line = format!("{}/t {}", head, tail);
        let column = head.chars().count() + 2;

        let action = decide(&line, column, &rules, &tokens).unwrap();
        prop_assert_eq!(action.span, LineSpan::Columns { start: column - 2, end: column + 1 });
    }
}
