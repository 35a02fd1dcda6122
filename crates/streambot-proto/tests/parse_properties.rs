//! Property-based tests for relay line parsing.
//!
//! Generates well-formed lines from random components and checks that the
//! parser recovers exactly those components, and that batch parsing is a
//! pure function of its input.

use proptest::prelude::*;
use streambot_proto::{parse_batch, ProtocolLine};

// =============================================================================
// STRATEGIES
// =============================================================================

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,24}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Z]{1,12}").expect("valid regex"),
        prop::string::string_regex("[0-9]{3}").expect("valid regex"),
    ]
}

fn param_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#a-zA-Z0-9_+\\-][a-zA-Z0-9_+\\-]{0,15}").expect("valid regex")
}

/// Trailing text without CR/LF, without the ` :` separator, and without
/// surrounding whitespace (the parser trims it).
fn trailing_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!?.,#@][a-zA-Z0-9!?.,#@ ]{0,60}[a-zA-Z0-9!?.,#@]")
        .expect("valid regex")
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn well_formed_line_roundtrips_components(
        nick in nickname_strategy(),
        host in hostname_strategy(),
        command in command_strategy(),
        params in prop::collection::vec(param_strategy(), 0..4),
        trailing in trailing_strategy(),
    ) {
        let prefix = format!("{nick}!{nick}@{host}");
        let mut raw = format!(":{prefix} {command}");
        for p in &params {
            raw.push(' ');
            raw.push_str(p);
        }
        raw.push_str(" :");
        raw.push_str(&trailing);

        let line = ProtocolLine::parse(&raw).unwrap().unwrap();
        prop_assert_eq!(line.prefix, prefix.as_str());
        prop_assert_eq!(line.command, command.as_str());
        prop_assert_eq!(line.params.to_vec(), params.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(line.message.as_ref(), trailing.as_str());
        prop_assert_eq!(line.nick(), nick.as_str());
    }

    #[test]
    fn line_without_prefix_or_trailing(
        command in command_strategy(),
        params in prop::collection::vec(param_strategy(), 0..4),
    ) {
        let mut raw = command.clone();
        for p in &params {
            raw.push(' ');
            raw.push_str(p);
        }

        let line = ProtocolLine::parse(&raw).unwrap().unwrap();
        prop_assert_eq!(line.prefix, "");
        prop_assert_eq!(line.command, command.as_str());
        prop_assert_eq!(line.message.as_ref(), "");
    }

    #[test]
    fn batch_parsing_is_idempotent(
        lines in prop::collection::vec(
            prop::string::string_regex("[ -~]{0,80}").expect("valid regex"),
            0..12,
        ),
    ) {
        let buf = lines.join("\r\n").into_bytes();
        let first = parse_batch(&buf);
        let second = parse_batch(&buf);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parser_never_panics(raw in "[^\r\n]{0,200}") {
        let _ = ProtocolLine::parse(&raw);
    }
}
