// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Maximum number of reminders attached to one event
pub const MAX_ALARMS: usize = 3;

/// Reminder list applied when the user does not provide one
pub const DEFAULT_REMINDERS: &str = "60,10";

/// Turn reminder tokens into at most [`MAX_ALARMS`] minute offsets
///
/// Tokens that do not parse as integers are skipped; parsing stops once
/// three values have been kept, so later tokens are never looked at.
/// Sign is preserved here - rendering uses the absolute value.
pub fn alarm_offsets<I, S>(tokens: I) -> Vec<i64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| {
            let token = token.as_ref().trim();
            token.parse::<i64>().map_or_else(
                |_| {
                    debug!("Skipping reminder token that is not an integer: '{}'", token);
                    None
                },
                Some,
            )
        })
        .take(MAX_ALARMS)
        .collect()
}

/// Parse a comma-delimited reminder list such as `"60,10,5"`
#[must_use]
pub fn parse_alarm_list(raw: &str) -> Vec<i64> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    alarm_offsets(raw.split(','))
}

/// `TRIGGER` value for an offset: always "N minutes before start"
#[must_use]
pub fn trigger(minutes: i64) -> String {
    format!("-PT{}M", minutes.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_three_parsed_values() {
        let offsets = alarm_offsets(["60", "abc", "10", "5", "1"]);
        assert_eq!(offsets, vec![60, 10, 5]);
    }

    #[test]
    fn test_fewer_than_three() {
        assert_eq!(alarm_offsets(["15"]), vec![15]);
        assert!(alarm_offsets(Vec::<String>::new()).is_empty());
        assert!(alarm_offsets(["x", "", "1.5"]).is_empty());
    }

    #[test]
    fn test_count_is_min_of_three_and_parsable() {
        let cases: [(&[&str], usize); 4] = [
            (&["1", "2", "3", "4", "5"], 3),
            (&["a", "b", "1"], 1),
            (&["1", "b", "2"], 2),
            (&["-5", "0", "7", "oops"], 3),
        ];
        for (tokens, expected) in cases {
            assert_eq!(alarm_offsets(tokens.iter()).len(), expected, "{tokens:?}");
        }
    }

    #[test]
    fn test_tokens_are_trimmed() {
        assert_eq!(parse_alarm_list(" 60 , 10 "), vec![60, 10]);
    }

    #[test]
    fn test_negative_values_kept_in_order() {
        assert_eq!(parse_alarm_list("-15,30"), vec![-15, 30]);
    }

    #[test]
    fn test_blank_list() {
        assert!(parse_alarm_list("").is_empty());
        assert!(parse_alarm_list("   ").is_empty());
    }

    #[test]
    fn test_default_reminders() {
        assert_eq!(parse_alarm_list(DEFAULT_REMINDERS), vec![60, 10]);
    }

    #[test]
    fn test_trigger_uses_absolute_value() {
        assert_eq!(trigger(60), "-PT60M");
        assert_eq!(trigger(-60), "-PT60M");
        assert_eq!(trigger(0), "-PT0M");
        assert_eq!(trigger(100_000), "-PT100000M");
    }
}
