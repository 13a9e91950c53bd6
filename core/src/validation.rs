//! Field-level validation and progressive helper text for contact forms.
//!
//! # Design
//! Every function here is pure. `validate_field` is strict: it checks the raw
//! value exactly as given, so display grouping must be stripped first (the
//! schema does this). Rules are evaluated in a fixed order and the first
//! violated rule supplies the message.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of digits in a phone number.
pub const PHONE_LEN: usize = 9;

/// Required leading digit of a phone number.
pub const PHONE_PREFIX: char = '6';

/// Minimum name length the helper text nudges towards.
pub const NAME_HINT_MIN_LEN: usize = 2;

pub const NAME_REQUIRED: &str = "Name is required.";
pub const NAME_INVALID_CHARS: &str = "Name must contain only letters and spaces.";
pub const PHONE_REQUIRED: &str = "Phone number is required.";
pub const PHONE_DIGITS_ONLY: &str = "Phone number must contain digits only.";
pub const PHONE_BAD_PREFIX: &str = "Phone number must start with 6.";
pub const PHONE_BAD_LENGTH: &str = "Phone number must contain exactly 9 digits.";

/// Editable contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    PhoneNumber,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Name, Field::PhoneNumber];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::PhoneNumber => "phoneNumber",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn name_regex() -> Option<&'static Regex> {
    static NAME_RE: OnceLock<Option<Regex>> = OnceLock::new();
    NAME_RE
        .get_or_init(|| Regex::new(r"^[\p{L}\s]+$").ok())
        .as_ref()
}

fn is_letters_and_spaces(value: &str) -> bool {
    name_regex().is_some_and(|re| re.is_match(value))
}

fn phone_regex() -> Option<&'static Regex> {
    static PHONE_RE: OnceLock<Option<Regex>> = OnceLock::new();
    PHONE_RE
        .get_or_init(|| Regex::new(r"^6[0-9]{8}$").ok())
        .as_ref()
}

/// Removes every whitespace character, e.g. the grouping spaces inserted by
/// [`format_phone_number`].
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validates one field. Returns `None` when the value is valid.
pub fn validate_field(field: Field, value: &str) -> Option<&'static str> {
    match field {
        Field::Name => validate_name(value),
        Field::PhoneNumber => validate_phone(value),
    }
}

pub fn validate_name(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some(NAME_REQUIRED);
    }
    if !is_letters_and_spaces(value) {
        return Some(NAME_INVALID_CHARS);
    }
    None
}

pub fn validate_phone(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some(PHONE_REQUIRED);
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Some(PHONE_DIGITS_ONLY);
    }
    if !value.starts_with(PHONE_PREFIX) {
        return Some(PHONE_BAD_PREFIX);
    }
    if !phone_regex().is_some_and(|re| re.is_match(value)) {
        return Some(PHONE_BAD_LENGTH);
    }
    None
}

/// Groups the digits of a phone number as `XXX XX XX XX`.
///
/// Existing whitespace is ignored and anything past the ninth character is
/// dropped, so re-formatting a formatted value is a no-op.
pub fn format_phone_number(value: &str) -> String {
    let digits: Vec<char> = strip_whitespace(value).chars().take(PHONE_LEN).collect();
    let mut out = String::with_capacity(PHONE_LEN + 3);
    for (i, c) in digits.iter().enumerate() {
        if matches!(i, 3 | 5 | 7) {
            out.push(' ');
        }
        out.push(*c);
    }
    out
}

/// Guidance shown under the name input while the user types.
pub fn name_helper_text(value: &str, error: Option<&str>) -> String {
    if let Some(error) = error {
        return error.to_string();
    }
    if value.is_empty() {
        return "Enter the contact's name".to_string();
    }
    if !is_letters_and_spaces(value) {
        return "Use letters and spaces only".to_string();
    }
    if value.chars().count() < NAME_HINT_MIN_LEN {
        return format!("Name must be at least {NAME_HINT_MIN_LEN} characters long");
    }
    "Name looks good".to_string()
}

/// Guidance shown under the phone input while the user types.
pub fn phone_helper_text(value: &str, error: Option<&str>) -> String {
    if let Some(error) = error {
        return error.to_string();
    }
    let digits = strip_whitespace(value);
    if digits.is_empty() {
        return "Expected format: 6XX XX XX XX".to_string();
    }
    if !digits.starts_with(PHONE_PREFIX) {
        return "Phone number must start with 6".to_string();
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return "Use digits only".to_string();
    }
    let len = digits.chars().count();
    if len < 3 {
        let left = 3 - len;
        return format!("Enter {left} more {} for the first group", plural(left, "digit"));
    }
    if len < PHONE_LEN {
        let left = PHONE_LEN - len;
        return format!("{left} {} missing", plural(left, "digit"));
    }
    if len > PHONE_LEN {
        return "Phone number must contain exactly 9 digits".to_string();
    }
    "Phone number looks good".to_string()
}

fn plural(n: usize, word: &str) -> String {
    if n > 1 {
        format!("{word}s")
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_rules_in_order() {
        assert_eq!(validate_name(""), Some(NAME_REQUIRED));
        assert_eq!(validate_name("J3an"), Some(NAME_INVALID_CHARS));
        assert_eq!(validate_name("Jean-Paul"), Some(NAME_INVALID_CHARS));
        assert_eq!(validate_name("Jean Dupont"), None);
        assert_eq!(validate_name("Thierno Baldé"), None);
    }

    #[test]
    fn phone_rules_in_order() {
        assert_eq!(validate_phone(""), Some(PHONE_REQUIRED));
        assert_eq!(validate_phone("61234a678"), Some(PHONE_DIGITS_ONLY));
        assert_eq!(validate_phone("612 345 678"), Some(PHONE_DIGITS_ONLY));
        assert_eq!(validate_phone("712345678"), Some(PHONE_BAD_PREFIX));
        assert_eq!(validate_phone("61234567"), Some(PHONE_BAD_LENGTH));
        assert_eq!(validate_phone("6123456789"), Some(PHONE_BAD_LENGTH));
        assert_eq!(validate_phone("612345678"), None);
    }

    #[test]
    fn validate_field_dispatches() {
        assert!(validate_field(Field::Name, "Ada").is_none());
        assert!(validate_field(Field::PhoneNumber, "Ada").is_some());
    }

    #[test]
    fn format_groups_three_two_two_two() {
        assert_eq!(format_phone_number(""), "");
        assert_eq!(format_phone_number("61"), "61");
        assert_eq!(format_phone_number("6123"), "612 3");
        assert_eq!(format_phone_number("612345"), "612 34 5");
        assert_eq!(format_phone_number("612345678"), "612 34 56 78");
        assert_eq!(format_phone_number("6123456789"), "612 34 56 78");
    }

    #[test]
    fn name_helper_progression() {
        assert_eq!(name_helper_text("x", Some("boom")), "boom");
        assert_eq!(name_helper_text("", None), "Enter the contact's name");
        assert_eq!(name_helper_text("A1", None), "Use letters and spaces only");
        assert_eq!(name_helper_text("A", None), "Name must be at least 2 characters long");
        assert_eq!(name_helper_text("Ada", None), "Name looks good");
    }

    #[test]
    fn name_helper_agrees_with_validator() {
        // Roman numerals are alphabetic but not letters.
        for value in ["Louis Ⅷ", "Ⅻ", "Aïssatou", "Ada Bah"] {
            let looks_good = name_helper_text(value, None) == "Name looks good";
            assert_eq!(looks_good, validate_name(value).is_none(), "{value}");
        }
    }

    #[test]
    fn phone_helper_progression() {
        assert_eq!(phone_helper_text("", None), "Expected format: 6XX XX XX XX");
        assert_eq!(phone_helper_text("7", None), "Phone number must start with 6");
        assert_eq!(phone_helper_text("6a", None), "Use digits only");
        assert_eq!(phone_helper_text("6", None), "Enter 2 more digits for the first group");
        assert_eq!(phone_helper_text("61", None), "Enter 1 more digit for the first group");
        assert_eq!(phone_helper_text("612 34", None), "4 digits missing");
        assert_eq!(phone_helper_text("61234567", None), "1 digit missing");
        assert_eq!(phone_helper_text("612 34 56 78", None), "Phone number looks good");
        assert_eq!(
            phone_helper_text("6123456789", None),
            "Phone number must contain exactly 9 digits"
        );
        assert_eq!(phone_helper_text("6", Some("err")), "err");
    }

    proptest! {
        #[test]
        fn well_formed_phones_are_valid(s in "6[0-9]{8}") {
            prop_assert_eq!(validate_phone(&s), None);
        }

        #[test]
        fn other_phones_are_rejected(s in "\\PC{0,12}") {
            let well_formed = s.len() == 9
                && s.starts_with('6')
                && s.chars().all(|c| c.is_ascii_digit());
            prop_assume!(!well_formed);
            prop_assert!(validate_phone(&s).is_some());
        }

        #[test]
        fn letter_names_are_valid(s in "[a-zA-Z ]{1,24}") {
            prop_assert_eq!(validate_name(&s), None);
        }

        #[test]
        fn names_with_digits_or_symbols_are_rejected(
            prefix in "[a-zA-Z]{0,8}",
            bad in "[0-9!@#$%&*.,_-]",
            suffix in "[a-zA-Z ]{0,8}",
        ) {
            let s = format!("{prefix}{bad}{suffix}");
            prop_assert!(validate_name(&s).is_some());
        }

        #[test]
        fn formatting_is_idempotent(s in "[0-9]{0,9}") {
            let once = format_phone_number(&s);
            let again = format_phone_number(&strip_whitespace(&once));
            prop_assert_eq!(&once, &again);
            prop_assert_eq!(format_phone_number(&once), once);
        }
    }
}
