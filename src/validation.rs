//! Field validation shared by the login and registration forms

use serde::Serialize;

use crate::constants::{MIN_PASSWORD_LENGTH, PASSWORD_SPECIAL_CHARS};

/// One entry of the password checklist
#[derive(Debug, Clone, Copy)]
pub struct PasswordRule {
    pub label: &'static str,
    pub test: fn(&str) -> bool,
}

impl PasswordRule {
    pub fn is_satisfied_by(&self, password: &str) -> bool {
        (self.test)(password)
    }
}

/// The five independent password requirements, in display order
pub const PASSWORD_RULES: [PasswordRule; 5] = [
    PasswordRule {
        label: "At least 8 characters",
        test: |pwd: &str| utf16_len(pwd) >= MIN_PASSWORD_LENGTH,
    },
    PasswordRule {
        label: "One uppercase letter (A-Z)",
        test: |pwd: &str| pwd.chars().any(|c| c.is_ascii_uppercase()),
    },
    PasswordRule {
        label: "One lowercase letter (a-z)",
        test: |pwd: &str| pwd.chars().any(|c| c.is_ascii_lowercase()),
    },
    PasswordRule {
        label: "One digit (0-9)",
        test: |pwd: &str| pwd.chars().any(|c| c.is_ascii_digit()),
    },
    PasswordRule {
        label: "One special character (!@#$%^&*)",
        test: |pwd: &str| pwd.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)),
    },
];

/// Length in UTF-16 code units, the unit browser form fields count in
///
/// Characters outside the Basic Multilingual Plane count as two.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Whitespace as matched by the `\s` regex class in browsers
///
/// Differs from `char::is_whitespace`: U+FEFF counts, U+0085 does not.
pub fn is_form_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Checklist line rendered under the password field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStatus {
    pub label: &'static str,
    pub satisfied: bool,
}

/// Evaluate every password rule against `password`
pub fn password_checklist(password: &str) -> Vec<RuleStatus> {
    PASSWORD_RULES
        .iter()
        .map(|rule| RuleStatus {
            label: rule.label,
            satisfied: rule.is_satisfied_by(password),
        })
        .collect()
}

/// True when `password` passes all five rules
pub fn validate_password(password: &str) -> bool {
    PASSWORD_RULES.iter().all(|rule| rule.is_satisfied_by(password))
}

/// Email shape check: `local@domain.tld`
///
/// Same acceptance as `^[^\s@]+@[^\s@]+\.[^\s@]+$`: no whitespace (see
/// [`is_form_whitespace`]), exactly one
/// `@` with text on both sides, and a dot in the domain that is neither its
/// first nor its last character.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(is_form_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let last = domain.chars().count().saturating_sub(1);
    domain
        .chars()
        .enumerate()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}
