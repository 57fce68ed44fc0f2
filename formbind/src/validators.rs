//! Validator library.
//!
//! Every constructor returns a [`Validator`]: a pure check over one raw string
//! with its configuration captured at construction time. Validators are cheap
//! to clone and safe to share between threads.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Structural description of a validator, used for introspection and equality.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "rule", rename_all = "snake_case"))]
pub enum Rule {
    Required,
    LengthRange { min: usize, max: usize },
    LengthGt { min: usize },
    LengthLt { max: usize },
    NumberRange { min: i64, max: i64 },
    NumberGt { min: i64 },
    NumberLt { max: i64 },
    Regex { pattern: String },
    Custom { name: &'static str },
}

type Check = dyn Fn(&str) -> Result<(), String> + Send + Sync;

/// A single rejection rule applied to a raw value before coercion.
#[derive(Clone)]
pub struct Validator {
    rule: Rule,
    check: Arc<Check>,
}

impl Validator {
    fn from_rule<F>(rule: Rule, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            rule,
            check: Arc::new(check),
        }
    }

    /// A caller-supplied rule. `check` returns the rejection message on failure.
    pub fn custom<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::from_rule(Rule::Custom { name }, check)
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Run the check. `Err` carries the human-readable rejection message.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.rule).finish()
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule
    }
}

impl Eq for Validator {}

fn parse_number(value: &str) -> Result<i64, String> {
    value.parse::<i64>().map_err(|_| "not a number".to_string())
}

/// Rejects the empty string and nothing else.
pub fn required() -> Validator {
    Validator::from_rule(Rule::Required, |value| {
        if value.is_empty() {
            Err("required".to_string())
        } else {
            Ok(())
        }
    })
}

/// Accepts values whose length in bytes lies in `[min, max]`.
pub fn length_range(min: usize, max: usize) -> Validator {
    Validator::from_rule(Rule::LengthRange { min, max }, move |value| {
        let len = value.len();
        if len >= min && len <= max {
            Ok(())
        } else {
            Err(format!("length must be within [{min}, {max}]"))
        }
    })
}

/// Accepts values of at least `min` bytes.
pub fn length_gt(min: usize) -> Validator {
    Validator::from_rule(Rule::LengthGt { min }, move |value| {
        if value.len() >= min {
            Ok(())
        } else {
            Err(format!("too short (at least {min} bytes)"))
        }
    })
}

/// Accepts values of at most `max` bytes.
pub fn length_lt(max: usize) -> Validator {
    Validator::from_rule(Rule::LengthLt { max }, move |value| {
        if value.len() <= max {
            Ok(())
        } else {
            Err(format!("too long (at most {max} bytes)"))
        }
    })
}

/// Accepts base-10 integers in `[min, max]`.
pub fn number_range(min: i64, max: i64) -> Validator {
    Validator::from_rule(Rule::NumberRange { min, max }, move |value| {
        let n = parse_number(value)?;
        if n >= min && n <= max {
            Ok(())
        } else {
            Err(format!("value must be within [{min}, {max}]"))
        }
    })
}

/// Accepts base-10 integers no smaller than `min`.
pub fn number_gt(min: i64) -> Validator {
    Validator::from_rule(Rule::NumberGt { min }, move |value| {
        if parse_number(value)? >= min {
            Ok(())
        } else {
            Err(format!("too small (minimum {min})"))
        }
    })
}

/// Accepts base-10 integers no larger than `max`.
pub fn number_lt(max: i64) -> Validator {
    Validator::from_rule(Rule::NumberLt { max }, move |value| {
        if parse_number(value)? <= max {
            Ok(())
        } else {
            Err(format!("too large (maximum {max})"))
        }
    })
}

/// Accepts values containing a match of `pattern`.
///
/// A pattern that does not compile rejects every value with
/// `"validation failed"`; it is not treated as a declaration error.
pub fn regex(pattern: &str) -> Validator {
    let compiled = Regex::new(pattern).ok();
    Validator::from_rule(
        Rule::Regex {
            pattern: pattern.to_string(),
        },
        move |value| match &compiled {
            None => Err("validation failed".to_string()),
            Some(re) if re.is_match(value) => Ok(()),
            Some(_) => Err("invalid format".to_string()),
        },
    )
}
