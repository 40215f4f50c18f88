//! Fixed label/code tables for the categorical measurements.
//!
//! Labels are only for display; the code is what goes on the wire.

use crate::record::Field;
use serde::Serialize;

/// One selectable label and the numeric code sent for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CodeOption {
    pub label: &'static str,
    pub code: i64,
}

const fn opt(label: &'static str, code: i64) -> CodeOption {
    CodeOption { label, code }
}

pub const SEX: &[CodeOption] = &[opt("Female", 0), opt("Male", 1)];

pub const CHEST_PAIN: &[CodeOption] = &[
    opt("Typical angina", 1),
    opt("Atypical angina", 2),
    opt("Non-anginal pain", 3),
    opt("Asymptomatic", 4),
];

pub const YES_NO: &[CodeOption] = &[opt("No", 0), opt("Yes", 1)];

pub const RESTING_ECG: &[CodeOption] = &[opt("Normal", 0), opt("Left ventricular hypertrophy", 2)];

pub const ST_SLOPE: &[CodeOption] = &[opt("Upsloping", 1), opt("Flat", 2), opt("Downsloping", 3)];

pub const VESSELS: &[CodeOption] = &[opt("0", 0), opt("1", 1), opt("2", 2), opt("3", 3)];

pub const THALASSEMIA: &[CodeOption] = &[
    opt("Normal", 3),
    opt("Fixed defect", 6),
    opt("Reversible defect", 7),
];

/// Table for `field`, or `None` when the field is a free numeric input.
pub fn options_for(field: Field) -> Option<&'static [CodeOption]> {
    match field {
        Field::Sex => Some(SEX),
        Field::Cp => Some(CHEST_PAIN),
        Field::Fbs | Field::Exang => Some(YES_NO),
        Field::Restecg => Some(RESTING_ECG),
        Field::Slope => Some(ST_SLOPE),
        Field::Ca => Some(VESSELS),
        Field::Thal => Some(THALASSEMIA),
        Field::Age | Field::Trestbps | Field::Chol | Field::Thalach | Field::Oldpeak => None,
    }
}

/// Label for `value` in `options`, if `value` is exactly one of the codes.
pub fn label_for(options: &[CodeOption], value: f64) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.code as f64 == value)
        .map(|option| option.label)
}

/// Code for a label, compared case-insensitively.
pub fn code_for(options: &[CodeOption], label: &str) -> Option<i64> {
    options
        .iter()
        .find(|option| option.label.eq_ignore_ascii_case(label.trim()))
        .map(|option| option.code)
}
