//! The clinical input record and its wire body.
//!
//! A [`ClinicalRecord`] always carries all thirteen measurements. Values are plain `f64`s so
//! that raw form input can be stored exactly as it was coerced, including `NaN`. Finiteness is
//! only enforced when the record is turned into a [`PredictRequest`].

use crate::codes::{self, CodeOption};
use crate::{FormError, PredictError, PredictResult};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the thirteen recognised measurement names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; 13] = [
        Field::Age,
        Field::Sex,
        Field::Cp,
        Field::Trestbps,
        Field::Chol,
        Field::Fbs,
        Field::Restecg,
        Field::Thalach,
        Field::Exang,
        Field::Oldpeak,
        Field::Slope,
        Field::Ca,
        Field::Thal,
    ];

    /// The JSON key used for this field.
    pub fn name(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Sex => "sex",
            Field::Cp => "cp",
            Field::Trestbps => "trestbps",
            Field::Chol => "chol",
            Field::Fbs => "fbs",
            Field::Restecg => "restecg",
            Field::Thalach => "thalach",
            Field::Exang => "exang",
            Field::Oldpeak => "oldpeak",
            Field::Slope => "slope",
            Field::Ca => "ca",
            Field::Thal => "thal",
        }
    }

    /// Human-readable caption shown next to the input.
    pub fn caption(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Sex => "Sex",
            Field::Cp => "Chest Pain Type",
            Field::Trestbps => "Resting Blood Pressure",
            Field::Chol => "Cholesterol",
            Field::Fbs => "Fasting Blood Sugar > 120 mg/dl",
            Field::Restecg => "Resting ECG",
            Field::Thalach => "Max Heart Rate Achieved",
            Field::Exang => "Exercise Induced Angina",
            Field::Oldpeak => "ST Depression (oldpeak)",
            Field::Slope => "Slope of ST segment",
            Field::Ca => "Number of major vessels (ca)",
            Field::Thal => "Thalassemia",
        }
    }

    /// Label/code table for categorical fields, `None` for free numeric inputs.
    pub fn options(self) -> Option<&'static [CodeOption]> {
        codes::options_for(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_owned()))
    }
}

/// Coerce raw control text to a number.
///
/// Surrounding whitespace is ignored and blank input reads as zero. Anything that does not
/// parse becomes `NaN`; it is not rejected here.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Thirteen numeric measurements describing one patient.
///
/// Serialises with the same number rules as [`PredictRequest`]; a non-finite value becomes
/// `null` in JSON.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClinicalRecord {
    #[serde(serialize_with = "serialize_wire_number")]
    pub age: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub sex: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub cp: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub trestbps: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub chol: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub fbs: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub restecg: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub thalach: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub exang: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub oldpeak: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub slope: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub ca: f64,
    #[serde(serialize_with = "serialize_wire_number")]
    pub thal: f64,
}

impl Default for ClinicalRecord {
    // cp=0 and thal=1 sit outside their option tables; see `off_table_fields`.
    fn default() -> Self {
        Self {
            age: 50.0,
            sex: 1.0,
            cp: 0.0,
            trestbps: 120.0,
            chol: 200.0,
            fbs: 0.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 1.0,
            slope: 1.0,
            ca: 0.0,
            thal: 1.0,
        }
    }
}

impl ClinicalRecord {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Age => self.age,
            Field::Sex => self.sex,
            Field::Cp => self.cp,
            Field::Trestbps => self.trestbps,
            Field::Chol => self.chol,
            Field::Fbs => self.fbs,
            Field::Restecg => self.restecg,
            Field::Thalach => self.thalach,
            Field::Exang => self.exang,
            Field::Oldpeak => self.oldpeak,
            Field::Slope => self.slope,
            Field::Ca => self.ca,
            Field::Thal => self.thal,
        }
    }

    /// Return a copy with exactly one field replaced.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        let slot = match field {
            Field::Age => &mut self.age,
            Field::Sex => &mut self.sex,
            Field::Cp => &mut self.cp,
            Field::Trestbps => &mut self.trestbps,
            Field::Chol => &mut self.chol,
            Field::Fbs => &mut self.fbs,
            Field::Restecg => &mut self.restecg,
            Field::Thalach => &mut self.thalach,
            Field::Exang => &mut self.exang,
            Field::Oldpeak => &mut self.oldpeak,
            Field::Slope => &mut self.slope,
            Field::Ca => &mut self.ca,
            Field::Thal => &mut self.thal,
        };
        *slot = value;
        self
    }

    /// Categorical fields whose current value is not a code in their table.
    pub fn off_table_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| match field.options() {
                Some(options) => codes::label_for(options, self.get(field)).is_none(),
                None => false,
            })
            .collect()
    }

    /// Build the outbound body.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::NonFiniteField`] for the first field holding `NaN` or an infinity,
    /// since neither has a JSON representation.
    pub fn to_request(&self) -> PredictResult<PredictRequest> {
        if let Some(field) = Field::ALL
            .into_iter()
            .find(|&field| !self.get(field).is_finite())
        {
            return Err(PredictError::NonFiniteField { field });
        }

        Ok(PredictRequest {
            age: WireNumber(self.age),
            sex: WireNumber(self.sex),
            cp: WireNumber(self.cp),
            trestbps: WireNumber(self.trestbps),
            chol: WireNumber(self.chol),
            fbs: WireNumber(self.fbs),
            restecg: WireNumber(self.restecg),
            thalach: WireNumber(self.thalach),
            exang: WireNumber(self.exang),
            oldpeak: WireNumber(self.oldpeak),
            slope: WireNumber(self.slope),
            ca: WireNumber(self.ca),
            thal: WireNumber(self.thal),
        })
    }
}

/// A finite number that serialises integral values as JSON integers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WireNumber(f64);

impl WireNumber {
    // Largest integer f64 represents exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
}

impl Serialize for WireNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_wire_number(&self.0, serializer)
    }
}

fn serialize_wire_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() <= WireNumber::MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// JSON body of a `/predict` or `/debug` request. Keys serialise in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PredictRequest {
    pub age: WireNumber,
    pub sex: WireNumber,
    pub cp: WireNumber,
    pub trestbps: WireNumber,
    pub chol: WireNumber,
    pub fbs: WireNumber,
    pub restecg: WireNumber,
    pub thalach: WireNumber,
    pub exang: WireNumber,
    pub oldpeak: WireNumber,
    pub slope: WireNumber,
    pub ca: WireNumber,
    pub thal: WireNumber,
}

impl PredictRequest {
    pub fn to_json(&self) -> String {
        // A struct of finite numbers cannot fail to serialise.
        serde_json::to_string(self).unwrap_or_default()
    }
}
