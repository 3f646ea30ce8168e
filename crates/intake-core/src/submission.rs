//! # Submissions
//!
//! The intake form as it arrives over HTTP ([`RawSubmission`]) and as the
//! rest of the pipeline sees it ([`Submission`]).
//!
//! Nothing here outlives a single request.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::SubmissionError;

/// Date format of the `bday` form field (HTML `<input type="date">`).
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// The urlencoded form exactly as posted to `/fillform`.
///
/// Every field defaults to empty so a missing field surfaces as a
/// [`SubmissionError`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub lname: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub bday: String,
    /// The reference shown on the page the form was submitted from.
    #[serde(default)]
    pub ldnr: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub idnumber: String,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub birth_date: NaiveDate,
    /// Reference the operator saw when filling in the form.
    pub displayed_reference: String,
    pub phone: String,
    pub id_number: String,
}

impl Submission {
    /// Validates a raw form.
    ///
    /// ## Rules
    /// - `fname`, `lname` and `bday` must not be blank
    /// - `bday` must be a `YYYY-MM-DD` calendar date
    ///
    /// All other fields are passed through trimmed; the document backend is
    /// trusted with their content.
    pub fn parse(raw: RawSubmission) -> Result<Self, SubmissionError> {
        let first_name = required("fname", &raw.fname)?;
        let last_name = required("lname", &raw.lname)?;
        let bday = required("bday", &raw.bday)?;

        let birth_date = NaiveDate::parse_from_str(&bday, FORM_DATE_FORMAT).map_err(|_| {
            SubmissionError::InvalidDate {
                field: "bday",
                value: bday.clone(),
            }
        })?;

        Ok(Submission {
            first_name,
            last_name,
            street: raw.street.trim().to_string(),
            postal_code: raw.zip.trim().to_string(),
            city: raw.city.trim().to_string(),
            birth_date,
            displayed_reference: raw.ldnr.trim().to_string(),
            phone: raw.phone.trim().to_string(),
            id_number: raw.idnumber.trim().to_string(),
        })
    }

    /// Returns `"<first> <last>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns `"<postal code> <city>"`.
    pub fn postal_code_city(&self) -> String {
        format!("{} {}", self.postal_code, self.city)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, SubmissionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SubmissionError::Required { field });
    }
    Ok(value.to_string())
}
