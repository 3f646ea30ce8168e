//! # Document Field Mapping
//!
//! Turns a submission plus the configuration into the flat slot map the
//! fillable document template expects.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Slot Sources                                     │
//! │                                                                         │
//! │  Submission ─────► name (x2), signature, birth date (x2), street (x2), │
//! │                    zip + city (x2), id number, phone                   │
//! │                                                                         │
//! │  Age rule ───────► signature caption (self / legal guardian)           │
//! │                                                                         │
//! │  Ledger ─────────► ldnr                                                │
//! │                                                                         │
//! │  Configuration ──► test center (street, zip + city, phone, email),     │
//! │                    test (manufacturer, PZN, ref), tester name          │
//! │                                                                         │
//! │  now ────────────► issue date/place, test start (+2 min),              │
//! │                    test end (+17 min)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::age::is_at_least;
use crate::config::Configuration;
use crate::submission::Submission;
use crate::ADULT_AGE;

/// Caption under the signature when the tested person signs.
pub const CAPTION_SELF: &str = "Unterschrift der zu testenden Person";

/// Caption under the signature when a legal guardian signs.
pub const CAPTION_GUARDIAN: &str = "Unterschrift der\nErziehungsberechtigten Person";

/// Test start relative to the submission time.
pub const TEST_START_OFFSET_MINUTES: i64 = 2;

/// Test end relative to the submission time.
pub const TEST_END_OFFSET_MINUTES: i64 = 17;

const DATE_FORMAT: &str = "%d.%m.%Y";
const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Slot names of the document template.
pub mod slot {
    pub const NAME_PAGE1: &str = "firstLastNamePage1";
    pub const NAME_PAGE2: &str = "firstLastNamePage2";
    pub const ID_NUMBER: &str = "idNumber";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const SIGNATURE: &str = "signature";
    pub const SIGNATURE_TEXT: &str = "signatureText";
    pub const BIRTH_DATE_PAGE1: &str = "bdayPage1";
    pub const BIRTH_DATE_PAGE2: &str = "bdayPage2";
    pub const STREET_PAGE1: &str = "streetNoPage1";
    pub const STREET_PAGE2: &str = "streetNoPage2";
    pub const POSTAL_CITY_PAGE1: &str = "plzCityPage1";
    pub const POSTAL_CITY_PAGE2: &str = "plzCityPage2";
    pub const ISSUE_DATE: &str = "date";
    pub const TEST_TIME: &str = "testTime";
    pub const TEST_TIME_START: &str = "testTimeStart";
    pub const TEST_TIME_END: &str = "testTimeEnd";
    pub const REFERENCE: &str = "ldnr";
    pub const CENTER_POSTAL_CITY: &str = "tcPlzCity";
    pub const CENTER_STREET: &str = "tcStreetNo";
    pub const CENTER_PHONE: &str = "tcPhone";
    pub const CENTER_EMAIL: &str = "tcEmail";
    pub const TEST_MANUFACTURER: &str = "testManufacturer";
    pub const TEST_PZN: &str = "testPzn";
    pub const TEST_REF: &str = "testRef";
    pub const TESTER_NAME: &str = "testerName";
}

/// Slot name to value map handed to the document backend.
///
/// Ordered, so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFields(BTreeMap<&'static str, String>);

impl DocumentFields {
    /// Builds the field map for one submission.
    ///
    /// `reference` is the number issued for this document and `now` the
    /// local submission time; both are supplied by the caller so the
    /// mapping stays deterministic.
    pub fn map(
        submission: &Submission,
        config: &Configuration,
        reference: &str,
        now: NaiveDateTime,
    ) -> Self {
        let caption = if is_at_least(submission.birth_date, ADULT_AGE, now.date()) {
            CAPTION_SELF
        } else {
            CAPTION_GUARDIAN
        };

        let name = submission.full_name();
        let birth_date = submission.birth_date.format(DATE_FORMAT).to_string();
        let postal_city = submission.postal_code_city();
        let city = &config.test_center.city;

        let start = (now + Duration::minutes(TEST_START_OFFSET_MINUTES))
            .format(DATE_TIME_FORMAT)
            .to_string();
        let end = (now + Duration::minutes(TEST_END_OFFSET_MINUTES))
            .format(DATE_TIME_FORMAT)
            .to_string();

        let mut fields = BTreeMap::new();
        fields.insert(slot::NAME_PAGE1, name.clone());
        fields.insert(slot::NAME_PAGE2, name.clone());
        fields.insert(slot::SIGNATURE, name);
        fields.insert(slot::SIGNATURE_TEXT, caption.to_string());
        fields.insert(slot::ID_NUMBER, submission.id_number.clone());
        fields.insert(slot::PHONE_NUMBER, submission.phone.clone());
        fields.insert(slot::BIRTH_DATE_PAGE1, birth_date.clone());
        fields.insert(slot::BIRTH_DATE_PAGE2, birth_date);
        fields.insert(slot::STREET_PAGE1, submission.street.clone());
        fields.insert(slot::STREET_PAGE2, submission.street.clone());
        fields.insert(slot::POSTAL_CITY_PAGE1, postal_city.clone());
        fields.insert(slot::POSTAL_CITY_PAGE2, postal_city);
        fields.insert(
            slot::ISSUE_DATE,
            format!("{}, {}", city, now.format(DATE_FORMAT)),
        );
        fields.insert(slot::TEST_TIME, format!("{}, {}", city, start));
        fields.insert(slot::TEST_TIME_START, start);
        fields.insert(slot::TEST_TIME_END, end);
        fields.insert(slot::REFERENCE, reference.to_string());
        fields.insert(
            slot::CENTER_POSTAL_CITY,
            config.test_center.postal_code_city(),
        );
        fields.insert(slot::CENTER_STREET, config.test_center.street.clone());
        fields.insert(slot::CENTER_PHONE, config.test_center.phone.clone());
        fields.insert(slot::CENTER_EMAIL, config.test_center.email.clone());
        fields.insert(slot::TEST_MANUFACTURER, config.test.manufacturer.clone());
        fields.insert(slot::TEST_PZN, config.test.pzn.clone());
        fields.insert(slot::TEST_REF, config.test.reference_code.clone());
        fields.insert(slot::TESTER_NAME, config.tester.name.clone());

        DocumentFields(fields)
    }

    /// Returns the value of a slot.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    /// Iterates slots in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        SequenceSettings, ServerSettings, TestCenterSettings, TestSettings, TesterSettings,
        TimeoutSettings,
    };
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config() -> Configuration {
        Configuration {
            tester: TesterSettings {
                name: "Max Prüfer".into(),
            },
            test_center: TestCenterSettings {
                street: "Hauptstr. 1".into(),
                postal_code: "12345".into(),
                city: "Musterstadt".into(),
                phone: "0123 456789".into(),
                email: "test@example.org".into(),
            },
            sequence: SequenceSettings {
                prefix: "#OO-".into(),
                counter: 30,
                num_length: 3,
            },
            test: TestSettings {
                manufacturer: "ACME Diagnostics".into(),
                pzn: "12345678".into(),
                reference_code: "REF-1".into(),
            },
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 8080,
                save_path: PathBuf::from("out"),
                template_path: PathBuf::from("formular.pdf"),
                launch_viewer: false,
                timeout: TimeoutSettings::default(),
            },
        }
    }

    fn submission(birth_date: NaiveDate) -> Submission {
        Submission {
            first_name: "Anna".into(),
            last_name: "Muster".into(),
            street: "Weg 2".into(),
            postal_code: "54321".into(),
            city: "Beispielheim".into(),
            birth_date,
            displayed_reference: "#OO-030".into(),
            phone: String::new(),
            id_number: String::new(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 58, 30)
            .unwrap()
    }

    #[test]
    fn test_minor_gets_guardian_caption() {
        let birth = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let fields = DocumentFields::map(&submission(birth), &config(), "#OO-030", now());

        assert_eq!(fields.get(slot::SIGNATURE_TEXT), Some(CAPTION_GUARDIAN));
        assert_eq!(fields.get(slot::BIRTH_DATE_PAGE1), Some("01.01.2010"));
        assert_eq!(fields.get(slot::BIRTH_DATE_PAGE2), Some("01.01.2010"));
    }

    #[test]
    fn test_adult_signs_themselves() {
        let birth = NaiveDate::from_ymd_opt(2006, 6, 15).unwrap();
        let fields = DocumentFields::map(&submission(birth), &config(), "#OO-030", now());

        assert_eq!(fields.get(slot::SIGNATURE_TEXT), Some(CAPTION_SELF));
    }

    #[test]
    fn test_person_and_center_slots() {
        let birth = NaiveDate::from_ymd_opt(1990, 3, 4).unwrap();
        let fields = DocumentFields::map(&submission(birth), &config(), "#OO-031", now());

        assert_eq!(fields.get(slot::NAME_PAGE1), Some("Anna Muster"));
        assert_eq!(fields.get(slot::SIGNATURE), Some("Anna Muster"));
        assert_eq!(fields.get(slot::POSTAL_CITY_PAGE2), Some("54321 Beispielheim"));
        assert_eq!(fields.get(slot::STREET_PAGE1), Some("Weg 2"));
        assert_eq!(fields.get(slot::REFERENCE), Some("#OO-031"));
        assert_eq!(fields.get(slot::CENTER_STREET), Some("Hauptstr. 1"));
        assert_eq!(fields.get(slot::CENTER_POSTAL_CITY), Some("12345 Musterstadt"));
        assert_eq!(fields.get(slot::CENTER_EMAIL), Some("test@example.org"));
        assert_eq!(fields.get(slot::TEST_MANUFACTURER), Some("ACME Diagnostics"));
        assert_eq!(fields.get(slot::TEST_REF), Some("REF-1"));
        assert_eq!(fields.get(slot::TESTER_NAME), Some("Max Prüfer"));
        assert_eq!(fields.get(slot::ID_NUMBER), Some(""));
    }

    #[test]
    fn test_time_slots() {
        let birth = NaiveDate::from_ymd_opt(1990, 3, 4).unwrap();
        let fields = DocumentFields::map(&submission(birth), &config(), "#OO-030", now());

        assert_eq!(fields.get(slot::ISSUE_DATE), Some("Musterstadt, 15.06.2024"));
        assert_eq!(fields.get(slot::TEST_TIME_START), Some("15.06.2024 10:00"));
        assert_eq!(fields.get(slot::TEST_TIME_END), Some("15.06.2024 10:15"));
        assert_eq!(
            fields.get(slot::TEST_TIME),
            Some("Musterstadt, 15.06.2024 10:00")
        );
    }

    #[test]
    fn test_every_slot_is_filled() {
        let birth = NaiveDate::from_ymd_opt(1990, 3, 4).unwrap();
        let fields = DocumentFields::map(&submission(birth), &config(), "#OO-030", now());

        assert_eq!(fields.len(), 25);
        let names: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
