// src/documents/context.rs
use crate::db::PersonLookup;
use crate::domain::cpr::format_cpr;
use crate::domain::names::consolidate;
use crate::domain::{Cpr, DateFormatter};
use crate::errors::AttestError;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Which optional sections go on the certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateOptions {
    pub include_citizenship: bool,
    pub include_civil_status: bool,
    pub include_children: bool,
    pub include_name_history: bool,
    /// Address history covers stays that ended after this date.
    pub address_history_from: NaiveDate,
}

impl Default for CertificateOptions {
    fn default() -> Self {
        Self {
            include_citizenship: true,
            include_civil_status: true,
            include_children: true,
            include_name_history: true,
            address_history_from: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameHistoryRow {
    pub from: String,
    pub to: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressHistoryRow {
    pub from: String,
    pub to: String,
    pub address: String,
}

/// Values for the certificate template. Serialized field names are the
/// template's placeholder names; sections that were not requested (or have
/// nothing to report) are left out entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentContext {
    #[serde(rename = "cpr")]
    pub national_id: String,
    #[serde(rename = "address_name")]
    pub addressing_name: String,
    pub full_name: String,
    pub address: String,
    pub zip_city: String,
    pub birthdate: String,
    pub creation_date: String,
    pub case_number: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_history: Option<Vec<NameHistoryRow>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_history: Option<Vec<AddressHistoryRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizenship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub civil_status: Option<String>,
    #[serde(rename = "cpr_kids", skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
}

/// Placeholder printed for an empty section.
const NONE_MARK: &str = "-";

/// Collects and formats everything the certificate shows for one citizen.
/// Only reads from the lookup; the case number comes from the caller.
pub struct ContextBuilder<'a> {
    lookup: &'a dyn PersonLookup,
    dates: DateFormatter,
    today: NaiveDate,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(lookup: &'a dyn PersonLookup, dates: DateFormatter, today: NaiveDate) -> Self {
        Self {
            lookup,
            dates,
            today,
        }
    }

    /// `case_number` receives the citizen's full name and is called once,
    /// after every lookup and formatting step has succeeded.
    pub fn build<F>(
        &self,
        cpr: &Cpr,
        options: &CertificateOptions,
        case_number: F,
    ) -> Result<DocumentContext, AttestError>
    where
        F: FnOnce(&str) -> Result<String, AttestError>,
    {
        let person = self.lookup.person(cpr)?;
        let birthdate = self.dates.format_long(cpr.birth_date()?);

        let mut ctx = DocumentContext {
            national_id: format_cpr(&person.national_id),
            addressing_name: person.addressing_name,
            full_name: person.full_name,
            address: person.address,
            zip_city: person.zip_city,
            birthdate,
            creation_date: self.dates.format_long(self.today),
            case_number: String::new(),
            name_history: None,
            address_history: None,
            date_from: None,
            date_to: None,
            citizenship: None,
            civil_status: None,
            children: None,
        };

        if options.include_name_history {
            let records = self.lookup.name_records(cpr)?;
            let rows = consolidate(&records)?
                .into_iter()
                .map(|p| NameHistoryRow {
                    from: self.dates.format_short(p.from),
                    to: self.dates.format_short(p.to),
                    name: p.name,
                })
                .collect::<Vec<_>>();
            debug!(records = records.len(), periods = rows.len(), "name history consolidated");
            ctx.name_history = Some(rows);
        }

        let periods = self
            .lookup
            .address_history(cpr, options.address_history_from)?;
        debug!(periods = periods.len(), "address history fetched");
        // One unchanged address is not a history.
        if periods.len() > 1 {
            ctx.address_history = Some(
                periods
                    .iter()
                    .map(|p| AddressHistoryRow {
                        from: self.dates.format_short(p.move_in),
                        to: self.dates.format_short(p.move_out),
                        address: p.formatted_address(),
                    })
                    .collect(),
            );
            ctx.date_from = Some(self.dates.format_long(options.address_history_from));
            ctx.date_to = Some(self.dates.format_long(self.today));
        }

        if options.include_citizenship {
            let value = self.lookup.citizenship(cpr)?;
            ctx.citizenship = Some(value.unwrap_or_else(|| NONE_MARK.to_string()));
        }

        if options.include_civil_status {
            let value = self.lookup.civil_status(cpr)?;
            ctx.civil_status = Some(value.unwrap_or_else(|| NONE_MARK.to_string()));
        }

        if options.include_children {
            let kids = self.lookup.children(cpr)?;
            ctx.children = Some(if kids.is_empty() {
                NONE_MARK.to_string()
            } else {
                kids.iter()
                    .map(|k| format_cpr(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            });
        }

        ctx.case_number = case_number(&ctx.full_name)?;
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{CaseRegistry, FixedCaseNumber};
    use crate::domain::{AddressPeriod, NameRecord, PersonRecord};
    use std::cell::RefCell;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2024, 3, 5)
    }

    fn period(street: &str, from: NaiveDate, to: NaiveDate) -> AddressPeriod {
        AddressPeriod {
            move_in: from,
            move_out: to,
            street: street.into(),
            house_number: "01".into(),
            floor: "".into(),
            side: "".into(),
            postal_code: "8000".into(),
            city: "Aarhus C".into(),
        }
    }

    fn name(first: &str, last: &str, from: i64, to: i64) -> NameRecord {
        NameRecord {
            first_name: Some(first.into()),
            middle_name: None,
            last_name: Some(last.into()),
            valid_from: from,
            valid_to: to,
        }
    }

    /// In-memory citizen register.
    struct FakeRegister {
        names: Vec<NameRecord>,
        addresses: Vec<AddressPeriod>,
        children: Vec<String>,
        civil_status: Option<String>,
        children_down: bool,
        calls: RefCell<Vec<&'static str>>,
    }

    impl Default for FakeRegister {
        fn default() -> Self {
            Self {
                names: vec![
                    name("Anna", "Hansen", 20200101, 99991231),
                    name("Anna", "Hansen", 20190101, 20200101),
                    name("Anna", "Berg", 20180101, 20190101),
                ],
                addresses: vec![
                    period("Vestergade", ymd(2020, 5, 1), ymd(9999, 12, 31)),
                    period("Bygaden", ymd(2016, 2, 1), ymd(2020, 5, 1)),
                ],
                children: vec!["1503104321".into(), "2002124322".into()],
                civil_status: Some("Gift".into()),
                children_down: false,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PersonLookup for FakeRegister {
        fn person(&self, cpr: &Cpr) -> Result<PersonRecord, AttestError> {
            self.calls.borrow_mut().push("person");
            if cpr.digits() != "0101901234" {
                return Err(AttestError::UnknownCitizen(cpr.masked()));
            }
            Ok(PersonRecord {
                national_id: "0101901234".into(),
                addressing_name: "Anna Hansen".into(),
                full_name: "Anna Marie Hansen".into(),
                address: "Vestergade 1".into(),
                zip_city: "8000 Aarhus C".into(),
            })
        }

        fn name_records(&self, _: &Cpr) -> Result<Vec<NameRecord>, AttestError> {
            self.calls.borrow_mut().push("names");
            Ok(self.names.clone())
        }

        fn address_history(
            &self,
            _: &Cpr,
            _: NaiveDate,
        ) -> Result<Vec<AddressPeriod>, AttestError> {
            self.calls.borrow_mut().push("addresses");
            Ok(self.addresses.clone())
        }

        fn citizenship(&self, _: &Cpr) -> Result<Option<String>, AttestError> {
            self.calls.borrow_mut().push("citizenship");
            Ok(Some("Danmark".into()))
        }

        fn civil_status(&self, _: &Cpr) -> Result<Option<String>, AttestError> {
            self.calls.borrow_mut().push("civil_status");
            Ok(self.civil_status.clone())
        }

        fn children(&self, _: &Cpr) -> Result<Vec<String>, AttestError> {
            self.calls.borrow_mut().push("children");
            if self.children_down {
                return Err(AttestError::LookupFailure("children query failed".into()));
            }
            Ok(self.children.clone())
        }
    }

    /// Remembers who it opened cases for.
    #[derive(Default)]
    struct RecordingRegistry {
        parties: RefCell<Vec<String>>,
    }

    impl CaseRegistry for RecordingRegistry {
        fn allocate_case(&self, cpr: &Cpr, party_name: &str) -> Result<String, AttestError> {
            self.parties
                .borrow_mut()
                .push(format!("{} {party_name}", cpr.digits()));
            Ok("S2024-000042".into())
        }
    }

    fn cpr() -> Cpr {
        Cpr::parse("0101901234").unwrap()
    }

    fn build_with(
        register: &FakeRegister,
        cases: &dyn CaseRegistry,
        options: &CertificateOptions,
    ) -> Result<DocumentContext, AttestError> {
        let cpr = cpr();
        ContextBuilder::new(register, DateFormatter::default(), today())
            .build(&cpr, options, |party| cases.allocate_case(&cpr, party))
    }

    fn build(register: &FakeRegister, options: &CertificateOptions) -> DocumentContext {
        let cases = FixedCaseNumber("S1234-123456".into());
        build_with(register, &cases, options).unwrap()
    }

    #[test]
    fn mandatory_fields_are_always_present() {
        let register = FakeRegister::default();
        let ctx = build(&register, &CertificateOptions::default());

        assert_eq!(ctx.national_id, "010190-1234");
        assert_eq!(ctx.addressing_name, "Anna Hansen");
        assert_eq!(ctx.full_name, "Anna Marie Hansen");
        assert_eq!(ctx.birthdate, "1. januar 1990");
        assert_eq!(ctx.creation_date, "5. marts 2024");
        assert_eq!(ctx.case_number, "S1234-123456");
    }

    #[test]
    fn full_certificate_has_every_section() {
        let register = FakeRegister::default();
        let ctx = build(&register, &CertificateOptions::default());

        assert_eq!(
            ctx.name_history.unwrap(),
            vec![
                NameHistoryRow {
                    from: "01.01.2019".into(),
                    to: "-".into(),
                    name: "Anna Hansen".into()
                },
                NameHistoryRow {
                    from: "01.01.2018".into(),
                    to: "01.01.2019".into(),
                    name: "Anna Berg".into()
                },
            ]
        );

        let addresses = ctx.address_history.unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].from, "01.05.2020");
        assert_eq!(addresses[0].to, "-");
        assert_eq!(addresses[0].address, "Vestergade 1, 8000 Aarhus C");
        assert_eq!(ctx.date_from.as_deref(), Some("1. januar 2015"));
        assert_eq!(ctx.date_to.as_deref(), Some("5. marts 2024"));

        assert_eq!(ctx.citizenship.as_deref(), Some("Danmark"));
        assert_eq!(ctx.civil_status.as_deref(), Some("Gift"));
        assert_eq!(ctx.children.as_deref(), Some("150310-4321, 200212-4322"));
    }

    #[test]
    fn single_address_is_not_reported_as_history() {
        let register = FakeRegister {
            addresses: vec![period("Vestergade", ymd(2010, 1, 1), ymd(9999, 12, 31))],
            ..Default::default()
        };
        let ctx = build(&register, &CertificateOptions::default());

        assert!(ctx.address_history.is_none());
        assert!(ctx.date_from.is_none());
        assert!(ctx.date_to.is_none());

        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("address_history").is_none());
        assert!(json.get("date_from").is_none());
        assert!(json.get("date_to").is_none());
    }

    #[test]
    fn no_children_gives_dash() {
        let register = FakeRegister {
            children: vec![],
            ..Default::default()
        };
        let ctx = build(&register, &CertificateOptions::default());
        assert_eq!(ctx.children.as_deref(), Some("-"));
    }

    #[test]
    fn unknown_civil_status_gives_dash() {
        let register = FakeRegister {
            civil_status: None,
            ..Default::default()
        };
        let ctx = build(&register, &CertificateOptions::default());
        assert_eq!(ctx.civil_status.as_deref(), Some("-"));
    }

    #[test]
    fn unrequested_sections_are_not_looked_up() {
        let register = FakeRegister::default();
        let options = CertificateOptions {
            include_citizenship: false,
            include_civil_status: false,
            include_children: false,
            include_name_history: false,
            ..Default::default()
        };
        let ctx = build(&register, &options);

        assert_eq!(*register.calls.borrow(), vec!["person", "addresses"]);
        assert!(ctx.name_history.is_none());
        assert!(ctx.citizenship.is_none());
        assert!(ctx.civil_status.is_none());
        assert!(ctx.children.is_none());

        let json = serde_json::to_value(&ctx).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys.len(),
            11,
            "only mandatory fields and address history expected: {keys:?}"
        );
    }

    #[test]
    fn serialized_names_match_template_placeholders() {
        let register = FakeRegister::default();
        let json = serde_json::to_value(build(&register, &CertificateOptions::default())).unwrap();

        for key in [
            "cpr",
            "address_name",
            "full_name",
            "address",
            "zip_city",
            "birthdate",
            "creation_date",
            "case_number",
            "name_history",
            "address_history",
            "date_from",
            "date_to",
            "citizenship",
            "civil_status",
            "cpr_kids",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["name_history"][0]["name"], "Anna Hansen");
        assert_eq!(json["address_history"][1]["to"], "01.05.2020");
    }

    #[test]
    fn case_is_opened_in_the_citizens_name() {
        let register = FakeRegister::default();
        let cases = RecordingRegistry::default();
        let ctx = build_with(&register, &cases, &CertificateOptions::default()).unwrap();

        assert_eq!(ctx.case_number, "S2024-000042");
        assert_eq!(*cases.parties.borrow(), vec!["0101901234 Anna Marie Hansen"]);
    }

    #[test]
    fn case_number_is_requested_after_all_lookups() {
        let register = FakeRegister::default();
        let mut calls_at_allocation = Vec::new();
        let cpr = cpr();

        ContextBuilder::new(&register, DateFormatter::default(), today())
            .build(&cpr, &CertificateOptions::default(), |_| {
                calls_at_allocation = register.calls.borrow().clone();
                Ok("S1".into())
            })
            .unwrap();

        assert_eq!(
            calls_at_allocation,
            vec!["person", "names", "addresses", "citizenship", "civil_status", "children"]
        );
    }

    #[test]
    fn unknown_person_fails_without_opening_a_case() {
        let register = FakeRegister::default();
        let cases = RecordingRegistry::default();
        let unknown = Cpr::parse("0202021234").unwrap();
        let res = ContextBuilder::new(&register, DateFormatter::default(), today()).build(
            &unknown,
            &CertificateOptions::default(),
            |party| cases.allocate_case(&unknown, party),
        );

        assert!(matches!(res, Err(AttestError::UnknownCitizen(_))));
        assert!(cases.parties.borrow().is_empty());
    }

    #[test]
    fn empty_name_register_fails_without_opening_a_case() {
        let register = FakeRegister {
            names: vec![],
            ..Default::default()
        };
        let cases = RecordingRegistry::default();
        let res = build_with(&register, &cases, &CertificateOptions::default());

        assert!(matches!(res, Err(AttestError::PreconditionViolation(_))));
        assert!(cases.parties.borrow().is_empty());
    }

    #[test]
    fn failed_children_lookup_fails_without_opening_a_case() {
        let register = FakeRegister {
            children_down: true,
            ..Default::default()
        };
        let cases = RecordingRegistry::default();
        let res = build_with(&register, &cases, &CertificateOptions::default());

        assert!(matches!(res, Err(AttestError::LookupFailure(_))));
        assert!(cases.parties.borrow().is_empty());
    }
}
