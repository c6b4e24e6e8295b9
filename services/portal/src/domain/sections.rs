//! Wizard section payloads.
//!
//! Every field is optional on the wire so the same types serve partial
//! drafts, full creates and field-by-field updates. `validate` turns a
//! payload into the strict domain value; `apply_to` merges only the fields
//! that are present.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use admissions_domain::application::{EducationLevel, Gender, ProgramType};

use crate::domain::types::{EducationInfo, GuardianInfo, PersonalInfo, ProgramInfo};
use crate::error::PortalError;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationSections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfoInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_info: Option<GuardianInfoInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_info: Option<EducationInfoInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_info: Option<ProgramInfoInput>,
}

impl ApplicationSections {
    /// Sections present in `newer` replace ours; absent ones are kept.
    pub fn overlay(self, newer: ApplicationSections) -> Self {
        Self {
            personal_info: newer.personal_info.or(self.personal_info),
            guardian_info: newer.guardian_info.or(self.guardian_info),
            education_info: newer.education_info.or(self.education_info),
            program_info: newer.program_info.or(self.program_info),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.personal_info.is_none()
            && self.guardian_info.is_none()
            && self.education_info.is_none()
            && self.program_info.is_none()
    }

    /// Validate all four sections; each one is required.
    pub fn validate(
        &self,
    ) -> Result<(PersonalInfo, GuardianInfo, EducationInfo, ProgramInfo), PortalError> {
        let personal = require_section(&self.personal_info, "personalInfo")?.validate()?;
        let guardian = require_section(&self.guardian_info, "guardianInfo")?.validate()?;
        let education = require_section(&self.education_info, "educationInfo")?.validate()?;
        let program = require_section(&self.program_info, "programInfo")?.validate()?;
        Ok((personal, guardian, education, program))
    }
}

// ── Personal ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_address: Option<String>,
}

impl PersonalInfoInput {
    pub fn validate(&self) -> Result<PersonalInfo, PortalError> {
        Ok(PersonalInfo {
            first_name: required(&self.first_name, "personalInfo.firstName")?,
            surname: required(&self.surname, "personalInfo.surname")?,
            gender: required(&self.gender, "personalInfo.gender")?.parse::<Gender>()?,
            date_of_birth: parse_date(
                &required(&self.date_of_birth, "personalInfo.dateOfBirth")?,
                "personalInfo.dateOfBirth",
            )?,
            email: parse_email(&required(&self.email, "personalInfo.email")?)?,
            telephone: required(&self.telephone, "personalInfo.telephone")?,
            nationality: required(&self.nationality, "personalInfo.nationality")?,
            address: required(&self.address, "personalInfo.address")?,
            gps_address: optional(&self.gps_address),
        })
    }

    pub fn apply_to(&self, target: &mut PersonalInfo) -> Result<(), PortalError> {
        set_text(&mut target.first_name, &self.first_name, "personalInfo.firstName")?;
        set_text(&mut target.surname, &self.surname, "personalInfo.surname")?;
        if self.gender.is_some() {
            target.gender = required(&self.gender, "personalInfo.gender")?.parse()?;
        }
        if self.date_of_birth.is_some() {
            let raw = required(&self.date_of_birth, "personalInfo.dateOfBirth")?;
            target.date_of_birth = parse_date(&raw, "personalInfo.dateOfBirth")?;
        }
        if self.email.is_some() {
            target.email = parse_email(&required(&self.email, "personalInfo.email")?)?;
        }
        set_text(&mut target.telephone, &self.telephone, "personalInfo.telephone")?;
        set_text(&mut target.nationality, &self.nationality, "personalInfo.nationality")?;
        set_text(&mut target.address, &self.address, "personalInfo.address")?;
        if self.gps_address.is_some() {
            target.gps_address = optional(&self.gps_address);
        }
        Ok(())
    }
}

// ── Guardian ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianInfoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_telephone: Option<String>,
}

impl GuardianInfoInput {
    pub fn validate(&self) -> Result<GuardianInfo, PortalError> {
        Ok(GuardianInfo {
            guardian_name: required(&self.guardian_name, "guardianInfo.guardianName")?,
            guardian_occupation: required(
                &self.guardian_occupation,
                "guardianInfo.guardianOccupation",
            )?,
            guardian_telephone: required(
                &self.guardian_telephone,
                "guardianInfo.guardianTelephone",
            )?,
        })
    }

    pub fn apply_to(&self, target: &mut GuardianInfo) -> Result<(), PortalError> {
        set_text(
            &mut target.guardian_name,
            &self.guardian_name,
            "guardianInfo.guardianName",
        )?;
        set_text(
            &mut target.guardian_occupation,
            &self.guardian_occupation,
            "guardianInfo.guardianOccupation",
        )?;
        set_text(
            &mut target.guardian_telephone,
            &self.guardian_telephone,
            "guardianInfo.guardianTelephone",
        )
    }
}

// ── Education ─────────────────────────────────────────────────────────────────

/// The wizard posts the year either as a number or as a form string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
}

impl YearInput {
    fn parse(&self, field: &str) -> Result<i32, PortalError> {
        let year = match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse::<i32>().ok(),
        };
        match year {
            Some(y) if (MIN_YEAR..=MAX_YEAR).contains(&y) => Ok(y),
            _ => Err(PortalError::InvalidInput(format!(
                "{field} must be a year between {MIN_YEAR} and {MAX_YEAR}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationInfoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_completed: Option<YearInput>,
}

impl EducationInfoInput {
    pub fn validate(&self) -> Result<EducationInfo, PortalError> {
        let year = self.year_completed.as_ref().ok_or_else(|| {
            PortalError::MissingData("educationInfo.yearCompleted is required".to_owned())
        })?;
        Ok(EducationInfo {
            highest_education: required(
                &self.highest_education,
                "educationInfo.highestEducation",
            )?
            .parse::<EducationLevel>()?,
            year_completed: year.parse("educationInfo.yearCompleted")?,
        })
    }

    pub fn apply_to(&self, target: &mut EducationInfo) -> Result<(), PortalError> {
        if self.highest_education.is_some() {
            target.highest_education =
                required(&self.highest_education, "educationInfo.highestEducation")?.parse()?;
        }
        if let Some(year) = &self.year_completed {
            target.year_completed = year.parse("educationInfo.yearCompleted")?;
        }
        Ok(())
    }
}

// ── Program ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramInfoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_program: Option<String>,
}

impl ProgramInfoInput {
    pub fn validate(&self) -> Result<ProgramInfo, PortalError> {
        Ok(ProgramInfo {
            program_type: required(&self.program_type, "programInfo.programType")?
                .parse::<ProgramType>()?,
            specific_program: required(&self.specific_program, "programInfo.specificProgram")?,
        })
    }

    pub fn apply_to(&self, target: &mut ProgramInfo) -> Result<(), PortalError> {
        if self.program_type.is_some() {
            target.program_type =
                required(&self.program_type, "programInfo.programType")?.parse()?;
        }
        set_text(
            &mut target.specific_program,
            &self.specific_program,
            "programInfo.specificProgram",
        )
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn require_section<'a, T>(section: &'a Option<T>, name: &str) -> Result<&'a T, PortalError> {
    section
        .as_ref()
        .ok_or_else(|| PortalError::MissingData(format!("{name} is required")))
}

fn required(value: &Option<String>, field: &str) -> Result<String, PortalError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(PortalError::MissingData(format!("{field} is required"))),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn set_text(target: &mut String, value: &Option<String>, field: &str) -> Result<(), PortalError> {
    if value.is_some() {
        *target = required(value, field)?;
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, PortalError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| PortalError::InvalidInput(format!("{field} must be a date (YYYY-MM-DD)")))
}

fn parse_email(raw: &str) -> Result<String, PortalError> {
    let valid = raw
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        && !raw.contains(char::is_whitespace);
    if valid {
        Ok(raw.to_owned())
    } else {
        Err(PortalError::InvalidInput(
            "personalInfo.email is not a valid email address".to_owned(),
        ))
    }
}
