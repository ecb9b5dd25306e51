//! Catalog integrity checks.
//!
//! Run once after loading and before building any demand. Detects:
//! - Duplicate codes (subjects, teachers, rooms, cohorts)
//! - Subjects owned by an unknown cohort
//! - Teachers qualified for unknown subjects
//! - Subjects requiring zero lessons
//! - Catalogs with no subjects, teachers or rooms
//!
//! Recoverable gaps are reported as [`CatalogWarning`]s: the optimizer runs
//! with a degraded fallback, and the caller gets told which one.

use super::Catalog;
use std::collections::HashSet;

/// A defect that prevents optimization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {kind} code: {code}")]
    DuplicateCode { kind: &'static str, code: String },

    #[error("subject '{subject}' belongs to unknown cohort '{cohort}'")]
    UnknownCohort { subject: String, cohort: String },

    #[error("teacher '{teacher}' is qualified for unknown subject '{subject}'")]
    UnknownSubject { teacher: String, subject: String },

    #[error("subject '{0}' requires zero lessons")]
    ZeroLessons(String),

    #[error("catalog has no subjects")]
    NoSubjects,

    #[error("catalog has no teachers")]
    NoTeachers,

    #[error("catalog has no rooms")]
    NoRooms,
}

/// A gap the optimizer works around with a fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogWarning {
    #[error("subject '{subject}' has no qualified teacher; falling back to '{fallback}'")]
    NoQualifiedTeacher { subject: String, fallback: String },

    #[error("cohort '{cohort}' ({students} students) fits no room; falling back to '{fallback}'")]
    NoAdequateRoom {
        cohort: String,
        students: u32,
        fallback: String,
    },

    #[error("teacher '{0}' declared an empty availability and is never available")]
    NeverAvailable(String),
}

/// Validates a catalog.
///
/// # Returns
/// `Ok(warnings)` if the catalog is usable, `Err(errors)` with every
/// detected defect otherwise.
pub fn validate(catalog: &Catalog) -> Result<Vec<CatalogWarning>, Vec<CatalogError>> {
    let mut errors = Vec::new();

    if catalog.subjects().is_empty() {
        errors.push(CatalogError::NoSubjects);
    }
    if catalog.teachers().is_empty() {
        errors.push(CatalogError::NoTeachers);
    }
    if catalog.rooms().is_empty() {
        errors.push(CatalogError::NoRooms);
    }

    check_duplicates("subject", catalog.subjects().iter().map(|s| s.code.as_str()), &mut errors);
    check_duplicates("teacher", catalog.teachers().iter().map(|t| t.code.as_str()), &mut errors);
    check_duplicates("room", catalog.rooms().iter().map(|r| r.code.as_str()), &mut errors);
    check_duplicates("cohort", catalog.cohorts().iter().map(|c| c.code.as_str()), &mut errors);

    for (i, subject) in catalog.subjects().iter().enumerate() {
        if subject.required_lessons == 0 {
            errors.push(CatalogError::ZeroLessons(subject.code.clone()));
        }
        if catalog.subject_cohort(i).is_none() {
            errors.push(CatalogError::UnknownCohort {
                subject: subject.code.clone(),
                cohort: subject.cohort.clone(),
            });
        }
    }

    let subject_codes: HashSet<&str> = catalog.subjects().iter().map(|s| s.code.as_str()).collect();
    for teacher in catalog.teachers() {
        for code in &teacher.subjects {
            if !subject_codes.contains(code.as_str()) {
                errors.push(CatalogError::UnknownSubject {
                    teacher: teacher.code.clone(),
                    subject: code.clone(),
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(collect_warnings(catalog))
}

fn check_duplicates<'a>(
    kind: &'static str,
    codes: impl Iterator<Item = &'a str>,
    errors: &mut Vec<CatalogError>,
) {
    let mut seen = HashSet::new();
    for code in codes {
        if !seen.insert(code) {
            errors.push(CatalogError::DuplicateCode {
                kind,
                code: code.to_string(),
            });
        }
    }
}

/// Warnings for a structurally valid catalog (teachers and rooms non-empty).
fn collect_warnings(catalog: &Catalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();

    for (i, subject) in catalog.subjects().iter().enumerate() {
        if catalog.qualified_teachers(i).is_empty() {
            warnings.push(CatalogWarning::NoQualifiedTeacher {
                subject: subject.code.clone(),
                fallback: catalog.teacher(0).code.clone(),
            });
        }
    }

    if let Some(largest) = catalog.largest_room() {
        for cohort in catalog.cohorts() {
            if catalog.adequate_rooms(cohort.students).is_empty() {
                warnings.push(CatalogWarning::NoAdequateRoom {
                    cohort: cohort.code.clone(),
                    students: cohort.students,
                    fallback: catalog.room(largest).code.clone(),
                });
            }
        }
    }

    for teacher in catalog.teachers() {
        if teacher.availability.as_ref().is_some_and(|w| w.is_empty()) {
            warnings.push(CatalogWarning::NeverAvailable(teacher.code.clone()));
        }
    }

    warnings
}
