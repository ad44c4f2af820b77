//! Field-format validation for resume documents.
//!
//! Checks are deliberately forgiving: empty values always pass, and only
//! structurally broken values are rejected. Content quality is the editor's
//! problem, not the model's.

use thiserror::Error;

use crate::resume::JsonResume;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error("invalid URL format")]
    InvalidUrl,
    #[error("invalid phone format")]
    InvalidPhone,
    #[error("invalid date format (expected YYYY, YYYY-MM or YYYY-MM-DD)")]
    InvalidDate,
}

/// Validates every format-bearing field of a resume document.
pub fn validate_resume(resume: &JsonResume) -> Result<(), ValidationError> {
    if let Some(basics) = &resume.basics {
        check_email(&basics.email)?;
        check_url(basics.url.as_deref())?;
        check_phone(basics.phone.as_deref())?;
        for profile in &basics.profiles {
            check_url(profile.url.as_deref())?;
        }
    }
    for job in &resume.work {
        check_url(job.url.as_deref())?;
        check_date(job.start_date.as_deref())?;
        check_date(job.end_date.as_deref())?;
    }
    for edu in &resume.education {
        check_url(edu.url.as_deref())?;
        check_date(edu.start_date.as_deref())?;
        check_date(edu.end_date.as_deref())?;
    }
    for vol in &resume.volunteer {
        check_url(vol.url.as_deref())?;
        check_date(vol.start_date.as_deref())?;
        check_date(vol.end_date.as_deref())?;
    }
    for project in &resume.projects {
        check_url(project.url.as_deref())?;
        check_date(project.start_date.as_deref())?;
        check_date(project.end_date.as_deref())?;
    }
    for cert in &resume.certificates {
        check_url(cert.url.as_deref())?;
        check_date(cert.date.as_deref())?;
    }
    for publication in &resume.publications {
        check_url(publication.url.as_deref())?;
        check_date(publication.release_date.as_deref())?;
    }
    for award in &resume.awards {
        check_date(award.date.as_deref())?;
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }
    // local@domain with a dot somewhere after the @
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn check_url(url: Option<&str>) -> Result<(), ValidationError> {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(());
    };
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or(ValidationError::InvalidUrl)?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

fn check_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let allowed = |c: char| {
        c.is_ascii_digit() || c.is_ascii_whitespace() || "-+().".contains(c)
    };
    if phone.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

fn check_date(date: Option<&str>) -> Result<(), ValidationError> {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(());
    };
    let digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());
    let mut parts = date.split('-');
    let year_ok = parts.next().map(|y| digits(y, 4)).unwrap_or(false);
    let month_ok = parts.next().map(|m| digits(m, 2)).unwrap_or(true);
    let day_ok = parts.next().map(|d| digits(d, 2)).unwrap_or(true);
    if year_ok && month_ok && day_ok && parts.next().is_none() {
        Ok(())
    } else {
        Err(ValidationError::InvalidDate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Basics, Work};

    #[test]
    fn test_empty_resume_is_valid() {
        assert!(validate_resume(&JsonResume::empty()).is_ok());
    }

    #[test]
    fn test_blank_fields_always_pass() {
        assert!(check_email("").is_ok());
        assert!(check_url(None).is_ok());
        assert!(check_url(Some("  ")).is_ok());
        assert!(check_phone(Some("")).is_ok());
        assert!(check_date(Some("")).is_ok());
    }

    #[test]
    fn test_email_rejects_missing_domain() {
        assert_eq!(check_email("jane@"), Err(ValidationError::InvalidEmail));
        assert_eq!(check_email("jane"), Err(ValidationError::InvalidEmail));
        assert_eq!(check_email("jane@localhost"), Err(ValidationError::InvalidEmail));
        assert!(check_email("jane@example.com").is_ok());
    }

    #[test]
    fn test_url_requires_scheme_and_host() {
        assert!(check_url(Some("https://example.com/cv")).is_ok());
        assert!(check_url(Some("http://example.com")).is_ok());
        assert_eq!(
            check_url(Some("example.com")),
            Err(ValidationError::InvalidUrl)
        );
        assert_eq!(
            check_url(Some("https://")),
            Err(ValidationError::InvalidUrl)
        );
    }

    #[test]
    fn test_phone_charset() {
        assert!(check_phone(Some("+1 (555) 123-4567")).is_ok());
        assert_eq!(
            check_phone(Some("call me")),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn test_date_shapes() {
        assert!(check_date(Some("2020")).is_ok());
        assert!(check_date(Some("2020-01")).is_ok());
        assert!(check_date(Some("2020-01-15")).is_ok());
        assert_eq!(check_date(Some("01-2020")), Err(ValidationError::InvalidDate));
        assert_eq!(check_date(Some("2020-1")), Err(ValidationError::InvalidDate));
        assert_eq!(
            check_date(Some("soon")),
            Err(ValidationError::InvalidDate)
        );
    }

    #[test]
    fn test_work_dates_are_checked() {
        let mut resume = JsonResume::empty();
        resume.basics = Some(Basics {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            ..Basics::default()
        });
        resume.work.push(Work {
            start_date: Some("whenever".to_string()),
            ..Work::default()
        });
        assert_eq!(validate_resume(&resume), Err(ValidationError::InvalidDate));
    }
}
