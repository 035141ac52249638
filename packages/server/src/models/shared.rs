use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Common pagination query parameters.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// Page number (1-based, defaults to 1).
    pub page: Option<u64>,
    /// Items per page (defaults to 20, max 100).
    pub per_page: Option<u64>,
}

impl PageQuery {
    /// Clamped (page, per_page) pair.
    pub fn clamped(&self) -> (u64, u64) {
        let page = Ord::max(self.page.unwrap_or(1), 1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        (page, per_page)
    }
}

/// Validate a trimmed display name (1-256 Unicode characters).
pub fn validate_name(name: &str, field: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}

/// Validate an email address.
///
/// Matches the shape `local@host.tld` with no whitespace and a single `@`;
/// no attempt at full RFC 5322 conformance.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let ok = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if !ok {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    Ok(())
}
