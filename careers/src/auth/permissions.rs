//! Tenant ownership checks.
//!
//! A recruiter may only act on resources of their own company. Handlers resolve the owning
//! company of the target (path, body or stored row) and call [`require_company`] before any
//! write.

use crate::{
    api::models::auth::CurrentRecruiter,
    errors::{Error, Result},
    types::{CompanyId, Operation},
};

/// `Ok` if `company_id` is the caller's company, otherwise `403`.
pub fn require_company(current: &CurrentRecruiter, company_id: CompanyId, action: Operation, resource: &str) -> Result<()> {
    if current.company_id == company_id {
        Ok(())
    } else {
        Err(Error::InsufficientPermissions {
            action,
            resource: resource.to_string(),
        })
    }
}
