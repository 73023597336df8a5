//! Issuance input.

use acad_core::AcademicRecord;
use acad_storage::{Attachment, PinningCredentials};

/// Everything an issuer supplies for one credential.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    /// Unvalidated; checked before anything is published.
    pub recipient_address: String,
    pub recipient_name: String,
    pub degree_type: String,
    pub major: String,
    pub gpa: String,
    pub graduation_date: String,
    pub description: String,
    /// Transcript or diploma file.
    pub attachment: Option<Attachment>,
    /// Pinning service keys. `None` publishes to the local store only.
    pub credentials: Option<PinningCredentials>,
}

impl IssueRequest {
    pub fn record(&self) -> AcademicRecord<'_> {
        AcademicRecord {
            recipient_name: &self.recipient_name,
            degree_type: &self.degree_type,
            major: &self.major,
            gpa: &self.gpa,
            graduation_date: &self.graduation_date,
            description: &self.description,
        }
    }
}
