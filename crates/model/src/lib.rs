//! Shared resume data model: content, documents, validation rules and the
//! wire types exchanged between the API and the editor.

pub mod api_error;
pub mod content;
pub mod document;
pub mod tailoring;
pub mod validation;

pub use content::{ContactInfo, ContentPatch, EducationEntry, ExperienceEntry, ResumeContent};
pub use document::{OwnerId, ResumeDocument, ResumeId, ResumeStats, DEFAULT_TEMPLATE};
pub use validation::{validate_content, FieldError, ValidationErrors};
