pub mod attachments;
pub mod console;
pub mod html;
pub mod junit;
pub mod report_model;

pub use attachments::{Attachment, AttachmentRef, AttachmentStore, MimeType};
pub use report_model::{TestResult, TestStatus, TestSuiteReport};
