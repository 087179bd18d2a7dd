//! Drag and drop file selection, with type and size checks before a file is accepted.

mod session;
mod view;

pub use session::{
    FileKind, FileSummary, UploadCandidate, UploadEvent, UploadOptions, UploadRejection,
    UploadSession, UploadView,
};
pub use view::{DomUploadView, FileUpload};
