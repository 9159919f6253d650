//! Resume file validation — allow-list of accepted document media types.

use bytes::Bytes;

/// Media types the screening service accepts. Exact match required;
/// anything else is rejected before a single byte goes on the wire.
const ALLOWED_RESUME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// A candidate resume as picked by the user: original file name, declared
/// media type, and raw bytes.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        ResumeFile {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// True iff the file's declared media type is PDF, legacy Word, or Word XML.
/// Unknown or absent types fail closed.
pub fn is_valid_resume_file(file: &ResumeFile) -> bool {
    ALLOWED_RESUME_TYPES
        .iter()
        .any(|t| *t == file.content_type)
}
