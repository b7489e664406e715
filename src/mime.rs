use std::collections::BTreeMap;
use std::fmt;

use crate::FileMetadata;

/// MIME types the upload form accepts.
pub const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "video/mp4",
    "video/quicktime",
    "video/avi",
    "audio/mpeg",
    "audio/wav",
    "audio/ogg",
];

/// Value for the file input's `accept` attribute.
pub const ACCEPT_ATTRIBUTE: &str = "image/*,application/pdf,application/msword,application/vnd.openxmlformats-officedocument.wordprocessingml.document,text/plain,video/*,audio/*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
}

impl FileCategory {
    /// Display order of the accordion sections.
    pub const ALL: [FileCategory; 4] = [
        FileCategory::Image,
        FileCategory::Video,
        FileCategory::Audio,
        FileCategory::Document,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FileCategory::Image => "Images",
            FileCategory::Video => "Videos",
            FileCategory::Audio => "Audio",
            FileCategory::Document => "Documents",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            FileCategory::Image => "images",
            FileCategory::Video => "videos",
            FileCategory::Audio => "audio",
            FileCategory::Document => "documents",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Document => "document",
        };
        f.write_str(name)
    }
}

/// Bucket for a stored file's MIME type. Unknown types are documents.
pub fn category_for(mime_type: &str) -> FileCategory {
    match mime_type {
        "image/jpeg" | "image/png" | "image/gif" => FileCategory::Image,
        "video/mp4" | "video/quicktime" | "video/avi" => FileCategory::Video,
        "audio/mpeg" | "audio/wav" | "audio/ogg" => FileCategory::Audio,
        _ => FileCategory::Document,
    }
}

pub fn is_allowed(mime_type: &str) -> bool {
    ALLOWED_TYPES.contains(&mime_type)
}

/// Whether a selection of this type gets a local preview.
pub fn is_image(mime_type: &str) -> bool {
    matches!(mime_type, "image/jpeg" | "image/png" | "image/gif")
}

/// Whether the browser can show the file inline, so an "Open" link is offered.
pub fn is_viewable(mime_type: &str) -> bool {
    matches!(
        mime_type,
        "image/jpeg"
            | "image/png"
            | "image/gif"
            | "application/pdf"
            | "video/mp4"
            | "video/quicktime"
            | "video/avi"
            | "audio/mpeg"
            | "audio/wav"
            | "audio/ogg"
    )
}

/// Splits a file list into the four categories, keeping list order inside each.
/// Every category is present in the result, possibly empty.
pub fn categorize(files: &[FileMetadata]) -> BTreeMap<FileCategory, Vec<FileMetadata>> {
    let mut buckets: BTreeMap<FileCategory, Vec<FileMetadata>> = FileCategory::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();

    for file in files {
        buckets
            .entry(category_for(&file.mime_type))
            .or_default()
            .push(file.clone());
    }

    buckets
}
