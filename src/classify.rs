use std::fmt;
use std::path::Path;

/// Broad file category used to pick a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
    Document,
    Text,
    Generic,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
            FileKind::Document => "document",
            FileKind::Text => "text",
            FileKind::Generic => "generic",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of `file_name`, if it has one.
pub fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Classifies a file by extension. Never fails: anything unknown is `Generic`.
pub fn classify(file_name: &str) -> FileKind {
    match extension(file_name).as_deref() {
        Some("pdf") => FileKind::Pdf,
        Some("jpg" | "jpeg" | "png" | "gif" | "bmp" | "tif" | "tiff" | "webp") => FileKind::Image,
        Some(
            "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt" | "ods" | "odp" | "rtf",
        ) => FileKind::Document,
        Some("txt" | "text" | "md" | "log") => FileKind::Text,
        _ => FileKind::Generic,
    }
}
