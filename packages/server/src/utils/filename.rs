/// Longest filename accepted for an upload, in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

/// Why an upload's filename was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    Empty,
    TooLong,
    /// `/` or `\` anywhere in the name.
    ContainsPathSeparator,
    PathTraversal,
    /// Leading dot.
    Hidden,
    /// Any control character, NUL included.
    ControlCharacter,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::TooLong => "Invalid filename: longer than 255 bytes",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
        }
    }
}

/// Check that an uploaded filename can be used verbatim as the last segment
/// of a storage key. Returns the trimmed name.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }
    if trimmed.len() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(FilenameError::ControlCharacter);
    }
    if trimmed.contains(['/', '\\']) {
        return Err(FilenameError::ContainsPathSeparator);
    }
    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }
    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}
