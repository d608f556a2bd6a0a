use std::fmt;
use std::path::PathBuf;

/// A file handle collected by the selector, reduced to the metadata
/// validation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

/// Limits applied to one selection before any upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRules {
    /// Lowercased extensions including the leading dot.
    pub allowed_extensions: Vec<String>,
    pub max_file_bytes: u64,
    pub max_files: usize,
    pub batch_size: usize,
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![".pdf".to_string(), ".txt".to_string()],
            max_file_bytes: 5 * 1024 * 1024,
            max_files: 50,
            batch_size: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType { name: String },
    TooLarge { name: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnsupportedType { name } => {
                write!(
                    f,
                    "{name}: File type not supported. Please upload only PDF or TXT files."
                )
            }
            RejectReason::TooLarge { name } => {
                write!(f, "{name}: File size exceeds 5MB limit.")
            }
        }
    }
}

/// A whole selection was refused before per-file validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooManySelected {
    pub selected: usize,
    pub max: usize,
}

/// Outcome of screening one selection: valid files in original order plus
/// per-file rejection messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionScreen {
    pub valid: Vec<SelectedFile>,
    pub rejected: Vec<String>,
}

/// Validate a single file against the rules. Type is checked before size, so
/// an oversized file of a disallowed type reports the type mismatch.
pub fn validate_file(file: &SelectedFile, rules: &SelectionRules) -> Result<(), RejectReason> {
    let ext = extension_of(&file.name);
    if !rules.allowed_extensions.iter().any(|allowed| allowed == &ext) {
        return Err(RejectReason::UnsupportedType {
            name: file.name.clone(),
        });
    }
    if file.size > rules.max_file_bytes {
        return Err(RejectReason::TooLarge {
            name: file.name.clone(),
        });
    }
    Ok(())
}

/// Screen a whole selection. Selections over `max_files` are refused outright;
/// otherwise files are validated independently and partitioned.
pub fn screen_selection(
    files: Vec<SelectedFile>,
    rules: &SelectionRules,
) -> Result<SelectionScreen, TooManySelected> {
    if files.len() > rules.max_files {
        return Err(TooManySelected {
            selected: files.len(),
            max: rules.max_files,
        });
    }

    let mut screen = SelectionScreen::default();
    for file in files {
        match validate_file(&file, rules) {
            Ok(()) => screen.valid.push(file),
            Err(reason) => screen.rejected.push(reason.to_string()),
        }
    }
    Ok(screen)
}

fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_ascii_lowercase()),
        None => String::new(),
    }
}
