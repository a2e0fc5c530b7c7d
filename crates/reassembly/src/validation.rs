use std::path::{Component, Path};

use crate::error::ReassemblyError;

/// Checks that a reconstructed file's name stays inside the output
/// directory it is joined onto.
///
/// Original names come from remote storage and are untrusted: empty names,
/// NUL bytes, `..` components and rooted or drive-prefixed paths are
/// rejected. Relative subdirectories are allowed.
pub fn validate_output_name(name: &str) -> Result<(), ReassemblyError> {
    let problem = if name.is_empty() {
        Some("empty name")
    } else if name.contains('\0') {
        Some("NUL byte in name")
    } else {
        Path::new(name).components().find_map(|component| match component {
            Component::ParentDir => Some("parent directory traversal"),
            Component::RootDir | Component::Prefix(_) => Some("absolute path"),
            Component::CurDir | Component::Normal(_) => None,
        })
    };

    match problem {
        Some(problem) => Err(ReassemblyError::InvalidName(format!("{problem}: {name:?}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_output_name("report.pdf").is_ok());
        assert!(validate_output_name("my movie (2019).mkv").is_ok());
        assert!(validate_output_name(".hidden").is_ok());
        assert!(validate_output_name("sub/dir/file.txt").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            validate_output_name(""),
            Err(ReassemblyError::InvalidName(_))
        ));
    }

    #[test]
    fn rejects_traversal() {
        assert!(validate_output_name("..").is_err());
        assert!(validate_output_name("../etc/passwd").is_err());
        assert!(validate_output_name("a/../../escape").is_err());
    }

    #[test]
    fn rejects_absolute() {
        assert!(validate_output_name("/etc/passwd").is_err());
        assert!(validate_output_name("/").is_err());
    }

    #[test]
    fn rejects_nul() {
        assert!(validate_output_name("a\0b").is_err());
    }
}
