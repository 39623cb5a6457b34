use once_cell::sync::Lazy;
use regex::Regex;

pub mod file_requests;
pub mod folder_requests;

//language=RegExp
static BANNED_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new("[/\\\\\x00]").unwrap());

/// checks a folder or file name before it's allowed anywhere near the
/// database or a blob object key. Names are client-side ciphertext, so they
/// are never rewritten here - a name either passes untouched or is rejected.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !BANNED_NAME_CHARS.is_match(name)
}

#[cfg(test)]
mod name_validation_tests {
    use super::is_valid_name;

    #[test]
    fn accepts_ordinary_and_encrypted_names() {
        for name in ["a.txt", "Qmx4aT09.enc", ".bashrc", "test.old.txt.bak"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty_and_dot_names() {
        for name in ["", ".", ".."] {
            assert!(!is_valid_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn rejects_path_separators() {
        for name in ["a/b", "..\\up", "x/", "\\", "nul\0byte"] {
            assert!(!is_valid_name(name), "{name:?} should be invalid");
        }
    }
}
