//! Transaction classification from file names

use crate::types::TransactionKind;

/// Suffix marking a cancellation file
pub const CANCELLATION_SUFFIX: &str = "-A";

/// Strip the final `.ext` from a file name, if any
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// Classify an extension-stripped subject identifier
pub fn classify(subject_id: &str) -> TransactionKind {
    if subject_id.ends_with(CANCELLATION_SUFFIX) {
        TransactionKind::Cancellation
    } else {
        TransactionKind::Movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("F0001.txt"), "F0001");
        assert_eq!(strip_extension("F0002-A.txt"), "F0002-A");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(
            strip_extension("TUTGMF0001000120240312-0001"),
            "TUTGMF0001000120240312-0001"
        );
        assert_eq!(strip_extension(""), "");
    }

    #[test]
    fn test_classify_cancellation() {
        assert_eq!(classify("F0002-A"), TransactionKind::Cancellation);
        assert_eq!(
            classify(strip_extension("TUTGMF0001000120240312-0002-A.txt")),
            TransactionKind::Cancellation
        );
    }

    #[test]
    fn test_classify_movement() {
        assert_eq!(classify("F0001"), TransactionKind::Movement);
        assert_eq!(classify("F0002-a"), TransactionKind::Movement);
        assert_eq!(classify("F-A-0003"), TransactionKind::Movement);
        assert_eq!(classify(""), TransactionKind::Movement);
        // Suffix is only checked after the extension is removed
        assert_eq!(classify("F0002-A.txt"), TransactionKind::Movement);
    }
}
