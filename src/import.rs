//! Routing of imported files into buffers.

use std::path::Path;

use thiserror::Error;

use crate::buffer::BufferKind;

/// Extensions accepted on import, with the buffer each one feeds.
const IMPORT_EXTENSIONS: &[(&str, BufferKind)] = &[
    (".html", BufferKind::Markup),
    (".css", BufferKind::Style),
    (".js", BufferKind::Script),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {name}. Please select .html, .css, or .js.")]
    UnsupportedType { name: String },
}

/// Pick the target buffer for a file from its name suffix, ignoring case.
///
/// # Errors
/// Returns [`ImportError::UnsupportedType`] for any other suffix.
pub fn classify(file_name: &str) -> Result<BufferKind, ImportError> {
    let lowered = file_name.to_lowercase();
    IMPORT_EXTENSIONS
        .iter()
        .find(|(suffix, _)| lowered.ends_with(suffix))
        .map(|(_, kind)| *kind)
        .ok_or_else(|| ImportError::UnsupportedType {
            name: file_name.to_string(),
        })
}

/// Classify a path by its final component.
///
/// # Errors
/// Returns [`ImportError::UnsupportedType`] when the file name is missing or
/// has an unsupported suffix.
pub fn classify_path(path: &Path) -> Result<BufferKind, ImportError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    classify(&name)
}

/// Decode imported bytes as UTF-8, replacing invalid sequences.
pub fn decode(content: &[u8]) -> String {
    String::from_utf8_lossy(content).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("foo.HTML"), Ok(BufferKind::Markup));
        assert_eq!(classify("x.CSS"), Ok(BufferKind::Style));
        assert_eq!(classify("y.js"), Ok(BufferKind::Script));
        assert_eq!(
            classify("z.txt"),
            Err(ImportError::UnsupportedType {
                name: "z.txt".to_string()
            })
        );
    }

    #[test]
    fn test_classify_uses_only_the_suffix() {
        assert_eq!(classify("style.css.js"), Ok(BufferKind::Script));
        assert!(classify("index.html.bak").is_err());
        assert!(classify("html").is_err());
        assert!(classify("").is_err());
    }

    #[test]
    fn test_classify_path_uses_file_name() {
        assert_eq!(
            classify_path(Path::new("/tmp/site/Index.Html")),
            Ok(BufferKind::Markup)
        );
        assert!(classify_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        assert_eq!(decode("héllo".as_bytes()), "héllo");
        assert_eq!(decode(&[b'a', 0xff, b'b']), "a\u{fffd}b");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn classify_ignores_case(stem in "[a-zA-Z0-9_-]{0,12}", upper in any::<bool>()) {
                for (suffix, kind) in IMPORT_EXTENSIONS {
                    let suffix = if upper { suffix.to_uppercase() } else { (*suffix).to_string() };
                    let name = format!("{stem}{suffix}");
                    prop_assert_eq!(classify(&name), Ok(*kind));
                }
            }

            #[test]
            fn classify_rejects_other_suffixes(stem in "[a-z]{1,8}", ext in "(txt|md|json|htm|scss|ts)") {
                let name = format!("{stem}.{ext}");
                prop_assert!(classify(&name).is_err());
            }
        }
    }
}
