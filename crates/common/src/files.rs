//! Path and file name helpers that never touch the filesystem
//!
//! Anything that reads or writes lives in `helpkit_infra::storage::files`.

use std::path::{Component, Path, PathBuf};

use helpkit_domain::constants::DEFAULT_MIME_TYPE;
use helpkit_domain::format_bytes;

use crate::error::{CommonError, CommonResult};

/// Join an untrusted relative path onto `root`
///
/// Rejects absolute paths, drive prefixes, any `..` component and NUL
/// bytes, so the result always stays under `root`. `.` components are
/// dropped.
///
/// # Errors
///
/// Returns [`CommonError::PathTraversal`] when the input would escape.
pub fn safe_join(root: impl AsRef<Path>, relative: &str) -> CommonResult<PathBuf> {
    if relative.contains('\0') {
        return Err(CommonError::path_traversal(relative.replace('\0', "\\0")));
    }

    let mut joined = root.as_ref().to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(CommonError::path_traversal(relative));
            }
        }
    }

    Ok(joined)
}

const MAX_FILE_NAME_BYTES: usize = 255;

/// Make a user-supplied name safe to use as a single path component
///
/// Separators, reserved characters and control characters become `_`.
/// Leading and trailing dots and spaces are stripped. Falls back to
/// `"file"` when nothing is left.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == '.' || c == ' ');
    if trimmed.is_empty() {
        return "file".to_string();
    }

    let mut out = String::with_capacity(trimmed.len().min(MAX_FILE_NAME_BYTES));
    for c in trimmed.chars() {
        if out.len() + c.len_utf8() > MAX_FILE_NAME_BYTES {
            break;
        }
        out.push(c);
    }
    out
}

fn transliterate(c: char) -> Option<&'static str> {
    let ascii = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        _ => return None,
    };
    Some(ascii)
}

/// Lowercase ASCII slug: accents folded, other runs collapsed to `-`
///
/// ```
/// use helpkit_common::files::slugify;
///
/// assert_eq!(slugify("  Société Générale & Cie  "), "societe-generale-cie");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let piece = if c.is_ascii_alphanumeric() {
            Some(c.to_string())
        } else {
            transliterate(c).map(str::to_string)
        };

        match piece {
            Some(piece) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push_str(&piece);
            }
            None => pending_dash = true,
        }
    }

    slug
}

/// Lowercased extension without the dot
pub fn extension(name: &str) -> Option<String> {
    Path::new(name).extension().and_then(|ext| ext.to_str()).map(str::to_lowercase)
}

/// MIME type guessed from the file extension
pub fn mime_type_for(name: &str) -> &'static str {
    let Some(ext) = extension(name) else {
        return DEFAULT_MIME_TYPE;
    };

    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "vcf" => "text/vcard",
        "ics" => "text/calendar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Binary-unit size label ("1.5 MB")
pub fn human_size(bytes: u64) -> String {
    format_bytes(bytes)
}

#[cfg(test)]
mod tests {
    //! Unit tests for files.
    use super::*;

    /// Validates `safe_join` for the traversal scenario.
    ///
    /// Assertions:
    /// - Ensures `..`, absolute paths and NUL bytes are rejected.
    /// - Confirms nested relative names stay under the root.
    #[test]
    fn test_safe_join_rejects_escapes() {
        let root = Path::new("/srv/data");

        assert_eq!(safe_join(root, "users/42.json").unwrap(), root.join("users/42.json"));
        assert_eq!(safe_join(root, "./a/./b").unwrap(), root.join("a/b"));

        for bad in ["../etc/passwd", "a/../../b", "/etc/passwd", "a\0b", "users/.."] {
            let err = safe_join(root, bad).unwrap_err();
            assert!(matches!(err, CommonError::PathTraversal { .. }), "{bad:?} was accepted");
        }
    }

    #[test]
    fn test_safe_join_empty_is_root() {
        assert_eq!(safe_join("/srv", "").unwrap(), PathBuf::from("/srv"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report: Q1/Q2?.pdf"), "report_ Q1_Q2_.pdf");
        assert_eq!(sanitize_file_name("..hidden.. "), "hidden");
        assert_eq!(sanitize_file_name("../"), "_");
        assert_eq!(sanitize_file_name(" .. "), "file");
        assert_eq!(sanitize_file_name(&"é".repeat(200)).len(), 254);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("Crème brûlée à l'œuf"), "creme-brulee-a-l-oeuf");
        assert_eq!(slugify("--"), "");
        assert_eq!(slugify("Straße 12"), "strasse-12");
    }

    #[test]
    fn test_extension_and_mime() {
        assert_eq!(extension("Archive.TAR.GZ").as_deref(), Some("gz"));
        assert_eq!(extension("README"), None);
        assert_eq!(mime_type_for("invoice.PDF"), "application/pdf");
        assert_eq!(mime_type_for("contact.vcf"), "text/vcard");
        assert_eq!(mime_type_for("blob.bin"), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for("noext"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
