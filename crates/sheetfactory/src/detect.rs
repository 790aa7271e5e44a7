//! Input format identification

use std::fs::File;
use std::path::Path;

use crate::error::LoadError;
use crate::registry::FormatRegistry;

/// Reader format suggested by a file extension
pub fn format_for_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let format = match extension.as_str() {
        "xlsx" | "xlsm" | "xltx" | "xltm" => "Xlsx",
        "xls" | "xlt" => "Xls",
        "xlsb" => "Xlsb",
        "ods" | "ots" => "Ods",
        "csv" | "tsv" | "txt" => "Csv",
        _ => return None,
    };
    Some(format)
}

/// Name of the registered reader that accepts the file.
///
/// The reader suggested by the extension is tried first, then every reader
/// in registration order.
pub(crate) fn identify(registry: &FormatRegistry, path: &Path) -> Result<String, LoadError> {
    // surface a missing or unreadable file as an IO error
    File::open(path)?;

    if let Some(guess) = format_for_extension(path) {
        if let Some((name, ctor)) = registry.reader(guess) {
            if ctor().can_read(path) {
                log::debug!("identified {} as {} by extension", path.display(), name);
                return Ok(name.to_string());
            }
            log::debug!("{} does not look like {}, probing", path.display(), name);
        }
    }

    for (name, ctor) in registry.readers() {
        if ctor().can_read(path) {
            log::debug!("identified {} as {} by content", path.display(), name);
            return Ok(name.to_string());
        }
    }

    Err(LoadError::Unidentified(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extension_map() {
        assert_eq!(format_for_extension(Path::new("a.XLSX")), Some("Xlsx"));
        assert_eq!(format_for_extension(Path::new("a.xlsm")), Some("Xlsx"));
        assert_eq!(format_for_extension(Path::new("a.xlt")), Some("Xls"));
        assert_eq!(format_for_extension(Path::new("a.ots")), Some("Ods"));
        assert_eq!(format_for_extension(Path::new("a.tsv")), Some("Csv"));
        assert_eq!(format_for_extension(Path::new("a.pdf")), None);
        assert_eq!(format_for_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_content_beats_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let registry = FormatRegistry::with_builtins();
        assert_eq!(identify(&registry, &path).unwrap(), "Csv");
    }

    #[test]
    fn test_binary_garbage_is_unidentified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.dat");
        std::fs::write(&path, [0u8, 159, 146, 150]).unwrap();

        let registry = FormatRegistry::with_builtins();
        let err = identify(&registry, &path).unwrap_err();
        assert!(matches!(err, LoadError::Unidentified(p) if p == path));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let registry = FormatRegistry::with_builtins();
        let err = identify(&registry, Path::new("/nonexistent/book.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
