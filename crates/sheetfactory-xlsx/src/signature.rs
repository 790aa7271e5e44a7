//! Content signatures used to tell the container formats apart.

use std::io::{Read, Seek};

const ODS_MIMETYPES: [&str; 2] = [
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.spreadsheet-template",
];

/// ZIP package containing the given part
pub(crate) fn zip_has_part<R: Read + Seek>(source: R, part: &str) -> bool {
    match zip::ZipArchive::new(source) {
        Ok(mut archive) => archive.by_name(part).is_ok(),
        Err(_) => false,
    }
}

/// OpenDocument package whose `mimetype` entry names a spreadsheet
pub(crate) fn is_ods<R: Read + Seek>(source: R) -> bool {
    let Ok(mut archive) = zip::ZipArchive::new(source) else {
        return false;
    };
    let Ok(mut entry) = archive.by_name("mimetype") else {
        return false;
    };
    let mut mimetype = String::new();
    if entry.read_to_string(&mut mimetype).is_err() {
        return false;
    }
    ODS_MIMETYPES.contains(&mimetype.trim())
}

/// OLE2 compound file carrying a BIFF workbook stream
pub(crate) fn is_biff_workbook<R: Read + Seek>(source: R) -> bool {
    match cfb::CompoundFile::open(source) {
        Ok(cfb) => cfb.exists("/Workbook") || cfb.exists("/Book"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            for (name, body) in entries {
                zip.start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_zip_part_detection() {
        let bytes = zip_with(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(zip_has_part(Cursor::new(&bytes), "xl/workbook.xml"));
        assert!(!zip_has_part(Cursor::new(&bytes), "xl/workbook.bin"));
        assert!(!zip_has_part(Cursor::new(b"a,b,c".as_slice()), "xl/workbook.xml"));
    }

    #[test]
    fn test_ods_detection() {
        let ods = zip_with(&[("mimetype", ODS_MIMETYPES[0])]);
        let odt = zip_with(&[("mimetype", "application/vnd.oasis.opendocument.text")]);
        assert!(is_ods(Cursor::new(&ods)));
        assert!(!is_ods(Cursor::new(&odt)));
    }

    #[test]
    fn test_cfb_detection_rejects_text() {
        assert!(!is_biff_workbook(Cursor::new(b"not a compound file".as_slice())));
    }
}
