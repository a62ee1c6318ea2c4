//! Zip extraction of the release binary

use std::io::{Cursor, Read};

use super::InstallError;

/// Extracts the named binary from a zip archive held in memory.
pub fn extract_binary(archive: &[u8], binary_name: &str) -> Result<Vec<u8>, InstallError> {
    let cursor = Cursor::new(archive);
    let mut archive = zip::ZipArchive::new(cursor)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;

        let name = file.enclosed_name().and_then(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|s| s.to_string())
        });

        if name.as_deref() == Some(binary_name) {
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            return Ok(content);
        }
    }

    Err(InstallError::BinaryNotFound(binary_name.to_string()))
}
