//! JPEG EXIF UserComment recovery.
//!
//! AI generators that write JPEG embed the generation parameter text in the
//! EXIF UserComment field, character code prefix included. EXIF container
//! parsing is delegated to kamadak-exif.

use std::io::Cursor;

use tracing::debug;

/// Pull the raw UserComment byte payload from JPEG bytes.
///
/// Returns `None` when the file carries no EXIF segment, no UserComment
/// field, or a UserComment of an unexpected type — absence, not an error.
pub fn user_comment(data: &[u8]) -> Option<Vec<u8>> {
    let mut cursor = Cursor::new(data);
    let exif_data = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif_data) => exif_data,
        Err(e) => {
            debug!("no EXIF data: {}", e);
            return None;
        }
    };

    let field = exif_data.get_field(exif::Tag::UserComment, exif::In::PRIMARY)?;
    match field.value {
        exif::Value::Undefined(ref bytes, _) => Some(bytes.clone()),
        ref other => {
            debug!("UserComment has unexpected EXIF type: {:?}", other);
            None
        }
    }
}
