//! PNG text chunk extraction.
//!
//! PNG chunks are parsed natively: 4-byte length (big-endian), 4-byte type,
//! `length` bytes of data, 4-byte CRC. tEXt chunks use keyword\0value
//! format. iTXt chunks use
//! keyword\0compression_flag\0compression_method\0language\0translated_keyword\0text.
//!
//! Only metadata chunks are touched; pixel data is never decoded.

use std::collections::HashMap;

use tracing::debug;

/// PNG file signature (8 bytes).
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Chunk keywords that carry generation metadata, in lookup priority:
/// "parameters" for Automatic1111, "Description" for NovelAI.
const GENERATION_KEYWORDS: [&str; 2] = ["parameters", "Description"];

/// Extract all tEXt and iTXt chunks from PNG bytes.
///
/// Returns a map of keyword -> text value. Non-PNG input yields an empty
/// map; a truncated or corrupt chunk stream ends the walk without error.
pub fn text_chunks(data: &[u8]) -> HashMap<String, String> {
    let mut chunks = HashMap::new();

    if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return chunks;
    }

    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let chunk_len =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let chunk_type = &data[pos + 4..pos + 8];
        pos += 8;

        if chunk_type == b"IEND" {
            break;
        }
        if pos + chunk_len > data.len() {
            debug!("truncated PNG chunk, stopping walk");
            break;
        }

        let chunk_data = &data[pos..pos + chunk_len];
        match chunk_type {
            b"tEXt" => parse_text_chunk(chunk_data, &mut chunks),
            b"iTXt" => parse_itxt_chunk(chunk_data, &mut chunks),
            _ => {}
        }

        // Skip data + CRC; the CRC is not validated.
        pos += chunk_len + 4;
    }

    chunks
}

/// Pick the generation metadata text out of a chunk map, if present.
pub fn generation_text(chunks: &HashMap<String, String>) -> Option<&str> {
    GENERATION_KEYWORDS
        .iter()
        .find_map(|key| chunks.get(*key).map(String::as_str))
}

/// Parse a tEXt chunk: keyword\0value (Latin-1, treated as UTF-8).
fn parse_text_chunk(data: &[u8], chunks: &mut HashMap<String, String>) {
    if let Some(null_pos) = data.iter().position(|&b| b == 0) {
        let keyword = String::from_utf8_lossy(&data[..null_pos]).to_string();
        let value = String::from_utf8_lossy(&data[null_pos + 1..]).to_string();
        if !keyword.is_empty() {
            chunks.insert(keyword, value);
        }
    }
}

/// Parse an iTXt chunk:
/// keyword\0compression_flag\0compression_method\0language\0translated_keyword\0text
fn parse_itxt_chunk(data: &[u8], chunks: &mut HashMap<String, String>) {
    let keyword_end = match data.iter().position(|&b| b == 0) {
        Some(pos) => pos,
        None => return,
    };
    let keyword = String::from_utf8_lossy(&data[..keyword_end]).to_string();
    if keyword.is_empty() {
        return;
    }

    let mut offset = keyword_end + 1;

    // compression_flag (1 byte) + compression_method (1 byte)
    if offset + 2 > data.len() {
        return;
    }
    let compression_flag = data[offset];
    offset += 2;

    // language tag (null-terminated)
    match data[offset..].iter().position(|&b| b == 0) {
        Some(null_pos) => offset += null_pos + 1,
        None => return,
    }

    // translated keyword (null-terminated)
    match data[offset..].iter().position(|&b| b == 0) {
        Some(null_pos) => offset += null_pos + 1,
        None => return,
    }

    if offset <= data.len() && compression_flag == 0 {
        let text = String::from_utf8_lossy(&data[offset..]).to_string();
        chunks.insert(keyword, text);
    }
    // Compressed iTXt (compression_flag == 1) uses zlib; AI generators
    // write uncompressed chunks, so compressed ones are skipped.
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0u8; 4]); // CRC, not validated
    }

    fn png_with_text(keyword: &str, text: &str) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        push_chunk(&mut out, b"IHDR", &[0u8; 13]);
        let mut data = keyword.as_bytes().to_vec();
        data.push(0);
        data.extend_from_slice(text.as_bytes());
        push_chunk(&mut out, b"tEXt", &data);
        push_chunk(&mut out, b"IEND", &[]);
        out
    }

    #[test]
    fn test_text_chunk_extracted() {
        let png = png_with_text("parameters", "a cat, Steps: 20");
        let chunks = text_chunks(&png);
        assert_eq!(chunks.get("parameters").map(String::as_str), Some("a cat, Steps: 20"));
    }

    #[test]
    fn test_itxt_chunk_extracted() {
        let mut out = PNG_SIGNATURE.to_vec();
        push_chunk(&mut out, b"IHDR", &[0u8; 13]);
        let mut data = b"Description".to_vec();
        data.push(0); // keyword terminator
        data.push(0); // compression flag: uncompressed
        data.push(0); // compression method
        data.push(0); // empty language tag
        data.push(0); // empty translated keyword
        data.extend_from_slice("1girl, smile".as_bytes());
        push_chunk(&mut out, b"iTXt", &data);
        push_chunk(&mut out, b"IEND", &[]);

        let chunks = text_chunks(&out);
        assert_eq!(chunks.get("Description").map(String::as_str), Some("1girl, smile"));
    }

    #[test]
    fn test_compressed_itxt_skipped() {
        let mut out = PNG_SIGNATURE.to_vec();
        let mut data = b"Description".to_vec();
        data.push(0);
        data.push(1); // compressed
        data.push(0);
        data.push(0);
        data.push(0);
        data.extend_from_slice(&[0x78, 0x9C]); // zlib header bytes
        push_chunk(&mut out, b"iTXt", &data);

        assert!(text_chunks(&out).is_empty());
    }

    #[test]
    fn test_non_png_input_yields_empty_map() {
        assert!(text_chunks(b"not a png at all").is_empty());
        assert!(text_chunks(&[]).is_empty());
    }

    #[test]
    fn test_truncated_chunk_stops_walk() {
        let mut png = PNG_SIGNATURE.to_vec();
        let mut data = b"parameters".to_vec();
        data.push(0);
        data.extend_from_slice(b"prompt");
        push_chunk(&mut png, b"tEXt", &data);
        // Declare a chunk longer than the remaining bytes, no IEND
        png.extend_from_slice(&1000u32.to_be_bytes());
        png.extend_from_slice(b"tEXt");
        png.extend_from_slice(b"short");
        let chunks = text_chunks(&png);
        assert_eq!(chunks.get("parameters").map(String::as_str), Some("prompt"));
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_generation_text_prefers_parameters() {
        let mut chunks = HashMap::new();
        chunks.insert("Description".to_string(), "novelai".to_string());
        chunks.insert("parameters".to_string(), "a1111".to_string());
        assert_eq!(generation_text(&chunks), Some("a1111"));

        chunks.remove("parameters");
        assert_eq!(generation_text(&chunks), Some("novelai"));

        chunks.clear();
        assert_eq!(generation_text(&chunks), None);
    }
}
