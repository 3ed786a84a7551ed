//! Generic text decoding

/// Decode as UTF-8, falling back to Latin-1 which accepts every byte
pub fn decode(bytes: Vec<u8>) -> (String, &'static str) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, "utf-8"),
        Err(e) => {
            let text = e.into_bytes().into_iter().map(char::from).collect();
            (text, "latin-1")
        }
    }
}
