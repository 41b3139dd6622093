use std::fs::File;
use std::io::{self, Cursor, Read};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Byte stream resolved from a locator. Boxed because file-backed and
/// inline payloads produce different readers.
pub type UriStream = Box<dyn Read + Send>;

/// Resolve a locator to a byte stream.
///
/// `Ok(None)` means the locator was understood but no stream provider
/// exists for its scheme. `Err` means the locator itself is unusable:
/// malformed, missing a scheme, or pointing at something unreadable.
pub fn open_stream(locator: &str) -> io::Result<Option<UriStream>> {
    if let Some(rest) = locator.strip_prefix("file://") {
        let path = percent_decode(rest)?;
        let file = File::open(&path)?;
        return Ok(Some(Box::new(file)));
    }

    if let Some(rest) = locator.strip_prefix("data:") {
        let bytes = decode_data_payload(rest)?;
        return Ok(Some(Box::new(Cursor::new(bytes))));
    }

    if has_scheme(locator) {
        return Ok(None);
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("locator has no scheme: {locator}"),
    ))
}

fn percent_decode(text: &str) -> io::Result<String> {
    urlencoding::decode(text)
        .map(|cow| cow.into_owned())
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid percent-encoding: {e}"),
            )
        })
}

/// Decode the part after `data:`. The payload is either base64
/// (`;base64` in the media type) or percent-encoded text.
fn decode_data_payload(rest: &str) -> io::Result<Vec<u8>> {
    let Some((meta, payload)) = rest.split_once(',') else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "data locator has no payload separator",
        ));
    };

    if meta.ends_with(";base64") {
        BASE64.decode(payload).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid base64 payload: {e}"))
        })
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// RFC 3986 scheme shape: one letter, then letters, digits, `+`, `-`, `.`,
/// terminated by `:`.
fn has_scheme(locator: &str) -> bool {
    let Some(colon) = locator.find(':') else {
        return false;
    };
    if colon == 0 {
        return false;
    }
    let scheme = &locator[..colon];
    scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read_all(mut stream: UriStream) -> Vec<u8> {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn file_locator_streams_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"image bytes").unwrap();

        let locator = format!("file://{}", file.path().display());
        let stream = open_stream(&locator).unwrap().unwrap();

        assert_eq!(read_all(stream), b"image bytes");
    }

    #[test]
    fn file_locator_decodes_percent_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("with space.img");
        std::fs::write(&path, b"x").unwrap();

        let locator = format!("file://{}", path.display()).replace(' ', "%20");
        let stream = open_stream(&locator).unwrap().unwrap();

        assert_eq!(read_all(stream), b"x");
    }

    #[test]
    fn missing_file_is_an_error_not_a_missing_provider() {
        let err = open_stream("file:///definitely/not/here.img")
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn base64_data_locator_decodes_inline_bytes() {
        // "wallpaper" in base64.
        let stream = open_stream("data:image/png;base64,d2FsbHBhcGVy")
            .unwrap()
            .unwrap();
        assert_eq!(read_all(stream), b"wallpaper");
    }

    #[test]
    fn percent_data_locator_decodes_inline_bytes() {
        let stream = open_stream("data:text/plain,wall%20paper").unwrap().unwrap();
        assert_eq!(read_all(stream), b"wall paper");
    }

    #[test]
    fn corrupt_base64_payload_is_an_error() {
        let err = open_stream("data:image/png;base64,@@@")
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn data_locator_without_payload_is_an_error() {
        let err = open_stream("data:image/png").map(|_| ()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn foreign_schemes_resolve_to_no_provider() {
        assert!(open_stream("content://media/external/images/1")
            .unwrap()
            .is_none());
        assert!(open_stream("https://example.com/a.png").unwrap().is_none());
    }

    #[test]
    fn schemeless_text_is_an_error() {
        assert!(open_stream("/plain/path.png").is_err());
        assert!(open_stream("no scheme here").is_err());
        assert!(open_stream(":leading-colon").is_err());
    }
}
