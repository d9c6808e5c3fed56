//! Parse individual HTTP response header lines as libcurl hands them over.

/// Status code from a status line such as `HTTP/1.1 200 OK`.
///
/// libcurl passes one status line per response, so a redirect chain yields
/// several; the last one belongs to the body being written.
pub(crate) fn status_code(line: &str) -> Option<u32> {
    let line = line.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Value of a `Content-Length` header line, if that is what `line` is.
pub(crate) fn content_length(line: &str) -> Option<u64> {
    let (name, value) = line.trim().split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}
