/// Parse and validate the index filename.
///
/// The index is a plain file name looked up inside a directory, so it cannot
/// be empty or contain path separators.
///
/// # Errors
///
/// Returns an error message if the name is invalid.
pub fn parse_index(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Index filename cannot be empty".to_string());
    }

    if s.contains('/') || s.contains('\\') {
        return Err(format!(
            "Index filename must be a plain file name, not a path: '{}'",
            s
        ));
    }

    if s == "." || s == ".." {
        return Err(format!("Index filename is not a file name: '{}'", s));
    }

    Ok(s.to_string())
}

/// Parse a TCP port, rejecting 0.
///
/// # Errors
///
/// Returns an error message for non-numeric, out-of-range or zero ports.
pub fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535: '{}'", s))?;
    if port == 0 {
        return Err("Port 0 is not allowed".to_string());
    }
    Ok(port)
}
