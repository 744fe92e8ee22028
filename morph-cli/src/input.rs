//! Script reading: `ACTION MESSAGE` lines from a file or stdin.

use morph_protocol::{Action, ProtocolError, Request};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// Opens the script source: a file path, or stdin for `-`.
pub fn open(source: &str) -> io::Result<Box<dyn BufRead>> {
    if source == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(source)?)))
    }
}

/// Parses a whole script up front, failing on the first bad line so a
/// typo cannot leave the session half-sent.
pub fn read_script(reader: impl BufRead) -> Result<Vec<Request>, Box<dyn Error>> {
    let mut requests = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("line {}: {}", idx + 1, e))?;
        if let Some(request) = parse_line(&line).map_err(|e| format!("line {}: {}", idx + 1, e))? {
            requests.push(request);
        }
    }
    Ok(requests)
}

/// Parses one script line: an action from the known vocabulary, one
/// space, then the message verbatim to the end of the line.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Request>, ProtocolError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (action, message) = line
        .split_once(' ')
        .ok_or(ProtocolError::MissingField("message"))?;
    let action: Action = action.parse()?;
    if message.is_empty() {
        return Err(ProtocolError::MissingField("message"));
    }

    Ok(Some(Request::from_action(action, message)))
}
