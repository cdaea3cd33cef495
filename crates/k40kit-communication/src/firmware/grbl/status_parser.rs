//! GRBL Status Report formatting and parsing
//!
//! The emulator answers `?` with `<State|MPos:x,y,z|FS:feed,power>\r\n`.
//! Positions are in user units, feed in the active feed units, and power
//! is printed as an integer.

use k40kit_core::InterpreterState;
use serde::{Deserialize, Serialize};

/// State name written into status lines.
pub fn grbl_state_name(state: InterpreterState) -> &'static str {
    state.as_str()
}

/// A decoded status report line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub state: String,
    /// Machine position `(x, y, z)`
    pub mpos: (f64, f64, f64),
    pub feed: f64,
    pub power: i64,
}

impl StatusReport {
    /// Render the report exactly as the emulator sends it.
    pub fn format(&self) -> String {
        format!(
            "<{}|MPos:{:.6},{:.6},{:.6}|FS:{:.6},{}>\r\n",
            self.state, self.mpos.0, self.mpos.1, self.mpos.2, self.feed, self.power
        )
    }

    /// Parse a status line, with or without angle brackets and line ending.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let body = line
            .strip_prefix('<')
            .and_then(|l| l.strip_suffix('>'))
            .unwrap_or(line);
        let state = body.split('|').next()?.trim();
        if state.is_empty() {
            return None;
        }

        let coords: Vec<f64> = Self::extract_field(body, "MPos:")?
            .split(',')
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .collect();
        if coords.len() < 3 {
            return None;
        }

        let mut fs = Self::extract_field(body, "FS:")?.split(',');
        let feed = fs.next()?.trim().parse::<f64>().ok()?;
        let power = fs.next()?.trim().parse::<i64>().ok()?;

        Some(Self {
            state: state.to_string(),
            mpos: (coords[0], coords[1], coords[2]),
            feed,
            power,
        })
    }

    fn extract_field<'a>(body: &'a str, field_prefix: &str) -> Option<&'a str> {
        let start = body.find(field_prefix)? + field_prefix.len();
        let rest = &body[start..];
        let end = rest.find('|').unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let report = StatusReport {
            state: "Idle".to_string(),
            mpos: (10.0, -20.5, 0.0),
            feed: 500.0,
            power: 1000,
        };
        assert_eq!(
            report.format(),
            "<Idle|MPos:10.000000,-20.500000,0.000000|FS:500.000000,1000>\r\n"
        );
    }

    #[test]
    fn test_parse() {
        let report = StatusReport::parse("<Busy|MPos:1.5,2.0,0.0|FS:300.0,750>\r\n").unwrap();
        assert_eq!(report.state, "Busy");
        assert_eq!(report.mpos, (1.5, 2.0, 0.0));
        assert_eq!(report.feed, 300.0);
        assert_eq!(report.power, 750);
    }

    #[test]
    fn test_parse_rejects_incomplete() {
        assert!(StatusReport::parse("<Idle|MPos:1,2|FS:0,0>").is_none());
        assert!(StatusReport::parse("<Idle|MPos:1,2,3>").is_none());
        assert!(StatusReport::parse("ok").is_none());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(grbl_state_name(InterpreterState::Idle), "Idle");
        assert_eq!(grbl_state_name(InterpreterState::Busy), "Busy");
    }
}
