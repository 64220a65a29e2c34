// transform.rs - barcode read 预处理
//
// Closed set of rules chosen on the command line, e.g. `truncate:7` or `slice:2:9`.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BarcodeTransform {
    #[default]
    Identity,
    /// Keep the first `n` characters.
    Truncate(usize),
    /// Keep characters `start..end`, clamped to the sequence length.
    Slice { start: usize, end: usize },
}

impl BarcodeTransform {
    pub fn apply(&self, sequence: &str) -> String {
        match *self {
            BarcodeTransform::Identity => sequence.to_string(),
            BarcodeTransform::Truncate(n) => sequence.chars().take(n).collect(),
            BarcodeTransform::Slice { start, end } => {
                sequence.chars().skip(start).take(end.saturating_sub(start)).collect()
            }
        }
    }
}

impl FromStr for BarcodeTransform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let number = |text: &str| {
            text.trim()
                .parse::<usize>()
                .map_err(|_| Error::InvalidTransform(format!("{text:?} is not a position in {s:?}")))
        };

        match parts.as_slice() {
            ["identity"] | ["none"] => Ok(BarcodeTransform::Identity),
            ["truncate", n] => Ok(BarcodeTransform::Truncate(number(*n)?)),
            ["slice", start, end] => {
                let (start, end) = (number(*start)?, number(*end)?);
                if start > end {
                    return Err(Error::InvalidTransform(format!(
                        "slice start {start} is past end {end}"
                    )));
                }
                Ok(BarcodeTransform::Slice { start, end })
            }
            _ => Err(Error::InvalidTransform(format!(
                "unknown rule {s:?} (expected identity, truncate:N or slice:START:END)"
            ))),
        }
    }
}

impl fmt::Display for BarcodeTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeTransform::Identity => write!(f, "identity"),
            BarcodeTransform::Truncate(n) => write!(f, "truncate:{n}"),
            BarcodeTransform::Slice { start, end } => write!(f, "slice:{start}:{end}"),
        }
    }
}
