//! Input and output shapes at the start/resume boundary.
//!
//! ASCII translation lives here and nowhere else: the instruction pipeline only
//! ever sees integers.

use crate::MachineError;

/// Input accepted by `start` and `resume`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// No input.
    #[default]
    None,
    /// Integers queued in order.
    Values(Vec<i64>),
    /// Text queued as one character code per character. ASCII machines only.
    Text(String),
}

impl Input {
    /// Translates the input into queue values.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::TextInputRejected`] for text input when `ascii`
    /// is false.
    pub fn into_values(self, ascii: bool) -> Result<Vec<i64>, MachineError> {
        match self {
            Self::None => Ok(Vec::new()),
            Self::Values(values) => Ok(values),
            Self::Text(text) if ascii => Ok(encode_text(&text)),
            Self::Text(_) => Err(MachineError::TextInputRejected),
        }
    }
}

impl From<()> for Input {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<i64> for Input {
    fn from(value: i64) -> Self {
        Self::Values(vec![value])
    }
}

impl From<Option<i64>> for Input {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::None, Self::from)
    }
}

impl From<Vec<i64>> for Input {
    fn from(values: Vec<i64>) -> Self {
        Self::Values(values)
    }
}

impl From<&[i64]> for Input {
    fn from(values: &[i64]) -> Self {
        Self::Values(values.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Input {
    fn from(values: [i64; N]) -> Self {
        Self::Values(values.to_vec())
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Converts text to character codes in order.
#[must_use]
pub fn encode_text(text: &str) -> Vec<i64> {
    text.chars().map(|c| i64::from(u32::from(c))).collect()
}

/// Returns true when `value` is a character code rendered by ASCII machines
/// (`1..=127`).
#[must_use]
pub const fn is_ascii_code(value: i64) -> bool {
    value > 0 && value < 128
}

/// Output produced by one run segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Output {
    values: Vec<i64>,
    text: Option<String>,
}

impl Output {
    /// Wraps raw values without text rendering.
    #[must_use]
    pub const fn raw(values: Vec<i64>) -> Self {
        Self { values, text: None }
    }

    /// Wraps raw values, rendering them as text when every value is an ASCII
    /// character code.
    ///
    /// An empty segment renders as empty text.
    #[must_use]
    pub fn rendered(values: Vec<i64>) -> Self {
        let text = values
            .iter()
            .map(|&value| {
                u8::try_from(value)
                    .ok()
                    .filter(|_| is_ascii_code(value))
                    .map(char::from)
            })
            .collect::<Option<String>>();
        Self { values, text }
    }

    /// Raw output values in production order.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Text rendering, present only when the whole segment is printable.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Last value produced, if any.
    #[must_use]
    pub fn last(&self) -> Option<i64> {
        self.values.last().copied()
    }

    /// Number of values produced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the output, returning the raw values.
    #[must_use]
    pub fn into_values(self) -> Vec<i64> {
        self.values
    }
}
