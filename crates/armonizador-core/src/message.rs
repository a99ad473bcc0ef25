//! Named control messages understood by the armonizador

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArmonizadorError;
use crate::params::ParamRange;

/// Message selector, spelled on the wire the way patches spell it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Mode,
    Degree,
    Octave,
    Tempo,
    Arpeggio,
}

impl Selector {
    pub const ALL: [Selector; 5] = [
        Self::Mode,
        Self::Degree,
        Self::Octave,
        Self::Tempo,
        Self::Arpeggio,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Mode => "modo",
            Self::Degree => "grado",
            Self::Octave => "octava",
            Self::Tempo => "tempo",
            Self::Arpeggio => "arpegio",
        }
    }

    pub fn range(&self) -> ParamRange {
        match self {
            Self::Mode => ParamRange::MODE,
            Self::Degree => ParamRange::DEGREE,
            Self::Octave => ParamRange::OCTAVE,
            Self::Tempo => ParamRange::TEMPO,
            Self::Arpeggio => ParamRange::ARPEGGIO,
        }
    }

    /// Whether handling this selector recomputes and emits the chord
    pub fn recomputes_chord(&self) -> bool {
        matches!(self, Self::Mode | Self::Degree | Self::Octave)
    }
}

impl FromStr for Selector {
    type Err = ArmonizadorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sel| sel.wire_name() == s)
            .ok_or_else(|| ArmonizadorError::UnknownSelector(s.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One control message with its single float argument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub selector: Selector,
    pub value: f32,
}

impl Message {
    pub fn new(selector: Selector, value: f32) -> Self {
        Self { selector, value }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.selector, self.value)
    }
}
