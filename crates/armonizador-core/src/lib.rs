//! armonizador-core: chord model and message surface for the armonizador object

pub mod chord;
mod error;
pub mod harmonizer;
pub mod host;
pub mod message;
pub mod params;

pub use chord::{compute_chord, Chord, CHORD_INTERVALS, CHORD_SIZE, SCALE_TEMPLATE};
pub use error::{ArmonizadorError, Result};
pub use harmonizer::{Harmonizer, HarmonizerState, DEFAULT_TEMPO_MS};
pub use host::{Clock, Outlet};
pub use message::{Message, Selector};
pub use params::ParamRange;
