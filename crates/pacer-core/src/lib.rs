//! Word pacing core: segmentation, ORP placement, cadence, and playback.
//!
//! Text goes through [`segment`] into a sequence of [`Unit`]s which a
//! [`ReaderEngine`] plays back one at a time. Each unit is held for
//! [`delay_ms`] before the heartbeat advances to the next one. Renderers read
//! the current unit from [`ReaderState`] and place it with [`orp_index`].

pub mod cadence;
pub mod content;
pub mod error;
pub mod orp;
pub mod playback;
pub mod progress;
pub mod settings;

pub use cadence::{CadenceProfile, delay_ms};
pub use content::{Unit, segment};
pub use error::{PacerError, PacerResult};
pub use orp::{OrpSplit, orp_index};
pub use playback::{ReaderEngine, ReaderState, TickResult};
pub use settings::ReaderConfig;
