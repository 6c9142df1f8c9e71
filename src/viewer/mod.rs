//! Interactive waveform viewer.
//!
//! [`ViewerState`] holds the loaded file and the selected fade;
//! [`WaveformViewer`] owns the terminal and redraws on resize and on
//! "next fade type".

pub mod state;
pub mod ui;

pub use state::ViewerState;
pub use ui::WaveformViewer;
