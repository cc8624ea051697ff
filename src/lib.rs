// Library surface for headless/integration tests and reuse.
// The terminal front end (main.rs + ui) stays bin-only.
pub mod app_dirs;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod device;
pub mod game;
pub mod mode;
pub mod placement;
pub mod runtime;
pub mod scores;
pub mod session;
pub mod util;

pub use game::{Completion, GameController, GameScreen, TapOutcome};
pub use mode::{Difficulty, Mode, MODES};
