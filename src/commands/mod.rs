mod presets;
mod run;
mod survival;

pub use presets::list_presets;
pub use run::{run, RunArgs};
pub use survival::{survival, SurvivalArgs};
