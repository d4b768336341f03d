mod common;
pub mod error;
pub mod settings;
pub mod shadow;

pub use error::{
    Precondition,
    ShadowError,
};
pub use settings::ShadowSettings;
pub use shadow::{
    pipeline::ShaderStage,
    recorder::{
        CommandTarget,
        DrawRecorder,
        PassCommands,
    },
    state::ShadowState,
    subsystem::ShadowSubsystem,
};
