pub mod descriptor;
pub mod pass;
pub mod pipeline;
pub mod recorder;
pub mod render_pass;
pub mod state;
pub mod subsystem;
pub mod targets;
pub mod transform;
