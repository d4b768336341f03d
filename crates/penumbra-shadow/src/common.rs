pub mod buffer;
pub mod descriptor_set;
pub mod descriptor_set_layout;
pub mod framebuffer;
pub mod graphics_pipeline;
pub mod image_buffer;
pub mod image_view;
pub mod pipeline_layout;
pub mod render_pass;
pub mod sampler;
