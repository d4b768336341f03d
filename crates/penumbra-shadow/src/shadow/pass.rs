use super::{
    pipeline::full_scissor,
    recorder::{
        DrawRecorder,
        PassCommands,
    },
    targets::depth_subresource_range,
};
use crate::error::{
    Precondition,
    Result,
};
use ash::vk;
use penumbra_types::uniform::ShadowTransform;

/// Depth written by the clear; anything not covered by a caster keeps it.
pub const SHADOW_CLEAR_DEPTH: f32 = 1.0;

/// Handles needed to record one light's pass.
#[derive(Debug, Clone, Copy)]
pub struct LightPass {
    pub render_pass: vk::RenderPass,
    pub framebuffer: vk::Framebuffer,
    pub extent: vk::Extent2D,
    pub pipeline: vk::Pipeline,
    pub pipeline_layout: vk::PipelineLayout,
    pub transform_buffer: vk::Buffer,
    pub transform_set: vk::DescriptorSet,
    pub depth_image: vk::Image,
}

/// The previous light's vertex reads must finish before the transform is
/// overwritten.
pub fn transform_overwrite_barrier(buffer: vk::Buffer) -> vk::BufferMemoryBarrier2<'static> {
    vk::BufferMemoryBarrier2::default()
        .src_stage_mask(vk::PipelineStageFlags2::VERTEX_SHADER)
        .src_access_mask(vk::AccessFlags2::NONE)
        .dst_stage_mask(vk::PipelineStageFlags2::TRANSFER)
        .dst_access_mask(vk::AccessFlags2::TRANSFER_WRITE)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .buffer(buffer)
        .offset(0)
        .size(vk::WHOLE_SIZE)
}

/// The uploaded transform must be visible to this light's vertex stage.
pub fn transform_visible_barrier(buffer: vk::Buffer) -> vk::BufferMemoryBarrier2<'static> {
    vk::BufferMemoryBarrier2::default()
        .src_stage_mask(vk::PipelineStageFlags2::TRANSFER)
        .src_access_mask(vk::AccessFlags2::TRANSFER_WRITE)
        .dst_stage_mask(vk::PipelineStageFlags2::VERTEX_SHADER)
        .dst_access_mask(vk::AccessFlags2::UNIFORM_READ)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .buffer(buffer)
        .offset(0)
        .size(vk::WHOLE_SIZE)
}

/// Hands a freshly rendered slot over to fragment-shader sampling.
pub fn slot_release_barrier(image: vk::Image) -> vk::ImageMemoryBarrier2<'static> {
    vk::ImageMemoryBarrier2::default()
        .src_stage_mask(vk::PipelineStageFlags2::LATE_FRAGMENT_TESTS)
        .src_access_mask(
            vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_READ
                | vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_WRITE,
        )
        .dst_stage_mask(vk::PipelineStageFlags2::FRAGMENT_SHADER)
        .dst_access_mask(vk::AccessFlags2::SHADER_READ)
        .old_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
        .new_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(depth_subresource_range())
}

/// Records upload, pass, caster draws and the post-pass transition for one
/// light onto `cmd`.
pub fn record_light_pass<C, F>(
    cmd: &mut C,
    pass: &LightPass,
    transform: &ShadowTransform,
    on_draw: F,
) -> Result<()>
where
    C: PassCommands,
    F: FnOnce(&mut dyn DrawRecorder),
{
    if cmd.in_render_pass() {
        return Err(Precondition::PassActive.into());
    }

    log::debug!("upload shadow transform");
    cmd.pipeline_barrier(&[transform_overwrite_barrier(pass.transform_buffer)], &[]);
    cmd.update_buffer(pass.transform_buffer, 0, bytemuck::bytes_of(transform));
    cmd.pipeline_barrier(&[transform_visible_barrier(pass.transform_buffer)], &[]);

    log::debug!("begin shadow render pass");
    let clear_values = [vk::ClearValue {
        depth_stencil: vk::ClearDepthStencilValue {
            depth: SHADOW_CLEAR_DEPTH,
            stencil: 0,
        },
    }];
    cmd.begin_render_pass(
        pass.render_pass,
        pass.framebuffer,
        full_scissor(pass.extent),
        &clear_values,
    );

    log::debug!("bind shadow pipeline");
    cmd.bind_pipeline(pass.pipeline);
    cmd.bind_descriptor_sets(pass.pipeline_layout, 0, &[pass.transform_set]);

    log::debug!("draw shadow casters");
    on_draw(&mut *cmd);

    log::debug!("end shadow render pass");
    cmd.end_render_pass();

    log::debug!("depth: attachment -> shader read");
    cmd.pipeline_barrier(&[], &[slot_release_barrier(pass.depth_image)]);

    Ok(())
}
