use crate::{
    common::render_pass::RenderPass,
    error::Result,
};
use ash::vk;

pub const SHADOW_DEPTH_FORMAT: vk::Format = vk::Format::D32_SFLOAT;

/// The only attachment: cleared on load, stored, left in attachment layout.
/// The move to `SHADER_READ_ONLY_OPTIMAL` is recorded after each pass.
pub fn depth_attachment() -> vk::AttachmentDescription {
    vk::AttachmentDescription::default()
        .format(SHADOW_DEPTH_FORMAT)
        .samples(vk::SampleCountFlags::TYPE_1)
        .load_op(vk::AttachmentLoadOp::CLEAR)
        .store_op(vk::AttachmentStoreOp::STORE)
        .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
        .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
        .initial_layout(vk::ImageLayout::UNDEFINED)
        .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
}

pub fn depth_attachment_reference() -> vk::AttachmentReference {
    vk::AttachmentReference::default()
        .attachment(0)
        .layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
}

/// Depth-only pass shared by every shadow slot. One subpass, no color
/// attachments and no subpass dependencies.
pub fn create_shadow_render_pass(device: &ash::Device) -> Result<RenderPass> {
    log::info!("creating shadow render pass");
    let attachments = [depth_attachment()];
    let depth_stencil_attachment = depth_attachment_reference();

    let subpasses = [vk::SubpassDescription::default()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .depth_stencil_attachment(&depth_stencil_attachment)];

    let render_pass_create_info = vk::RenderPassCreateInfo::default()
        .attachments(&attachments)
        .subpasses(&subpasses);

    RenderPass::new(&render_pass_create_info, device.clone())
}
