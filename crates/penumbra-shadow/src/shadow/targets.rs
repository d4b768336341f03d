use super::render_pass::SHADOW_DEPTH_FORMAT;
use crate::{
    common::{
        framebuffer::Framebuffer,
        image_buffer::ImageBuffer,
        image_view::ImageView,
    },
    error::Result,
};
use ash::vk;
use std::sync::Arc;

pub fn depth_image_create_info(extent: vk::Extent2D) -> vk::ImageCreateInfo<'static> {
    vk::ImageCreateInfo::default()
        .image_type(vk::ImageType::TYPE_2D)
        .format(SHADOW_DEPTH_FORMAT)
        .extent(
            vk::Extent3D::default()
                .width(extent.width)
                .height(extent.height)
                .depth(1),
        )
        .mip_levels(1)
        .array_layers(1)
        .samples(vk::SampleCountFlags::TYPE_1)
        .tiling(vk::ImageTiling::OPTIMAL)
        .usage(
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
                | vk::ImageUsageFlags::SAMPLED
                | vk::ImageUsageFlags::TRANSFER_SRC,
        )
        .sharing_mode(vk::SharingMode::EXCLUSIVE)
        .initial_layout(vk::ImageLayout::UNDEFINED)
}

/// Depth aspect of mip 0, layer 0: everything a shadow image has.
pub fn depth_subresource_range() -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange::default()
        .aspect_mask(vk::ImageAspectFlags::DEPTH)
        .base_mip_level(0)
        .level_count(1)
        .base_array_layer(0)
        .layer_count(1)
}

pub struct DepthTarget {
    // view before image
    view: ImageView,
    image: ImageBuffer,
}

impl DepthTarget {
    fn new(
        extent: vk::Extent2D,
        device: &ash::Device,
        allocator: &Arc<vk_mem::Allocator>,
    ) -> Result<Self> {
        let image = ImageBuffer::new(
            &depth_image_create_info(extent),
            vk_mem::MemoryUsage::AutoPreferDevice,
            allocator.clone(),
        )?;

        let view = ImageView::new(
            &vk::ImageViewCreateInfo::default()
                .image(image.image())
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(image.format())
                .subresource_range(depth_subresource_range()),
            device.clone(),
        )?;

        Ok(Self { view, image })
    }

    pub fn image(&self) -> vk::Image {
        self.image.image()
    }

    pub fn view(&self) -> vk::ImageView {
        self.view.vk_image_view()
    }
}

/// `slot_count` depth images and views, created once in slot order.
pub struct DepthTargetArray {
    targets: Vec<DepthTarget>,
}

impl DepthTargetArray {
    pub fn new(
        slot_count: usize,
        extent: vk::Extent2D,
        device: &ash::Device,
        allocator: &Arc<vk_mem::Allocator>,
    ) -> Result<Self> {
        log::info!(
            "creating {} shadow depth targets ({}x{})",
            slot_count,
            extent.width,
            extent.height
        );
        let targets = (0..slot_count)
            .map(|_| DepthTarget::new(extent, device, allocator))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&DepthTarget> {
        self.targets.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepthTarget> {
        self.targets.iter()
    }
}

/// One framebuffer per depth target, all against the shared render pass.
pub struct FramebufferSet {
    framebuffers: Vec<Framebuffer>,
}

impl FramebufferSet {
    pub fn new(
        targets: &DepthTargetArray,
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
        device: &ash::Device,
    ) -> Result<Self> {
        log::info!("creating shadow framebuffers");
        let framebuffers = targets
            .iter()
            .map(|target| Framebuffer::new(render_pass, &[target.view()], extent, device.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { framebuffers })
    }

    pub fn len(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.framebuffers.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<vk::Framebuffer> {
        self.framebuffers.get(slot).map(Framebuffer::vk_framebuffer)
    }
}
