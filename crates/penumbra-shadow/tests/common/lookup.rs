//! A small consumer of the shadow array: a full-screen pass that samples two
//! slots through the bound array set and writes both comparison results to a
//! color target that can be read back.

use super::{
    GpuContext,
    HostBuffer,
};
use anyhow::Result;
use ash::vk;
use std::sync::Arc;
use vk_mem::Alloc as _;

pub const LOOKUP_FORMAT: vk::Format = vk::Format::R32G32B32A32_SFLOAT;
const LOOKUP_TEXEL_SIZE: usize = 4 * std::mem::size_of::<f32>();

const FULLSCREEN_WGSL: &str = r#"
@vertex
fn main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    let x = f32((index << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(index & 2u) * 2.0 - 1.0;
    return vec4<f32>(x, y, 0.0, 1.0);
}
"#;

/// Image and sampler halves of the combined-image-sampler array share
/// binding 0, so one shader reads the set exactly as a lighting pass would.
fn lookup_fragment_wgsl(
    slot_count: usize,
    extent: vk::Extent2D,
    slots: [usize; 2],
    reference: f32,
) -> String {
    format!(
        r#"
@group(0) @binding(0) var shadow_maps: binding_array<texture_depth_2d, {slot_count}>;
@group(0) @binding(0) var shadow_samplers: binding_array<sampler_comparison, {slot_count}>;

@fragment
fn main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {{
    let uv = frag_coord.xy / vec2<f32>({width}.0, {height}.0);
    let first = textureSampleCompare(
        shadow_maps[{first}], shadow_samplers[{first}], uv, {reference:.4});
    let second = textureSampleCompare(
        shadow_maps[{second}], shadow_samplers[{second}], uv, {reference:.4});
    return vec4<f32>(first, second, 0.0, 1.0);
}}
"#,
        slot_count = slot_count,
        width = extent.width,
        height = extent.height,
        first = slots[0],
        second = slots[1],
        reference = reference,
    )
}

pub struct ShadowLookup {
    pipeline: vk::Pipeline,
    pipeline_layout: vk::PipelineLayout,
    framebuffer: vk::Framebuffer,
    render_pass: vk::RenderPass,
    view: vk::ImageView,
    image: vk::Image,
    allocation: vk_mem::Allocation,
    allocator: Arc<vk_mem::Allocator>,
    device: ash::Device,
    extent: vk::Extent2D,
}

impl ShadowLookup {
    /// Samples `slots[0]` into red and `slots[1]` into green, comparing
    /// against `reference`.
    pub fn new(
        gpu: &GpuContext,
        shadow_set_layout: vk::DescriptorSetLayout,
        slot_count: usize,
        extent: vk::Extent2D,
        slots: [usize; 2],
        reference: f32,
    ) -> Result<Self> {
        let device = &gpu.device;
        let image_create_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(LOOKUP_FORMAT)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_SRC)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);
        let allocation_create_info = vk_mem::AllocationCreateInfo {
            usage: vk_mem::MemoryUsage::AutoPreferDevice,
            ..Default::default()
        };
        let (image, allocation) =
            unsafe { gpu.allocator().create_image(&image_create_info, &allocation_create_info)? };

        // null handles are skipped by the destroy calls in Drop
        let mut lookup = Self {
            pipeline: vk::Pipeline::null(),
            pipeline_layout: vk::PipelineLayout::null(),
            framebuffer: vk::Framebuffer::null(),
            render_pass: vk::RenderPass::null(),
            view: vk::ImageView::null(),
            image,
            allocation,
            allocator: gpu.allocator().clone(),
            device: device.clone(),
            extent,
        };

        let color_range = vk::ImageSubresourceRange::default()
            .aspect_mask(vk::ImageAspectFlags::COLOR)
            .level_count(1)
            .layer_count(1);
        lookup.view = unsafe {
            device.create_image_view(
                &vk::ImageViewCreateInfo::default()
                    .image(image)
                    .view_type(vk::ImageViewType::TYPE_2D)
                    .format(LOOKUP_FORMAT)
                    .subresource_range(color_range),
                None,
            )?
        };

        let attachments = [vk::AttachmentDescription::default()
            .format(LOOKUP_FORMAT)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)];
        let color_attachments = [vk::AttachmentReference::default()
            .attachment(0)
            .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)];
        let subpasses = [vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachments)];
        lookup.render_pass = unsafe {
            device.create_render_pass(
                &vk::RenderPassCreateInfo::default()
                    .attachments(&attachments)
                    .subpasses(&subpasses),
                None,
            )?
        };

        let views = [lookup.view];
        lookup.framebuffer = unsafe {
            device.create_framebuffer(
                &vk::FramebufferCreateInfo::default()
                    .render_pass(lookup.render_pass)
                    .attachments(&views)
                    .width(extent.width)
                    .height(extent.height)
                    .layers(1),
                None,
            )?
        };

        let set_layouts = [shadow_set_layout];
        lookup.pipeline_layout = unsafe {
            device.create_pipeline_layout(
                &vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts),
                None,
            )?
        };

        let vertex = gpu.shader_module(FULLSCREEN_WGSL)?;
        let fragment =
            gpu.shader_module(&lookup_fragment_wgsl(slot_count, extent, slots, reference))?;
        let stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vertex.module)
                .name(c"main"),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(fragment.module)
                .name(c"main"),
        ];
        let vertex_input = vk::PipelineVertexInputStateCreateInfo::default();
        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST);
        let viewports = [vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }];
        let scissors = [vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        }];
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewports(&viewports)
            .scissors(&scissors);
        let rasterization = vk::PipelineRasterizationStateCreateInfo::default()
            .polygon_mode(vk::PolygonMode::FILL)
            .cull_mode(vk::CullModeFlags::NONE)
            .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
            .line_width(1.0);
        let multisample = vk::PipelineMultisampleStateCreateInfo::default()
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);
        let blend_attachments = [vk::PipelineColorBlendAttachmentState::default()
            .color_write_mask(vk::ColorComponentFlags::RGBA)];
        let color_blend =
            vk::PipelineColorBlendStateCreateInfo::default().attachments(&blend_attachments);
        let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&stages)
            .vertex_input_state(&vertex_input)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization)
            .multisample_state(&multisample)
            .color_blend_state(&color_blend)
            .layout(lookup.pipeline_layout)
            .render_pass(lookup.render_pass)
            .subpass(0);
        let pipelines = unsafe {
            device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_create_info],
                None,
            )
        }
        .map_err(|(_, result)| result)?;
        lookup.pipeline = pipelines[0];

        Ok(lookup)
    }

    pub fn readback_buffer(&self) -> Result<HostBuffer> {
        let size = (self.extent.width * self.extent.height) as usize * LOOKUP_TEXEL_SIZE;
        HostBuffer::new(&self.allocator, size, vk::BufferUsageFlags::TRANSFER_DST)
    }

    /// Records the full-screen lookup with `shadow_set` bound at set 0, then a
    /// copy of the result into `readback`.
    pub fn record(
        &self,
        command_buffer: vk::CommandBuffer,
        shadow_set: vk::DescriptorSet,
        readback: &HostBuffer,
    ) {
        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue {
                float32: [-1.0, -1.0, -1.0, -1.0],
            },
        }];
        let render_pass_begin_info = vk::RenderPassBeginInfo::default()
            .render_pass(self.render_pass)
            .framebuffer(self.framebuffer)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.extent,
            })
            .clear_values(&clear_values);

        let to_transfer = [vk::ImageMemoryBarrier2::default()
            .src_stage_mask(vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT)
            .src_access_mask(vk::AccessFlags2::COLOR_ATTACHMENT_WRITE)
            .dst_stage_mask(vk::PipelineStageFlags2::TRANSFER)
            .dst_access_mask(vk::AccessFlags2::TRANSFER_READ)
            .old_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
            .new_layout(vk::ImageLayout::TRANSFER_SRC_OPTIMAL)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(self.image)
            .subresource_range(
                vk::ImageSubresourceRange::default()
                    .aspect_mask(vk::ImageAspectFlags::COLOR)
                    .level_count(1)
                    .layer_count(1),
            )];
        let region = vk::BufferImageCopy::default()
            .image_subresource(
                vk::ImageSubresourceLayers::default()
                    .aspect_mask(vk::ImageAspectFlags::COLOR)
                    .mip_level(0)
                    .base_array_layer(0)
                    .layer_count(1),
            )
            .image_extent(vk::Extent3D {
                width: self.extent.width,
                height: self.extent.height,
                depth: 1,
            });
        let to_host = [vk::BufferMemoryBarrier2::default()
            .src_stage_mask(vk::PipelineStageFlags2::TRANSFER)
            .src_access_mask(vk::AccessFlags2::TRANSFER_WRITE)
            .dst_stage_mask(vk::PipelineStageFlags2::HOST)
            .dst_access_mask(vk::AccessFlags2::HOST_READ)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .buffer(readback.buffer)
            .size(vk::WHOLE_SIZE)];

        unsafe {
            self.device.cmd_begin_render_pass(
                command_buffer,
                &render_pass_begin_info,
                vk::SubpassContents::INLINE,
            );
            self.device
                .cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, self.pipeline);
            self.device.cmd_bind_descriptor_sets(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline_layout,
                0,
                &[shadow_set],
                &[],
            );
            self.device.cmd_draw(command_buffer, 3, 1, 0, 0);
            self.device.cmd_end_render_pass(command_buffer);

            self.device.cmd_pipeline_barrier2(
                command_buffer,
                &vk::DependencyInfo::default().image_memory_barriers(&to_transfer),
            );
            self.device.cmd_copy_image_to_buffer(
                command_buffer,
                self.image,
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                readback.buffer,
                &[region],
            );
            self.device.cmd_pipeline_barrier2(
                command_buffer,
                &vk::DependencyInfo::default().buffer_memory_barriers(&to_host),
            );
        }
    }
}

/// Comparison results at `(x, y)`: `[first slot, second slot]`.
pub fn lookup_texel(values: &[f32], extent: vk::Extent2D, x: u32, y: u32) -> [f32; 2] {
    let base = (y * extent.width + x) as usize * 4;
    [values[base], values[base + 1]]
}

impl Drop for ShadowLookup {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            self.device
                .destroy_pipeline_layout(self.pipeline_layout, None);
            self.device.destroy_framebuffer(self.framebuffer, None);
            self.device.destroy_render_pass(self.render_pass, None);
            self.device.destroy_image_view(self.view, None);
            self.allocator.destroy_image(self.image, &mut self.allocation);
        }
    }
}
