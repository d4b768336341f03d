use crate::{
    common::{
        graphics_pipeline::GraphicsPipeline,
        pipeline_layout::PipelineLayout,
    },
    error::Result,
};
use ash::vk;
use std::ffi::CStr;

/// An externally compiled shader module and the entry point to use.
#[derive(Debug, Clone, Copy)]
pub struct ShaderStage<'a> {
    pub module: vk::ShaderModule,
    pub entry_point: &'a CStr,
}

impl ShaderStage<'static> {
    pub fn main(module: vk::ShaderModule) -> Self {
        Self {
            module,
            entry_point: c"main",
        }
    }
}

/// Stride of the position-only vertex stream.
pub const POSITION_STRIDE: u32 = 3 * std::mem::size_of::<f32>() as u32;

pub fn position_binding() -> vk::VertexInputBindingDescription {
    vk::VertexInputBindingDescription::default()
        .binding(0)
        .stride(POSITION_STRIDE)
        .input_rate(vk::VertexInputRate::VERTEX)
}

pub fn position_attribute() -> vk::VertexInputAttributeDescription {
    vk::VertexInputAttributeDescription::default()
        .binding(0)
        .location(0)
        .format(vk::Format::R32G32B32_SFLOAT)
        .offset(0)
}

pub fn rasterization_state() -> vk::PipelineRasterizationStateCreateInfo<'static> {
    vk::PipelineRasterizationStateCreateInfo::default()
        .depth_clamp_enable(false)
        .rasterizer_discard_enable(false)
        .polygon_mode(vk::PolygonMode::FILL)
        .cull_mode(vk::CullModeFlags::NONE)
        .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
        .line_width(1.0)
        .depth_bias_enable(false)
}

pub fn depth_stencil_state() -> vk::PipelineDepthStencilStateCreateInfo<'static> {
    vk::PipelineDepthStencilStateCreateInfo::default()
        .depth_test_enable(true)
        .depth_write_enable(true)
        .depth_compare_op(vk::CompareOp::LESS)
        .depth_bounds_test_enable(false)
        .stencil_test_enable(false)
}

pub fn full_viewport(extent: vk::Extent2D) -> vk::Viewport {
    vk::Viewport::default()
        .x(0.0)
        .y(0.0)
        .width(extent.width as f32)
        .height(extent.height as f32)
        .min_depth(0.0)
        .max_depth(1.0)
}

pub fn full_scissor(extent: vk::Extent2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: 0, y: 0 },
        extent,
    }
}

/// Depth-only pipeline: position input, fixed viewport, no color output.
pub struct ShadowPipeline {
    pipeline: GraphicsPipeline,
    layout: PipelineLayout,
}

impl ShadowPipeline {
    pub fn new(
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
        transform_layout: vk::DescriptorSetLayout,
        vertex: ShaderStage<'_>,
        fragment: ShaderStage<'_>,
        device: &ash::Device,
    ) -> Result<Self> {
        log::info!("creating shadow pipeline layout");
        let set_layouts = [transform_layout];
        let layout = PipelineLayout::new(
            &vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts),
            device.clone(),
        )?;

        log::info!("creating shadow pipeline");
        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vertex.module)
                .name(vertex.entry_point),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(fragment.module)
                .name(fragment.entry_point),
        ];

        let binding_descriptions = [position_binding()];
        let attribute_descriptions = [position_attribute()];
        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&binding_descriptions)
            .vertex_attribute_descriptions(&attribute_descriptions);

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST)
            .primitive_restart_enable(false);

        let viewports = [full_viewport(extent)];
        let scissors = [full_scissor(extent)];
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewports(&viewports)
            .scissors(&scissors);

        let rasterization_state = rasterization_state();

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .rasterization_samples(vk::SampleCountFlags::TYPE_1)
            .sample_shading_enable(false);

        let depth_stencil_state = depth_stencil_state();

        // matches the subpass: zero color attachments
        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .attachments(&[]);

        let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_state)
            .input_assembly_state(&input_assembly_state)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization_state)
            .multisample_state(&multisample_state)
            .depth_stencil_state(&depth_stencil_state)
            .color_blend_state(&color_blend_state)
            .layout(layout.vk_pipeline_layout())
            .render_pass(render_pass)
            .subpass(0);

        let pipeline = GraphicsPipeline::new(&pipeline_create_info, device.clone())?;

        Ok(Self { pipeline, layout })
    }

    pub fn vk_pipeline(&self) -> vk::Pipeline {
        self.pipeline.vk_pipeline()
    }

    pub fn vk_pipeline_layout(&self) -> vk::PipelineLayout {
        self.layout.vk_pipeline_layout()
    }
}
