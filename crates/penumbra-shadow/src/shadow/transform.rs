use crate::{
    common::{
        buffer::Buffer,
        descriptor_set::DescriptorSet,
        descriptor_set_layout::DescriptorSetLayout,
    },
    error::Result,
};
use ash::vk;
use nalgebra_glm::Mat4;
use penumbra_types::uniform::ShadowTransform;
use std::sync::Arc;

pub const SHADOW_TRANSFORM_SIZE: vk::DeviceSize =
    std::mem::size_of::<ShadowTransform>() as vk::DeviceSize;

/// The light-space transform uniform, shared by every light in turn.
pub struct TransformResource {
    set: DescriptorSet,
    layout: DescriptorSetLayout,
    buffer: Buffer,
    data: ShadowTransform,
}

impl TransformResource {
    pub fn new(
        descriptor_pool: vk::DescriptorPool,
        device: &ash::Device,
        allocator: &Arc<vk_mem::Allocator>,
    ) -> Result<Self> {
        log::info!("creating shadow transform uniform buffer");
        let buffer = Buffer::new(
            SHADOW_TRANSFORM_SIZE,
            vk::BufferUsageFlags::UNIFORM_BUFFER | vk::BufferUsageFlags::TRANSFER_DST,
            vk_mem::MemoryUsage::AutoPreferDevice,
            allocator.clone(),
        )?;

        log::info!("creating shadow transform descriptor set layout");
        let bindings = [vk::DescriptorSetLayoutBinding::default()
            .binding(0)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
            .descriptor_count(1)
            .stage_flags(vk::ShaderStageFlags::VERTEX)];
        let layout = DescriptorSetLayout::new(
            &vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings),
            device.clone(),
        )?;

        log::info!("creating shadow transform descriptor set");
        let set = DescriptorSet::new(
            layout.vk_descriptor_set_layout(),
            descriptor_pool,
            device.clone(),
        )?;
        let buffer_info = [vk::DescriptorBufferInfo::default()
            .buffer(buffer.vk_buffer())
            .offset(0)
            .range(buffer.size())];
        let descriptor_writes = [vk::WriteDescriptorSet::default()
            .dst_set(set.vk_descriptor_set())
            .dst_binding(0)
            .dst_array_element(0)
            .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
            .buffer_info(&buffer_info)];
        unsafe {
            device.update_descriptor_sets(&descriptor_writes, &[]);
        }

        Ok(Self {
            set,
            layout,
            buffer,
            data: ShadowTransform::default(),
        })
    }

    pub fn set_transform(&mut self, transform: &Mat4) {
        self.data = ShadowTransform::new(transform);
    }

    pub fn data(&self) -> &ShadowTransform {
        &self.data
    }

    pub fn vk_buffer(&self) -> vk::Buffer {
        self.buffer.vk_buffer()
    }

    pub fn vk_descriptor_set_layout(&self) -> vk::DescriptorSetLayout {
        self.layout.vk_descriptor_set_layout()
    }

    pub fn vk_descriptor_set(&self) -> vk::DescriptorSet {
        self.set.vk_descriptor_set()
    }
}
