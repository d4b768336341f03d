use crate::error::{
    creation_failure,
    Result,
};
use ash::vk;

pub struct DescriptorSetLayout {
    descriptor_set_layout: vk::DescriptorSetLayout,
    device: ash::Device,
}

impl DescriptorSetLayout {
    pub fn new(
        create_info: &vk::DescriptorSetLayoutCreateInfo,
        device: ash::Device,
    ) -> Result<Self> {
        let descriptor_set_layout =
            unsafe { device.create_descriptor_set_layout(create_info, None) }
                .map_err(creation_failure("descriptor set layout"))?;

        Ok(Self {
            descriptor_set_layout,
            device,
        })
    }

    pub fn vk_descriptor_set_layout(&self) -> vk::DescriptorSetLayout {
        self.descriptor_set_layout
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.device
                .destroy_descriptor_set_layout(self.descriptor_set_layout, None);
        }
    }
}
