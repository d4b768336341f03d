use crate::error::{
    creation_failure,
    Result,
};
use ash::vk;

/// A single descriptor set, returned to its pool on drop.
///
/// The pool must be created with `FREE_DESCRIPTOR_SET` and outlive the set.
pub struct DescriptorSet {
    descriptor_set: vk::DescriptorSet,
    descriptor_pool: vk::DescriptorPool,
    device: ash::Device,
}

impl DescriptorSet {
    pub fn new(
        layout: vk::DescriptorSetLayout,
        descriptor_pool: vk::DescriptorPool,
        device: ash::Device,
    ) -> Result<Self> {
        let layouts = [layout];
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(descriptor_pool)
            .set_layouts(&layouts);
        let descriptor_set = unsafe { device.allocate_descriptor_sets(&allocate_info) }
            .map_err(creation_failure("descriptor set"))?[0];

        Ok(Self {
            descriptor_set,
            descriptor_pool,
            device,
        })
    }

    pub fn vk_descriptor_set(&self) -> vk::DescriptorSet {
        self.descriptor_set
    }
}

impl Drop for DescriptorSet {
    fn drop(&mut self) {
        let result = unsafe {
            self.device
                .free_descriptor_sets(self.descriptor_pool, &[self.descriptor_set])
        };
        if let Err(err) = result {
            log::warn!("failed to free descriptor set: {}", err);
        }
    }
}
