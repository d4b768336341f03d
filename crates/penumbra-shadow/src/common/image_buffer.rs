use crate::error::{
    allocation_failure,
    Result,
};
use ash::vk;
use std::sync::Arc;
use vk_mem::Alloc as _;

/// Image whose memory is owned by a `vk_mem` allocation.
pub struct ImageBuffer {
    image: vk::Image,
    allocation: vk_mem::Allocation,
    allocator: Arc<vk_mem::Allocator>,
    format: vk::Format,
}

impl ImageBuffer {
    pub fn new(
        image_create_info: &vk::ImageCreateInfo,
        memory_usage: vk_mem::MemoryUsage,
        allocator: Arc<vk_mem::Allocator>,
    ) -> Result<Self> {
        let allocation_create_info = vk_mem::AllocationCreateInfo {
            usage: memory_usage,
            ..Default::default()
        };
        let (image, allocation) =
            unsafe { allocator.create_image(image_create_info, &allocation_create_info) }
                .map_err(allocation_failure("image"))?;

        Ok(Self {
            image,
            allocation,
            allocator,
            format: image_create_info.format,
        })
    }

    pub fn image(&self) -> vk::Image {
        self.image
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }
}

impl Drop for ImageBuffer {
    fn drop(&mut self) {
        unsafe {
            self.allocator.destroy_image(self.image, &mut self.allocation);
        }
    }
}
