use crate::error::{
    allocation_failure,
    Result,
};
use ash::vk;
use std::sync::Arc;
use vk_mem::Alloc as _;

/// Buffer whose memory is owned by a `vk_mem` allocation.
pub struct Buffer {
    buffer: vk::Buffer,
    allocation: vk_mem::Allocation,
    allocator: Arc<vk_mem::Allocator>,
    size: vk::DeviceSize,
}

impl Buffer {
    pub fn new(
        size: vk::DeviceSize,
        usage_flags: vk::BufferUsageFlags,
        memory_usage: vk_mem::MemoryUsage,
        allocator: Arc<vk_mem::Allocator>,
    ) -> Result<Self> {
        let create_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage_flags)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let allocation_create_info = vk_mem::AllocationCreateInfo {
            usage: memory_usage,
            ..Default::default()
        };

        let (buffer, allocation) =
            unsafe { allocator.create_buffer(&create_info, &allocation_create_info) }
                .map_err(allocation_failure("buffer"))?;

        Ok(Self {
            buffer,
            allocation,
            allocator,
            size,
        })
    }

    pub fn vk_buffer(&self) -> vk::Buffer {
        self.buffer
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.allocator.destroy_buffer(self.buffer, &mut self.allocation);
        }
    }
}
