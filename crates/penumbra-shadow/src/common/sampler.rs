use crate::error::{
    creation_failure,
    Result,
};
use ash::vk;

pub struct Sampler {
    sampler: vk::Sampler,
    device: ash::Device,
}

impl Sampler {
    pub fn new(create_info: &vk::SamplerCreateInfo, device: ash::Device) -> Result<Self> {
        let sampler = unsafe { device.create_sampler(create_info, None) }
            .map_err(creation_failure("sampler"))?;
        Ok(Self { sampler, device })
    }

    pub fn vk_sampler(&self) -> vk::Sampler {
        self.sampler
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_sampler(self.sampler, None);
        }
    }
}
