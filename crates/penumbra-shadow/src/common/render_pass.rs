use crate::error::{
    creation_failure,
    Result,
};
use ash::vk;

pub struct RenderPass {
    vk_render_pass: vk::RenderPass,
    device: ash::Device,
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_render_pass(self.vk_render_pass, None);
        }
    }
}

impl RenderPass {
    pub fn new(
        render_pass_create_info: &vk::RenderPassCreateInfo,
        device: ash::Device,
    ) -> Result<Self> {
        let vk_render_pass = unsafe { device.create_render_pass(render_pass_create_info, None) }
            .map_err(creation_failure("render pass"))?;
        Ok(Self {
            vk_render_pass,
            device,
        })
    }

    pub fn vk_render_pass(&self) -> vk::RenderPass {
        self.vk_render_pass
    }
}
