use crate::error::{
    creation_failure,
    Result,
};
use ash::vk;

pub struct GraphicsPipeline {
    pipeline: vk::Pipeline,
    device: ash::Device,
}

impl Drop for GraphicsPipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
        }
    }
}

impl GraphicsPipeline {
    pub fn new(
        pipeline_create_info: &vk::GraphicsPipelineCreateInfo,
        device: ash::Device,
    ) -> Result<Self> {
        let pipelines = unsafe {
            device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                std::slice::from_ref(pipeline_create_info),
                None,
            )
        };
        let pipeline = match pipelines {
            Ok(pipelines) => pipelines[0],
            Err((pipelines, result)) => {
                for pipeline in pipelines.into_iter().filter(|p| *p != vk::Pipeline::null()) {
                    unsafe { device.destroy_pipeline(pipeline, None) };
                }
                return Err(creation_failure("graphics pipeline")(result));
            }
        };
        Ok(Self { pipeline, device })
    }

    pub fn vk_pipeline(&self) -> vk::Pipeline {
        self.pipeline
    }
}
