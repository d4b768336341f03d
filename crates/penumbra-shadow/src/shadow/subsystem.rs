use super::{
    descriptor::{
        allocate_shadow_set,
        create_shadow_sampler,
        create_shadow_set_layout,
    },
    pass::{
        record_light_pass,
        LightPass,
    },
    pipeline::{
        ShaderStage,
        ShadowPipeline,
    },
    recorder::{
        DrawRecorder,
        PassCommands,
    },
    render_pass::create_shadow_render_pass,
    state::{
        check_slot,
        ShadowState,
    },
    targets::{
        DepthTargetArray,
        FramebufferSet,
    },
    transform::TransformResource,
};
use crate::{
    common::{
        descriptor_set::DescriptorSet,
        descriptor_set_layout::DescriptorSetLayout,
        render_pass::RenderPass,
        sampler::Sampler,
    },
    error::{
        Precondition,
        Result,
    },
    settings::ShadowSettings,
};
use ash::vk;
use nalgebra_glm::Mat4;
use std::sync::Arc;

/// Per-light shadow maps: one depth target per slot, rendered one light at a
/// time and exposed to later passes as a comparison-sampled array.
///
/// Usage: [`new`](Self::new), then [`configure_descriptors`](Self::configure_descriptors),
/// then [`configure_pipeline`](Self::configure_pipeline), then
/// [`trigger_pass`](Self::trigger_pass) once per light and frame.
pub struct ShadowSubsystem {
    // Field order is drop order: dependents before what they were built from.
    pipeline: Option<ShadowPipeline>,
    shadow_set: Option<DescriptorSet>,
    shadow_set_layout: Option<DescriptorSetLayout>,
    transform: Option<TransformResource>,
    sampler: Sampler,
    framebuffers: FramebufferSet,
    targets: DepthTargetArray,
    render_pass: RenderPass,
    state: ShadowState,
    settings: ShadowSettings,
    allocator: Arc<vk_mem::Allocator>,
    device: ash::Device,
}

impl ShadowSubsystem {
    pub fn new(
        device: &ash::Device,
        allocator: &Arc<vk_mem::Allocator>,
        settings: ShadowSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let extent = settings.extent();

        let render_pass = create_shadow_render_pass(device)?;
        let targets =
            DepthTargetArray::new(settings.slot_count as usize, extent, device, allocator)?;
        let framebuffers =
            FramebufferSet::new(&targets, render_pass.vk_render_pass(), extent, device)?;
        let sampler = create_shadow_sampler(device)?;

        Ok(Self {
            pipeline: None,
            shadow_set: None,
            shadow_set_layout: None,
            transform: None,
            sampler,
            framebuffers,
            targets,
            render_pass,
            state: ShadowState::Uninitialized,
            settings,
            allocator: allocator.clone(),
            device: device.clone(),
        })
    }

    /// Creates the transform resource and the array layout on first use, then
    /// allocates a new array set from `descriptor_pool` and writes every slot.
    ///
    /// Calling again replaces the array set; the old one is freed back to the
    /// pool it came from, so pools must allow `FREE_DESCRIPTOR_SET` and the old
    /// set must no longer be in use by pending work. Nothing is kept if any
    /// step fails.
    pub fn configure_descriptors(&mut self, descriptor_pool: vk::DescriptorPool) -> Result<()> {
        let created_transform = match self.transform {
            Some(_) => None,
            None => Some(TransformResource::new(
                descriptor_pool,
                &self.device,
                &self.allocator,
            )?),
        };

        let mut created_layout = None;
        let layout = match &self.shadow_set_layout {
            Some(layout) => layout,
            None => &*created_layout.insert(create_shadow_set_layout(
                self.settings.slot_count,
                &self.device,
            )?),
        };
        let shadow_set = allocate_shadow_set(
            layout,
            descriptor_pool,
            &self.targets,
            &self.sampler,
            &self.device,
        )?;

        if let Some(transform) = created_transform {
            self.transform = Some(transform);
        }
        if let Some(layout) = created_layout {
            self.shadow_set_layout = Some(layout);
        }
        self.shadow_set = Some(shadow_set);
        self.state = self.state.after_descriptors();
        Ok(())
    }

    /// Builds the depth-only pipeline. Must follow
    /// [`configure_descriptors`](Self::configure_descriptors) and runs once.
    pub fn configure_pipeline(
        &mut self,
        vertex: ShaderStage<'_>,
        fragment: ShaderStage<'_>,
    ) -> Result<()> {
        let next_state = self.state.after_pipeline()?;
        let transform = self
            .transform
            .as_ref()
            .ok_or(Precondition::DescriptorsNotConfigured)?;

        let pipeline = ShadowPipeline::new(
            self.render_pass.vk_render_pass(),
            self.settings.extent(),
            transform.vk_descriptor_set_layout(),
            vertex,
            fragment,
            &self.device,
        )?;
        self.pipeline = Some(pipeline);
        self.state = next_state;
        Ok(())
    }

    /// Records the shadow pass for `slot` onto `cmd`: transform upload, depth
    /// clear, the caster draws issued by `on_draw`, and the transition that
    /// makes the slot sampleable by the fragment stage.
    ///
    /// All lights share one transform buffer, so calls must be recorded one
    /// after another on the same command stream.
    pub fn trigger_pass<C, F>(
        &mut self,
        slot: usize,
        transform: &Mat4,
        cmd: &mut C,
        on_draw: F,
    ) -> Result<()>
    where
        C: PassCommands,
        F: FnOnce(&mut dyn DrawRecorder),
    {
        self.state.ensure_ready()?;
        let slot = check_slot(slot, self.slot_count())?;

        let (Some(pipeline), Some(transform_resource)) = (&self.pipeline, &mut self.transform)
        else {
            return Err(Precondition::NotReady(self.state).into());
        };
        let (Some(framebuffer), Some(target)) =
            (self.framebuffers.get(slot), self.targets.get(slot))
        else {
            return Err(Precondition::SlotOutOfRange {
                slot,
                slot_count: self.targets.len(),
            }
            .into());
        };

        let pass = LightPass {
            render_pass: self.render_pass.vk_render_pass(),
            framebuffer,
            extent: self.settings.extent(),
            pipeline: pipeline.vk_pipeline(),
            pipeline_layout: pipeline.vk_pipeline_layout(),
            transform_buffer: transform_resource.vk_buffer(),
            transform_set: transform_resource.vk_descriptor_set(),
            depth_image: target.image(),
        };

        log::debug!("shadow pass for slot {}", slot);
        transform_resource.set_transform(transform);
        record_light_pass(cmd, &pass, transform_resource.data(), on_draw)
    }

    pub fn state(&self) -> ShadowState {
        self.state
    }

    pub fn slot_count(&self) -> usize {
        self.targets.len()
    }

    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.settings.extent()
    }

    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass.vk_render_pass()
    }

    pub fn sampler(&self) -> vk::Sampler {
        self.sampler.vk_sampler()
    }

    /// Layout of the array set, for the consuming pass's pipeline layout.
    pub fn shadow_set_layout(&self) -> Option<vk::DescriptorSetLayout> {
        self.shadow_set_layout
            .as_ref()
            .map(DescriptorSetLayout::vk_descriptor_set_layout)
    }

    /// The array set: binding 0, one combined image sampler per slot, each in
    /// `SHADER_READ_ONLY_OPTIMAL` once its pass has been recorded.
    pub fn shadow_set(&self) -> Option<vk::DescriptorSet> {
        self.shadow_set.as_ref().map(DescriptorSet::vk_descriptor_set)
    }

    pub fn depth_image(&self, slot: usize) -> Option<vk::Image> {
        self.targets.get(slot).map(|target| target.image())
    }

    pub fn depth_view(&self, slot: usize) -> Option<vk::ImageView> {
        self.targets.get(slot).map(|target| target.view())
    }
}
