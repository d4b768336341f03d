use super::targets::DepthTargetArray;
use crate::{
    common::{
        descriptor_set::DescriptorSet,
        descriptor_set_layout::DescriptorSetLayout,
        sampler::Sampler,
    },
    error::Result,
};
use ash::vk;

/// Comparison sampler shared by every slot.
///
/// `GREATER` against a depth buffer cleared to 1.0 only gives meaningful
/// results if the light projection and the consuming shader agree on the
/// depth convention; nothing here checks that.
pub fn shadow_sampler_create_info() -> vk::SamplerCreateInfo<'static> {
    vk::SamplerCreateInfo::default()
        .mag_filter(vk::Filter::LINEAR)
        .min_filter(vk::Filter::LINEAR)
        .mipmap_mode(vk::SamplerMipmapMode::LINEAR)
        .address_mode_u(vk::SamplerAddressMode::CLAMP_TO_BORDER)
        .address_mode_v(vk::SamplerAddressMode::CLAMP_TO_BORDER)
        .address_mode_w(vk::SamplerAddressMode::CLAMP_TO_BORDER)
        .border_color(vk::BorderColor::FLOAT_OPAQUE_WHITE)
        .anisotropy_enable(false)
        .compare_enable(true)
        .compare_op(vk::CompareOp::GREATER)
        .mip_lod_bias(0.0)
        .min_lod(0.0)
        .max_lod(vk::LOD_CLAMP_NONE)
        .unnormalized_coordinates(false)
}

pub fn create_shadow_sampler(device: &ash::Device) -> Result<Sampler> {
    log::info!("creating shadow sampler");
    Sampler::new(&shadow_sampler_create_info(), device.clone())
}

pub fn shadow_array_binding(slot_count: u32) -> vk::DescriptorSetLayoutBinding<'static> {
    vk::DescriptorSetLayoutBinding::default()
        .binding(0)
        .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
        .descriptor_count(slot_count)
        .stage_flags(vk::ShaderStageFlags::FRAGMENT)
}

pub fn create_shadow_set_layout(
    slot_count: u32,
    device: &ash::Device,
) -> Result<DescriptorSetLayout> {
    log::info!("creating shadow descriptor set layout");
    let bindings = [shadow_array_binding(slot_count)];
    DescriptorSetLayout::new(
        &vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings),
        device.clone(),
    )
}

pub fn shadow_image_infos(
    targets: &DepthTargetArray,
    sampler: vk::Sampler,
) -> Vec<vk::DescriptorImageInfo> {
    targets
        .iter()
        .map(|target| {
            vk::DescriptorImageInfo::default()
                .sampler(sampler)
                .image_view(target.view())
                .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
        })
        .collect()
}

/// Allocates a fresh array set and writes every slot in one update.
pub fn allocate_shadow_set(
    layout: &DescriptorSetLayout,
    descriptor_pool: vk::DescriptorPool,
    targets: &DepthTargetArray,
    sampler: &Sampler,
    device: &ash::Device,
) -> Result<DescriptorSet> {
    log::info!("creating shadow descriptor set");
    let descriptor_set = DescriptorSet::new(
        layout.vk_descriptor_set_layout(),
        descriptor_pool,
        device.clone(),
    )?;

    log::info!("updating shadow descriptor set");
    let image_infos = shadow_image_infos(targets, sampler.vk_sampler());
    let descriptor_writes = [vk::WriteDescriptorSet::default()
        .dst_set(descriptor_set.vk_descriptor_set())
        .dst_binding(0)
        .dst_array_element(0)
        .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
        .image_info(&image_infos)];
    unsafe {
        device.update_descriptor_sets(&descriptor_writes, &[]);
    }

    Ok(descriptor_set)
}
