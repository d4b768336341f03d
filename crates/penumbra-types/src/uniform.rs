//! GPU-side layouts shared between the shadow pass and the lighting pass.
//!
//! Every struct here is laid out to match std140 without implicit padding,
//! so it can be uploaded with `bytemuck::bytes_of`.

use bytemuck::{
    Pod,
    Zeroable,
};
use nalgebra_glm::{
    Mat4,
    Vec3,
    Vec4,
};

/// Column-major 4x4 matrix as the shaders see it.
pub type GpuMat4 = [[f32; 4]; 4];

pub fn to_gpu_mat4(mat: &Mat4) -> GpuMat4 {
    std::array::from_fn(|column| std::array::from_fn(|row| mat[(row, column)]))
}

/// Light-space transform consumed by the shadow vertex shader.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct ShadowTransform {
    pub mat: GpuMat4,
}

impl ShadowTransform {
    pub fn new(mat: &Mat4) -> Self {
        Self {
            mat: to_gpu_mat4(mat),
        }
    }
}

impl Default for ShadowTransform {
    fn default() -> Self {
        Self::new(&Mat4::identity())
    }
}

#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct SceneUniform {
    pub model: GpuMat4,
    pub view: GpuMat4,
    pub projection: GpuMat4,
    pub cam_pos: [f32; 3],
    // shares the last 16-byte slot with cam_pos
    pub light_count: i32,
}

impl SceneUniform {
    pub fn new(
        model: &Mat4,
        view: &Mat4,
        projection: &Mat4,
        cam_pos: &Vec3,
        light_count: i32,
    ) -> Self {
        Self {
            model: to_gpu_mat4(model),
            view: to_gpu_mat4(view),
            projection: to_gpu_mat4(projection),
            cam_pos: [cam_pos.x, cam_pos.y, cam_pos.z],
            light_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
#[repr(C)]
pub struct SpotLight {
    pub color: [f32; 4],
    pub position: [f32; 4],
    pub direction: [f32; 3],
    /// Full cone angle in radians.
    pub fov: f32,
}

impl SpotLight {
    pub fn new(color: &Vec4, position: &Vec3, direction: &Vec3, fov: f32) -> Self {
        Self {
            color: [color.x, color.y, color.z, color.w],
            position: [position.x, position.y, position.z, 1.0],
            direction: [direction.x, direction.y, direction.z],
            fov,
        }
    }
}

/// Fixed-size uniform array, e.g. `LightArray<SpotLight, 8>`.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct LightArray<T, const N: usize> {
    pub array: [T; N],
}

// SAFETY: `repr(transparent)` over `[T; N]`, which is Pod/Zeroable whenever T is.
unsafe impl<T: Zeroable, const N: usize> Zeroable for LightArray<T, N> {}
unsafe impl<T: Pod, const N: usize> Pod for LightArray<T, N> {}

impl<T: Zeroable, const N: usize> Default for LightArray<T, N> {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}
