use crate::error::{
    Precondition,
    Result,
};
use ash::vk;
use serde::Deserialize;

/// Size of the shadow map array. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    pub slot_count: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            slot_count: 1,
            width: 256,
            height: 256,
        }
    }
}

impl ShadowSettings {
    pub fn new(slot_count: u32, width: u32, height: u32) -> Self {
        Self {
            slot_count,
            width,
            height,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 {
            return Err(
                Precondition::InvalidSettings("slot_count must be at least 1".into()).into(),
            );
        }
        if self.width == 0 || self.height == 0 {
            return Err(Precondition::InvalidSettings(format!(
                "shadow map extent must be non-zero, got {}x{}",
                self.width, self.height
            ))
            .into());
        }
        Ok(())
    }

    pub fn extent(&self) -> vk::Extent2D {
        vk::Extent2D {
            width: self.width,
            height: self.height,
        }
    }
}
