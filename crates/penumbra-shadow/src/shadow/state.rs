use crate::error::{
    Precondition,
    Result,
};

/// Configuration progress of a [`ShadowSubsystem`](super::subsystem::ShadowSubsystem).
///
/// `Uninitialized -> DescriptorsConfigured -> Ready`. Reconfiguring the
/// descriptors keeps the current state; the pipeline is built exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowState {
    #[default]
    Uninitialized,
    DescriptorsConfigured,
    /// Pipeline configured; passes may be recorded.
    Ready,
}

impl ShadowState {
    pub fn after_descriptors(self) -> ShadowState {
        match self {
            ShadowState::Uninitialized => ShadowState::DescriptorsConfigured,
            configured => configured,
        }
    }

    pub fn after_pipeline(self) -> Result<ShadowState> {
        match self {
            ShadowState::Uninitialized => Err(Precondition::DescriptorsNotConfigured.into()),
            ShadowState::DescriptorsConfigured => Ok(ShadowState::Ready),
            ShadowState::Ready => Err(Precondition::PipelineAlreadyConfigured.into()),
        }
    }

    pub fn ensure_ready(self) -> Result<()> {
        match self {
            ShadowState::Ready => Ok(()),
            state => Err(Precondition::NotReady(state).into()),
        }
    }
}

/// Checks `slot` against the fixed array size.
pub fn check_slot(slot: usize, slot_count: usize) -> Result<usize> {
    if slot < slot_count {
        Ok(slot)
    } else {
        Err(Precondition::SlotOutOfRange { slot, slot_count }.into())
    }
}
