use crate::shadow::state::ShadowState;
use ash::vk;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("Failed to allocate {what}: {result}")]
    AllocationFailure {
        what: &'static str,
        result: vk::Result,
    },

    #[error("Failed to create {what}: {result}")]
    DeviceObjectCreationFailure {
        what: &'static str,
        result: vk::Result,
    },

    #[error("Precondition violated: {0}")]
    PreconditionViolation(#[from] Precondition),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("slot {slot} is out of range for {slot_count} shadow slots")]
    SlotOutOfRange { slot: usize, slot_count: usize },

    #[error("shadow pass is not ready (state: {0:?})")]
    NotReady(ShadowState),

    #[error("descriptors must be configured before the pipeline")]
    DescriptorsNotConfigured,

    #[error("shadow pipeline is already configured")]
    PipelineAlreadyConfigured,

    #[error("a shadow pass is already being recorded")]
    PassActive,

    #[error("invalid shadow settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, ShadowError>;

pub(crate) fn allocation_failure(what: &'static str) -> impl FnOnce(vk::Result) -> ShadowError {
    move |result| ShadowError::AllocationFailure { what, result }
}

pub(crate) fn creation_failure(what: &'static str) -> impl FnOnce(vk::Result) -> ShadowError {
    move |result| ShadowError::DeviceObjectCreationFailure { what, result }
}

impl ShadowError {
    /// Driver result code behind the failure, if any.
    pub fn vk_result(&self) -> Option<vk::Result> {
        match self {
            Self::AllocationFailure { result, .. }
            | Self::DeviceObjectCreationFailure { result, .. } => Some(*result),
            Self::PreconditionViolation(_) => None,
        }
    }

    pub fn precondition(&self) -> Option<&Precondition> {
        match self {
            Self::PreconditionViolation(precondition) => Some(precondition),
            _ => None,
        }
    }
}
