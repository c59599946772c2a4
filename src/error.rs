use thiserror::Error;

/// Errors surfaced by roster operations. Slot and construction errors are
/// synchronous and never recovered internally; transport failures propagate
/// untouched because the core does not retry sends.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("slot index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
    #[error("capacity {requested} exceeds the viewer maximum of {maximum}")]
    CapacityExceeded { requested: usize, maximum: usize },
    #[error("min column width {min} exceeds max column width {max}")]
    InvalidColumnWidths { min: usize, max: usize },
    #[error("roster has no free slot")]
    Full,
    #[error("transport delivery failed: {0}")]
    Transport(anyhow::Error),
}
