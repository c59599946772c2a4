use crate::error::RosterError;

/// Hard protocol ceiling on slot count: the remote viewer renders a 4x20 grid
/// per column page, 80 entries total.
pub const MAX_SLOTS: usize = 4 * 20;

/// Construction-time parameters for a [`Roster`](crate::sync::Roster).
///
/// Column widths apply to display text before emission: text is right-padded
/// with spaces up to `min_column_width` and truncated down to
/// `max_column_width` when one is set (`None` means unbounded).
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub capacity: usize,
    pub min_column_width: usize,
    pub max_column_width: Option<usize>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_SLOTS,
            min_column_width: 0,
            max_column_width: None,
        }
    }
}

impl RosterConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_column_widths(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_column_width = min;
        self.max_column_width = max;
        self
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        if self.capacity > MAX_SLOTS {
            return Err(RosterError::CapacityExceeded {
                requested: self.capacity,
                maximum: MAX_SLOTS,
            });
        }
        if let Some(max) = self.max_column_width {
            if self.min_column_width > max {
                return Err(RosterError::InvalidColumnWidths {
                    min: self.min_column_width,
                    max,
                });
            }
        }
        Ok(())
    }
}
