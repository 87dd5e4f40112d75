// SPDX-License-Identifier: MIT

//! The explicit session value: tuner state plus the station registry,
//! constructed once by the binary and threaded through by `&mut` reference
//! instead of living in process globals.

use fmrds::StationRegistry;

use crate::tuner::TunerState;

/// All mutable state shared between the RDS decode loop and the keyboard
/// command handler.
pub struct Session {
    pub tuner: TunerState,
    pub registry: StationRegistry,
}

impl Session {
    pub fn new(tuner: TunerState) -> Self {
        Self {
            tuner,
            registry: StationRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuner::FrequencyDivider;

    #[test]
    fn new_session_starts_with_empty_registry() {
        let session = Session::new(TunerState::new(87.5, 108.0, FrequencyDivider::Sixteen));
        assert!(session.registry.is_empty());
    }
}
