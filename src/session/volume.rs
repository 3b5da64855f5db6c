//! Volume changes

use crate::stream::{EngineError, PlaybackEngine};

/// Lowest accepted volume
pub const MIN_VOLUME: i32 = 0;

/// Highest accepted volume (mpv allows amplification past 100)
pub const MAX_VOLUME: i32 = 150;

/// Stateless volume logic. The level itself lives in the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeController;

impl VolumeController {
    pub fn clamp(level: i32) -> i32 {
        level.clamp(MIN_VOLUME, MAX_VOLUME)
    }

    /// Apply `delta` to the engine volume and return the new level
    ///
    /// An unknown current volume counts as 0.
    pub fn change_volume(engine: &dyn PlaybackEngine, delta: i32) -> Result<i32, EngineError> {
        let current = engine.volume()?.unwrap_or(0);
        let level = Self::clamp(current.saturating_add(delta));
        engine.set_volume(level)?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(VolumeController::clamp(-5), 0);
        assert_eq!(VolumeController::clamp(0), 0);
        assert_eq!(VolumeController::clamp(80), 80);
        assert_eq!(VolumeController::clamp(150), 150);
        assert_eq!(VolumeController::clamp(155), 150);
    }
}
