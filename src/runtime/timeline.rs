/// Playback position shared by every track, advanced once per mixed block.
///
/// With a length set, the mixer resets all tracks and the timeline once the
/// position reaches it. Without one the timeline runs forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLine {
    position: u64,
    length: Option<u64>,
}

impl TimeLine {
    pub fn new(length: Option<u64>) -> Self {
        Self {
            position: 0,
            length,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// Jump to `position`, clamped to the length.
    pub fn set_position(&mut self, position: u64) {
        self.position = match self.length {
            Some(length) => position.min(length),
            None => position,
        };
    }

    pub fn advance(&mut self, frames: u64) {
        self.set_position(self.position.saturating_add(frames));
    }

    pub fn is_finished(&self) -> bool {
        self.length.is_some_and(|length| self.position >= length)
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}
