use std::time::Duration;

/// Nominal piece edge in image pixels.
pub const DEFAULT_PIECE_SIZE: u32 = 50;
/// Scrambling stops itself once the history holds this many moves.
pub const DEFAULT_SCRAMBLE_LIMIT: usize = 200;

/// Timing and limits for the move engine and scrambler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Frames per animated slide; each frame moves a tenth of a cell at the
    /// default (default: 10).
    pub animation_frames: u32,
    /// Sleep between animation frames (default: 10ms).
    pub frame_interval: Duration,
    /// Pause between replayed moves while solving (default: 1ms).
    pub replay_delay: Duration,
    /// Pause between scramble moves (default: 1ms).
    pub scramble_delay: Duration,
    /// Wait before the first scramble move (default: 2500ms).
    pub scramble_start_delay: Duration,
    /// History length that switches scrambling off (default: 200).
    pub scramble_limit: usize,
    /// Whether scrambling is switched on at startup (default: true).
    pub scramble_on_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            animation_frames: 10,
            frame_interval: Duration::from_millis(10),
            replay_delay: Duration::from_millis(1),
            scramble_delay: Duration::from_millis(1),
            scramble_start_delay: Duration::from_millis(2500),
            scramble_limit: DEFAULT_SCRAMBLE_LIMIT,
            scramble_on_start: true,
        }
    }
}

impl EngineConfig {
    /// No sleeps anywhere; for tests and headless runs.
    pub fn immediate() -> Self {
        Self {
            frame_interval: Duration::ZERO,
            replay_delay: Duration::ZERO,
            scramble_delay: Duration::ZERO,
            scramble_start_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
