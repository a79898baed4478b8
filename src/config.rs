/// What happens when the program counter or stack pointer runs off the end
/// of its space
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// stop with an error
    Fail,
    /// wrap around modulo the size of the space
    Wrap,
}

/// What the host does with a word that doesn't decode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpcodePolicy {
    Halt,
    Skip,
}

/// Runtime knobs for the interpreter and the environment driving it
#[derive(Clone, Debug)]
pub struct Config {
    /// logical clock; one fetch/decode/execute at most per tick
    pub ticks_per_second: u32,
    /// rate the delay and sound timers count down at
    pub timer_rate_hz: u32,
    /// how often the display gets redrawn (if anything changed)
    pub frames_per_second: u32,
    pub bounds: BoundsPolicy,
    pub on_invalid_opcode: OpcodePolicy,
    /// fixed seed for RND; entropy if none
    pub seed: Option<u64>,
}

pub const DEFAULT_TICKS_PER_SECOND: u32 = 700;
pub const TIMER_RATE_HZ: u32 = 60;
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

impl Default for Config {
    fn default() -> Self {
        Config {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            timer_rate_hz: TIMER_RATE_HZ,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            bounds: BoundsPolicy::Fail,
            on_invalid_opcode: OpcodePolicy::Halt,
            seed: None,
        }
    }
}
