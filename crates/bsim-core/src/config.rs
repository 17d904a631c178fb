//! BSIM Configuration
//!
//! Limits applied by the interpreter before a script runs.
//! Execution itself always terminates; the limits only bound its cost.

/// Default cap on script length, in instructions
pub const DEFAULT_MAX_SCRIPT_LEN: usize = 10_000;

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Maximum number of instructions accepted by `Interpreter::run`
    pub max_script_len: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_script_len: DEFAULT_MAX_SCRIPT_LEN,
        }
    }
}

impl SimConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_script_len(mut self, max_script_len: usize) -> Self {
        self.max_script_len = max_script_len;
        self
    }
}
