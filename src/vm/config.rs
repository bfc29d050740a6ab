/// Maximum number of roots the operand stack holds.
pub const STACK_MAX: usize = 256;

/// Number of live objects that triggers the first collection.
pub const GC_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    pub stack_max: usize,
    pub initial_threshold: usize,
    /// Floor for the adaptive threshold. Zero keeps the plain `2 * survivors` policy.
    pub min_threshold: usize,
    pub report_collections: bool,
}

impl VmConfig {
    pub fn quiet() -> Self {
        Self {
            report_collections: false,
            ..Self::default()
        }
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_max: STACK_MAX,
            initial_threshold: GC_THRESHOLD,
            min_threshold: 0,
            report_collections: true,
        }
    }
}
