use melting::engine::config::{DEFAULT_FACTOR, DEFAULT_THRESHOLD};

pub struct DefaultsConfig {
    pub factor: u32,
    pub threshold: usize,
    pub mode: String,
    pub sodium_equivalent: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            factor: DEFAULT_FACTOR,
            threshold: DEFAULT_THRESHOLD,
            mode: "def".to_string(),
            sodium_equivalent: "ahs01".to_string(),
        }
    }
}
