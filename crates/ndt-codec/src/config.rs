/// Limits applied to a header before any payload is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Largest accepted rank.
    pub max_rank: usize,
    /// Largest accepted element count.
    pub max_elements: usize,
}

impl DecodeConfig {
    pub const DEFAULT_MAX_RANK: usize = 32;
    pub const DEFAULT_MAX_ELEMENTS: usize = 1 << 28;

    pub fn with_max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = max_rank;
        self
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            max_rank: Self::DEFAULT_MAX_RANK,
            max_elements: Self::DEFAULT_MAX_ELEMENTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecodeConfig::default();
        assert_eq!(config.max_rank, 32);
        assert_eq!(config.max_elements, 1 << 28);
    }

    #[test]
    fn test_builders() {
        let config = DecodeConfig::default().with_max_rank(4).with_max_elements(100);
        assert_eq!(config, DecodeConfig { max_rank: 4, max_elements: 100 });
    }
}
