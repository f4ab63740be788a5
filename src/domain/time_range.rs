// Analysis window selector and chunk sizing

/// Readings are assumed to arrive once per minute.
pub const READINGS_PER_HOUR: usize = 60;

pub const SUPPORTED_HOURS: [u32; 5] = [1, 4, 8, 12, 24];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    hours: u32,
}

impl TimeRange {
    /// Accepts any width; unsupported widths still analyze with the fallback chunk size.
    pub fn new(hours: u32) -> Self {
        Self { hours }
    }

    pub fn supported(hours: u32) -> Option<Self> {
        SUPPORTED_HOURS.contains(&hours).then(|| Self::new(hours))
    }

    pub fn hours(self) -> u32 {
        self.hours
    }

    /// Maximum number of readings to fetch for this window.
    pub fn reading_budget(self) -> usize {
        self.hours as usize * READINGS_PER_HOUR
    }

    pub fn chunk_config(self) -> ChunkConfig {
        ChunkConfig::for_hours(self.hours)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub size_minutes: usize,
    pub unit: &'static str,
}

impl ChunkConfig {
    pub fn for_hours(hours: u32) -> Self {
        let (size_minutes, unit) = match hours {
            1 => (15, "15min"),
            4 | 8 => (60, "1hr"),
            12 => (120, "2hr"),
            24 => (180, "3hr"),
            _ => (60, "1hr"),
        };
        Self { size_minutes, unit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_config_table() {
        assert_eq!(ChunkConfig::for_hours(1), ChunkConfig { size_minutes: 15, unit: "15min" });
        assert_eq!(ChunkConfig::for_hours(4), ChunkConfig { size_minutes: 60, unit: "1hr" });
        assert_eq!(ChunkConfig::for_hours(8), ChunkConfig { size_minutes: 60, unit: "1hr" });
        assert_eq!(ChunkConfig::for_hours(12), ChunkConfig { size_minutes: 120, unit: "2hr" });
        assert_eq!(ChunkConfig::for_hours(24), ChunkConfig { size_minutes: 180, unit: "3hr" });
    }

    #[test]
    fn test_chunk_config_fallback() {
        for hours in [0, 2, 6, 48, u32::MAX] {
            assert_eq!(
                ChunkConfig::for_hours(hours),
                ChunkConfig { size_minutes: 60, unit: "1hr" }
            );
        }
    }

    #[test]
    fn test_supported_ranges() {
        assert!(TimeRange::supported(12).is_some());
        assert!(TimeRange::supported(6).is_none());
        assert_eq!(TimeRange::new(6).hours(), 6);
    }

    #[test]
    fn test_reading_budget() {
        assert_eq!(TimeRange::new(1).reading_budget(), 60);
        assert_eq!(TimeRange::new(24).reading_budget(), 1440);
    }
}
