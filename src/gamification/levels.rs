use serde::{Deserialize, Serialize};

/// One XP band. `max_xp` is `None` for the open-ended top band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBand {
    pub level: u32,
    pub name: &'static str,
    pub min_xp: u64,
    pub max_xp: Option<u64>,
}

pub const LEVELS: [LevelBand; 8] = [
    LevelBand { level: 1, name: "Novice Trader", min_xp: 0, max_xp: Some(100) },
    LevelBand { level: 2, name: "Apprentice Trader", min_xp: 100, max_xp: Some(250) },
    LevelBand { level: 3, name: "Practicing Trader", min_xp: 250, max_xp: Some(500) },
    LevelBand { level: 4, name: "Competent Trader", min_xp: 500, max_xp: Some(1000) },
    LevelBand { level: 5, name: "Advanced Trader", min_xp: 1000, max_xp: Some(2000) },
    LevelBand { level: 6, name: "Expert Trader", min_xp: 2000, max_xp: Some(5000) },
    LevelBand { level: 7, name: "Master Trader", min_xp: 5000, max_xp: Some(10000) },
    LevelBand { level: 8, name: "Legendary Trader", min_xp: 10000, max_xp: None },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub name: String,
    /// Percent through the current band, 0-100
    pub progress: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextLevelProgress {
    pub current: u64,
    pub needed: u64,
    pub total: u64,
}

fn band_for(xp: u64) -> &'static LevelBand {
    LEVELS
        .iter()
        .rev()
        .find(|band| band.min_xp <= xp)
        .unwrap_or(&LEVELS[0])
}

/// Highest band whose lower bound is at or below `xp`.
pub fn level_for(xp: u64) -> LevelInfo {
    let band = band_for(xp);
    let progress = match band.max_xp {
        Some(max_xp) => {
            let span = (max_xp - band.min_xp) as f64;
            let percent = (xp - band.min_xp) as f64 / span * 100.0;
            percent.round().clamp(0.0, 100.0) as u32
        }
        None => 100,
    };

    LevelInfo {
        level: band.level,
        name: band.name.to_string(),
        progress,
    }
}

/// Progress towards the end of the next band.
///
/// `current` is measured from the start of the current band; `needed` and
/// `total` run to the upper bound of the next band. When the next band is the
/// open-ended top band its lower bound is the target instead. The top band is
/// terminal: nothing more is needed and `total` equals `current`.
pub fn xp_to_next_level(xp: u64) -> NextLevelProgress {
    let band = band_for(xp);
    let current = xp - band.min_xp;
    let next = LEVELS.iter().find(|candidate| candidate.level == band.level + 1);

    match next {
        Some(next) => {
            let target = next.max_xp.unwrap_or(next.min_xp);
            NextLevelProgress {
                current,
                needed: target.saturating_sub(xp),
                total: target - band.min_xp,
            }
        }
        None => NextLevelProgress {
            current,
            needed: 0,
            total: current,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_contiguous() {
        for pair in LEVELS.windows(2) {
            assert_eq!(pair[0].max_xp, Some(pair[1].min_xp));
            assert_eq!(pair[0].level + 1, pair[1].level);
        }
        assert!(LEVELS[LEVELS.len() - 1].max_xp.is_none());
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for(0).level, 1);
        assert_eq!(level_for(0).progress, 0);
        assert_eq!(level_for(99).level, 1);
        assert_eq!(level_for(99).progress, 99);
        assert_eq!(level_for(100).level, 2);
        assert_eq!(level_for(175).progress, 50);
        assert_eq!(level_for(10_000).level, 8);
        assert_eq!(level_for(1_000_000).progress, 100);
    }

    #[test]
    fn test_xp_to_next_level_runs_to_end_of_next_band() {
        assert_eq!(
            xp_to_next_level(130),
            NextLevelProgress { current: 30, needed: 370, total: 400 }
        );
        assert_eq!(
            xp_to_next_level(0),
            NextLevelProgress { current: 0, needed: 250, total: 250 }
        );
        assert_eq!(
            xp_to_next_level(2_000),
            NextLevelProgress { current: 0, needed: 8_000, total: 8_000 }
        );
    }

    #[test]
    fn test_band_below_top_targets_top_band_start() {
        assert_eq!(
            xp_to_next_level(6_000),
            NextLevelProgress { current: 1_000, needed: 4_000, total: 5_000 }
        );
        assert_eq!(xp_to_next_level(9_999).needed, 1);
    }

    #[test]
    fn test_top_band_is_terminal() {
        let progress = xp_to_next_level(12_500);
        assert_eq!(progress.needed, 0);
        assert_eq!(progress.current, 2_500);
        assert_eq!(progress.total, 2_500);
    }
}
