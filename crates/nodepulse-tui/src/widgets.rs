//! Small rendering helpers shared by screens.

/// Render a percentage bar split into filled and empty portions.
///
/// Returns `(filled, empty)` strings of `█` and `░` characters spanning
/// `width` character positions; the caller styles each segment.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pct_bar(pct: f64, width: u16) -> (String, String) {
    let clamped = pct.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * f64::from(width)).round() as u16;
    let empty = width.saturating_sub(filled);
    ("█".repeat(usize::from(filled)), "░".repeat(usize::from(empty)))
}

/// Compact human duration for agent uptimes ("47d", "4h 23m", "12m").
pub fn fmt_uptime(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{days}d")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        let (filled, empty) = pct_bar(50.0, 10);
        assert_eq!(filled.chars().count(), 5);
        assert_eq!(empty.chars().count(), 5);

        let (filled, empty) = pct_bar(150.0, 4);
        assert_eq!(filled.chars().count(), 4);
        assert!(empty.is_empty());
    }

    #[test]
    fn uptime_picks_the_coarsest_unit() {
        assert_eq!(fmt_uptime(30), "0m");
        assert_eq!(fmt_uptime(60 * 12), "12m");
        assert_eq!(fmt_uptime(3_600 * 4 + 60 * 23), "4h 23m");
        assert_eq!(fmt_uptime(86_400 * 47), "47d");
        assert_eq!(fmt_uptime(-5), "0m");
    }
}
