//! Text progress bar rendering.

pub const PROGRESS_BAR_WIDTH: usize = 30;
const FILLED_CHAR: char = '█';
const EMPTY_CHAR: char = '░';

/// Renders `[███░░░…] 42.0%` for `completed` out of `total`.
///
/// A zero `total` renders an empty bar with `0%`. The filled width is
/// truncated, never rounded up, and capped at the bar width.
pub fn render_progress_bar(completed: u64, total: u64) -> String {
    if total == 0 {
        return format!("[{}] 0%", bar_segment(EMPTY_CHAR, PROGRESS_BAR_WIDTH));
    }

    let ratio = completed as f64 / total as f64;
    let filled = ((PROGRESS_BAR_WIDTH as f64 * ratio) as usize).min(PROGRESS_BAR_WIDTH);

    format!(
        "[{}{}] {:.1}%",
        bar_segment(FILLED_CHAR, filled),
        bar_segment(EMPTY_CHAR, PROGRESS_BAR_WIDTH - filled),
        ratio * 100.0
    )
}

fn bar_segment(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::{render_progress_bar, PROGRESS_BAR_WIDTH};

    fn count(bar: &str, ch: char) -> usize {
        bar.chars().filter(|c| *c == ch).count()
    }

    #[test]
    fn empty_total_renders_empty_bar() {
        let bar = render_progress_bar(0, 0);
        assert_eq!(count(&bar, '░'), PROGRESS_BAR_WIDTH);
        assert!(bar.ends_with("] 0%"));
    }

    #[test]
    fn partial_progress_truncates_filled_width() {
        let half = render_progress_bar(1, 2);
        assert_eq!(count(&half, '█'), 15);
        assert!(half.ends_with("50.0%"), "unexpected bar: {half}");

        // 30 / 7 = 4.28..
        let seventh = render_progress_bar(1, 7);
        assert_eq!(count(&seventh, '█'), 4);
        assert_eq!(count(&seventh, '░'), 26);
        assert!(seventh.ends_with("14.3%"), "unexpected bar: {seventh}");
    }

    #[test]
    fn full_progress_fills_bar() {
        let bar = render_progress_bar(4, 4);
        assert_eq!(count(&bar, '█'), PROGRESS_BAR_WIDTH);
        assert!(bar.ends_with("100.0%"));
    }
}
