/// Percent of `total` covered by `completed`, rounded half up, in `0..=100`.
/// `active_partial` adds half a step of credit for an unfinished active step.
pub fn progress_percent(completed: usize, total: usize, active_partial: bool) -> u8 {
    if total == 0 {
        return 0;
    }
    let credit = completed as f64 + if active_partial { 0.5 } else { 0.0 };
    let percent = (credit / total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
