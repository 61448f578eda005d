use crate::models::TimeInterval;

/// A requested slot is available when it overlaps none of the existing intervals.
/// Intervals are half-open, so touching boundaries do not conflict.
pub fn is_available<'a, I>(requested: &TimeInterval, existing: I) -> bool
where
    I: IntoIterator<Item = &'a TimeInterval>,
{
    !existing
        .into_iter()
        .any(|interval| requested.overlaps(interval))
}
