// Display-string formatting for view counts, publish dates and titles

use time::{Date, OffsetDateTime};

/// Characters that never survive into an output filename.
const DISALLOWED: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|', '.'];

/// Format a raw view count for display: "999 views", "1.0K views",
/// "2.5M views". Counts at or above a thousand keep one decimal place.
pub fn format_view_count(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M views", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K views", views as f64 / 1_000.0)
    } else {
        format!("{} views", views)
    }
}

/// Format a publish date relative to now: "5 months ago", "2 years ago".
pub fn format_publish_date(published: Date) -> String {
    format_publish_date_from(published, OffsetDateTime::now_utc().date())
}

// Calendar month/year subtraction only; the day of month is ignored. A date
// one day in the future within the same month reads "0 months ago", and a
// date 11 months and 29 days back still reads "11 months ago".
fn format_publish_date_from(published: Date, today: Date) -> String {
    let years_diff = today.year() - published.year();
    let months_diff = u8::from(today.month()) as i32 - u8::from(published.month()) as i32;

    let total_months = years_diff * 12 + months_diff;

    if total_months > 12 {
        format!("{} years ago", total_months / 12)
    } else {
        format!("{} months ago", total_months)
    }
}

/// Derive a filename stem from a video title: filesystem-unsafe characters
/// act as separators, surrounding whitespace is trimmed, and the remaining
/// whitespace runs become single underscores.
///
/// Not guaranteed collision-free or reversible, and not fully safe on every
/// platform (reserved device names pass through untouched).
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if DISALLOWED.contains(&c) { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}
