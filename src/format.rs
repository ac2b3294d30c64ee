//! Display helpers: brand color shading and subscription expiry dates.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::onboarding::model::ExtendedDate;

/// India Standard Time, the zone expiry dates are shown in.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Month abbreviations as the en-IN locale prints them.
const EN_IN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

/// Shift every channel of a hex color by `amount`, clamping to `[0, 255]`.
///
/// Accepts `#rgb`, `#rrggbb`, or either without the `#`. Always returns a
/// lowercase `#rrggbb` string. Input that is not hex collapses to `#000000`.
pub fn adjust_color(color: &str, amount: i32) -> String {
    let hex = color.trim().trim_start_matches('#');
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };

    // The whole string must be hex; a valid prefix such as "12" in "12zz56"
    // is not salvaged.
    let Ok(num) = u32::from_str_radix(&expanded, 16) else {
        tracing::debug!(color, "Not a hex color, falling back to black");
        return "#000000".to_string();
    };

    let shift = |channel: u32| -> u32 {
        (i64::from(channel) + i64::from(amount)).clamp(0, 255) as u32
    };
    let r = shift(num >> 16);
    let g = shift((num >> 8) & 0xff);
    let b = shift(num & 0xff);

    format!("#{:06x}", (r << 16) | (g << 8) | b)
}

/// Render a subscription expiry as an en-IN short date in IST, e.g. `15 Nov 2023`.
///
/// Returns an empty string when there is no expiry or the timestamp does not parse.
pub fn format_subscription_expiry(expires_at: Option<&ExtendedDate>) -> String {
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => format_subscription_expiry_in(expires_at, ist),
        None => String::new(),
    }
}

/// Same as [`format_subscription_expiry`] with an explicit UTC offset.
pub fn format_subscription_expiry_in(
    expires_at: Option<&ExtendedDate>,
    offset: FixedOffset,
) -> String {
    let Some(expires_at) = expires_at else {
        return String::new();
    };
    let Some(millis) = expires_at.timestamp_millis() else {
        tracing::debug!(raw = %expires_at.date.number_long, "Unparsable expiry timestamp");
        return String::new();
    };
    let Some(utc) = DateTime::from_timestamp_millis(millis) else {
        return String::new();
    };

    let local = utc.with_timezone(&offset);
    let month = EN_IN_MONTHS[local.month0() as usize];
    format!("{} {} {}", local.day(), month, local.year())
}
