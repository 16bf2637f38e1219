#![forbid(unsafe_code)]

//! Edge-zone auto-scroll math.
//!
//! The inset-adjusted viewport is split into a top zone, a dead zone, and a
//! bottom zone. Each edge zone is `height / divisor` tall. The scroll rate is
//! zero in the dead zone and grows linearly with penetration depth into an
//! edge zone: negative (up) at the top, positive (down) at the bottom.

use rowdrag_core::geometry::{Insets, Point, Size};

use super::config::ReorderConfig;
use super::host::TableHost;

/// Scroll-relevant geometry read from the host at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub offset: Point,
    pub inset: Insets,
    pub content: Size,
    /// Size of the visible frame.
    pub viewport: Size,
}

impl ScrollMetrics {
    #[must_use]
    pub fn from_host<H: TableHost + ?Sized>(host: &H) -> Self {
        Self {
            offset: host.content_offset(),
            inset: host.content_inset(),
            content: host.content_size(),
            viewport: host.bounds().size(),
        }
    }
}

/// Scroll rate for a touch at content-space `touch_y`.
#[must_use]
pub fn scroll_rate(touch_y: f32, metrics: &ScrollMetrics, config: &ReorderConfig) -> f32 {
    let height = metrics.viewport.height - metrics.inset.top;
    let zone = height / config.scroll_zone_divisor;
    if !(zone.is_finite() && zone > 0.0) {
        return 0.0;
    }

    let top_edge = metrics.offset.y + metrics.inset.top;
    let bottom_begin = top_edge + height - zone;
    let top_begin = top_edge + zone;

    let rate = if touch_y >= bottom_begin {
        (touch_y - bottom_begin) / zone
    } else if touch_y <= top_begin {
        (touch_y - top_begin) / zone
    } else {
        0.0
    };
    rate.clamp(-config.max_scroll_rate, config.max_scroll_rate)
}

/// Vertical content offset after one scroll tick at `rate`.
///
/// The result never goes above `-inset.top` nor past the last screenful;
/// content shorter than the viewport does not scroll at all.
#[must_use]
pub fn next_scroll_offset(metrics: &ScrollMetrics, rate: f32, step: f32) -> f32 {
    let current = metrics.offset.y;
    let proposed = current + rate * step;
    let scrollable_bottom = metrics.content.height + metrics.inset.bottom;

    if proposed < -metrics.inset.top {
        -metrics.inset.top
    } else if scrollable_bottom < metrics.viewport.height {
        current
    } else if proposed > scrollable_bottom - metrics.viewport.height {
        scrollable_bottom - metrics.viewport.height
    } else {
        proposed
    }
}

/// Keep the proxy between the top of the content and `margin` below its end.
#[must_use]
pub fn clamp_proxy_center(touch_y: f32, content_height: f32, margin: f32) -> f32 {
    touch_y.clamp(0.0, (content_height + margin).max(0.0))
}
