use harvest_logging::harvest_debug;

use crate::document::HostDocument;

/// Share of the viewport height scrolled per step.
pub const DEFAULT_SCROLL_FRACTION: f64 = 0.75;

/// Returns `true` when `post` starts above the bottom edge of the viewport.
///
/// Otherwise scrolls the page down by `scroll_fraction` of the viewport and
/// returns `false`; the caller waits for new content before moving on.
/// Posts above the viewport count as visible.
pub fn ensure_visible<D: HostDocument>(doc: &mut D, post: D::Node, scroll_fraction: f64) -> bool {
    let top = doc.bounding_top(post);
    let viewport = doc.viewport_height();
    if top < viewport {
        return true;
    }

    let step = viewport * scroll_fraction;
    harvest_debug!("Post top {top} below viewport {viewport}; scrolling {step}px");
    doc.scroll_by(step);
    false
}
