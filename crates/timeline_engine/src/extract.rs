use crate::document::{HostDocument, Role};
use crate::tsv::normalize;

/// Position of the handle link inside the user-name block; the first link
/// wraps the profile picture.
const HANDLE_ANCHOR_INDEX: usize = 1;

/// Handle of the post author, e.g. `@someone`.
///
/// `None` when the user-name block is missing or holds fewer than two links.
pub fn extract_author<D: HostDocument>(doc: &D, post: D::Node) -> Option<String> {
    let block = doc.find(post, Role::UserName)?;
    let anchors = doc.find_all(block, Role::Anchor);
    let handle = anchors.get(HANDLE_ANCHOR_INDEX)?;
    Some(normalize(&doc.inner_text(*handle)))
}

/// Post body with inline emoji images replaced by their `alt` text.
///
/// `None` when the post-text block is missing or has no child nodes.
pub fn extract_body<D: HostDocument>(doc: &D, post: D::Node) -> Option<String> {
    let block = doc.find(post, Role::PostText)?;
    let parts = doc.children(block);
    if parts.is_empty() {
        return None;
    }

    let mut text = String::new();
    for part in parts {
        if doc.is_image(part) {
            text.push_str(&doc.attribute(part, "alt").unwrap_or_default());
        } else {
            text.push_str(&doc.inner_text(part));
        }
    }
    Some(normalize(&text))
}
