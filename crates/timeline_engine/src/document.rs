/// Element roles the harvester asks the host document for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Block carrying the author's display name and handle.
    UserName,
    /// Block carrying the post body.
    PostText,
    /// Link element.
    Anchor,
}

/// Read access to a live, externally mutated page tree plus the one
/// mutation the harvester performs: scrolling.
///
/// Node handles must stay valid while nodes are appended elsewhere in the
/// tree, since scrolling may load new posts past the current cursor.
pub trait HostDocument {
    type Node: Copy + PartialEq + std::fmt::Debug;

    /// The element whose children are the timeline posts.
    fn container(&self) -> Option<Self::Node>;

    /// First descendant of `scope` (scope excluded) playing `role`, in document order.
    fn find(&self, scope: Self::Node, role: Role) -> Option<Self::Node>;

    /// All descendants of `scope` playing `role`, in document order.
    fn find_all(&self, scope: Self::Node, role: Role) -> Vec<Self::Node>;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Child nodes of `node`, text nodes included.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Whether `node` is an inline image element.
    fn is_image(&self, node: Self::Node) -> bool;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Rendered text of `node`; for a text node, its content.
    fn inner_text(&self, node: Self::Node) -> String;

    /// Top edge of `node` relative to the viewport, in pixels.
    fn bounding_top(&self, node: Self::Node) -> f64;

    fn viewport_height(&self) -> f64;

    /// Scroll the root scrollable element down by `dy` pixels.
    fn scroll_by(&mut self, dy: f64);
}
