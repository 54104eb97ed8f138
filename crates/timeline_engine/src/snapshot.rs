use std::collections::{HashMap, VecDeque};

use ego_tree::{NodeId, NodeRef, Tree};
use harvest_logging::{harvest_debug, harvest_warn};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::document::{HostDocument, Role};

/// CSS selectors for the page structure the harvester relies on.
///
/// The author lookup assumes the second link inside the user-name block is
/// the handle. That matches the current markup only and breaks silently when
/// the site changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub container: String,
    pub user_name: String,
    pub post_text: String,
    pub anchor: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            container: "html section > div > div".to_string(),
            user_name: r#"[data-testid="User-Name"]"#.to_string(),
            post_text: r#"[data-testid="tweetText"]"#.to_string(),
            anchor: "a".to_string(),
        }
    }
}

/// Geometry of the simulated page: posts are stacked top to bottom,
/// each `post_height` pixels tall.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub viewport_height: f64,
    pub post_height: f64,
    /// Pending content loads once the viewport bottom comes this close to the end.
    pub load_threshold: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            viewport_height: 1000.0,
            post_height: 400.0,
            load_threshold: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid {field} selector {selector:?}: {message}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

struct CompiledSelectors {
    container: Selector,
    user_name: Selector,
    post_text: Selector,
    anchor: Selector,
}

impl CompiledSelectors {
    fn compile(selectors: &Selectors) -> Result<Self, DocumentError> {
        Ok(Self {
            container: compile("container", &selectors.container)?,
            user_name: compile("user_name", &selectors.user_name)?,
            post_text: compile("post_text", &selectors.post_text)?,
            anchor: compile("anchor", &selectors.anchor)?,
        })
    }

    fn for_role(&self, role: Role) -> &Selector {
        match role {
            Role::UserName => &self.user_name,
            Role::PostText => &self.post_text,
            Role::Anchor => &self.anchor,
        }
    }
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|err| DocumentError::InvalidSelector {
        field,
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// A saved timeline page behaving like the live one: it scrolls, and
/// scrolling near the end splices the next batch of posts into the
/// container, the way an infinite timeline does.
///
/// Post navigation (`first_child`, `next_sibling`) moves between elements
/// only; whitespace and comment nodes between posts are skipped.
///
/// The container is resolved once at parse time. Batches are appended to
/// it, so it stays the first match.
pub struct SnapshotDocument {
    html: Html,
    selectors: CompiledSelectors,
    layout: LayoutSettings,
    scroll_top: f64,
    pending: VecDeque<String>,
    container: Option<NodeId>,
    /// Stacking index of every post in the container.
    positions: HashMap<NodeId, usize>,
}

impl SnapshotDocument {
    pub fn parse(html: &str, selectors: &Selectors) -> Result<Self, DocumentError> {
        Self::with_batches(html, Vec::new(), selectors, LayoutSettings::default())
    }

    /// `batches` are HTML fragments of further posts, appended to the
    /// container one at a time as the reader scrolls towards the end.
    pub fn with_batches(
        html: &str,
        batches: Vec<String>,
        selectors: &Selectors,
        layout: LayoutSettings,
    ) -> Result<Self, DocumentError> {
        let html = Html::parse_document(html);
        let selectors = CompiledSelectors::compile(selectors)?;
        let container = html
            .select(&selectors.container)
            .next()
            .map(|element| element.id());
        let positions: HashMap<NodeId, usize> = container
            .and_then(|id| html.tree.get(id))
            .map(|node| {
                node.children()
                    .filter(is_post)
                    .enumerate()
                    .map(|(index, post)| (post.id(), index))
                    .collect()
            })
            .unwrap_or_default();
        let mut document = Self {
            html,
            selectors,
            layout,
            scroll_top: 0.0,
            pending: batches.into(),
            container,
            positions,
        };
        document.load_pending();
        Ok(document)
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    /// Number of posts currently in the container.
    pub fn post_count(&self) -> usize {
        self.positions.len()
    }

    fn content_height(&self) -> f64 {
        self.post_count() as f64 * self.layout.post_height
    }

    fn load_pending(&mut self) {
        while !self.pending.is_empty()
            && self.scroll_top + self.layout.viewport_height + self.layout.load_threshold
                >= self.content_height()
        {
            let Some(batch) = self.pending.pop_front() else {
                break;
            };
            let Some(container) = self.container else {
                harvest_warn!("No container to load {} pending batches into", self.pending.len() + 1);
                self.pending.clear();
                break;
            };
            let fragment = Html::parse_fragment(&batch);
            let root = *fragment.root_element();
            for child in root.children() {
                let Some(id) = graft(&mut self.html.tree, container, child) else {
                    break;
                };
                if is_post(&child) {
                    let index = self.positions.len();
                    self.positions.insert(id, index);
                }
            }
            harvest_debug!(
                "Loaded batch; {} posts, {} batches pending",
                self.post_count(),
                self.pending.len()
            );
        }
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Offset of the post containing `id` from the top of the page.
    fn layout_top(&self, id: NodeId) -> Option<f64> {
        let mut node = self.html.tree.get(id)?;
        loop {
            if let Some(index) = self.positions.get(&node.id()) {
                return Some(*index as f64 * self.layout.post_height);
            }
            node = node.parent()?;
        }
    }
}

fn is_post(node: &NodeRef<'_, Node>) -> bool {
    node.value().is_element()
}

/// Copies `source` and its subtree under `parent`, returning the new node.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child)?;
    }
    Some(id)
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) if element.name().eq_ignore_ascii_case("br") => out.push('\n'),
        Node::Element(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

impl HostDocument for SnapshotDocument {
    type Node = NodeId;

    fn container(&self) -> Option<NodeId> {
        self.container
    }

    fn find(&self, scope: NodeId, role: Role) -> Option<NodeId> {
        let selector = self.selectors.for_role(role);
        self.element(scope)?
            .select(selector)
            .next()
            .map(|element| element.id())
    }

    fn find_all(&self, scope: NodeId, role: Role) -> Vec<NodeId> {
        let selector = self.selectors.for_role(role);
        match self.element(scope) {
            Some(element) => element.select(selector).map(|found| found.id()).collect(),
            None => Vec::new(),
        }
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(node)?
            .children()
            .find(is_post)
            .map(|child| child.id())
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(node)?
            .next_siblings()
            .find(is_post)
            .map(|sibling| sibling.id())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.html.tree.get(node) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => Vec::new(),
        }
    }

    fn is_image(&self, node: NodeId) -> bool {
        self.element(node)
            .is_some_and(|element| element.value().name().eq_ignore_ascii_case("img"))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?
            .value()
            .attr(name)
            .map(ToOwned::to_owned)
    }

    fn inner_text(&self, node: NodeId) -> String {
        let mut text = String::new();
        if let Some(node) = self.html.tree.get(node) {
            collect_text(node, &mut text);
        }
        text
    }

    fn bounding_top(&self, node: NodeId) -> f64 {
        self.layout_top(node).unwrap_or(0.0) - self.scroll_top
    }

    fn viewport_height(&self) -> f64 {
        self.layout.viewport_height
    }

    fn scroll_by(&mut self, dy: f64) {
        self.scroll_top += dy;
        self.load_pending();
        let max_scroll = (self.content_height() - self.layout.viewport_height).max(0.0);
        self.scroll_top = self.scroll_top.clamp(0.0, max_scroll);
    }
}
