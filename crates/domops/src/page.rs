//! Dom - a shared handle to one loaded document

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use domops_dom::{Document, Event, EventListener, Generation, NodeId};
use url::Url;

use crate::{Config, QueryArg, Result, Selection, ready};

struct Shared {
    document: RefCell<Document>,
    config: Config,
    /// Tree generation the stored geometry belongs to
    laid_out: Cell<Option<Generation>>,
}

/// Shared handle to a document
///
/// Cloning is cheap; every clone and every [`Selection`] built from it
/// refers to the same tree. The document is borrowed only for the duration
/// of a single operation, so callbacks may freely use the handle again.
#[derive(Clone)]
pub struct Dom {
    shared: Rc<Shared>,
}

impl Dom {
    /// An empty `<html><head></head><body></body></html>` document
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let document = Document::new(&config.url);
        Self::from_document(document, config)
    }

    /// Parse an HTML document
    pub fn parse(html: &str) -> Result<Self> {
        Self::parse_with_config(html, Config::default())
    }

    pub fn parse_with_config(html: &str, config: Config) -> Result<Self> {
        let document = domops_html::parse_with_url(html, &config.url)?;
        Ok(Self::from_document(document, config))
    }

    pub fn from_document(document: Document, config: Config) -> Self {
        Self {
            shared: Rc::new(Shared {
                document: RefCell::new(document),
                config,
                laid_out: Cell::new(None),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Run `f` with the document borrowed
    ///
    /// Must not be called re-entrantly from inside `f`.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.shared.document.borrow())
    }

    /// Run `f` with the document mutably borrowed
    ///
    /// Must not be called re-entrantly from inside `f`.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.shared.document.borrow_mut())
    }

    /// Whether two handles share a document
    pub fn ptr_eq(&self, other: &Dom) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn root(&self) -> NodeId {
        self.read(|doc| doc.root())
    }

    pub fn body(&self) -> Option<NodeId> {
        self.read(|doc| doc.body())
    }

    pub fn head(&self) -> Option<NodeId> {
        self.read(|doc| doc.head())
    }

    pub fn title(&self) -> String {
        self.read(|doc| doc.title())
    }

    // --- factory ---

    /// Resolve `selector` against the whole document
    pub fn query(&self, selector: &str) -> Result<Selection> {
        Selection::resolve(self, selector, vec![self.root()])
    }

    /// Resolve `selector` against one or more context roots
    ///
    /// Contexts are deduplicated; results are concatenated in context order.
    /// A selection from another document is an [`Error::Argument`](crate::Error::Argument).
    pub fn query_in(&self, selector: &str, contexts: impl Into<QueryArg>) -> Result<Selection> {
        let contexts = contexts.into().into_nodes(self)?;
        Selection::resolve(self, selector, contexts)
    }

    /// Wrap explicit elements, used verbatim
    pub fn select(&self, elements: impl IntoIterator<Item = NodeId>) -> Selection {
        Selection::from_elements(self, elements.into_iter().collect())
    }

    /// Wrap one new, detached element
    pub fn create(&self, tag: &str) -> Selection {
        let element = self.write(|doc| doc.tree_mut().create_element(tag));
        tracing::trace!(tag, %element, "created element");
        self.select([element])
    }

    // --- layout ---

    /// Lay the document out again if the tree changed since the last pass
    pub(crate) fn ensure_layout(&self) -> Result<()> {
        let generation = self.read(|doc| doc.tree().generation());
        if self.shared.laid_out.get() == Some(generation) {
            return Ok(());
        }

        let viewport = self.shared.config.viewport();
        self.write(|doc| domops_layout::layout_document(doc, &viewport))?;
        self.shared.laid_out.set(Some(generation));
        Ok(())
    }

    // --- events ---

    /// Register a listener on one node
    pub fn add_listener(&self, node: NodeId, event_type: &str, listener: EventListener) -> Result<()> {
        self.write(|doc| doc.tree_mut().add_event_listener(node, event_type, listener))?;
        Ok(())
    }

    /// Dispatch `event` to its target and, when it bubbles, its ancestors
    ///
    /// Returns `false` if a listener called `prevent_default`.
    pub fn dispatch(&self, mut event: Event) -> bool {
        let path: Vec<NodeId> = self.read(|doc| {
            std::iter::once(event.target)
                .chain(doc.tree().ancestors(event.target))
                .collect()
        });
        tracing::debug!(event = %event.event_type, target = %event.target, "dispatching event");

        for node in path {
            let listeners = self.read(|doc| doc.tree().listeners(node, &event.event_type));
            event.current_target = Some(node);
            for listener in listeners {
                listener(&mut event);
            }
            if event.is_propagation_stopped() || !event.bubbles {
                break;
            }
        }
        event.current_target = None;
        !event.is_default_prevented()
    }

    /// Signal that the initial document is complete
    ///
    /// Fires `DOMContentLoaded` on the document and opens the ready gate.
    pub fn content_loaded(&self) {
        self.dispatch(Event::new("DOMContentLoaded", self.root()));
        ready::signal_ready();
    }

    // --- location hash ---

    pub fn url(&self) -> String {
        self.read(|doc| doc.url().to_string())
    }

    /// Fragment of the document URL without the leading `#`; `""` if none
    pub fn hash(&self) -> String {
        let url = self.url();
        match Url::parse(&url) {
            Ok(parsed) => parsed.fragment().unwrap_or_default().to_string(),
            Err(err) => {
                tracing::warn!(%url, %err, "document URL does not parse");
                String::new()
            }
        }
    }

    /// Selection of the element the location hash points at
    pub fn target(&self) -> Result<Selection> {
        self.query(&format!("#{}", self.hash()))
    }

    /// Call `callback` whenever the location hash changes
    pub fn on_hash(&self, callback: impl Fn(&mut Event) + 'static) -> Result<()> {
        self.add_listener(self.root(), "hashchange", Rc::new(callback))
    }

    /// Move to `url`, firing `hashchange` when the fragment differs
    pub fn navigate(&self, url: &str) {
        let before = self.hash();
        self.write(|doc| doc.set_url(url));
        let after = self.hash();
        if before != after {
            tracing::debug!(from = %before, to = %after, "hash changed");
            self.dispatch(Event::non_bubbling("hashchange", self.root()));
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dom")
            .field("url", &self.url())
            .field("nodes", &self.read(|doc| doc.tree().len()))
            .finish()
    }
}
