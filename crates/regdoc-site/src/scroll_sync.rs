//! Scroll-synchronized navigation controller.
//!
//! Keeps the sidebar's active entry, the expanded subtrees, and the URL
//! fragment consistent with what the reader is looking at.
//!
//! This is the reference model of the navigation half of `assets/docs.js`.
//! The shipped pages run the script, not this type. The script repeats the
//! same transitions on DOM events and declares the same [`SETTLE_MS`],
//! [`HASH_DELAY_MS`] and [`HEADER_OFFSET_PX`] values; changes to one must be
//! made in the other. Embedders that host pages outside a browser drive the
//! model through a [`ScrollHost`] and millisecond timestamps.
//!
//! Two modes:
//! - idle: scroll events recompute the active section
//! - user navigating: entered on a nav click, scroll events are ignored
//!   until the settle window has passed

use std::collections::HashSet;

use regdoc_stardoc::{NavNode, flatten};

/// Time a click-initiated navigation suppresses scroll tracking.
pub const SETTLE_MS: u64 = 1000;

/// Delay before revealing a fragment target or a just-expanded subtree.
pub const HASH_DELAY_MS: u64 = 100;

/// Height of the fixed page header covering the top of the viewport.
pub const HEADER_OFFSET_PX: f64 = 100.0;

/// How an element is brought into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// The page the controller operates on.
pub trait ScrollHost {
    /// Vertical offset of the element with `id`, or `None` if absent.
    fn element_offset(&self, id: &str) -> Option<f64>;

    /// Current vertical scroll position.
    fn scroll_position(&self) -> f64;

    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior);

    /// Push `#id` onto the session history.
    fn push_fragment(&mut self, id: &str);

    /// Current URL fragment without the leading `#`.
    fn fragment(&self) -> Option<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Idle,
    UserNavigating { until: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Timer {
    /// Scroll to a nav target after its subtree was toggled.
    Navigate(String),
    /// Smoothly bring a fragment target into view.
    Reveal(String),
}

/// Navigation state machine for one rendered page.
pub struct ScrollSync {
    /// Every nav id, flattened depth-first in document order.
    sections: Vec<String>,
    /// Nav ids that have children.
    parents: HashSet<String>,
    active: Option<String>,
    expanded: HashSet<String>,
    mode: Mode,
    timers: Vec<(u64, Timer)>,
}

impl ScrollSync {
    pub fn new(navigation: &[NavNode]) -> Self {
        let flat = flatten(navigation);
        Self {
            sections: flat.iter().map(|node| node.id.clone()).collect(),
            parents: flat
                .iter()
                .filter(|node| !node.children.is_empty())
                .map(|node| node.id.clone())
                .collect(),
            active: None,
            expanded: HashSet::new(),
            mode: Mode::Idle,
            timers: Vec::new(),
        }
    }

    /// Currently highlighted nav id.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_user_navigating(&self) -> bool {
        matches!(self.mode, Mode::UserNavigating { .. })
    }

    /// Initial page load: adopt the URL fragment, if any.
    pub fn mount(&mut self, host: &mut impl ScrollHost, now: u64) {
        self.adopt_fragment(host, now);
    }

    /// Browser back/forward: adopt the new URL fragment, if any.
    pub fn pop_state(&mut self, host: &mut impl ScrollHost, now: u64) {
        self.adopt_fragment(host, now);
    }

    fn adopt_fragment(&mut self, host: &impl ScrollHost, now: u64) {
        let Some(id) = host.fragment().filter(|id| !id.is_empty()) else {
            return;
        };
        self.active = Some(id.clone());
        self.schedule(now + HASH_DELAY_MS, Timer::Reveal(id));
    }

    /// A nav entry was clicked.
    ///
    /// Entries with children toggle their subtree and navigate once the
    /// expansion has had time to lay out; leaves navigate immediately.
    pub fn click(&mut self, id: &str, host: &mut impl ScrollHost, now: u64) {
        if self.parents.contains(id) {
            if !self.expanded.remove(id) {
                self.expanded.insert(id.to_owned());
            }
            self.schedule(now + HASH_DELAY_MS, Timer::Navigate(id.to_owned()));
        } else {
            self.navigate(id, host, now);
        }
    }

    /// Jump to `id`: mark it active, scroll without animation, record it in
    /// history, and suppress scroll tracking for the settle window.
    ///
    /// Does nothing if the page has no element with `id`.
    pub fn navigate(&mut self, id: &str, host: &mut impl ScrollHost, now: u64) {
        if host.element_offset(id).is_none() {
            tracing::debug!(id, "Navigation target not found");
            return;
        }
        self.mode = Mode::UserNavigating {
            until: now + SETTLE_MS,
        };
        self.active = Some(id.to_owned());
        host.scroll_into_view(id, ScrollBehavior::Instant);
        host.push_fragment(id);
    }

    /// The page scrolled.
    ///
    /// While idle, the active entry becomes the last section (in document
    /// order) whose top lies at or above the scroll position plus the header
    /// offset.
    pub fn on_scroll(&mut self, host: &mut impl ScrollHost, now: u64) {
        self.advance(host, now);
        if self.is_user_navigating() {
            return;
        }

        let threshold = host.scroll_position() + HEADER_OFFSET_PX;
        let current = self.sections.iter().rev().find(|id| {
            host.element_offset(id)
                .is_some_and(|offset| offset <= threshold)
        });
        if let Some(id) = current {
            self.active = Some(id.clone());
        }
    }

    /// Fire due timers and end an elapsed settle window.
    pub fn advance(&mut self, host: &mut impl ScrollHost, now: u64) {
        while let Some(index) = self.next_due(now) {
            let (at, timer) = self.timers.remove(index);
            self.expire_settle(at);
            match timer {
                Timer::Navigate(id) => self.navigate(&id, host, at),
                Timer::Reveal(id) => {
                    if host.element_offset(&id).is_some() {
                        host.scroll_into_view(&id, ScrollBehavior::Smooth);
                    }
                }
            }
        }
        self.expire_settle(now);
    }

    fn expire_settle(&mut self, now: u64) {
        if let Mode::UserNavigating { until } = self.mode
            && now >= until
        {
            self.mode = Mode::Idle;
        }
    }

    fn schedule(&mut self, at: u64, timer: Timer) {
        self.timers.push((at, timer));
    }

    fn next_due(&self, now: u64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, (at, _))| *at <= now)
            .min_by_key(|(_, (at, _))| *at)
            .map(|(index, _)| index)
    }
}
