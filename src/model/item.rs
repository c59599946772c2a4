//! Roster entries and the provider seam they refresh against.
//!
//! An item exposes three independently refreshable facets: display text, a
//! latency number, and an [`Appearance`]. The refresh calls are dirty checks:
//! each one re-reads the externally sourced value, caches it, and reports
//! whether it changed since the last read. The diff engine drives those calls,
//! so diffing doubles as the live refresh.

use std::sync::Arc;

use crate::model::appearance::Appearance;

/// Rendered content of one slot at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemState {
    pub text: String,
    pub latency: i64,
    pub appearance: Appearance,
}

/// Capability interface for slot occupants.
///
/// Implementations cache their facet values locally; accessors never touch the
/// external source. `boxed_clone` deep-copies the item so snapshots of the
/// roster never alias live state.
pub trait RosterItem: Send {
    fn text(&self) -> &str;
    fn latency(&self) -> i64;
    fn appearance(&self) -> &Appearance;

    /// Re-read the text from the source. Returns whether it changed.
    fn refresh_text(&mut self) -> bool;
    /// Re-read the latency from the source. Returns whether it changed.
    fn refresh_latency(&mut self) -> bool;
    /// Re-read the appearance from the source. Returns whether it changed.
    fn refresh_appearance(&mut self) -> bool;

    fn boxed_clone(&self) -> Box<dyn RosterItem>;

    fn state(&self) -> ItemState {
        ItemState {
            text: self.text().to_string(),
            latency: self.latency(),
            appearance: self.appearance().clone(),
        }
    }
}

impl Clone for Box<dyn RosterItem> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Content equality over (text, latency, appearance). Items never compare by
/// identity.
pub fn content_eq(a: &dyn RosterItem, b: &dyn RosterItem) -> bool {
    a.text() == b.text() && a.latency() == b.latency() && a.appearance() == b.appearance()
}

/// Synchronous provider of per-subject facet values.
///
/// `is_reachable` gates every refresh: a subject that has gone away (e.g. a
/// disconnected viewer) reports "no change" instead of failing, so one stale
/// subject never blocks diffing the rest of the roster.
pub trait SubjectSource: Send + Sync {
    type Subject: Clone + Send + 'static;

    fn text(&self, subject: &Self::Subject) -> String;
    fn latency(&self, subject: &Self::Subject) -> i64;
    fn appearance(&self, subject: &Self::Subject) -> Appearance;

    fn is_reachable(&self, _subject: &Self::Subject) -> bool {
        true
    }
}

/// An item bound to an external subject through a [`SubjectSource`]. Facet
/// values are pulled once at construction and again on every refresh call.
pub struct LiveItem<S: SubjectSource> {
    subject: S::Subject,
    source: Arc<S>,
    state: ItemState,
}

impl<S: SubjectSource> LiveItem<S> {
    pub fn new(subject: S::Subject, source: Arc<S>) -> Self {
        let state = ItemState {
            text: source.text(&subject),
            latency: source.latency(&subject),
            appearance: source.appearance(&subject),
        };
        Self {
            subject,
            source,
            state,
        }
    }

    pub fn subject(&self) -> &S::Subject {
        &self.subject
    }
}

impl<S: SubjectSource> Clone for LiveItem<S> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            source: Arc::clone(&self.source),
            state: self.state.clone(),
        }
    }
}

impl<S: SubjectSource + 'static> RosterItem for LiveItem<S> {
    fn text(&self) -> &str {
        &self.state.text
    }

    fn latency(&self) -> i64 {
        self.state.latency
    }

    fn appearance(&self) -> &Appearance {
        &self.state.appearance
    }

    fn refresh_text(&mut self) -> bool {
        if !self.source.is_reachable(&self.subject) {
            return false;
        }
        let fresh = self.source.text(&self.subject);
        let changed = fresh != self.state.text;
        self.state.text = fresh;
        changed
    }

    fn refresh_latency(&mut self) -> bool {
        if !self.source.is_reachable(&self.subject) {
            return false;
        }
        let fresh = self.source.latency(&self.subject);
        let changed = fresh != self.state.latency;
        self.state.latency = fresh;
        changed
    }

    fn refresh_appearance(&mut self) -> bool {
        if !self.source.is_reachable(&self.subject) {
            return false;
        }
        let fresh = self.source.appearance(&self.subject);
        let changed = fresh != self.state.appearance;
        self.state.appearance = fresh;
        changed
    }

    fn boxed_clone(&self) -> Box<dyn RosterItem> {
        Box::new(self.clone())
    }
}

/// A static item with fixed content and no refresh behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedItem {
    state: ItemState,
}

impl FixedItem {
    pub fn new(text: impl Into<String>, latency: i64, appearance: Appearance) -> Self {
        Self {
            state: ItemState {
                text: text.into(),
                latency,
                appearance,
            },
        }
    }
}

impl RosterItem for FixedItem {
    fn text(&self) -> &str {
        &self.state.text
    }

    fn latency(&self) -> i64 {
        self.state.latency
    }

    fn appearance(&self) -> &Appearance {
        &self.state.appearance
    }

    fn refresh_text(&mut self) -> bool {
        false
    }

    fn refresh_latency(&mut self) -> bool {
        false
    }

    fn refresh_appearance(&mut self) -> bool {
        false
    }

    fn boxed_clone(&self) -> Box<dyn RosterItem> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct ScriptedSource {
        text: Mutex<String>,
        latency: Mutex<i64>,
        appearance: Mutex<Appearance>,
        reachable: AtomicBool,
    }

    impl ScriptedSource {
        fn new(text: &str, latency: i64, appearance: Appearance) -> Self {
            Self {
                text: Mutex::new(text.to_string()),
                latency: Mutex::new(latency),
                appearance: Mutex::new(appearance),
                reachable: AtomicBool::new(true),
            }
        }
    }

    impl SubjectSource for ScriptedSource {
        type Subject = u32;

        fn text(&self, _subject: &u32) -> String {
            self.text.lock().unwrap().clone()
        }

        fn latency(&self, _subject: &u32) -> i64 {
            *self.latency.lock().unwrap()
        }

        fn appearance(&self, _subject: &u32) -> Appearance {
            self.appearance.lock().unwrap().clone()
        }

        fn is_reachable(&self, _subject: &u32) -> bool {
            self.reachable.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn refresh_reports_change_and_updates_cache() {
        let source = Arc::new(ScriptedSource::new("alice", 40, Appearance::blank()));
        let mut item = LiveItem::new(7, Arc::clone(&source));
        assert!(!item.refresh_text());

        *source.text.lock().unwrap() = "bob".to_string();
        assert!(item.refresh_text());
        assert_eq!(item.text(), "bob");
        assert!(!item.refresh_text());
    }

    #[test]
    fn unreachable_subject_reports_no_change() {
        let source = Arc::new(ScriptedSource::new("alice", 40, Appearance::blank()));
        let mut item = LiveItem::new(7, Arc::clone(&source));

        *source.text.lock().unwrap() = "bob".to_string();
        *source.latency.lock().unwrap() = 90;
        source.reachable.store(false, Ordering::SeqCst);

        assert!(!item.refresh_text());
        assert!(!item.refresh_latency());
        assert!(!item.refresh_appearance());
        // cached values stay at the last reachable read
        assert_eq!(item.text(), "alice");
        assert_eq!(item.latency(), 40);
    }

    #[test]
    fn content_equality_ignores_identity() {
        let a = FixedItem::new("x", 10, Appearance::new("v", "s"));
        let b = FixedItem::new("x", 10, Appearance::new("v", "s"));
        let c = FixedItem::new("x", 11, Appearance::new("v", "s"));
        assert!(content_eq(&a, &b));
        assert!(!content_eq(&a, &c));
    }

    #[test]
    fn boxed_clone_is_a_deep_copy() {
        let source = Arc::new(ScriptedSource::new("alice", 40, Appearance::blank()));
        let mut item = LiveItem::new(7, Arc::clone(&source));
        let frozen = item.boxed_clone();

        *source.text.lock().unwrap() = "bob".to_string();
        item.refresh_text();

        assert_eq!(item.text(), "bob");
        assert_eq!(frozen.text(), "alice");
    }
}
