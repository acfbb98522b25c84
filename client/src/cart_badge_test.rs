use super::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =============================================================================
// FAKES
// =============================================================================

#[derive(Default)]
struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    fn with_cart(raw: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(CART_STORAGE_KEY.to_owned(), raw.to_owned());
        Self { items }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }
}

#[derive(Clone, Default)]
struct FakeElement {
    text: Rc<RefCell<Option<String>>>,
    writes: Rc<RefCell<usize>>,
}

impl TextSink for FakeElement {
    fn set_text_content(&self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_owned());
        *self.writes.borrow_mut() += 1;
    }
}

#[derive(Default)]
struct FakeDocument {
    elements: HashMap<String, FakeElement>,
    lookups: RefCell<Vec<String>>,
}

impl FakeDocument {
    fn with_badge() -> (Self, FakeElement) {
        let badge = FakeElement::default();
        let mut elements = HashMap::new();
        elements.insert(CART_COUNT_ELEMENT_ID.to_owned(), badge.clone());
        (Self { elements, ..Self::default() }, badge)
    }
}

impl ElementLookup for FakeDocument {
    type Element = FakeElement;

    fn find_element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.lookups.borrow_mut().push(id.to_owned());
        self.elements.get(id).cloned()
    }
}

#[derive(Default)]
struct ManualReady {
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl ManualReady {
    fn fire(&self) {
        let callbacks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl ReadySignal for ManualReady {
    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push(callback);
    }
}

fn badge_text(badge: &FakeElement) -> Option<String> {
    badge.text.borrow().clone()
}

// =============================================================================
// update_cart_count
// =============================================================================

#[test]
fn missing_cart_shows_zero() {
    let (doc, badge) = FakeDocument::with_badge();
    assert_eq!(update_cart_count(&MemoryStore::default(), &doc), Some(0));
    assert_eq!(badge_text(&badge).as_deref(), Some("0"));
}

#[test]
fn empty_array_shows_zero() {
    let (doc, badge) = FakeDocument::with_badge();
    update_cart_count(&MemoryStore::with_cart("[]"), &doc);
    assert_eq!(badge_text(&badge).as_deref(), Some("0"));
}

#[test]
fn three_entries_show_three() {
    let (doc, badge) = FakeDocument::with_badge();
    assert_eq!(update_cart_count(&MemoryStore::with_cart("[1,2,3]"), &doc), Some(3));
    assert_eq!(badge_text(&badge).as_deref(), Some("3"));
}

#[test]
fn counts_entries_not_quantities() {
    let raw = r#"[{"id":1,"name":"Portland Cement 50kg","price":450,"quantity":4},{"id":5,"name":"Basmati Rice 1kg","price":80,"quantity":2}]"#;
    let (doc, badge) = FakeDocument::with_badge();
    update_cart_count(&MemoryStore::with_cart(raw), &doc);
    assert_eq!(badge_text(&badge).as_deref(), Some("2"));
}

#[test]
fn large_cart_renders_decimal() {
    let raw = format!("[{}]", vec!["null"; 120].join(","));
    let (doc, badge) = FakeDocument::with_badge();
    update_cart_count(&MemoryStore::with_cart(&raw), &doc);
    assert_eq!(badge_text(&badge).as_deref(), Some("120"));
}

#[test]
fn malformed_cart_defaults_to_zero() {
    let (doc, badge) = FakeDocument::with_badge();
    assert_eq!(update_cart_count(&MemoryStore::with_cart("not json"), &doc), Some(0));
    assert_eq!(badge_text(&badge).as_deref(), Some("0"));
}

#[test]
fn non_array_json_defaults_to_zero() {
    for raw in [r#"{"length":7}"#, r#""abc""#, "42", "null"] {
        let (doc, badge) = FakeDocument::with_badge();
        update_cart_count(&MemoryStore::with_cart(raw), &doc);
        assert_eq!(badge_text(&badge).as_deref(), Some("0"), "raw = {raw:?}");
    }
}

#[test]
fn missing_badge_is_noop() {
    let doc = FakeDocument::default();
    assert_eq!(update_cart_count(&MemoryStore::with_cart("[1]"), &doc), None);
    assert_eq!(*doc.lookups.borrow(), vec![CART_COUNT_ELEMENT_ID.to_owned()]);
}

#[test]
fn other_elements_are_untouched() {
    let (mut doc, badge) = FakeDocument::with_badge();
    let other = FakeElement::default();
    doc.elements.insert("cart-total".to_owned(), other.clone());
    update_cart_count(&MemoryStore::with_cart("[1,2]"), &doc);
    assert_eq!(badge_text(&badge).as_deref(), Some("2"));
    assert_eq!(badge_text(&other), None);
}

#[test]
fn unrelated_storage_keys_are_ignored() {
    let mut store = MemoryStore::default();
    store.items.insert("wishlist".to_owned(), "[1,2,3,4]".to_owned());
    let (doc, badge) = FakeDocument::with_badge();
    update_cart_count(&store, &doc);
    assert_eq!(badge_text(&badge).as_deref(), Some("0"));
}

// =============================================================================
// CartSnapshot
// =============================================================================

#[test]
fn parse_none_is_empty() {
    let snapshot = CartSnapshot::parse(None).unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.len(), 0);
}

#[test]
fn parse_rejects_non_array() {
    assert!(CartSnapshot::parse(Some("{}")).is_err());
    assert!(CartSnapshot::parse(Some("not json")).is_err());
}

#[test]
fn parse_keeps_opaque_entries() {
    let snapshot = CartSnapshot::parse(Some(r#"[1,"two",{"three":3},[4],null]"#)).unwrap();
    assert_eq!(snapshot.len(), 5);
}

// =============================================================================
// install
// =============================================================================

#[test]
fn install_waits_for_ready_signal() {
    let ready = ManualReady::default();
    let (doc, badge) = FakeDocument::with_badge();
    install(&ready, MemoryStore::with_cart("[1,2,3]"), doc);

    assert_eq!(badge_text(&badge), None);
    ready.fire();
    assert_eq!(badge_text(&badge).as_deref(), Some("3"));
}

#[test]
fn install_runs_once_per_ready_signal() {
    let ready = ManualReady::default();
    let (doc, badge) = FakeDocument::with_badge();
    install(&ready, MemoryStore::default(), doc);

    ready.fire();
    ready.fire();
    assert_eq!(*badge.writes.borrow(), 1);
}
