use std::collections::HashMap;

use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};

pub const SECTION_SELECTOR: &str = ".animated-section";
pub const CARD_SELECTOR: &str = ".project";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealTarget {
    Section,
    Card,
}

impl RevealTarget {
    /// Share of the element that must be on screen before it counts as visible.
    pub fn threshold(self) -> f64 {
        match self {
            RevealTarget::Section => 0.1,
            RevealTarget::Card => 0.2,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionVisibility {
    entries: HashMap<String, bool>,
}

impl SectionVisibility {
    pub fn register(&mut self, id: &str) {
        self.entries.entry(id.to_string()).or_insert(false);
    }

    pub fn set(&mut self, id: &str, visible: bool) {
        self.entries.insert(id.to_string(), visible);
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }
}

/// Whether a bounding box already overlaps the viewport on first paint.
pub fn initially_visible(top: f64, bottom: f64, viewport_height: f64) -> bool {
    top < viewport_height && bottom > 0.0
}

pub fn reveal_class(base: &str, visible: bool) -> String {
    if visible {
        format!("{base} is-visible")
    } else {
        base.to_string()
    }
}

#[cfg(target_arch = "wasm32")]
struct ObserverHandle {
    observer: web_sys::IntersectionObserver,
    _closure: Rc<wasm_bindgen::closure::Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>>,
}

/// Tracks which sections and cards have been revealed.
#[derive(Clone, Copy, PartialEq)]
pub struct ViewportAnimator {
    visibility: Signal<SectionVisibility>,
    #[cfg(target_arch = "wasm32")]
    observers: Signal<Vec<ObserverHandle>>,
}

impl ViewportAnimator {
    pub fn class_for(&self, base: &str, id: &str) -> String {
        reveal_class(base, self.visibility.read().is_visible(id))
    }

    /// Observes every element matching `selector` that carries an id.
    #[cfg(target_arch = "wasm32")]
    pub fn observe_all(&mut self, selector: &str, target: RevealTarget) {
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Ok(nodes) = document.query_selector_all(selector) else {
            tracing::warn!("reveal: invalid selector {selector}");
            return;
        };

        let mut visibility = self.visibility;
        let closure = Rc::new(Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
                let mut visibility = visibility.write();
                for entry in entries.iter() {
                    let entry: web_sys::IntersectionObserverEntry = entry.unchecked_into();
                    let id = entry.target().id();
                    if id.is_empty() {
                        continue;
                    }
                    visibility.set(&id, entry.is_intersecting());
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>));

        let options = web_sys::IntersectionObserverInit::new();
        options.set_root_margin("0px");
        options.set_threshold(&JsValue::from_f64(target.threshold()));
        let Ok(observer) = web_sys::IntersectionObserver::new_with_options(
            closure.as_ref().as_ref().unchecked_ref(),
            &options,
        ) else {
            tracing::warn!("reveal: intersection observer unavailable");
            return;
        };

        let viewport_height = window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        let mut observed = 0usize;
        for index in 0..nodes.length() {
            let Some(element) = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let id = element.id();
            if id.is_empty() {
                continue;
            }
            {
                let mut state = visibility.write();
                state.register(&id);
                if target == RevealTarget::Section {
                    let rect = element.get_bounding_client_rect();
                    if initially_visible(rect.top(), rect.bottom(), viewport_height) {
                        state.set(&id, true);
                    }
                }
            }
            observer.observe(&element);
            observed += 1;
        }
        tracing::debug!("reveal: observing {observed} elements for {selector}");

        self.observers.write().push(ObserverHandle {
            observer,
            _closure: closure,
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn observe_all(&mut self, _selector: &str, _target: RevealTarget) {}
}

/// Provides the page-wide animator and disconnects its observers on drop.
pub fn use_viewport_animator_provider() -> ViewportAnimator {
    let animator = use_context_provider(|| ViewportAnimator {
        visibility: Signal::new(SectionVisibility::default()),
        #[cfg(target_arch = "wasm32")]
        observers: Signal::new(Vec::new()),
    });

    #[cfg(target_arch = "wasm32")]
    use_drop(move || {
        for handle in animator.observers.read().iter() {
            handle.observer.disconnect();
        }
    });

    animator
}

pub fn use_viewport_animator() -> ViewportAnimator {
    use_context::<ViewportAnimator>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cards_need_more_area_than_sections() {
        assert_eq!(RevealTarget::Section.threshold(), 0.1);
        assert_eq!(RevealTarget::Card.threshold(), 0.2);
    }

    #[test]
    fn visibility_is_reversible() {
        let mut visibility = SectionVisibility::default();
        visibility.register("about");
        assert!(!visibility.is_visible("about"));
        visibility.set("about", true);
        assert!(visibility.is_visible("about"));
        visibility.set("about", false);
        assert!(!visibility.is_visible("about"));
    }

    #[test]
    fn register_keeps_existing_flag() {
        let mut visibility = SectionVisibility::default();
        visibility.set("home", true);
        visibility.register("home");
        assert!(visibility.is_visible("home"));
    }

    #[test]
    fn initial_visibility_needs_overlap() {
        assert!(initially_visible(0.0, 600.0, 800.0));
        assert!(initially_visible(-200.0, 10.0, 800.0));
        assert!(!initially_visible(800.0, 1400.0, 800.0));
        assert!(!initially_visible(-600.0, 0.0, 800.0));
    }

    #[test]
    fn reveal_class_appends_visible_marker() {
        assert_eq!(reveal_class("animated-section", true), "animated-section is-visible");
        assert_eq!(reveal_class("project", false), "project");
    }
}
