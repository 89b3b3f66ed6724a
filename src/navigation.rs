use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Extra room kept under the sticky header when picking the active section.
const HEADER_MARGIN: f64 = 30.0;
const SCROLLED_OFFSET: f64 = 50.0;
#[cfg(target_arch = "wasm32")]
const RECOMPUTE_DELAY_MS: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub label: &'static str,
}

/// Page sections in document order.
pub const SECTIONS: [Section; 5] = [
    Section { id: "home", label: "Home" },
    Section { id: "about", label: "About" },
    Section { id: "skills", label: "Skills" },
    Section { id: "projects", label: "Projects" },
    Section { id: "contact", label: "Contact" },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionOffset {
    pub id: &'static str,
    pub top: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub scroll_y: f64,
    pub header_height: f64,
    pub sections: Vec<SectionOffset>,
}

impl PageLayout {
    /// Lowest section whose top has scrolled above the header line.
    pub fn active_section(&self) -> Option<&'static str> {
        self.sections
            .iter()
            .rev()
            .find(|section| self.scroll_y >= section.top - self.header_height - HEADER_MARGIN)
            .map(|section| section.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTransition {
    Opened,
    Closed,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationState {
    pub is_open: bool,
    pub active: Option<&'static str>,
    pub header_scrolled: bool,
}

impl NavigationState {
    pub fn toggle(&mut self) -> NavTransition {
        self.is_open = !self.is_open;
        if self.is_open {
            NavTransition::Opened
        } else {
            NavTransition::Closed
        }
    }

    /// Returns true when the panel was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }

    pub fn recompute(&mut self, layout: &PageLayout) {
        if self.is_open {
            return;
        }
        self.active = layout.active_section();
    }

    pub fn on_scroll(&mut self, layout: &PageLayout) {
        self.header_scrolled = layout.scroll_y > SCROLLED_OFFSET;
        self.recompute(layout);
    }

    pub fn toggle_class(&self) -> &'static str {
        if self.is_open {
            "nav-toggle active"
        } else {
            "nav-toggle"
        }
    }

    pub fn panel_class(&self) -> &'static str {
        if self.is_open {
            "active"
        } else {
            ""
        }
    }

    pub fn header_class(&self) -> &'static str {
        if self.header_scrolled {
            "scrolled"
        } else {
            ""
        }
    }

    /// The body flag that blocks background scrolling under the open panel.
    pub fn body_locked(&self) -> bool {
        self.is_open
    }

    pub fn link_class(&self, id: &str) -> &'static str {
        if self.active == Some(id) {
            "active"
        } else {
            ""
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct NavigationController {
    state: Signal<NavigationState>,
}

impl NavigationController {
    pub fn state(&self) -> NavigationState {
        self.state.read().clone()
    }

    pub fn toggle_nav(&mut self) {
        let transition = self.state.write().toggle();
        tracing::debug!("nav: toggle {transition:?}");
        if transition == NavTransition::Closed {
            self.schedule_recompute();
        }
    }

    pub fn on_link_selected(&mut self) {
        let was_open = self.state.write().close();
        if was_open {
            self.schedule_recompute();
        }
    }

    pub fn recompute_active_link(&mut self) {
        let Some(layout) = measure_layout() else {
            return;
        };
        self.state.write().recompute(&layout);
    }

    pub fn on_scroll(&mut self) {
        let Some(layout) = measure_layout() else {
            return;
        };
        self.state.write().on_scroll(&layout);
    }

    /// Waits for the close transition to lay out before measuring.
    fn schedule_recompute(&self) {
        let mut controller = *self;
        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            TimeoutFuture::new(RECOMPUTE_DELAY_MS).await;
            controller.recompute_active_link();
        });
    }
}

#[cfg(target_arch = "wasm32")]
struct ScrollListener {
    closure: Rc<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>>,
}

pub fn use_navigation() -> NavigationController {
    let state = use_signal(NavigationState::default);
    let controller = NavigationController { state };
    #[cfg(target_arch = "wasm32")]
    let mut listener = use_signal(|| None::<ScrollListener>);

    #[cfg(target_arch = "wasm32")]
    {
        use_effect(move || {
            let locked = state.read().body_locked();
            let Some(body) = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.body())
            else {
                return;
            };
            let _ = body.class_list().toggle_with_force("nav-active", locked);
        });

        use_effect(move || {
            use wasm_bindgen::closure::Closure;

            if listener.read().is_some() {
                return;
            }
            let Some(window) = web_sys::window() else {
                tracing::warn!("nav: window unavailable, scroll tracking disabled");
                return;
            };
            tracing::debug!("nav: attach scroll listeners");
            let mut on_event = controller;
            let closure = Rc::new(Closure::wrap(Box::new(move |_event: web_sys::Event| {
                on_event.on_scroll();
            }) as Box<dyn FnMut(_)>));
            for event in ["scroll", "resize"] {
                let _ = window.add_event_listener_with_callback(
                    event,
                    closure.as_ref().as_ref().unchecked_ref(),
                );
            }
            listener.set(Some(ScrollListener { closure }));

            let mut initial = controller;
            initial.recompute_active_link();
        });

        use_drop(move || {
            if let Some(listener) = listener.read().as_ref() {
                if let Some(window) = web_sys::window() {
                    for event in ["scroll", "resize"] {
                        let _ = window.remove_event_listener_with_callback(
                            event,
                            listener.closure.as_ref().as_ref().unchecked_ref(),
                        );
                    }
                }
            }
        });
    }

    controller
}

#[cfg(target_arch = "wasm32")]
fn measure_layout() -> Option<PageLayout> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let scroll_y = window.scroll_y().ok()?;
    let header_height = document
        .query_selector("header")
        .ok()
        .flatten()
        .map(|header| header.client_height() as f64)
        .unwrap_or(0.0);
    let sections = SECTIONS
        .iter()
        .filter_map(|section| {
            let element = document
                .get_element_by_id(section.id)?
                .dyn_into::<web_sys::HtmlElement>()
                .ok()?;
            Some(SectionOffset {
                id: section.id,
                top: element.offset_top() as f64,
            })
        })
        .collect();
    Some(PageLayout {
        scroll_y,
        header_height,
        sections,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn measure_layout() -> Option<PageLayout> {
    None
}

#[component]
pub fn SiteHeader() -> Element {
    let mut controller = use_navigation();
    let state = controller.state();

    rsx! {
        header { class: state.header_class(),
            a { class: "logo", href: "#home", "LR" }
            button {
                r#type: "button",
                class: state.toggle_class(),
                aria_label: "Toggle navigation",
                onclick: move |_| controller.toggle_nav(),
                span { class: "bar" }
                span { class: "bar" }
                span { class: "bar" }
            }
            nav { class: state.panel_class(),
                ul { class: "nav-list",
                    for section in SECTIONS {
                        li { key: "{section.id}",
                            a {
                                href: "#{section.id}",
                                class: state.link_class(section.id),
                                onclick: move |_| controller.on_link_selected(),
                                "{section.label}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layout(scroll_y: f64) -> PageLayout {
        PageLayout {
            scroll_y,
            header_height: 70.0,
            sections: vec![
                SectionOffset { id: "home", top: 0.0 },
                SectionOffset { id: "about", top: 800.0 },
                SectionOffset { id: "projects", top: 1600.0 },
            ],
        }
    }

    #[test]
    fn open_then_close_clears_every_flag() {
        let mut state = NavigationState::default();
        assert_eq!(state.toggle(), NavTransition::Opened);
        assert_eq!(state.toggle_class(), "nav-toggle active");
        assert_eq!(state.panel_class(), "active");
        assert!(state.body_locked());

        assert_eq!(state.toggle(), NavTransition::Closed);
        assert!(!state.is_open);
        assert_eq!(state.toggle_class(), "nav-toggle");
        assert_eq!(state.panel_class(), "");
        assert!(!state.body_locked());
    }

    #[test]
    fn close_reports_whether_panel_was_open() {
        let mut state = NavigationState::default();
        assert!(!state.close());
        state.toggle();
        assert!(state.close());
        assert!(!state.is_open);
    }

    #[test]
    fn recompute_is_frozen_while_open() {
        let mut state = NavigationState::default();
        state.recompute(&layout(0.0));
        assert_eq!(state.active, Some("home"));

        state.toggle();
        state.recompute(&layout(2000.0));
        assert_eq!(state.active, Some("home"));

        state.toggle();
        state.recompute(&layout(2000.0));
        assert_eq!(state.active, Some("projects"));
    }

    #[test]
    fn boundary_scroll_activates_lower_section() {
        // 800 - 70 - 30
        assert_eq!(layout(700.0).active_section(), Some("about"));
        assert_eq!(layout(699.5).active_section(), Some("home"));
    }

    #[test]
    fn no_active_section_above_first_threshold() {
        let layout = PageLayout {
            scroll_y: 0.0,
            header_height: 70.0,
            sections: vec![SectionOffset { id: "about", top: 500.0 }],
        };
        let mut state = NavigationState::default();
        state.recompute(&layout);
        assert_eq!(state.active, None);
        assert_eq!(state.link_class("about"), "");
    }

    #[test]
    fn only_matching_link_is_active() {
        let mut state = NavigationState::default();
        state.recompute(&layout(900.0));
        let active: Vec<&str> = ["home", "about", "projects"]
            .into_iter()
            .filter(|id| state.link_class(id) == "active")
            .collect();
        assert_eq!(active, vec!["about"]);
    }

    #[test]
    fn header_marks_scrolled_past_offset() {
        let mut state = NavigationState::default();
        state.on_scroll(&layout(50.0));
        assert!(!state.header_scrolled);
        state.on_scroll(&layout(51.0));
        assert!(state.header_scrolled);
        assert_eq!(state.header_class(), "scrolled");
    }
}
