use dioxus::prelude::*;
use dioxus_router::{Link, Routable, Router};

use crate::config::{use_runtime_config, DocumentLink, RuntimeConfig};
use crate::downloads::{download_cv, download_file};
use crate::feed::ProjectFeed;
use crate::matrix::MatrixBackground;
use crate::navigation::SiteHeader;
use crate::reveal::{use_viewport_animator_provider, RevealTarget, SECTION_SELECTOR};

const MAIN_CSS: Asset = asset!("/assets/main.css");

const SKILLS: [(&str, &[&str]); 3] = [
    ("Languages", &["Rust", "C", "Python", "JavaScript"]),
    ("Systems", &["Linux", "Networking", "Docker"]),
    ("Security", &["CTF", "Reverse engineering", "Web exploitation"]),
];

#[component]
pub fn App() -> Element {
    let config_resource = use_runtime_config();
    let Some(config) = config_resource() else {
        return rsx! {
            document::Title { "Leonardo Rufini" }
            div { class: "page loading",
                h1 { "Loading..." }
            }
        };
    };

    use_context_provider(|| config);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link {
            rel: "stylesheet",
            href: "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css",
        }
        document::Meta { name: "theme-color", content: "#000000" }
        Router::<Route> {}
    }
}

#[derive(Clone, PartialEq, Routable)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

#[component]
fn Home() -> Element {
    let config = use_context::<RuntimeConfig>();
    let mut animator = use_viewport_animator_provider();
    let mut sections_observed = use_signal(|| false);

    use_effect(move || {
        if sections_observed() {
            return;
        }
        sections_observed.set(true);
        animator.observe_all(SECTION_SELECTOR, RevealTarget::Section);
    });

    let section_class = move |id: &str| animator.class_for("animated-section", id);
    let cv_config = config.clone();

    rsx! {
        document::Title { "Leonardo Rufini | Portfolio" }
        MatrixBackground {}
        SiteHeader {}
        main {
            section { id: "home", class: section_class("home"),
                h1 { "Leonardo Rufini" }
                p { class: "tagline", "Computer engineering student. Systems, security and the occasional side project." }
                a { class: "button", href: "#projects", "See my work" }
            }
            section { id: "about", class: section_class("about"),
                h2 { "About me" }
                p {
                    "I like understanding how things work under the hood: operating systems, networks and the software "
                    "that glues them together. Most of what I build starts as a question and ends up on GitHub."
                }
            }
            section { id: "skills", class: section_class("skills"),
                h2 { "Skills" }
                div { class: "skills-grid",
                    for (group, items) in SKILLS {
                        div { key: "{group}", class: "skill-card",
                            h3 { "{group}" }
                            ul {
                                for item in items.iter() {
                                    li { key: "{item}", "{item}" }
                                }
                            }
                        }
                    }
                }
            }
            section { id: "projects", class: section_class("projects"),
                h2 { "Projects" }
                ProjectFeed {}
            }
            section { id: "contact", class: section_class("contact"),
                h2 { "Contact" }
                p { "Want to talk about a project or an opportunity? Grab my CV or reach out on GitHub." }
                div { class: "contact-actions",
                    button {
                        r#type: "button",
                        class: "button",
                        onclick: move |_| {
                            if let Err(err) = download_cv(&cv_config) {
                                tracing::warn!("downloads: cv failed: {err}");
                            }
                        },
                        i { class: "fas fa-download" }
                        " Download CV"
                    }
                    for link in config.documents.iter() {
                        DocumentButton { key: "{link.path}", link: link.clone() }
                    }
                    a {
                        class: "button ghost",
                        href: "https://github.com/pennyw1ze",
                        target: "_blank",
                        rel: "noopener noreferrer",
                        i { class: "fab fa-github" }
                        " GitHub"
                    }
                }
            }
        }
        footer {
            p { "© Leonardo Rufini" }
        }
    }
}

#[component]
fn DocumentButton(link: DocumentLink) -> Element {
    let label = link.label.clone();
    rsx! {
        button {
            r#type: "button",
            class: "button ghost",
            onclick: move |_| {
                if let Err(err) = download_file(&link.path, link.filename.as_deref()) {
                    tracing::warn!("downloads: {} failed: {err}", link.path);
                }
            },
            i { class: "fas fa-file" }
            " {label}"
        }
    }
}

#[component]
fn NotFound(route: Vec<String>) -> Element {
    let path = route.join("/");
    rsx! {
        document::Title { "Not Found | Leonardo Rufini" }
        MatrixBackground {}
        div { class: "page not-found",
            h1 { "404" }
            p { "Missing: /{path}" }
            Link { to: Route::Home {}, class: "button", "Back home" }
        }
    }
}
