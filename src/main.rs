mod config;
mod downloads;
mod feed;
mod matrix;
mod navigation;
mod reveal;
mod routes;

fn main() {
    dioxus::launch(routes::App);
}
