use dioxus::prelude::*;

mod api;
mod components;
mod diagnostics;
mod sync;

use components::JukeboxView;

const APP_CSS: Asset = asset!("/assets/styling/app.css");
const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!("starting jukebox controller");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#18181b" }
        document::Title { "Jukebox Controller" }
        document::Stylesheet { href: TAILWIND_CSS }
        document::Stylesheet { href: APP_CSS }

        JukeboxView {}
    }
}
