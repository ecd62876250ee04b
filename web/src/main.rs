use dioxus::prelude::*;

use ui::views::Dashboard;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Style { "{ui::THEME_CSS}" }
        Dashboard {}
    }
}
