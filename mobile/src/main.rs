use dioxus::prelude::*;

use ui::core::scorecard::ScoreCard;
use ui::views::ScoreCardScreen;

const MAIN_CSS_INLINE: &str = ui::THEME_CSS;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }
        ScoreCardScreen { card: ScoreCard::mountain_view() }
    }
}
