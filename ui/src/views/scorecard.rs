use std::rc::Rc;
use std::sync::Arc;

use base64::Engine as _;
use dioxus::prelude::*;
use futures_util::StreamExt;
use tracing::debug;

use crate::core::scorecard::ScoreCard;
use crate::share::{self, CaptureRegion};
use crate::BACKGROUND_PNG;

#[derive(Debug, Clone)]
enum ShareEvent {
    Share(CaptureRegion),
}

/// The bundled background as a `data:` URL for the webview.
fn background_data_url() -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(BACKGROUND_PNG)
    )
}

/// The score card over its background, plus the share button.
#[component]
pub fn ScoreCardScreen(#[props(default)] card: ScoreCard) -> Element {
    let mut busy = use_signal(|| false);
    let mut mounted = use_signal(|| false);
    let background_url = use_hook(background_data_url);
    let background: Arc<[u8]> = use_hook(|| Arc::from(BACKGROUND_PNG));

    let workflow = use_hook(move || {
        Rc::new(share::platform_workflow().on_transition(move |state| {
            let mut busy = busy;
            busy.set(state.is_busy());
        }))
    });

    // Triggers are handled one at a time, in arrival order.
    let runner = workflow.clone();
    let sharer = use_coroutine(move |mut rx: UnboundedReceiver<ShareEvent>| {
        let workflow = runner.clone();
        let mut busy = busy;
        async move {
            while let Some(ShareEvent::Share(region)) = rx.next().await {
                // Failures are logged by the workflow and stay off screen.
                let _ = workflow.capture_and_share(&region).await;
                busy.set(workflow.is_busy());
            }
        }
    });

    let course_name = card.course_name().to_string();
    let total_label = card.total_label();
    let holes = card.holes().to_vec();

    rsx! {
        section { class: "page page-scorecard",
            div {
                class: "scorecard",
                onmounted: move |_| mounted.set(true),
                img {
                    class: "scorecard__background",
                    src: "{background_url}",
                    alt: "",
                }
                div { class: "scorecard__scores",
                    h1 { class: "scorecard__title", "{course_name}" }
                    div { class: "scorecard__grid",
                        for hole in holes {
                            div { key: "{hole.hole}", class: "scorecard__hole",
                                span { class: "scorecard__hole-label", {hole.label()} }
                                span { class: "scorecard__hole-score", "{hole.strokes}" }
                            }
                        }
                    }
                    p { class: "scorecard__total", "{total_label}" }
                }
            }

            button {
                r#type: "button",
                class: "button button--primary scorecard__share",
                disabled: busy(),
                onclick: move |_| {
                    if !mounted() {
                        debug!("share pressed before the card mounted");
                        return;
                    }
                    // Presses while a run is queued or in flight are dropped.
                    if busy() || workflow.is_busy() {
                        debug!("share already in flight; dropping press");
                        return;
                    }
                    busy.set(true);
                    let region = CaptureRegion::for_card(card.clone())
                        .with_background(background.clone());
                    sharer.send(ShareEvent::Share(region));
                },
                "Share My Score"
            }
        }
    }
}
