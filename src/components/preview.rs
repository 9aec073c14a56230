use std::rc::Rc;

use gloo::console;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::betslip::Betslip;
use crate::config::AppConfig;
use crate::error::ExportError;
use crate::export::dom::DomHost;
use crate::export::{self, Delivered, ExportKind, ExportLock, RasterOptions, Shared};
use crate::share::{ShareButtons, ShareFallback};
use crate::toast::Notifier;

#[derive(Properties, PartialEq)]
pub struct BetslipPreviewProps {
    pub betslip: Rc<Betslip>,
    pub notifier: Notifier,
}

fn start_export(
    kind: ExportKind,
    slip: Rc<Betslip>,
    lock: ExportLock,
    config: Rc<AppConfig>,
    notifier: Notifier,
    fallback: UseStateHandle<Option<ShareFallback>>,
) {
    spawn_local(async move {
        let options = RasterOptions { pixel_ratio: config.pixel_ratio, background: config.background.clone() };
        let result = export::export(&DomHost, &lock, &config.preview_element_id, &kind, &options).await;
        match &result {
            Ok(done) => match &done.delivered {
                Delivered::Downloaded(filename) => console::log!(format!("downloaded {}", filename)),
                Delivered::Shared(Shared::Unsupported) => {
                    fallback.set(Some(ShareFallback::new(slip, done.snapshot.clone())))
                }
                Delivered::Shared(_) => {}
            },
            Err(ExportError::Busy) => console::log!("export already running, ignoring"),
            Err(err) => console::error!(format!("export failed: {}", err)),
        }
        if let Some(toast) = export::notice(&kind, &result) {
            notifier.notify(toast);
        }
    });
}

#[function_component(BetslipPreview)]
pub fn betslip_preview(props: &BetslipPreviewProps) -> Html {
    let config = use_context::<Rc<AppConfig>>().unwrap_or_default();
    let lock = use_state(ExportLock::default);
    let fallback = use_state(|| None::<ShareFallback>);
    let slip = &props.betslip;

    let on_download = {
        let kind = ExportKind::Download { filename: slip.export_filename() };
        let slip = slip.clone();
        let lock = (*lock).clone();
        let config = config.clone();
        let notifier = props.notifier.clone();
        let fallback = fallback.clone();
        Callback::from(move |_: MouseEvent| {
            start_export(kind.clone(), slip.clone(), lock.clone(), config.clone(), notifier.clone(), fallback.clone())
        })
    };
    let on_share = {
        let kind = ExportKind::Share { title: slip.share_title() };
        let slip = slip.clone();
        let lock = (*lock).clone();
        let config = config.clone();
        let notifier = props.notifier.clone();
        let fallback = fallback.clone();
        Callback::from(move |_: MouseEvent| {
            start_export(kind.clone(), slip.clone(), lock.clone(), config.clone(), notifier.clone(), fallback.clone())
        })
    };

    html! {
        <div class="card">
            <h2>
                <span>{"Betslip Preview"}</span>
                <span class="row">
                    <button onclick={on_download} aria-label="Download betslip image">{"Download"}</button>
                    <button onclick={on_share} aria-label="Share betslip image">{"Share"}</button>
                </span>
            </h2>

            { slip.bookmaker.style().render(slip, &config.preview_element_id) }

            // A capture of an earlier version of the slip is not offered.
            { if let Some(snapshot) = (*fallback).as_ref().and_then(|f| f.snapshot_for(slip)) {
                html!{
                    <ShareButtons
                        {snapshot}
                        filename={slip.export_filename()}
                        share_text={config.share_text.clone()}
                        notifier={props.notifier.clone()} />
                }
            } else { html!{} }}
        </div>
    }
}
