//! Fallback sharing through platform intent links.
//!
//! Platforms here can't take an image by URL, so each button opens the
//! platform's composer with text and a page link and downloads the PNG for the
//! user to attach by hand.

use std::cell::RefCell;
use std::rc::Rc;

use url::form_urlencoded;
use yew::prelude::*;

use crate::error::ExportError;
use crate::export::dom::{self, js_message};
use crate::betslip::Betslip;
use crate::export::Snapshot;
use crate::toast::{Notifier, Toast};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareTarget {
    Facebook,
    Twitter,
    WhatsApp,
    Email,
    Sms,
}

impl ShareTarget {
    pub fn all() -> &'static [ShareTarget] {
        &[
            ShareTarget::Facebook,
            ShareTarget::Twitter,
            ShareTarget::WhatsApp,
            ShareTarget::Email,
            ShareTarget::Sms,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            ShareTarget::Facebook => "Facebook",
            ShareTarget::Twitter => "Twitter",
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::Email => "Email",
            ShareTarget::Sms => "SMS",
        }
    }

    /// Web intents open in a new browsing context; `mailto:`/`sms:` replace the location.
    pub fn opens_new_context(self) -> bool {
        !matches!(self, ShareTarget::Email | ShareTarget::Sms)
    }

    pub fn intent_url(self, text: &str, page_url: &str) -> String {
        let with_link = format!("{} {}", text, page_url);
        match self {
            ShareTarget::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={}", encode(page_url)),
            ShareTarget::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encode(text),
                encode(page_url)
            ),
            ShareTarget::WhatsApp => format!("https://api.whatsapp.com/send?text={}", encode(&with_link)),
            ShareTarget::Email => format!("mailto:?subject={}&body={}", encode(text), encode(&with_link)),
            ShareTarget::Sms => format!("sms:?body={}", encode(&with_link)),
        }
    }
}

/// Percent-encodes a query component with spaces as `%20`, which `mailto:`
/// and `sms:` handlers expect.
fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Owns the object URLs created for manual attachment downloads until
/// [`ShareService::teardown`] revokes them.
pub struct ShareService {
    text: String,
    page_url: String,
    object_urls: RefCell<Vec<String>>,
}

impl ShareService {
    pub fn new(text: impl Into<String>, page_url: impl Into<String>) -> Self {
        ShareService { text: text.into(), page_url: page_url.into(), object_urls: RefCell::default() }
    }

    /// Reads the current page address from the browser.
    pub fn init(text: &str) -> Result<Self, ExportError> {
        let page_url = dom::window()?
            .location()
            .href()
            .map_err(|e| ExportError::Dom(js_message(&e)))?;
        Ok(ShareService::new(text, page_url))
    }

    pub fn intent_url(&self, target: ShareTarget) -> String {
        target.intent_url(&self.text, &self.page_url)
    }

    pub fn open(&self, target: ShareTarget, snapshot: &Snapshot, filename: &str) -> Result<(), ExportError> {
        let win = dom::window()?;
        let url = self.intent_url(target);
        if target.opens_new_context() {
            win.open_with_url_and_target_and_features(&url, "_blank", "noopener,noreferrer,width=600,height=400")
                .map_err(|e| ExportError::Share(js_message(&e)))?;
        } else {
            win.location()
                .set_href(&url)
                .map_err(|e| ExportError::Share(js_message(&e)))?;
        }

        let blob = dom::png_blob(snapshot)?;
        let object_url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| ExportError::Dom(js_message(&e)))?;
        self.track(object_url.clone());
        dom::click_download(&object_url, filename)
    }

    pub fn live_object_urls(&self) -> usize {
        self.object_urls.borrow().len()
    }

    fn track(&self, object_url: String) {
        self.object_urls.borrow_mut().push(object_url);
    }

    pub fn teardown(&self) {
        self.teardown_with(|url| {
            let _ = web_sys::Url::revoke_object_url(url);
        });
    }

    fn teardown_with(&self, revoke: impl Fn(&str)) {
        for url in self.object_urls.borrow_mut().drain(..) {
            revoke(&url);
        }
    }
}

/// An image kept for the intent buttons, tied to the slip it was captured from.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareFallback {
    slip: Rc<Betslip>,
    snapshot: Rc<Snapshot>,
}

impl ShareFallback {
    pub fn new(slip: Rc<Betslip>, snapshot: Snapshot) -> Self {
        ShareFallback { slip, snapshot: Rc::new(snapshot) }
    }

    /// The captured image, but only while it still pictures `slip`.
    pub fn snapshot_for(&self, slip: &Betslip) -> Option<Rc<Snapshot>> {
        (*self.slip == *slip).then(|| self.snapshot.clone())
    }
}

#[derive(Properties, PartialEq)]
pub struct ShareButtonsProps {
    pub snapshot: Rc<Snapshot>,
    pub filename: AttrValue,
    pub share_text: AttrValue,
    pub notifier: Notifier,
}

#[function_component(ShareButtons)]
pub fn share_buttons(props: &ShareButtonsProps) -> Html {
    let service = use_memo(props.share_text.clone(), |text| ShareService::init(text));

    {
        let service = service.clone();
        use_effect_with(props.share_text.clone(), move |_| {
            move || {
                if let Ok(service) = &*service {
                    service.teardown();
                }
            }
        });
    }

    if let Err(err) = &*service {
        gloo::console::error!(format!("share buttons unavailable: {}", err));
        return html! {};
    }

    html! {
        <div class="share-fallback">
            <h3>{"Share your betslip:"}</h3>
            <div class="row wrap">
                { for ShareTarget::all().iter().map(|&target| {
                    let service = service.clone();
                    let snapshot = props.snapshot.clone();
                    let filename = props.filename.clone();
                    let notifier = props.notifier.clone();
                    let onclick = Callback::from(move |_: MouseEvent| {
                        let Ok(service) = &*service else { return };
                        match service.open(target, &snapshot, &filename) {
                            Ok(()) => notifier.notify(Toast::info("Please attach the downloaded image to your post")),
                            Err(err) => {
                                gloo::console::error!(format!("sharing via {} failed: {}", target.label(), err));
                                notifier.notify(Toast::error(format!("Failed to share on {}", target.label())));
                            }
                        }
                    });
                    html! {
                        <button class={classes!("share-btn", target.label().to_lowercase())} {onclick}>
                            { target.label() }
                        </button>
                    }
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.test/betslip?x=1";
    const TEXT: &str = "Check out my betslip!";

    #[test]
    fn web_intents_carry_text_and_link() {
        assert_eq!(
            ShareTarget::Facebook.intent_url(TEXT, PAGE),
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.test%2Fbetslip%3Fx%3D1"
        );
        assert_eq!(
            ShareTarget::Twitter.intent_url(TEXT, PAGE),
            "https://twitter.com/intent/tweet?text=Check%20out%20my%20betslip%21&url=https%3A%2F%2Fexample.test%2Fbetslip%3Fx%3D1"
        );
        assert!(ShareTarget::WhatsApp
            .intent_url(TEXT, PAGE)
            .starts_with("https://api.whatsapp.com/send?text=Check%20out%20my%20betslip%21%20https%3A%2F%2F"));
    }

    #[test]
    fn message_intents_use_percent_twenty() {
        let mail = ShareTarget::Email.intent_url("a+b c", PAGE);
        assert!(mail.starts_with("mailto:?subject=a%2Bb%20c&body="));
        assert!(!mail.contains('+'));
        assert!(ShareTarget::Sms.intent_url(TEXT, PAGE).starts_with("sms:?body=Check%20out"));
    }

    #[test]
    fn only_web_intents_open_new_windows() {
        let opening: Vec<_> = ShareTarget::all().iter().filter(|t| t.opens_new_context()).collect();
        assert_eq!(opening.len(), 3);
        assert!(!ShareTarget::Email.opens_new_context());
    }

    #[test]
    fn fallback_image_is_dropped_once_the_slip_changes() {
        let slip = Rc::new(Betslip::blank());
        let fallback = ShareFallback::new(slip.clone(), Snapshot { data_url: "data:image/png;base64,UE5H".into() });
        assert_eq!(fallback.snapshot_for(&slip).map(|s| s.data_url.clone()).as_deref(), Some("data:image/png;base64,UE5H"));
        assert!(fallback.snapshot_for(&slip.as_ref().clone()).is_some());

        let edited = slip.with_stake(50.0);
        assert!(fallback.snapshot_for(&edited).is_none());
        assert!(fallback.snapshot_for(&slip.with_receipt_number("ZZZZ9999".into())).is_none());
    }

    #[test]
    fn service_builds_urls_from_its_page() {
        let service = ShareService::new(TEXT, PAGE);
        assert_eq!(service.intent_url(ShareTarget::Sms), ShareTarget::Sms.intent_url(TEXT, PAGE));
        assert_eq!(service.live_object_urls(), 0);
    }

    #[test]
    fn each_service_revokes_only_its_own_urls() {
        let old = ShareService::new("Old text", PAGE);
        let new = ShareService::new(TEXT, PAGE);
        old.track("blob:one".into());
        old.track("blob:two".into());
        new.track("blob:three".into());

        let revoked = RefCell::new(Vec::new());
        old.teardown_with(|url| revoked.borrow_mut().push(url.to_string()));
        assert_eq!(*revoked.borrow(), vec!["blob:one".to_string(), "blob:two".to_string()]);
        assert_eq!(old.live_object_urls(), 0);
        assert_eq!(new.live_object_urls(), 1);
    }
}
