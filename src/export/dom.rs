//! Browser implementation of the export capabilities, backed by `html2canvas`.

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CssStyleDeclaration, Document, Element, File, FilePropertyBag, HtmlAnchorElement,
    HtmlCanvasElement, HtmlElement, Window,
};

use super::color::{self, Rgb};
use super::{Deliver, ExportHost, RasterOptions, Shared, Snapshot};
use crate::error::ExportError;

const PNG_MIME: &str = "image/png";
const SHARED_FILE_NAME: &str = "betslip.png";

const COLOR_PROPERTIES: &[&str] = &[
    "background-color",
    "color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];

const FILTER_PROPERTIES: &[&str] = &["filter", "backdrop-filter", "-webkit-backdrop-filter"];

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<Promise, JsValue>;
}

/// Best-effort human readable text for a thrown JS value.
pub fn js_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn js_name(err: &JsValue) -> Option<String> {
    Reflect::get(err, &JsValue::from_str("name")).ok().and_then(|n| n.as_string())
}

fn dom_err(err: JsValue) -> ExportError {
    ExportError::Dom(js_message(&err))
}

pub fn window() -> Result<Window, ExportError> {
    web_sys::window().ok_or_else(|| ExportError::Dom("no window".into()))
}

pub fn document() -> Result<Document, ExportError> {
    window()?.document().ok_or_else(|| ExportError::Dom("no document".into()))
}

fn set_props(el: &HtmlElement, props: &[(&str, &str)]) -> Result<(), ExportError> {
    let style = el.style();
    for (name, value) in props {
        style.set_property(name, value).map_err(dom_err)?;
    }
    Ok(())
}

fn png_parts(snapshot: &Snapshot) -> Result<Array, ExportError> {
    let bytes = snapshot.png_bytes()?;
    Ok(Array::of1(&Uint8Array::from(bytes.as_slice())))
}

pub fn png_blob(snapshot: &Snapshot) -> Result<Blob, ExportError> {
    let bag = BlobPropertyBag::new();
    bag.set_type(PNG_MIME);
    Blob::new_with_u8_array_sequence_and_options(&png_parts(snapshot)?.into(), &bag).map_err(dom_err)
}

fn png_file(snapshot: &Snapshot) -> Result<File, ExportError> {
    let bag = FilePropertyBag::new();
    bag.set_type(PNG_MIME);
    File::new_with_u8_array_sequence_and_options(&png_parts(snapshot)?.into(), SHARED_FILE_NAME, &bag).map_err(dom_err)
}

/// Clicks a temporary `<a download>` pointing at `href`.
pub fn click_download(href: &str, filename: &str) -> Result<(), ExportError> {
    let doc = document()?;
    let body = doc.body().ok_or_else(|| ExportError::Dom("no body".into()))?;
    let link: HtmlAnchorElement = doc.create_element("a").map_err(dom_err)?.unchecked_into();
    link.set_href(href);
    link.set_download(filename);
    body.append_child(&link).map_err(dom_err)?;
    link.click();
    body.remove_child(&link).map_err(dom_err)?;
    Ok(())
}

/// The live page. Holds nothing between exports.
pub struct DomHost;

impl DomHost {
    fn flatten_one(
        &self,
        computed: &CssStyleDeclaration,
        clone: &HtmlElement,
        backdrop: Rgb,
    ) -> Result<(), ExportError> {
        let read = |name: &str| computed.get_property_value(name).unwrap_or_default();
        if read("opacity") != "1" {
            set_props(clone, &[("opacity", "1")])?;
        }
        for &name in FILTER_PROPERTIES {
            let value = read(name);
            if !value.is_empty() && value != "none" {
                set_props(clone, &[(name, "none")])?;
            }
        }
        for &name in COLOR_PROPERTIES {
            if let Some(opaque) = color::flatten(&read(name), backdrop) {
                set_props(clone, &[(name, opaque.as_str())])?;
            }
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl ExportHost for DomHost {
    type Node = HtmlElement;

    fn find(&self, id: &str) -> Option<HtmlElement> {
        document().ok()?.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn duplicate(&self, source: &HtmlElement) -> Result<HtmlElement, ExportError> {
        let clone: HtmlElement = source
            .clone_node_with_deep(true)
            .map_err(dom_err)?
            .dyn_into()
            .map_err(|_| ExportError::Dom("clone is not an HTML element".into()))?;
        // Two nodes with the same id would confuse the next lookup.
        clone.remove_attribute("id").map_err(dom_err)?;
        Ok(clone)
    }

    fn normalize(&self, source: &HtmlElement, clone: &HtmlElement, options: &RasterOptions) -> Result<(), ExportError> {
        let win = window()?;
        let backdrop = Rgb::from_hex(&options.background).unwrap_or(Rgb::WHITE);

        set_props(
            clone,
            &[
                ("width", format!("{}px", source.offset_width()).as_str()),
                ("height", format!("{}px", source.offset_height()).as_str()),
                ("background-color", options.background.as_str()),
            ],
        )?;

        // A deep clone has the same shape, so document order pairs them up.
        let sources = source.query_selector_all("*").map_err(dom_err)?;
        let clones = clone.query_selector_all("*").map_err(dom_err)?;
        let roots = (
            source.clone().unchecked_into::<Element>(),
            clone.clone().unchecked_into::<Element>(),
        );
        let descendants = (0..sources.length().min(clones.length())).filter_map(|i| {
            let s = sources.item(i)?.dyn_into::<Element>().ok()?;
            let c = clones.item(i)?.dyn_into::<Element>().ok()?;
            Some((s, c))
        });
        let pairs = std::iter::once(roots).chain(descendants);

        for (src, dst) in pairs {
            // SVG and other non-HTML nodes are left as they are.
            let Some(dst) = dst.dyn_ref::<HtmlElement>() else { continue };
            let Some(computed) = win.get_computed_style(&src).map_err(dom_err)? else { continue };
            self.flatten_one(&computed, dst, backdrop)?;
        }
        Ok(())
    }

    fn attach_offscreen(&self, clone: &HtmlElement) -> Result<(), ExportError> {
        set_props(
            clone,
            &[
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("z-index", "-9999"),
                ("pointer-events", "none"),
            ],
        )?;
        let body = document()?.body().ok_or_else(|| ExportError::Dom("no body".into()))?;
        body.append_child(clone).map_err(dom_err)?;
        Ok(())
    }

    fn detach(&self, clone: &HtmlElement) {
        if let Some(parent) = clone.parent_node() {
            let _ = parent.remove_child(clone);
        }
    }

    async fn rasterize(&self, clone: &HtmlElement, options: &RasterOptions) -> Result<Snapshot, ExportError> {
        let opts = Object::new();
        for (key, value) in [
            ("scale", JsValue::from_f64(options.pixel_ratio)),
            ("backgroundColor", JsValue::from_str(&options.background)),
            ("logging", JsValue::FALSE),
            ("useCORS", JsValue::TRUE),
        ] {
            Reflect::set(&opts, &JsValue::from_str(key), &value).map_err(dom_err)?;
        }

        let promise = html2canvas(clone, &opts).map_err(|e| ExportError::Rasterize(js_message(&e)))?;
        let canvas: HtmlCanvasElement = JsFuture::from(promise)
            .await
            .map_err(|e| ExportError::Rasterize(js_message(&e)))?
            .dyn_into()
            .map_err(|_| ExportError::Rasterize("html2canvas did not return a canvas".into()))?;
        let data_url = canvas
            .to_data_url_with_type(PNG_MIME)
            .map_err(|e| ExportError::Encode(js_message(&e)))?;
        Ok(Snapshot { data_url })
    }
}

#[async_trait(?Send)]
impl Deliver for DomHost {
    fn download(&self, snapshot: &Snapshot, filename: &str) -> Result<(), ExportError> {
        click_download(&snapshot.data_url, filename)
    }

    async fn share(&self, snapshot: &Snapshot, title: &str) -> Result<Shared, ExportError> {
        let navigator = window()?.navigator();
        let Ok(share) = Reflect::get(&navigator, &JsValue::from_str("share"))
            .map_err(dom_err)?
            .dyn_into::<Function>()
        else {
            return Ok(Shared::Unsupported);
        };

        let data = Object::new();
        Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(title)).map_err(dom_err)?;
        Reflect::set(&data, &JsValue::from_str("files"), &Array::of1(&png_file(snapshot)?.into())).map_err(dom_err)?;

        if let Ok(can_share) = Reflect::get(&navigator, &JsValue::from_str("canShare"))
            .map_err(dom_err)?
            .dyn_into::<Function>()
        {
            if !can_share.call1(&navigator, &data).map_err(dom_err)?.is_truthy() {
                return Ok(Shared::Unsupported);
            }
        }

        let promise: Promise = share
            .call1(&navigator, &data)
            .map_err(|e| ExportError::Share(js_message(&e)))?
            .unchecked_into();
        match JsFuture::from(promise).await {
            Ok(_) => Ok(Shared::Native),
            Err(e) if js_name(&e).as_deref() == Some("AbortError") => Ok(Shared::Cancelled),
            Err(e) => Err(ExportError::Share(js_message(&e))),
        }
    }
}
