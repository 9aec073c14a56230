//! Turning the rendered preview into a PNG.
//!
//! The preview subtree is cloned, flattened for the rasterizer, staged
//! off-screen, captured, and detached again. The staged clone is removed by
//! [`Staged`]'s `Drop`, so it never outlives a capture, whether the capture
//! succeeded or not.

pub mod color;
pub mod dom;

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use base64::Engine;

use crate::error::ExportError;
use crate::toast::Toast;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Clone, Debug, PartialEq)]
pub struct RasterOptions {
    pub pixel_ratio: f64,
    /// CSS hex colour painted behind the capture.
    pub background: String,
}

/// A captured PNG, held as a data URL.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub data_url: String,
}

impl Snapshot {
    pub fn png_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let payload = self
            .data_url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| ExportError::Encode("not a base64 PNG data URL".into()))?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ExportError::Encode(e.to_string()))
    }
}

/// The document-side capabilities a capture needs.
#[async_trait(?Send)]
pub trait ExportHost {
    type Node;

    fn find(&self, id: &str) -> Option<Self::Node>;

    /// Deep copy, not yet part of the document.
    fn duplicate(&self, source: &Self::Node) -> Result<Self::Node, ExportError>;

    /// Forces opacity, strips filters and flattens translucent colours on
    /// `clone`, reading computed styles from the live `source`.
    fn normalize(&self, source: &Self::Node, clone: &Self::Node, options: &RasterOptions) -> Result<(), ExportError>;

    /// Puts `clone` into the document where layout resolves but the user can't see it.
    fn attach_offscreen(&self, clone: &Self::Node) -> Result<(), ExportError>;

    /// Must tolerate nodes that were never attached.
    fn detach(&self, clone: &Self::Node);

    async fn rasterize(&self, clone: &Self::Node, options: &RasterOptions) -> Result<Snapshot, ExportError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shared {
    Native,
    Cancelled,
    /// No native share sheet on this platform.
    Unsupported,
}

#[async_trait(?Send)]
pub trait Deliver {
    fn download(&self, snapshot: &Snapshot, filename: &str) -> Result<(), ExportError>;

    async fn share(&self, snapshot: &Snapshot, title: &str) -> Result<Shared, ExportError>;
}

struct Staged<'a, H: ExportHost> {
    host: &'a H,
    node: H::Node,
}

impl<'a, H: ExportHost> Staged<'a, H> {
    fn attach(host: &'a H, node: H::Node) -> Result<Self, ExportError> {
        let staged = Staged { host, node };
        host.attach_offscreen(&staged.node)?;
        Ok(staged)
    }
}

impl<H: ExportHost> Drop for Staged<'_, H> {
    fn drop(&mut self) {
        self.host.detach(&self.node);
    }
}

pub async fn capture<H: ExportHost>(
    host: &H,
    target_id: &str,
    options: &RasterOptions,
) -> Result<Snapshot, ExportError> {
    let source = host
        .find(target_id)
        .ok_or_else(|| ExportError::TargetNotFound(target_id.to_string()))?;
    let clone = host.duplicate(&source)?;
    host.normalize(&source, &clone, options)?;
    let staged = Staged::attach(host, clone)?;
    let snapshot = host.rasterize(&staged.node, options).await;
    drop(staged);
    snapshot
}

/// Lets one export run at a time; extra clicks while busy are refused.
#[derive(Clone, Debug, Default)]
pub struct ExportLock(Rc<Cell<bool>>);

pub struct ExportPermit(Rc<Cell<bool>>);

impl ExportLock {
    pub fn try_acquire(&self) -> Result<ExportPermit, ExportError> {
        if self.0.replace(true) {
            return Err(ExportError::Busy);
        }
        Ok(ExportPermit(self.0.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.0.get()
    }
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl PartialEq for ExportLock {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExportKind {
    Download { filename: String },
    Share { title: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Delivered {
    Downloaded(String),
    Shared(Shared),
}

/// Hands back the snapshot when sharing has to fall back to intent links.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    pub delivered: Delivered,
    pub snapshot: Snapshot,
}

pub async fn export<H: ExportHost + Deliver>(
    host: &H,
    lock: &ExportLock,
    target_id: &str,
    kind: &ExportKind,
    options: &RasterOptions,
) -> Result<Export, ExportError> {
    let _permit = lock.try_acquire()?;
    let snapshot = capture(host, target_id, options).await?;
    let delivered = match kind {
        ExportKind::Download { filename } => {
            host.download(&snapshot, filename)?;
            Delivered::Downloaded(filename.clone())
        }
        ExportKind::Share { title } => Delivered::Shared(host.share(&snapshot, title).await?),
    };
    Ok(Export { delivered, snapshot })
}

/// The single notification an export ends with. A refused re-entrant
/// export stays silent.
pub fn notice(kind: &ExportKind, result: &Result<Export, ExportError>) -> Option<Toast> {
    match (kind, result) {
        (_, Err(ExportError::Busy)) => None,
        (ExportKind::Download { .. }, Err(_)) => Some(Toast::error("Failed to download betslip")),
        (ExportKind::Share { .. }, Err(_)) => Some(Toast::error("Failed to share betslip")),
        (_, Ok(done)) => Some(match done.delivered {
            Delivered::Downloaded(_) => Toast::success("Betslip downloaded successfully!"),
            Delivered::Shared(Shared::Native) => Toast::success("Betslip shared!"),
            Delivered::Shared(Shared::Cancelled) => Toast::info("Sharing cancelled"),
            Delivered::Shared(Shared::Unsupported) => {
                Toast::info("Direct sharing isn't supported here. Use the buttons below or download the image.")
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;
    use crate::toast::ToastLevel;

    const TARGET: &str = "betslip-preview";
    // "PNG" in base64.
    const TINY_PNG: &str = "data:image/png;base64,UE5H";

    #[derive(Default)]
    struct FakeDocument {
        ids: HashSet<&'static str>,
        next_node: Cell<u32>,
        attached: RefCell<Vec<u32>>,
        normalized: RefCell<Vec<u32>>,
        detach_calls: Cell<u32>,
        fail_attach: bool,
        fail_raster: bool,
        share: Option<Shared>,
        downloads: RefCell<Vec<String>>,
    }

    impl FakeDocument {
        fn with_target() -> Self {
            FakeDocument { ids: [TARGET].into_iter().collect(), ..Default::default() }
        }

        fn offscreen_nodes(&self) -> usize {
            self.attached.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl ExportHost for FakeDocument {
        type Node = u32;

        fn find(&self, id: &str) -> Option<u32> {
            self.ids.contains(id).then_some(0)
        }

        fn duplicate(&self, _source: &u32) -> Result<u32, ExportError> {
            let id = self.next_node.get() + 1;
            self.next_node.set(id);
            Ok(id)
        }

        fn normalize(&self, _source: &u32, clone: &u32, _options: &RasterOptions) -> Result<(), ExportError> {
            self.normalized.borrow_mut().push(*clone);
            Ok(())
        }

        fn attach_offscreen(&self, clone: &u32) -> Result<(), ExportError> {
            self.attached.borrow_mut().push(*clone);
            if self.fail_attach {
                return Err(ExportError::Dom("appendChild threw".into()));
            }
            Ok(())
        }

        fn detach(&self, clone: &u32) {
            self.detach_calls.set(self.detach_calls.get() + 1);
            self.attached.borrow_mut().retain(|n| n != clone);
        }

        async fn rasterize(&self, clone: &u32, options: &RasterOptions) -> Result<Snapshot, ExportError> {
            assert!(self.attached.borrow().contains(clone), "rasterized a detached clone");
            assert!(self.normalized.borrow().contains(clone));
            assert_eq!(options.pixel_ratio, 2.0);
            if self.fail_raster {
                return Err(ExportError::Rasterize("canvas tainted".into()));
            }
            Ok(Snapshot { data_url: TINY_PNG.into() })
        }
    }

    #[async_trait(?Send)]
    impl Deliver for FakeDocument {
        fn download(&self, _snapshot: &Snapshot, filename: &str) -> Result<(), ExportError> {
            self.downloads.borrow_mut().push(filename.to_string());
            Ok(())
        }

        async fn share(&self, _snapshot: &Snapshot, _title: &str) -> Result<Shared, ExportError> {
            Ok(self.share.unwrap_or(Shared::Unsupported))
        }
    }

    fn options() -> RasterOptions {
        RasterOptions { pixel_ratio: 2.0, background: "#ffffff".into() }
    }

    fn download() -> ExportKind {
        ExportKind::Download { filename: "bet365-K7Q2ZP0A.png".into() }
    }

    async fn run(doc: &FakeDocument, lock: &ExportLock, kind: &ExportKind) -> Result<Export, ExportError> {
        export(doc, lock, TARGET, kind, &options()).await
    }

    #[tokio::test]
    async fn missing_target_gives_one_failure_and_no_clone() {
        let doc = FakeDocument::default();
        let kind = download();
        let result = run(&doc, &ExportLock::default(), &kind).await;

        assert_eq!(result, Err(ExportError::TargetNotFound(TARGET.into())));
        let toasts: Vec<Toast> = notice(&kind, &result).into_iter().collect();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
        assert_eq!(doc.offscreen_nodes(), 0);
        assert!(doc.downloads.borrow().is_empty());
    }

    #[tokio::test]
    async fn successful_download_cleans_up_and_names_the_file() {
        let doc = FakeDocument::with_target();
        let kind = download();
        let result = run(&doc, &ExportLock::default(), &kind).await;

        let done = result.as_ref().unwrap();
        assert_eq!(done.delivered, Delivered::Downloaded("bet365-K7Q2ZP0A.png".into()));
        assert_eq!(done.snapshot.png_bytes().unwrap(), b"PNG");
        assert_eq!(doc.offscreen_nodes(), 0);
        assert_eq!(doc.detach_calls.get(), 1);
        assert_eq!(*doc.downloads.borrow(), vec!["bet365-K7Q2ZP0A.png".to_string()]);
        assert_eq!(notice(&kind, &result).unwrap().level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn rasterizer_failure_still_detaches_the_clone() {
        let doc = FakeDocument { fail_raster: true, ..FakeDocument::with_target() };
        let kind = download();
        let result = run(&doc, &ExportLock::default(), &kind).await;

        assert!(matches!(result, Err(ExportError::Rasterize(_))));
        assert_eq!(doc.offscreen_nodes(), 0);
        assert_eq!(doc.detach_calls.get(), 1);
        assert!(doc.downloads.borrow().is_empty());
        assert_eq!(notice(&kind, &result).unwrap().level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn failed_attach_does_not_leak() {
        let doc = FakeDocument { fail_attach: true, ..FakeDocument::with_target() };
        let result = run(&doc, &ExportLock::default(), &download()).await;

        assert!(matches!(result, Err(ExportError::Dom(_))));
        assert_eq!(doc.offscreen_nodes(), 0);
    }

    #[tokio::test]
    async fn unsupported_share_falls_back_with_snapshot() {
        let doc = FakeDocument::with_target();
        let kind = ExportKind::Share { title: "My bet365 Betslip".into() };
        let result = run(&doc, &ExportLock::default(), &kind).await;

        let done = result.as_ref().unwrap();
        assert_eq!(done.delivered, Delivered::Shared(Shared::Unsupported));
        assert_eq!(done.snapshot.data_url, TINY_PNG);
        assert_eq!(notice(&kind, &result).unwrap().level, ToastLevel::Info);
    }

    #[tokio::test]
    async fn native_share_succeeds() {
        let doc = FakeDocument { share: Some(Shared::Native), ..FakeDocument::with_target() };
        let kind = ExportKind::Share { title: "My bet365 Betslip".into() };
        let result = run(&doc, &ExportLock::default(), &kind).await;
        assert_eq!(result.unwrap().delivered, Delivered::Shared(Shared::Native));
    }

    #[tokio::test]
    async fn busy_lock_refuses_quietly() {
        let doc = FakeDocument::with_target();
        let lock = ExportLock::default();
        let permit = lock.try_acquire().unwrap();
        let kind = download();

        let result = run(&doc, &lock, &kind).await;
        assert_eq!(result, Err(ExportError::Busy));
        assert_eq!(notice(&kind, &result), None);
        assert_eq!(doc.next_node.get(), 0);

        drop(permit);
        assert!(!lock.is_busy());
        assert!(run(&doc, &lock, &kind).await.is_ok());
        assert!(!lock.is_busy());
    }

    #[tokio::test]
    async fn lock_is_released_after_a_failure() {
        let doc = FakeDocument::default();
        let lock = ExportLock::default();
        assert!(run(&doc, &lock, &download()).await.is_err());
        assert!(!lock.is_busy());
    }

    #[test]
    fn non_png_data_urls_are_rejected() {
        let snap = Snapshot { data_url: "data:image/jpeg;base64,AAAA".into() };
        assert!(matches!(snap.png_bytes(), Err(ExportError::Encode(_))));
    }
}
