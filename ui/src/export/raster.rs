//! Chart surface capture and PNG export.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, info};

use super::delivery::{Artifact, ArtifactSink, Delivery};
use crate::core::{DashboardError, ExportSettings, Result};

pub const PNG_MIME: &str = "image/png";
pub const THREATS_PNG: &str = "threats.png";
pub const ACCURACY_PNG: &str = "accuracy.png";

/// What a mounted chart last put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Standalone SVG document with fixed `width`/`height` attributes.
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

/// Opaque reference to a chart's rendered surface.
///
/// The chart binds it while mounted and unbinds it on unmount; exporters only
/// ever take snapshots. Clones share the same slot.
#[derive(Clone, Default)]
pub struct SurfaceHandle {
    slot: Rc<RefCell<Option<Surface>>>,
}

impl SurfaceHandle {
    pub fn bind(&self, surface: Surface) {
        *self.slot.borrow_mut() = Some(surface);
    }

    pub fn unbind(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_bound(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Copy of the current surface, detached from later re-renders.
    pub fn snapshot(&self) -> Option<Surface> {
        self.slot.borrow().clone()
    }
}

impl PartialEq for SurfaceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered(Delivery),
    /// The surface was not mounted; nothing was captured.
    Skipped,
}

/// Turns a surface into PNG bytes.
#[allow(async_fn_in_trait)]
pub trait Rasterizer {
    async fn rasterize(&self, surface: Surface) -> std::result::Result<Vec<u8>, String>;
}

/// Capture whatever `handle` shows when this future is first polled and
/// deliver it as `filename`.
///
/// An unbound handle resolves to [`ExportOutcome::Skipped`].
pub async fn export_image<R, S>(
    handle: &SurfaceHandle,
    filename: &str,
    rasterizer: &R,
    sink: &S,
) -> Result<ExportOutcome>
where
    R: Rasterizer,
    S: ArtifactSink + ?Sized,
{
    let snapshot = handle.snapshot();
    export_snapshot(snapshot, filename, rasterizer, sink).await
}

/// Same as [`export_image`] for a snapshot already taken by the caller.
pub async fn export_snapshot<R, S>(
    snapshot: Option<Surface>,
    filename: &str,
    rasterizer: &R,
    sink: &S,
) -> Result<ExportOutcome>
where
    R: Rasterizer,
    S: ArtifactSink + ?Sized,
{
    let Some(surface) = snapshot else {
        debug!(filename, "surface not mounted; skipping export");
        return Ok(ExportOutcome::Skipped);
    };

    let bytes = match rasterizer.rasterize(surface).await {
        Ok(bytes) => bytes,
        Err(cause) => return Err(capture_failed(filename, cause)),
    };

    match sink.deliver(Artifact::new(filename, PNG_MIME, bytes)) {
        Ok(delivery) => {
            info!(filename, ?delivery, "chart exported");
            Ok(ExportOutcome::Delivered(delivery))
        }
        Err(cause) => Err(capture_failed(filename, cause)),
    }
}

fn capture_failed(filename: &str, cause: String) -> DashboardError {
    error!(filename, %cause, "Export failed");
    DashboardError::CaptureFailed(cause)
}

/// resvg on desktop, an offscreen canvas in the browser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformRasterizer {
    scale: f32,
}

impl Default for PlatformRasterizer {
    fn default() -> Self {
        Self::new(&ExportSettings::default())
    }
}

impl PlatformRasterizer {
    pub fn new(settings: &ExportSettings) -> Self {
        Self {
            scale: settings.raster_scale,
        }
    }
}

impl Rasterizer for PlatformRasterizer {
    async fn rasterize(&self, surface: Surface) -> std::result::Result<Vec<u8>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            rasterize_in_browser(&surface, self.scale).await
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let scale = self.scale;
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => runtime
                    .spawn_blocking(move || render_png(&surface, scale))
                    .await
                    .map_err(|err| err.to_string())?,
                Err(_) => render_png(&surface, scale),
            }
        }
    }
}

/// Output pixel size for a surface at `scale`.
fn scaled_size(surface: &Surface, scale: f32) -> (u32, u32) {
    let width = (surface.width as f32 * scale).round().max(1.0) as u32;
    let height = (surface.height as f32 * scale).round().max(1.0) as u32;
    (width, height)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn render_png(surface: &Surface, scale: f32) -> std::result::Result<Vec<u8>, String> {
    use std::sync::{Arc, OnceLock};

    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    let fontdb = FONTS.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Arc::new(db)
    });

    let options = usvg::Options {
        fontdb: Arc::clone(fontdb),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&surface.svg, &options)
        .map_err(|err| format!("Invalid SVG surface: {err}"))?;

    let (width, height) = scaled_size(surface, scale);
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or("Unable to allocate image buffer")?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|err| err.to_string())
}

#[cfg(target_arch = "wasm32")]
async fn rasterize_in_browser(surface: &Surface, scale: f32) -> std::result::Result<Vec<u8>, String> {
    use base64::Engine;
    use wasm_bindgen::JsValue;
    use web_sys::{Blob, BlobPropertyBag, Url};

    let opts = BlobPropertyBag::new();
    opts.set_type("image/svg+xml");
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&surface.svg));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| "Unable to build SVG blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Unable to create SVG URL".to_string())?;

    let drawn = draw_to_png(&url, surface, scale).await;
    Url::revoke_object_url(&url).ok();
    let data_url = drawn?;

    base64::engine::general_purpose::STANDARD
        .decode(data_url.split(',').nth(1).ok_or("Malformed data URL")?)
        .map_err(|_| "PNG decode failed".to_string())
}

#[cfg(target_arch = "wasm32")]
async fn draw_to_png(url: &str, surface: &Surface, scale: f32) -> std::result::Result<String, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;

    let (width, height) = scaled_size(surface, scale);
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| "Unable to create canvas")?
        .dyn_into()
        .map_err(|_| "Canvas cast failed")?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| "Canvas context unavailable")?
        .ok_or("Canvas context missing")?
        .dyn_into()
        .map_err(|_| "Context cast failed")?;
    context.set_fill_style_str("#ffffff");
    context.fill_rect(0.0, 0.0, width as f64, height as f64);

    let image = HtmlImageElement::new().map_err(|_| "Unable to create image")?;
    image.set_src(url);
    JsFuture::from(image.decode())
        .await
        .map_err(|_| "Image decode failed")?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(|_| "Unable to draw image")?;

    canvas
        .to_data_url_with_type(PNG_MIME)
        .map_err(|_| "Unable to serialise canvas".to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::executor::block_on;

    use super::*;

    fn surface(svg: &str) -> Surface {
        Surface {
            svg: svg.to_string(),
            width: 40,
            height: 20,
        }
    }

    /// Echoes the SVG text back as "PNG" bytes and counts calls.
    #[derive(Default)]
    struct EchoRasterizer {
        calls: Cell<usize>,
    }

    impl Rasterizer for EchoRasterizer {
        async fn rasterize(&self, surface: Surface) -> std::result::Result<Vec<u8>, String> {
            self.calls.set(self.calls.get() + 1);
            Ok(surface.svg.into_bytes())
        }
    }

    struct BrokenRasterizer;

    impl Rasterizer for BrokenRasterizer {
        async fn rasterize(&self, _: Surface) -> std::result::Result<Vec<u8>, String> {
            Err("canvas tainted".into())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        artifacts: RefCell<Vec<Artifact>>,
        refuse: bool,
    }

    impl ArtifactSink for RecordingSink {
        fn deliver(&self, artifact: Artifact) -> std::result::Result<Delivery, String> {
            if self.refuse {
                return Err("quota exceeded".into());
            }
            self.artifacts.borrow_mut().push(artifact);
            Ok(Delivery::Started)
        }
    }

    #[test]
    fn unbound_handle_is_a_quiet_no_op() {
        let rasterizer = EchoRasterizer::default();
        let sink = RecordingSink::default();
        let outcome = block_on(export_image(
            &SurfaceHandle::default(),
            "x.png",
            &rasterizer,
            &sink,
        ));

        assert_eq!(outcome, Ok(ExportOutcome::Skipped));
        assert_eq!(rasterizer.calls.get(), 0);
        assert!(sink.artifacts.borrow().is_empty());
    }

    #[test]
    fn bound_handle_is_delivered_as_png() {
        let handle = SurfaceHandle::default();
        handle.bind(surface("<svg/>"));
        let sink = RecordingSink::default();

        let outcome = block_on(export_image(
            &handle,
            THREATS_PNG,
            &EchoRasterizer::default(),
            &sink,
        ));

        assert_eq!(outcome, Ok(ExportOutcome::Delivered(Delivery::Started)));
        let artifacts = sink.artifacts.borrow();
        assert_eq!(artifacts[0].filename, THREATS_PNG);
        assert_eq!(artifacts[0].mime, PNG_MIME);
        assert_eq!(artifacts[0].bytes, b"<svg/>");
    }

    #[test]
    fn rasterizer_failure_is_capture_failed() {
        let handle = SurfaceHandle::default();
        handle.bind(surface("<svg/>"));
        let sink = RecordingSink::default();

        let outcome = block_on(export_image(&handle, ACCURACY_PNG, &BrokenRasterizer, &sink));

        assert_eq!(
            outcome,
            Err(DashboardError::CaptureFailed("canvas tainted".into()))
        );
        assert!(sink.artifacts.borrow().is_empty());
    }

    #[test]
    fn sink_failure_is_capture_failed() {
        let handle = SurfaceHandle::default();
        handle.bind(surface("<svg/>"));
        let sink = RecordingSink {
            refuse: true,
            ..RecordingSink::default()
        };

        let outcome = block_on(export_image(
            &handle,
            ACCURACY_PNG,
            &EchoRasterizer::default(),
            &sink,
        ));
        assert_eq!(
            outcome,
            Err(DashboardError::CaptureFailed("quota exceeded".into()))
        );
    }

    #[test]
    fn handle_clones_share_one_slot() {
        let handle = SurfaceHandle::default();
        let clone = handle.clone();
        clone.bind(surface("<svg/>"));
        assert!(handle.is_bound());
        assert_eq!(handle, clone);
        assert_ne!(handle, SurfaceHandle::default());

        let snapshot = handle.snapshot();
        handle.unbind();
        assert!(!clone.is_bound());
        assert_eq!(snapshot.map(|s| s.width), Some(40));
    }

    #[test]
    fn scaled_size_never_collapses_to_zero() {
        assert_eq!(scaled_size(&surface(""), 2.0), (80, 40));
        assert_eq!(scaled_size(&surface(""), 0.001), (1, 1));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn desktop_renderer_emits_scaled_png() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#8884d8"/></svg>"##;
        let bytes = render_png(&surface(svg), 2.0).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR width/height, big-endian.
        assert_eq!(u32::from_be_bytes(bytes[16..20].try_into().unwrap()), 80);
        assert_eq!(u32::from_be_bytes(bytes[20..24].try_into().unwrap()), 40);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn desktop_renderer_rejects_garbage() {
        let err = render_png(&surface("not svg at all"), 1.0).unwrap_err();
        assert!(err.starts_with("Invalid SVG surface"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn platform_rasterizer_works_without_a_runtime() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"/>"#;
        let bytes = block_on(PlatformRasterizer::default().rasterize(surface(svg))).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
