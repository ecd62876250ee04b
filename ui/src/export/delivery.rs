//! Platform "save/download" primitive for named byte artifacts.

use std::path::PathBuf;

use crate::core::ExportSettings;

/// A named byte payload ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(filename: impl Into<String>, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime,
            bytes,
        }
    }
}

/// Where an artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Written to disk (desktop).
    Saved(PathBuf),
    /// Handed to the browser's download manager.
    Started,
}

impl Delivery {
    /// Status line for the export panel, e.g. `CSV saved to /…/synthetic_data.csv`.
    pub fn describe(&self, label: &str) -> String {
        match self {
            Delivery::Saved(path) => format!("{label} saved to {}", path.display()),
            Delivery::Started => format!("{label} download started"),
        }
    }
}

/// Anything that can take an artifact off our hands.
pub trait ArtifactSink {
    fn deliver(&self, artifact: Artifact) -> Result<Delivery, String>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn deliver(&self, artifact: Artifact) -> Result<Delivery, String> {
        (**self).deliver(artifact)
    }
}

/// Browser download on wasm, export directory on desktop.
#[derive(Debug, Clone, Default)]
pub struct PlatformSink {
    export_dir: Option<PathBuf>,
}

impl PlatformSink {
    pub fn new(settings: &ExportSettings) -> Self {
        Self {
            export_dir: settings.export_dir.clone(),
        }
    }
}

impl ArtifactSink for PlatformSink {
    fn deliver(&self, artifact: Artifact) -> Result<Delivery, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = &self.export_dir;
            download_in_browser(&artifact)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let dir = self
                .export_dir
                .as_ref()
                .ok_or("Unable to determine export directory")?;
            save_to_dir(dir, &artifact)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn download_in_browser(artifact: &Artifact) -> Result<Delivery, String> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let array = js_sys::Uint8Array::from(artifact.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let opts = BlobPropertyBag::new();
    opts.set_type(artifact.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|_| "Failed to create blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Unable to create download".to_string())?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "Unable to create anchor")?
        .dyn_into()
        .map_err(|_| "Anchor cast failed")?;
    anchor.set_href(&url);
    anchor.set_download(&artifact.filename);
    anchor.style().set_property("display", "none").ok();

    document
        .body()
        .ok_or("Missing body")?
        .append_child(&anchor)
        .ok();
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).ok();

    Ok(Delivery::Started)
}

/// Write through a `.part` sibling and rename, so a failed export never
/// leaves a truncated file under the final name.
#[cfg(not(target_arch = "wasm32"))]
fn save_to_dir(dir: &std::path::Path, artifact: &Artifact) -> Result<Delivery, String> {
    use std::fs;
    use std::io::Write;

    fs::create_dir_all(dir).map_err(|err| err.to_string())?;
    let path = dir.join(&artifact.filename);
    let partial = dir.join(format!("{}.part", artifact.filename));

    let written = fs::File::create(&partial).and_then(|mut file| {
        file.write_all(&artifact.bytes)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|_| fs::rename(&partial, &path)) {
        let _ = fs::remove_file(&partial);
        return Err(err.to_string());
    }

    Ok(Delivery::Saved(path))
}
