//! Saving downloaded PDFs.
//!
//! - Web: opened from an object URL in a new tab, or through a synthetic
//!   anchor click when the popup is blocked.
//! - Desktop: written to the user's download directory.

use anyhow::anyhow;
use keikichi_shared::{ApiError, ToastKind};

use crate::api_client::Download;
use crate::stores::toasts;

/// File name to save under: the server's name when it sent one.
pub fn file_name_for(download: &Download, fallback: &str) -> String {
    download
        .file_name
        .clone()
        .filter(|n| !n.contains(['/', '\\']))
        .unwrap_or_else(|| fallback.to_string())
}

/// Save a fetched file, reporting either failure as a toast.
pub fn deliver(fetched: Result<Download, ApiError>, fallback: &str) {
    match fetched {
        Ok(download) => {
            if let Err(e) = save(&download, fallback) {
                crate::log_error!("Could not save {}: {:#}", fallback, e);
                toasts::show(ToastKind::Error, "Could not open the file");
            }
        }
        Err(e) => toasts::error(&e),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save(download: &Download, fallback: &str) -> anyhow::Result<()> {
    use wasm_bindgen::JsCast;
    use web_sys::{js_sys, Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let bytes = js_sys::Uint8Array::from(download.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(download.content_type.as_deref().unwrap_or("application/pdf"));
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| anyhow!("failed to build blob: {e:?}"))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| anyhow!("failed to create object url: {e:?}"))?;

    let opened = window
        .open_with_url_and_target(&url, "_blank")
        .ok()
        .flatten()
        .is_some();
    if !opened {
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| anyhow!("failed to create anchor: {e:?}"))?
            .dyn_into()
            .map_err(|_| anyhow!("anchor has the wrong type"))?;
        anchor.set_href(&url);
        anchor.set_download(&file_name_for(download, fallback));
        anchor.click();
    }

    // The new tab keeps its own reference; revoke ours once it had time to load.
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_secs(60)).await;
        let _ = Url::revoke_object_url(&url);
    });
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(download: &Download, fallback: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let dir = dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("no download directory"))?;
    let path = dir.join(file_name_for(download, fallback));
    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    crate::log_info!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download(name: Option<&str>) -> Download {
        Download {
            bytes: b"%PDF-1.4".to_vec(),
            file_name: name.map(str::to_string),
            content_type: Some("application/pdf".into()),
        }
    }

    #[test]
    fn prefers_server_file_name() {
        assert_eq!(file_name_for(&download(Some("ticket_R1.pdf")), "ticket.pdf"), "ticket_R1.pdf");
        assert_eq!(file_name_for(&download(None), "ticket.pdf"), "ticket.pdf");
    }

    #[test]
    fn refuses_path_like_names() {
        assert_eq!(file_name_for(&download(Some("../../etc/x")), "ticket.pdf"), "ticket.pdf");
    }
}
