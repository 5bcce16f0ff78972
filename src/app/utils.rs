// src/app/utils.rs
use tracing::{debug, warn};

/// Open a movie's detail page in the default browser. Returns false when
/// there is nothing to open or the launch failed (logged, never fatal).
pub fn open_detail_page(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        debug!("no detail URL for this movie");
        return false;
    }
    match open::that(url) {
        Ok(()) => {
            debug!("opened {url}");
            true
        }
        Err(e) => {
            warn!("could not open {url} in a browser: {e}");
            false
        }
    }
}
