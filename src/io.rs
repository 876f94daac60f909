use std::path::Path;

use crate::asset::LoadError;

#[cfg(target_arch = "wasm32")]
use web_sys::{XmlHttpRequest, XmlHttpRequestResponseType};

#[cfg(target_arch = "wasm32")]
fn normalize_web_path(path: &Path) -> Result<String, LoadError> {
    let mut path_str = path.to_string_lossy().replace('\\', "/");

    while let Some(stripped) = path_str.strip_prefix("./") {
        path_str = stripped.to_string();
    }

    if let Some(stripped) = path_str.strip_prefix("web/") {
        path_str = stripped.to_string();
    }

    if path_str.starts_with('/') {
        path_str.remove(0);
    }

    if path_str.is_empty() {
        return Err(LoadError::Io("Cannot load empty web path".into()));
    }

    Ok(path_str)
}

#[cfg(target_arch = "wasm32")]
fn fetch_bytes_sync(url: &str) -> Result<Vec<u8>, LoadError> {
    let io_err = |what: &str, err: wasm_bindgen::JsValue| {
        LoadError::Io(format!("{} for {}: {:?}", what, url, err))
    };

    let request = XmlHttpRequest::new().map_err(|err| io_err("Failed to create XMLHttpRequest", err))?;
    request
        .open_with_async("GET", url, false)
        .map_err(|err| io_err("Failed to open request", err))?;
    request.set_response_type(XmlHttpRequestResponseType::Arraybuffer);
    request
        .send()
        .map_err(|err| io_err("Failed to send request", err))?;

    let status = request
        .status()
        .map_err(|err| io_err("Failed to get status", err))?;

    if !(200..400).contains(&status) {
        return Err(LoadError::Io(format!("HTTP {} when requesting {}", status, url)));
    }

    let buffer = request
        .response()
        .map_err(|err| io_err("Failed to get response body", err))?;

    if buffer.is_null() || buffer.is_undefined() {
        return Err(LoadError::Io(format!("No response body for {}", url)));
    }

    let array = js_sys::Uint8Array::new(&buffer);
    let mut bytes = vec![0u8; array.length() as usize];
    array.copy_to(&mut bytes);
    Ok(bytes)
}

/// Reads a whole asset. Native builds read from disk; the web build issues a
/// synchronous request relative to the page.
pub(crate) fn load_binary(path: &Path) -> Result<Vec<u8>, LoadError> {
    #[cfg(target_arch = "wasm32")]
    {
        let url = normalize_web_path(path)?;
        fetch_bytes_sync(&url)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::fs::read(path).map_err(|err| LoadError::Io(format!("Failed to read {:?}: {}", path, err)))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let err = load_binary(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
