use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while mounting the background on a page.
///
/// Running frames never fail: a degenerate viewport just yields an empty
/// field, and a frame request the host refuses ends the loop quietly.
#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("no global `window` exists")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("container element #{0} not found")]
    MissingContainer(String),
    #[error("canvas did not provide a 2d context")]
    NoContext2d,
    #[error("dom call failed: {0}")]
    Dom(String),
    #[error("invalid background config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for BackgroundError {
    fn from(value: JsValue) -> Self {
        BackgroundError::Dom(format!("{:?}", value))
    }
}

impl From<BackgroundError> for JsValue {
    fn from(err: BackgroundError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
