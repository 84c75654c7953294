//! Error types for start-up and platform glue.

use thiserror::Error;

/// Failures that stop the game from starting.
#[derive(Error, Debug)]
pub enum GameError {
    /// Browser globals or DOM lookups
    #[error("DOM error: {0}")]
    Dom(String),

    /// Window creation on native
    #[error("Window error: {0}")]
    Window(String),

    /// Surface creation
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// Adapter or device acquisition
    #[error("GPU error: {0}")]
    Gpu(String),
}

/// Result type alias using the game's Error type.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(target_arch = "wasm32")]
impl From<GameError> for wasm_bindgen::JsValue {
    fn from(err: GameError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GameError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
