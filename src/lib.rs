#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

// State machines and the simulation are target-independent; only the DOM
// wiring under `wasm` requires a browser.

pub mod countdown;
pub mod playback;
pub mod snow;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod hooks;
    mod page;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        page::start(&window, &document)
    }

    /// Stops every loop, timer, and listener and pauses the audio.
    #[wasm_bindgen]
    pub fn teardown() {
        page::teardown();
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
