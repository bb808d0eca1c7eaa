use anyhow::anyhow;
use tombola_core::Size;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Renders its children under `document.body` so popups sit above the grid.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    create_portal(props.children.clone(), gloo::utils::body().into())
}

/// Seed for a fresh game, taken from `Math.random`.
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes(std::array::from_fn(|_| (256. * random()) as u8))
}

/// Turns the `JsValue` errors from web-sys calls into `anyhow` errors.
pub(crate) trait JsResultExt<T> {
    fn js_context(self, what: &'static str) -> anyhow::Result<T>;
}

impl<T> JsResultExt<T> for Result<T, JsValue> {
    fn js_context(self, what: &'static str) -> anyhow::Result<T> {
        self.map_err(|err| anyhow!("{}: {:?}", what, err))
    }
}

pub(crate) fn canvas_context(canvas: &HtmlCanvasElement) -> anyhow::Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .js_context("getContext(\"2d\")")?
        .ok_or_else(|| anyhow!("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| anyhow!("2d context has an unexpected type"))
}

pub(crate) fn viewport_size() -> Size {
    let window = gloo::utils::window();
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}
