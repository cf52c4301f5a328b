//! Browser glue (wasm32 only)
//!
//! requestAnimationFrame scheduling, DOM input listeners, the archetype
//! catalog fetch and the hand-off of each frame to the page's renderer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, Response};

use super::clock::{FrameClock, FrameScheduler};
use super::input::InputSnapshot;
use crate::catalog::StaticCatalog;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::FrameSnapshot;

/// Global JS function that receives each frame's snapshot JSON
const RENDER_HOOK: &str = "skyStrikeRender";

pub type BrowserClock = FrameClock<RafScheduler>;

/// Schedules frames with `requestAnimationFrame` and feeds them to its clock
pub struct RafScheduler {
    clock: Weak<RefCell<BrowserClock>>,
}

impl RafScheduler {
    /// A frame clock driven by the browser's refresh
    pub fn clock() -> Rc<RefCell<BrowserClock>> {
        Rc::new_cyclic(|weak| {
            RefCell::new(FrameClock::new(RafScheduler {
                clock: weak.clone(),
            }))
        })
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let window = web_sys::window()?;
        let clock = self.clock.clone();
        let closure = Closure::once(move |timestamp: f64| {
            if let Some(clock) = clock.upgrade() {
                clock.borrow_mut().on_frame(timestamp);
            }
        });

        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => {
                closure.forget();
                Some(handle)
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}

/// What a pause-related DOM event asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseRequest {
    /// Escape key
    Toggle,
    /// Focus lost
    Pause,
}

/// Map a canvas-relative pixel position to world units (+y up)
fn canvas_to_world(canvas: &HtmlCanvasElement, x: f32, y: f32) -> Option<Vec2> {
    let w = canvas.client_width() as f32;
    let h = canvas.client_height() as f32;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        (x / w - 0.5) * ARENA_WIDTH,
        (0.5 - y / h) * ARENA_HEIGHT,
    ))
}

/// Keep `input` in sync with keyboard and mouse state
pub fn attach_input_listeners(
    canvas: &HtmlCanvasElement,
    input: Rc<RefCell<InputSnapshot>>,
    on_pause: impl FnMut(PauseRequest) + 'static,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_pause: Rc<RefCell<dyn FnMut(PauseRequest)>> = Rc::new(RefCell::new(on_pause));

    // Keyboard
    {
        let input = input.clone();
        let on_pause = on_pause.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            match key.as_str() {
                "Escape" => {
                    if !event.repeat() {
                        (&mut *on_pause.borrow_mut())(PauseRequest::Toggle);
                    }
                }
                " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => {
                    // Keep the page from scrolling
                    event.prevent_default();
                    input.borrow_mut().key_down(&key);
                }
                _ => input.borrow_mut().key_down(&key),
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let input = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            input.borrow_mut().key_up(&event.key());
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Mouse
    {
        let input = input.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let pos = canvas_to_world(&canvas_clone, event.offset_x() as f32, event.offset_y() as f32);
            input.borrow_mut().pointer = pos;
        });
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let input = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if event.button() == 0 {
                input.borrow_mut().pointer_down = true;
            }
        });
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let input = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if event.button() == 0 {
                input.borrow_mut().pointer_down = false;
            }
        });
        window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Window blur (click outside): drop held keys and pause
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            input.borrow_mut().release_all();
            (&mut *on_pause.borrow_mut())(PauseRequest::Pause);
            log::info!("Auto-paused (window blur)");
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Call `on_change(hidden)` whenever the tab is hidden or shown again
pub fn on_visibility_change(mut on_change: impl FnMut(bool) + 'static) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let document_clone = document.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        on_change(document_clone.visibility_state() == web_sys::VisibilityState::Hidden);
    });
    document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {} for {}", response.status(), url)));
    }
    let body = JsFuture::from(response.text()?).await?;
    body.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// Fetch and parse the archetype catalog
pub async fn fetch_catalog(url: &str) -> Result<StaticCatalog, String> {
    let text = fetch_text(url).await.map_err(|e| format!("{:?}", e))?;
    StaticCatalog::from_json(&text).map_err(|e| e.to_string())
}

/// Hand a frame to the page's renderer, if it registered one
pub fn present(snapshot: &FrameSnapshot<'_>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let hook = match js_sys::Reflect::get(&window, &JsValue::from_str(RENDER_HOOK)) {
        Ok(hook) => hook,
        Err(_) => return,
    };
    let Some(render) = hook.dyn_ref::<js_sys::Function>() else {
        return;
    };

    match snapshot.to_json() {
        Ok(json) => {
            if let Err(e) = render.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::warn!("Render hook threw: {:?}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize frame: {}", e),
    }
}
