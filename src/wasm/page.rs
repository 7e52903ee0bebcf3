//! Wires the promo page: snowfall canvas, offer countdown, preview
//! playback, nav scroll state, and the checkout redirect.
//!
//! Everything lives in a single `Page` value held in a thread-local slot;
//! dropping it revokes every outstanding frame request, timer, and
//! listener and pauses the audio.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Date;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    console, CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, HtmlElement,
    Window,
};

use super::hooks::{EventListener, FrameLoop, Interval, IntervalHandle, Timeout};
use crate::countdown::{pad2, DeadlineClock};
use crate::playback::{PlaybackCommand, PlaybackToggle};
use crate::snow::{seed_from_millis, ParticleField, PARTICLE_COUNT};

const OFFER_DEADLINE: &str = "2025-12-25T23:59:59+09:00";
const CHECKOUT_URL: &str = "https://aces.shopselect.net/items/128935995";
const AUDIO_SRC: &str = "touka-no-akari-preview.mp3";
const COUNTDOWN_PERIOD_MS: i32 = 1000;
const REDIRECT_DELAY_MS: i32 = 1200;
const SCROLL_THRESHOLD: f64 = 50.0;

thread_local! {
    static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

pub fn start(window: &Window, document: &Document) -> Result<(), JsValue> {
    let page = Page::build(window, document)?;
    PAGE.with(|slot| {
        *slot.borrow_mut() = Some(page);
    });
    Ok(())
}

pub fn teardown() {
    PAGE.with(|slot| {
        slot.borrow_mut().take();
    });
}

pub struct Page {
    _snow: Option<SnowLayer>,
    _countdown: Interval,
    _scroll: Option<EventListener>,
    _play_clicks: Vec<EventListener>,
    _ended: EventListener,
    _error: EventListener,
    _purchase: Option<EventListener>,
    _redirect: Rc<RefCell<Option<Timeout>>>,
    deck: Rc<AudioDeck>,
}

impl Page {
    fn build(window: &Window, document: &Document) -> Result<Self, JsValue> {
        let snow = start_snow(window, document)?;
        let countdown = start_countdown(document)?;
        let scroll = start_scroll(window, document)?;

        let deck = AudioDeck::new(document)?;
        let play_clicks = start_play_buttons(document, &deck)?;
        let ended = EventListener::add(deck.element.as_ref(), "ended", {
            let deck = Rc::clone(&deck);
            move |_| deck.ended()
        })?;
        let error = EventListener::add(deck.element.as_ref(), "error", {
            let deck = Rc::clone(&deck);
            move |event| deck.errored(event)
        })?;

        let redirect = Rc::new(RefCell::new(None));
        let purchase = start_purchase(window, document, &redirect)?;

        Ok(Self {
            _snow: snow,
            _countdown: countdown,
            _scroll: scroll,
            _play_clicks: play_clicks,
            _ended: ended,
            _error: error,
            _purchase: purchase,
            _redirect: redirect,
            deck,
        })
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        // Guards detach their callbacks; the audio just needs to stop.
        let _ = self.deck.element.pause();
    }
}

// ---------------------------------------------------------------------------
// Snowfall
// ---------------------------------------------------------------------------

struct SnowLayer {
    _frame: FrameLoop,
    _resize: EventListener,
}

/// Canvas or 2d context missing is not a fault; the page simply runs
/// without the ambient layer.
fn start_snow(window: &Window, document: &Document) -> Result<Option<SnowLayer>, JsValue> {
    let canvas = match document.get_element_by_id("snow-canvas") {
        Some(el) => match el.dyn_into::<HtmlCanvasElement>() {
            Ok(canvas) => canvas,
            Err(_) => return Ok(None),
        },
        None => return Ok(None),
    };
    let ctx = match canvas.get_context("2d")? {
        Some(obj) => match obj.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return Ok(None),
        },
        None => return Ok(None),
    };

    let (width, height) = viewport_size(window);
    let field = Rc::new(RefCell::new(ParticleField::new(
        width,
        height,
        PARTICLE_COUNT,
        seed_from_millis(Date::now()),
    )));

    // Resizing rebuilds the whole population; the visual reset on resize
    // is intentional.
    let fit = {
        let window = window.clone();
        let canvas = canvas.clone();
        let field = field.clone();
        move || {
            let (w, h) = viewport_size(&window);
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            field.borrow_mut().initialize(w, h);
        }
    };
    fit(); // first sizing happens eagerly at startup

    let resize = EventListener::add(window.as_ref(), "resize", {
        let fit = fit.clone();
        move |_| fit()
    })?;

    let frame = FrameLoop::start({
        let field = field.clone();
        move || {
            let mut field = field.borrow_mut();
            field.advance();
            render(&ctx, &field);
        }
    })?;

    Ok(Some(SnowLayer {
        _frame: frame,
        _resize: resize,
    }))
}

fn render(ctx: &CanvasRenderingContext2d, field: &ParticleField) {
    ctx.clear_rect(0.0, 0.0, field.width() as f64, field.height() as f64);
    for p in field.particles() {
        let (x, y, r) = (p.x as f64, p.y as f64, p.size() as f64);
        ctx.begin_path();
        if let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", p.opacity()));
            let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
            ctx.set_fill_style_canvas_gradient(&gradient);
        }
        let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }
}

fn viewport_size(window: &Window) -> (f32, f32) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (width as f32, height as f32)
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

const DIGIT_IDS: [&str; 4] = ["count-days", "count-hours", "count-mins", "count-secs"];

fn start_countdown(document: &Document) -> Result<Interval, JsValue> {
    let mut clock = DeadlineClock::new(Date::parse(OFFER_DEADLINE));
    let handle = IntervalHandle::new();
    let tick_handle = handle.clone();
    let document = document.clone();
    Interval::start(handle, COUNTDOWN_PERIOD_MS, move || {
        if clock.tick(Date::now()) {
            let r = clock.remaining();
            for (id, value) in DIGIT_IDS
                .into_iter()
                .zip([r.days, r.hours, r.minutes, r.seconds])
            {
                set_text(&document, id, &pad2(value));
            }
        } else {
            for id in DIGIT_IDS {
                set_text(&document, id, "00");
            }
            set_text(&document, "offer-status", "Offer ended");
            // The offer is over for good; stop ticking.
            tick_handle.clear();
        }
    })
}

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

// ---------------------------------------------------------------------------
// Preview playback
// ---------------------------------------------------------------------------

type PromiseCallbacks = (Closure<dyn FnMut(JsValue)>, Closure<dyn FnMut(JsValue)>);

/// Exclusive owner of the one preview audio element.
struct AudioDeck {
    element: HtmlAudioElement,
    state: RefCell<PlaybackToggle>,
    // Completion callbacks of the outstanding play() promise. At most one
    // request is in flight, so the next request may safely replace them.
    callbacks: RefCell<Option<PromiseCallbacks>>,
    document: Document,
}

impl AudioDeck {
    fn new(document: &Document) -> Result<Rc<Self>, JsValue> {
        let element = HtmlAudioElement::new_with_src(AUDIO_SRC)?;
        element.set_preload("auto");
        Ok(Rc::new(Self {
            element,
            state: RefCell::new(PlaybackToggle::new()),
            callbacks: RefCell::new(None),
            document: document.clone(),
        }))
    }

    fn toggle(self: &Rc<Self>) {
        let command = self.state.borrow_mut().toggle();
        self.apply(command);
        self.refresh_buttons();
    }

    fn apply(self: &Rc<Self>, command: Option<PlaybackCommand>) {
        match command {
            Some(PlaybackCommand::Pause) => {
                let _ = self.element.pause();
            }
            Some(PlaybackCommand::RequestPlay) => self.request_play(),
            None => {}
        }
    }

    fn request_play(self: &Rc<Self>) {
        match self.element.play() {
            Ok(promise) => {
                let (resolve, reject) = self.completion_callbacks();
                let _ = promise.then2(&resolve, &reject);
                self.callbacks.replace(Some((resolve, reject)));
            }
            Err(err) => {
                console::error_2(&JsValue::from_str("preview playback unavailable"), &err);
                self.play_resolved(false);
            }
        }
    }

    /// The callbacks end up stored in the deck's own `callbacks` slot, so
    /// they capture the deck weakly; a strong capture would cycle and keep
    /// the deck and its audio element alive past teardown.
    fn completion_callbacks(self: &Rc<Self>) -> PromiseCallbacks {
        let resolve = Closure::wrap(Box::new({
            let deck = Rc::downgrade(self);
            move |_: JsValue| {
                if let Some(deck) = deck.upgrade() {
                    deck.play_resolved(true);
                }
            }
        }) as Box<dyn FnMut(JsValue)>);
        let reject = Closure::wrap(Box::new({
            let deck = Rc::downgrade(self);
            move |err: JsValue| {
                console::warn_2(&JsValue::from_str("preview playback rejected"), &err);
                if let Some(deck) = deck.upgrade() {
                    deck.play_resolved(false);
                }
            }
        }) as Box<dyn FnMut(JsValue)>);
        (resolve, reject)
    }

    fn play_resolved(self: &Rc<Self>, ok: bool) {
        let follow_up = self.state.borrow_mut().play_resolved(ok);
        self.apply(follow_up);
        self.refresh_buttons();
    }

    fn ended(self: &Rc<Self>) {
        self.state.borrow_mut().stream_ended();
        self.refresh_buttons();
    }

    fn errored(self: &Rc<Self>, event: web_sys::Event) {
        console::error_2(&JsValue::from_str("preview audio error"), &JsValue::from(event));
        self.state.borrow_mut().stream_error();
        self.refresh_buttons();
    }

    /// Every toggle button mirrors the actual playing state.
    fn refresh_buttons(&self) {
        let playing = self.state.borrow().is_playing();
        let label = if playing { "Pause" } else { "Play" };
        let buttons = self.document.get_elements_by_class_name("play-toggle");
        for i in 0..buttons.length() {
            if let Some(el) = buttons.item(i) {
                el.set_text_content(Some(label));
                let classes = el.class_list();
                let _ = if playing {
                    classes.add_1("playing")
                } else {
                    classes.remove_1("playing")
                };
            }
        }
    }
}

fn start_play_buttons(
    document: &Document,
    deck: &Rc<AudioDeck>,
) -> Result<Vec<EventListener>, JsValue> {
    let buttons = document.get_elements_by_class_name("play-toggle");
    let mut listeners = Vec::with_capacity(buttons.length() as usize);
    for i in 0..buttons.length() {
        if let Some(el) = buttons.item(i) {
            let deck = Rc::clone(deck);
            listeners.push(EventListener::add(el.as_ref(), "click", move |event| {
                event.stop_propagation();
                deck.toggle();
            })?);
        }
    }
    Ok(listeners)
}


// ---------------------------------------------------------------------------
// Nav + checkout
// ---------------------------------------------------------------------------

fn start_scroll(window: &Window, document: &Document) -> Result<Option<EventListener>, JsValue> {
    let nav = match document.get_element_by_id("site-nav") {
        Some(el) => el,
        None => return Ok(None),
    };
    let win = window.clone();
    let listener = EventListener::add(window.as_ref(), "scroll", move |_| {
        let scrolled = win.scroll_y().unwrap_or(0.0) > SCROLL_THRESHOLD;
        let classes = nav.class_list();
        let _ = if scrolled {
            classes.add_1("scrolled")
        } else {
            classes.remove_1("scrolled")
        };
    })?;
    Ok(Some(listener))
}

fn start_purchase(
    window: &Window,
    document: &Document,
    redirect: &Rc<RefCell<Option<Timeout>>>,
) -> Result<Option<EventListener>, JsValue> {
    let button = match document.get_element_by_id("purchase-button") {
        Some(el) => el,
        None => return Ok(None),
    };
    let win = window.clone();
    let document = document.clone();
    let redirect = redirect.clone();
    let listener = EventListener::add(button.as_ref(), "click", move |event| {
        event.prevent_default();
        if let Some(overlay) = document
            .get_element_by_id("checkout-overlay")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = overlay.style().set_property("display", "flex");
        }
        let win = win.clone();
        match Timeout::once(REDIRECT_DELAY_MS, move || {
            let _ = win.location().set_href(CHECKOUT_URL);
        }) {
            Ok(timeout) => {
                redirect.borrow_mut().replace(timeout);
            }
            Err(err) => console::error_2(&JsValue::from_str("checkout redirect failed"), &err),
        }
    })?;
    Ok(Some(listener))
}
