use crate::utils::*;
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use tombola_core::{ParticleConfig, ParticleField};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

const SNOW_COLOR: &str = "rgba(255, 255, 255, 0.8)";

struct SnowScene {
    field: ParticleField,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    frame: Option<AnimationFrame>,
}

impl SnowScene {
    fn draw(&mut self) -> anyhow::Result<()> {
        let (width, height) = self.field.size();
        let ctx = &self.context;

        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_fill_style_str(SNOW_COLOR);
        ctx.begin_path();
        for particle in self.field.particles() {
            ctx.move_to(particle.x, particle.y);
            ctx.arc(particle.x, particle.y, particle.radius, 0.0, TAU)
                .js_context("arc")?;
        }
        ctx.fill();

        self.field.step();
        Ok(())
    }

    fn fit_to_viewport(&mut self) {
        let size = viewport_size();
        self.canvas.set_width(size.0 as u32);
        self.canvas.set_height(size.1 as u32);
        self.field.resize(size);
        log::trace!("snow resized to {:?}", size);
    }
}

fn schedule(scene: &Rc<RefCell<SnowScene>>) {
    let next = Rc::clone(scene);
    let frame = request_animation_frame(move |_timestamp| {
        if let Err(err) = next.borrow_mut().draw() {
            log::error!("snow stopped: {:#}", err);
            return;
        }
        schedule(&next);
    });
    scene.borrow_mut().frame = Some(frame);
}

/// A running animation. The pending frame and the resize listener both hold
/// the scene, so `stop` must run to release it.
struct SnowLoop {
    scene: Rc<RefCell<SnowScene>>,
    resize: Option<EventListener>,
}

impl SnowLoop {
    fn start(canvas: HtmlCanvasElement) -> anyhow::Result<Self> {
        let context = canvas_context(&canvas)?;
        let size = viewport_size();
        let field = ParticleField::new(ParticleConfig::default(), size, js_random_seed());

        let scene = Rc::new(RefCell::new(SnowScene {
            field,
            canvas,
            context,
            frame: None,
        }));
        scene.borrow_mut().fit_to_viewport();
        schedule(&scene);

        let resize = {
            let scene = Rc::clone(&scene);
            EventListener::new(&gloo::utils::window(), "resize", move |_| {
                scene.borrow_mut().fit_to_viewport();
            })
        };

        Ok(Self {
            scene,
            resize: Some(resize),
        })
    }

    fn stop(&mut self) {
        drop(self.resize.take());
        let frame = self.scene.borrow_mut().frame.take();
        drop(frame);
    }
}

#[derive(Default)]
pub(crate) struct Snowfall {
    canvas: NodeRef,
    running: Option<SnowLoop>,
}

impl Component for Snowfall {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Default::default()
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <canvas class="snowfall" ref={self.canvas.clone()}/>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }

        let Some(canvas) = self.canvas.cast::<HtmlCanvasElement>() else {
            log::warn!("snow canvas missing");
            return;
        };
        match SnowLoop::start(canvas) {
            Ok(running) => {
                log::debug!("snow started");
                self.running = Some(running);
            }
            Err(err) => log::error!("snow disabled: {:#}", err),
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(mut running) = self.running.take() {
            running.stop();
            log::debug!("snow stopped");
        }
    }
}
