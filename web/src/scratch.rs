use crate::utils::*;
use bitflags::bitflags;
use std::f64::consts::TAU;
use tombola_core as game;
use game::{CoverStyle, Point, Px, ScratchOutcome, Size};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

const GOLD: &str = "#F8B229";
const KNOT: &str = "#FFD700";
const KNOT_EDGE: &str = "#B8860B";
const STRIPE_WIDTH: f64 = 10.0;
const STRIPE_SPACING: f64 = 30.0;
const RIBBON_WIDTH: f64 = 30.0;
const KNOT_RADIUS: f64 = 20.0;
const LABEL: &str = "SCRATCH ME";

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

const fn paper_color(style: CoverStyle) -> &'static str {
    match style {
        CoverStyle::Crimson => "#D42426",
        CoverStyle::Pine => "#165B33",
    }
}

/// Maps a client-space position onto the canvas backing store, which may be
/// scaled relative to its on-screen box.
pub(crate) fn surface_point(
    client: Point,
    origin: Point,
    css_size: Size,
    backing: (Px, Px),
) -> Option<Point> {
    let (css_width, css_height) = css_size;
    if !(css_width > 0.0 && css_height > 0.0) {
        return None;
    }
    let x = (client.0 - origin.0) * f64::from(backing.0) / css_width;
    let y = (client.1 - origin.1) * f64::from(backing.1) / css_height;
    Some((x, y))
}

/// Paints the wrapping paper. Nothing on it depends on the value except the
/// paper color.
fn paint_cover(
    ctx: &CanvasRenderingContext2d,
    (width, height): Size,
    style: CoverStyle,
) -> anyhow::Result<()> {
    ctx.set_global_composite_operation("source-over")
        .js_context("globalCompositeOperation")?;
    ctx.clear_rect(0.0, 0.0, width, height);

    ctx.set_fill_style_str(paper_color(style));
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.save();
    ctx.set_stroke_style_str(GOLD);
    ctx.set_line_width(STRIPE_WIDTH);
    ctx.begin_path();
    let mut offset = -width;
    while offset < width + height {
        ctx.move_to(offset, 0.0);
        ctx.line_to(offset + height, height);
        offset += STRIPE_SPACING;
    }
    ctx.stroke();
    ctx.restore();

    ctx.set_fill_style_str(GOLD);
    ctx.fill_rect(width / 2.0 - RIBBON_WIDTH / 2.0, 0.0, RIBBON_WIDTH, height);
    ctx.fill_rect(0.0, height / 2.0 - RIBBON_WIDTH / 2.0, width, RIBBON_WIDTH);

    ctx.begin_path();
    ctx.arc(width / 2.0, height / 2.0, KNOT_RADIUS, 0.0, TAU)
        .js_context("arc")?;
    ctx.set_fill_style_str(KNOT);
    ctx.fill();
    ctx.set_stroke_style_str(KNOT_EDGE);
    ctx.stroke();

    ctx.save();
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_font("bold 20px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("bottom");
    ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
    ctx.set_shadow_blur(4.0);
    ctx.fill_text(LABEL, width / 2.0, height - 10.0)
        .js_context("fillText")?;
    ctx.restore();

    Ok(())
}

/// Cuts one brush stamp out of the painted cover.
fn paint_stamp(ctx: &CanvasRenderingContext2d, (x, y): Point, radius: f64) -> anyhow::Result<()> {
    ctx.set_global_composite_operation("destination-out")
        .js_context("globalCompositeOperation")?;
    ctx.begin_path();
    ctx.arc(x, y, radius, 0.0, TAU).js_context("arc")?;
    ctx.fill();
    Ok(())
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CardMsg {
    Press(MouseButtons),
    Drag(Point),
    Release,
    Leave,
}

/// What a card has to do after feeding one input to its surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CardEffect {
    Idle,
    Started,
    Stamped,
    Revealed,
}

impl From<ScratchOutcome> for CardEffect {
    fn from(outcome: ScratchOutcome) -> Self {
        match outcome {
            ScratchOutcome::Ignored => Self::Idle,
            ScratchOutcome::Erased => Self::Stamped,
            ScratchOutcome::Revealed => Self::Revealed,
        }
    }
}

/// Card input rules, with `Drag` already in surface coordinates.
///
/// Only a primary press on an unlocked card starts a gesture. Release and
/// leave both end it with the full coverage check, and so does a drag once
/// another tile holds the lock.
pub(crate) fn apply_input(
    surface: &mut game::ScratchSurface,
    msg: CardMsg,
    locked: bool,
) -> CardEffect {
    use CardMsg::*;

    match msg {
        Press(buttons) => {
            if buttons.contains(MouseButtons::LEFT) && !locked && surface.begin_gesture() {
                CardEffect::Started
            } else {
                CardEffect::Idle
            }
        }
        Drag(_) if locked => surface.end_gesture().into(),
        Drag(point) => surface.erase(point).into(),
        Release | Leave => surface.end_gesture().into(),
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct ScratchCardProps {
    pub tile: game::Tile,
    /// Bumped on every new game so the cover gets repainted.
    pub generation: u32,
    pub size: Px,
    pub policy: game::RevealPolicy,
    pub seed: u64,
    #[prop_or_default]
    pub locked: bool,
    pub on_start: Callback<game::TileId>,
    pub on_reveal: Callback<game::TileId>,
}

pub(crate) struct ScratchCardView {
    surface: game::ScratchSurface,
    canvas: NodeRef,
    context: Option<CanvasRenderingContext2d>,
    needs_paint: bool,
}

impl ScratchCardView {
    fn backing_size(&self) -> Size {
        let mask = self.surface.mask();
        (f64::from(mask.width()), f64::from(mask.height()))
    }

    fn local_point(&self, client: Point) -> Option<Point> {
        let canvas = self.canvas.cast::<HtmlCanvasElement>()?;
        let rect = canvas.get_bounding_client_rect();
        surface_point(
            client,
            (rect.left(), rect.top()),
            (rect.width(), rect.height()),
            (canvas.width(), canvas.height()),
        )
    }

    fn attach(&mut self, size: Px) {
        let Some(canvas) = self.canvas.cast::<HtmlCanvasElement>() else {
            log::warn!("scratch canvas missing");
            return;
        };
        canvas.set_width(size);
        canvas.set_height(size);

        match canvas_context(&canvas) {
            Ok(context) => self.context = Some(context),
            Err(err) => log::error!("scratch card disabled: {:#}", err),
        }
    }

    fn paint(&self) -> anyhow::Result<()> {
        let Some(ctx) = &self.context else {
            return Ok(());
        };
        let (width, height) = self.backing_size();

        if self.surface.state().is_revealed() {
            ctx.clear_rect(0.0, 0.0, width, height);
            Ok(())
        } else {
            paint_cover(ctx, (width, height), self.surface.cover_style())
        }
    }

}

impl Component for ScratchCardView {
    type Message = CardMsg;
    type Properties = ScratchCardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut surface = game::ScratchSurface::new(
            props.size,
            props.size,
            props.tile.value,
            props.policy,
            props.seed,
        );
        if props.tile.revealed {
            surface.force_reveal();
        }

        Self {
            surface,
            canvas: NodeRef::default(),
            context: None,
            needs_paint: true,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CardMsg::*;

        let props = ctx.props();
        if self.context.is_none() {
            return false;
        }

        let msg = match msg {
            Drag(_) if !self.surface.state().is_scratching() => return false,
            Drag(client) => match self.local_point(client) {
                Some(point) => Drag(point),
                None => return false,
            },
            other => other,
        };

        match apply_input(&mut self.surface, msg, props.locked) {
            CardEffect::Idle => {
                log::trace!("tile {} ignored {:?}", props.tile.id, msg);
                false
            }
            CardEffect::Started => {
                log::trace!("tile {} scratch start", props.tile.id);
                props.on_start.emit(props.tile.id);
                false
            }
            CardEffect::Stamped => {
                if let (Drag(point), Some(context)) = (msg, &self.context) {
                    let radius = self.surface.policy().brush_radius;
                    if let Err(err) = paint_stamp(context, point, radius) {
                        log::warn!("stamp failed: {:#}", err);
                    }
                }
                false
            }
            CardEffect::Revealed => {
                self.needs_paint = true;
                props.on_reveal.emit(props.tile.id);
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();

        if props.generation != old_props.generation || props.tile.value != old_props.tile.value {
            self.surface.reset(props.tile.value, props.seed);
            self.needs_paint = true;
        }
        if props.tile.revealed && self.surface.force_reveal() {
            self.needs_paint = true;
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.attach(ctx.props().size);
        }
        if self.needs_paint {
            self.needs_paint = false;
            if let Err(err) = self.paint() {
                log::error!("tile {} paint failed: {:#}", ctx.props().tile.id, err);
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use CardMsg::*;

        let props = ctx.props();
        let revealed = self.surface.state().is_revealed();
        let link = ctx.link();

        // touch input arrives through the touch handlers below
        let onpointerdown = link.batch_callback(|e: PointerEvent| {
            (e.pointer_type() != "touch")
                .then(|| Press(MouseButtons::from_bits_truncate(e.buttons())))
        });
        let onpointermove = link.batch_callback(|e: PointerEvent| {
            (e.pointer_type() != "touch")
                .then(|| Drag((f64::from(e.client_x()), f64::from(e.client_y()))))
        });
        let onpointerup =
            link.batch_callback(|e: PointerEvent| (e.pointer_type() != "touch").then_some(Release));
        let onpointerleave =
            link.batch_callback(|e: PointerEvent| (e.pointer_type() != "touch").then_some(Leave));

        let ontouchstart = link.callback(|_: TouchEvent| Press(MouseButtons::LEFT));
        let ontouchmove = link.batch_callback(|e: TouchEvent| {
            e.touches()
                .item(0)
                .map(|touch| Drag((f64::from(touch.client_x()), f64::from(touch.client_y()))))
        });
        let ontouchend = link.callback(|_: TouchEvent| Release);
        let ontouchcancel = link.callback(|_: TouchEvent| Leave);

        html! {
            <div
                class={classes!("card", props.locked.then_some("locked"))}
                style={format!("width: {0}px; height: {0}px;", props.size)}
            >
                <div class={classes!("prize", revealed.then_some("glow"))}>
                    <strong>{props.tile.value}</strong>
                    <small>{"Winner!"}</small>
                </div>
                <canvas
                    ref={self.canvas.clone()}
                    class={classes!("cover", revealed.then_some("gone"))}
                    {onpointerdown}
                    {onpointermove}
                    {onpointerup}
                    {onpointerleave}
                    {ontouchstart}
                    {ontouchmove}
                    {ontouchend}
                    {ontouchcancel}
                />
            </div>
        }
    }
}
