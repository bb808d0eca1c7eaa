use crate::chime::RevealChime;
use crate::scratch::ScratchCardView;
use crate::snow::Snowfall;
use crate::utils::*;
use clap::Args;
use tombola_core as game;
use game::{CoverageCheck, GameConfig, Px, RevealPolicy, ShuffledValues, TileGrid, TileId};
use yew::prelude::*;

const DEFAULT_BASE_PATH: &str = match option_env!("TOMBOLA_BASE_PATH") {
    Some(path) => path,
    None => "/",
};

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Prefix used to locate static assets
    #[arg(long, default_value = DEFAULT_BASE_PATH)]
    pub base_path: String,

    /// Do not play a sound on reveal
    #[arg(long)]
    pub muted: bool,

    /// Hide the falling snow
    #[arg(long)]
    pub no_snow: bool,

    /// Percentage of a cover that must be scratched off to reveal it
    #[arg(long, default_value_t = game::DEFAULT_REVEAL_THRESHOLD)]
    pub threshold: f64,

    /// Fraction of brush strokes followed by a coverage scan
    #[arg(long, default_value_t = game::DEFAULT_SAMPLE_RATE)]
    pub sample_rate: f64,

    /// Track scratched area on every stroke instead of sampling
    #[arg(long)]
    pub incremental: bool,

    /// Brush radius in pixels
    #[arg(long, default_value_t = game::DEFAULT_BRUSH_RADIUS)]
    pub brush: f64,

    /// Tile edge length in pixels
    #[arg(long, default_value_t = 160)]
    pub tile_size: Px,
}

impl GameProps {
    pub(crate) fn reveal_policy(&self) -> RevealPolicy {
        let defaults = RevealPolicy::default();
        let check = if self.incremental {
            CoverageCheck::Incremental
        } else if (0.0..=1.0).contains(&self.sample_rate) {
            CoverageCheck::Sampled {
                rate: self.sample_rate,
            }
        } else {
            log::warn!("sample rate {} out of range, using default", self.sample_rate);
            defaults.check
        };

        RevealPolicy {
            threshold: if (0.0..100.0).contains(&self.threshold) {
                self.threshold
            } else {
                log::warn!("threshold {} out of range, using default", self.threshold);
                defaults.threshold
            },
            brush_radius: if self.brush > 0.0 {
                self.brush
            } else {
                defaults.brush_radius
            },
            check,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    StartScratch(TileId),
    Reveal(TileId),
    DismissPopup,
    NewGame,
}

#[derive(Debug)]
pub(crate) struct GameView {
    grid: TileGrid,
    seed: u64,
    generation: u32,
    policy: RevealPolicy,
    chime: RevealChime,
}

impl GameView {
    fn new_seed(props: &GameProps, generation: u32) -> u64 {
        match props.seed {
            Some(seed) => seed.wrapping_add(generation.into()),
            None => js_random_seed(),
        }
    }

    fn view_counter(&self, ctx: &Context<Self>) -> Html {
        let won = self.grid.is_won();
        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <nav>
                <aside>
                    <small>{"Scratched"}</small>
                    <span>{format!("{} / {}", self.grid.revealed_count(), self.grid.tile_count())}</span>
                </aside>
                if won {
                    <button onclick={cb_new_game}>{"Play again"}</button>
                }
            </nav>
        }
    }

    fn view_popup(&self, ctx: &Context<Self>) -> Html {
        let cb_dismiss = ctx.link().callback(|_: MouseEvent| Msg::DismissPopup);
        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        if let Some(tile) = self.grid.last_revealed() {
            html! {
                <Modal>
                    <dialog class="popup" open={true}>
                        <article>
                            <h2>{"You won a gift!"}</h2>
                            <p>{tile.value}</p>
                            <button onclick={cb_dismiss}>{"Continue"}</button>
                        </article>
                    </dialog>
                </Modal>
            }
        } else if self.grid.is_won() {
            html! {
                <Modal>
                    <dialog class="popup win" open={true}>
                        <article>
                            <h2>{"Merry Christmas!"}</h2>
                            <p>{"You found all the gifts!"}</p>
                            <button onclick={cb_new_game}>{"Start a new game"}</button>
                        </article>
                    </dialog>
                </Modal>
            }
        } else {
            html! {}
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = Self::new_seed(props, 0);
        let policy = props.reveal_policy();
        log::debug!("seed: {}, policy: {:?}", seed, policy);

        Self {
            grid: TileGrid::new(GameConfig::default(), ShuffledValues::new(seed)),
            seed,
            generation: 0,
            policy,
            chime: RevealChime::new(&props.base_path, props.muted),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            StartScratch(id) => match self.grid.request_start_scratch(id) {
                Ok(outcome) => {
                    log::trace!("start scratch {}: {:?}", id, outcome);
                    outcome.is_granted()
                }
                Err(err) => {
                    log::error!("start scratch {}: {}", id, err);
                    false
                }
            },
            Reveal(id) => match self.grid.reveal(id) {
                Ok(outcome) if outcome.has_update() => {
                    log::debug!("reveal {}: {:?}", id, outcome);
                    self.chime.play();
                    true
                }
                Ok(_) => false,
                Err(err) => {
                    log::error!("reveal {}: {}", id, err);
                    false
                }
            },
            DismissPopup => self.grid.dismiss_last_revealed(),
            NewGame => {
                self.generation = self.generation.wrapping_add(1);
                self.seed = Self::new_seed(ctx.props(), self.generation);
                log::debug!("new game, seed: {}", self.seed);
                self.grid.start_new_game(ShuffledValues::new(self.seed));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let on_start = ctx.link().callback(Msg::StartScratch);
        let on_reveal = ctx.link().callback(Msg::Reveal);

        html! {
            <>
                if !props.no_snow {
                    <Snowfall/>
                }
                <main class="tombola">
                    <header>
                        <h1>{"Christmas Raffle"}</h1>
                        {self.view_counter(ctx)}
                    </header>
                    <section class="grid">
                        {
                            for self.grid.tiles().iter().map(|&tile| {
                                let locked = self.grid.is_locked_out(tile.id);
                                let seed = self.seed.wrapping_add(tile.id as u64);
                                html! {
                                    <ScratchCardView
                                        key={tile.id}
                                        {tile}
                                        generation={self.generation}
                                        size={props.tile_size}
                                        policy={self.policy}
                                        {seed}
                                        {locked}
                                        on_start={on_start.clone()}
                                        on_reveal={on_reveal.clone()}
                                    />
                                }
                            })
                        }
                    </section>
                    {self.view_popup(ctx)}
                </main>
            </>
        }
    }
}
