use std::collections::BTreeMap;

use crate::{
    animation::tween::{Glide, lerp, points_converged},
    draw::{
        cache::{DrawCache, ProcedureLabel},
        procedure::{DrawProcedure, GridCell, Readout, RevealedCard},
    },
    foundation::{
        core::{Point, Rgba8, TickIndex, TickRate, Vec2},
        error::{ReelError, ReelResult},
        math::Rng64,
    },
    render::port::{RenderPort, TextAlign},
    scene::{
        config::SceneConfig,
        dataset::{Dataset, NumberToken, TOKEN_COUNT},
    },
    search::state::{Narrowing, Pointer, SearchOutcome, SearchState},
    sequencer::{
        phase::Phase,
        state::{MarkerTrack, PhaseChange, PhaseState, PointerGlide, TextTransitionSlot},
    },
};

const TOKEN_TEXT_SIZE: f64 = 36.0;
const CAPTION_TEXT_SIZE: f64 = 28.0;
const INK: Rgba8 = Rgba8::rgb(20, 20, 20);

/// Layers that later phases redraw from the cache, bottom first.
const SCENE_LAYERS: [ProcedureLabel; 6] = [
    ProcedureLabel::IndexGrid,
    ProcedureLabel::RevealedValues,
    ProcedureLabel::NeedleBanner,
    ProcedureLabel::HighMarker,
    ProcedureLabel::LowMarker,
    ProcedureLabel::MidMarker,
];

/// Drives one binary-search animation, one tick at a time.
///
/// The sequencer owns the whole run: dataset, tokens, search bounds, pointer outlines, the draw
/// cache and the active phase. Each [`Sequencer::tick`] draws one frame through a
/// [`RenderPort`] and takes at most one edge of the phase graph.
#[derive(Clone, Debug)]
pub struct Sequencer {
    config: SceneConfig,
    tick_rate: TickRate,
    start_phase: Phase,
    rng: Rng64,
    dataset: Dataset,
    sorted: Vec<i64>,
    tokens: Vec<NumberToken>,
    search: Option<SearchState>,
    markers: BTreeMap<Pointer, MarkerTrack>,
    revealed: Vec<RevealedCard>,
    cache: DrawCache,
    clock: TickIndex,
    state: PhaseState,
    transitions: Vec<PhaseChange>,
}

impl Sequencer {
    /// Validate `config`, seed the RNG and build the dataset it describes.
    pub fn new(config: SceneConfig) -> ReelResult<Self> {
        config.validate()?;
        let mut rng = Rng64::new(config.seed);
        let dataset = config.build_dataset(&mut rng)?;
        Self::assemble(config, rng, dataset)
    }

    /// Like [`Sequencer::new`] but animates `dataset` instead of the configured one.
    pub fn with_dataset(config: SceneConfig, dataset: Dataset) -> ReelResult<Self> {
        config.validate()?;
        dataset.validate()?;
        let rng = Rng64::new(config.seed);
        Self::assemble(config, rng, dataset)
    }

    fn assemble(config: SceneConfig, rng: Rng64, dataset: Dataset) -> ReelResult<Self> {
        let tick_rate = config.tick_rate()?;
        let start_phase = config.start_phase()?;
        let mut sequencer = Self {
            sorted: dataset.sorted_values(),
            config,
            tick_rate,
            start_phase,
            rng,
            dataset,
            tokens: Vec::with_capacity(TOKEN_COUNT),
            search: None,
            markers: BTreeMap::new(),
            revealed: Vec::new(),
            cache: DrawCache::new(),
            clock: TickIndex::default(),
            state: PhaseState::Start,
            transitions: Vec::new(),
        };
        sequencer.state = sequencer.enter_start()?;
        Ok(sequencer)
    }

    /// Animate a fresh dataset drawn from the continuing RNG.
    pub fn reset(&mut self) -> ReelResult<()> {
        let dataset = self.config.build_dataset(&mut self.rng)?;
        self.restart_with(dataset)
    }

    /// Start over from the start phase with `dataset`.
    pub fn restart_with(&mut self, dataset: Dataset) -> ReelResult<()> {
        dataset.validate()?;
        self.sorted = dataset.sorted_values();
        self.dataset = dataset;
        self.tokens.clear();
        self.search = None;
        self.markers.clear();
        self.revealed.clear();
        self.cache.clear();
        self.clock = TickIndex::default();
        self.transitions.clear();
        self.state = self.enter_start()?;
        tracing::debug!(needle = self.dataset.needle(), "sequencer restarted");
        Ok(())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn phase_state(&self) -> &PhaseState {
        &self.state
    }

    /// The last tick that ran; `TickIndex(0)` before the first.
    pub fn tick_index(&self) -> TickIndex {
        self.clock
    }

    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    /// Result of the search once it has settled.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.search.as_ref()?.outcome(&self.sorted)
    }

    pub fn tokens(&self) -> &[NumberToken] {
        &self.tokens
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The values in slot order.
    pub fn sorted_values(&self) -> &[i64] {
        &self.sorted
    }

    pub fn cache(&self) -> &DrawCache {
        &self.cache
    }

    pub fn marker(&self, pointer: Pointer) -> Option<&MarkerTrack> {
        self.markers.get(&pointer)
    }

    pub fn revealed(&self) -> &[RevealedCard] {
        &self.revealed
    }

    pub fn is_finished(&self) -> bool {
        self.phase().is_terminal()
    }

    pub fn transitions(&self) -> &[PhaseChange] {
        &self.transitions
    }

    /// Run one tick: advance the clock, draw the active phase and apply at most one transition.
    ///
    /// Returns the phase that is current after the tick. On error the phase is left as it was.
    pub fn tick(&mut self, port: &mut dyn RenderPort) -> ReelResult<Phase> {
        let now = self.clock.next();
        self.clock = now;
        port.begin_frame(self.config.background);

        let mut state = std::mem::replace(&mut self.state, PhaseState::End);
        let step = self.run_phase(&mut state, now, port);
        self.state = state;

        if let Some(next) = step? {
            self.transition(next, now)?;
        }
        Ok(self.phase())
    }

    /// Tick until END, giving up after `max_ticks`.
    #[tracing::instrument(skip(self, port))]
    pub fn run_to_end(
        &mut self,
        port: &mut dyn RenderPort,
        max_ticks: u64,
    ) -> ReelResult<SearchOutcome> {
        let mut budget = max_ticks;
        while !self.is_finished() {
            if budget == 0 {
                return Err(ReelError::invariant(format!(
                    "run did not reach END within {max_ticks} ticks (stuck in {})",
                    self.phase()
                )));
            }
            budget -= 1;
            self.tick(port)?;
        }
        self.outcome()
            .ok_or_else(|| ReelError::invariant("reached END without a settled search"))
    }

    fn transition(&mut self, next: PhaseState, now: TickIndex) -> ReelResult<()> {
        let from = self.state.phase();
        let to = next.phase();
        if !from.successors().contains(&to) {
            return Err(ReelError::invariant(format!(
                "illegal transition {from} -> {to} at tick {}",
                now.0
            )));
        }
        tracing::debug!(tick = now.0, %from, %to, "phase transition");
        self.transitions.push(PhaseChange { tick: now, from, to });
        self.state = next;
        if to.is_terminal() {
            match self.outcome() {
                Some(SearchOutcome::Found { index, value }) => {
                    tracing::info!(index, value, "needle found")
                }
                Some(SearchOutcome::NotFound { needle }) => {
                    tracing::info!(needle, "needle not in sequence")
                }
                None => {}
            }
        }
        Ok(())
    }

    fn run_phase(
        &mut self,
        state: &mut PhaseState,
        now: TickIndex,
        port: &mut dyn RenderPort,
    ) -> ReelResult<Option<PhaseState>> {
        match state {
            PhaseState::Start => {
                self.draw_container(port, 0.0, 1.0);
                Ok(Some(PhaseState::Collect))
            }
            PhaseState::Collect => Ok(self.collect(now, port)),
            PhaseState::Gather => Ok(self.gather(port)),
            PhaseState::Spin { ticks } => Ok(self.spin(ticks, now, port)),
            PhaseState::Deal { container_alpha } => self.deal(container_alpha, now, port),
            PhaseState::Calc { timers } => {
                self.capture_once(ProcedureLabel::IndexGrid, port, Self::grid_procedure);
                self.capture_once(ProcedureLabel::NeedleBanner, port, Self::banner_procedure);

                let stagger = self.config.reveal_stagger_ticks;
                timers.arm(Pointer::High, now);
                if timers.has_elapsed(Pointer::High, stagger, now) {
                    timers.arm(Pointer::Low, now);
                }
                if timers.has_elapsed(Pointer::Low, stagger, now) {
                    timers.arm(Pointer::Mid, now);
                }
                for pointer in [Pointer::High, Pointer::Low, Pointer::Mid] {
                    if timers.is_armed(pointer) {
                        self.capture_once(ProcedureLabel::marker(pointer), port, |seq| {
                            seq.steady_marker(pointer)
                        });
                    }
                }

                if timers.has_elapsed(Pointer::Mid, stagger, now) {
                    return Ok(Some(PhaseState::reveal_mid(self.config.fade_step)?));
                }
                Ok(None)
            }
            PhaseState::RevealMid { fade } => {
                let mid = self
                    .active_search(Phase::BsRevealMidAndTransition)?
                    .mid_index(self.sorted.len())?;
                self.cache.replay(&SCENE_LAYERS, port);

                let alpha = fade.advance();
                let mut cards: Vec<RevealedCard> = self
                    .revealed
                    .iter()
                    .copied()
                    .filter(|card| card.index != mid)
                    .collect();
                cards.push(RevealedCard {
                    index: mid,
                    origin: self.config.slot_position(mid),
                    value: self.sorted[mid],
                    alpha,
                });
                let procedure = DrawProcedure::RevealedValues {
                    cards: cards.clone(),
                    size: self.config.square_size,
                };
                self.cache
                    .capture_and_run(ProcedureLabel::RevealedValues, procedure, port);

                if fade.is_done() {
                    self.revealed = cards;
                    return Ok(Some(PhaseState::adjust_high_low()));
                }
                Ok(None)
            }
            PhaseState::AdjustHighLow { glide } => self.adjust_high_low(glide, port),
            PhaseState::AdjustHighLowNums { pointer, fade } => {
                let pointer = *pointer;
                let alpha = fade.advance();
                self.crossfade_marker(pointer, alpha, fade.is_done(), port);
                if fade.is_done() {
                    return Ok(Some(PhaseState::adjust_mid()));
                }
                Ok(None)
            }
            PhaseState::AdjustMid { glide } => self.adjust_mid(glide, port),
            PhaseState::AdjustMidNum { fade } => {
                let alpha = fade.advance();
                self.crossfade_marker(Pointer::Mid, alpha, fade.is_done(), port);
                if fade.is_done() {
                    return Ok(Some(PhaseState::reveal_mid(self.config.fade_step)?));
                }
                Ok(None)
            }
            PhaseState::End => {
                self.cache.replay(&SCENE_LAYERS, port);
                self.draw_verdict(port);
                Ok(None)
            }
        }
    }

    fn collect(&mut self, now: TickIndex, port: &mut dyn RenderPort) -> Option<PhaseState> {
        self.draw_container(port, 0.0, 1.0);
        let interval = self.config.spawn_interval_ticks;
        if now.0.is_multiple_of(interval) && self.tokens.len() < TOKEN_COUNT {
            self.spawn_token();
        }
        self.draw_tokens(port);
        (self.tokens.len() >= TOKEN_COUNT).then_some(PhaseState::Gather)
    }

    fn spawn_token(&mut self) {
        let index = self.tokens.len();
        let spread = self.config.spawn_spread;
        let x = self.rng.next_f64_01() * spread * self.rng.sign();
        let y = -50.0 + self.rng.next_f64_01() * spread * self.rng.sign();
        let value = self.dataset.values()[index];
        let home_index = self.dataset.home_indices()[index];
        tracing::trace!(index, value, x, y, "token spawned");
        self.tokens.push(NumberToken {
            value,
            position: Point::new(x, y),
            home_index,
        });
    }

    fn gather(&mut self, port: &mut dyn RenderPort) -> Option<PhaseState> {
        self.draw_container(port, 0.0, 1.0);
        let anchor = self.config.container_anchor;
        let rate = self.config.gather_rate;
        for token in &mut self.tokens {
            token.position = lerp(token.position, anchor, rate);
        }
        self.draw_tokens(port);
        self.tokens
            .iter()
            .all(|token| points_converged(token.position, anchor))
            .then(PhaseState::spin)
    }

    fn spin(
        &mut self,
        ticks: &mut u64,
        now: TickIndex,
        port: &mut dyn RenderPort,
    ) -> Option<PhaseState> {
        *ticks += 1;
        self.draw_container(port, now.0 as f64 * self.config.spin_speed, 1.0);
        draw_caption(port, "Sorting...", Point::new(0.0, -80.0));
        (self.tick_rate.ticks_to_secs(*ticks) > self.config.spin_seconds)
            .then(PhaseState::deal)
    }

    fn deal(
        &mut self,
        container_alpha: &mut u8,
        now: TickIndex,
        port: &mut dyn RenderPort,
    ) -> ReelResult<Option<PhaseState>> {
        self.draw_container(
            port,
            now.0 as f64 * self.config.spin_speed,
            f64::from(*container_alpha) / 255.0,
        );
        *container_alpha = container_alpha.saturating_sub(self.config.container_fade_step);

        let rate = self.config.glide_rate;
        for token in &mut self.tokens {
            let target = self.config.slot_position(token.home_index);
            token.position = lerp(token.position, target, rate);
        }
        self.draw_cards(port);

        let settled = self.tokens.iter().all(|token| {
            points_converged(token.position, self.config.slot_position(token.home_index))
        });
        if settled && *container_alpha == 0 {
            return Ok(Some(self.enter_calc()?));
        }
        Ok(None)
    }

    fn adjust_high_low(
        &mut self,
        glide: &mut Option<PointerGlide>,
        port: &mut dyn RenderPort,
    ) -> ReelResult<Option<PhaseState>> {
        let mut moving = match *glide {
            Some(moving) => moving,
            None => {
                let len = self.sorted.len();
                let search = self
                    .search
                    .as_mut()
                    .ok_or_else(|| missing_search(Phase::AdjustHighLow))?;
                let (pointer, to) = match search.narrow(&self.sorted)? {
                    Narrowing::Found { index } => {
                        tracing::debug!(index, "mid matches needle");
                        self.cache.replay(&SCENE_LAYERS, port);
                        return Ok(Some(PhaseState::End));
                    }
                    Narrowing::Exhausted => {
                        tracing::debug!(low = search.low, high = search.high, "bounds crossed");
                        self.cache.replay(&SCENE_LAYERS, port);
                        return Ok(Some(PhaseState::End));
                    }
                    Narrowing::High { to, .. } => (Pointer::High, to),
                    Narrowing::Low { to, .. } => (Pointer::Low, to),
                };
                let target_index = search.index_of(pointer, len)?;
                tracing::debug!(pointer = pointer.name(), to, "bound moved");
                self.pointer_glide(pointer, target_index)?
            }
        };

        let pointer = moving.pointer;
        let position = moving.glide.advance();
        let arrived = moving.glide.is_arrived();
        let target_index = moving.target_index;
        *glide = Some(moving);
        self.marker_mut(pointer)?.position = position;
        let procedure = self.steady_marker(pointer);
        self.redraw_with_marker(pointer, procedure, port);

        if arrived {
            self.marker_mut(pointer)?.readout.stage(target_index.to_string());
            return Ok(Some(PhaseState::adjust_high_low_nums(
                pointer,
                self.config.fade_step,
            )?));
        }
        Ok(None)
    }

    fn adjust_mid(
        &mut self,
        glide: &mut Option<PointerGlide>,
        port: &mut dyn RenderPort,
    ) -> ReelResult<Option<PhaseState>> {
        let mut moving = match *glide {
            Some(moving) => moving,
            None => {
                let len = self.sorted.len();
                let search = self
                    .search
                    .as_mut()
                    .ok_or_else(|| missing_search(Phase::AdjustMid))?;
                search.recompute_mid().map_err(|err| {
                    ReelError::invariant(format!("{}: {err}", Phase::AdjustMid))
                })?;
                let target_index = search.index_of(Pointer::Mid, len)?;
                self.pointer_glide(Pointer::Mid, target_index)?
            }
        };

        let position = moving.glide.advance();
        let arrived = moving.glide.is_arrived();
        let target_index = moving.target_index;
        *glide = Some(moving);
        self.marker_mut(Pointer::Mid)?.position = position;
        let procedure = self.steady_marker(Pointer::Mid);
        self.redraw_with_marker(Pointer::Mid, procedure, port);

        if arrived {
            self.marker_mut(Pointer::Mid)?
                .readout
                .stage(target_index.to_string());
            return Ok(Some(PhaseState::adjust_mid_num(self.config.fade_step)?));
        }
        Ok(None)
    }

    /// Redraw the scene with `pointer`'s readout crossfading; the final tick settles it.
    fn crossfade_marker(
        &mut self,
        pointer: Pointer,
        alpha: f64,
        done: bool,
        port: &mut dyn RenderPort,
    ) {
        let procedure = if done {
            self.steady_marker(pointer)
        } else {
            let slot = self
                .markers
                .get(&pointer)
                .map(|track| track.readout.clone())
                .unwrap_or_default();
            self.marker_procedure(
                pointer,
                Readout::Crossfade {
                    outgoing: slot.outgoing,
                    incoming: slot.incoming,
                    alpha,
                },
            )
        };
        self.redraw_with_marker(pointer, procedure, port);
    }

    /// Replay every cached layer, re-capturing `pointer`'s marker in its slot.
    fn redraw_with_marker(
        &mut self,
        pointer: Pointer,
        procedure: DrawProcedure,
        port: &mut dyn RenderPort,
    ) {
        let moving = ProcedureLabel::marker(pointer);
        for label in SCENE_LAYERS {
            if label == moving {
                self.cache.capture_and_run(label, procedure.clone(), port);
            } else {
                self.cache.replay(&[label], port);
            }
        }
    }

    /// Draw `label` from the cache, building and capturing it the first time.
    fn capture_once(
        &mut self,
        label: ProcedureLabel,
        port: &mut dyn RenderPort,
        build: impl FnOnce(&Self) -> DrawProcedure,
    ) {
        if self.cache.contains(label) {
            self.cache.replay(&[label], port);
        } else {
            let procedure = build(self);
            self.cache.capture_and_run(label, procedure, port);
        }
    }

    fn enter_start(&mut self) -> ReelResult<PhaseState> {
        let anchor = self.config.container_anchor;
        match self.start_phase {
            Phase::Start => Ok(PhaseState::Start),
            Phase::CollectNumbers => Ok(PhaseState::Collect),
            Phase::SpinNumbersSpinning => {
                self.tokens = self.dataset.tokens_at(anchor);
                Ok(PhaseState::spin())
            }
            Phase::SpitOut10 => {
                self.tokens = self.dataset.tokens_at(anchor);
                Ok(PhaseState::deal())
            }
            Phase::BsHighLowMidCalc => {
                self.tokens = self.dataset.tokens_at(anchor);
                for token in &mut self.tokens {
                    token.position = self.config.slot_position(token.home_index);
                }
                self.enter_calc()
            }
            other => Err(ReelError::validation(format!(
                "phase {other} cannot be used as a start phase"
            ))),
        }
    }

    fn enter_calc(&mut self) -> ReelResult<PhaseState> {
        let search = SearchState::new(self.sorted.len(), self.dataset.needle())?;
        self.markers.clear();
        for pointer in [Pointer::High, Pointer::Low, Pointer::Mid] {
            let index = search.index_of(pointer, self.sorted.len())?;
            self.markers.insert(
                pointer,
                MarkerTrack {
                    position: self.config.slot_position(index),
                    readout: TextTransitionSlot::steady(index.to_string()),
                },
            );
        }
        self.search = Some(search);
        self.revealed.clear();
        self.cache.clear();
        Ok(PhaseState::calc())
    }

    fn active_search(&self, phase: Phase) -> ReelResult<&SearchState> {
        let search = self.search.as_ref().ok_or_else(|| missing_search(phase))?;
        if search.is_settled() || search.low > search.high {
            return Err(ReelError::invariant(format!(
                "{phase} requires an active search (low={}, high={})",
                search.low, search.high
            )));
        }
        Ok(search)
    }

    fn marker_mut(&mut self, pointer: Pointer) -> ReelResult<&mut MarkerTrack> {
        self.markers.get_mut(&pointer).ok_or_else(|| {
            ReelError::invariant(format!("no outline placed for {}", pointer.name()))
        })
    }

    fn pointer_glide(&self, pointer: Pointer, target_index: usize) -> ReelResult<PointerGlide> {
        let from = self
            .markers
            .get(&pointer)
            .map(|track| track.position)
            .ok_or_else(|| {
                ReelError::invariant(format!("no outline placed for {}", pointer.name()))
            })?;
        Ok(PointerGlide {
            pointer,
            target_index,
            glide: Glide::new(
                from,
                self.config.slot_position(target_index),
                self.config.glide_rate,
            )?,
        })
    }

    fn grid_procedure(&self) -> DrawProcedure {
        DrawProcedure::IndexGrid {
            cells: (0..self.sorted.len())
                .map(|index| GridCell {
                    origin: self.config.slot_position(index),
                    index,
                })
                .collect(),
            size: self.config.square_size,
        }
    }

    fn banner_procedure(&self) -> DrawProcedure {
        DrawProcedure::NeedleBanner {
            needle: self.dataset.needle(),
            at: self.config.banner_position(),
        }
    }

    fn steady_marker(&self, pointer: Pointer) -> DrawProcedure {
        let text = self
            .markers
            .get(&pointer)
            .map(|track| track.readout.incoming.clone())
            .unwrap_or_default();
        self.marker_procedure(pointer, Readout::Steady(text))
    }

    fn marker_procedure(&self, pointer: Pointer, readout: Readout) -> DrawProcedure {
        let outline_at = self
            .markers
            .get(&pointer)
            .map(|track| track.position)
            .unwrap_or(self.config.slot_origin);
        DrawProcedure::PointerMarker {
            pointer,
            outline_at,
            size: self.config.square_size,
            readout,
        }
    }

    fn draw_container(&self, port: &mut dyn RenderPort, rotation: f64, alpha: f64) {
        let size = self.config.container_size;
        port.push_style();
        port.set_alpha(alpha);
        port.set_fill(Some(Rgba8::WHITE));
        port.set_stroke(Some(Rgba8::BLACK));
        port.cuboid(Point::ORIGIN, size, rotation);
        port.pop_style();
    }

    fn draw_tokens(&self, port: &mut dyn RenderPort) {
        port.push_style();
        port.set_stroke(None);
        port.set_fill(Some(INK));
        port.set_text_size(TOKEN_TEXT_SIZE);
        for token in &self.tokens {
            port.text(
                &token.value.to_string(),
                token.position,
                TextAlign::Center,
                0.0,
            );
        }
        port.pop_style();
    }

    fn draw_cards(&self, port: &mut dyn RenderPort) {
        port.push_style();
        port.set_fill(Some(Rgba8::ORANGE));
        port.set_stroke(Some(Rgba8::BLACK));
        let mut order: Vec<&NumberToken> = self.tokens.iter().collect();
        order.sort_by_key(|token| token.home_index);
        for token in order {
            port.square(token.position, self.config.square_size);
        }
        port.pop_style();
    }

    fn draw_verdict(&self, port: &mut dyn RenderPort) {
        let at = self.config.banner_position() + Vec2::new(0.0, 50.0);
        let message = match self.outcome() {
            Some(SearchOutcome::Found { index, .. }) => {
                format!("found {} at index {index}!", self.dataset.needle())
            }
            Some(SearchOutcome::NotFound { needle }) => format!("{needle} is not in the list"),
            None => "THE END!".to_owned(),
        };
        draw_caption(port, &message, at);
    }
}

fn draw_caption(port: &mut dyn RenderPort, text: &str, at: Point) {
    port.push_style();
    port.set_stroke(None);
    port.set_fill(Some(INK));
    port.set_text_size(CAPTION_TEXT_SIZE);
    port.text(text, at, TextAlign::Center, 0.0);
    port.pop_style();
}

fn missing_search(phase: Phase) -> ReelError {
    ReelError::invariant(format!("{phase} entered before the search was initialised"))
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/machine.rs"]
mod tests;
