//! Harmonizer state and the host-facing object

use serde::Serialize;
use tracing::{debug, trace};

use crate::chord::{compute_chord, Chord};
use crate::host::{Clock, Outlet};
use crate::message::{Message, Selector};

/// Tick period at creation: 60000 ms / 120 BPM
pub const DEFAULT_TEMPO_MS: u16 = 500;

// ============================================================================
// State
// ============================================================================

/// Control parameters plus the chord last derived from them.
///
/// Setters saturate into range. Only mode, degree and octave recompute the
/// chord; tempo and arpeggio leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarmonizerState {
    mode: u8,
    degree: u8,
    octave: u8,
    /// Stored for the arpeggiator; not read by the chord computation
    arpeggio: u8,
    tempo: u16,
    chord: Chord,
}

impl Default for HarmonizerState {
    fn default() -> Self {
        Self::new()
    }
}

impl HarmonizerState {
    pub fn new() -> Self {
        Self {
            mode: 0,
            degree: 0,
            octave: 0,
            arpeggio: 0,
            tempo: DEFAULT_TEMPO_MS,
            chord: compute_chord(0, 0, 0),
        }
    }

    pub fn mode(&self) -> u8 { self.mode }
    pub fn degree(&self) -> u8 { self.degree }
    pub fn octave(&self) -> u8 { self.octave }
    pub fn arpeggio(&self) -> u8 { self.arpeggio }
    pub fn tempo(&self) -> u16 { self.tempo }
    pub fn chord(&self) -> &Chord { &self.chord }

    pub fn set_mode(&mut self, value: f32) -> Chord {
        self.apply(&Message::new(Selector::Mode, value));
        self.chord
    }

    pub fn set_degree(&mut self, value: f32) -> Chord {
        self.apply(&Message::new(Selector::Degree, value));
        self.chord
    }

    pub fn set_octave(&mut self, value: f32) -> Chord {
        self.apply(&Message::new(Selector::Octave, value));
        self.chord
    }

    pub fn set_tempo(&mut self, value: f32) {
        self.apply(&Message::new(Selector::Tempo, value));
    }

    pub fn set_arpeggio(&mut self, value: f32) {
        self.apply(&Message::new(Selector::Arpeggio, value));
    }

    /// Overwrite the chord from the current mode, degree and octave
    pub fn recompute(&mut self) -> Chord {
        self.chord = compute_chord(self.mode, self.degree, self.octave);
        self.chord
    }

    /// Store the clamped value, then recompute when the selector calls for
    /// it. Returns the new chord only in that case.
    pub fn apply(&mut self, msg: &Message) -> Option<Chord> {
        let range = msg.selector.range();
        let clamped = range.clamp(msg.value);
        if clamped != msg.value {
            debug!(param = range.name, requested = msg.value, clamped, "value saturated");
        }

        match msg.selector {
            Selector::Mode => self.mode = range.clamp_u8(msg.value),
            Selector::Degree => self.degree = range.clamp_u8(msg.value),
            Selector::Octave => self.octave = range.clamp_u8(msg.value),
            Selector::Tempo => self.tempo = range.clamp_u16(msg.value),
            Selector::Arpeggio => self.arpeggio = range.clamp_u8(msg.value),
        }

        msg.selector.recomputes_chord().then(|| self.recompute())
    }
}

// ============================================================================
// Host Object
// ============================================================================

/// One armonizador instance wired to its host capabilities.
///
/// Owns its clock; dropping the instance unsets the clock so no tick can
/// reach freed state.
pub struct Harmonizer<O: Outlet, C: Clock> {
    state: HarmonizerState,
    outlet: O,
    clock: C,
}

impl<O: Outlet, C: Clock> Harmonizer<O, C> {
    /// Build with default parameters and arm the clock for the first tick.
    /// The initial chord is computed but not emitted.
    pub fn new(outlet: O, mut clock: C) -> Self {
        let state = HarmonizerState::new();
        clock.delay(f64::from(state.tempo));
        Self { state, outlet, clock }
    }

    pub fn state(&self) -> &HarmonizerState {
        &self.state
    }

    /// Route a control message; chord-changing messages emit all eight
    /// notes, lowest index first
    pub fn handle(&mut self, msg: Message) {
        debug!(%msg, "armonizador message");
        if let Some(chord) = self.state.apply(&msg) {
            self.emit_chord(&chord);
        }
    }

    pub fn set_mode(&mut self, value: f32) {
        self.handle(Message::new(Selector::Mode, value));
    }

    pub fn set_degree(&mut self, value: f32) {
        self.handle(Message::new(Selector::Degree, value));
    }

    pub fn set_octave(&mut self, value: f32) {
        self.handle(Message::new(Selector::Octave, value));
    }

    pub fn set_tempo(&mut self, value: f32) {
        self.handle(Message::new(Selector::Tempo, value));
    }

    pub fn set_arpeggio(&mut self, value: f32) {
        self.handle(Message::new(Selector::Arpeggio, value));
    }

    /// Clock callback: re-arm at the tempo current at firing time
    pub fn tick(&mut self) {
        trace!(tempo = self.state.tempo, "armonizador tick");
        self.clock.delay(f64::from(self.state.tempo));
    }

    fn emit_chord(&mut self, chord: &Chord) {
        debug!(?chord, "armonizador chord");
        for &note in chord {
            self.outlet.float(f32::from(note));
        }
    }
}

impl<O: Outlet, C: Clock> Drop for Harmonizer<O, C> {
    fn drop(&mut self) {
        self.clock.unset();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<f32>>>);

    impl Outlet for Recorder {
        fn float(&mut self, value: f32) {
            self.0.borrow_mut().push(value);
        }
    }

    #[derive(Debug, Default)]
    struct ClockLog {
        delays: Vec<f64>,
        unsets: usize,
    }

    #[derive(Clone, Default)]
    struct FakeClock(Rc<RefCell<ClockLog>>);

    impl Clock for FakeClock {
        fn delay(&mut self, ms: f64) {
            self.0.borrow_mut().delays.push(ms);
        }

        fn unset(&mut self) {
            self.0.borrow_mut().unsets += 1;
        }
    }

    fn harmonizer() -> (Harmonizer<Recorder, FakeClock>, Recorder, FakeClock) {
        let outlet = Recorder::default();
        let clock = FakeClock::default();
        let h = Harmonizer::new(outlet.clone(), clock.clone());
        (h, outlet, clock)
    }

    #[test]
    fn test_initial_state() {
        let state = HarmonizerState::new();
        assert_eq!(state.mode(), 0);
        assert_eq!(state.degree(), 0);
        assert_eq!(state.octave(), 0);
        assert_eq!(state.arpeggio(), 0);
        assert_eq!(state.tempo(), 500);
        assert_eq!(state.chord(), &[0, 4, 7, 11, 12, 16, 19, 23]);
    }

    #[test]
    fn test_setters_clamp() {
        let mut state = HarmonizerState::new();
        state.set_mode(99.0);
        assert_eq!(state.mode(), 6);
        state.set_octave(-5.0);
        assert_eq!(state.octave(), 0);
        state.set_degree(7.0);
        assert_eq!(state.degree(), 6);
        state.set_arpeggio(-1.0);
        assert_eq!(state.arpeggio(), 1);
        state.set_arpeggio(12.0);
        assert_eq!(state.arpeggio(), 6);
        state.set_tempo(10.0);
        assert_eq!(state.tempo(), 30);
        state.set_tempo(200.0);
        assert_eq!(state.tempo(), 200);
    }

    #[test]
    fn test_tempo_and_arpeggio_leave_chord_alone() {
        let mut state = HarmonizerState::new();
        state.set_degree(4.0);
        let before = *state.chord();
        state.set_tempo(120.0);
        state.set_arpeggio(3.0);
        assert_eq!(state.chord(), &before);
    }

    #[test]
    fn test_apply_follows_selector_table() {
        for sel in Selector::ALL {
            let mut state = HarmonizerState::new();
            state.set_mode(3.0);
            let before = *state.chord();
            let result = state.apply(&Message::new(sel, 1000.0));
            assert_eq!(result.is_some(), sel.recomputes_chord());
            if !sel.recomputes_chord() {
                assert_eq!(state.chord(), &before);
            }
        }

        let mut state = HarmonizerState::new();
        state.apply(&Message::new(Selector::Octave, 1000.0));
        assert_eq!(f32::from(state.octave()), Selector::Octave.range().max);
        state.apply(&Message::new(Selector::Tempo, 1.0));
        assert_eq!(f32::from(state.tempo()), Selector::Tempo.range().min);
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let mut state = HarmonizerState::new();
        state.set_mode(2.0);
        state.set_degree(5.0);
        state.set_octave(3.0);
        let first = state.recompute();
        assert_eq!(state.recompute(), first);
        assert_eq!(first, compute_chord(2, 5, 3));
    }

    #[test]
    fn test_chord_messages_emit_eight_values_in_order() {
        let (mut h, outlet, _clock) = harmonizer();
        assert!(outlet.0.borrow().is_empty());

        h.set_degree(1.0);
        assert_eq!(*outlet.0.borrow(), vec![2.0, 5.0, 9.0, 12.0, 14.0, 17.0, 21.0, 24.0]);

        h.set_octave(1.0);
        assert_eq!(outlet.0.borrow().len(), 16);
        assert_eq!(outlet.0.borrow()[8], 14.0);
    }

    #[test]
    fn test_tempo_and_arpeggio_messages_emit_nothing() {
        let (mut h, outlet, _clock) = harmonizer();
        h.set_tempo(250.0);
        h.set_arpeggio(2.0);
        assert!(outlet.0.borrow().is_empty());
        assert_eq!(h.state().tempo(), 250);
        assert_eq!(h.state().arpeggio(), 2);
    }

    #[test]
    fn test_tick_rearms_with_current_tempo() {
        let (mut h, _outlet, clock) = harmonizer();
        assert_eq!(clock.0.borrow().delays, vec![500.0]);

        h.set_tempo(200.0);
        assert_eq!(clock.0.borrow().delays.len(), 1);

        h.tick();
        assert_eq!(clock.0.borrow().delays, vec![500.0, 200.0]);
    }

    #[test]
    fn test_drop_unsets_clock_once() {
        let (h, _outlet, clock) = harmonizer();
        assert_eq!(clock.0.borrow().unsets, 0);
        drop(h);
        assert_eq!(clock.0.borrow().unsets, 1);
    }
}
