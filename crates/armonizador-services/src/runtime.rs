//! Host runtime: class registration, instance lifecycle and message routing

use std::collections::HashMap;
use std::fmt;

use armonizador_core::{ArmonizadorError, Harmonizer, HarmonizerState, Message, Selector};
use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::outlet::{ChannelOutlet, OutletEvent};
use crate::scheduler::{ClockId, Scheduler, SchedulerClock};

/// Class name patches use to instantiate the harmonizer
pub const CLASS_NAME: &str = "armonizador";

/// Longest span a single [`Runtime::advance`] covers: one day
pub const MAX_ADVANCE_MS: f64 = 86_400_000.0;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0} ... couldn't create")]
    UnknownClass(String),
    #[error("Instance not found: {0}")]
    UnknownInstance(InstanceId),
    #[error("{class}: {source}")]
    Message {
        class: &'static str,
        #[source]
        source: ArmonizadorError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Method table registered for a class
#[derive(Debug, Clone)]
struct ClassSpec {
    name: &'static str,
    methods: Vec<Selector>,
}

type Instance = Harmonizer<ChannelOutlet, SchedulerClock>;

struct Slot {
    object: Instance,
    clock: ClockId,
}

/// Serial, single-threaded host for armonizador instances.
///
/// Messages and clock firings are delivered one at a time, so an instance
/// never observes concurrent calls.
pub struct Runtime {
    classes: HashMap<&'static str, ClassSpec>,
    instances: HashMap<InstanceId, Slot>,
    clock_owners: HashMap<ClockId, InstanceId>,
    scheduler: Scheduler,
    events_tx: Sender<OutletEvent>,
    events_rx: Receiver<OutletEvent>,
    next_instance: u64,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Empty runtime; call [`Runtime::setup`] before creating instances
    pub fn new() -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            classes: HashMap::new(),
            instances: HashMap::new(),
            clock_owners: HashMap::new(),
            scheduler: Scheduler::new(),
            events_tx,
            events_rx,
            next_instance: 0,
        }
    }

    /// Register the armonizador class and its five methods.
    /// Calling it again is a no-op.
    pub fn setup(&mut self) {
        if self.classes.contains_key(CLASS_NAME) {
            return;
        }
        self.classes.insert(CLASS_NAME, ClassSpec {
            name: CLASS_NAME,
            methods: Selector::ALL.to_vec(),
        });
        info!(class = CLASS_NAME, "class registered");
    }

    pub fn is_registered(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Instantiate a registered class; the new instance's clock is armed
    pub fn create(&mut self, class: &str) -> Result<InstanceId, RuntimeError> {
        if !self.classes.contains_key(class) {
            return Err(RuntimeError::UnknownClass(class.to_string()));
        }

        let id = InstanceId(self.next_instance);
        self.next_instance += 1;

        let clock = self.scheduler.clock();
        let clock_id = clock.id();
        let outlet = ChannelOutlet::new(id, self.events_tx.clone());
        let object = Harmonizer::new(outlet, clock);

        self.clock_owners.insert(clock_id, id);
        self.instances.insert(id, Slot { object, clock: clock_id });
        info!(instance = %id, class, "instance created");
        Ok(id)
    }

    /// Tear down an instance; its clock is unset before the state is freed
    pub fn destroy(&mut self, id: InstanceId) -> Result<(), RuntimeError> {
        let slot = self.instances.remove(&id).ok_or(RuntimeError::UnknownInstance(id))?;
        self.clock_owners.remove(&slot.clock);
        drop(slot);
        info!(instance = %id, "instance destroyed");
        Ok(())
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Deliver `selector` with raw atom arguments.
    ///
    /// A missing argument counts as 0 and extra arguments are ignored.
    pub fn send(&mut self, id: InstanceId, selector: &str, args: &[&str]) -> Result<(), RuntimeError> {
        let spec = self.classes.get(CLASS_NAME).ok_or_else(|| RuntimeError::UnknownClass(CLASS_NAME.to_string()))?;
        let class = spec.name;
        let message_err = |source: ArmonizadorError| RuntimeError::Message { class, source };

        let selector: Selector = selector.parse().map_err(message_err)?;
        if !spec.methods.contains(&selector) {
            return Err(message_err(ArmonizadorError::UnknownSelector(selector.to_string())));
        }
        let value = parse_float_arg(selector, args).map_err(message_err)?;

        let slot = self.instances.get_mut(&id).ok_or(RuntimeError::UnknownInstance(id))?;
        slot.object.handle(Message::new(selector, value));
        Ok(())
    }

    /// Deliver a textual message such as `"modo 3"`; a trailing `;` is allowed
    pub fn send_text(&mut self, id: InstanceId, text: &str) -> Result<(), RuntimeError> {
        let text = text.trim().trim_end_matches(';');
        let mut atoms = text.split_whitespace();
        let Some(selector) = atoms.next() else {
            return Ok(());
        };
        let args: Vec<&str> = atoms.collect();
        self.send(id, selector, &args)
    }

    /// Current logical time in milliseconds
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Logical time at which an instance's clock fires next
    pub fn next_tick(&self, id: InstanceId) -> Option<f64> {
        let slot = self.instances.get(&id)?;
        self.scheduler.deadline(slot.clock)
    }

    /// Advance logical time by `ms`, firing due clocks in order.
    /// Returns the number of ticks delivered.
    ///
    /// A non-finite or negative `ms` fires nothing; longer spans than
    /// [`MAX_ADVANCE_MS`] are cut to it.
    pub fn advance(&mut self, ms: f64) -> usize {
        if !ms.is_finite() {
            warn!(ms, "ignoring non-finite advance");
            return 0;
        }
        if ms > MAX_ADVANCE_MS {
            warn!(ms, max = MAX_ADVANCE_MS, "advance too long, saturating");
        }
        let target = self.scheduler.now() + ms.clamp(0.0, MAX_ADVANCE_MS);
        let mut fired = 0;
        while let Some(clock) = self.scheduler.pop_due(target) {
            let Some(slot) = self.clock_owners.get(&clock).and_then(|id| self.instances.get_mut(id)) else {
                continue;
            };
            slot.object.tick();
            fired += 1;
        }
        self.scheduler.advance_to(target);
        debug!(now = self.scheduler.now(), fired, "runtime advanced");
        fired
    }

    pub fn state(&self, id: InstanceId) -> Result<&HarmonizerState, RuntimeError> {
        self.instances
            .get(&id)
            .map(|slot| slot.object.state())
            .ok_or(RuntimeError::UnknownInstance(id))
    }

    /// Drain the values emitted so far
    pub fn take_events(&self) -> Vec<OutletEvent> {
        self.events_rx.try_iter().collect()
    }
}

fn parse_float_arg(selector: Selector, args: &[&str]) -> Result<f32, ArmonizadorError> {
    if args.len() > 1 {
        warn!(%selector, extra = args.len() - 1, "ignoring extra arguments");
    }
    match args.first() {
        None => Ok(0.0),
        Some(atom) => atom
            .parse::<f32>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| ArmonizadorError::BadArguments {
                selector: selector.to_string(),
                reason: format!("expected a float, got '{atom}'"),
            }),
    }
}
