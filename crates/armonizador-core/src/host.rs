//! Capabilities the hosting runtime lends to an instance

/// Downstream value sink; one call per emitted value
pub trait Outlet {
    fn float(&mut self, value: f32);
}

/// Re-armable one-shot timer owned by a single instance.
///
/// The host calls the owner's tick when the timer fires. Firing never
/// re-arms on its own; the owner calls [`Clock::delay`] again.
pub trait Clock {
    /// Arm the timer `ms` milliseconds from the current logical time,
    /// replacing any pending firing
    fn delay(&mut self, ms: f64);

    /// Cancel any pending firing
    fn unset(&mut self);
}
