//! Channel-backed outlet

use armonizador_core::Outlet;
use crossbeam_channel::Sender;
use tracing::warn;

use crate::runtime::InstanceId;

/// A value emitted by an instance's outlet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutletEvent {
    pub instance: InstanceId,
    pub value: f32,
}

/// Forwards every emitted value to the runtime's event channel
#[derive(Debug, Clone)]
pub struct ChannelOutlet {
    instance: InstanceId,
    tx: Sender<OutletEvent>,
}

impl ChannelOutlet {
    pub fn new(instance: InstanceId, tx: Sender<OutletEvent>) -> Self {
        Self { instance, tx }
    }
}

impl Outlet for ChannelOutlet {
    fn float(&mut self, value: f32) {
        if self.tx.send(OutletEvent { instance: self.instance, value }).is_err() {
            warn!(instance = %self.instance, value, "outlet receiver gone, dropping value");
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn test_values_arrive_in_order() {
        let (tx, rx) = unbounded();
        let mut outlet = ChannelOutlet::new(InstanceId::new(3), tx);
        outlet.float(1.0);
        outlet.float(2.0);
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                OutletEvent { instance: InstanceId::new(3), value: 1.0 },
                OutletEvent { instance: InstanceId::new(3), value: 2.0 },
            ]
        );
    }

    #[test]
    fn test_closed_channel_is_not_fatal() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut outlet = ChannelOutlet::new(InstanceId::new(0), tx);
        outlet.float(7.0);
    }
}
