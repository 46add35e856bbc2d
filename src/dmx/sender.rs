//! Receivers of the channel stream

/// Capability to push one channel value to a transport
pub trait DmxSender {
    fn send(&mut self, channel: u32, value: u8);
}

impl<S: DmxSender + ?Sized> DmxSender for &mut S {
    fn send(&mut self, channel: u32, value: u8) {
        (**self).send(channel, value)
    }
}

/// Sender used when no fixture is connected
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSender;

impl DmxSender for NullSender {
    fn send(&mut self, _channel: u32, _value: u8) {}
}

/// Records every pair it receives
impl DmxSender for Vec<(u32, u8)> {
    fn send(&mut self, channel: u32, value: u8) {
        self.push((channel, value));
    }
}
