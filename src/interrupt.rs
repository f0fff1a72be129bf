use crate::bit;
use crate::io_map;
use crate::memory::DataMemory;

/// Capability a pin-change port fires into when it detects a masked,
/// enabled pin transition. `Cpu` is the only implementor; keeping this as a
/// trait rather than a raw function pointer/vtable lets the monitor stay
/// decoupled from `Cpu`'s other responsibilities without any cyclic
/// ownership between ports and the CPU.
pub trait InterruptSink {
    /// Whether the global interrupt-enable flag currently permits firing.
    fn interrupt_enabled(&self) -> bool;

    /// Dispatch to `vector`, recording that `flag_bit` was the cause.
    fn fire(&mut self, vector: u8, flag_bit: u8);
}

/// One monitored I/O port (B, C, or D). Everything but `last_value` is
/// fixed at construction time.
pub struct PortDescriptor {
    pin_reg: u16,
    mask_reg: u16,
    flag_bit: u8,
    interrupt_vector: u8,
    last_value: u8,
}

impl PortDescriptor {
    pub const fn new(pin_reg: u16, mask_reg: u16, flag_bit: u8, interrupt_vector: u8) -> Self {
        Self { pin_reg, mask_reg, flag_bit, interrupt_vector, last_value: 0 }
    }

    pub fn reset(&mut self) {
        self.last_value = 0;
    }

    /// Samples the port's PIN register and, for every bit whose level
    /// changed since the last sample, checks whether that pin is masked to
    /// raise an interrupt. Always records the PCIFR flag bit for a masked,
    /// changed pin; only calls into `sink` when the global interrupt enable
    /// allows it. Bits are evaluated in order 0..8.
    pub fn poll(&mut self, data: &mut DataMemory, sink: &mut impl InterruptSink) {
        let current = data.read(self.pin_reg);
        if current == self.last_value {
            return;
        }

        let mask = data.read(self.mask_reg);
        for i in 0..8u8 {
            if bit::read(current, i) != bit::read(self.last_value, i) && bit::read(mask, i) {
                self.request_interrupt(data, sink);
            }
        }

        self.last_value = current;
    }

    fn request_interrupt(&self, data: &mut DataMemory, sink: &mut impl InterruptSink) {
        let flags = data.read(io_map::PCIFR);
        let _ = data.write(io_map::PCIFR, bit::set(flags, self.flag_bit));

        if sink.interrupt_enabled() {
            sink.fire(self.interrupt_vector, self.flag_bit);
        }
    }
}

/// Owns the three port descriptors and drives a monitor pass once per CPU
/// state advance. `Cpu` composes one of these rather than the ports
/// reaching back into the CPU themselves.
pub struct PinChangeMonitor {
    pub port_b: PortDescriptor,
    pub port_c: PortDescriptor,
    pub port_d: PortDescriptor,
}

impl PinChangeMonitor {
    pub fn new(pcint0_vect: u8, pcint1_vect: u8, pcint2_vect: u8) -> Self {
        Self {
            port_b: PortDescriptor::new(io_map::PINB, io_map::PCMSK0, io_map::PCIF0, pcint0_vect),
            port_c: PortDescriptor::new(io_map::PINC, io_map::PCMSK1, io_map::PCIF1, pcint1_vect),
            port_d: PortDescriptor::new(io_map::PIND, io_map::PCMSK2, io_map::PCIF2, pcint2_vect),
        }
    }

    pub fn reset(&mut self) {
        self.port_b.reset();
        self.port_c.reset();
        self.port_d.reset();
    }

    pub fn poll(&mut self, data: &mut DataMemory, sink: &mut impl InterruptSink) {
        self.port_b.poll(data, sink);
        self.port_c.poll(data, sink);
        self.port_d.poll(data, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        enabled: bool,
        fired: Vec<(u8, u8)>,
    }

    impl InterruptSink for RecordingSink {
        fn interrupt_enabled(&self) -> bool {
            self.enabled
        }

        fn fire(&mut self, vector: u8, flag_bit: u8) {
            self.fired.push((vector, flag_bit));
        }
    }

    #[test]
    fn fires_when_masked_bit_changes_and_interrupts_enabled() {
        let mut data = DataMemory::new();
        let mut port = PortDescriptor::new(io_map::PINB, io_map::PCMSK0, io_map::PCIF0, 42);
        data.write(io_map::PCMSK0, 0b0010_0000).unwrap(); // bit 5 masked in

        let mut sink = RecordingSink { enabled: true, fired: vec![] };
        port.poll(&mut data, &mut sink); // baseline sample, no change yet

        data.write(io_map::PINB, 0b0010_0000).unwrap();
        port.poll(&mut data, &mut sink);

        assert_eq!(sink.fired, vec![(42, io_map::PCIF0)]);
        assert!(bit::read(data.read(io_map::PCIFR), io_map::PCIF0));
    }

    #[test]
    fn sets_flag_but_does_not_fire_when_globally_disabled() {
        let mut data = DataMemory::new();
        let mut port = PortDescriptor::new(io_map::PINB, io_map::PCMSK0, io_map::PCIF0, 42);
        data.write(io_map::PCMSK0, 0b0010_0000).unwrap();

        let mut sink = RecordingSink { enabled: false, fired: vec![] };
        port.poll(&mut data, &mut sink);
        data.write(io_map::PINB, 0b0010_0000).unwrap();
        port.poll(&mut data, &mut sink);

        assert!(sink.fired.is_empty());
        assert!(bit::read(data.read(io_map::PCIFR), io_map::PCIF0));
    }

    #[test]
    fn unmasked_pin_change_is_ignored_entirely() {
        let mut data = DataMemory::new();
        let mut port = PortDescriptor::new(io_map::PINB, io_map::PCMSK0, io_map::PCIF0, 42);
        // PCMSK0 left at 0: nothing is masked in.

        let mut sink = RecordingSink { enabled: true, fired: vec![] };
        port.poll(&mut data, &mut sink);
        data.write(io_map::PINB, 0b0000_0001).unwrap();
        port.poll(&mut data, &mut sink);

        assert!(sink.fired.is_empty());
        assert_eq!(data.read(io_map::PCIFR), 0);
    }

    #[test]
    fn multiple_changed_masked_bits_fire_once_each_in_bit_order() {
        let mut data = DataMemory::new();
        let mut port = PortDescriptor::new(io_map::PINB, io_map::PCMSK0, io_map::PCIF0, 7);
        data.write(io_map::PCMSK0, 0b0000_0011).unwrap();

        let mut sink = RecordingSink { enabled: true, fired: vec![] };
        port.poll(&mut data, &mut sink);
        data.write(io_map::PINB, 0b0000_0011).unwrap();
        port.poll(&mut data, &mut sink);

        assert_eq!(sink.fired, vec![(7, io_map::PCIF0), (7, io_map::PCIF0)]);
    }
}
