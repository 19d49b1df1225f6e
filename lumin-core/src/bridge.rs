//! Main-loop body
//!
//! [`Bridge`] owns the single [`BridgeState`] and both link halves. The
//! firmware calls [`Bridge::tick`] once per loop iteration and
//! [`Bridge::render`] right after it. Within a tick, local input is applied
//! before any serial byte, so a user edit and the host packet that follows
//! it are always seen in that order.

use lumin_hal::{SerialRx, SerialTx};
use lumin_protocol::ValueReport;

use crate::config::BridgeConfig;
use crate::emitter;
use crate::input::InputEvent;
use crate::link::SerialLink;
use crate::state::BridgeState;
use crate::traits::RenderSink;

/// Bridge controller
pub struct Bridge<Rx, Tx> {
    state: BridgeState,
    link: SerialLink,
    rx: Rx,
    tx: Tx,
    config: BridgeConfig,
}

impl<Rx: SerialRx, Tx: SerialTx> Bridge<Rx, Tx> {
    /// Wire the bridge to a serial link
    pub fn new(rx: Rx, tx: Tx, config: BridgeConfig) -> Self {
        Self {
            state: BridgeState::new(),
            link: SerialLink::new(),
            rx,
            tx,
            config,
        }
    }

    /// Current device matrix and selection
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    /// Settings the bridge was built with
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// True once the host handshake has completed
    pub fn is_synchronized(&self) -> bool {
        self.link.is_synchronized()
    }

    /// Apply one local input event
    ///
    /// Returns the ValueReport that was sent, if any. Nothing is sent before
    /// the host has completed the handshake.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<ValueReport> {
        debug!("Input {:?}", event);
        let mut menu = self.state.navigator();
        let report = match event {
            InputEvent::TurnStep(direction) => {
                let delta = self.config.step_delta(direction.is_clockwise());
                if !menu.adjust_value(delta) {
                    return None;
                }
                let device = self.state.selected_device()?;
                ValueReport::for_device(device)
            }
            InputEvent::FastTurn => {
                menu.select_next_device();
                return None;
            }
            InputEvent::Click => menu.toggle_mute()?,
            InputEvent::ButtonPress => {
                menu.select_next_category();
                return None;
            }
        };

        if !self.link.is_synchronized() {
            trace!("Link not synchronized, report for id {} held back", report.id);
            return None;
        }
        emitter::send(&mut self.tx, &report).then_some(report)
    }

    /// Drain the serial receiver
    pub fn poll_serial(&mut self) -> usize {
        self.link.poll(&mut self.rx, &mut self.tx, &mut self.state)
    }

    /// One main-loop iteration: input first, then serial
    pub fn tick<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            self.handle_input(event);
        }
        self.poll_serial()
    }

    /// Redraw through `sink` if anything changed
    ///
    /// Returns `Ok(true)` when the sink was invoked. On error the redraw
    /// stays pending.
    pub fn render<S: RenderSink>(&mut self, sink: &mut S) -> Result<bool, S::Error> {
        if !self.state.redraw_pending() {
            return Ok(false);
        }
        sink.render(&self.state.snapshot())?;
        self.state.take_redraw();
        Ok(true)
    }

    /// Receive half of the serial link
    pub fn rx_mut(&mut self) -> &mut Rx {
        &mut self.rx
    }

    /// Transmit half of the serial link
    pub fn tx_mut(&mut self) -> &mut Tx {
        &mut self.tx
    }

    /// Release the link halves
    pub fn release(self) -> (Rx, Tx) {
        (self.rx, self.tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::traits::MenuSnapshot;
    use heapless::{Deque, Vec};
    use lumin_protocol::{Device, DeviceCategory, Packet, ACK_LINE};

    #[derive(Default)]
    struct Inbox(Deque<u8, 512>);

    impl Inbox {
        fn push(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0.push_back(b).unwrap();
            }
        }
    }

    impl SerialRx for Inbox {
        fn read_byte(&mut self) -> Option<u8> {
            self.0.pop_front()
        }
    }

    #[derive(Default)]
    struct Outbox(Vec<u8, 128>);

    impl SerialTx for Outbox {
        type Error = ();

        fn write_bytes(&mut self, data: &[u8]) -> Result<(), ()> {
            self.0.extend_from_slice(data)
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: usize,
        last: Option<(DeviceCategory, Option<u8>, usize, usize)>,
    }

    impl RenderSink for Recorder {
        type Error = ();

        fn render(&mut self, snapshot: &MenuSnapshot<'_>) -> Result<(), ()> {
            self.calls += 1;
            self.last = Some((
                snapshot.category,
                snapshot.device.map(|d| d.value),
                snapshot.position,
                snapshot.count,
            ));
            Ok(())
        }
    }

    struct Broken;

    impl RenderSink for Broken {
        type Error = ();

        fn render(&mut self, _: &MenuSnapshot<'_>) -> Result<(), ()> {
            Err(())
        }
    }

    fn bridge() -> Bridge<Inbox, Outbox> {
        Bridge::new(Inbox::default(), Outbox::default(), BridgeConfig::default())
    }

    fn synced_with(devices: &[Device]) -> Bridge<Inbox, Outbox> {
        let mut bridge = bridge();
        bridge.rx_mut().push(b"HELLO_LUMIN");
        let frame = Packet::full_sync_frame(devices).unwrap().encode_to_vec().unwrap();
        bridge.rx_mut().push(&frame);
        bridge.poll_serial();
        bridge.tx_mut().0.clear();
        bridge
    }

    fn speaker(id: u8, value: u8) -> Device {
        Device::new("Speaker", id, value, DeviceCategory::Volume)
    }

    #[test]
    fn test_handshake_acknowledged() {
        let mut bridge = bridge();
        bridge.rx_mut().push(b"HELLO_LUMIN");
        assert_eq!(bridge.poll_serial(), 11);
        assert!(bridge.is_synchronized());
        assert_eq!(&bridge.tx_mut().0[..], ACK_LINE);
    }

    #[test]
    fn test_turn_step_reports_change() {
        let mut bridge = synced_with(&[speaker(4, 50)]);
        let report = bridge
            .handle_input(InputEvent::TurnStep(Direction::Clockwise))
            .unwrap();
        assert_eq!(report.value, 55);
        assert_eq!(&bridge.tx_mut().0[..], &[0xAA, 0x04, 0x10, 4, 55, 0]);
    }

    #[test]
    fn test_turn_step_at_limit_is_silent() {
        let mut bridge = synced_with(&[speaker(4, 100)]);
        assert_eq!(
            bridge.handle_input(InputEvent::TurnStep(Direction::Clockwise)),
            None
        );
        assert!(bridge.tx_mut().0.is_empty());
    }

    #[test]
    fn test_click_mutes_and_restores() {
        let mut bridge = synced_with(&[speaker(2, 70)]);
        assert_eq!(bridge.handle_input(InputEvent::Click).map(|r| r.value), Some(0));
        assert_eq!(bridge.handle_input(InputEvent::Click).map(|r| r.value), Some(70));
    }

    #[test]
    fn test_reports_held_back_before_handshake() {
        let mut bridge = bridge();
        // Local edits still apply to whatever is cached
        bridge.state.matrix.push(speaker(1, 50)).unwrap();
        assert_eq!(
            bridge.handle_input(InputEvent::TurnStep(Direction::CounterClockwise)),
            None
        );
        assert_eq!(bridge.state().selected_device().map(|d| d.value), Some(45));
        assert!(bridge.tx_mut().0.is_empty());
    }

    #[test]
    fn test_navigation_events() {
        let mut bridge = synced_with(&[speaker(1, 10), speaker(2, 20)]);
        assert_eq!(bridge.handle_input(InputEvent::FastTurn), None);
        assert_eq!(bridge.state().selected_slot(), Some(1));
        assert_eq!(bridge.handle_input(InputEvent::ButtonPress), None);
        assert_eq!(bridge.state().active_category(), DeviceCategory::Brightness);
        assert!(bridge.tx_mut().0.is_empty());
    }

    #[test]
    fn test_tick_applies_input_before_serial() {
        let mut bridge = synced_with(&[speaker(1, 50)]);
        let update = Packet::delta_update_frame(&speaker(1, 80))
            .unwrap()
            .encode_to_vec()
            .unwrap();
        bridge.rx_mut().push(&update);

        bridge.tick([InputEvent::TurnStep(Direction::Clockwise)]);
        // The host's value lands last
        assert_eq!(bridge.state().selected_device().map(|d| d.value), Some(80));
        assert_eq!(&bridge.tx_mut().0[..], &[0xAA, 0x04, 0x10, 1, 55, 0]);
    }

    #[test]
    fn test_render_only_when_pending() {
        let mut bridge = synced_with(&[speaker(1, 50), speaker(2, 60)]);
        let mut sink = Recorder::default();

        assert_eq!(bridge.render(&mut sink), Ok(true));
        assert_eq!(sink.last, Some((DeviceCategory::Volume, Some(50), 1, 2)));
        assert_eq!(bridge.render(&mut sink), Ok(false));
        assert_eq!(sink.calls, 1);

        bridge.tick([InputEvent::FastTurn]);
        assert_eq!(bridge.render(&mut sink), Ok(true));
        assert_eq!(sink.last, Some((DeviceCategory::Volume, Some(60), 2, 2)));
    }

    #[test]
    fn test_render_failure_keeps_redraw() {
        let mut bridge = bridge();
        assert_eq!(bridge.render(&mut Broken), Err(()));
        assert!(bridge.state().redraw_pending());
    }
}
