//! Rotary encoder handler
//!
//! Decodes quadrature signals into detents. Polled from the main loop;
//! one full quadrature cycle yields one detent.

use embassy_rp::gpio::Input;
use lumin_core::Direction;

/// Encoder state machine states
#[derive(Clone, Copy, PartialEq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature encoder handler
pub struct Encoder<'d> {
    a: Input<'d>,
    b: Input<'d>,
    state: State,
    last_a: bool,
    last_b: bool,
}

impl<'d> Encoder<'d> {
    pub fn new(a: Input<'d>, b: Input<'d>) -> Self {
        let last_a = a.is_high();
        let last_b = b.is_high();

        Self {
            a,
            b,
            state: State::Idle,
            last_a,
            last_b,
        }
    }

    /// Sample the pins, returning a detent if one just completed
    ///
    /// Must run at least every couple of milliseconds to keep up with a
    /// fast turn.
    pub fn poll(&mut self) -> Option<Direction> {
        let a = self.a.is_high();
        let b = self.b.is_high();

        if a == self.last_a && b == self.last_b {
            return None;
        }

        self.last_a = a;
        self.last_b = b;
        self.decode(a, b)
    }

    /// Pins idle high. Clockwise, A falls before B:
    /// (1,1) -> (0,1) -> (0,0) -> either high, one detent.
    /// Counter-clockwise mirrors it with B falling first.
    fn decode(&mut self, a: bool, b: bool) -> Option<Direction> {
        match self.state {
            State::Idle => {
                if !a && b {
                    self.state = State::CwStep1;
                } else if a && !b {
                    self.state = State::CcwStep1;
                }
                None
            }
            State::CwStep1 | State::CcwStep1 => {
                if !a && !b {
                    self.state = if self.state == State::CwStep1 {
                        State::CwStep2
                    } else {
                        State::CcwStep2
                    };
                } else if a && b {
                    // Bounce
                    self.state = State::Idle;
                }
                None
            }
            State::CwStep2 if a || b => {
                self.state = State::Idle;
                Some(Direction::Clockwise)
            }
            State::CcwStep2 if a || b => {
                self.state = State::Idle;
                Some(Direction::CounterClockwise)
            }
            State::CwStep2 | State::CcwStep2 => None,
        }
    }
}
