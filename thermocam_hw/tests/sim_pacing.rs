//! Pacing behavior of the simulated sensor against a virtual clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rstest::rstest;
use thermocam_hw::SimulatedSensor;
use thermocam_traits::{Clock, FRAME_WORDS, SensorDriver};

/// Clock that records requested sleeps instead of blocking.
#[derive(Clone)]
struct RecordingClock {
    origin: Instant,
    slept: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            slept: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> Instant {
        self.origin
    }
    fn sleep(&self, d: Duration) {
        self.slept.borrow_mut().push(d);
    }
}

#[rstest]
#[case(0b001, 1_000)]
#[case(0b101, 62)]
#[case(0b111, 15)]
fn acquisition_blocks_for_one_refresh_interval(#[case] code: u8, #[case] expect_ms: u64) {
    let clock = RecordingClock::new();
    let slept = clock.slept.clone();
    let mut sim = SimulatedSensor::with_clock(clock);
    sim.set_device_mode(0).unwrap();
    sim.set_subpage_repeat(false).unwrap();
    sim.set_refresh_rate(code).unwrap();
    sim.set_chess_mode().unwrap();

    let mut frame = [0u16; FRAME_WORDS];
    sim.acquire_frame(&mut frame, Duration::from_secs(2)).unwrap();

    let slept = slept.borrow();
    assert_eq!(slept.len(), 1);
    assert_eq!(slept[0].as_millis() as u64, expect_ms);
}
