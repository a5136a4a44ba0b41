//! Press/drag/release recognition for the card area.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    LongPress,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// Minimum travel, in pixels, for a swipe.
    pub swipe_threshold: f32,
    pub long_press: Duration,
    /// Travel beyond this cancels a pending long press.
    pub move_tolerance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 40.0,
            long_press: Duration::from_millis(500),
            move_tolerance: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: (f32, f32),
    last: (f32, f32),
    at: Instant,
    moved: bool,
    long_fired: bool,
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    pub fn press(&mut self, x: f32, y: f32, now: Instant) {
        self.press = Some(Press {
            start: (x, y),
            last: (x, y),
            at: now,
            moved: false,
            long_fired: false,
        });
    }

    pub fn moved(&mut self, x: f32, y: f32) {
        let tolerance = self.config.move_tolerance;
        if let Some(press) = self.press.as_mut() {
            press.last = (x, y);
            let (dx, dy) = (x - press.start.0, y - press.start.1);
            if dx.hypot(dy) > tolerance {
                press.moved = true;
            }
        }
    }

    /// Fires [`Gesture::LongPress`] once a press has been held still long enough.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        let press = self.press.as_mut()?;
        if press.moved || press.long_fired {
            return None;
        }
        if now.duration_since(press.at) >= self.config.long_press {
            press.long_fired = true;
            return Some(Gesture::LongPress);
        }
        None
    }

    pub fn release(&mut self, now: Instant) -> Option<Gesture> {
        if self.poll(now).is_some() {
            self.press = None;
            return Some(Gesture::LongPress);
        }
        let press = self.press.take()?;
        if press.long_fired {
            return None;
        }

        let threshold = self.config.swipe_threshold;
        let dx = press.last.0 - press.start.0;
        let dy = press.last.1 - press.start.1;

        if dx.abs() < threshold && dy.abs() < threshold {
            return Some(Gesture::Tap);
        }
        if dx.abs() > dy.abs() {
            if dx < -threshold {
                Some(Gesture::SwipeLeft)
            } else if dx > threshold {
                Some(Gesture::SwipeRight)
            } else {
                None
            }
        } else if dy < -threshold {
            Some(Gesture::SwipeUp)
        } else if dy > threshold {
            Some(Gesture::SwipeDown)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn short_press_is_a_tap() {
        let t0 = Instant::now();
        let mut g = GestureTracker::default();
        g.press(100.0, 100.0, t0);
        g.moved(110.0, 95.0);
        assert_eq!(g.release(t0 + ms(120)), Some(Gesture::Tap));
    }

    #[test]
    fn horizontal_and_vertical_swipes() {
        let t0 = Instant::now();
        let mut g = GestureTracker::default();

        g.press(200.0, 100.0, t0);
        g.moved(120.0, 110.0);
        assert_eq!(g.release(t0 + ms(100)), Some(Gesture::SwipeLeft));

        g.press(100.0, 100.0, t0);
        g.moved(160.0, 100.0);
        assert_eq!(g.release(t0 + ms(100)), Some(Gesture::SwipeRight));

        g.press(100.0, 200.0, t0);
        g.moved(105.0, 100.0);
        assert_eq!(g.release(t0 + ms(100)), Some(Gesture::SwipeUp));

        g.press(100.0, 100.0, t0);
        g.moved(100.0, 180.0);
        assert_eq!(g.release(t0 + ms(100)), Some(Gesture::SwipeDown));
    }

    #[test]
    fn long_press_fires_once_and_swallows_release() {
        let t0 = Instant::now();
        let mut g = GestureTracker::default();
        g.press(50.0, 50.0, t0);
        assert_eq!(g.poll(t0 + ms(300)), None);
        assert_eq!(g.poll(t0 + ms(520)), Some(Gesture::LongPress));
        assert_eq!(g.poll(t0 + ms(900)), None);
        assert_eq!(g.release(t0 + ms(950)), None);
    }

    #[test]
    fn movement_cancels_long_press() {
        let t0 = Instant::now();
        let mut g = GestureTracker::default();
        g.press(50.0, 50.0, t0);
        g.moved(65.0, 50.0);
        assert_eq!(g.poll(t0 + ms(700)), None);
        assert_eq!(g.release(t0 + ms(800)), Some(Gesture::Tap));
    }
}
