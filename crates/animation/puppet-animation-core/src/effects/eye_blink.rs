use puppet_api_core::ParameterVector;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlinkState {
    First,
    Interval,
    Closing,
    Closed,
    Opening,
}

/// Periodic automatic blink overwriting the eye-open parameters.
#[derive(Clone, Debug)]
pub struct EyeBlink {
    ids: Vec<String>,
    state: BlinkState,
    user_time: f32,
    state_start: f32,
    next_blink: f32,
    pub interval: f32,
    pub closing: f32,
    pub closed: f32,
    pub opening: f32,
}

impl EyeBlink {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            state: BlinkState::First,
            user_time: 0.0,
            state_start: 0.0,
            next_blink: 0.0,
            interval: 4.0,
            closing: 0.1,
            closed: 0.05,
            opening: 0.15,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    fn schedule_next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let r: f32 = rng.gen_range(0.0..1.0);
        self.next_blink = self.user_time + r * (2.0 * self.interval - 1.0);
    }

    fn phase(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        ((self.user_time - self.state_start) / duration).min(1.0)
    }

    pub fn update<R: Rng + ?Sized>(&mut self, params: &mut ParameterVector, dt: f32, rng: &mut R) {
        self.user_time += dt;
        let value = match self.state {
            BlinkState::Closing => {
                let t = self.phase(self.closing);
                if t >= 1.0 {
                    self.state = BlinkState::Closed;
                    self.state_start = self.user_time;
                }
                1.0 - t
            }
            BlinkState::Closed => {
                if self.phase(self.closed) >= 1.0 {
                    self.state = BlinkState::Opening;
                    self.state_start = self.user_time;
                }
                0.0
            }
            BlinkState::Opening => {
                let t = self.phase(self.opening);
                if t >= 1.0 {
                    self.state = BlinkState::Interval;
                    self.schedule_next(rng);
                }
                t
            }
            BlinkState::Interval => {
                if self.next_blink < self.user_time {
                    self.state = BlinkState::Closing;
                    self.state_start = self.user_time;
                }
                1.0
            }
            BlinkState::First => {
                self.state = BlinkState::Interval;
                self.schedule_next(rng);
                1.0
            }
        };
        for id in &self.ids {
            params.set_by_id(id, value, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puppet_api_core::Parameter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn blinks_close_and_reopen() {
        let mut params = ParameterVector::new([Parameter::new("ParamEyeLOpen", 0.0, 1.0, 1.0)]);
        let mut blink = EyeBlink::new(vec!["ParamEyeLOpen".into()]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut min_seen: f32 = 1.0;
        let mut reopened = false;
        for _ in 0..(60 * 10) {
            blink.update(&mut params, 1.0 / 60.0, &mut rng);
            let v = params.value(0).unwrap();
            assert!((0.0..=1.0).contains(&v));
            min_seen = min_seen.min(v);
            if min_seen == 0.0 && v == 1.0 {
                reopened = true;
            }
        }
        assert_eq!(min_seen, 0.0);
        assert!(reopened);
    }
}
