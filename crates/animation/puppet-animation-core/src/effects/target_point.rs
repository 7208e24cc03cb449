/// Smoothed drag target in normalized `[-1, 1]` space.
///
/// The face point accelerates toward the target with a bounded velocity and
/// brakes so it lands without overshoot.
#[derive(Clone, Debug, Default)]
pub struct TargetPoint {
    target_x: f32,
    target_y: f32,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    user_time: f32,
    last_time: Option<f32>,
}

const FRAME_RATE: f32 = 30.0;
const EPSILON: f32 = 0.01;
const FACE_PARAM_MAX_V: f32 = 4.0;
const TIME_TO_MAX_SPEED: f32 = 0.15;

impl TargetPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, x: f32, y: f32) {
        self.target_x = x.clamp(-1.0, 1.0);
        self.target_y = y.clamp(-1.0, 1.0);
    }

    pub fn target(&self) -> (f32, f32) {
        (self.target_x, self.target_y)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn update(&mut self, dt: f32) {
        self.user_time += dt;
        let Some(last) = self.last_time else {
            self.last_time = Some(self.user_time);
            return;
        };
        let max_v = FACE_PARAM_MAX_V / FRAME_RATE;
        let time_weight = (self.user_time - last) * FRAME_RATE;
        self.last_time = Some(self.user_time);

        let frames_to_max_speed = TIME_TO_MAX_SPEED * FRAME_RATE;
        let max_a = time_weight * max_v / frames_to_max_speed;

        let dx = self.target_x - self.x;
        let dy = self.target_y - self.y;
        if dx.abs() <= EPSILON && dy.abs() <= EPSILON {
            return;
        }
        let d = (dx * dx + dy * dy).sqrt();
        let (vx, vy) = (max_v * dx / d, max_v * dy / d);

        let (mut ax, mut ay) = (vx - self.vx, vy - self.vy);
        let a = (ax * ax + ay * ay).sqrt();
        if a > max_a && a > 0.0 {
            ax *= max_a / a;
            ay *= max_a / a;
        }
        self.vx += ax;
        self.vy += ay;

        // Brake so the point can stop within the remaining distance.
        let brake_v = 0.5 * ((max_a * max_a + 8.0 * max_a * d).sqrt() - max_a);
        let cur_v = (self.vx * self.vx + self.vy * self.vy).sqrt();
        if cur_v > brake_v && cur_v > 0.0 {
            self.vx *= brake_v / cur_v;
            self.vy *= brake_v / cur_v;
        }
        self.x += self.vx;
        self.y += self.vy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_without_leaving_range() {
        let mut tp = TargetPoint::new();
        tp.set(5.0, -0.5);
        assert_eq!(tp.target(), (1.0, -0.5));
        for _ in 0..240 {
            tp.update(1.0 / 60.0);
            assert!(tp.x() <= 1.0 + 1e-3);
        }
        assert!((tp.x() - 1.0).abs() < 0.05);
        assert!((tp.y() + 0.5).abs() < 0.05);

        tp.set(0.0, 0.0);
        for _ in 0..240 {
            tp.update(1.0 / 60.0);
        }
        assert!(tp.x().abs() < 0.05 && tp.y().abs() < 0.05);
    }
}
