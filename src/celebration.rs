use rand::Rng;

const SPARK_SYMBOLS: [char; 5] = ['*', '+', '✦', '·', '✧'];
const SPARK_COUNT: usize = 30;
const GRAVITY: f64 = 12.0;

/// One spark thrown out from the centre of the results screen
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Spark {
    fn random(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-6.0..-1.0),
            symbol: SPARK_SYMBOLS[rng.gen_range(0..SPARK_SYMBOLS.len())],
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.5),
        }
    }

    /// Advance by `dt` seconds; false once the spark has burnt out
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }

    /// 1.0 when fresh, 0.0 when about to vanish
    pub fn brightness(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Short burst shown when a run beats the previous best
#[derive(Debug)]
pub struct Celebration {
    pub sparks: Vec<Spark>,
    pub is_active: bool,
    pub elapsed: f64,
    pub duration: f64,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            sparks: Vec::new(),
            is_active: false,
            elapsed: 0.0,
            duration: 2.5,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.width = width as f64;
        self.height = height as f64;
        self.elapsed = 0.0;
        self.is_active = true;

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.sparks = (0..SPARK_COUNT)
            .map(|_| Spark::random(cx, cy, &mut rng))
            .collect();
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.sparks.clear();
    }

    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.stop();
            return;
        }

        let (w, h) = (self.width, self.height);
        self.sparks
            .retain_mut(|s| s.update(dt) && s.x >= 0.0 && s.x < w && s.y < h);
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
