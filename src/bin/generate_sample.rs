use std::path::PathBuf;

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const FIRST_NAMES: [&str; 6] = ["John", "Mary", "William", "Anna", "Thomas", "Elizabeth"];
const SURNAMES: [&str; 6] = ["Smith", "Brown", "Johnson", "Andersson", "Kelly", "Williams"];
const PORTS: [&str; 3] = ["S", "C", "Q"];

/// Writes a Titanic-like passenger CSV with deliberately messy headers and
/// gaps, for trying the dashboard without the real dataset.
fn main() -> Result<()> {
    let output_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("titanic_sample.csv"));
    let n_passengers = 300;
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record([
        "PassengerId",
        "survived",
        " PCLASS ",
        "Name",
        "sex",
        " Age",
        "SibSp",
        "Parch",
        "Ticket",
        "Fare",
        " cabin ",
        "embarked",
    ])?;

    for id in 1..=n_passengers {
        let pclass: u8 = match rng.next_f64() {
            p if p < 0.24 => 1,
            p if p < 0.45 => 2,
            _ => 3,
        };
        let female = rng.chance(0.35);
        let sex = match (female, rng.chance(0.1)) {
            (true, false) => "female",
            (true, true) => "FEMALE",
            (false, false) => "male",
            (false, true) => "Male",
        };

        // Women and first class fared better.
        let p_survive = match (female, pclass) {
            (true, 1) => 0.95,
            (true, 2) => 0.9,
            (true, _) => 0.5,
            (false, 1) => 0.37,
            (false, 2) => 0.16,
            (false, _) => 0.14,
        };
        let survived = u8::from(rng.chance(p_survive));

        let age = if rng.chance(0.2) {
            String::new()
        } else {
            let mean = [38.0, 30.0, 25.0][usize::from(pclass - 1)];
            format!("{:.0}", rng.gauss(mean, 13.0).clamp(0.5, 80.0))
        };
        let fare_base = [84.0, 20.0, 13.0][usize::from(pclass - 1)];
        let fare = format!("{:.2}", (fare_base * (1.0 + rng.gauss(0.0, 0.5))).max(4.0));
        let cabin = if pclass == 1 && rng.chance(0.8) {
            format!("C{}", rng.next_u64() % 120)
        } else {
            String::new()
        };
        let embarked = if rng.chance(0.01) {
            ""
        } else {
            *rng.pick(&PORTS)
        };
        let name = format!("{}, {}", rng.pick(&SURNAMES), rng.pick(&FIRST_NAMES));

        writer.write_record([
            id.to_string(),
            survived.to_string(),
            pclass.to_string(),
            name,
            sex.to_string(),
            age,
            (rng.next_u64() % 3).to_string(),
            (rng.next_u64() % 3).to_string(),
            format!("{}", 100_000 + rng.next_u64() % 900_000),
            fare,
            cabin,
            embarked.to_string(),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {n_passengers} passengers to {}",
        output_path.display()
    );
    Ok(())
}
