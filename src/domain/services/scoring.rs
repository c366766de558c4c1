use crate::domain::entities::{Coordinate, Country};

const EARTH_RADIUS_KM: f64 = 6371.0;
const BASE_POINTS: u32 = 10;
const BASE_XP: u32 = 10;

pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// What the reverse-geocoding collaborator reported for a click.
#[derive(Debug, Clone, PartialEq)]
pub struct Guess {
    pub coordinate: Coordinate,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
}

impl Guess {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            country_code: None,
            country_name: None,
        }
    }

    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    pub fn with_country_name(mut self, name: impl Into<String>) -> Self {
        self.country_name = Some(name.into());
        self
    }

    pub fn names(&self, target: &Country) -> bool {
        let code_match = self
            .country_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(&target.code));
        let name_match = self
            .country_name
            .as_deref()
            .is_some_and(|name| {
                normalize_country_name(name) == normalize_country_name(&target.name)
            });
        code_match || name_match
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub target: Country,
    pub correct: bool,
    pub distance_km: f64,
    pub points: u32,
    pub xp: u32,
    pub multiplier: u32,
}

/// Lowercases, collapses whitespace and drops "the", "republic" and
/// "kingdom" decorations so "The Republic of Korea" equals "Korea".
pub fn normalize_country_name(name: &str) -> String {
    let mut normalized = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

    if let Some(rest) = normalized.strip_prefix("the ") {
        normalized = rest.to_string();
    }
    for prefix in ["republic of ", "kingdom of "] {
        normalized = normalized.replace(prefix, "");
    }
    for suffix in [" republic", " kingdom"] {
        if let Some(rest) = normalized.strip_suffix(suffix) {
            normalized = rest.to_string();
        }
    }
    normalized.trim().to_string()
}

pub fn streak_multiplier(streak: u32) -> u32 {
    match streak {
        s if s >= 5 => 3,
        s if s >= 3 => 2,
        _ => 1,
    }
}

pub fn experience(distance_km: f64, streak: u32, time_bonus: u32) -> u32 {
    let distance_bonus = if distance_km < 50.0 {
        5
    } else if distance_km < 100.0 {
        3
    } else if distance_km < 500.0 {
        1
    } else {
        0
    };
    let streak_factor = (1.0 + f64::from(streak) * 0.1).min(2.0);
    (f64::from(BASE_XP + distance_bonus + time_bonus) * streak_factor).floor() as u32
}

/// `850m`, `12,3km`, `1.234km`.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", group_thousands((km * 1000.0).round() as u64))
    } else if km < 100.0 {
        format!("{:.1}km", km).replace('.', ",")
    } else {
        format!("{}km", group_thousands(km.round() as u64))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoreboard {
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub xp: u32,
    pub total_distance_km: f64,
    pub best_distance_km: Option<f64>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds_played(&self) -> u32 {
        self.correct + self.incorrect
    }

    pub fn average_distance_km(&self) -> Option<f64> {
        match self.rounds_played() {
            0 => None,
            n => Some(self.total_distance_km / f64::from(n)),
        }
    }

    /// Scores a guess against the round's target. Practice rounds keep the
    /// streak and distance statistics but award no points or XP.
    pub fn record(&mut self, target: &Country, guess: &Guess, practice: bool) -> GuessOutcome {
        let distance_km = haversine_km(&guess.coordinate, &target.coordinate);
        let correct = guess.names(target);

        self.total_distance_km += distance_km;
        self.best_distance_km = Some(match self.best_distance_km {
            Some(best) => best.min(distance_km),
            None => distance_km,
        });

        let (points, xp, multiplier) = if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            let multiplier = streak_multiplier(self.streak);
            if practice {
                (0, 0, multiplier)
            } else {
                (BASE_POINTS * multiplier, experience(distance_km, self.streak, 0), multiplier)
            }
        } else {
            self.incorrect += 1;
            self.streak = 0;
            (0, 0, 1)
        };

        self.score += points;
        self.xp += xp;

        GuessOutcome {
            target: target.clone(),
            correct,
            distance_km,
            points,
            xp,
            multiplier,
        }
    }
}
