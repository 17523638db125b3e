/// Weight of a single car.
pub type Weight = i64;

/// Tractive power of a locomotive.
pub type Power = i64;
