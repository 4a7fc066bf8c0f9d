use rand::Rng;

/// Spread applied to player-originated hits
pub const DAMAGE_VARIANCE: f32 = 0.2;

/// Roll a whole-number hit uniformly in [ceil(base*0.8), floor(base*1.2)].
pub fn calculate_damage<R: Rng>(base: f32, rng: &mut R) -> f32 {
    let base = f64::from(base.max(0.0));
    let variance = f64::from(DAMAGE_VARIANCE);
    // Rounded to shed float noise before taking ceil/floor
    let lo = ((base * (1.0 - variance) * 1e4).round() / 1e4).ceil() as i64;
    let hi = ((base * (1.0 + variance) * 1e4).round() / 1e4).floor() as i64;
    if hi <= lo {
        return hi.max(0) as f32;
    }
    rng.gen_range(lo..=hi) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_damage_range_and_uniformity() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut buckets = [0u32; 41];
        const TRIALS: u32 = 10_000;

        for _ in 0..TRIALS {
            let dmg = calculate_damage(100.0, &mut rng);
            assert_eq!(dmg.fract(), 0.0);
            assert!((80.0..=120.0).contains(&dmg), "out of range: {}", dmg);
            buckets[(dmg as usize) - 80] += 1;
        }

        // 41 outcomes, ~244 each
        let expected = TRIALS as f32 / 41.0;
        for (i, count) in buckets.iter().enumerate() {
            let ratio = *count as f32 / expected;
            assert!((0.6..1.4).contains(&ratio), "value {} seen {} times", i + 80, count);
        }
        let lower: u32 = buckets[..20].iter().sum();
        let upper: u32 = buckets[21..].iter().sum();
        assert!((lower as f32 / upper as f32 - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_degenerate_bases() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(calculate_damage(0.0, &mut rng), 0.0);
        assert_eq!(calculate_damage(-5.0, &mut rng), 0.0);
        assert_eq!(calculate_damage(1.0, &mut rng), 1.0);
    }
}
