use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reservoir_percentiles::exact_percentile;
use reservoir_percentiles::Reservoir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simulate data points (e.g., latencies, sizes)
    let mut rng = StdRng::seed_from_u64(42);
    let uniform = Uniform::new(0_i64, 100_000);
    let values: Vec<i64> = (0..200_000).map(|_| uniform.sample(&mut rng)).collect();

    let ranks: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
    let exact: Vec<i64> = ranks
        .iter()
        .map(|&rank| exact_percentile(&values, rank))
        .collect();

    for capacity in [100, 1_000, 10_000] {
        let mut reservoir = Reservoir::with_capacity(capacity);
        reservoir.extend(values.iter().copied(), &mut rng);
        let estimates = reservoir.percentiles(&ranks)?;

        let mut cumulative_error = 0.0;
        for ((&rank, &estimate), &expected) in ranks.iter().zip(&estimates).zip(&exact) {
            let error = (estimate - expected).abs() as f64;
            cumulative_error += error;

            println!(
                "capacity: {}, p: {:.2}, estimated: {}, expected: {}, error: {}",
                capacity, rank, estimate, expected, error
            );
        }

        println!(
            "capacity: {}, average error: {:.3}% of range",
            capacity,
            cumulative_error / ranks.len() as f64 / 100_000.0 * 100.0
        );
    }

    Ok(())
}
