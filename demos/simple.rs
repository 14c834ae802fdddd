use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reservoir_percentiles::Reservoir;
use reservoir_percentiles::Sample;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simulate request latencies in microseconds, with a slow tail
    let mut rng = StdRng::seed_from_u64(42);
    let fast = Uniform::new(200, 2_000);
    let slow = Uniform::new(2_000, 50_000);
    let tail = Uniform::new(0.0, 1.0);

    let mut reservoir = Reservoir::<Sample>::new();
    for _ in 0..1_000_000 {
        let latency = if tail.sample(&mut rng) < 0.02 {
            slow.sample(&mut rng)
        } else {
            fast.sample(&mut rng)
        };
        reservoir.ingest(latency, &mut rng);
    }

    let ranks = [0.5, 0.9, 0.99, 1.0];
    let estimates = reservoir.percentiles(&ranks)?;
    for (rank, estimate) in ranks.iter().zip(&estimates) {
        println!("estimated p{}: {}us", rank * 100.0, estimate);
    }

    println!("items seen: {}", reservoir.count_seen());
    println!("samples retained: {}", reservoir.len());
    println!(
        "retention probability per item: {:.5}",
        reservoir.sampling_probability()
    );

    Ok(())
}
