use linear_buckets::logger::initialize_logger;
use linear_buckets::HashTable;
use log::{info, warn};
use std::time::Instant;

const DEFAULT_CAPACITY: isize = 500000;
const DEFAULT_SAMPLE_SIZE: usize = 1000000;
const MEASURED_LOOKUPS: usize = 1000;

fn arg_or<T: std::str::FromStr>(position: usize, default: T) -> T {
    std::env::args()
        .nth(position)
        .and_then(|arg| arg.parse::<T>().ok())
        .unwrap_or(default)
}

fn main() {
    initialize_logger();

    let capacity: isize = arg_or(1, DEFAULT_CAPACITY);
    let sample_size: usize = arg_or(2, DEFAULT_SAMPLE_SIZE);

    let samples: Vec<u64> = (0..sample_size).map(|_| rand::random::<u64>()).collect();

    let mut h: HashTable<u64, u64> = match HashTable::new(capacity) {
        Ok(h) => h,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let mut rejected: usize = 0;
    let now: Instant = Instant::now();
    for key in samples.iter() {
        if h.put(*key, *key).is_err() {
            rejected += 1;
        }
    }
    let elapsed: usize = now.elapsed().as_nanos() as usize;

    println!("Initial capacity {} actual capacity {}", capacity, h.capacity());
    println!("Initial entries {} actual entries {}", sample_size, h.size());
    println!("Duplicate keys rejected {}", rejected);
    println!("Load factor {}", h.load_factor());
    println!("Avg time to insert {}", elapsed as f64 / sample_size as f64);

    let now: Instant = Instant::now();
    for key in samples.iter() {
        if h.get(key).is_err() {
            warn!("failed to get key {}", key);
        }
    }
    let elapsed: usize = now.elapsed().as_nanos() as usize;

    println!("Avg time to lookup {}", elapsed as f64 / sample_size as f64);

    benchmarking::warm_up();
    let measured = benchmarking::measure_function(|measurer| {
        for key in samples.iter().take(MEASURED_LOOKUPS) {
            measurer.measure(|| h.contains_key(key));
        }
    });
    match measured {
        Ok(result) => println!("Measured time per lookup {:?}", result.elapsed()),
        Err(_) => warn!("lookup measurement failed"),
    }

    let now: Instant = Instant::now();
    for key in samples.iter() {
        let _ = h.remove(key);
    }
    let elapsed: usize = now.elapsed().as_nanos() as usize;

    println!("Initial capacity {} actual capacity {}", capacity, h.capacity());
    println!("Initial entries {} actual entries {}", sample_size, h.size());
    println!("Avg time to delete {}", elapsed as f64 / sample_size as f64);
    info!("finished with {} entries left", h.size());
}
