use std::path::Path;
use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

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

    fn next_range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as u32
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Listing {
    time: NaiveDate,
    region: String,
    floor: u32,
    rooms: u32,
    square_m: f64,
    price_per_square_m: f64,
}

/// Regions with a base sale price per square meter and a relative weight
/// for how many listings they produce.
const REGIONS: [(&str, f64, u32); 5] = [
    ("Centre", 2200.0, 8),
    ("Teika", 1600.0, 6),
    ("Purvciems", 1250.0, 5),
    ("Agenskalns", 1400.0, 4),
    ("Imanta", 1100.0, 3),
];

/// Rent prices sit around 0.7% of sale prices per month.
const RENT_FACTOR: f64 = 0.007;

fn generate_category(rng: &mut SimpleRng, start: NaiveDate, days: u64, rent: bool) -> Vec<Listing> {
    let mut listings = Vec::new();

    for day in 0..days {
        let time = start + chrono::Days::new(day);
        // Mild upward price drift over the generated period.
        let drift = 1.0 + 0.10 * day as f64 / days as f64;

        for (region, base_sale, weight) in REGIONS {
            let n = rng.next_range(weight, weight * 3) as usize;
            for _ in 0..n {
                let floor = rng.next_range(1, 23);
                let rooms = rng.next_range(1, 6);
                let square_m = (rooms as f64 * 22.0 + rng.gauss(8.0, 6.0)).clamp(14.0, 250.0);
                let base = if rent { base_sale * RENT_FACTOR } else { base_sale };
                let price = (base * drift * (1.0 + rng.gauss(0.0, 0.12))).max(base * 0.5);
                listings.push(Listing {
                    time,
                    region: region.to_string(),
                    floor,
                    rooms,
                    square_m,
                    price_per_square_m: price,
                });
            }
        }
    }

    listings
}

fn write_shard(path: &Path, listings: &[Listing]) {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let time_array = Date32Array::from(
        listings
            .iter()
            .map(|l| l.time.signed_duration_since(epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let region_array = StringArray::from(
        listings.iter().map(|l| l.region.as_str()).collect::<Vec<_>>(),
    );
    let floor_array =
        Int64Array::from(listings.iter().map(|l| l.floor as i64).collect::<Vec<_>>());
    let rooms_array =
        Int64Array::from(listings.iter().map(|l| l.rooms as i64).collect::<Vec<_>>());
    let square_array =
        Float64Array::from(listings.iter().map(|l| l.square_m).collect::<Vec<_>>());
    let price_array = Float64Array::from(
        listings
            .iter()
            .map(|l| l.price_per_square_m)
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("time", DataType::Date32, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("floor", DataType::Int64, false),
        Field::new("rooms", DataType::Int64, false),
        Field::new("square_m", DataType::Float64, false),
        Field::new("price_per_square_m", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(time_array),
            Arc::new(region_array),
            Arc::new(floor_array),
            Arc::new(rooms_array),
            Arc::new(square_array),
            Arc::new(price_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {} listings to {}", listings.len(), path.display());
}

fn main() {
    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

    // Two and a half years of daily snapshots so the year-over-year
    // charts have something to look back on.
    let days: u64 = 912;
    let sale = generate_category(&mut rng, start, days, false);
    let rent = generate_category(&mut rng, start, days, true);

    // Split each category into a historical shard and a current one,
    // mirroring how the snapshots accumulate in production.
    let cutoff = start + chrono::Days::new(365);
    let (sale_hist, sale_cur): (Vec<_>, Vec<_>) = sale.into_iter().partition(|l| l.time < cutoff);
    let (rent_hist, rent_cur): (Vec<_>, Vec<_>) = rent.into_iter().partition(|l| l.time < cutoff);

    write_shard(&out_dir.join("sale_data_hist_1.parquet"), &sale_hist);
    write_shard(&out_dir.join("sale_data.parquet"), &sale_cur);
    write_shard(&out_dir.join("rent_data_hist_1.parquet"), &rent_hist);
    write_shard(&out_dir.join("rent_data.parquet"), &rent_cur);
}
