use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Deterministic PRNG (splitmix64)
struct SplitMix {
    state: u64,
}

impl SplitMix {
    fn new(seed: u64) -> Self {
        SplitMix { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

struct CountRow {
    part: String,
    description: &'static str,
    branch: &'static str,
    start: i64,
    end: i64,
    planner: &'static str,
    /// Written as unparseable text to exercise data-quality warnings.
    corrupt: bool,
}

impl CountRow {
    fn difference(&self) -> i64 {
        self.end - self.start
    }

    fn percent_change(&self) -> f64 {
        if self.start == 0 {
            0.0
        } else {
            (self.difference() as f64 / self.start as f64 * 10_000.0).round() / 100.0
        }
    }
}

const DATE: &str = "2024-03-31";

fn main() -> Result<()> {
    let mut rng = SplitMix::new(42);

    let branches = ["North", "South", "East", "West", "Central"];
    let planners = ["Avery", "Jordan", "Sam"];
    let descriptions = ["Hex bolt M8", "Washer 10mm", "Bearing 6204", "Gasket kit", "Fuse 15A", "Hose clamp"];

    let mut rows = Vec::new();
    for i in 0..40u64 {
        let part = format!("PN-{:04}", 1000 + i * 7);
        let description = descriptions[(i as usize) % descriptions.len()];
        let planner = planners[rng.below(planners.len() as u64) as usize];
        // Most parts live at one branch; about a third are stocked at several.
        let locations = if rng.below(3) == 0 { 2 + rng.below(3) as usize } else { 1 };
        let first = rng.below(branches.len() as u64) as usize;
        let base = 20 + rng.below(200) as i64;
        for k in 0..locations {
            let start = base + rng.below(30) as i64;
            let drift = rng.below(41) as i64 - 20;
            rows.push(CountRow {
                part: part.clone(),
                description,
                branch: branches[(first + k) % branches.len()],
                start,
                end: (start + drift).max(0),
                planner,
                corrupt: rng.below(50) == 0,
            });
        }
    }

    write_csv("sample_counts.csv", &rows)?;
    write_parquet("sample_counts.parquet", &rows)?;

    println!("Wrote {} count rows to sample_counts.csv and sample_counts.parquet", rows.len());
    Ok(())
}

fn write_csv(path: &str, rows: &[CountRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Date", "Part", "Description", "Branch", "StartCount", "EndCount", "Difference", "Variance", "Planner",
    ])?;
    for r in rows {
        let difference = if r.corrupt { "n/a".to_string() } else { r.difference().to_string() };
        writer.write_record([
            DATE.to_string(),
            r.part.clone(),
            r.description.to_string(),
            r.branch.to_string(),
            r.start.to_string(),
            r.end.to_string(),
            difference,
            r.percent_change().to_string(),
            r.planner.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[CountRow]) -> Result<()> {
    let text = |f: fn(&CountRow) -> String| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let columns: Vec<ArrayRef> = vec![
        text(|_| DATE.to_string()),
        text(|r| r.part.clone()),
        text(|r| r.description.to_string()),
        text(|r| r.branch.to_string()),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.start).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.end).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(
            rows.iter()
                .map(|r| (!r.corrupt).then(|| r.difference()))
                .collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.percent_change()).collect::<Vec<_>>())),
        text(|r| r.planner.to_string()),
    ];

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Utf8, false),
        Field::new("Part", DataType::Utf8, false),
        Field::new("Description", DataType::Utf8, false),
        Field::new("Branch", DataType::Utf8, false),
        Field::new("StartCount", DataType::Int64, false),
        Field::new("EndCount", DataType::Int64, false),
        Field::new("Difference", DataType::Int64, true),
        Field::new("Variance", DataType::Float64, false),
        Field::new("Planner", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
