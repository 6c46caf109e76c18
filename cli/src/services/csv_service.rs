use crate::models::{Bar, RawBar};
use crate::utils::{Logger, Timer};
use std::fs;
use std::path::Path;

/// Loads daily bars from CSV files with a `date,open,high,low,close,volume` header
pub struct BarCsvService {
    logger: Logger,
}

impl Default for BarCsvService {
    fn default() -> Self {
        Self::new()
    }
}

impl BarCsvService {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("CSV_SERVICE"),
        }
    }

    pub fn load_bars(&self, path: &Path) -> anyhow::Result<Vec<Bar>> {
        let timer = Timer::start("csv load");
        let content = fs::read_to_string(path)?;
        let bars = self.parse_csv_content(&content)?;

        self.logger.info(&format!(
            "Loaded {} bars from {} ({:.1}ms)",
            bars.len(),
            path.display(),
            timer.elapsed_ms()
        ));
        Ok(bars)
    }

    /// Parse bars and sort them by date, later duplicates win
    pub fn parse_csv_content(&self, content: &str) -> anyhow::Result<Vec<Bar>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars: Vec<Bar> = Vec::new();

        for result in reader.deserialize() {
            let raw: RawBar = result?;
            bars.push(raw.to_bar()?);
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                *earlier = later.clone();
                true
            } else {
                false
            }
        });

        if bars.is_empty() {
            self.logger.warn("CSV contained no bars");
        }
        Ok(bars)
    }
}
