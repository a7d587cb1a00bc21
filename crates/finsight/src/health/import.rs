use std::io::Read;
use std::path::Path;

use super::domain::BusinessMetrics;

#[derive(Debug)]
pub enum MetricsImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for MetricsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsImportError::Io(err) => write!(f, "failed to read metrics file: {}", err),
            MetricsImportError::Csv(err) => write!(f, "invalid metrics CSV data: {}", err),
        }
    }
}

impl std::error::Error for MetricsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsImportError::Io(err) => Some(err),
            MetricsImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for MetricsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MetricsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads one [`BusinessMetrics`] per CSV row. Headers are the field names;
/// `sector` and `currency` columns may be missing or blank.
pub struct MetricsImporter;

impl MetricsImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BusinessMetrics>, MetricsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<BusinessMetrics>, MetricsImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<BusinessMetrics>() {
            let mut metrics = record?;
            metrics.sector = metrics.sector.filter(|label| !label.is_empty());
            metrics.currency = metrics.currency.filter(|label| !label.is_empty());
            rows.push(metrics);
        }

        Ok(rows)
    }
}
