//! Per-generation fitness metrics.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_fitness: i64,
    pub average_fitness: f64,
}

/// Append-only list of [`GenerationRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitnessHistory {
    records: Vec<GenerationRecord>,
}

impl FitnessHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    #[must_use]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    /// Writes `Generation,Best_Fitness,Average_Fitness` rows with a header line.
    pub fn write_csv<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(writer, "Generation,Best_Fitness,Average_Fitness")?;
        for record in &self.records {
            writeln!(
                writer,
                "{},{},{}",
                record.generation, record.best_fitness, record.average_fitness
            )?;
        }
        Ok(())
    }

    pub fn save<P>(&self, path: P) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv(&mut writer)?;
        writer.flush()
    }
}
