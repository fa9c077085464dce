//! Parquet output backend (feature `parquet`).
//!
//! Creates, in the configured output directory:
//! - `{run_name}_df_{episode}.parquet` - one file per episode, one row group.
//! - `{run_name}_summary.parquet` - all summary rows, written by `finish()`.
//!
//! `vehicle_types` and `actions` are native Arrow list columns.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Builder, ListBuilder, StringBuilder, UInt32Builder, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use tsc_core::{Pollutant, SignalId, artifact_stem};

use crate::schema::FIXED_COLUMNS;
use crate::writer::TableWriter;
use crate::{EpisodeSummaryRow, EpisodeTable, OutputResult};

fn list_of(item: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", item, true)))
}

fn episode_schema(signals: &[SignalId]) -> Arc<Schema> {
    let types = [
        DataType::UInt64,
        DataType::UInt32,
        list_of(DataType::Utf8),
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::UInt32,
        list_of(DataType::UInt32),
    ];
    let mut fields: Vec<Field> = FIXED_COLUMNS
        .iter()
        .zip(types)
        .map(|(name, ty)| Field::new(*name, ty, false))
        .collect();
    for s in signals {
        fields.push(Field::new(format!("{s}_phase"),          DataType::UInt32,  false));
        fields.push(Field::new(format!("{s}_phase_duration"), DataType::Float64, false));
        fields.push(Field::new(format!("{s}_state"),          DataType::Utf8,    false));
    }
    Arc::new(Schema::new(fields))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("episode",            DataType::UInt64,  false),
        Field::new("ticks",              DataType::UInt64,  false),
        Field::new("total_reward",       DataType::Float64, false),
        Field::new("mean_vehicles",      DataType::Float64, false),
        Field::new("peak_vehicles",      DataType::UInt32,  false),
        Field::new("total_co2",          DataType::Float64, false),
        Field::new("total_waiting_time", DataType::Float64, false),
        Field::new("mean_avg_speed",     DataType::Float64, false),
        Field::new("early_done_steps",   DataType::UInt64,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes each episode table to its own Parquet file.
pub struct ParquetWriter {
    dir:       PathBuf,
    run_name:  String,
    summaries: Vec<EpisodeSummaryRow>,
    finished:  bool,
}

impl ParquetWriter {
    pub fn new(dir: &Path, run_name: &str) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir:       dir.to_path_buf(),
            run_name:  run_name.to_owned(),
            summaries: Vec::new(),
            finished:  false,
        })
    }

    pub fn episode_path(&self, episode: usize) -> PathBuf {
        self.dir.join(format!("{}.parquet", artifact_stem(&self.run_name, episode)))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}_summary.parquet", self.run_name))
    }
}

fn episode_batch(table: &EpisodeTable, schema: Arc<Schema>) -> OutputResult<RecordBatch> {
    let n = table.len();
    let mut ticks     = UInt64Builder::with_capacity(n);
    let mut vehicles  = UInt32Builder::with_capacity(n);
    let mut types     = ListBuilder::new(StringBuilder::new());
    let mut speeds    = Float64Builder::with_capacity(n);
    let mut emissions: Vec<Float64Builder> =
        (0..Pollutant::ALL.len()).map(|_| Float64Builder::with_capacity(n)).collect();
    let mut fuel      = Float64Builder::with_capacity(n);
    let mut noise     = Float64Builder::with_capacity(n);
    let mut waiting   = Float64Builder::with_capacity(n);
    let mut halting   = UInt32Builder::with_capacity(n);
    let mut actions   = ListBuilder::new(UInt32Builder::new());

    let k = table.signals.len();
    let mut phases:    Vec<UInt32Builder>  = (0..k).map(|_| UInt32Builder::with_capacity(n)).collect();
    let mut durations: Vec<Float64Builder> = (0..k).map(|_| Float64Builder::with_capacity(n)).collect();
    let mut states:    Vec<StringBuilder>  = (0..k).map(|_| StringBuilder::new()).collect();

    for row in table.rows() {
        ticks.append_value(row.tick);
        vehicles.append_value(row.num_vehicles);
        for t in &row.vehicle_types {
            types.values().append_value(t);
        }
        types.append(true);
        speeds.append_value(row.avg_speed);
        for p in Pollutant::ALL {
            emissions[p.index()].append_value(row.emission(p));
        }
        fuel.append_value(row.fuel_consumption);
        noise.append_value(row.noise);
        waiting.append_value(row.waiting_time);
        halting.append_value(row.halting);
        for a in &row.actions {
            actions.values().append_value(*a);
        }
        actions.append(true);
        for (i, s) in row.signals.iter().enumerate() {
            phases[i].append_value(s.phase);
            durations[i].append_value(s.phase_duration);
            states[i].append_value(&s.state);
        }
    }

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(ticks.finish()),
        Arc::new(vehicles.finish()),
        Arc::new(types.finish()),
        Arc::new(speeds.finish()),
    ];
    for mut e in emissions {
        columns.push(Arc::new(e.finish()));
    }
    columns.push(Arc::new(fuel.finish()));
    columns.push(Arc::new(noise.finish()));
    columns.push(Arc::new(waiting.finish()));
    columns.push(Arc::new(halting.finish()));
    columns.push(Arc::new(actions.finish()));
    for ((mut p, mut d), mut s) in phases.into_iter().zip(durations).zip(states) {
        columns.push(Arc::new(p.finish()));
        columns.push(Arc::new(d.finish()));
        columns.push(Arc::new(s.finish()));
    }

    Ok(RecordBatch::try_new(schema, columns)?)
}

impl TableWriter for ParquetWriter {
    fn write_episode(&mut self, table: &EpisodeTable) -> OutputResult<()> {
        let schema = episode_schema(&table.signals);
        let batch = episode_batch(table, Arc::clone(&schema))?;
        let file = File::create(self.episode_path(table.episode))?;
        let mut writer = ArrowWriter::try_new(file, schema, Some(snappy_props()))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &EpisodeSummaryRow) -> OutputResult<()> {
        self.summaries.push(row.clone());
        Ok(())
    }

    /// Writes the summary file if any summary rows were recorded.
    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.summaries.is_empty() {
            return Ok(());
        }

        let schema = summary_schema();
        let mut episode = UInt64Builder::new();
        let mut ticks   = UInt64Builder::new();
        let mut reward  = Float64Builder::new();
        let mut mean_v  = Float64Builder::new();
        let mut peak_v  = UInt32Builder::new();
        let mut co2     = Float64Builder::new();
        let mut waiting = Float64Builder::new();
        let mut speed   = Float64Builder::new();
        let mut early   = UInt64Builder::new();

        for r in &self.summaries {
            episode.append_value(r.episode as u64);
            ticks.append_value(r.ticks);
            reward.append_value(r.total_reward);
            mean_v.append_value(r.mean_vehicles);
            peak_v.append_value(r.peak_vehicles);
            co2.append_value(r.total_co2);
            waiting.append_value(r.total_waiting_time);
            speed.append_value(r.mean_avg_speed);
            early.append_value(r.early_done_steps);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&schema),
            vec![
                Arc::new(episode.finish()),
                Arc::new(ticks.finish()),
                Arc::new(reward.finish()),
                Arc::new(mean_v.finish()),
                Arc::new(peak_v.finish()),
                Arc::new(co2.finish()),
                Arc::new(waiting.finish()),
                Arc::new(speed.finish()),
                Arc::new(early.finish()),
            ],
        )?;
        let file = File::create(self.summary_path())?;
        let mut writer = ArrowWriter::try_new(file, schema, Some(snappy_props()))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }
}
