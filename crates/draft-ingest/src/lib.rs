//! Table IO and source normalization.
//!
//! Tables are read and written through Polars as CSV or Parquet depending on
//! the file extension. Source readers turn loosely typed input tables into
//! model records with a QA report; record builders persist each stage's
//! normalized output for the next stage.

pub mod discovery;
pub mod error;
pub mod frame;
pub mod polars_utils;
pub mod records;
pub mod sources;
pub mod table;

pub use discovery::list_table_files;
pub use error::{IngestError, Result};
pub use frame::{FrameBuilder, FrameView};
pub use polars_utils::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, format_numeric, parse_f64,
    parse_flag, parse_i64,
};
pub use sources::{
    Ingested, read_combine, read_comp_picks, read_comp_profiles, read_consensus,
    read_draft_order, read_grade_snapshots, read_historical, read_production, read_seed_rows,
    read_team_needs,
};
pub use table::{TableFormat, read_table, resolve_table, table_path, write_table};
