//! Export of analyzed workouts.

pub mod csv;

pub use csv::{
    export_analysis_csv, export_summary_csv, export_table_csv, generate_csv_filename,
    write_csv_file, ExportError,
};
