//! Column names, placeholder tokens and formats used throughout the pipeline
//!
//! The column names follow the instrument exports: the offline sheet is
//! keyed by per-analyte timestamps, the online sheet by a shared `Zeit`
//! column, and kLa exports by a composite `Time` column.

// =============================================================================
// Null Placeholders
// =============================================================================

/// Tokens the instruments write instead of a number
pub const NULL_PLACEHOLDERS: &[&str] = &["#NAN", "NaN", "nan", "#DIV/0!", "inf", "-inf"];

// =============================================================================
// Offline Sample Columns
// =============================================================================

pub mod offline {
    pub const TIME_BIOMASS: &str = "Zeit_BTM";
    pub const TIME_GLUCOSE: &str = "Zeit_G";
    pub const TIME_ETHANOL: &str = "Zeit_E";
    pub const BIOMASS: &str = "BTM";
    pub const ETHANOL: &str = "EtOH";
    pub const GLUCOSE: &str = "Glu";

    /// Required columns, in the order reported when any are missing
    pub const REQUIRED: &[&str] = &[
        TIME_BIOMASS,
        TIME_GLUCOSE,
        TIME_ETHANOL,
        BIOMASS,
        ETHANOL,
        GLUCOSE,
    ];
}

// =============================================================================
// Online Sensor Columns
// =============================================================================

pub mod online {
    /// Raw time-of-day column, e.g. `12:00:00.000`
    pub const RAW_TIME: &str = "Zeit";
    /// Derived time-of-day column
    pub const TIME: &str = "time";
    pub const PH: &str = "spH";
    pub const DISSOLVED_OXYGEN: &str = "spO2";
    pub const STIRRER: &str = "NStirrer";
    pub const TEMPERATURE: &str = "sTR";
    pub const OFFGAS_CO2: &str = "sCO2";
    pub const OFFGAS_O2: &str = "sO2";
    pub const AIRFLOW: &str = "FAirIn";
    pub const VOLUME: &str = "sVR";
    pub const FEED_GLUCOSE: &str = "FGlucose";
    /// Raw feed timestamp column
    pub const FEED_TIME: &str = "Zeit_FG";
    /// Derived feed time in hours since the first feed reading
    pub const FEED_TIME_HOURS: &str = "time_feed_glucose";

    pub const FEED_REQUIRED: &[&str] = &[FEED_TIME, FEED_GLUCOSE];
    pub const MASK_REQUIRED: &[&str] = &[AIRFLOW, STIRRER, FEED_TIME_HOURS, FEED_GLUCOSE];
}

// =============================================================================
// kLa Export
// =============================================================================

pub mod kla {
    /// Marker the header line starts with
    pub const HEADER_MARKER: &str = "Time";
    pub const TIME: &str = "Time";
    pub const DELIMITER: u8 = b';';
    pub const DECIMAL: char = ',';

    /// Channels drawn on the kLa chart with their colors
    pub const PLOT_CHANNELS: &[(&str, (u8, u8, u8))] = &[
        ("spO2", (0, 0, 255)),
        ("sO2", (0, 128, 0)),
        ("sCO2", (255, 0, 0)),
        ("NStirrer", (255, 165, 0)),
        ("FAirIn", (128, 0, 128)),
        ("FO2In", (165, 42, 42)),
    ];
}

// =============================================================================
// Time Formats
// =============================================================================

pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";
pub const KLA_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
/// Timestamp embedded in output file names
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// =============================================================================
// Output Names
// =============================================================================

pub const MAIN_REPORT_KIND: &str = "main_culture_simulation";
pub const KLA_REPORT_PREFIX: &str = "kla_data_plot";

// =============================================================================
// Configuration Defaults
// =============================================================================

pub const DEFAULT_CONFIG_RELATIVE_PATH: &str = "config/config.toml";
pub const CONFIG_DIR_NAME: &str = "culture-plotter";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_KLA_PATTERN: &str = "*.txt";
