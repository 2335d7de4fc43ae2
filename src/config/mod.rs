use chrono::NaiveDate;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;
use serde_json::Value;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::brdf::{BrdfRetriever, RetrieverError};
use crate::sat_bands::Band;
use crate::timestamp::TimeInput;

pub mod error;
pub use error::ConfigError;

/// A retrieval run: where the granules are, for which tile and period, and
/// which bands and dates to extract.
#[derive(Debug, Clone)]
pub struct Config {
    tile: String,
    mcd43a1_dir: PathBuf,
    mcd43a2_dir: Option<PathBuf>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    bands: Vec<Band>,
    dates: Option<Vec<NaiveDate>>,
}

fn date_field(field: &'static str, value: &Value) -> Result<NaiveDate, ConfigError> {
    TimeInput::try_from(value)
        .and_then(|input| input.to_date())
        .map_err(|source| ConfigError::Date { field, source })
}

// Dates may be written either as "YYYY-MM-DD" or "YYYYDDD"; they are resolved
// here so a loaded Config always holds valid, ordered dates and bands.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            tile: String,
            mcd43a1_dir: PathBuf,
            mcd43a2_dir: Option<PathBuf>,
            start_date: Value,
            end_date: Option<Value>,
            bands: Option<Vec<u8>>,
            dates: Option<Vec<Value>>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let start_date = date_field("start_date", &helper.start_date).map_err(D::Error::custom)?;

        let end_date = helper
            .end_date
            .as_ref()
            .map(|value| date_field("end_date", value))
            .transpose()
            .map_err(D::Error::custom)?;

        if end_date.is_some_and(|end| end < start_date) {
            return Err(D::Error::custom(ConfigError::DateOrder));
        }

        let bands = match helper.bands {
            Some(numbers) => numbers
                .into_iter()
                .map(Band::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| D::Error::custom(ConfigError::from(e)))?,
            None => Band::all().collect(),
        };

        let dates = helper
            .dates
            .map(|values| {
                values
                    .iter()
                    .map(|value| date_field("dates", value))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(D::Error::custom)?;

        Ok(Config {
            tile: helper.tile,
            mcd43a1_dir: helper.mcd43a1_dir,
            mcd43a2_dir: helper.mcd43a2_dir,
            start_date,
            end_date,
            bands,
            dates,
        })
    }
}

impl Config {
    pub fn new(tile: &str, mcd43a1_dir: impl Into<PathBuf>, start_date: NaiveDate) -> Self {
        Self {
            tile: tile.to_string(),
            mcd43a1_dir: mcd43a1_dir.into(),
            mcd43a2_dir: None,
            start_date,
            end_date: None,
            bands: Band::all().collect(),
            dates: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn tile(&self) -> &str {
        &self.tile
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Dates to extract; `None` means every indexed date.
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Builds the retriever described by this configuration.
    pub fn retriever(&self) -> Result<BrdfRetriever, RetrieverError> {
        let mut builder = BrdfRetriever::builder(&self.tile, &self.mcd43a1_dir, self.start_date);
        if let Some(end_date) = self.end_date {
            builder = builder.end_time(end_date);
        }
        if let Some(mcd43a2_dir) = &self.mcd43a2_dir {
            builder = builder.mcd43a2_dir(mcd43a2_dir);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let file_path = dir.join("config.json");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = write_config(
            dir.path(),
            r#"
    {
        "tile": "h20v11",
        "mcd43a1_dir": "/data/MCD43/Pretoria",
        "start_date": "2016-01-01",
        "end_date": "2016032",
        "bands": [1, 2]
    }
    "#,
        );

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.tile(), "h20v11");
        assert_eq!(
            config.start_date(),
            NaiveDate::from_ymd_opt(2016, 1, 1).expect("Invalid date")
        );
        assert_eq!(
            config.end_date(),
            Some(NaiveDate::from_ymd_opt(2016, 2, 1).expect("Invalid date"))
        );
        assert_eq!(
            config.bands(),
            &[Band::new(1).unwrap(), Band::new(2).unwrap()]
        );
        assert!(config.dates().is_none());
        assert!(config.mcd43a2_dir.is_none());
    }

    #[test]
    fn test_defaults_to_all_bands() {
        let config: Config = serde_json::from_str(
            r#"{"tile": "h20v11", "mcd43a1_dir": "/data", "start_date": "2016001",
                "dates": ["2016-01-05", "2016010"]}"#,
        )
        .unwrap();

        assert_eq!(config.bands().len(), 7);
        assert_eq!(config.end_date(), None);
        assert_eq!(
            config.dates(),
            Some(
                &[
                    NaiveDate::from_ymd_opt(2016, 1, 5).unwrap(),
                    NaiveDate::from_ymd_opt(2016, 1, 10).unwrap(),
                ][..]
            )
        );
    }

    #[test]
    fn test_rejects_numeric_dates() {
        let result: Result<Config, _> = serde_json::from_str(
            r#"{"tile": "h20v11", "mcd43a1_dir": "/data", "start_date": 2016001}"#,
        );

        let message = result.unwrap_err().to_string();
        assert!(message.contains("start_date"), "{message}");
        assert!(message.contains("number"), "{message}");
    }

    #[test]
    fn test_rejects_bad_dates_and_bands() {
        for json in [
            r#"{"tile": "h20v11", "mcd43a1_dir": "/data", "start_date": "2016/01/01"}"#,
            r#"{"tile": "h20v11", "mcd43a1_dir": "/data", "start_date": "2016-02-01", "end_date": "2016-01-01"}"#,
            r#"{"tile": "h20v11", "mcd43a1_dir": "/data", "start_date": "2016-01-01", "bands": [0]}"#,
            r#"{"tile": "h20v11", "mcd43a1_dir": "/data", "start_date": "2016-01-01", "dates": [true]}"#,
        ] {
            assert!(serde_json::from_str::<Config>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_retriever_from_config() {
        let dir = tempdir().unwrap();
        for name in [
            "MCD43A1.A2016001.h20v11.006.hdf",
            "MCD43A2.A2016001.h20v11.006.hdf",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let config = Config::new(
            "h20v11",
            dir.path(),
            NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
        );
        let retriever = config.retriever().unwrap();

        assert_eq!(retriever.tile(), "h20v11");
        assert_eq!(retriever.dates().count(), 1);
    }

    #[test]
    fn test_retriever_with_end_date_and_a2_dir() {
        let a1_dir = tempdir().unwrap();
        let a2_dir = tempdir().unwrap();
        for day in ["2016001", "2016009"] {
            File::create(a1_dir.path().join(format!("MCD43A1.A{day}.h20v11.006.hdf"))).unwrap();
            File::create(a2_dir.path().join(format!("MCD43A2.A{day}.h20v11.006.hdf"))).unwrap();
        }

        let json = serde_json::json!({
            "tile": "h20v11",
            "mcd43a1_dir": a1_dir.path(),
            "mcd43a2_dir": a2_dir.path(),
            "start_date": "2016-01-01",
            "end_date": "2016005",
        });
        let config: Config = serde_json::from_value(json).unwrap();
        let retriever = config.retriever().unwrap();

        assert_eq!(retriever.mcd43a2_dir(), a2_dir.path());
        assert_eq!(
            retriever.dates().collect::<Vec<_>>(),
            vec![NaiveDate::from_ymd_opt(2016, 1, 1).unwrap()]
        );
    }
}
