use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("unknown option: {0}")]
    Unknown(String),
    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange { name: &'static str, value: i64, min: i64, max: i64 },
    #[error("reading params: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing params: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for [`Searcher`](super::Searcher).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Moves worth less than this are not searched in quiescence.
    pub qs: i32,
    /// The per-depth binary search stops once the root window is this narrow.
    /// Larger values mean fewer probes and a coarser score.
    pub eval_roughness: i32,
    /// Last depth the driver will reach.
    pub max_depth: i32,
    /// Score table capacity in entries; `None` grows without bound.
    pub hash_entries: Option<usize>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { qs: 35, eval_roughness: 15, max_depth: 1000, hash_entries: None }
    }
}

/// Tunable name with its allowed range, as advertised over UCI.
pub const TUNABLES: [(&str, i64, i64); 2] = [("QS", 0, 300), ("EVAL_ROUGHNESS", 0, 50)];

impl SearchParams {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParamError> {
        let text = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check("QS", self.qs as i64)?;
        check("EVAL_ROUGHNESS", self.eval_roughness as i64)?;
        if self.max_depth < 1 {
            return Err(ParamError::OutOfRange { name: "max_depth", value: self.max_depth as i64, min: 1, max: i32::MAX as i64 });
        }
        Ok(())
    }

    /// Sets a tunable by its UCI name (case-insensitive).
    pub fn set_option(&mut self, name: &str, value: i64) -> Result<(), ParamError> {
        match name.to_ascii_uppercase().as_str() {
            "QS" => {
                check("QS", value)?;
                self.qs = value as i32;
            }
            "EVAL_ROUGHNESS" => {
                check("EVAL_ROUGHNESS", value)?;
                self.eval_roughness = value as i32;
            }
            _ => return Err(ParamError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

fn check(name: &'static str, value: i64) -> Result<(), ParamError> {
    let (_, min, max) = TUNABLES.iter().copied().find(|(n, _, _)| *n == name).unwrap_or((name, i64::MIN, i64::MAX));
    if value < min || value > max {
        return Err(ParamError::OutOfRange { name, value, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let p = SearchParams::default();
        assert_eq!((p.qs, p.eval_roughness), (35, 15));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn set_option_checks_range() {
        let mut p = SearchParams::default();
        p.set_option("qs", 120).unwrap();
        assert_eq!(p.qs, 120);
        assert!(matches!(p.set_option("EVAL_ROUGHNESS", 51), Err(ParamError::OutOfRange { .. })));
        assert!(matches!(p.set_option("Contempt", 1), Err(ParamError::Unknown(_))));
        assert_eq!(p.eval_roughness, 15);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let p: SearchParams = serde_json::from_str(r#"{"qs": 50}"#).unwrap();
        assert_eq!(p, SearchParams { qs: 50, ..SearchParams::default() });
    }
}
