use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use super::index::pl::PostingEncoding;

pub const DEFAULT_AVGDL: f64 = 100.0;
pub const DEFAULT_TOTAL_DOCUMENTS: u64 = 1000;

/// Ranking knobs, optionally read from a yaml file.
/// Missing fields keep their defaults.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct RankerCfg {
    pub k1: f64,
    pub b: f64,
    pub default_k: usize,
    pub query_timeout_ms: u64,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub encoding: PostingEncoding,
    pub default_avgdl: f64,
    pub default_total_documents: u64,
}

impl Default for RankerCfg {
    fn default() -> Self {
        RankerCfg {
            k1: 1.5,
            b: 0.75,
            default_k: 10,
            query_timeout_ms: 5000,
            max_connections: 8,
            connect_timeout_ms: 3000,
            encoding: PostingEncoding::Delimited,
            default_avgdl: DEFAULT_AVGDL,
            default_total_documents: DEFAULT_TOTAL_DOCUMENTS,
        }
    }
}

impl RankerCfg {
    pub fn from_str(cfg_str: &str) -> Self {
        match serde_yaml::from_str::<RankerCfg>(cfg_str) {
            Ok(cfg) => cfg.sanitized(),
            Err(e) => {
                log::warn!("invalid ranker config, using defaults: {}", e);
                RankerCfg::default()
            }
        }
    }

    // scoring divides by avgdl and by the length-normalized tf, so
    // out-of-range values would yield inf/NaN scores
    fn sanitized(mut self) -> Self {
        let defaults = RankerCfg::default();
        if !(self.k1.is_finite() && self.k1 > 0.0) {
            log::warn!("k1 must be finite and positive, got {}; using {}", self.k1, defaults.k1);
            self.k1 = defaults.k1;
        }
        if !(self.b.is_finite() && (0.0..=1.0).contains(&self.b)) {
            log::warn!("b must lie in [0, 1], got {}; using {}", self.b, defaults.b);
            self.b = defaults.b;
        }
        if !(self.default_avgdl.is_finite() && self.default_avgdl > 0.0) {
            log::warn!("default_avgdl must be finite and positive, got {}; using {}",
                self.default_avgdl, defaults.default_avgdl);
            self.default_avgdl = defaults.default_avgdl;
        }
        if self.default_k == 0 {
            log::warn!("default_k must be at least 1; using {}", defaults.default_k);
            self.default_k = defaults.default_k;
        }
        if self.max_connections == 0 {
            log::warn!("max_connections must be at least 1; using {}", defaults.max_connections);
            self.max_connections = defaults.max_connections;
        }
        self
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_str(&content))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Connection target of the relational metadata store.
#[derive(Debug, Clone, PartialEq)]
pub struct DbTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for DbTarget {
    fn default() -> Self {
        DbTarget {
            host: "postgres_service".to_string(),
            port: 5432,
            database: "search_engine".to_string(),
            user: "admin".to_string(),
            password: "password123".to_string(),
        }
    }
}
