//! Threshold modifier configuration, re-read on reload requests

use crate::errors::{FanRegError, Result};
use crate::policy::ThresholdModifier;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const PARAM_KEY: &str = "param";

/// Source of the threshold modifier
pub trait ConfigSource {
    fn reload(&mut self) -> Result<ThresholdModifier>;
}

/// Parse a `param=<token>` line
pub fn parse_param_line(line: &str) -> Result<ThresholdModifier> {
    let trimmed = line.trim();
    let malformed = || FanRegError::ConfigMalformed {
        line: trimmed.to_string(),
    };

    let (key, value) = trimmed.split_once('=').ok_or_else(malformed)?;
    if key.trim() != PARAM_KEY {
        return Err(malformed());
    }

    value.trim().parse()
}

/// Single-line config file, e.g. `/etc/fanreg.conf` containing `param=ext`
#[derive(Debug, Clone)]
pub struct ParamFile {
    path: PathBuf,
}

impl ParamFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for ParamFile {
    fn reload(&mut self) -> Result<ThresholdModifier> {
        let file = File::open(&self.path).map_err(|source| FanRegError::ConfigUnavailable {
            path: self.path.clone(),
            source,
        })?;

        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(|source| FanRegError::ConfigUnavailable {
                path: self.path.clone(),
                source,
            })?;

        parse_param_line(&line)
    }
}
