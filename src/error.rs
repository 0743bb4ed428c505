use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeterError {
    #[error("pixel sink has no segments")]
    EmptySink,

    #[error("threshold table needs {expected} entries for the strip, got {actual}")]
    ThresholdCount { expected: usize, actual: usize },

    #[error("threshold {index} ({lower}) is not strictly below the next one ({upper})")]
    ThresholdOrder {
        index: usize,
        lower: f64,
        upper: f64,
    },

    #[error("pixel sink holds {actual} segments, meter was built for {expected}")]
    SinkLength { expected: usize, actual: usize },

    #[error("{name} must be a finite, non-negative number of seconds, got {value}")]
    Duration { name: &'static str, value: f64 },

    #[error("{pixels} pixels do not fit into a DMX universe of {channels} channels")]
    DmxOverflow { pixels: usize, channels: usize },

    #[error("cannot bind a socket for {target}: {source}")]
    Bind {
        target: std::net::SocketAddr,
        source: io::Error,
    },

    #[error("cannot flush pixels: {0}")]
    Flush(#[from] io::Error),
}
