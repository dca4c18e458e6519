//! Minimal FIT writer for building test activities
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31 00:00:00 UTC)
pub const FIT_EPOCH_OFFSET: u32 = 631_065_600;

/// 2024-06-01 06:00:00 UTC in FIT time
pub const START: u32 = 1_717_221_600 - FIT_EPOCH_OFFSET;

const BASE_ENUM: u8 = 0x00;
const BASE_UINT8: u8 = 0x02;
const BASE_UINT16: u8 = 0x84;
const BASE_UINT32: u8 = 0x86;

const MESG_SESSION: u16 = 18;
const MESG_LAP: u16 = 19;
const MESG_RECORD: u16 = 20;
const MESG_EVENT: u16 = 21;

pub const SPORT_RUNNING: u8 = 1;
pub const SPORT_CYCLING: u8 = 2;

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

pub fn fit_crc(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |mut crc, &byte| {
        let mut tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];
        tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

/// One sample of a synthetic activity
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub heart_rate: u8,
    pub distance_m: u32,
    pub speed_mps: f64,
    pub cadence: u8,
    pub altitude_m: f64,
}

impl Sample {
    pub fn steady(i: u32) -> Self {
        Sample {
            heart_rate: 120 + i as u8,
            distance_m: i * 10,
            speed_mps: 5.0,
            cadence: 80,
            altitude_m: 100.0,
        }
    }
}

#[derive(Default)]
pub struct FitBuilder {
    data: Vec<u8>,
}

impl FitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition message: fields are (number, size, base type)
    pub fn define(&mut self, local: u8, global: u16, fields: &[(u8, u8, u8)]) -> &mut Self {
        self.data.push(0x40 | local);
        self.data.push(0); // reserved
        self.data.push(0); // little endian
        self.data.extend_from_slice(&global.to_le_bytes());
        self.data.push(fields.len() as u8);
        for &(number, size, base) in fields {
            self.data.extend_from_slice(&[number, size, base]);
        }
        self
    }

    pub fn message(&mut self, local: u8, payload: &[u8]) -> &mut Self {
        self.data.push(local & 0x0F);
        self.data.extend_from_slice(payload);
        self
    }

    /// Header, messages and trailing CRC
    pub fn finish(&self) -> Vec<u8> {
        let mut header = vec![14u8, 0x20];
        header.extend_from_slice(&2093u16.to_le_bytes());
        header.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        header.extend_from_slice(b".FIT");
        let header_crc = fit_crc(&header);
        header.extend_from_slice(&header_crc.to_le_bytes());

        let mut bytes = header;
        bytes.extend_from_slice(&self.data);
        let crc = fit_crc(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes
    }
}

/// A single-session, single-lap activity with one record per second
pub fn activity(sport: u8, samples: &[Sample]) -> Vec<u8> {
    let mut fit = FitBuilder::new();

    fit.define(3, MESG_EVENT, &[(253, 4, BASE_UINT32), (0, 1, BASE_ENUM), (1, 1, BASE_ENUM)]);
    let mut event = START.to_le_bytes().to_vec();
    event.extend_from_slice(&[0, 0]); // timer, start
    fit.message(3, &event);

    fit.define(
        0,
        MESG_RECORD,
        &[
            (253, 4, BASE_UINT32),
            (3, 1, BASE_UINT8),
            (5, 4, BASE_UINT32),
            (6, 2, BASE_UINT16),
            (4, 1, BASE_UINT8),
            (2, 2, BASE_UINT16),
        ],
    );
    for (i, sample) in samples.iter().enumerate() {
        let mut payload = (START + i as u32).to_le_bytes().to_vec();
        payload.push(sample.heart_rate);
        payload.extend_from_slice(&(sample.distance_m * 100).to_le_bytes());
        payload.extend_from_slice(&((sample.speed_mps * 1000.0).round() as u16).to_le_bytes());
        payload.push(sample.cadence);
        payload.extend_from_slice(&(((sample.altitude_m + 500.0) * 5.0).round() as u16).to_le_bytes());
        fit.message(0, &payload);
    }

    let elapsed = samples.len().saturating_sub(1) as u32;
    let distance = samples.last().map(|s| s.distance_m).unwrap_or(0);
    let end = START + elapsed;

    fit.define(
        1,
        MESG_LAP,
        &[
            (253, 4, BASE_UINT32),
            (2, 4, BASE_UINT32),
            (7, 4, BASE_UINT32),
            (9, 4, BASE_UINT32),
        ],
    );
    let mut lap = end.to_le_bytes().to_vec();
    lap.extend_from_slice(&START.to_le_bytes());
    lap.extend_from_slice(&(elapsed * 1000).to_le_bytes());
    lap.extend_from_slice(&(distance * 100).to_le_bytes());
    fit.message(1, &lap);

    fit.define(
        2,
        MESG_SESSION,
        &[
            (253, 4, BASE_UINT32),
            (2, 4, BASE_UINT32),
            (5, 1, BASE_ENUM),
            (7, 4, BASE_UINT32),
            (9, 4, BASE_UINT32),
            (11, 2, BASE_UINT16),
        ],
    );
    let mut session = end.to_le_bytes().to_vec();
    session.extend_from_slice(&START.to_le_bytes());
    session.push(sport);
    session.extend_from_slice(&(elapsed * 1000).to_le_bytes());
    session.extend_from_slice(&(distance * 100).to_le_bytes());
    session.extend_from_slice(&250u16.to_le_bytes());
    fit.message(2, &session);

    fit.finish()
}

/// Records only, no lap or session message
pub fn records_only(samples: &[Sample]) -> Vec<u8> {
    let mut fit = FitBuilder::new();
    fit.define(0, MESG_RECORD, &[(253, 4, BASE_UINT32), (3, 1, BASE_UINT8)]);
    for (i, sample) in samples.iter().enumerate() {
        let mut payload = (START + i as u32).to_le_bytes().to_vec();
        payload.push(sample.heart_rate);
        fit.message(0, &payload);
    }
    fit.finish()
}

pub fn steady_samples(n: u32) -> Vec<Sample> {
    (0..n).map(Sample::steady).collect()
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
