// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, trace};

use super::{AcbData, ReadAcbError};

const AMPLITUDE_LINE_PREFIX: &str = " 1 LM";

/// Read an ACB file.
pub fn read_acb_file<P: AsRef<Path>>(path: P) -> Result<AcbData, ReadAcbError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReadAcbError::DoesNotExist(path.to_path_buf()));
    }
    debug!("Reading ACB file {}", path.display());
    let f = File::open(path).map_err(|err| ReadAcbError::Open {
        path: path.to_path_buf(),
        err,
    })?;
    let data = parse_acb(&mut BufReader::new(f))?;
    debug!(
        "Read {} frequencies, {} polarisations, {} amplitudes ({} malformed fields)",
        data.frequencies.len(),
        data.polarisations.len(),
        data.amplitudes.len(),
        data.num_malformed_fields
    );
    Ok(data)
}

/// Parse a buffer containing ACB data. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn parse_acb<T: BufRead>(buf: &mut T) -> Result<AcbData, ReadAcbError> {
    let mut data = AcbData::default();
    let mut bytes = vec![];
    let mut line_num: u32 = 0;

    loop {
        bytes.clear();
        let num_read = buf
            .read_until(b'\n', &mut bytes)
            .map_err(|err| ReadAcbError::Read { line_num, err })?;
        if num_read == 0 {
            break;
        }
        line_num += 1;

        let line = String::from_utf8_lossy(&bytes);
        let line = line.trim_end_matches(['\n', '\r']);

        if line_num == 1 {
            parse_header(line, &mut data);
        } else if line.starts_with("source:") {
            parse_source(line, &mut data);
        } else if line.starts_with("bandfreq:") {
            parse_band(line, line_num, &mut data);
        } else if line.starts_with(AMPLITUDE_LINE_PREFIX) {
            parse_amplitude(line, line_num, &mut data);
        }
    }

    Ok(data)
}

fn parse_header(line: &str, data: &mut AcbData) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, &part) in parts.iter().enumerate() {
        match part {
            "timerange:" if i + 4 < parts.len() => {
                data.time_range = Some(parts[i + 1..i + 5].join(" "));
            }
            "obscode:" if i + 1 < parts.len() => {
                data.obs_code = Some(parts[i + 1].to_string());
            }
            "chans:" if i + 3 < parts.len() => {
                data.channels = Some(parts[i + 1..i + 4].join(" "));
            }
            _ => (),
        }
    }
}

fn parse_source(line: &str, data: &mut AcbData) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, &part) in parts.iter().enumerate() {
        match part {
            "source:" if i + 1 < parts.len() => {
                data.source = Some(parts[i + 1].to_string());
            }
            "bandw:" if i + 2 < parts.len() => {
                data.bandwidth = Some(format!("{} {}", parts[i + 1], parts[i + 2]));
            }
            _ => (),
        }
    }
}

fn parse_band(line: &str, line_num: u32, data: &mut AcbData) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, &part) in parts.iter().enumerate() {
        match part {
            // The frequency needs something after it (its unit).
            "bandfreq:" if i + 2 < parts.len() => match parse_number(parts[i + 1]) {
                Some(freq) => data.frequencies.push(freq),
                None => {
                    trace!(
                        "Line {line_num}: skipping unparsable frequency '{}'",
                        parts[i + 1]
                    );
                    data.num_malformed_fields += 1;
                }
            },
            "polar:" if i + 1 < parts.len() => {
                data.polarisations.push(parts[i + 1].to_string());
            }
            _ => (),
        }
    }
}

fn parse_amplitude(line: &str, line_num: u32, data: &mut AcbData) {
    if let Some(field) = line.split_whitespace().nth(3) {
        match parse_number(field) {
            Some(amp) => data.amplitudes.push(amp),
            None => {
                trace!("Line {line_num}: skipping unparsable amplitude '{field}'");
                data.num_malformed_fields += 1;
            }
        }
    }
}

/// Parse a float. Literals too large for an `f64` (e.g. `1e400`) are
/// rejected rather than becoming infinite; only an explicit `inf` or
/// `infinity` parses as infinity.
fn parse_number(token: &str) -> Option<f64> {
    let value: f64 = token.parse().ok()?;
    if value.is_infinite() {
        let unsigned = token.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if unsigned != "inf" && unsigned != "infinity" {
            return None;
        }
    }
    Some(value)
}
