//! CSV lists of voices to extract.
//!
//! Rows have the columns `room,noun,verb,cond,seq`, one row per line of
//! message audio.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{Result, Selector};

/// One requested voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRequest {
    pub room: u16,
    pub noun: u8,
    pub verb: u8,
    pub cond: u8,
    pub seq: u8,
}

impl VoiceRequest {
    pub const fn selector(&self) -> Selector {
        Selector::new(self.noun, self.verb, self.cond, self.seq)
    }
}

/// Read voice requests from CSV with a header line.
pub fn read_voice_requests<R: Read>(reader: R) -> Result<Vec<VoiceRequest>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let requests = csv
        .deserialize()
        .collect::<std::result::Result<Vec<VoiceRequest>, _>>()?;
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_read_requests() {
        let input = "room, noun, verb, cond, seq\n\
                     230, 28, 0, 0, 1\n\
                     100,1,2,3,4\n";
        let requests = read_voice_requests(input.as_bytes()).unwrap();

        assert_eq!(
            requests,
            [
                VoiceRequest {
                    room: 230,
                    noun: 28,
                    verb: 0,
                    cond: 0,
                    seq: 1,
                },
                VoiceRequest {
                    room: 100,
                    noun: 1,
                    verb: 2,
                    cond: 3,
                    seq: 4,
                },
            ]
        );
        assert_eq!(requests[1].selector(), Selector::new(1, 2, 3, 4));
    }

    #[test]
    fn test_out_of_range_field() {
        let input = "room,noun,verb,cond,seq\n1,300,0,0,1\n";
        assert!(matches!(read_voice_requests(input.as_bytes()), Err(Error::Csv(_))));
    }
}
