use std::io::{self, Write};

use crate::keygen::Distribution;
use crate::probe::ProbeStrategy;

/// One sample of a run. Probe and time fields are cumulative averages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub distribution: Distribution,
    pub scale: String,
    /// Keys processed so far (all of them reached chaining).
    pub insertions: usize,
    /// `insertions / M`; may exceed 1.0.
    pub load_factor: f64,
    /// Keys offered to open addressing so far, divided by M.
    ///
    /// This is the gate's view, shared by all three variants. Keys dropped by
    /// an overflow are still counted, so a variant that overflowed (quadratic
    /// under worst-case keys) holds fewer keys than this suggests.
    pub open_load_factor: f64,
    pub chaining_probes: f64,
    /// Indexed like `ProbeStrategy::ALL`.
    pub open_probes: [f64; 3],
    /// `None` when chaining insertions were not timed.
    pub chaining_time_ms: Option<f64>,
    pub open_time_ms: [f64; 3],
}

/// Consumer of the observation stream.
pub trait ObservationSink {
    /// Called once before the first run of a batch.
    fn begin(&mut self, _chaining_timed: bool) -> io::Result<()> {
        Ok(())
    }

    fn record(&mut self, observation: &Observation) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ObservationSink for Vec<Observation> {
    fn record(&mut self, observation: &Observation) -> io::Result<()> {
        self.push(observation.clone());
        Ok(())
    }
}

/// CSV header. `Chaining_Time_ms` is present only when chaining is timed.
pub fn header(chaining_timed: bool) -> String {
    let mut columns = vec![
        "Distribution".to_string(),
        "Scale".to_string(),
        "Key_Index".to_string(),
        "Load_Factor".to_string(),
        "Open_Load_Factor".to_string(),
        "Chaining_Probes".to_string(),
    ];
    columns.extend(
        ProbeStrategy::ALL
            .iter()
            .map(|s| format!("{}_Probes", s.label())),
    );
    if chaining_timed {
        columns.push("Chaining_Time_ms".to_string());
    }
    columns.extend(
        ProbeStrategy::ALL
            .iter()
            .map(|s| format!("{}_Time_ms", s.label())),
    );
    columns.join(",")
}

/// Writes one header line followed by one comma-separated line per observation.
pub struct CsvSink<W: Write> {
    writer: W,
    chaining_timed: bool,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W, chaining_timed: bool) -> Self {
        CsvSink {
            writer,
            chaining_timed,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", header(self.chaining_timed))?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> ObservationSink for CsvSink<W> {
    fn begin(&mut self, chaining_timed: bool) -> io::Result<()> {
        if !self.header_written {
            self.chaining_timed = chaining_timed;
        }
        self.write_header()
    }

    fn record(&mut self, o: &Observation) -> io::Result<()> {
        self.write_header()?;
        write!(
            self.writer,
            "{},{},{},{:.6},{:.6},{:.6}",
            o.distribution.label(),
            o.scale,
            o.insertions,
            o.load_factor,
            o.open_load_factor,
            o.chaining_probes
        )?;
        for probes in o.open_probes {
            write!(self.writer, ",{:.6}", probes)?;
        }
        if self.chaining_timed {
            match o.chaining_time_ms {
                Some(ms) => write!(self.writer, ",{:.6}", ms)?,
                None => write!(self.writer, ",")?,
            }
        }
        for ms in o.open_time_ms {
            write!(self.writer, ",{:.6}", ms)?;
        }
        writeln!(self.writer)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.write_header()?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(chaining_time_ms: Option<f64>) -> Observation {
        Observation {
            distribution: Distribution::WorstCase,
            scale: "Small".to_string(),
            insertions: 10,
            load_factor: 10.0 / 13.0,
            open_load_factor: 10.0 / 13.0,
            chaining_probes: 5.5,
            open_probes: [5.5, 2.0, 1.5],
            chaining_time_ms,
            open_time_ms: [0.001, 0.002, 0.0005],
        }
    }

    #[test]
    fn test_header_columns() {
        assert_eq!(
            header(true),
            "Distribution,Scale,Key_Index,Load_Factor,Open_Load_Factor,Chaining_Probes,\
             Linear_Probing_Probes,Quadratic_Probing_Probes,Double_Hashing_Probes,\
             Chaining_Time_ms,Linear_Probing_Time_ms,Quadratic_Probing_Time_ms,Double_Hashing_Time_ms"
        );
        assert!(!header(false).contains("Chaining_Time_ms"));
        assert_eq!(header(false).split(',').count(), 12);
    }

    #[test]
    fn test_csv_lines() {
        let mut sink = CsvSink::new(Vec::new(), true);
        sink.record(&observation(Some(0.25))).unwrap();
        sink.record(&observation(None)).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], header(true));
        assert_eq!(
            lines[1],
            "Worst_Case,Small,10,0.769231,0.769231,5.500000,5.500000,2.000000,1.500000,\
             0.250000,0.001000,0.002000,0.000500"
        );
        assert_eq!(lines[2].split(',').nth(9), Some(""));
        for line in &lines {
            assert_eq!(line.split(',').count(), 13);
        }
    }

    #[test]
    fn test_header_written_once() {
        let mut sink = CsvSink::new(Vec::new(), true);
        sink.begin(false).unwrap();
        sink.begin(true).unwrap();
        sink.record(&observation(Some(1.0))).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], header(false));
        assert_eq!(lines[1].split(',').count(), 12);
    }

    #[test]
    fn test_empty_stream_still_has_header() {
        let mut sink = CsvSink::new(Vec::new(), false);
        sink.finish().unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), header(false) + "\n");
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Observation> = Vec::new();
        sink.begin(true).unwrap();
        sink.record(&observation(None)).unwrap();
        assert_eq!(sink, vec![observation(None)]);
    }
}
