//! Text formatting of run results.

use cav_core::Phasor;
use cav_sim::Sample;

pub const CSV_HEADER: &str =
    "step,time_s,v_re,v_im,v_abs,probe_re,probe_im,reverse_re,reverse_im,kg_re,kg_im\n";

pub fn samples_csv(samples: &[Sample]) -> String {
    let mut csv = String::from(CSV_HEADER);
    for s in samples {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            s.step,
            s.t,
            s.v.re,
            s.v.im,
            s.v.norm(),
            s.e_probe.re,
            s.e_probe.im,
            s.e_reverse.re,
            s.e_reverse.im,
            s.kg.re,
            s.kg.im,
        ));
    }
    csv
}

pub fn fmt_phasor(v: Phasor) -> String {
    format!("{:.4e} ∠ {:+.4} rad", v.norm(), v.arg())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(step: usize) -> Sample {
        Sample {
            step,
            t: step as f64 * 1e-6,
            v: Phasor::new(3.0, 4.0),
            e_probe: Phasor::new(0.5, 0.0),
            e_reverse: Phasor::new(-1.0, 0.25),
            kg: Phasor::new(1.0, 0.0),
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let csv = samples_csv(&[sample(0), sample(1)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(format!("{}\n", lines[0]), CSV_HEADER);
        let cols: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(cols.len(), 11);
        assert_eq!(cols[0], "1");
        assert_eq!(cols[4], "5");
        assert_eq!(cols[7], "-1");
    }

    #[test]
    fn phasor_format_shows_magnitude_and_angle() {
        let s = fmt_phasor(Phasor::new(0.0, 2.0));
        assert!(s.starts_with("2.0000e0"));
        assert!(s.contains("+1.5708 rad"));
    }
}
