// Results export module
// Writes the per-image measurement table as CSV, one row per successfully
// processed image, in input order

use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::batch::BatchRecord;

/// Export measurements to a CSV file
/// Areas are in mm²; the ratio is dimensionless
pub fn export_csv(records: &[BatchRecord], output_path: &Path) -> Result<()> {
    let mut file = File::create(output_path)?;

    writeln!(file, "sample,body_area_mm2,pore_area_mm2,ratio")?;

    for record in records {
        let m = &record.measurement;
        writeln!(
            file,
            "{},{:.6},{:.6},{:.6}",
            csv_field(&record.sample),
            m.body_area_mm2,
            m.pore_area_mm2,
            m.ratio
        )?;
    }

    println!(
        "Exported {} measurement(s) to {}",
        records.len(),
        output_path.display()
    );

    Ok(())
}

/// Quote a field if it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poretrace_common::Measurement;
    use std::fs;

    #[test]
    fn writes_one_row_per_record_in_order() {
        let records = vec![
            BatchRecord {
                sample: "a.tif".to_string(),
                measurement: Measurement {
                    body_area_mm2: 1.5,
                    pore_area_mm2: 0.5,
                    ratio: 0.25,
                },
            },
            BatchRecord {
                sample: "b,with comma.tif".to_string(),
                measurement: Measurement {
                    body_area_mm2: 2.0,
                    pore_area_mm2: 0.0,
                    ratio: 0.0,
                },
            },
        ];

        let path = std::env::temp_dir().join(format!("poretrace-export-{}.csv", std::process::id()));
        export_csv(&records, &path).expect("csv written");
        let contents = fs::read_to_string(&path).expect("csv readable");
        let _ = fs::remove_file(&path);

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "sample,body_area_mm2,pore_area_mm2,ratio");
        assert_eq!(lines[1], "a.tif,1.500000,0.500000,0.250000");
        assert!(lines[2].starts_with("\"b,with comma.tif\""));
    }

    #[test]
    fn quotes_fields_with_delimiters() {
        assert_eq!(csv_field("plain.tif"), "plain.tif");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
