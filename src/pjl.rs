//! PJL job envelope around the HBPL pages.

use std::io::Write;

use chrono::NaiveDateTime;

use crate::{error::Error, media::MediaType};

/// Binary job record that follows `ENTER LANGUAGE=HBPL`.
const JOB_RECORD: [u8; 12] = [
    0x41, 0x81, 0xa1, 0x00, 0x82, 0xa2, 0x07, 0x00, 0x83, 0xa2, 0x01, 0x00,
];

/// What the job header tells the printer.
#[derive(Debug, Clone)]
pub struct JobHeader<'a> {
    pub timestamp: NaiveDateTime,
    pub filename: Option<&'a str>,
    pub username: Option<&'a str>,
    pub computer_name: &'a str,
    pub media: MediaType,
    pub color: bool,
}

/// Write the job preamble. Lines end with a bare `\n`.
pub fn write_preamble<W: Write>(w: &mut W, job: &JobHeader) -> Result<(), Error> {
    let username = job.username.unwrap_or("");
    let render_mode = if job.color { "COLOR" } else { "GRAYSCALE" };

    writeln!(w, "\x1b%-12345X@PJL SET STRINGCODESET=UTF8")?;
    writeln!(w, "@PJL COMMENT DATE={}", job.timestamp.format("%m/%d/%Y"))?;
    writeln!(w, "@PJL COMMENT TIME={}", job.timestamp.format("%H:%M:%S"))?;
    writeln!(w, "@PJL COMMENT DNAME={}", job.filename.unwrap_or(""))?;
    writeln!(w, "@PJL JOB MODE=PRINTER")?;
    writeln!(w, "@PJL SET JOBATTR=\"@LUNA={}\"", username)?;
    writeln!(w, "@PJL SET JOBATTR=\"@TRCH=OFF\"")?;
    writeln!(w, "@PJL SET DUPLEX=OFF")?;
    writeln!(w, "@PJL SET BINDING=LONGEDGE")?;
    writeln!(w, "@PJL SET IWAMANUALDUP=OFF")?;
    writeln!(w, "@PJL SET JOBATTR=\"@MSIP={}\"", job.media.pjl_name())?;
    writeln!(w, "@PJL SET RENDERMODE={}", render_mode)?;
    writeln!(w, "@PJL SET ECONOMODE=OFF")?;
    writeln!(w, "@PJL SET RET=ON")?;
    writeln!(w, "@PJL SET JOBATTR=\"@IREC=OFF\"")?;
    writeln!(w, "@PJL SET JOBATTR=\"@TRAP=ON\"")?;
    writeln!(w, "@PJL SET JOBATTR=\"@JOAU={}\"", username)?;
    writeln!(w, "@PJL SET JOBATTR=\"@CNAM={}\"", job.computer_name)?;
    writeln!(w, "@PJL SET COPIES=1")?;
    writeln!(w, "@PJL SET QTY=1")?;
    writeln!(w, "@PJL SET PAPERDIRECTION=SEF")?;
    writeln!(w, "@PJL SET RESOLUTION=600")?;
    writeln!(w, "@PJL SET BITSPERPIXEL=8")?;
    writeln!(w, "@PJL SET JOBATTR=\"@DRDM=XRC\"")?;
    for (kind, value) in [
        ("SCR", [11, 11, 12]),
        ("TRC", [11, 11, 12]),
        ("CPR", [11, 11, 12]),
        ("UCR", [11, 11, 12]),
    ] {
        for (object, v) in ["T", "G", "I"].iter().zip(value.iter()) {
            writeln!(w, "@PJL SET JOBATTR=\"@{}{}={}\"", object, kind, v)?;
        }
    }
    writeln!(w, "@PJL SET JOBATTR=\"@BSPM=OFF\"")?;
    for object in ["T", "G", "I"] {
        writeln!(w, "@PJL SET JOBATTR=\"@{}DFT=0\"", object)?;
    }
    writeln!(w, "@PJL ENTER LANGUAGE=HBPL")?;
    w.write_all(&JOB_RECORD)?;
    Ok(())
}

/// Close the job.
pub fn write_end_of_job<W: Write>(w: &mut W) -> Result<(), Error> {
    w.write_all(b"B\x1b%-12345X@PJL EOJ\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header(color: bool) -> Vec<u8> {
        let timestamp = NaiveDate::from_ymd_opt(2014, 3, 30)
            .and_then(|d| d.and_hms_opt(5, 8, 32))
            .unwrap();
        let job = JobHeader {
            timestamp,
            filename: Some("report.ps"),
            username: Some("alice"),
            computer_name: "printhost",
            media: MediaType::Envelope,
            color,
        };
        let mut out = Vec::new();
        write_preamble(&mut out, &job).unwrap();
        out
    }

    #[test]
    fn preamble_lines() {
        let out = header(true);
        let text = String::from_utf8_lossy(&out[..out.len() - JOB_RECORD.len()]).into_owned();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "\x1b%-12345X@PJL SET STRINGCODESET=UTF8");
        assert_eq!(lines[1], "@PJL COMMENT DATE=03/30/2014");
        assert_eq!(lines[2], "@PJL COMMENT TIME=05:08:32");
        assert_eq!(lines[3], "@PJL COMMENT DNAME=report.ps");
        assert_eq!(lines[5], "@PJL SET JOBATTR=\"@LUNA=alice\"");
        assert_eq!(lines[10], "@PJL SET JOBATTR=\"@MSIP=ENVELOPE\"");
        assert_eq!(lines[11], "@PJL SET RENDERMODE=COLOR");
        assert_eq!(lines[17], "@PJL SET JOBATTR=\"@CNAM=printhost\"");
        assert_eq!(lines[24], "@PJL SET JOBATTR=\"@TSCR=11\"");
        assert_eq!(lines[26], "@PJL SET JOBATTR=\"@ISCR=12\"");
        assert_eq!(lines[35], "@PJL SET JOBATTR=\"@IUCR=12\"");
        assert_eq!(lines[36], "@PJL SET JOBATTR=\"@BSPM=OFF\"");
        assert_eq!(lines[39], "@PJL SET JOBATTR=\"@IDFT=0\"");
        assert_eq!(lines[40], "@PJL ENTER LANGUAGE=HBPL");
        assert_eq!(lines.len(), 41);
        assert!(!text.contains('\r'));
        assert_eq!(&out[out.len() - JOB_RECORD.len()..], &JOB_RECORD);
    }

    #[test]
    fn grayscale_render_mode() {
        let out = header(false);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("@PJL SET RENDERMODE=GRAYSCALE\n"));
    }

    #[test]
    fn end_of_job_marker() {
        let mut out = Vec::new();
        write_end_of_job(&mut out).unwrap();
        assert_eq!(out, b"B\x1b%-12345X@PJL EOJ\n");
    }
}
